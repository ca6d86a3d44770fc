//! Instrumented Bellman-Ford shortest paths (directed, negative weights allowed).
//!
//! `|V|-1` relaxation passes over the edge list in input order, with an early stop when a
//! pass changes nothing. A detection pass afterwards flags every still-improvable edge as
//! part of a negative cycle; in that case the final state is explicitly non-convergent
//! (failure is data, not an error).

use std::collections::BTreeMap;

use crate::{
    error::{StepreelError, StepreelResult},
    frame::{FrameSequence, Recorder},
    graph::Graph,
};

#[derive(Clone, Debug, serde::Serialize)]
pub struct RelaxEdge {
    pub from: String,
    pub to: String,
    pub weight: i64,
    pub improved: bool,
    pub pass: usize,
    pub index: usize,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct BellmanFordSnapshot {
    /// 0 for initialization, 1..=|V|-1 for relaxation passes, |V| for the detection pass.
    pub pass: usize,
    /// Index into the edge list, `None` for pass boundaries.
    pub edge_index: Option<usize>,
    pub relaxing: Option<RelaxEdge>,
    pub distances: BTreeMap<String, Option<i64>>,
    pub parents: BTreeMap<String, Option<String>>,
    /// Whether this frame recorded a distance update.
    pub updated: bool,
    pub negative_cycle: bool,
    pub cycle_edges: Vec<(String, String)>,
}

struct Run {
    rec: Recorder<BellmanFordSnapshot>,
    dist: BTreeMap<String, Option<i64>>,
    parent: BTreeMap<String, Option<String>>,
    cycle_edges: Vec<(String, String)>,
}

struct Emit {
    pass: usize,
    edge_index: Option<usize>,
    relaxing: Option<RelaxEdge>,
    updated: bool,
    negative_cycle: bool,
}

impl Run {
    fn emit(&mut self, description: String, e: Emit) {
        self.rec.snapshot(
            description,
            BellmanFordSnapshot {
                pass: e.pass,
                edge_index: e.edge_index,
                relaxing: e.relaxing,
                distances: self.dist.clone(),
                parents: self.parent.clone(),
                updated: e.updated,
                negative_cycle: e.negative_cycle,
                cycle_edges: self.cycle_edges.clone(),
            },
        );
    }
}

#[tracing::instrument(skip(graph))]
pub fn run(graph: &Graph, source: &str) -> StepreelResult<FrameSequence<BellmanFordSnapshot>> {
    graph.validate()?;
    if !graph.contains(source) {
        return Err(StepreelError::validation(format!(
            "unknown source vertex '{source}'"
        )));
    }

    let mut run = Run {
        rec: Recorder::new(),
        dist: graph.vertices.iter().map(|v| (v.clone(), None)).collect(),
        parent: graph.vertices.iter().map(|v| (v.clone(), None)).collect(),
        cycle_edges: Vec::new(),
    };
    run.dist.insert(source.to_string(), Some(0));

    run.emit(
        format!("Initialize distances: source {source}=0; others=∞."),
        Emit {
            pass: 0,
            edge_index: None,
            relaxing: None,
            updated: false,
            negative_cycle: false,
        },
    );

    let vertex_count = graph.vertices.len();
    for pass in 1..vertex_count {
        let mut pass_updated = false;
        run.emit(
            format!("Start pass {pass}."),
            Emit {
                pass,
                edge_index: None,
                relaxing: None,
                updated: false,
                negative_cycle: false,
            },
        );

        for (i, edge) in graph.edges.iter().enumerate() {
            let candidate = run.dist[&edge.from].map(|d| d + edge.weight);
            let can = match (candidate, run.dist[&edge.to]) {
                (Some(c), Some(dt)) => c < dt,
                (Some(_), None) => true,
                (None, _) => false,
            };
            run.emit(
                format!(
                    "Check edge {}→{} (w={}) {}.",
                    edge.from,
                    edge.to,
                    edge.weight,
                    if can {
                        "relaxation possible"
                    } else {
                        "no improvement"
                    }
                ),
                Emit {
                    pass,
                    edge_index: Some(i),
                    relaxing: Some(RelaxEdge {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        weight: edge.weight,
                        improved: can,
                        pass,
                        index: i,
                    }),
                    updated: false,
                    negative_cycle: false,
                },
            );
            if can {
                let d = candidate.unwrap_or_default();
                run.dist.insert(edge.to.clone(), Some(d));
                run.parent.insert(edge.to.clone(), Some(edge.from.clone()));
                pass_updated = true;
                run.emit(
                    format!("Relax {}: dist={d} parent={}.", edge.to, edge.from),
                    Emit {
                        pass,
                        edge_index: Some(i),
                        relaxing: Some(RelaxEdge {
                            from: edge.from.clone(),
                            to: edge.to.clone(),
                            weight: edge.weight,
                            improved: true,
                            pass,
                            index: i,
                        }),
                        updated: true,
                        negative_cycle: false,
                    },
                );
            }
        }

        if !pass_updated {
            run.emit(
                format!("No updates in pass {pass}; early stop."),
                Emit {
                    pass,
                    edge_index: Some(graph.edges.len()),
                    relaxing: None,
                    updated: false,
                    negative_cycle: false,
                },
            );
            break;
        }
        run.emit(
            format!("End pass {pass}."),
            Emit {
                pass,
                edge_index: Some(graph.edges.len()),
                relaxing: None,
                updated: true,
                negative_cycle: false,
            },
        );
    }

    // Detection pass: any edge still improvable lies on (or is reachable from) a
    // negative cycle, so distances are not well-defined.
    let mut cycle_detected = false;
    for (i, edge) in graph.edges.iter().enumerate() {
        let can = match (run.dist[&edge.from], run.dist[&edge.to]) {
            (Some(df), Some(dt)) => df + edge.weight < dt,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if can {
            cycle_detected = true;
            run.cycle_edges.push((edge.from.clone(), edge.to.clone()));
            run.emit(
                format!("Negative cycle detected via edge {}→{}.", edge.from, edge.to),
                Emit {
                    pass: vertex_count,
                    edge_index: Some(i),
                    relaxing: Some(RelaxEdge {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        weight: edge.weight,
                        improved: true,
                        pass: vertex_count,
                        index: i,
                    }),
                    updated: false,
                    negative_cycle: true,
                },
            );
        }
    }
    if !cycle_detected {
        run.emit(
            "All passes complete. No negative cycle reachable from source.".to_string(),
            Emit {
                pass: vertex_count,
                edge_index: None,
                relaxing: None,
                updated: false,
                negative_cycle: false,
            },
        );
    }

    tracing::debug!(
        frames = run.rec.len(),
        cycle = cycle_detected,
        "bellman-ford frame sequence built"
    );
    Ok(run.rec.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    fn default_graph() -> Graph {
        Graph::new(
            vec!["N1".into(), "N2".into(), "N3".into(), "N4".into()],
            vec![
                Edge::new("N1", "N2", 6),
                Edge::new("N1", "N3", 5),
                Edge::new("N2", "N4", -2),
                Edge::new("N3", "N4", 1),
                Edge::new("N2", "N3", -1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn default_graph_converges_without_cycle() {
        let seq = run(&default_graph(), "N1").unwrap();
        let last = seq.last().unwrap();

        assert_eq!(
            last.description,
            "All passes complete. No negative cycle reachable from source."
        );
        assert!(!last.snapshot.negative_cycle);
        assert_eq!(last.snapshot.distances["N1"], Some(0));
        assert_eq!(last.snapshot.distances["N2"], Some(6));
        assert_eq!(last.snapshot.distances["N3"], Some(5));
        assert_eq!(last.snapshot.distances["N4"], Some(4));
        assert_eq!(last.snapshot.parents["N4"], Some("N2".to_string()));
    }

    #[test]
    fn early_stop_frame_appears_once_converged() {
        let seq = run(&default_graph(), "N1").unwrap();
        assert!(
            seq.iter()
                .any(|f| f.description.contains("early stop"))
        );
    }

    #[test]
    fn negative_cycle_is_reported_as_data() {
        let g = Graph::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![
                Edge::new("A", "B", 1),
                Edge::new("B", "C", -2),
                Edge::new("C", "B", -2),
            ],
        )
        .unwrap();
        let seq = run(&g, "A").unwrap();
        let last = seq.last().unwrap();

        assert!(last.snapshot.negative_cycle);
        assert!(last.description.starts_with("Negative cycle detected via edge"));
        assert!(!last.snapshot.cycle_edges.is_empty());
    }

    #[test]
    fn equal_candidate_does_not_relax() {
        // N2→N3 yields 6-1 = 5 which ties the direct N1→N3 = 5; strict comparison must
        // leave the earlier parent in place.
        let seq = run(&default_graph(), "N1").unwrap();
        let last = &seq.last().unwrap().snapshot;
        assert_eq!(last.parents["N3"], Some("N1".to_string()));
    }

    #[test]
    fn single_vertex_graph_yields_init_and_completion_only() {
        let g = Graph::new(vec!["A".into()], vec![]).unwrap();
        let seq = run(&g, "A").unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.first().unwrap().description.starts_with("Initialize"));
        assert!(seq.last().unwrap().description.starts_with("All passes complete"));
    }

    #[test]
    fn unreachable_vertices_never_relax() {
        let g = Graph::new(
            vec!["A".into(), "B".into(), "X".into(), "Y".into()],
            vec![Edge::new("A", "B", 3), Edge::new("X", "Y", -10)],
        )
        .unwrap();
        let seq = run(&g, "A").unwrap();
        let last = &seq.last().unwrap().snapshot;
        assert_eq!(last.distances["X"], None);
        assert_eq!(last.distances["Y"], None);
        assert!(!last.negative_cycle);
    }
}
