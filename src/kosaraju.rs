//! Instrumented Kosaraju strongly connected components (directed).
//!
//! Two DFS passes: the first records a finish-order stack on the original graph, the
//! second walks the transpose popping from that stack, assigning 1-based component ids.
//! Roots are tried in ascending vertex id order so reruns are identical.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::StepreelResult,
    frame::{FrameSequence, Recorder},
    graph::Graph,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    FirstDfs,
    Transpose,
    SecondDfs,
    Done,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct ExploringEdge {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct KosarajuSnapshot {
    pub stage: Stage,
    /// Finish order from the first pass (stack bottom first).
    pub order: Vec<String>,
    /// The explicit DFS recursion stack at this instant.
    pub stack: Vec<String>,
    pub visited: BTreeSet<String>,
    pub current: Option<String>,
    pub exploring_edge: Option<ExploringEdge>,
    /// Component id per vertex, filled in during the second pass.
    pub components: BTreeMap<String, u32>,
    pub finished_component: Option<u32>,
}

struct Run {
    rec: Recorder<KosarajuSnapshot>,
    adj: BTreeMap<String, Vec<(String, i64)>>,
    tadj: BTreeMap<String, Vec<(String, i64)>>,
    visited: BTreeSet<String>,
    order: Vec<String>,
    stack: Vec<String>,
    components: BTreeMap<String, u32>,
}

struct Emit<'a> {
    stage: Stage,
    current: Option<&'a str>,
    exploring: Option<ExploringEdge>,
    finished_component: Option<u32>,
}

impl Run {
    fn emit(&mut self, description: String, e: Emit<'_>) {
        // During the second pass the meaningful visited set is component membership.
        let visited = if e.stage == Stage::SecondDfs {
            self.components.keys().cloned().collect()
        } else {
            self.visited.clone()
        };
        self.rec.snapshot(
            description,
            KosarajuSnapshot {
                stage: e.stage,
                order: self.order.clone(),
                stack: self.stack.clone(),
                visited,
                current: e.current.map(str::to_string),
                exploring_edge: e.exploring,
                components: self.components.clone(),
                finished_component: e.finished_component,
            },
        );
    }

    fn dfs1(&mut self, u: &str) {
        self.visited.insert(u.to_string());
        self.stack.push(u.to_string());
        self.emit(
            format!("Enter {u} (first DFS)."),
            Emit {
                stage: Stage::FirstDfs,
                current: Some(u),
                exploring: None,
                finished_component: None,
            },
        );

        let neighbors = self.adj[u].clone();
        for (to, _) in neighbors {
            self.emit(
                format!("Explore edge {u}→{to}."),
                Emit {
                    stage: Stage::FirstDfs,
                    current: Some(u),
                    exploring: Some(ExploringEdge {
                        from: u.to_string(),
                        to: to.clone(),
                    }),
                    finished_component: None,
                },
            );
            if !self.visited.contains(&to) {
                self.dfs1(&to);
            }
        }

        self.stack.pop();
        self.order.push(u.to_string());
        self.emit(
            format!("Finish {u}; push to order stack."),
            Emit {
                stage: Stage::FirstDfs,
                current: Some(u),
                exploring: None,
                finished_component: None,
            },
        );
    }

    fn dfs2(&mut self, u: &str, comp: u32) {
        self.components.insert(u.to_string(), comp);
        self.stack.push(u.to_string());
        self.emit(
            format!("Enter {u} on transpose (component {comp})."),
            Emit {
                stage: Stage::SecondDfs,
                current: Some(u),
                exploring: None,
                finished_component: None,
            },
        );

        let neighbors = self.tadj[u].clone();
        for (to, _) in neighbors {
            self.emit(
                format!("Transpose edge {u}→{to}."),
                Emit {
                    stage: Stage::SecondDfs,
                    current: Some(u),
                    exploring: Some(ExploringEdge {
                        from: u.to_string(),
                        to: to.clone(),
                    }),
                    finished_component: None,
                },
            );
            if !self.components.contains_key(&to) {
                self.dfs2(&to, comp);
            }
        }

        self.stack.pop();
        self.emit(
            format!("Finish {u}."),
            Emit {
                stage: Stage::SecondDfs,
                current: Some(u),
                exploring: None,
                finished_component: None,
            },
        );
    }
}

#[tracing::instrument(skip(graph))]
pub fn run(graph: &Graph) -> StepreelResult<FrameSequence<KosarajuSnapshot>> {
    graph.validate()?;

    let mut run = Run {
        rec: Recorder::new(),
        adj: graph.directed_adjacency(),
        tadj: graph.transposed_adjacency(),
        visited: BTreeSet::new(),
        order: Vec::new(),
        stack: Vec::new(),
        components: BTreeMap::new(),
    };

    for v in graph.sorted_vertices() {
        if run.visited.contains(&v) {
            continue;
        }
        run.emit(
            format!("Start DFS1 at {v}."),
            Emit {
                stage: Stage::FirstDfs,
                current: Some(&v),
                exploring: None,
                finished_component: None,
            },
        );
        run.dfs1(&v);
    }

    run.emit(
        "First pass complete. Order stack ready.".to_string(),
        Emit {
            stage: Stage::FirstDfs,
            current: None,
            exploring: None,
            finished_component: None,
        },
    );
    run.emit(
        "Compute transpose graph.".to_string(),
        Emit {
            stage: Stage::Transpose,
            current: None,
            exploring: None,
            finished_component: None,
        },
    );

    let mut comp = 0u32;
    for v in run.order.clone().into_iter().rev() {
        if run.components.contains_key(&v) {
            continue;
        }
        comp += 1;
        run.emit(
            format!("Start DFS2 at {v}; new component {comp}."),
            Emit {
                stage: Stage::SecondDfs,
                current: Some(&v),
                exploring: None,
                finished_component: None,
            },
        );
        run.dfs2(&v, comp);
        run.emit(
            format!("Component {comp} complete."),
            Emit {
                stage: Stage::SecondDfs,
                current: None,
                exploring: None,
                finished_component: Some(comp),
            },
        );
    }

    run.emit(
        "All components identified.".to_string(),
        Emit {
            stage: Stage::Done,
            current: None,
            exploring: None,
            finished_component: None,
        },
    );

    tracing::debug!(
        frames = run.rec.len(),
        components = comp,
        "kosaraju frame sequence built"
    );
    Ok(run.rec.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    fn cycle_with_tail() -> Graph {
        Graph::new(
            vec!["V1".into(), "V2".into(), "V3".into(), "V4".into()],
            vec![
                Edge::unweighted("V1", "V2"),
                Edge::unweighted("V2", "V3"),
                Edge::unweighted("V3", "V1"),
                Edge::unweighted("V2", "V4"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn cycle_and_tail_split_into_two_components() {
        let seq = run(&cycle_with_tail()).unwrap();
        let last = &seq.last().unwrap().snapshot;

        assert_eq!(last.stage, Stage::Done);
        let c1 = last.components["V1"];
        assert_eq!(last.components["V2"], c1);
        assert_eq!(last.components["V3"], c1);
        assert_ne!(last.components["V4"], c1);
    }

    #[test]
    fn component_ids_start_at_one() {
        let seq = run(&cycle_with_tail()).unwrap();
        let last = &seq.last().unwrap().snapshot;
        let ids: BTreeSet<u32> = last.components.values().copied().collect();
        assert_eq!(ids, [1, 2].into_iter().collect());
    }

    #[test]
    fn stages_appear_in_order() {
        let seq = run(&cycle_with_tail()).unwrap();
        let mut last_stage = Stage::FirstDfs;
        for frame in &seq {
            let s = frame.snapshot.stage;
            let rank = |s: Stage| match s {
                Stage::FirstDfs => 0,
                Stage::Transpose => 1,
                Stage::SecondDfs => 2,
                Stage::Done => 3,
            };
            assert!(rank(s) >= rank(last_stage));
            last_stage = s;
        }
        assert!(
            seq.iter()
                .any(|f| f.description == "Compute transpose graph.")
        );
    }

    #[test]
    fn order_stack_holds_every_vertex_after_first_pass() {
        let seq = run(&cycle_with_tail()).unwrap();
        let boundary = seq
            .iter()
            .find(|f| f.description == "First pass complete. Order stack ready.")
            .unwrap();
        assert_eq!(boundary.snapshot.order.len(), 4);
        assert!(boundary.snapshot.stack.is_empty());
    }

    #[test]
    fn dag_yields_singleton_components() {
        let g = Graph::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![Edge::unweighted("A", "B"), Edge::unweighted("B", "C")],
        )
        .unwrap();
        let seq = run(&g).unwrap();
        let last = &seq.last().unwrap().snapshot;
        let ids: BTreeSet<u32> = last.components.values().copied().collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn component_completion_frames_carry_the_id() {
        let seq = run(&cycle_with_tail()).unwrap();
        let completions: Vec<u32> = seq
            .iter()
            .filter_map(|f| f.snapshot.finished_component)
            .collect();
        assert_eq!(completions, vec![1, 2]);
    }
}
