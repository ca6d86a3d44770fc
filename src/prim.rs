//! Instrumented Prim minimum spanning tree (undirected).
//!
//! Same lazy-deleted priority list as Dijkstra, keyed by the cheapest edge weight into
//! the growing tree instead of path distance. The list is seeded with the start vertex
//! only and the run ends when no valid entry remains, so on a disconnected graph
//! vertices outside the start's component are never extracted or finalized: their keys
//! stay at the infinity sentinel through the final frame.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::{StepreelError, StepreelResult},
    frame::{FrameSequence, Recorder},
    graph::Graph,
};

/// Derived frontier view: one entry per vertex with a live priority-list entry.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PrimQueueEntry {
    pub id: String,
    pub key: i64,
    pub parent: Option<String>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct ConsideringEdge {
    pub from: String,
    pub to: String,
    pub weight: i64,
    pub improved: bool,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct PrimSnapshot {
    pub queue: Vec<PrimQueueEntry>,
    pub in_tree: BTreeSet<String>,
    /// `None` until some tree vertex offers an edge into the vertex.
    pub keys: BTreeMap<String, Option<i64>>,
    pub parents: BTreeMap<String, Option<String>>,
    pub current: Option<String>,
    pub considering: Option<ConsideringEdge>,
    /// Tree edges as normalized (min, max) id pairs.
    pub chosen_edges: BTreeSet<(String, String)>,
}

struct Run {
    rec: Recorder<PrimSnapshot>,
    keys: BTreeMap<String, Option<i64>>,
    parents: BTreeMap<String, Option<String>>,
    in_tree: BTreeSet<String>,
    chosen: BTreeSet<(String, String)>,
    pq: Vec<(String, i64)>,
}

impl Run {
    fn emit(&mut self, description: String, current: Option<&str>, considering: Option<ConsideringEdge>) {
        let mut active: BTreeMap<String, i64> = BTreeMap::new();
        for (id, val) in &self.pq {
            if self.in_tree.contains(id) {
                continue;
            }
            if self.keys[id] != Some(*val) {
                continue;
            }
            active.insert(id.clone(), *val);
        }
        let mut queue: Vec<PrimQueueEntry> = active
            .into_iter()
            .map(|(id, key)| PrimQueueEntry {
                parent: self.parents[&id].clone(),
                id,
                key,
            })
            .collect();
        queue.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.id.cmp(&b.id)));

        self.rec.snapshot(
            description,
            PrimSnapshot {
                queue,
                in_tree: self.in_tree.clone(),
                keys: self.keys.clone(),
                parents: self.parents.clone(),
                current: current.map(str::to_string),
                considering,
                chosen_edges: self.chosen.clone(),
            },
        );
    }

    /// Linear-scan extract-min over valid (non-tree, non-stale) entries.
    fn extract_min(&mut self) -> Option<(String, i64)> {
        let mut best: Option<(usize, i64)> = None;
        for (i, (id, val)) in self.pq.iter().enumerate() {
            if self.in_tree.contains(id) {
                continue;
            }
            if self.keys[id] != Some(*val) {
                continue;
            }
            if best.is_none_or(|(_, bv)| *val < bv) {
                best = Some((i, *val));
            }
        }
        best.map(|(i, _)| self.pq.remove(i))
    }
}

fn normalized(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[tracing::instrument(skip(graph))]
pub fn run(graph: &Graph, start: &str) -> StepreelResult<FrameSequence<PrimSnapshot>> {
    graph.validate()?;
    if !graph.contains(start) {
        return Err(StepreelError::validation(format!(
            "unknown start vertex '{start}'"
        )));
    }

    let adjacency = graph.undirected_adjacency();
    let mut run = Run {
        rec: Recorder::new(),
        keys: graph.vertices.iter().map(|v| (v.clone(), None)).collect(),
        parents: graph.vertices.iter().map(|v| (v.clone(), None)).collect(),
        in_tree: BTreeSet::new(),
        chosen: BTreeSet::new(),
        pq: vec![(start.to_string(), 0)],
    };
    run.keys.insert(start.to_string(), Some(0));

    run.emit(
        format!("Initialize keys (start {start} = 0). All vertices in PQ."),
        Some(start),
        None,
    );

    while let Some((u, _)) = run.extract_min() {
        let key_text = run.keys[&u].map_or_else(|| "∞".to_string(), |k| k.to_string());
        run.emit(format!("Extract-min vertex {u} (key={key_text})."), Some(&u), None);

        run.in_tree.insert(u.clone());
        if let Some(p) = run.parents[&u].clone() {
            run.chosen.insert(normalized(&p, &u));
            run.emit(format!("Add edge ({p}-{u}) to MST."), Some(&u), None);
        }
        run.emit(format!("Finalize {u}; update frontier keys."), Some(&u), None);

        for (to, w) in &adjacency[&u] {
            if run.in_tree.contains(to) {
                continue;
            }
            let improved = run.keys[to].is_none_or(|k| *w < k);
            run.emit(
                format!(
                    "Consider edge {u}−{to} (w={w}). {}",
                    if improved {
                        "Better key found."
                    } else {
                        "No improvement."
                    }
                ),
                Some(&u),
                Some(ConsideringEdge {
                    from: u.clone(),
                    to: to.clone(),
                    weight: *w,
                    improved,
                }),
            );
            if improved {
                run.keys.insert(to.clone(), Some(*w));
                run.parents.insert(to.clone(), Some(u.clone()));
                run.pq.push((to.clone(), *w));
                run.emit(
                    format!("Decrease-key: set key[{to}]={w}; parent={u}."),
                    Some(&u),
                    Some(ConsideringEdge {
                        from: u.clone(),
                        to: to.clone(),
                        weight: *w,
                        improved: true,
                    }),
                );
            }
        }
    }

    run.emit(
        "Prim complete. Chosen edges form MST component(s).".to_string(),
        None,
        None,
    );

    tracing::debug!(
        frames = run.rec.len(),
        tree_edges = run.chosen.len(),
        "prim frame sequence built"
    );
    Ok(run.rec.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    fn square() -> Graph {
        Graph::new(
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            vec![
                Edge::new("A", "B", 1),
                Edge::new("B", "C", 2),
                Edge::new("C", "D", 3),
                Edge::new("D", "A", 4),
                Edge::new("A", "C", 5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn square_picks_the_three_cheapest_edges() {
        let seq = run(&square(), "A").unwrap();
        let last = &seq.last().unwrap().snapshot;

        let expected: BTreeSet<(String, String)> = [
            ("A".to_string(), "B".to_string()),
            ("B".to_string(), "C".to_string()),
            ("C".to_string(), "D".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(last.chosen_edges, expected);
        assert_eq!(last.in_tree.len(), 4);
    }

    #[test]
    fn vertices_outside_the_start_component_are_never_finalized() {
        let g = Graph::new(
            vec!["A".into(), "B".into(), "X".into(), "Y".into()],
            vec![Edge::new("A", "B", 1), Edge::new("X", "Y", 2)],
        )
        .unwrap();
        let seq = run(&g, "A").unwrap();
        let last = &seq.last().unwrap().snapshot;

        assert_eq!(last.chosen_edges.len(), 1);
        assert!(last.chosen_edges.contains(&("A".to_string(), "B".to_string())));
        assert!(!last.in_tree.contains("X"));
        assert!(!last.in_tree.contains("Y"));
        assert_eq!(last.keys["X"], None);
        assert_eq!(last.keys["Y"], None);
        assert!(
            seq.iter()
                .all(|f| !f.description.contains("(key=∞)"))
        );
    }

    #[test]
    fn initial_queue_holds_only_the_start_vertex() {
        let seq = run(&square(), "A").unwrap();
        let first = &seq.first().unwrap().snapshot;
        assert_eq!(first.queue.len(), 1);
        assert_eq!(first.queue[0].id, "A");
        assert_eq!(first.queue[0].key, 0);
    }

    #[test]
    fn start_vertex_adds_no_tree_edge() {
        let seq = run(&square(), "A").unwrap();
        let mst_additions: Vec<&str> = seq
            .iter()
            .filter(|f| f.description.starts_with("Add edge"))
            .map(|f| f.description.as_str())
            .collect();
        assert_eq!(mst_additions.len(), 3);
        assert!(mst_additions.iter().all(|d| !d.contains("(A-A)")));
    }

    #[test]
    fn decrease_key_replaces_parent() {
        // C first gets key 5 via A, then improves to 2 via B.
        let seq = run(&square(), "A").unwrap();
        assert!(
            seq.iter()
                .any(|f| f.description == "Decrease-key: set key[C]=5; parent=A.")
        );
        assert!(
            seq.iter()
                .any(|f| f.description == "Decrease-key: set key[C]=2; parent=B.")
        );
        let last = &seq.last().unwrap().snapshot;
        assert_eq!(last.parents["C"], Some("B".to_string()));
    }

    #[test]
    fn queue_snapshot_holds_only_live_frontier_entries() {
        let seq = run(&square(), "A").unwrap();
        // Frame after settling A: B has key 1, D key 4, C key 5; no stale duplicates.
        let frame = seq
            .iter()
            .find(|f| f.description == "Extract-min vertex B (key=1).")
            .unwrap();
        let ids: Vec<&str> = frame.snapshot.queue.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "D", "C"]);

        for frame in &seq {
            let mut ids: Vec<&str> = frame.snapshot.queue.iter().map(|e| e.id.as_str()).collect();
            ids.dedup();
            assert_eq!(ids.len(), frame.snapshot.queue.len());
        }
    }

    #[test]
    fn unknown_start_is_rejected() {
        assert!(run(&square(), "Z").is_err());
    }
}
