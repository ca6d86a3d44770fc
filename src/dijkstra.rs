//! Instrumented Dijkstra shortest paths (undirected, non-negative weights).
//!
//! The priority structure is a lazy-deleted list: improvements push duplicate entries,
//! extraction linearly scans for the best entry whose recorded distance still matches
//! `distance[v]`. Stale entries are skipped silently and emit no frame. The queue stored
//! in each snapshot is the derived active view (one entry per unsettled vertex, sorted by
//! distance then id), not the raw list.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::{StepreelError, StepreelResult},
    frame::{FrameSequence, Recorder},
    graph::Graph,
};

#[derive(Clone, Debug, serde::Serialize)]
pub struct QueueEntry {
    pub id: String,
    pub dist: i64,
}

/// The edge under examination and whether it improved the target's distance.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RelaxInfo {
    pub from: String,
    pub to: String,
    pub weight: i64,
    pub improved: bool,
}

/// `None` distance means "infinite" (unreached); unreached vertices keep it through the
/// final frame.
#[derive(Clone, Debug, serde::Serialize)]
pub struct DijkstraSnapshot {
    pub queue: Vec<QueueEntry>,
    pub settled: BTreeSet<String>,
    pub distances: BTreeMap<String, Option<i64>>,
    pub parents: BTreeMap<String, Option<String>>,
    pub current: Option<String>,
    pub relaxing: Option<RelaxInfo>,
}

struct Run {
    rec: Recorder<DijkstraSnapshot>,
    dist: BTreeMap<String, Option<i64>>,
    parent: BTreeMap<String, Option<String>>,
    settled: BTreeSet<String>,
    pq: Vec<(String, i64)>,
}

impl Run {
    fn emit(&mut self, description: String, current: Option<&str>, relaxing: Option<RelaxInfo>) {
        let mut active: BTreeMap<String, i64> = BTreeMap::new();
        for (id, d) in &self.pq {
            if self.settled.contains(id) {
                continue;
            }
            if self.dist[id] != Some(*d) {
                continue;
            }
            active.insert(id.clone(), *d);
        }
        let mut queue: Vec<QueueEntry> = active
            .into_iter()
            .map(|(id, dist)| QueueEntry { id, dist })
            .collect();
        queue.sort_by(|a, b| a.dist.cmp(&b.dist).then_with(|| a.id.cmp(&b.id)));

        self.rec.snapshot(
            description,
            DijkstraSnapshot {
                queue,
                settled: self.settled.clone(),
                distances: self.dist.clone(),
                parents: self.parent.clone(),
                current: current.map(str::to_string),
                relaxing,
            },
        );
    }

    /// Linear-scan extract-min over valid (non-settled, non-stale) entries.
    fn extract_min(&mut self) -> Option<(String, i64)> {
        let mut best: Option<(usize, i64)> = None;
        for (i, (id, d)) in self.pq.iter().enumerate() {
            if self.settled.contains(id) {
                continue;
            }
            if self.dist[id] != Some(*d) {
                continue;
            }
            if best.is_none_or(|(_, bd)| *d < bd) {
                best = Some((i, *d));
            }
        }
        best.map(|(i, _)| self.pq.remove(i))
    }
}

#[tracing::instrument(skip(graph))]
pub fn run(graph: &Graph, source: &str) -> StepreelResult<FrameSequence<DijkstraSnapshot>> {
    graph.validate()?;
    if !graph.contains(source) {
        return Err(StepreelError::validation(format!(
            "unknown source vertex '{source}'"
        )));
    }

    let adjacency = graph.undirected_adjacency();
    let mut run = Run {
        rec: Recorder::new(),
        dist: graph.vertices.iter().map(|v| (v.clone(), None)).collect(),
        parent: graph.vertices.iter().map(|v| (v.clone(), None)).collect(),
        settled: BTreeSet::new(),
        pq: vec![(source.to_string(), 0)],
    };
    run.dist.insert(source.to_string(), Some(0));

    run.emit(
        format!("Initialize distances; source {source} = 0; push into priority queue."),
        Some(source),
        None,
    );

    while let Some((u, du)) = run.extract_min() {
        run.emit(format!("Extract-min {u} (dist={du})."), Some(&u), None);
        run.settled.insert(u.clone());
        run.emit(
            format!("Settle {u}; distance is now final."),
            Some(&u),
            None,
        );

        for (to, w) in &adjacency[&u] {
            if run.settled.contains(to) {
                continue;
            }
            let candidate = du + w;
            let improved = run.dist[to].is_none_or(|dt| candidate < dt);
            run.emit(
                format!(
                    "Consider edge {u}→{to} (w={w}). {}",
                    if improved {
                        "Relax possible."
                    } else {
                        "No improvement."
                    }
                ),
                Some(&u),
                Some(RelaxInfo {
                    from: u.clone(),
                    to: to.clone(),
                    weight: *w,
                    improved,
                }),
            );
            if improved {
                run.dist.insert(to.clone(), Some(candidate));
                run.parent.insert(to.clone(), Some(u.clone()));
                run.pq.push((to.clone(), candidate));
                run.emit(
                    format!("Relax {to}: set dist={candidate} parent={u} and push to queue."),
                    Some(&u),
                    Some(RelaxInfo {
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
        "Dijkstra complete. All reachable nodes settled.".to_string(),
        None,
        None,
    );

    tracing::debug!(frames = run.rec.len(), "dijkstra frame sequence built");
    Ok(run.rec.finish())
}
