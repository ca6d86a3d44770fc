//! Instrumented Kahn topological sort (directed).
//!
//! The ready queue is kept sorted ascending by vertex id, so ties between simultaneously
//! ready vertices resolve the same way on every run. A graph with a cycle leaves
//! vertices with nonzero in-degree behind; that ends the run with a flagged frame rather
//! than an error.

use std::collections::BTreeMap;

use crate::{
    error::StepreelResult,
    frame::{FrameSequence, Recorder},
    graph::Graph,
};

#[derive(Clone, Debug, serde::Serialize)]
pub struct KahnSnapshot {
    pub in_degree: BTreeMap<String, usize>,
    /// Ready vertices, ascending by id.
    pub queue: Vec<String>,
    /// Topological order built so far.
    pub order: Vec<String>,
    pub current: Option<String>,
    pub removed_edge: Option<(String, String)>,
    pub cycle: bool,
}

struct Run {
    rec: Recorder<KahnSnapshot>,
    in_degree: BTreeMap<String, usize>,
    queue: Vec<String>,
    order: Vec<String>,
}

impl Run {
    fn emit(
        &mut self,
        description: String,
        current: Option<&str>,
        removed_edge: Option<(String, String)>,
        cycle: bool,
    ) {
        self.rec.snapshot(
            description,
            KahnSnapshot {
                in_degree: self.in_degree.clone(),
                queue: self.queue.clone(),
                order: self.order.clone(),
                current: current.map(str::to_string),
                removed_edge,
                cycle,
            },
        );
    }
}

#[tracing::instrument(skip(graph))]
pub fn run(graph: &Graph) -> StepreelResult<FrameSequence<KahnSnapshot>> {
    graph.validate()?;

    let adjacency = graph.directed_adjacency();
    let mut in_degree: BTreeMap<String, usize> =
        graph.vertices.iter().map(|v| (v.clone(), 0)).collect();
    for edge in &graph.edges {
        if let Some(d) = in_degree.get_mut(&edge.to) {
            *d += 1;
        }
    }

    let queue: Vec<String> = graph
        .sorted_vertices()
        .into_iter()
        .filter(|v| in_degree[v] == 0)
        .collect();

    let mut run = Run {
        rec: Recorder::new(),
        in_degree,
        queue,
        order: Vec::new(),
    };

    run.emit(
        "Initialize in-degrees and queue of 0 in-degree vertices.".to_string(),
        None,
        None,
        false,
    );

    while !run.queue.is_empty() {
        let u = run.queue.remove(0);
        run.emit(
            format!("Pop {u} from queue; append to ordering."),
            Some(&u),
            None,
            false,
        );
        run.order.push(u.clone());
        run.emit(
            format!("Process outgoing edges from {u}."),
            Some(&u),
            None,
            false,
        );

        for (to, _) in &adjacency[&u] {
            let mut d = 0;
            if let Some(count) = run.in_degree.get_mut(to) {
                *count -= 1;
                d = *count;
            }
            run.emit(
                format!("Remove edge {u}→{to}; decrement in-degree of {to} to {d}."),
                Some(&u),
                Some((u.clone(), to.clone())),
                false,
            );
            if d == 0 {
                run.queue.push(to.clone());
                run.queue.sort();
                run.emit(
                    format!("{to} now has in-degree 0; enqueue."),
                    Some(&u),
                    Some((u.clone(), to.clone())),
                    false,
                );
            }
        }
    }

    if run.order.len() < graph.vertices.len() {
        run.emit(
            "Cycle detected: leftover vertices with nonzero in-degree.".to_string(),
            None,
            None,
            true,
        );
    } else {
        run.emit("Topological order complete.".to_string(), None, None, false);
    }

    tracing::debug!(
        frames = run.rec.len(),
        ordered = run.order.len(),
        "kahn frame sequence built"
    );
    Ok(run.rec.finish())
}
