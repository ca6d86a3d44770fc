//! Instrumented top-down merge sort over an integer array.
//!
//! The recursion tree lives in an arena (`Vec<MergeNode>`, children referenced by
//! index, root at index 0), so every frame can carry the whole tree as a value copy.
//! A child index is written into its parent only after that child's recursion returns;
//! frames emitted inside the recursion therefore show the parent without the half still
//! being solved, which is exactly the state the algorithm has committed to at that
//! point.
//!
//! Frames are recorded in DFS order. [`FrameOrdering::Phase`] regroups them after the
//! run (all divides, then conquers, then merges) as a pure reordering; nothing is
//! re-executed and `step` is renumbered to match the new positions.

use crate::{
    error::{StepreelError, StepreelResult},
    frame::{FrameSequence, Recorder},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Divide,
    Conquer,
    Merge,
}

/// How the recorded frames are ordered in the finished sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameOrdering {
    /// Execution order of the recursion.
    #[default]
    Dfs,
    /// Grouped by phase: divides, then conquers, then merges.
    Phase,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct MergeNode {
    pub depth: usize,
    /// The segment this node is responsible for (sorted in place once merged).
    pub segment: Vec<i64>,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub phase: Phase,
    /// During the merge loop: placed elements followed by both unconsumed tails.
    pub merged: Option<Vec<i64>>,
    pub left_seg: Option<Vec<i64>>,
    pub right_seg: Option<Vec<i64>>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct MergeSortSnapshot {
    pub phase: Phase,
    pub depth: usize,
    pub nodes: Vec<MergeNode>,
    pub root: usize,
    pub focus: usize,
}

fn join(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

struct Run {
    rec: Recorder<MergeSortSnapshot>,
    nodes: Vec<MergeNode>,
}

impl Run {
    fn emit(&mut self, description: String, focus: usize) {
        self.rec.snapshot(
            description,
            MergeSortSnapshot {
                phase: self.nodes[focus].phase,
                depth: self.nodes[focus].depth,
                nodes: self.nodes.clone(),
                root: 0,
                focus,
            },
        );
    }

    fn sort(&mut self, segment: &[i64], depth: usize) -> (usize, Vec<i64>) {
        let idx = self.nodes.len();
        self.nodes.push(MergeNode {
            depth,
            segment: segment.to_vec(),
            left: None,
            right: None,
            phase: Phase::Divide,
            merged: None,
            left_seg: None,
            right_seg: None,
        });

        if segment.len() <= 1 {
            self.nodes[idx].phase = Phase::Conquer;
            self.emit(
                format!("Base case: segment [{}] is already sorted.", join(segment)),
                idx,
            );
            return (idx, segment.to_vec());
        }

        let mid = segment.len() / 2;
        self.emit(
            format!(
                "Divide: split segment [{}] at mid = {mid}.",
                join(segment)
            ),
            idx,
        );

        let (left_idx, left_sorted) = self.sort(&segment[..mid], depth + 1);
        self.nodes[idx].left = Some(left_idx);
        let (right_idx, right_sorted) = self.sort(&segment[mid..], depth + 1);
        self.nodes[idx].right = Some(right_idx);

        self.nodes[idx].left_seg = Some(left_sorted.clone());
        self.nodes[idx].right_seg = Some(right_sorted.clone());
        self.nodes[idx].phase = Phase::Conquer;
        self.emit(
            format!(
                "Conquer: both halves solved => left [{}], right [{}].",
                join(&left_sorted),
                join(&right_sorted)
            ),
            idx,
        );

        self.nodes[idx].phase = Phase::Merge;
        let mut merged = Vec::with_capacity(segment.len());
        let (mut i, mut j) = (0, 0);
        while i < left_sorted.len() || j < right_sorted.len() {
            // Ties take from the left segment, keeping the merge stable.
            let take_left = j >= right_sorted.len()
                || (i < left_sorted.len() && left_sorted[i] <= right_sorted[j]);
            if take_left {
                merged.push(left_sorted[i]);
                i += 1;
            } else {
                merged.push(right_sorted[j]);
                j += 1;
            }
            let mut partial = merged.clone();
            partial.extend_from_slice(&left_sorted[i..]);
            partial.extend_from_slice(&right_sorted[j..]);
            self.nodes[idx].merged = Some(partial.clone());
            self.emit(
                format!(
                    "Merge: building [{}]; chose next from {} segment.",
                    join(&partial),
                    if take_left { "left" } else { "right" }
                ),
                idx,
            );
        }
        self.nodes[idx].segment = merged.clone();

        (idx, merged)
    }
}

fn regroup_by_phase(seq: FrameSequence<MergeSortSnapshot>) -> FrameSequence<MergeSortSnapshot> {
    let mut divides = Vec::new();
    let mut conquers = Vec::new();
    let mut merges = Vec::new();
    for frame in seq.into_frames() {
        match frame.snapshot.phase {
            Phase::Divide => divides.push(frame),
            Phase::Conquer => conquers.push(frame),
            Phase::Merge => merges.push(frame),
        }
    }
    divides.extend(conquers);
    divides.extend(merges);
    FrameSequence::renumbered(divides)
}

#[tracing::instrument(skip(array))]
pub fn run(
    array: &[i64],
    ordering: FrameOrdering,
) -> StepreelResult<FrameSequence<MergeSortSnapshot>> {
    if array.is_empty() {
        return Err(StepreelError::validation("array must be non-empty"));
    }

    let mut run = Run {
        rec: Recorder::new(),
        nodes: Vec::new(),
    };
    let (root, sorted) = run.sort(array, 0);
    run.nodes[root].phase = Phase::Merge;
    run.emit(format!("Complete: array sorted → [{}].", join(&sorted)), root);

    tracing::debug!(
        frames = run.rec.len(),
        nodes = run.nodes.len(),
        ?ordering,
        "merge-sort frame sequence built"
    );

    let seq = run.rec.finish();
    Ok(match ordering {
        FrameOrdering::Dfs => seq,
        FrameOrdering::Phase => regroup_by_phase(seq),
    })
}
