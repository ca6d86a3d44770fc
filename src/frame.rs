//! The frame model: immutable state snapshots and the recorder that emits them.
//!
//! A [`Frame`] is a plain serializable value object. Runners never hand out references
//! to their working state; every container reaching a frame is a value copy, so mutating
//! live state after emission can never change an emitted frame.

/// One recorded instant of an algorithm run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Frame<S> {
    /// Position in the sequence; always equals the frame's index.
    pub step: usize,
    /// Narration built from live state at emission time.
    pub description: String,
    /// Algorithm-specific state copy (phase tag, maps, sets, highlights).
    pub snapshot: S,
}

/// An ordered, immutable-once-built frame list from one complete run.
///
/// Rebuilt wholesale on every input change; never mutated in place.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(transparent)]
pub struct FrameSequence<S> {
    frames: Vec<Frame<S>>,
}

impl<S> Default for FrameSequence<S> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<S> FrameSequence<S> {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame<S>> {
        self.frames.get(index)
    }

    pub fn first(&self) -> Option<&Frame<S>> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&Frame<S>> {
        self.frames.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame<S>> {
        self.frames.iter()
    }

    pub fn frames(&self) -> &[Frame<S>] {
        &self.frames
    }

    /// Rebuilds a sequence from reordered frames, renumbering `step` to match the new
    /// positions. Used by pure post-run reorderings (merge-sort's phase grouping).
    pub(crate) fn renumbered(mut frames: Vec<Frame<S>>) -> Self {
        for (i, frame) in frames.iter_mut().enumerate() {
            frame.step = i;
        }
        Self { frames }
    }

    pub(crate) fn into_frames(self) -> Vec<Frame<S>> {
        self.frames
    }
}

impl<'a, S> IntoIterator for &'a FrameSequence<S> {
    type Item = &'a Frame<S>;
    type IntoIter = std::slice::Iter<'a, Frame<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Owns the growing frame list during a run.
///
/// The single construction point for frames: `snapshot` assigns `step = len`, so the
/// step-equals-index invariant holds by construction. No frame is edited or deleted
/// after emission.
pub struct Recorder<S> {
    frames: Vec<Frame<S>>,
}

impl<S> Recorder<S> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn snapshot(&mut self, description: impl Into<String>, snapshot: S) {
        self.frames.push(Frame {
            step: self.frames.len(),
            description: description.into(),
            snapshot,
        });
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn finish(self) -> FrameSequence<S> {
        FrameSequence {
            frames: self.frames,
        }
    }
}

impl<S> Default for Recorder<S> {
    fn default() -> Self {
        Self::new()
    }
}
