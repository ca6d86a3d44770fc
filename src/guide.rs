//! # Stepreel guide (v0.1.0)
//!
//! This module is a standalone walkthrough of Stepreel's architecture and public API.
//! If you are looking for copy/paste commands, start with the repository `README.md`.
//! If you are implementing new features, start here.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`Frame`](crate::Frame): one recorded instant of a run: a step number, a human
//!   narration line, and a value-copied state snapshot
//! - [`FrameSequence`](crate::FrameSequence): the ordered, immutable-once-built frame
//!   list from one complete run
//! - [`Recorder`](crate::Recorder): the single construction point for frames; `step`
//!   equals the frame's index by construction
//! - [`Graph`](crate::Graph): the problem instance for the five graph runners
//! - [`Player`](crate::Player): VCR-style playback over any frame sequence
//! - [`FrameFingerprint`](crate::FrameFingerprint): structural hash used by the
//!   determinism tests
//!
//! The execution model is explicitly staged:
//!
//! 1. Build a problem instance ([`Graph`](crate::Graph) or an integer array)
//! 2. Run an instrumented algorithm ([`dijkstra::run`](crate::dijkstra::run),
//!    [`bellman_ford::run`](crate::bellman_ford::run), [`prim::run`](crate::prim::run),
//!    [`kosaraju::run`](crate::kosaraju::run), [`kahn::run`](crate::kahn::run), or
//!    [`merge_sort::run`](crate::merge_sort::run)) to completion, recording a frame at
//!    every semantically meaningful step
//! 3. Load the finished sequence into a [`Player`](crate::Player) and navigate it
//!
//! Nothing executes incrementally: stepping through frames is array indexing over
//! history, never resuming a paused algorithm. Rerunning a runner on the same input
//! yields an identical sequence, which [`fingerprint_frames`](crate::fingerprint_frames)
//! makes checkable.
//!
//! ---
//!
//! ## Snapshots are value copies (and why)
//!
//! Runners never hand out references into their working state. Every map, set, and list
//! reaching a [`Frame`](crate::Frame) is cloned at emission time, so mutating live state
//! after a frame is recorded can never change that frame. This is the invariant that
//! makes backward stepping trivial and playback state-free.
//!
//! Determinism leans on ordered containers: vertex-keyed state lives in `BTreeMap` /
//! `BTreeSet`, adjacency lists preserve edge insertion order, and DFS roots and queue
//! ties resolve by ascending vertex id. Unreachable distances are `Option<i64>` with
//! `None` as the infinity sentinel.
//!
//! ---
//!
//! ## Failure is data
//!
//! A negative cycle (Bellman-Ford) or a structural cycle (Kahn) does not abort the run.
//! The runner records what it saw, flags the terminal frame, and returns a complete
//! sequence; only malformed input (unknown source vertex, empty array, self-loop) is an
//! [`StepreelError`](crate::StepreelError).
//!
//! ---
//!
//! ## Playback without a timer
//!
//! [`Player`](crate::Player) models autoplay without owning a clock. `play()` returns a
//! [`TickHandle`](crate::TickHandle); the caller schedules one timeout of
//! [`tick_delay`](crate::Player::tick_delay) and passes the handle back through
//! [`tick`](crate::Player::tick). Any intervening state change (pause, manual step,
//! speed change, reload) invalidates the handle, so a timeout that was logically
//! cancelled resolves to [`TickOutcome::Stale`](crate::TickOutcome::Stale) instead of
//! advancing a session it no longer belongs to.
//!
//! ```rust
//! use stepreel::{dijkstra, Edge, Graph, Player, TickOutcome};
//!
//! # fn main() -> stepreel::StepreelResult<()> {
//! let graph = Graph::new(
//!     vec!["A".to_string(), "B".to_string(), "C".to_string()],
//!     vec![Edge::new("A", "B", 4), Edge::new("A", "C", 2), Edge::new("C", "B", 1)],
//! )?;
//!
//! let mut player = Player::new();
//! player.load(dijkstra::run(&graph, "A")?);
//!
//! let mut handle = player.play().expect("loaded and not at end");
//! loop {
//!     match player.tick(handle) {
//!         TickOutcome::Advanced(next) => handle = next,
//!         TickOutcome::Finished | TickOutcome::Stale => break,
//!     }
//! }
//! assert!(player.is_at_end());
//! # Ok(())
//! # }
//! ```
