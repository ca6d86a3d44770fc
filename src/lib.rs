#![forbid(unsafe_code)]

pub mod bellman_ford;
pub mod dijkstra;
pub mod error;
pub mod fingerprint;
pub mod frame;
pub mod graph;
pub mod guide;
pub mod input;
pub mod kahn;
pub mod kosaraju;
pub mod merge_sort;
pub mod playback;
pub mod prim;

pub use error::{StepreelError, StepreelResult};
pub use fingerprint::{FrameFingerprint, fingerprint_frames};
pub use frame::{Frame, FrameSequence, Recorder};
pub use graph::{Edge, Graph};
pub use input::parse_int_list;
pub use merge_sort::FrameOrdering;
pub use playback::{Player, TickHandle, TickOutcome, Transport};
