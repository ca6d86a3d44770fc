//! VCR-style playback over an opaque frame sequence.
//!
//! The player never owns a timer. `play()` hands the caller a [`TickHandle`]; the caller
//! schedules one timeout of [`Player::tick_delay`] and passes the handle back through
//! [`Player::tick`] when it fires. Every state change invalidates the outstanding handle,
//! so a timeout that was logically cancelled (pause, manual step, speed change, reload)
//! resolves to [`TickOutcome::Stale`] instead of advancing a session it no longer belongs
//! to. At most one handle is valid at any time.

use std::time::Duration;

use crate::frame::{Frame, FrameSequence};

pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

const MIN_SPEED: f64 = 0.25;
const MAX_SPEED: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// No frames loaded.
    Idle,
    /// Frames loaded, not advancing.
    Paused,
    /// Auto-advancing; exactly one tick is pending.
    Playing,
}

/// Proof that a scheduled tick is still current. Not constructible by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Advanced one frame; schedule the next tick with the returned handle.
    Advanced(TickHandle),
    /// Advanced onto the last frame; playback paused itself.
    Finished,
    /// The handle was superseded; ignore this tick.
    Stale,
}

pub struct Player<S> {
    frames: FrameSequence<S>,
    index: usize,
    transport: Transport,
    speed: f64,
    base_delay: Duration,
    generation: u64,
}

impl<S> Player<S> {
    pub fn new() -> Self {
        Self {
            frames: FrameSequence::default(),
            index: 0,
            transport: Transport::Idle,
            speed: 1.0,
            base_delay: DEFAULT_BASE_DELAY,
            generation: 0,
        }
    }

    pub fn with_base_delay(base_delay: Duration) -> Self {
        Self {
            base_delay,
            ..Self::new()
        }
    }

    /// Installs a freshly built sequence, cancelling any pending tick and resetting to
    /// frame 0. An empty sequence leaves the player idle.
    pub fn load(&mut self, frames: FrameSequence<S>) {
        self.invalidate();
        self.frames = frames;
        self.index = 0;
        self.transport = if self.frames.is_empty() {
            Transport::Idle
        } else {
            Transport::Paused
        };
    }

    pub fn current(&self) -> Option<&Frame<S>> {
        self.frames.get(self.index)
    }

    pub fn frames(&self) -> &FrameSequence<S> {
        &self.frames
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_at_end(&self) -> bool {
        !self.frames.is_empty() && self.index == self.frames.len() - 1
    }

    /// Delay until the next autoplay tick at the current speed.
    pub fn tick_delay(&self) -> Duration {
        self.base_delay.div_f64(self.speed)
    }

    /// Manual step forward. Pauses playback; a no-op (returning false) at the end.
    pub fn step_forward(&mut self) -> bool {
        self.invalidate();
        if self.transport == Transport::Playing {
            self.transport = Transport::Paused;
        }
        if !self.frames.is_empty() && self.index + 1 < self.frames.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Manual step back. Pauses playback; a no-op (returning false) at the start.
    pub fn step_back(&mut self) -> bool {
        self.invalidate();
        if self.transport == Transport::Playing {
            self.transport = Transport::Paused;
        }
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Clamped seek. Pauses playback.
    pub fn goto_step(&mut self, step: usize) {
        self.invalidate();
        if self.transport == Transport::Playing {
            self.transport = Transport::Paused;
        }
        if !self.frames.is_empty() {
            self.index = step.min(self.frames.len() - 1);
        }
    }

    /// Starts autoplay. Returns the handle for the first tick, or `None` when there is
    /// nothing to advance (idle, already playing, or already on the last frame).
    pub fn play(&mut self) -> Option<TickHandle> {
        if self.transport != Transport::Paused || self.is_at_end() || self.frames.is_empty() {
            return None;
        }
        self.transport = Transport::Playing;
        Some(self.next_handle())
    }

    pub fn pause(&mut self) {
        self.invalidate();
        if self.transport == Transport::Playing {
            self.transport = Transport::Paused;
        }
    }

    /// Back to frame 0, paused, keeping the loaded frames (unlike `load`).
    pub fn reset(&mut self) {
        self.invalidate();
        self.index = 0;
        if self.transport == Transport::Playing {
            self.transport = Transport::Paused;
        }
    }

    /// Clamps the speed multiplier to `[0.25, 4.0]`. When playing, the pending tick is
    /// cancelled and a replacement handle (to be scheduled at the new delay) is returned.
    pub fn set_speed(&mut self, speed: f64) -> Option<TickHandle> {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.invalidate();
        if self.transport == Transport::Playing {
            Some(self.next_handle())
        } else {
            None
        }
    }

    /// Resolves a fired timer. Advances one frame if the handle is still current;
    /// reaching the last frame pauses playback (termination, not an error).
    pub fn tick(&mut self, handle: TickHandle) -> TickOutcome {
        if self.transport != Transport::Playing || handle.0 != self.generation {
            return TickOutcome::Stale;
        }
        self.index += 1;
        if self.is_at_end() {
            self.invalidate();
            self.transport = Transport::Paused;
            TickOutcome::Finished
        } else {
            TickOutcome::Advanced(self.next_handle())
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    fn next_handle(&mut self) -> TickHandle {
        self.generation += 1;
        TickHandle(self.generation)
    }
}

impl<S> Default for Player<S> {
    fn default() -> Self {
        Self::new()
    }
}
