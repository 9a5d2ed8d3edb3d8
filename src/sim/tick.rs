//! Frame-driven tick loop
//!
//! [`tick`] advances a session by one frame. [`TickLoop`] owns the frame
//! handle an external scheduler uses, so cancelling is immediate: a frame
//! presented with a stale handle does nothing.

use super::state::FillSession;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Spout picked this frame (out-of-range indices are ignored)
    pub select_spout: Option<usize>,
    /// Drop a particle from the selected spout
    pub drop: bool,
    /// Start a new round
    pub reset: bool,
}

/// Advance the session by one frame.
///
/// A reset is applied alone. A won session ignores everything else.
pub fn tick(session: &mut FillSession, input: &TickInput) {
    if input.reset {
        session.reset();
        return;
    }
    if session.is_won() {
        return;
    }

    if let Some(index) = input.select_spout {
        session.select_spout(index);
    }
    if input.drop {
        session.drop_particle();
    }
    session.step();
}

/// Token for one run of the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Owner of the active frame handle
#[derive(Debug, Default)]
pub struct TickLoop {
    issued: u64,
    active: Option<FrameHandle>,
}

impl TickLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh handle, invalidating any previous one
    pub fn start(&mut self) -> FrameHandle {
        self.issued += 1;
        let handle = FrameHandle(self.issued);
        self.active = Some(handle);
        handle
    }

    /// Invalidate `handle`. Stale handles are ignored.
    pub fn cancel(&mut self, handle: FrameHandle) {
        if self.active == Some(handle) {
            self.active = None;
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Run one frame if `handle` is still live. Returns whether it ran.
    ///
    /// The loop cancels itself when the session is won.
    pub fn run_frame(
        &mut self,
        handle: FrameHandle,
        session: &mut FillSession,
        input: &TickInput,
    ) -> bool {
        if self.active != Some(handle) {
            return false;
        }
        tick(session, input);
        if session.is_won() {
            log::info!("Tick loop stopped: session won");
            self.cancel(handle);
        }
        true
    }
}
