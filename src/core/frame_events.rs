//! Render-loop hook events.
//!
//! The host dispatches one `FrameTickEvent` per rendered frame on the bus the
//! inspector was enabled with. Anything that needs periodic work subscribes to it.

/// One tick of the host's render loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTickEvent {
    /// Monotonic frame counter
    pub frame: u64,
    /// Seconds since the host started
    pub time: f64,
}
