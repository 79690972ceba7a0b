//! Frame and timer scheduling used by the monitor.
//!
//! The tick loop runs on a display-refresh aligned schedule obtained from
//! [`FrameScheduler::request_frame`]; the recompute throttle closes its
//! windows through [`FrameScheduler::set_timeout`]. Both return opaque
//! handles that can be cancelled. Cancelling a handle whose callback has
//! already run must be a no-op.

use std::time::Duration;

use web_time::Instant;

/// Handle of a pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Handle of a pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Callback run by a scheduler.
pub type Task = Box<dyn FnOnce()>;

/// Source of time, frames and timeouts for a single-threaded event loop.
pub trait FrameScheduler {
    /// The current time.
    fn now(&self) -> Instant;

    /// Runs `task` before the next repaint.
    fn request_frame(&self, task: Task) -> FrameHandle;

    /// Cancels a frame callback that has not run yet.
    fn cancel_frame(&self, handle: FrameHandle);

    /// Runs `task` once after `delay`.
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerHandle;

    /// Cancels a timeout that has not fired yet.
    fn clear_timeout(&self, handle: TimerHandle);
}
