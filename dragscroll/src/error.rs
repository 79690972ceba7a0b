//! Errors reported while setting up a monitor.
//!
//! Only configuration problems are errors. Geometry that disappears during
//! a live drag is absorbed by the monitor as a no-op.

use thiserror::Error;

/// Setup failures of a [`ScrollingMonitor`](crate::ScrollingMonitor).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    /// No drag-state source was supplied.
    #[error("no drag-state source configured; pass one to the monitor builder")]
    MissingDragSource,
    /// No event host was supplied.
    #[error("no event host configured; pass one to the monitor builder")]
    MissingEventHost,
    /// No frame scheduler was supplied.
    #[error("no frame scheduler configured; pass one to the monitor builder")]
    MissingScheduler,
    /// The strength multiplier is infinite or NaN.
    #[error("strength multiplier must be finite, got {0}")]
    InvalidMultiplier(f64),
}

/// Result alias for monitor setup.
pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
