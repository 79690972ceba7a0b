//! dragscroll scrolls a container automatically while a drag gesture hovers
//! near its edges.
//!
//! # Strength functions
//!
//! How hard to scroll is decided per axis by a strength function. It maps
//! the container's bounding box and the pointer position to a value in
//! `[-1, 1]`: negative scrolls towards the origin, positive away from it.
//! The built-in functions use a linear buffer zone along each edge.
//!
//! ```
//! use dragscroll::{
//!     geometry::{Point, Rect},
//!     strength::{create_horizontal_strength, create_vertical_strength},
//! };
//!
//! let rect = Rect::new(0.0, 0.0, 600.0, 600.0);
//! let horizontal = create_horizontal_strength(150.0);
//! let vertical = create_vertical_strength(150.0);
//!
//! assert_eq!(horizontal.call(&rect, &Point::new(0.0, 300.0)), -1.0);
//! assert_eq!(vertical.call(&rect, &Point::new(300.0, 600.0)), 1.0);
//! assert_eq!(vertical.call(&rect, &Point::new(300.0, 300.0)), 0.0);
//! ```
//!
//! Any closure `Fn(&Rect, &Point) -> f64` works as a strength function too.
//!
//! # Monitor
//!
//! A [`ScrollingMonitor`] watches one container. It needs four
//! collaborators, each behind a trait so the monitor runs the same in a
//! browser and in tests:
//!
//! - a [`ScrollContainer`] that reports geometry and accepts offsets,
//! - an [`EventHost`] that delivers drag-over and touch-move events,
//! - a [`FrameScheduler`] for frame callbacks and timers,
//! - a [`DragStateSource`] that knows whether a drag is in progress.
//!
//! ```rust,ignore
//! let monitor = ScrollingMonitor::builder(container)
//!     .event_host(host)
//!     .scheduler(scheduler)
//!     .drag_source(drag_state)
//!     .options(ScrollOptions::default().strength_multiplier(40.0))
//!     .build()?;
//! monitor.start();
//! // ...
//! monitor.stop();
//! ```
//!
//! The `testing` feature exposes in-memory implementations of all four
//! traits with a manually driven clock.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod callback;
pub mod container;
pub mod drag;
pub mod error;
pub mod event;
pub mod geometry;
mod monitor;
pub mod options;
pub mod scheduler;
pub mod strength;
pub mod throttle;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use web_time;

pub use crate::{
    callback::{ScrollChangeFn, StrengthFn},
    container::{ScrollContainer, ScrollMetrics},
    drag::{DragFlag, DragStateSource},
    error::{MonitorError, Result},
    event::{EventHost, ListenTarget, MoveChannel, MoveEvent, Subscription},
    geometry::{Point, Rect, Strength},
    monitor::{MonitorBuilder, ScrollingMonitor, attach_scrolling},
    options::ScrollOptions,
    scheduler::FrameScheduler,
    strength::{create_horizontal_strength, create_vertical_strength},
    throttle::ThrottleEdge,
};
