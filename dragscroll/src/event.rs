//! Pointer-move events and listener registration.
//!
//! The monitor listens on two targets, the container itself and the document
//! body, over two channels: drag-over (mouse-driven HTML5 drag) and
//! touch-move. Touch-move events do not reliably reach sibling elements
//! during a touch drag, which is why the body is involved at all.
//!
//! Every registration returns a [`Subscription`] guard; dropping it removes
//! the listener.

use std::{fmt, rc::Rc};

use crate::geometry::Point;

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    /// The scroll container.
    Container,
    /// The document body.
    Body,
}

/// Which kind of move event a listener receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveChannel {
    /// Drag-over events of a mouse-driven drag.
    DragOver,
    /// Touch-move events.
    TouchMove,
}

impl MoveChannel {
    /// The DOM event type name for this channel.
    pub fn event_type(self) -> &'static str {
        match self {
            Self::DragOver => "dragover",
            Self::TouchMove => "touchmove",
        }
    }
}

/// A pointer-move event, already resolved to viewport coordinates.
///
/// Hosts derive `position` from the client coordinates of mouse/drag events
/// and from the first touch point of touch events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEvent {
    /// The channel the event arrived on.
    pub channel: MoveChannel,
    /// The pointer position.
    pub position: Point,
}

impl MoveEvent {
    /// Creates a drag-over event at `position`.
    pub fn drag_over(position: Point) -> Self {
        Self {
            channel: MoveChannel::DragOver,
            position,
        }
    }

    /// Creates a touch-move event at `position`.
    pub fn touch_move(position: Point) -> Self {
        Self {
            channel: MoveChannel::TouchMove,
            position,
        }
    }
}

/// Shared move-event handler.
pub type MoveHandler = Rc<dyn Fn(&MoveEvent)>;

/// RAII guard for a listener or subscription.
///
/// The release closure runs exactly once, either through
/// [`Subscription::release`] or on drop.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Creates a guard that runs `release` when dropped.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Creates a guard that keeps `guard` alive and drops it on release.
    ///
    /// Useful for platform types that already unregister on drop.
    pub fn from_guard<G: 'static>(guard: G) -> Self {
        Self::new(move || drop(guard))
    }

    /// A guard with nothing to release.
    pub fn empty() -> Self {
        Self { release: None }
    }

    /// Releases the underlying registration now.
    pub fn release(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Registers move-event listeners on the container and the document body.
pub trait EventHost {
    /// Calls `handler` for every `channel` event dispatched on `target` until
    /// the returned guard is dropped.
    fn listen(&self, target: ListenTarget, channel: MoveChannel, handler: MoveHandler)
    -> Subscription;
}
