//! Drag-state sources.
//!
//! The monitor does not detect drags itself. It asks a [`DragStateSource`]
//! whether a drag is in progress and subscribes to its change
//! notifications. [`DragFlag`] is a minimal observable implementation for
//! embedders that track drags on their own.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use slotmap::{DefaultKey, SlotMap};
use tracing::trace;

use crate::event::Subscription;

/// Change listener registered with a [`DragStateSource`].
pub type DragListener = Rc<dyn Fn()>;

/// Reports whether a drag gesture is active and notifies on changes.
pub trait DragStateSource {
    /// Returns `true` while a drag is in progress.
    fn is_dragging(&self) -> bool;

    /// Calls `listener` after every change of the dragging state until the
    /// returned guard is dropped.
    fn subscribe(&self, listener: DragListener) -> Subscription;
}

#[derive(Default)]
struct DragFlagInner {
    dragging: Cell<bool>,
    listeners: RefCell<SlotMap<DefaultKey, DragListener>>,
}

/// Observable boolean drag state.
///
/// Cloning yields another handle to the same flag.
///
/// ```
/// use std::{cell::Cell, rc::Rc};
/// use dragscroll::drag::{DragFlag, DragStateSource};
///
/// let flag = DragFlag::new();
/// let changes = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&changes);
/// let _subscription = flag.subscribe(Rc::new(move || counter.set(counter.get() + 1)));
///
/// flag.set_dragging(true);
/// flag.set_dragging(true);
/// assert!(flag.is_dragging());
/// assert_eq!(changes.get(), 1);
/// ```
#[derive(Clone, Default)]
pub struct DragFlag {
    inner: Rc<DragFlagInner>,
}

impl DragFlag {
    /// Creates a flag in the not-dragging state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the state, notifying subscribers if it changed.
    pub fn set_dragging(&self, dragging: bool) {
        if self.inner.dragging.replace(dragging) == dragging {
            return;
        }
        trace!(dragging, "drag state changed");

        // Listeners may subscribe or unsubscribe while being notified.
        let listeners: Vec<DragListener> =
            self.inner.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener();
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl DragStateSource for DragFlag {
    fn is_dragging(&self) -> bool {
        self.inner.dragging.get()
    }

    fn subscribe(&self, listener: DragListener) -> Subscription {
        let key = self.inner.listeners.borrow_mut().insert(listener);
        let weak: Weak<DragFlagInner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().remove(key);
            }
        })
    }
}

impl fmt::Debug for DragFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragFlag")
            .field("dragging", &self.inner.dragging.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
