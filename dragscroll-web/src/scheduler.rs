//! Browser frame and timer scheduling.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
    time::Duration,
};

use dragscroll::{
    FrameScheduler,
    scheduler::{FrameHandle, Task, TimerHandle},
};
use gloo::{
    render::{AnimationFrame, request_animation_frame},
    timers::callback::Timeout,
};
use web_time::Instant;

#[derive(Default)]
struct Pending {
    next_id: Cell<u64>,
    frames: RefCell<HashMap<u64, AnimationFrame>>,
    timers: RefCell<HashMap<u64, Timeout>>,
}

impl Pending {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get().wrapping_add(1);
        self.next_id.set(id);
        id
    }
}

/// [`FrameScheduler`] over `requestAnimationFrame` and `setTimeout`.
///
/// Pending handles are kept until their callback runs; dropping the
/// scheduler cancels everything still queued.
#[derive(Clone, Default)]
pub struct AnimationFrameScheduler {
    pending: Rc<Pending>,
}

impl AnimationFrameScheduler {
    /// Creates a scheduler with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn request_frame(&self, task: Task) -> FrameHandle {
        let id = self.pending.next_id();
        let weak: Weak<Pending> = Rc::downgrade(&self.pending);
        let frame = request_animation_frame(move |_| {
            if let Some(pending) = weak.upgrade() {
                pending.frames.borrow_mut().remove(&id);
            }
            task();
        });
        self.pending.frames.borrow_mut().insert(id, frame);
        FrameHandle(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let frame = self.pending.frames.borrow_mut().remove(&handle.0);
        drop(frame);
    }

    fn set_timeout(&self, delay: Duration, task: Task) -> TimerHandle {
        let id = self.pending.next_id();
        let weak: Weak<Pending> = Rc::downgrade(&self.pending);
        let timeout = Timeout::new(timeout_millis(delay), move || {
            if let Some(pending) = weak.upgrade() {
                pending.timers.borrow_mut().remove(&id);
            }
            task();
        });
        self.pending.timers.borrow_mut().insert(id, timeout);
        TimerHandle(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        let timeout = self.pending.timers.borrow_mut().remove(&handle.0);
        drop(timeout);
    }
}

impl fmt::Debug for AnimationFrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationFrameScheduler")
            .field("pending_frames", &self.pending.frames.borrow().len())
            .field("pending_timers", &self.pending.timers.borrow().len())
            .finish()
    }
}

/// `setTimeout` takes whole milliseconds as a `u32`.
fn timeout_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}
