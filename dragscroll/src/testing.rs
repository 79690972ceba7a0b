//! Deterministic stand-ins for the platform collaborators.
//!
//! These fakes let the monitor run without a browser: a container with
//! settable geometry, an event host that dispatches synthetic move events,
//! and a scheduler with a virtual clock whose frames and timers only run
//! when the test says so. All of them are cheap handles; clones share state.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
    time::Duration,
};

use slotmap::{DefaultKey, SlotMap};
use web_time::Instant;

use crate::{
    container::{ScrollContainer, ScrollMetrics},
    event::{EventHost, ListenTarget, MoveChannel, MoveEvent, MoveHandler, Subscription},
    geometry::Rect,
    scheduler::{FrameHandle, FrameScheduler, Task, TimerHandle},
};

#[derive(Debug)]
struct ContainerState {
    rect: Option<Rect>,
    metrics: Option<ScrollMetrics>,
    writes: usize,
}

/// In-memory scroll container.
#[derive(Clone)]
pub struct FakeContainer {
    state: Rc<RefCell<ContainerState>>,
}

impl FakeContainer {
    /// Creates a mounted container with the given bounds and metrics.
    pub fn new(rect: Rect, metrics: ScrollMetrics) -> Self {
        Self {
            state: Rc::new(RefCell::new(ContainerState {
                rect: Some(rect),
                metrics: Some(metrics),
                writes: 0,
            })),
        }
    }

    /// A `w`×`h` container at the origin whose content is
    /// `content_w`×`content_h`, scrolled to `(0, 0)`.
    pub fn sized(w: i32, h: i32, content_w: i32, content_h: i32) -> Self {
        Self::new(
            Rect::new(0.0, 0.0, f64::from(w), f64::from(h)),
            ScrollMetrics {
                scroll_left: 0,
                scroll_top: 0,
                scroll_width: content_w,
                scroll_height: content_h,
                client_width: w,
                client_height: h,
            },
        )
    }

    /// Replaces the bounding box.
    pub fn set_rect(&self, rect: Rect) {
        self.state.borrow_mut().rect = Some(rect);
    }

    /// Moves the scroll offsets without counting it as a monitor write.
    pub fn scroll_to(&self, left: i32, top: i32) {
        if let Some(metrics) = self.state.borrow_mut().metrics.as_mut() {
            metrics.scroll_left = left;
            metrics.scroll_top = top;
        }
    }

    /// Simulates the element leaving the document.
    pub fn unmount(&self) {
        let mut state = self.state.borrow_mut();
        state.rect = None;
        state.metrics = None;
    }

    /// Current metrics, if mounted.
    pub fn metrics(&self) -> Option<ScrollMetrics> {
        self.state.borrow().metrics
    }

    /// Current `(scroll_left, scroll_top)`, or `(0, 0)` when unmounted.
    pub fn offset(&self) -> (i32, i32) {
        self.metrics()
            .map(|metrics| (metrics.scroll_left, metrics.scroll_top))
            .unwrap_or_default()
    }

    /// Number of scroll offset assignments made through [`ScrollContainer`].
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }
}

impl ScrollContainer for FakeContainer {
    fn bounding_rect(&self) -> Option<Rect> {
        self.state.borrow().rect
    }

    fn scroll_metrics(&self) -> Option<ScrollMetrics> {
        self.state.borrow().metrics
    }

    fn set_scroll_left(&self, left: i32) {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        if let Some(metrics) = state.metrics.as_mut() {
            metrics.scroll_left = left;
        }
    }

    fn set_scroll_top(&self, top: i32) {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        if let Some(metrics) = state.metrics.as_mut() {
            metrics.scroll_top = top;
        }
    }
}

impl fmt::Debug for FakeContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FakeContainer").field(&self.state.borrow()).finish()
    }
}

struct Registration {
    target: ListenTarget,
    channel: MoveChannel,
    handler: MoveHandler,
}

/// Event host that dispatches synthetic move events.
#[derive(Clone, Default)]
pub struct FakeEventHost {
    listeners: Rc<RefCell<SlotMap<DefaultKey, Registration>>>,
}

impl FakeEventHost {
    /// Creates a host with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to the listeners on `target` for its channel.
    pub fn dispatch(&self, target: ListenTarget, event: MoveEvent) {
        let handlers: Vec<MoveHandler> = self
            .listeners
            .borrow()
            .values()
            .filter(|registration| {
                registration.target == target && registration.channel == event.channel
            })
            .map(|registration| Rc::clone(&registration.handler))
            .collect();
        for handler in handlers {
            handler(&event);
        }
    }

    /// Delivers `event` to the container and then lets it bubble to the body.
    pub fn dispatch_on_container(&self, event: MoveEvent) {
        self.dispatch(ListenTarget::Container, event);
        self.dispatch(ListenTarget::Body, event);
    }

    /// Number of live listeners for `target` and `channel`.
    pub fn listener_count(&self, target: ListenTarget, channel: MoveChannel) -> usize {
        self.listeners
            .borrow()
            .values()
            .filter(|registration| registration.target == target && registration.channel == channel)
            .count()
    }

    /// Number of live listeners overall.
    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl EventHost for FakeEventHost {
    fn listen(
        &self,
        target: ListenTarget,
        channel: MoveChannel,
        handler: MoveHandler,
    ) -> Subscription {
        let key = self.listeners.borrow_mut().insert(Registration {
            target,
            channel,
            handler,
        });
        let weak: Weak<RefCell<SlotMap<DefaultKey, Registration>>> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.borrow_mut().remove(key);
            }
        })
    }
}

impl fmt::Debug for FakeEventHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeEventHost")
            .field("listeners", &self.total_listeners())
            .finish()
    }
}

struct SchedulerState {
    origin: Instant,
    elapsed: Duration,
    next_id: u64,
    frames: Vec<(u64, Task)>,
    timers: Vec<(u64, Duration, Task)>,
    frames_run: usize,
}

/// Scheduler driven by the test: frames run on [`ManualScheduler::run_frame`],
/// timers fire as [`ManualScheduler::advance`] moves the virtual clock.
#[derive(Clone)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    /// Creates a scheduler whose clock starts now.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SchedulerState {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
                next_id: 1,
                frames: Vec::new(),
                timers: Vec::new(),
                frames_run: 0,
            })),
        }
    }

    /// Time elapsed on the virtual clock.
    pub fn elapsed(&self) -> Duration {
        self.state.borrow().elapsed
    }

    /// Number of frame callbacks waiting for the next frame.
    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Number of timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Total frame callbacks executed so far.
    pub fn frames_run(&self) -> usize {
        self.state.borrow().frames_run
    }

    /// Runs every frame callback queued before this call.
    ///
    /// Callbacks requested while running are deferred to the next frame.
    /// Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let frames = std::mem::take(&mut self.state.borrow_mut().frames);
        let count = frames.len();
        for (_, task) in frames {
            self.state.borrow_mut().frames_run += 1;
            task();
        }
        count
    }

    /// Runs `count` frames, returning the number of callbacks executed.
    pub fn run_frames(&self, count: usize) -> usize {
        (0..count).map(|_| self.run_frame()).sum()
    }

    /// Advances the clock by `delta`, firing due timers in deadline order.
    pub fn advance(&self, delta: Duration) {
        let target = self.state.borrow().elapsed + delta;
        loop {
            let due = {
                let mut state = self.state.borrow_mut();
                let next = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, deadline, _))| *deadline <= target)
                    .min_by_key(|(_, (id, deadline, _))| (*deadline, *id))
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let (_, deadline, task) = state.timers.remove(index);
                        state.elapsed = state.elapsed.max(deadline);
                        Some(task)
                    }
                    None => {
                        state.elapsed = target;
                        None
                    }
                }
            };
            match due {
                Some(task) => task(),
                None => break,
            }
        }
    }

    fn next_id(&self) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        id
    }
}

impl FrameScheduler for ManualScheduler {
    fn now(&self) -> Instant {
        let state = self.state.borrow();
        state.origin + state.elapsed
    }

    fn request_frame(&self, task: Task) -> FrameHandle {
        let id = self.next_id();
        self.state.borrow_mut().frames.push((id, task));
        FrameHandle(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.state
            .borrow_mut()
            .frames
            .retain(|(id, _)| *id != handle.0);
    }

    fn set_timeout(&self, delay: Duration, task: Task) -> TimerHandle {
        let id = self.next_id();
        let mut state = self.state.borrow_mut();
        let deadline = state.elapsed + delay;
        state.timers.push((id, deadline, task));
        TimerHandle(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.state
            .borrow_mut()
            .timers
            .retain(|(id, _, _)| *id != handle.0);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualScheduler")
            .field("elapsed", &state.elapsed)
            .field("pending_frames", &state.frames.len())
            .field("pending_timers", &state.timers.len())
            .finish()
    }
}
