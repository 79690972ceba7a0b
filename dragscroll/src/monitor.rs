//! The scrolling monitor.
//!
//! A [`ScrollingMonitor`] ties one scroll container to a drag-state source.
//! Its life cycle has four phases:
//!
//! 1. **Listening** after [`ScrollingMonitor::start`]: a drag-over listener
//!    on the container and a touch-move listener on the body are installed
//!    and the drag-state source is subscribed.
//! 2. **Dragging detected** when the source reports an active drag. Nothing
//!    happens until the next move event.
//! 3. **Attached** on the first move event during a drag: body-level
//!    listeners feed a throttled strength recomputation.
//! 4. **Scrolling** once a recomputation yields non-zero strength: a tick
//!    loop aligned to display frames nudges the scroll offsets until the
//!    strength returns to zero.
//!
//! Ending the drag, zero strength seen by the tick loop, or
//! [`ScrollingMonitor::stop`] tear the later phases down again. Every
//! registration is held as a [`Subscription`] guard, so all exit paths
//! release resources the same way: by dropping the guards.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use dragscroll::{
//!     ScrollOptions, ScrollingMonitor,
//!     drag::DragFlag,
//!     event::MoveEvent,
//!     geometry::Point,
//!     testing::{FakeContainer, FakeEventHost, ManualScheduler},
//! };
//!
//! let container = FakeContainer::sized(600, 600, 1000, 1000);
//! container.scroll_to(0, 200);
//! let host = FakeEventHost::new();
//! let scheduler = ManualScheduler::new();
//! let drag = DragFlag::new();
//!
//! let monitor = ScrollingMonitor::builder(container.clone())
//!     .event_host(host.clone())
//!     .scheduler(scheduler.clone())
//!     .drag_source(drag.clone())
//!     .options(ScrollOptions::default())
//!     .build()
//!     .expect("all collaborators supplied");
//! monitor.start();
//!
//! drag.set_dragging(true);
//! host.dispatch_on_container(MoveEvent::drag_over(Point::new(300.0, 0.0)));
//! scheduler.advance(Duration::from_millis(100));
//! scheduler.run_frame();
//!
//! assert_eq!(container.offset(), (0, 170));
//! ```

use std::{
    cell::RefCell,
    fmt, mem,
    rc::{Rc, Weak},
    time::Duration,
};

use tracing::{debug, instrument, trace, warn};

use crate::{
    container::ScrollContainer,
    drag::DragStateSource,
    error::{MonitorError, Result},
    event::{EventHost, ListenTarget, MoveChannel, MoveEvent, MoveHandler, Subscription},
    geometry::{Point, Strength, int_between},
    options::ScrollOptions,
    scheduler::{FrameHandle, FrameScheduler, TimerHandle},
    throttle::Throttle,
};

struct MonitorState {
    started: bool,
    dragging: bool,
    attached: bool,
    /// Tick loop alive, including the synchronous first tick.
    scrolling: bool,
    strength: Strength,
    frame: Option<FrameHandle>,
    tick_count: u64,
    /// Bumped by every stop-scrolling so callbacks from an older session bail out.
    epoch: u64,
    throttle: Throttle<Point>,
    throttle_timer: Option<TimerHandle>,
    session: Vec<Subscription>,
    attachments: Vec<Subscription>,
    drag_subscription: Option<Subscription>,
}

impl MonitorState {
    fn new(options: &ScrollOptions) -> Self {
        Self {
            started: false,
            dragging: false,
            attached: false,
            scrolling: false,
            strength: Strength::ZERO,
            frame: None,
            tick_count: 0,
            epoch: 0,
            throttle: Throttle::new(options.throttle_interval, options.throttle_edge),
            throttle_timer: None,
            session: Vec::new(),
            attachments: Vec::new(),
            drag_subscription: None,
        }
    }
}

struct Inner {
    container: Rc<dyn ScrollContainer>,
    host: Rc<dyn EventHost>,
    scheduler: Rc<dyn FrameScheduler>,
    drag_source: Rc<dyn DragStateSource>,
    options: ScrollOptions,
    state: RefCell<MonitorState>,
}

impl Inner {
    fn move_handler<F>(self: &Rc<Self>, on_move: F) -> MoveHandler
    where
        F: Fn(&Rc<Self>, &MoveEvent) + 'static,
    {
        let weak = Rc::downgrade(self);
        Rc::new(move |event: &MoveEvent| {
            if let Some(inner) = weak.upgrade() {
                on_move(&inner, event);
            }
        })
    }

    fn handle_drag_state_change(self: &Rc<Self>) {
        let is_dragging = self.drag_source.is_dragging();
        let was_dragging = {
            let mut state = self.state.borrow_mut();
            if !state.started {
                return;
            }
            mem::replace(&mut state.dragging, is_dragging)
        };

        match (was_dragging, is_dragging) {
            (false, true) => debug!("drag started; waiting for a move event"),
            (true, false) => {
                debug!("drag ended");
                self.stop_scrolling();
            }
            _ => {}
        }
    }

    fn handle_event(self: &Rc<Self>, event: &MoveEvent) {
        let should_attach = {
            let state = self.state.borrow();
            state.dragging && !state.attached
        };
        if should_attach {
            self.attach();
            self.update_scrolling(event);
        }
    }

    fn attach(self: &Rc<Self>) {
        let handler = self.move_handler(|inner, event| inner.update_scrolling(event));
        let attachments = vec![
            self.host.listen(
                ListenTarget::Body,
                MoveChannel::DragOver,
                Rc::clone(&handler),
            ),
            self.host
                .listen(ListenTarget::Body, MoveChannel::TouchMove, handler),
        ];

        let mut state = self.state.borrow_mut();
        state.attached = true;
        state.attachments = attachments;
        trace!("attached body move listeners");
    }

    fn update_scrolling(self: &Rc<Self>, event: &MoveEvent) {
        let now = self.scheduler.now();
        let step = {
            let mut state = self.state.borrow_mut();
            if !state.attached {
                return;
            }
            state.throttle.call(now, event.position)
        };

        if let Some(delay) = step.arm {
            self.arm_throttle_timer(delay);
        }
        if let Some(point) = step.invoke {
            self.recompute(point);
        }
    }

    fn arm_throttle_timer(self: &Rc<Self>, delay: Duration) {
        let weak = Rc::downgrade(self);
        let epoch = self.state.borrow().epoch;
        let handle = self.scheduler.set_timeout(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.flush_throttle(epoch);
                }
            }),
        );

        // The throttle arms at most one timer per window; it is never cleared
        // before firing except by stop-scrolling.
        self.state.borrow_mut().throttle_timer = Some(handle);
    }

    fn flush_throttle(self: &Rc<Self>, epoch: u64) {
        let now = self.scheduler.now();
        let point = {
            let mut state = self.state.borrow_mut();
            if state.epoch != epoch {
                return;
            }
            state.throttle_timer = None;
            state.throttle.flush(now)
        };
        if let Some(point) = point {
            self.recompute(point);
        }
    }

    fn recompute(self: &Rc<Self>, point: Point) {
        let Some(rect) = self.container.bounding_rect() else {
            trace!("container has no bounds; skipping recompute");
            return;
        };
        let strength = self.options.evaluate(&rect, &point);
        trace!(?point, ?strength, "recomputed strength");

        let should_start = {
            let mut state = self.state.borrow_mut();
            state.strength = strength;
            !state.scrolling && strength.is_active()
        };
        if should_start {
            self.start_scrolling();
        }
    }

    fn start_scrolling(self: &Rc<Self>) {
        let epoch = {
            let mut state = self.state.borrow_mut();
            state.scrolling = true;
            state.tick_count = 0;
            state.epoch
        };
        debug!("tick loop started");
        self.tick(epoch);
    }

    fn tick(self: &Rc<Self>, epoch: u64) {
        let multiplier = self.options.strength_multiplier;
        let stride = self.options.stride();

        let (strength, apply) = {
            let mut state = self.state.borrow_mut();
            if state.epoch != epoch {
                return;
            }
            state.frame = None;
            let strength = state.strength;
            if multiplier == 0.0 || strength.x + strength.y == 0.0 {
                drop(state);
                self.stop_scrolling();
                return;
            }
            let count = state.tick_count;
            state.tick_count = count.wrapping_add(1);
            (strength, count % stride == stride - 1)
        };

        if apply {
            self.apply_scroll(strength, multiplier);
            if self.state.borrow().epoch != epoch {
                return;
            }
        }

        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = self.scheduler.request_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.tick(epoch);
            }
        }));
        self.state.borrow_mut().frame = Some(handle);
    }

    fn apply_scroll(&self, strength: Strength, multiplier: f64) {
        let Some(metrics) = self.container.scroll_metrics() else {
            trace!("container has no scroll metrics; skipping tick");
            return;
        };

        let left = if strength.x != 0.0 {
            let left = int_between(
                0.0,
                f64::from(metrics.max_scroll_left()),
                f64::from(metrics.scroll_left) + strength.x * multiplier,
            );
            self.container.set_scroll_left(left);
            left
        } else {
            metrics.scroll_left
        };

        let top = if strength.y != 0.0 {
            let top = int_between(
                0.0,
                f64::from(metrics.max_scroll_top()),
                f64::from(metrics.scroll_top) + strength.y * multiplier,
            );
            self.container.set_scroll_top(top);
            top
        } else {
            metrics.scroll_top
        };

        trace!(left, top, "applied scroll");
        self.options.on_scroll_change.call(left, top);
    }

    fn stop_scrolling(&self) {
        let (was_scrolling, frame, timer, attachments) = {
            let mut state = self.state.borrow_mut();
            state.epoch = state.epoch.wrapping_add(1);
            state.attached = false;
            state.strength = Strength::ZERO;
            state.throttle.cancel();
            (
                mem::replace(&mut state.scrolling, false),
                state.frame.take(),
                state.throttle_timer.take(),
                mem::take(&mut state.attachments),
            )
        };

        drop(attachments);
        if let Some(frame) = frame {
            self.scheduler.cancel_frame(frame);
        }
        if let Some(timer) = timer {
            self.scheduler.clear_timeout(timer);
        }
        if was_scrolling {
            debug!("tick loop stopped");
        }
    }
}

/// Edge-triggered auto-scroller for one container.
///
/// Dropping the monitor stops it.
pub struct ScrollingMonitor {
    inner: Rc<Inner>,
}

impl ScrollingMonitor {
    /// Starts configuring a monitor for `container`.
    pub fn builder<C>(container: C) -> MonitorBuilder
    where
        C: ScrollContainer + 'static,
    {
        MonitorBuilder::new(Rc::new(container))
    }

    /// Installs the container and body listeners and subscribes to the
    /// drag-state source.
    ///
    /// If a drag is already in progress the monitor arms immediately.
    /// Calling `start` on a started monitor logs a warning and does nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn start(&self) {
        let inner = &self.inner;
        if inner.state.borrow().started {
            warn!("scrolling monitor already started; call stop() first");
            return;
        }

        let handler = inner.move_handler(|inner, event| inner.handle_event(event));
        let session = vec![
            inner.host.listen(
                ListenTarget::Container,
                MoveChannel::DragOver,
                Rc::clone(&handler),
            ),
            inner
                .host
                .listen(ListenTarget::Body, MoveChannel::TouchMove, handler),
        ];

        let weak = Rc::downgrade(inner);
        let drag_subscription = inner.drag_source.subscribe(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.handle_drag_state_change();
            }
        }));

        {
            let mut state = inner.state.borrow_mut();
            state.started = true;
            state.session = session;
            state.drag_subscription = Some(drag_subscription);
        }
        debug!("scrolling monitor started");

        inner.handle_drag_state_change();
    }

    /// Removes every listener, unsubscribes from the drag-state source and
    /// halts scrolling. No monitor callback runs after this returns.
    #[instrument(level = "debug", skip(self))]
    pub fn stop(&self) {
        let (was_started, session, drag_subscription) = {
            let mut state = self.inner.state.borrow_mut();
            state.dragging = false;
            (
                mem::replace(&mut state.started, false),
                mem::take(&mut state.session),
                state.drag_subscription.take(),
            )
        };

        drop(session);
        drop(drag_subscription);
        self.inner.stop_scrolling();
        if was_started {
            debug!("scrolling monitor stopped");
        }
    }

    /// Whether [`start`](Self::start) has been called without a matching stop.
    pub fn is_started(&self) -> bool {
        self.inner.state.borrow().started
    }

    /// Whether the monitor believes a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.inner.state.borrow().dragging
    }

    /// Whether the body-level recompute listeners are installed.
    pub fn is_attached(&self) -> bool {
        self.inner.state.borrow().attached
    }

    /// Whether the tick loop is running.
    pub fn is_scrolling(&self) -> bool {
        self.inner.state.borrow().scrolling
    }

    /// Whether a tick is waiting for the next frame.
    pub fn has_pending_frame(&self) -> bool {
        self.inner.state.borrow().frame.is_some()
    }

    /// The most recently computed strength.
    pub fn strength(&self) -> Strength {
        self.inner.state.borrow().strength
    }

    /// The options this monitor was built with.
    pub fn options(&self) -> &ScrollOptions {
        &self.inner.options
    }
}

impl Drop for ScrollingMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for ScrollingMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ScrollingMonitor")
            .field("started", &state.started)
            .field("dragging", &state.dragging)
            .field("attached", &state.attached)
            .field("scrolling", &state.scrolling)
            .field("strength", &state.strength)
            .field("frame", &state.frame)
            .finish()
    }
}

/// Builder for [`ScrollingMonitor`].
pub struct MonitorBuilder {
    container: Rc<dyn ScrollContainer>,
    host: Option<Rc<dyn EventHost>>,
    scheduler: Option<Rc<dyn FrameScheduler>>,
    drag_source: Option<Rc<dyn DragStateSource>>,
    options: ScrollOptions,
}

impl MonitorBuilder {
    /// Creates a builder for a shared container.
    pub fn new(container: Rc<dyn ScrollContainer>) -> Self {
        Self {
            container,
            host: None,
            scheduler: None,
            drag_source: None,
            options: ScrollOptions::default(),
        }
    }

    /// Sets the event host.
    pub fn event_host<H: EventHost + 'static>(self, host: H) -> Self {
        self.event_host_shared(Rc::new(host))
    }

    /// Sets the event host using a shared handle.
    pub fn event_host_shared(mut self, host: Rc<dyn EventHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the frame scheduler.
    pub fn scheduler<S: FrameScheduler + 'static>(self, scheduler: S) -> Self {
        self.scheduler_shared(Rc::new(scheduler))
    }

    /// Sets the frame scheduler using a shared handle.
    pub fn scheduler_shared(mut self, scheduler: Rc<dyn FrameScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Sets the drag-state source.
    pub fn drag_source<D: DragStateSource + 'static>(self, source: D) -> Self {
        self.drag_source_shared(Rc::new(source))
    }

    /// Sets the drag-state source using a shared handle.
    pub fn drag_source_shared(mut self, source: Rc<dyn DragStateSource>) -> Self {
        self.drag_source = Some(source);
        self
    }

    /// Replaces the options.
    pub fn options(mut self, options: ScrollOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates the configuration and creates an unstarted monitor.
    pub fn build(self) -> Result<ScrollingMonitor> {
        let drag_source = self.drag_source.ok_or(MonitorError::MissingDragSource)?;
        let host = self.host.ok_or(MonitorError::MissingEventHost)?;
        let scheduler = self.scheduler.ok_or(MonitorError::MissingScheduler)?;
        self.options.validate()?;

        let state = RefCell::new(MonitorState::new(&self.options));
        Ok(ScrollingMonitor {
            inner: Rc::new(Inner {
                container: self.container,
                host,
                scheduler,
                drag_source,
                options: self.options,
                state,
            }),
        })
    }
}

impl fmt::Debug for MonitorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorBuilder")
            .field("has_event_host", &self.host.is_some())
            .field("has_scheduler", &self.scheduler.is_some())
            .field("has_drag_source", &self.drag_source.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// Builds a monitor for `container` from its collaborators in one call.
///
/// Passing `None` for `drag_source` is a configuration error. The returned
/// monitor is not started yet.
pub fn attach_scrolling(
    container: Rc<dyn ScrollContainer>,
    host: Rc<dyn EventHost>,
    scheduler: Rc<dyn FrameScheduler>,
    drag_source: Option<Rc<dyn DragStateSource>>,
    options: ScrollOptions,
) -> Result<ScrollingMonitor> {
    let builder = MonitorBuilder::new(container)
        .event_host_shared(host)
        .scheduler_shared(scheduler)
        .options(options);
    match drag_source {
        Some(source) => builder.drag_source_shared(source).build(),
        None => Err(MonitorError::MissingDragSource),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        drag::DragFlag,
        testing::{FakeContainer, FakeEventHost, ManualScheduler},
        throttle::ThrottleEdge,
    };

    const WINDOW: Duration = Duration::from_millis(100);

    struct Harness {
        container: FakeContainer,
        host: FakeEventHost,
        scheduler: ManualScheduler,
        drag: DragFlag,
        changes: Rc<RefCell<Vec<(i32, i32)>>>,
        monitor: ScrollingMonitor,
    }

    impl Harness {
        fn new(options: ScrollOptions) -> Self {
            Self::with_container(FakeContainer::sized(600, 600, 1000, 1000), options)
        }

        fn with_container(container: FakeContainer, options: ScrollOptions) -> Self {
            let host = FakeEventHost::new();
            let scheduler = ManualScheduler::new();
            let drag = DragFlag::new();
            let changes = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&changes);

            let monitor = ScrollingMonitor::builder(container.clone())
                .event_host(host.clone())
                .scheduler(scheduler.clone())
                .drag_source(drag.clone())
                .options(options.on_scroll_change(move |left, top| {
                    sink.borrow_mut().push((left, top))
                }))
                .build()
                .expect("monitor builds");

            Self {
                container,
                host,
                scheduler,
                drag,
                changes,
                monitor,
            }
        }

        fn started(options: ScrollOptions) -> Self {
            let harness = Self::new(options);
            harness.monitor.start();
            harness
        }

        fn drag_over(&self, x: f64, y: f64) {
            self.host
                .dispatch_on_container(MoveEvent::drag_over(Point::new(x, y)));
        }

        /// Starts a drag, moves to `(x, y)` and lets the throttle window close.
        fn drag_to(&self, x: f64, y: f64) {
            self.drag.set_dragging(true);
            self.drag_over(x, y);
            self.scheduler.advance(WINDOW);
        }

        fn changes(&self) -> Vec<(i32, i32)> {
            self.changes.borrow().clone()
        }
    }

    #[test]
    fn build_requires_drag_source() {
        let result = ScrollingMonitor::builder(FakeContainer::sized(10, 10, 10, 10))
            .event_host(FakeEventHost::new())
            .scheduler(ManualScheduler::new())
            .build();
        assert!(matches!(result, Err(MonitorError::MissingDragSource)));
    }

    #[test]
    fn build_rejects_non_finite_multiplier() {
        let result = ScrollingMonitor::builder(FakeContainer::sized(10, 10, 10, 10))
            .event_host(FakeEventHost::new())
            .scheduler(ManualScheduler::new())
            .drag_source(DragFlag::new())
            .options(ScrollOptions::default().strength_multiplier(f64::NAN))
            .build();
        assert!(matches!(result, Err(MonitorError::InvalidMultiplier(_))));
    }

    #[test]
    fn attach_scrolling_without_drag_source_fails() {
        let result = attach_scrolling(
            Rc::new(FakeContainer::sized(10, 10, 10, 10)),
            Rc::new(FakeEventHost::new()),
            Rc::new(ManualScheduler::new()),
            None,
            ScrollOptions::default(),
        );
        assert!(matches!(result, Err(MonitorError::MissingDragSource)));
    }

    #[test]
    fn attach_scrolling_builds_unstarted_monitor() {
        let host = FakeEventHost::new();
        let monitor = attach_scrolling(
            Rc::new(FakeContainer::sized(10, 10, 10, 10)),
            Rc::new(host.clone()),
            Rc::new(ManualScheduler::new()),
            Some(Rc::new(DragFlag::new())),
            ScrollOptions::default(),
        )
        .expect("monitor builds");
        assert!(!monitor.is_started());
        assert_eq!(host.total_listeners(), 0);
    }

    #[test]
    fn start_installs_session_listeners() {
        let h = Harness::started(ScrollOptions::default());
        assert!(h.monitor.is_started());
        assert_eq!(
            h.host
                .listener_count(ListenTarget::Container, MoveChannel::DragOver),
            1
        );
        assert_eq!(
            h.host.listener_count(ListenTarget::Body, MoveChannel::TouchMove),
            1
        );
        assert_eq!(h.host.total_listeners(), 2);
        assert_eq!(h.drag.subscriber_count(), 1);
    }

    #[test]
    fn second_start_is_ignored() {
        let h = Harness::started(ScrollOptions::default());
        h.monitor.start();
        assert_eq!(h.host.total_listeners(), 2);
        assert_eq!(h.drag.subscriber_count(), 1);
    }

    #[test]
    fn moves_without_drag_are_ignored() {
        let h = Harness::started(ScrollOptions::default());
        h.drag_over(0.0, 0.0);
        h.scheduler.advance(WINDOW);
        assert!(!h.monitor.is_attached());
        assert!(!h.monitor.is_scrolling());
        assert_eq!(h.scheduler.pending_timers(), 0);
        assert_eq!(h.container.write_count(), 0);
    }

    #[test]
    fn drag_start_alone_does_not_attach() {
        let h = Harness::started(ScrollOptions::default());
        h.drag.set_dragging(true);
        assert!(h.monitor.is_dragging());
        assert!(!h.monitor.is_attached());
        assert_eq!(h.host.total_listeners(), 2);
    }

    #[test]
    fn first_move_attaches_and_defers_recompute() {
        let h = Harness::started(ScrollOptions::default());
        h.drag.set_dragging(true);
        h.drag_over(0.0, 300.0);

        assert!(h.monitor.is_attached());
        assert_eq!(
            h.host.listener_count(ListenTarget::Body, MoveChannel::DragOver),
            1
        );
        assert_eq!(
            h.host.listener_count(ListenTarget::Body, MoveChannel::TouchMove),
            2
        );
        assert_eq!(h.monitor.strength(), Strength::ZERO);
        assert_eq!(h.scheduler.pending_timers(), 1);

        h.scheduler.advance(Duration::from_millis(99));
        assert_eq!(h.monitor.strength(), Strength::ZERO);

        h.scheduler.advance(Duration::from_millis(1));
        assert_eq!(h.monitor.strength(), Strength::new(-1.0, 0.0));
        assert!(h.monitor.is_scrolling());
    }

    #[test]
    fn latest_move_in_window_wins() {
        let h = Harness::started(ScrollOptions::default());
        h.drag.set_dragging(true);
        h.drag_over(0.0, 300.0);
        h.drag_over(300.0, 300.0);
        h.drag_over(300.0, 600.0);
        h.scheduler.advance(WINDOW);

        assert_eq!(h.monitor.strength(), Strength::new(0.0, 1.0));
        assert_eq!(h.scheduler.pending_timers(), 0);
    }

    /// Delivers every timeout a millisecond after it was asked for.
    #[derive(Clone)]
    struct LateTimers(ManualScheduler);

    impl FrameScheduler for LateTimers {
        fn now(&self) -> web_time::Instant {
            self.0.now()
        }

        fn request_frame(&self, task: crate::scheduler::Task) -> FrameHandle {
            self.0.request_frame(task)
        }

        fn cancel_frame(&self, handle: FrameHandle) {
            self.0.cancel_frame(handle);
        }

        fn set_timeout(&self, delay: Duration, task: crate::scheduler::Task) -> TimerHandle {
            self.0.set_timeout(delay + Duration::from_millis(1), task)
        }

        fn clear_timeout(&self, handle: TimerHandle) {
            self.0.clear_timeout(handle);
        }
    }

    #[test]
    fn late_timers_do_not_starve_recompute() {
        let container = FakeContainer::sized(600, 600, 1000, 1000);
        container.scroll_to(200, 0);
        let host = FakeEventHost::new();
        let scheduler = ManualScheduler::new();
        let drag = DragFlag::new();
        let monitor = ScrollingMonitor::builder(container.clone())
            .event_host(host.clone())
            .scheduler(LateTimers(scheduler.clone()))
            .drag_source(drag.clone())
            .build()
            .expect("monitor builds");
        monitor.start();
        drag.set_dragging(true);

        let mut recomputed_at = None;
        for step in 0..20u32 {
            host.dispatch_on_container(MoveEvent::drag_over(Point::new(0.0, 300.0)));
            scheduler.advance(WINDOW);
            if recomputed_at.is_none() && monitor.strength().is_active() {
                recomputed_at = Some(step);
            }
        }

        assert_eq!(recomputed_at, Some(1));
        assert_eq!(monitor.strength(), Strength::new(-1.0, 0.0));
        assert!(monitor.is_scrolling());
        scheduler.run_frame();
        assert_eq!(container.offset(), (170, 0));
    }

    #[test]
    fn steady_moves_with_late_timers_keep_recomputing() {
        let container = FakeContainer::sized(600, 600, 1000, 1000);
        let host = FakeEventHost::new();
        let scheduler = ManualScheduler::new();
        let drag = DragFlag::new();
        let monitor = ScrollingMonitor::builder(container)
            .event_host(host.clone())
            .scheduler(LateTimers(scheduler.clone()))
            .drag_source(drag.clone())
            .build()
            .expect("monitor builds");
        monitor.start();
        drag.set_dragging(true);

        for _ in 0..5 {
            host.dispatch_on_container(MoveEvent::drag_over(Point::new(0.0, 300.0)));
            scheduler.advance(WINDOW);
        }
        assert_eq!(monitor.strength(), Strength::new(-1.0, 0.0));

        // Moving to the bottom edge must be picked up within two windows.
        for _ in 0..2 {
            host.dispatch_on_container(MoveEvent::drag_over(Point::new(300.0, 600.0)));
            scheduler.advance(WINDOW);
        }
        assert_eq!(monitor.strength(), Strength::new(0.0, 1.0));
    }

    #[test]
    fn left_edge_at_origin_reports_unchanged_offset() {
        let h = Harness::started(ScrollOptions::default());
        h.drag_to(0.0, 300.0);
        assert!(h.changes().is_empty());

        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (0, 0));
        assert_eq!(h.changes(), vec![(0, 0)]);
    }

    #[test]
    fn left_edge_scrolls_on_odd_ticks() {
        let h = Harness::started(ScrollOptions::default());
        h.container.scroll_to(200, 0);
        h.drag_to(0.0, 300.0);

        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (170, 0));
        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (170, 0));
        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (140, 0));
        assert_eq!(h.changes(), vec![(170, 0), (140, 0)]);
    }

    #[test]
    fn applies_on_every_other_tick() {
        let h = Harness::started(ScrollOptions::default());
        h.container.scroll_to(0, 300);
        h.drag_to(300.0, 0.0);

        h.scheduler.run_frames(6);
        assert_eq!(h.changes().len(), 3);
        assert_eq!(h.container.offset(), (0, 210));
    }

    #[test]
    fn stride_of_one_applies_on_first_tick() {
        let h = Harness::started(ScrollOptions::default().frame_stride(1));
        h.container.scroll_to(0, 100);
        h.drag_to(300.0, 0.0);

        assert_eq!(h.container.offset(), (0, 70));
        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (0, 40));
    }

    #[test]
    fn fractional_strength_is_floored() {
        let h = Harness::started(ScrollOptions::default().strength_multiplier(25.0));
        h.container.scroll_to(100, 100);
        // -0.5 on both axes: 100 - 12.5 lands on 87.5.
        h.drag_to(75.0, 75.0);
        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (87, 87));
    }

    #[test]
    fn offsets_are_clamped_to_scroll_range() {
        let h = Harness::started(ScrollOptions::default());
        h.container.scroll_to(390, 395);
        h.drag_to(600.0, 600.0);

        h.scheduler.run_frames(4);
        assert_eq!(h.container.offset(), (400, 400));
        assert!(
            h.changes()
                .iter()
                .all(|&(left, top)| (0..=400).contains(&left) && (0..=400).contains(&top))
        );
    }

    #[test]
    fn huge_multiplier_is_clamped_to_zero() {
        let h = Harness::started(ScrollOptions::default().strength_multiplier(10_000.0));
        h.container.scroll_to(200, 200);
        h.drag_to(0.0, 0.0);
        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (0, 0));
    }

    #[test]
    fn content_smaller_than_container_never_goes_negative() {
        let h = Harness::with_container(
            FakeContainer::sized(600, 600, 300, 300),
            ScrollOptions::default(),
        );
        h.monitor.start();
        h.drag_to(600.0, 600.0);
        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (0, 0));
    }

    #[test]
    fn zero_multiplier_never_scrolls() {
        let h = Harness::started(ScrollOptions::default().strength_multiplier(0.0));
        h.container.scroll_to(200, 200);
        h.drag_to(0.0, 0.0);
        h.scheduler.run_frames(4);

        assert!(!h.monitor.is_scrolling());
        assert_eq!(h.scheduler.pending_frames(), 0);
        assert_eq!(h.container.write_count(), 0);
        assert!(h.changes().is_empty());
    }

    #[test]
    fn returning_to_centre_stops_tick_loop() {
        let h = Harness::started(ScrollOptions::default());
        h.container.scroll_to(200, 0);
        h.drag_to(0.0, 300.0);
        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (170, 0));

        h.drag_over(300.0, 300.0);
        h.scheduler.advance(WINDOW);
        assert_eq!(h.monitor.strength(), Strength::ZERO);

        h.scheduler.run_frame();
        assert!(!h.monitor.is_scrolling());
        assert!(!h.monitor.is_attached());
        assert_eq!(h.scheduler.pending_frames(), 0);

        h.scheduler.run_frames(3);
        assert_eq!(h.container.offset(), (170, 0));
        assert_eq!(h.changes().len(), 1);
    }

    #[test]
    fn next_move_after_tick_loop_stopped_reattaches() {
        let h = Harness::started(ScrollOptions::default());
        h.drag_to(0.0, 300.0);
        h.drag_over(300.0, 300.0);
        h.scheduler.advance(WINDOW);
        h.scheduler.run_frame();
        assert!(!h.monitor.is_attached());

        h.drag_over(300.0, 600.0);
        assert!(h.monitor.is_attached());
        h.scheduler.advance(WINDOW);
        assert!(h.monitor.is_scrolling());
    }

    #[test]
    fn opposite_strengths_cancel_out() {
        let h = Harness::started(ScrollOptions::default());
        // Right buffer at 0.5, top buffer at -0.5.
        h.drag_to(525.0, 75.0);
        assert!(!h.monitor.is_scrolling());
        assert_eq!(h.container.write_count(), 0);
    }

    #[test]
    fn drag_end_detaches_and_cancels_frame() {
        let h = Harness::started(ScrollOptions::default());
        h.drag_to(0.0, 300.0);
        assert!(h.monitor.has_pending_frame());

        h.drag.set_dragging(false);
        assert!(!h.monitor.is_dragging());
        assert!(!h.monitor.is_attached());
        assert!(!h.monitor.is_scrolling());
        assert!(!h.monitor.has_pending_frame());
        assert_eq!(h.monitor.strength(), Strength::ZERO);
        assert_eq!(h.scheduler.pending_frames(), 0);
        assert_eq!(
            h.host.listener_count(ListenTarget::Body, MoveChannel::DragOver),
            0
        );
        assert_eq!(h.host.total_listeners(), 2);
    }

    #[test]
    fn drag_end_cancels_pending_recompute() {
        let h = Harness::started(ScrollOptions::default());
        h.drag.set_dragging(true);
        h.drag_over(0.0, 300.0);
        assert_eq!(h.scheduler.pending_timers(), 1);

        h.drag.set_dragging(false);
        assert_eq!(h.scheduler.pending_timers(), 0);
        h.scheduler.advance(WINDOW);
        h.scheduler.run_frames(2);
        assert!(!h.monitor.is_scrolling());
        assert!(h.changes().is_empty());
    }

    #[test]
    fn unmounted_container_is_a_no_op() {
        let h = Harness::started(ScrollOptions::default());
        h.container.scroll_to(200, 0);
        h.drag_to(0.0, 300.0);
        let writes = h.container.write_count();

        h.container.unmount();
        h.scheduler.run_frames(4);
        h.drag_over(0.0, 0.0);
        h.scheduler.advance(WINDOW);

        assert_eq!(h.container.write_count(), writes);
        assert!(h.changes().is_empty());
    }

    #[test]
    fn touch_moves_drive_scrolling() {
        let h = Harness::started(ScrollOptions::default());
        h.container.scroll_to(0, 200);
        h.drag.set_dragging(true);
        h.host.dispatch(
            ListenTarget::Body,
            MoveEvent::touch_move(Point::new(300.0, 0.0)),
        );
        assert!(h.monitor.is_attached());

        h.scheduler.advance(WINDOW);
        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (0, 170));
    }

    #[test]
    fn leading_edge_recomputes_immediately() {
        let h = Harness::started(ScrollOptions::default().throttle_edge(ThrottleEdge::Leading));
        h.drag.set_dragging(true);
        h.drag_over(0.0, 300.0);
        assert!(h.monitor.is_scrolling());
        assert_eq!(h.monitor.strength(), Strength::new(-1.0, 0.0));
    }

    #[test]
    fn start_mid_drag_arms_immediately() {
        let h = Harness::new(ScrollOptions::default());
        h.drag.set_dragging(true);
        h.monitor.start();
        assert!(h.monitor.is_dragging());

        h.drag_over(0.0, 300.0);
        assert!(h.monitor.is_attached());
    }

    #[test]
    fn stop_releases_everything() {
        let h = Harness::started(ScrollOptions::default());
        h.drag_to(0.0, 300.0);
        h.drag_over(0.0, 0.0);
        assert_eq!(h.scheduler.pending_timers(), 1);

        h.monitor.stop();
        assert!(!h.monitor.is_started());
        assert_eq!(h.host.total_listeners(), 0);
        assert_eq!(h.drag.subscriber_count(), 0);
        assert_eq!(h.scheduler.pending_frames(), 0);
        assert_eq!(h.scheduler.pending_timers(), 0);

        h.drag.set_dragging(false);
        h.drag.set_dragging(true);
        h.drag_over(0.0, 0.0);
        assert!(!h.monitor.is_attached());
    }

    #[test]
    fn monitor_can_restart_after_stop() {
        let h = Harness::started(ScrollOptions::default());
        h.monitor.stop();
        h.monitor.start();
        assert_eq!(h.host.total_listeners(), 2);

        h.container.scroll_to(0, 200);
        h.drag_to(300.0, 0.0);
        h.scheduler.run_frame();
        assert_eq!(h.container.offset(), (0, 170));
    }

    #[test]
    fn dropping_monitor_stops_it() {
        let h = Harness::started(ScrollOptions::default());
        h.drag_to(0.0, 300.0);
        let Harness {
            host,
            scheduler,
            drag,
            monitor,
            ..
        } = h;

        drop(monitor);
        assert_eq!(host.total_listeners(), 0);
        assert_eq!(drag.subscriber_count(), 0);
        assert_eq!(scheduler.pending_frames(), 0);
    }

    #[test]
    fn ending_drag_from_scroll_observer_halts_loop() {
        let container = FakeContainer::sized(600, 600, 1000, 1000);
        container.scroll_to(0, 300);
        let host = FakeEventHost::new();
        let scheduler = ManualScheduler::new();
        let drag = DragFlag::new();
        let calls = Rc::new(Cell::new(0));

        let observer_drag = drag.clone();
        let observer_calls = Rc::clone(&calls);
        let monitor = ScrollingMonitor::builder(container.clone())
            .event_host(host.clone())
            .scheduler(scheduler.clone())
            .drag_source(drag.clone())
            .options(ScrollOptions::default().on_scroll_change(move |_, _| {
                observer_calls.set(observer_calls.get() + 1);
                observer_drag.set_dragging(false);
            }))
            .build()
            .expect("monitor builds");
        monitor.start();

        drag.set_dragging(true);
        host.dispatch_on_container(MoveEvent::drag_over(Point::new(300.0, 0.0)));
        scheduler.advance(WINDOW);
        scheduler.run_frame();

        assert_eq!(calls.get(), 1);
        assert_eq!(container.offset(), (0, 270));
        assert!(!monitor.is_scrolling());
        assert_eq!(scheduler.pending_frames(), 0);
    }
}
