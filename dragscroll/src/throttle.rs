//! Time-window throttle for strength recomputation.
//!
//! [`Throttle`] is a pure state machine: it never sleeps or schedules
//! anything itself. Each [`Throttle::call`] returns a [`ThrottleStep`] that
//! tells the caller whether to run the work now and whether to arm a timer
//! that later calls [`Throttle::flush`].

use std::time::Duration;

use web_time::Instant;

/// Default recompute window.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(100);

/// Which edge of a throttle window invokes the work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThrottleEdge {
    /// The first call of a window runs immediately; the rest are dropped.
    Leading,
    /// The first call only opens the window; the latest value runs when the
    /// window closes.
    #[default]
    Trailing,
    /// The first call runs immediately and the latest later value runs when
    /// the window closes.
    Both,
}

impl ThrottleEdge {
    fn leading(self) -> bool {
        matches!(self, Self::Leading | Self::Both)
    }

    fn trailing(self) -> bool {
        matches!(self, Self::Trailing | Self::Both)
    }
}

/// Instructions returned from [`Throttle::call`].
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleStep<T> {
    /// Value to process right away.
    pub invoke: Option<T>,
    /// Arm a timer for this delay and call [`Throttle::flush`] when it fires.
    pub arm: Option<Duration>,
}

impl<T> ThrottleStep<T> {
    fn idle() -> Self {
        Self {
            invoke: None,
            arm: None,
        }
    }
}

/// Rate limiter that lets at most one value through per window.
///
/// With a trailing edge the window stays open until [`Throttle::flush`]
/// runs, however late the timer fires, so a steady stream of calls can
/// never push the trailing value back indefinitely.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    edge: ThrottleEdge,
    window_start: Option<Instant>,
    timer_armed: bool,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Creates a throttle with the given window and edge policy.
    pub fn new(interval: Duration, edge: ThrottleEdge) -> Self {
        Self {
            interval,
            edge,
            window_start: None,
            timer_armed: false,
            pending: None,
        }
    }

    /// The window length.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The edge policy.
    pub fn edge(&self) -> ThrottleEdge {
        self.edge
    }

    /// Returns `true` while a trailing value is waiting for the window to close.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns `true` between an armed timer and the matching flush.
    pub fn is_armed(&self) -> bool {
        self.timer_armed
    }

    fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.window_start
            .map(|start| now.saturating_duration_since(start))
            .filter(|elapsed| *elapsed < self.interval)
    }

    /// Offers `value` at time `now`.
    pub fn call(&mut self, now: Instant, value: T) -> ThrottleStep<T> {
        if self.timer_armed {
            self.pending = Some(value);
            return ThrottleStep::idle();
        }

        if let Some(elapsed) = self.elapsed(now) {
            if !self.edge.trailing() {
                return ThrottleStep::idle();
            }
            self.pending = Some(value);
            self.timer_armed = true;
            return ThrottleStep {
                invoke: None,
                arm: Some(self.interval - elapsed),
            };
        }

        self.window_start = Some(now);
        let mut step = ThrottleStep::idle();
        if self.edge.trailing() {
            self.timer_armed = true;
            step.arm = Some(self.interval);
        }
        if self.edge.leading() {
            step.invoke = Some(value);
        } else {
            self.pending = Some(value);
        }
        step
    }

    /// Closes the armed window at `now` and returns the trailing value, if any.
    ///
    /// Releasing a value starts the next window at `now`, so a call right
    /// after the flush waits out a full interval again.
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        self.timer_armed = false;
        let value = self.pending.take();
        self.window_start = value.as_ref().map(|_| now);
        value
    }

    /// Drops any pending value and closes the window.
    pub fn cancel(&mut self) {
        self.window_start = None;
        self.timer_armed = false;
        self.pending = None;
    }
}
