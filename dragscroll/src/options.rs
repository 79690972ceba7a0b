//! Monitor configuration.

use std::time::Duration;

use derive_setters::Setters;

use crate::{
    callback::{ScrollChangeFn, StrengthFn},
    error::{MonitorError, Result},
    geometry::{Point, Rect, Strength},
    strength::{default_horizontal_strength, default_vertical_strength},
    throttle::{DEFAULT_THROTTLE_INTERVAL, ThrottleEdge},
};

/// Pixels scrolled per active tick at full strength.
pub const DEFAULT_STRENGTH_MULTIPLIER: f64 = 30.0;

/// Ticks per applied scroll mutation.
///
/// WebKit drops pointer-move events from a container that also emits a
/// scroll event in the same frame, so only every second tick scrolls.
pub const DEFAULT_FRAME_STRIDE: u32 = 2;

/// Options for a [`ScrollingMonitor`](crate::ScrollingMonitor).
///
/// ```
/// use std::time::Duration;
/// use dragscroll::{ScrollOptions, strength::create_vertical_strength};
///
/// let options = ScrollOptions::default()
///     .strength_multiplier(45.0)
///     .throttle_interval(Duration::from_millis(50))
///     .vertical_strength(create_vertical_strength(80.0))
///     .on_scroll_change(|left, top| println!("scrolled to {left},{top}"));
/// assert_eq!(options.strength_multiplier, 45.0);
/// ```
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct ScrollOptions {
    /// Strength function for the left/right edges.
    #[setters(skip)]
    pub horizontal_strength: StrengthFn,
    /// Strength function for the top/bottom edges.
    #[setters(skip)]
    pub vertical_strength: StrengthFn,
    /// Pixels per active tick at strength `1.0`. `0` disables scrolling.
    pub strength_multiplier: f64,
    /// Observer called with `(scroll_left, scroll_top)` after each active tick.
    #[setters(skip)]
    pub on_scroll_change: ScrollChangeFn,
    /// Minimum spacing between strength recomputations.
    pub throttle_interval: Duration,
    /// Which edge of a throttle window recomputes.
    pub throttle_edge: ThrottleEdge,
    /// Apply a scroll mutation on every `frame_stride`-th tick.
    ///
    /// `0` is treated as `1`.
    pub frame_stride: u32,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            horizontal_strength: default_horizontal_strength(),
            vertical_strength: default_vertical_strength(),
            strength_multiplier: DEFAULT_STRENGTH_MULTIPLIER,
            on_scroll_change: ScrollChangeFn::default(),
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
            throttle_edge: ThrottleEdge::default(),
            frame_stride: DEFAULT_FRAME_STRIDE,
        }
    }
}

impl ScrollOptions {
    /// Sets the horizontal strength function.
    pub fn horizontal_strength(mut self, strength: impl Into<StrengthFn>) -> Self {
        self.horizontal_strength = strength.into();
        self
    }

    /// Sets the vertical strength function.
    pub fn vertical_strength(mut self, strength: impl Into<StrengthFn>) -> Self {
        self.vertical_strength = strength.into();
        self
    }

    /// Sets the scroll observer.
    pub fn on_scroll_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(i32, i32) + 'static,
    {
        self.on_scroll_change = ScrollChangeFn::new(handler);
        self
    }

    /// Sets the scroll observer using a shared handle.
    pub fn on_scroll_change_shared(mut self, handler: ScrollChangeFn) -> Self {
        self.on_scroll_change = handler;
        self
    }

    /// Checks values that would make the tick loop misbehave.
    pub fn validate(&self) -> Result<()> {
        if !self.strength_multiplier.is_finite() {
            return Err(MonitorError::InvalidMultiplier(self.strength_multiplier));
        }
        Ok(())
    }

    pub(crate) fn stride(&self) -> u64 {
        u64::from(self.frame_stride.max(1))
    }

    /// Evaluates both strength functions.
    pub(crate) fn evaluate(&self, rect: &Rect, point: &Point) -> Strength {
        Strength::new(
            self.horizontal_strength.call(rect, point),
            self.vertical_strength.call(rect, point),
        )
    }
}
