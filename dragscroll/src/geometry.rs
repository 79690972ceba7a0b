//! Viewport geometry used by the strength functions and the monitor.
//!
//! All coordinates are CSS-style viewport pixels:
//! - Origin (0, 0) at the top-left corner
//! - X-axis increases to the right
//! - Y-axis increases downward
//!
//! # Key Types
//!
//! - [`Rect`] - bounding box of the scroll container
//! - [`Point`] - pointer or touch position
//! - [`Strength`] - per-axis scroll intent in `[-1, 1]`
//!
//! # Example
//!
//! ```
//! use dragscroll::geometry::{Point, Rect};
//!
//! let rect = Rect::new(0.0, 0.0, 600.0, 400.0);
//! assert!(rect.contains(Point::new(600.0, 400.0)));
//! assert!(!rect.contains(Point::new(-1.0, 10.0)));
//! ```

/// An axis-aligned rectangle in viewport space.
///
/// Edges are inclusive: a point lying exactly on the right or bottom edge is
/// considered inside. This matches how pointer coordinates reported at the
/// very border of a container are treated by the strength functions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// The x-coordinate of the top-left corner.
    pub x: f64,
    /// The y-coordinate of the top-left corner.
    pub y: f64,
    /// The width of the rectangle.
    pub w: f64,
    /// The height of the rectangle.
    pub h: f64,
}

impl Rect {
    /// A zero-sized rectangle at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    /// Creates a new rectangle from its top-left corner and size.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The x-coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// The y-coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Returns `true` if `point` lies inside the rectangle, edges included.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// The centre of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// A position in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(f64::from(x), f64::from(y))
    }
}

/// Signed, normalized scroll intent along both axes.
///
/// Each component lies in `[-1, 1]`. A negative value scrolls toward the
/// origin (left or up), a positive value away from it; the magnitude is the
/// fraction of the configured strength multiplier applied per active tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Strength {
    /// Horizontal scale.
    pub x: f64,
    /// Vertical scale.
    pub y: f64,
}

impl Strength {
    /// No scroll intent on either axis.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a strength pair, clamping each component into `[-1, 1]`.
    ///
    /// Non-finite components collapse to `0.0`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: sanitize(x),
            y: sanitize(y),
        }
    }

    /// Returns `true` if either axis carries scroll intent.
    pub fn is_active(&self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Clamps `value` into `[min, max]` and floors the result to a whole pixel.
///
/// The lower bound wins when `max < min`. `NaN` inputs resolve to `min`.
///
/// # Examples
///
/// ```
/// use dragscroll::geometry::int_between;
///
/// assert_eq!(int_between(0.0, 2.0, 1.0), 1);
/// assert_eq!(int_between(0.0, 2.0, 0.5), 0);
/// assert_eq!(int_between(0.0, 1.5, 2.0), 1);
/// ```
pub fn int_between(min: f64, max: f64, value: f64) -> i32 {
    if value.is_nan() {
        return min.floor() as i32;
    }
    value.min(max).max(min).floor() as i32
}
