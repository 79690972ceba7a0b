//! Edge-buffer strength functions.
//!
//! A strength function turns the container bounds and the pointer position
//! into a signed scroll intent for one axis. Inside a buffer zone of
//! `buffer` pixels along each edge the strength varies linearly from `-1`
//! (or `+1`) at the edge itself to `0` at the inner boundary of the zone.
//! Everywhere else, including outside the container, it is `0`.
//!
//! ```
//! use dragscroll::geometry::{Point, Rect};
//! use dragscroll::strength::create_horizontal_strength;
//!
//! let strength = create_horizontal_strength(150.0);
//! let rect = Rect::new(0.0, 0.0, 600.0, 600.0);
//! assert_eq!(strength.call(&rect, &Point::new(75.0, 0.0)), -0.5);
//! assert_eq!(strength.call(&rect, &Point::new(300.0, 0.0)), 0.0);
//! ```

use crate::{
    callback::StrengthFn,
    geometry::{Point, Rect},
};

/// Width in pixels of the default edge buffer.
pub const DEFAULT_BUFFER: f64 = 150.0;

/// The axis a strength function measures along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left/right edges, driven by `point.x`.
    Horizontal,
    /// Top/bottom edges, driven by `point.y`.
    Vertical,
}

/// Linear edge-buffer strength along one axis.
///
/// This is a plain value type; [`EdgeStrength::strength`] depends only on
/// its arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStrength {
    axis: Axis,
    buffer: f64,
}

impl EdgeStrength {
    /// Creates an edge strength for `axis` with the given buffer width.
    pub const fn new(axis: Axis, buffer: f64) -> Self {
        Self { axis, buffer }
    }

    /// The measured axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The configured (unclamped) buffer width.
    pub fn buffer(&self) -> f64 {
        self.buffer
    }

    /// Computes the strength for `point` relative to `rect`.
    ///
    /// The buffer is clamped to half the container extent so the two zones
    /// can meet at the centre but never overlap. Boundaries are exclusive:
    /// a point exactly `buffer` pixels from an edge yields `0`.
    pub fn strength(&self, rect: &Rect, point: &Point) -> f64 {
        if !rect.contains(*point) {
            return 0.0;
        }

        let (start, extent, position) = match self.axis {
            Axis::Horizontal => (rect.x, rect.w, point.x),
            Axis::Vertical => (rect.y, rect.h, point.y),
        };
        let buffer = (extent / 2.0).min(self.buffer);
        let end = start + extent;

        if position < start + buffer {
            (position - start - buffer) / buffer
        } else if position > end - buffer {
            -(end - position - buffer) / buffer
        } else {
            0.0
        }
    }
}

impl From<EdgeStrength> for StrengthFn {
    fn from(edge: EdgeStrength) -> Self {
        StrengthFn::new(move |rect, point| edge.strength(rect, point))
    }
}

/// Creates a horizontal strength function with a custom buffer.
pub fn create_horizontal_strength(buffer: f64) -> StrengthFn {
    EdgeStrength::new(Axis::Horizontal, buffer).into()
}

/// Creates a vertical strength function with a custom buffer.
pub fn create_vertical_strength(buffer: f64) -> StrengthFn {
    EdgeStrength::new(Axis::Vertical, buffer).into()
}

/// Horizontal strength with [`DEFAULT_BUFFER`].
pub fn default_horizontal_strength() -> StrengthFn {
    create_horizontal_strength(DEFAULT_BUFFER)
}

/// Vertical strength with [`DEFAULT_BUFFER`].
pub fn default_vertical_strength() -> StrengthFn {
    create_vertical_strength(DEFAULT_BUFFER)
}
