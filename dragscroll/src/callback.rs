//! Shared closure handles stored in [`ScrollOptions`](crate::ScrollOptions).
//!
//! Both handles compare by identity (`Rc::ptr_eq`), so options can be
//! compared cheaply without looking inside the closures.

use std::{fmt, rc::Rc};

use crate::geometry::{Point, Rect};

/// Stable, comparable handle for a per-axis strength function.
///
/// A strength function maps the container bounds and a pointer position to a
/// signed scroll intent in `[-1, 1]`. See [`crate::strength`] for the
/// built-in edge-buffer implementation.
#[derive(Clone)]
pub struct StrengthFn {
    inner: Rc<dyn Fn(&Rect, &Point) -> f64>,
}

impl StrengthFn {
    /// Create a strength handle from a closure.
    pub fn new<F>(strength: F) -> Self
    where
        F: Fn(&Rect, &Point) -> f64 + 'static,
    {
        Self {
            inner: Rc::new(strength),
        }
    }

    /// Evaluate the strength for `rect` and `point`.
    pub fn call(&self, rect: &Rect, point: &Point) -> f64 {
        (self.inner)(rect, point)
    }
}

impl<F> From<F> for StrengthFn
where
    F: Fn(&Rect, &Point) -> f64 + 'static,
{
    fn from(strength: F) -> Self {
        Self::new(strength)
    }
}

impl PartialEq for StrengthFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for StrengthFn {}

impl fmt::Debug for StrengthFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrengthFn").finish_non_exhaustive()
    }
}

/// Stable, comparable handle for the scroll observer.
///
/// Invoked with the resulting `(scroll_left, scroll_top)` after every active
/// tick.
#[derive(Clone)]
pub struct ScrollChangeFn {
    inner: Rc<dyn Fn(i32, i32)>,
}

impl ScrollChangeFn {
    /// Create an observer handle from a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(i32, i32) + 'static,
    {
        Self {
            inner: Rc::new(handler),
        }
    }

    /// Notify the observer.
    pub fn call(&self, left: i32, top: i32) {
        (self.inner)(left, top)
    }
}

impl<F> From<F> for ScrollChangeFn
where
    F: Fn(i32, i32) + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl Default for ScrollChangeFn {
    fn default() -> Self {
        Self::new(|_, _| {})
    }
}

impl PartialEq for ScrollChangeFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ScrollChangeFn {}

impl fmt::Debug for ScrollChangeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollChangeFn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn handles_compare_by_identity() {
        let a = StrengthFn::new(|_, _| 0.0);
        let b = a.clone();
        let c = StrengthFn::new(|_, _| 0.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn scroll_change_forwards_arguments() {
        let seen = Rc::new(Cell::new((0, 0)));
        let sink = Rc::clone(&seen);
        let handler = ScrollChangeFn::new(move |left, top| sink.set((left, top)));
        handler.call(12, 34);
        assert_eq!(seen.get(), (12, 34));
    }
}
