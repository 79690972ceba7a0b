//! The scrollable container the monitor drives.

use crate::geometry::Rect;

/// Scroll offsets and extents of a container, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// Current horizontal offset.
    pub scroll_left: i32,
    /// Current vertical offset.
    pub scroll_top: i32,
    /// Full scrollable content width.
    pub scroll_width: i32,
    /// Full scrollable content height.
    pub scroll_height: i32,
    /// Visible width.
    pub client_width: i32,
    /// Visible height.
    pub client_height: i32,
}

impl ScrollMetrics {
    /// Largest valid `scroll_left`, never negative.
    pub fn max_scroll_left(&self) -> i32 {
        (self.scroll_width - self.client_width).max(0)
    }

    /// Largest valid `scroll_top`, never negative.
    pub fn max_scroll_top(&self) -> i32 {
        (self.scroll_height - self.client_height).max(0)
    }
}

/// A scrollable element.
///
/// Implementations return `None` when the element is no longer available
/// (for example after it was unmounted mid-drag); the monitor treats that as
/// "nothing to do this time" rather than an error.
pub trait ScrollContainer {
    /// Current bounding box in viewport coordinates.
    fn bounding_rect(&self) -> Option<Rect>;

    /// Current scroll offsets and extents.
    fn scroll_metrics(&self) -> Option<ScrollMetrics>;

    /// Assigns the horizontal scroll offset.
    fn set_scroll_left(&self, left: i32);

    /// Assigns the vertical scroll offset.
    fn set_scroll_top(&self, top: i32);
}
