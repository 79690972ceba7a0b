//! A DOM element as a [`ScrollContainer`].

use dragscroll::{Rect, ScrollContainer, ScrollMetrics};
use web_sys::HtmlElement;

/// Scroll container backed by an [`HtmlElement`].
///
/// Once the element leaves the document every query returns `None`, which
/// the monitor treats as a no-op.
#[derive(Debug, Clone)]
pub struct DomContainer {
    element: HtmlElement,
}

impl DomContainer {
    /// Wraps `element`.
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    /// The wrapped element.
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl ScrollContainer for DomContainer {
    fn bounding_rect(&self) -> Option<Rect> {
        if !self.element.is_connected() {
            return None;
        }
        let rect = self.element.get_bounding_client_rect();
        Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }

    fn scroll_metrics(&self) -> Option<ScrollMetrics> {
        if !self.element.is_connected() {
            return None;
        }
        let element = &self.element;
        Some(ScrollMetrics {
            scroll_left: element.scroll_left(),
            scroll_top: element.scroll_top(),
            scroll_width: element.scroll_width(),
            scroll_height: element.scroll_height(),
            client_width: element.client_width(),
            client_height: element.client_height(),
        })
    }

    fn set_scroll_left(&self, left: i32) {
        self.element.set_scroll_left(left);
    }

    fn set_scroll_top(&self, top: i32) {
        self.element.set_scroll_top(top);
    }
}
