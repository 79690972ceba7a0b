//! Browser bindings for [`dragscroll`].
//!
//! Wires a [`ScrollingMonitor`] to a real DOM element: geometry and offsets
//! come from the element, move events from `dragover`/`touchmove`
//! listeners, ticks from `requestAnimationFrame` and throttle windows from
//! `setTimeout`.
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use dragscroll::ScrollOptions;
//! use dragscroll_web::{NativeDragState, attach_scrolling};
//!
//! let drag_state = Rc::new(NativeDragState::install()?);
//! let monitor = attach_scrolling(&list_element, Some(drag_state), ScrollOptions::default())?;
//! monitor.start();
//! // on unmount
//! monitor.stop();
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod container;
pub mod drag_state;
mod error;
pub mod events;
pub mod scheduler;

use std::rc::Rc;

use dragscroll::{DragStateSource, ScrollOptions, ScrollingMonitor};
use tracing::debug;
use web_sys::HtmlElement;

pub use crate::{
    container::DomContainer, drag_state::NativeDragState, error::WebError,
    events::DomEventHost, scheduler::AnimationFrameScheduler,
};

/// Builds an unstarted monitor for `element`.
///
/// Listeners go on `element` and the current `document.body`. Passing `None`
/// for `drag_source` fails with [`dragscroll::MonitorError::MissingDragSource`].
pub fn attach_scrolling(
    element: &HtmlElement,
    drag_source: Option<Rc<dyn DragStateSource>>,
    options: ScrollOptions,
) -> Result<ScrollingMonitor, WebError> {
    let host = DomEventHost::for_document(element.clone())?;
    let monitor = dragscroll::attach_scrolling(
        Rc::new(DomContainer::new(element.clone())),
        Rc::new(host),
        Rc::new(AnimationFrameScheduler::new()),
        drag_source,
        options,
    )?;
    debug!(id = %element.id(), "attached scrolling monitor");
    Ok(monitor)
}
