//! HTML5 drag-and-drop state.

use dragscroll::{DragFlag, DragStateSource, Subscription, drag::DragListener};
use gloo::events::EventListener;
use web_sys::Document;

use crate::error::{WebError, document};

/// [`DragStateSource`] that follows native drag-and-drop on a document.
///
/// `dragstart` sets the state; `dragend` and `drop` clear it. Only drags
/// that start inside the document are seen.
#[derive(Debug)]
pub struct NativeDragState {
    flag: DragFlag,
    _listeners: [EventListener; 3],
}

impl NativeDragState {
    /// Tracks drags on `document`.
    pub fn new(document: &Document) -> Self {
        let flag = DragFlag::new();
        let listen = |event_type: &'static str, dragging: bool| {
            let flag = flag.clone();
            EventListener::new(document, event_type, move |_| flag.set_dragging(dragging))
        };
        let listeners = [
            listen("dragstart", true),
            listen("dragend", false),
            listen("drop", false),
        ];
        Self {
            flag,
            _listeners: listeners,
        }
    }

    /// Tracks drags on the current document.
    pub fn install() -> Result<Self, WebError> {
        Ok(Self::new(&document()?))
    }

    /// The underlying flag, for embedders that also set it by hand.
    pub fn flag(&self) -> &DragFlag {
        &self.flag
    }
}

impl DragStateSource for NativeDragState {
    fn is_dragging(&self) -> bool {
        self.flag.is_dragging()
    }

    fn subscribe(&self, listener: DragListener) -> Subscription {
        self.flag.subscribe(listener)
    }
}
