//! DOM event delivery.

use dragscroll::{
    EventHost, ListenTarget, MoveChannel, MoveEvent, Point, Subscription, event::MoveHandler,
};
use gloo::events::EventListener;
use tracing::trace;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlElement, MouseEvent, TouchEvent};

use crate::error::{WebError, body};

/// Registers move listeners on a container element and `document.body`.
#[derive(Debug, Clone)]
pub struct DomEventHost {
    container: HtmlElement,
    body: HtmlElement,
}

impl DomEventHost {
    /// Creates a host for `container` and an explicit body element.
    pub fn new(container: HtmlElement, body: HtmlElement) -> Self {
        Self { container, body }
    }

    /// Creates a host for `container` using the current document's body.
    pub fn for_document(container: HtmlElement) -> Result<Self, WebError> {
        Ok(Self::new(container, body()?))
    }
}

impl EventHost for DomEventHost {
    fn listen(
        &self,
        target: ListenTarget,
        channel: MoveChannel,
        handler: MoveHandler,
    ) -> Subscription {
        let event_target: &EventTarget = match target {
            ListenTarget::Container => &self.container,
            ListenTarget::Body => &self.body,
        };
        trace!(?target, event = channel.event_type(), "adding listener");
        let listener = EventListener::new(event_target, channel.event_type(), move |event: &Event| {
            if let Some(event) = to_move_event(channel, event) {
                handler(&event);
            }
        });
        Subscription::from_guard(listener)
    }
}

/// Extracts the pointer position from a DOM event.
///
/// Drag events report their own client coordinates; touch events use the
/// first active touch and are skipped when no touch is active.
pub fn to_move_event(channel: MoveChannel, event: &Event) -> Option<MoveEvent> {
    match channel {
        MoveChannel::DragOver => {
            let event = event.dyn_ref::<MouseEvent>()?;
            Some(MoveEvent::drag_over(Point::from((
                event.client_x(),
                event.client_y(),
            ))))
        }
        MoveChannel::TouchMove => {
            let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
            Some(MoveEvent::touch_move(Point::from((
                touch.client_x(),
                touch.client_y(),
            ))))
        }
    }
}
