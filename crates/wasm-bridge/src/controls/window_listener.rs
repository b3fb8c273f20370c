//! Window-level pointer release subscription
//!
//! A drag that leaves the canvas never sees the canvas `pointerup`. The
//! editor therefore also listens on the window for as long as it lives;
//! dropping the subscription removes the listener.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, Window};

pub struct WindowListener {
    window: Window,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
    pub fn subscribe(
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        log::debug!("Subscribed to window {event}");
        Ok(Self {
            window,
            event,
            closure,
        })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove window {} listener: {e:?}", self.event);
        }
    }
}
