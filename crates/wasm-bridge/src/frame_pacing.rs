//! Animation-frame scheduling and timing for the editor overlay
//!
//! At most one `requestAnimationFrame` callback is outstanding per editor.
//! The engine's frame coalescer decides when one is needed; this module only
//! talks to the browser.

use std::cell::Cell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Performance, Window};

pub struct FramePacer {
    window: Window,
    /// Performance API for high-resolution timing
    performance: Performance,
    /// Handle of the outstanding frame request
    pending: Cell<Option<i32>>,
    /// Frames that fired
    total_frames: Cell<u64>,
}

impl FramePacer {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let performance = window
            .performance()
            .ok_or_else(|| JsValue::from_str("No performance API"))?;

        Ok(Self {
            window,
            performance,
            pending: Cell::new(None),
            total_frames: Cell::new(0),
        })
    }

    /// Monotonic timestamp in milliseconds
    pub fn now(&self) -> f64 {
        self.performance.now()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Request `callback` on the next frame unless a request is already
    /// outstanding. Returns whether a new request was made.
    pub fn request(&self, callback: impl FnOnce(f64) + 'static) -> Result<bool, JsValue> {
        if self.is_pending() {
            return Ok(false);
        }
        // Frees itself after the single invocation
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        let handle = self
            .window
            .request_animation_frame(closure.unchecked_ref())?;
        self.pending.set(Some(handle));
        Ok(true)
    }

    /// Mark the outstanding request as delivered
    pub fn frame_fired(&self) {
        self.pending.set(None);
        self.total_frames.set(self.total_frames.get() + 1);
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = self.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {e:?}");
            }
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames.get()
    }
}

impl Drop for FramePacer {
    fn drop(&mut self) {
        self.cancel();
    }
}
