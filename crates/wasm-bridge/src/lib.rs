//! WASM bridge for the annotation engine
//! Binds the drawing engine to a chart page: a 2D canvas overlay, the host's
//! coordinate mapper and the host-owned drawing list.

use annotations_config::parser::{ConfigFormat, ConfigParser};
use annotations_engine::events::{ElementState, InputEvent, Key, PhysicalPosition};
use annotations_engine::{
    price_range_readout, CoordinateMapper, DrawingError, DrawingId, DrawingStore, DrawingType,
    EngineConfig, EventResponse, SelectionController, Tool,
};
use annotations_shared::ErrorResponse;
use js_sys::Function;
use wasm_bindgen::prelude::*;

pub mod canvas_renderer;
pub mod controls;
pub mod frame_pacing;
pub mod host;
pub mod instance_manager;

use canvas_renderer::CanvasRenderer;
use controls::WindowListener;
use frame_pacing::FramePacer;
use host::{to_js, JsMapper};
use instance_manager::{EditorInstance, InstanceManager};

use uuid::Uuid;

fn init_runtime() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        // Already initialised when another module on the page set a logger
        let _ = console_log::init_with_level(log::Level::Info);
    });
}

fn to_js_error(err: DrawingError, operation: &str) -> JsValue {
    JsValue::from_str(
        &ErrorResponse::new(&err)
            .with_context("DrawingEditor", operation)
            .to_json(),
    )
}

fn unavailable() -> JsValue {
    JsValue::from_str("Editor instance not found or busy")
}

fn parse_tool(tool: &str) -> Result<Tool, DrawingError> {
    match tool {
        "select" => Ok(Tool::Select),
        other => other.parse::<DrawingType>().map(Tool::Draw),
    }
}

fn request_frame(id: Uuid) {
    let requested = InstanceManager::with_instance_mut(&id, |instance| {
        instance.pacer.request(move |_timestamp| on_frame(id))
    });
    if let Some(Err(e)) = requested {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
}

fn on_frame(id: Uuid) {
    let applied = InstanceManager::with_instance_mut(&id, |instance| {
        instance.pacer.frame_fired();
        instance.dispatch(|controller, store, mapper, _| {
            controller.on_animation_frame(store, mapper)
        })
    });
    if let Some(Err(e)) = applied {
        log::error!("Drag frame failed: {e}");
    }
}

fn release_pointer(id: Uuid) {
    let released = InstanceManager::with_instance_mut(&id, |instance| {
        instance.dispatch(|controller, store, mapper, now| {
            controller.pointer_up(store, mapper, now)
        })
    });
    if let Some(Err(e)) = released {
        log::error!("Pointer release failed: {e}");
    }
}

/// Drawing editor bound to one canvas overlay.
///
/// `mapper` exposes `priceToScreenY`, `screenYToPrice`, `timeIndexToScreenX`
/// and `screenXToTimeIndex`. `getDrawings` returns the host's current list and
/// `setDrawings` receives every replacement list.
#[wasm_bindgen]
pub struct DrawingEditor {
    instance_id: Uuid,
}

#[wasm_bindgen]
impl DrawingEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        mapper: JsValue,
        get_drawings: Function,
        set_drawings: Function,
        config_json: Option<String>,
    ) -> Result<DrawingEditor, JsValue> {
        init_runtime();

        let config = match config_json {
            Some(json) => ConfigParser::parse_string(&json, ConfigFormat::Json)
                .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {e}")))?,
            None => EngineConfig::default(),
        };

        let instance = EditorInstance {
            controller: SelectionController::new(config),
            mapper: JsMapper::new(mapper).map_err(|e| to_js_error(e, "new"))?,
            get_drawings,
            set_drawings,
            renderer: CanvasRenderer::from_canvas_id(canvas_id)?,
            pacer: FramePacer::new()?,
            release_listener: None,
        };
        let instance_id = InstanceManager::create_instance(instance);

        // Releases outside the canvas still end a drag
        let listener = WindowListener::subscribe("pointerup", move |_event| {
            release_pointer(instance_id)
        })?;
        InstanceManager::with_instance_mut(&instance_id, |instance| {
            instance.release_listener = Some(listener);
        })
        .ok_or_else(unavailable)?;

        log::info!("Drawing editor attached to #{canvas_id}");
        Ok(DrawingEditor { instance_id })
    }

    fn run<F>(&self, operation: &str, step: F) -> Result<EventResponse, JsValue>
    where
        F: FnOnce(
            &mut SelectionController,
            &mut dyn DrawingStore,
            &dyn CoordinateMapper,
            f64,
        ) -> EventResponse,
    {
        let response = InstanceManager::with_instance_mut(&self.instance_id, |instance| {
            instance.dispatch(step)
        })
        .ok_or_else(unavailable)?
        .map_err(|e| to_js_error(e, operation))?;

        if response == EventResponse::RequestFrame {
            request_frame(self.instance_id);
        }
        Ok(response)
    }

    /// `"select"` or a drawing type literal such as `"trendline"`
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, tool: &str) -> Result<(), JsValue> {
        let tool = parse_tool(tool).map_err(|e| to_js_error(e, "setTool"))?;
        self.run("setTool", |controller, _, _, _| {
            controller.set_tool(tool);
            EventResponse::Redraw
        })?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setLocked)]
    pub fn set_locked(&self, locked: bool) -> Result<(), JsValue> {
        self.run("setLocked", |controller, _, _, _| {
            controller.set_locked(locked);
            EventResponse::Ignored
        })?;
        Ok(())
    }

    #[wasm_bindgen(js_name = isLocked)]
    pub fn is_locked(&self) -> bool {
        InstanceManager::with_instance_mut(&self.instance_id, |instance| {
            instance.controller.is_locked()
        })
        .unwrap_or(false)
    }

    /// Returns true when the press was consumed
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f64, y: f64) -> Result<bool, JsValue> {
        let response = self.run("pointerDown", |controller, store, mapper, now| {
            controller.handle_event(
                store,
                mapper,
                InputEvent::PointerInput {
                    state: ElementState::Pressed,
                    position: PhysicalPosition::new(x, y),
                    timestamp_ms: now,
                },
            )
        })?;
        Ok(response != EventResponse::Ignored)
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.run("pointerMove", |controller, store, mapper, _| {
            controller.handle_event(
                store,
                mapper,
                InputEvent::PointerMoved {
                    position: PhysicalPosition::new(x, y),
                },
            )
        })?;
        Ok(())
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.run("pointerUp", |controller, store, mapper, now| {
            controller.handle_event(
                store,
                mapper,
                InputEvent::PointerInput {
                    state: ElementState::Released,
                    position: PhysicalPosition::new(x, y),
                    timestamp_ms: now,
                },
            )
        })?;
        Ok(())
    }

    /// Returns true when the properties panel should open
    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&self, x: f64, y: f64) -> Result<bool, JsValue> {
        self.run("doubleClick", |controller, store, mapper, _| {
            controller.handle_event(
                store,
                mapper,
                InputEvent::DoubleClick {
                    position: PhysicalPosition::new(x, y),
                },
            )
        })?;
        Ok(self.properties_target().is_some())
    }

    /// DOM `KeyboardEvent.key`; returns true when the key was handled and the
    /// host should prevent the default action
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&self, key: &str) -> Result<bool, JsValue> {
        let key = Key::from_dom(key);
        if key == Key::Other {
            return Ok(false);
        }
        let response = self.run("keyDown", |controller, store, mapper, now| {
            controller.handle_event(
                store,
                mapper,
                InputEvent::KeyDown {
                    key,
                    timestamp_ms: now,
                },
            )
        })?;
        Ok(response != EventResponse::Ignored)
    }

    /// Replace the buffer of the text being placed
    #[wasm_bindgen(js_name = setPendingText)]
    pub fn set_pending_text(&self, text: &str) -> Result<bool, JsValue> {
        let mut accepted = false;
        self.run("setPendingText", |controller, _, _, _| {
            accepted = controller.set_pending_text(text);
            if accepted {
                EventResponse::Redraw
            } else {
                EventResponse::Ignored
            }
        })?;
        Ok(accepted)
    }

    #[wasm_bindgen(js_name = confirmText)]
    pub fn confirm_text(&self) -> Result<(), JsValue> {
        self.run("confirmText", |controller, store, _, now| {
            controller.confirm_text(store, now)
        })?;
        Ok(())
    }

    #[wasm_bindgen(js_name = cancelText)]
    pub fn cancel_text(&self) -> Result<(), JsValue> {
        self.run("cancelText", |controller, _, _, _| controller.cancel_text())?;
        Ok(())
    }

    #[wasm_bindgen(js_name = pendingText)]
    pub fn pending_text(&self) -> Option<String> {
        InstanceManager::with_instance_mut(&self.instance_id, |instance| {
            instance.controller.pending_text().map(str::to_string)
        })
        .flatten()
    }

    /// Edit one style field of a drawing from the properties panel
    #[wasm_bindgen(js_name = updateField)]
    pub fn update_field(&self, id: &str, key: &str, value: JsValue) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid value for {key}: {e}")))?;
        let id = DrawingId(id.to_string());

        let mut result = Ok(());
        self.run("updateField", |controller, store, _, _| {
            result = controller.update_field(store, &id, key, &value);
            if result.is_ok() {
                EventResponse::Redraw
            } else {
                EventResponse::Ignored
            }
        })?;
        result.map_err(|e| to_js_error(e, "updateField"))
    }

    /// Id of the selected drawing
    #[wasm_bindgen(js_name = editingTarget)]
    pub fn editing_target(&self) -> Option<String> {
        InstanceManager::with_instance_mut(&self.instance_id, |instance| {
            instance.controller.editing_target().map(|id| id.to_string())
        })
        .flatten()
    }

    /// Id of the drawing whose properties panel is open
    #[wasm_bindgen(js_name = propertiesTarget)]
    pub fn properties_target(&self) -> Option<String> {
        InstanceManager::with_instance_mut(&self.instance_id, |instance| {
            instance.controller.properties_target().map(|id| id.to_string())
        })
        .flatten()
    }

    #[wasm_bindgen(js_name = closeProperties)]
    pub fn close_properties(&self) -> Result<(), JsValue> {
        self.run("closeProperties", |controller, _, _, _| {
            controller.close_properties();
            EventResponse::Ignored
        })?;
        Ok(())
    }

    /// The stored drawing with this id, `null` when it is gone
    pub fn drawing(&self, id: &str) -> Result<JsValue, JsValue> {
        let id = DrawingId(id.to_string());
        let mut found = None;
        self.run("drawing", |_, store, _, _| {
            found = store.find(&id).cloned();
            EventResponse::Ignored
        })?;
        to_js(&found).map_err(|e| to_js_error(e, "drawing"))
    }

    /// `{ delta, percent }` for a price range drawing, `null` otherwise
    #[wasm_bindgen(js_name = priceRangeReadout)]
    pub fn price_range_readout(&self, id: &str) -> Result<JsValue, JsValue> {
        let id = DrawingId(id.to_string());
        let mut readout = None;
        self.run("priceRangeReadout", |_, store, _, _| {
            readout = store.find(&id).and_then(price_range_readout);
            EventResponse::Ignored
        })?;
        to_js(&readout).map_err(|e| to_js_error(e, "priceRangeReadout"))
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&self) -> Result<(), JsValue> {
        self.run("clearAll", |controller, store, _, _| controller.clear_all(store))?;
        Ok(())
    }

    /// Repaint after the host changed its drawings or scrolled the chart
    pub fn render(&self) -> Result<(), JsValue> {
        InstanceManager::with_instance_mut(&self.instance_id, |instance| instance.render())
            .ok_or_else(unavailable)?
            .map_err(|e| to_js_error(e, "render"))
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<(), JsValue> {
        InstanceManager::with_instance_mut(&self.instance_id, |instance| {
            instance.renderer.resize(width, height);
            instance.render()
        })
        .ok_or_else(unavailable)?
        .map_err(|e| to_js_error(e, "resize"))
    }

    /// Detach listeners and cancel pending frames
    pub fn destroy(&self) {
        if let Some(instance) = InstanceManager::remove_instance(&self.instance_id) {
            log::info!(
                "Drawing editor {} destroyed after {} drag frames",
                self.instance_id,
                instance.pacer.total_frames()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool() {
        assert_eq!(parse_tool("select").unwrap(), Tool::Select);
        assert_eq!(
            parse_tool("trendline").unwrap(),
            Tool::Draw(DrawingType::Trendline)
        );
        assert!(matches!(
            parse_tool("lasso"),
            Err(DrawingError::UnknownType { .. })
        ));
    }
}
