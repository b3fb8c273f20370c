//! JavaScript-backed implementations of the engine's host seams

use annotations_engine::{CoordinateMapper, Drawing, DrawingError, DrawingResult, DrawingStore};
use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn js_error(message: impl Into<String>) -> DrawingError {
    DrawingError::JsInterop {
        message: message.into(),
    }
}

fn method(target: &JsValue, name: &str) -> DrawingResult<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or_else(|| js_error(format!("mapper is missing function `{name}`")))
}

/// The host chart's projection functions:
/// `priceToScreenY`, `screenYToPrice`, `timeIndexToScreenX`, `screenXToTimeIndex`.
/// Any of them may return `null`/`undefined` while the chart is not laid out.
pub struct JsMapper {
    this: JsValue,
    price_to_y: Function,
    y_to_price: Function,
    time_to_x: Function,
    x_to_time: Function,
}

impl JsMapper {
    pub fn new(mapper: JsValue) -> DrawingResult<Self> {
        Ok(Self {
            price_to_y: method(&mapper, "priceToScreenY")?,
            y_to_price: method(&mapper, "screenYToPrice")?,
            time_to_x: method(&mapper, "timeIndexToScreenX")?,
            x_to_time: method(&mapper, "screenXToTimeIndex")?,
            this: mapper,
        })
    }

    fn call(&self, f: &Function, arg: f64) -> Option<f64> {
        match f.call1(&self.this, &JsValue::from_f64(arg)) {
            Ok(value) => value.as_f64().filter(|v| v.is_finite()),
            Err(e) => {
                log::warn!("Mapper call failed: {e:?}");
                None
            }
        }
    }
}

impl CoordinateMapper for JsMapper {
    fn price_to_y(&self, price: f64) -> Option<f64> {
        self.call(&self.price_to_y, price)
    }

    fn y_to_price(&self, y: f64) -> Option<f64> {
        self.call(&self.y_to_price, y)
    }

    fn time_to_x(&self, time: f64) -> Option<f64> {
        self.call(&self.time_to_x, time)
    }

    fn x_to_time(&self, x: f64) -> Option<i64> {
        self.call(&self.x_to_time, x).map(|t| t.round() as i64)
    }
}

/// Snapshot of the host's drawings taken at the start of an event, written
/// back through the host setter on every change
pub struct JsDrawingStore<'a> {
    drawings: Vec<Drawing>,
    setter: &'a Function,
}

impl<'a> JsDrawingStore<'a> {
    pub fn load(getter: &Function, setter: &'a Function) -> DrawingResult<Self> {
        let value = getter
            .call0(&JsValue::NULL)
            .map_err(|e| js_error(format!("getDrawings threw: {e:?}")))?;
        let drawings = if value.is_null() || value.is_undefined() {
            Vec::new()
        } else {
            serde_wasm_bindgen::from_value(value).map_err(|e| DrawingError::Serialization {
                message: e.to_string(),
            })?
        };
        Ok(Self { drawings, setter })
    }

    pub fn into_drawings(self) -> Vec<Drawing> {
        self.drawings
    }
}

impl DrawingStore for JsDrawingStore<'_> {
    fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    fn set_drawings(&mut self, drawings: Vec<Drawing>) {
        match to_js(&drawings) {
            Ok(value) => {
                if let Err(e) = self.setter.call1(&JsValue::NULL, &value) {
                    log::error!("setDrawings threw: {e:?}");
                }
            }
            Err(e) => log::error!("Failed to serialize drawings: {e}"),
        }
        self.drawings = drawings;
    }
}

/// Plain JS objects with numbers (not BigInt) for bar indices
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> DrawingResult<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| DrawingError::Serialization {
            message: e.to_string(),
        })
}
