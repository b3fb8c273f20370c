//! Canvas2D backend replaying the engine's display list

use std::f64::consts::TAU;

use annotations_engine::render::StrokeStyle;
use annotations_engine::{RenderCommand, TextBaseline, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const HANDLE_BORDER: &str = "#2962ff";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn from_canvas_id(canvas_id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas #{canvas_id} not found")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Canvas 2D context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn draw(&self, commands: &[RenderCommand]) -> Result<(), JsValue> {
        let viewport = self.viewport();
        self.ctx
            .clear_rect(0.0, 0.0, viewport.width, viewport.height);
        for command in commands {
            self.ctx.save();
            let result = self.draw_command(command);
            self.ctx.restore();
            result?;
        }
        Ok(())
    }

    fn draw_command(&self, command: &RenderCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            RenderCommand::Polyline {
                points,
                closed,
                stroke,
            } => {
                if !self.trace(points, *closed) {
                    return Ok(());
                }
                self.apply_stroke(stroke)?;
                ctx.stroke();
            }
            RenderCommand::Fill {
                points,
                color,
                opacity,
            } => {
                if !self.trace(points, true) {
                    return Ok(());
                }
                ctx.set_global_alpha(*opacity);
                ctx.set_fill_style_str(color);
                ctx.fill();
            }
            RenderCommand::Text {
                position,
                text,
                color,
                font,
                opacity,
                baseline,
            } => {
                ctx.set_global_alpha(*opacity);
                ctx.set_fill_style_str(color);
                ctx.set_font(font);
                ctx.set_text_baseline(match baseline {
                    TextBaseline::Top => "top",
                    TextBaseline::Middle => "middle",
                    TextBaseline::Bottom => "bottom",
                });
                ctx.fill_text(text, position.x, position.y)?;
            }
            RenderCommand::Handle {
                center,
                radius,
                color,
            } => {
                ctx.begin_path();
                ctx.arc(center.x, center.y, *radius, 0.0, TAU)?;
                ctx.set_fill_style_str(color);
                ctx.fill();
                ctx.set_line_width(1.5);
                ctx.set_stroke_style_str(HANDLE_BORDER);
                ctx.stroke();
            }
        }
        Ok(())
    }

    /// Build the current path; `false` when there is nothing to draw
    fn trace(&self, points: &[annotations_engine::geometry::ScreenPoint], closed: bool) -> bool {
        let [first, rest @ ..] = points else {
            return false;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        if closed {
            self.ctx.close_path();
        }
        true
    }

    fn apply_stroke(&self, stroke: &StrokeStyle) -> Result<(), JsValue> {
        let dash: js_sys::Array = stroke.dash.iter().map(|d| JsValue::from_f64(*d)).collect();
        self.ctx.set_line_dash(&dash)?;
        self.ctx.set_global_alpha(stroke.opacity);
        self.ctx.set_line_width(stroke.width);
        self.ctx.set_stroke_style_str(&stroke.color);
        Ok(())
    }
}
