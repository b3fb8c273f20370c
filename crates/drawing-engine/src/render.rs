//! Backend-agnostic display list for drawings, previews and handles
//!
//! The engine never touches a canvas. It turns the host's drawings and the
//! controller state into a flat list of [`RenderCommand`]s which a backend
//! (the Canvas2D renderer in the wasm bridge, or a test) replays in order.

use annotations_config::EngineConfig;
use annotations_shared::{Drawing, LineStyle};
use nalgebra_glm as glm;

use crate::controller::SelectionController;
use crate::geometry::ScreenPoint;
use crate::mapper::CoordinateMapper;
use crate::shapes::behavior_for;

/// Pixel size of the overlay surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
    pub dash: Vec<f64>,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Polyline {
        points: Vec<ScreenPoint>,
        closed: bool,
        stroke: StrokeStyle,
    },
    Fill {
        points: Vec<ScreenPoint>,
        color: String,
        opacity: f64,
    },
    Text {
        position: ScreenPoint,
        text: String,
        color: String,
        font: String,
        opacity: f64,
        baseline: TextBaseline,
    },
    Handle {
        center: ScreenPoint,
        radius: f64,
        color: String,
    },
}

/// Everything a shape needs to emit its commands
pub struct RenderContext<'a> {
    pub mapper: &'a dyn CoordinateMapper,
    pub viewport: Viewport,
    pub config: &'a EngineConfig,
    /// Construction preview: strokes are forced to the preview pattern
    pub preview: bool,
}

impl RenderContext<'_> {
    pub fn stroke(&self, drawing: &Drawing) -> StrokeStyle {
        let line_style = if self.preview {
            self.config.interaction.preview_line_style
        } else {
            drawing.style.line_style
        };
        self.stroke_with(drawing, line_style)
    }

    pub fn stroke_with(&self, drawing: &Drawing, line_style: LineStyle) -> StrokeStyle {
        StrokeStyle {
            color: drawing.style.color.clone(),
            width: drawing.style.line_width,
            dash: line_style.dash_pattern(drawing.style.line_width),
            opacity: drawing.style.opacity,
        }
    }

    /// Background fill, if the drawing has one
    pub fn fill(&self, drawing: &Drawing, points: Vec<ScreenPoint>) -> Option<RenderCommand> {
        let color = drawing.style.background_color.clone()?;
        Some(RenderCommand::Fill {
            points,
            color,
            opacity: drawing.style.background_opacity.unwrap_or(0.2) * drawing.style.opacity,
        })
    }

    pub fn font(&self, drawing: &Drawing) -> String {
        format!(
            "{} {} {}px sans-serif",
            drawing.style.font_style.as_deref().unwrap_or("normal"),
            drawing.style.font_weight.as_deref().unwrap_or("normal"),
            self.font_size(drawing)
        )
    }

    pub fn font_size(&self, drawing: &Drawing) -> f64 {
        drawing
            .style
            .font_size
            .unwrap_or(self.config.hit_test.default_font_size)
    }
}

pub const HANDLE_RADIUS: f64 = 4.5;
pub const HANDLE_COLOR: &str = "#ffffff";

/// Build the display list for one frame: committed drawings in store order,
/// then the selected drawing's handles, then the construction preview.
pub fn build_display_list(
    drawings: &[Drawing],
    controller: &SelectionController,
    mapper: &dyn CoordinateMapper,
    viewport: Viewport,
) -> Vec<RenderCommand> {
    let config = controller.config();
    let ctx = RenderContext {
        mapper,
        viewport,
        config,
        preview: false,
    };

    let mut commands = Vec::new();
    for drawing in drawings {
        if !drawing.is_well_formed() {
            log::trace!("Skipping malformed drawing {}", drawing.id);
            continue;
        }
        behavior_for(drawing.drawing_type).render(drawing, &ctx, &mut commands);
    }

    if let Some(selected) = controller
        .editing_target()
        .and_then(|id| drawings.iter().find(|d| &d.id == id))
    {
        commands.extend(handle_commands(selected, mapper));
    }

    if let Some(preview) = controller.preview_drawing() {
        let preview_ctx = RenderContext {
            preview: true,
            ..ctx
        };
        render_preview(&preview, &preview_ctx, &mut commands);
    }

    commands
}

/// Handle markers for a drawing's control points
pub fn handle_commands(drawing: &Drawing, mapper: &dyn CoordinateMapper) -> Vec<RenderCommand> {
    behavior_for(drawing.drawing_type)
        .control_points(drawing, mapper)
        .unwrap_or_default()
        .into_iter()
        .map(|center| RenderCommand::Handle {
            center,
            radius: HANDLE_RADIUS,
            color: HANDLE_COLOR.to_string(),
        })
        .collect()
}

/// A complete preview renders as its shape; a partial one as a dashed guide
/// through the points placed so far.
fn render_preview(preview: &Drawing, ctx: &RenderContext<'_>, out: &mut Vec<RenderCommand>) {
    if preview.is_well_formed() {
        behavior_for(preview.drawing_type).render(preview, ctx, out);
        return;
    }
    if let Some(points) = ctx.mapper.project_all(&preview.points) {
        if points.len() > 1 {
            out.push(RenderCommand::Polyline {
                points,
                closed: false,
                stroke: ctx.stroke(preview),
            });
        }
    }
}

/// Two short wings at `tip`, pointing back towards `from`
pub fn arrowhead(from: &ScreenPoint, tip: &ScreenPoint, size: f64) -> Option<Vec<ScreenPoint>> {
    let dir = tip - from;
    let len = glm::length(&dir);
    if len <= f64::EPSILON {
        return None;
    }
    let back = dir / len * -size;
    let normal = glm::vec2(-back.y, back.x) * 0.5;
    Some(vec![tip + back + normal, *tip, tip + back - normal])
}
