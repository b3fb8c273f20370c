//! Text labels anchored at the top-left corner of their box

use annotations_config::HitTestConfig;
use annotations_shared::{Drawing, DrawingPoint};
use nalgebra_glm as glm;

use super::ShapeBehavior;
use crate::geometry::{ScreenPoint, ScreenRect};
use crate::mapper::CoordinateMapper;
use crate::render::{RenderCommand, RenderContext, TextBaseline};

pub struct TextShape;

/// Approximate label box in screen space. Width is estimated from the
/// character count since the engine has no font metrics.
pub fn text_box(
    drawing: &Drawing,
    mapper: &dyn CoordinateMapper,
    default_font_size: f64,
    glyph_width_ratio: f64,
) -> Option<ScreenRect> {
    let [anchor] = drawing.points.as_slice() else {
        return None;
    };
    let origin = mapper.to_screen(anchor)?;
    let font_size = drawing.style.font_size.unwrap_or(default_font_size);
    let chars = drawing.text.as_deref().unwrap_or_default().chars().count() as f64;
    let size = glm::vec2(chars * font_size * glyph_width_ratio, font_size);
    Some(ScreenRect::from_corners(origin, origin + size))
}

impl ShapeBehavior for TextShape {
    fn control_points(
        &self,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
    ) -> Option<Vec<ScreenPoint>> {
        match drawing.points.as_slice() {
            [anchor] => Some(vec![mapper.to_screen(anchor)?]),
            _ => None,
        }
    }

    fn is_near_body(
        &self,
        pos: &ScreenPoint,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
        config: &HitTestConfig,
    ) -> bool {
        text_box(drawing, mapper, config.default_font_size, config.glyph_width_ratio)
            .map(|rect| rect.contains(pos))
            .unwrap_or(false)
    }

    fn reshape(
        &self,
        points: &[DrawingPoint],
        handle: usize,
        target: DrawingPoint,
    ) -> Option<Vec<DrawingPoint>> {
        (handle == 0 && points.len() == 1).then(|| vec![target])
    }

    fn render(&self, drawing: &Drawing, ctx: &RenderContext<'_>, out: &mut Vec<RenderCommand>) {
        let Some(text) = drawing.text.as_deref().filter(|t| !t.is_empty()) else {
            return;
        };
        let Some(position) = drawing
            .points
            .first()
            .and_then(|anchor| ctx.mapper.to_screen(anchor))
        else {
            return;
        };
        out.push(RenderCommand::Text {
            position,
            text: text.to_string(),
            color: drawing.style.color.clone(),
            font: ctx.font(drawing),
            opacity: drawing.style.opacity,
            baseline: TextBaseline::Top,
        });
    }
}
