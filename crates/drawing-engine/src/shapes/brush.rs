//! Freehand strokes. No handles; the stroke can only be moved as a whole.

use annotations_config::HitTestConfig;
use annotations_shared::{Drawing, DrawingPoint};

use super::ShapeBehavior;
use crate::geometry::{distance_to_polyline, ScreenPoint};
use crate::mapper::CoordinateMapper;
use crate::render::{RenderCommand, RenderContext};

pub struct BrushShape;

impl ShapeBehavior for BrushShape {
    fn control_points(
        &self,
        _drawing: &Drawing,
        _mapper: &dyn CoordinateMapper,
    ) -> Option<Vec<ScreenPoint>> {
        Some(Vec::new())
    }

    fn is_near_body(
        &self,
        pos: &ScreenPoint,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
        config: &HitTestConfig,
    ) -> bool {
        mapper
            .project_all(&drawing.points)
            .and_then(|points| distance_to_polyline(pos, &points))
            .map(|d| d <= config.brush_hit_width / 2.0)
            .unwrap_or(false)
    }

    fn reshape(
        &self,
        _points: &[DrawingPoint],
        _handle: usize,
        _target: DrawingPoint,
    ) -> Option<Vec<DrawingPoint>> {
        None
    }

    fn render(&self, drawing: &Drawing, ctx: &RenderContext<'_>, out: &mut Vec<RenderCommand>) {
        let Some(points) = ctx.mapper.project_all(&drawing.points) else {
            return;
        };
        if points.len() < 2 {
            return;
        }
        out.push(RenderCommand::Polyline {
            points,
            closed: false,
            stroke: ctx.stroke(drawing),
        });
    }
}
