//! Single-anchor levels: horizontal lines, rays and vertical lines

use annotations_config::HitTestConfig;
use annotations_shared::{Drawing, DrawingPoint};
use nalgebra_glm as glm;

use super::ShapeBehavior;
use crate::geometry::ScreenPoint;
use crate::mapper::CoordinateMapper;
use crate::render::{RenderCommand, RenderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelKind {
    /// Full-width price level
    Horizontal,
    /// Price level starting at the anchor and extending right
    Ray,
    /// Full-height time marker
    Vertical,
}

pub struct LevelShape {
    pub kind: LevelKind,
}

impl LevelShape {
    fn anchor(&self, drawing: &Drawing, mapper: &dyn CoordinateMapper) -> Option<ScreenPoint> {
        match drawing.points.as_slice() {
            [anchor] => mapper.to_screen(anchor),
            _ => None,
        }
    }
}

impl ShapeBehavior for LevelShape {
    fn control_points(
        &self,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
    ) -> Option<Vec<ScreenPoint>> {
        Some(vec![self.anchor(drawing, mapper)?])
    }

    fn is_near_body(
        &self,
        pos: &ScreenPoint,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
        config: &HitTestConfig,
    ) -> bool {
        let Some(anchor) = self.anchor(drawing, mapper) else {
            return false;
        };
        match self.kind {
            LevelKind::Horizontal => (pos.y - anchor.y).abs() <= config.body_threshold,
            LevelKind::Ray => {
                pos.x >= anchor.x && (pos.y - anchor.y).abs() <= config.body_threshold
            }
            LevelKind::Vertical => (pos.x - anchor.x).abs() <= config.body_threshold,
        }
    }

    /// The handle only ever moves the level's own axis; the other
    /// coordinate changes solely under whole-body translation.
    fn reshape(
        &self,
        points: &[DrawingPoint],
        handle: usize,
        target: DrawingPoint,
    ) -> Option<Vec<DrawingPoint>> {
        let [anchor] = points else {
            return None;
        };
        if handle != 0 {
            return None;
        }
        let moved = match self.kind {
            LevelKind::Horizontal | LevelKind::Ray => DrawingPoint {
                time: anchor.time,
                price: target.price,
            },
            LevelKind::Vertical => DrawingPoint {
                time: target.time,
                price: anchor.price,
            },
        };
        Some(vec![moved])
    }

    fn translate(&self, original: &[DrawingPoint], dt: i64, dp: f64) -> Vec<DrawingPoint> {
        original
            .iter()
            .map(|p| match self.kind {
                LevelKind::Horizontal => p.offset_by(0, dp),
                LevelKind::Vertical => p.offset_by(dt, 0.0),
                LevelKind::Ray => p.offset_by(dt, dp),
            })
            .collect()
    }

    fn render(&self, drawing: &Drawing, ctx: &RenderContext<'_>, out: &mut Vec<RenderCommand>) {
        let Some(anchor) = self.anchor(drawing, ctx.mapper) else {
            return;
        };
        let points = match self.kind {
            LevelKind::Horizontal => vec![
                glm::vec2(0.0, anchor.y),
                glm::vec2(ctx.viewport.width, anchor.y),
            ],
            LevelKind::Ray => vec![anchor, glm::vec2(ctx.viewport.width.max(anchor.x), anchor.y)],
            LevelKind::Vertical => vec![
                glm::vec2(anchor.x, 0.0),
                glm::vec2(anchor.x, ctx.viewport.height),
            ],
        };
        out.push(RenderCommand::Polyline {
            points,
            closed: false,
            stroke: ctx.stroke(drawing),
        });
    }
}
