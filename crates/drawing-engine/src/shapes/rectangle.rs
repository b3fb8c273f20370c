//! Axis-aligned rectangles with corner and edge-midpoint handles

use annotations_config::HitTestConfig;
use annotations_shared::{Drawing, DrawingPoint};
use nalgebra_glm as glm;

use super::ShapeBehavior;
use crate::geometry::{ScreenPoint, ScreenRect};
use crate::mapper::CoordinateMapper;
use crate::render::{RenderCommand, RenderContext};

/// Handle order: four corners clockwise from top-left, then the
/// top, right, bottom and left edge midpoints. "Top" is the higher price.
pub const TOP_LEFT: usize = 0;
pub const TOP_RIGHT: usize = 1;
pub const BOTTOM_RIGHT: usize = 2;
pub const BOTTOM_LEFT: usize = 3;
pub const TOP_MID: usize = 4;
pub const RIGHT_MID: usize = 5;
pub const BOTTOM_MID: usize = 6;
pub const LEFT_MID: usize = 7;

pub struct RectangleShape;

/// Data-space bounds of a two-point box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: i64,
    pub right: i64,
    pub bottom: f64,
    pub top: f64,
}

impl Bounds {
    pub fn of(a: &DrawingPoint, b: &DrawingPoint) -> Self {
        Self {
            left: a.time.min(b.time),
            right: a.time.max(b.time),
            bottom: a.price.min(b.price),
            top: a.price.max(b.price),
        }
    }

    /// Stored form: the min corner followed by the max corner
    pub fn to_points(self) -> Vec<DrawingPoint> {
        let normalized = Bounds::of(
            &DrawingPoint::new(self.left, self.bottom),
            &DrawingPoint::new(self.right, self.top),
        );
        vec![
            DrawingPoint::new(normalized.left, normalized.bottom),
            DrawingPoint::new(normalized.right, normalized.top),
        ]
    }
}

impl ShapeBehavior for RectangleShape {
    fn control_points(
        &self,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
    ) -> Option<Vec<ScreenPoint>> {
        let [a, b] = drawing.points.as_slice() else {
            return None;
        };
        let bounds = Bounds::of(a, b);
        let left = mapper.time_to_x(bounds.left as f64)?;
        let right = mapper.time_to_x(bounds.right as f64)?;
        let top = mapper.price_to_y(bounds.top)?;
        let bottom = mapper.price_to_y(bounds.bottom)?;
        let mid_x = (left + right) / 2.0;
        let mid_y = (top + bottom) / 2.0;
        Some(vec![
            glm::vec2(left, top),
            glm::vec2(right, top),
            glm::vec2(right, bottom),
            glm::vec2(left, bottom),
            glm::vec2(mid_x, top),
            glm::vec2(right, mid_y),
            glm::vec2(mid_x, bottom),
            glm::vec2(left, mid_y),
        ])
    }

    fn is_near_body(
        &self,
        pos: &ScreenPoint,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
        config: &HitTestConfig,
    ) -> bool {
        drawing.points.len() == 2
            && mapper
                .project_all(&drawing.points)
                .map(|p| {
                    ScreenRect::from_corners(p[0], p[1])
                        .expanded(config.body_threshold)
                        .contains(pos)
                })
                .unwrap_or(false)
    }

    fn reshape(
        &self,
        points: &[DrawingPoint],
        handle: usize,
        target: DrawingPoint,
    ) -> Option<Vec<DrawingPoint>> {
        let [a, b] = points else {
            return None;
        };
        let mut bounds = Bounds::of(a, b);
        match handle {
            TOP_LEFT => {
                bounds.left = target.time;
                bounds.top = target.price;
            }
            TOP_RIGHT => {
                bounds.right = target.time;
                bounds.top = target.price;
            }
            BOTTOM_RIGHT => {
                bounds.right = target.time;
                bounds.bottom = target.price;
            }
            BOTTOM_LEFT => {
                bounds.left = target.time;
                bounds.bottom = target.price;
            }
            TOP_MID => bounds.top = target.price,
            RIGHT_MID => bounds.right = target.time,
            BOTTOM_MID => bounds.bottom = target.price,
            LEFT_MID => bounds.left = target.time,
            _ => return None,
        }
        Some(bounds.to_points())
    }

    fn render(&self, drawing: &Drawing, ctx: &RenderContext<'_>, out: &mut Vec<RenderCommand>) {
        if drawing.points.len() != 2 {
            return;
        }
        let Some(p) = ctx.mapper.project_all(&drawing.points) else {
            return;
        };
        let corners = ScreenRect::from_corners(p[0], p[1]).corners();
        if let Some(fill) = ctx.fill(drawing, corners.clone()) {
            out.push(fill);
        }
        out.push(RenderCommand::Polyline {
            points: corners,
            closed: true,
            stroke: ctx.stroke(drawing),
        });
    }
}
