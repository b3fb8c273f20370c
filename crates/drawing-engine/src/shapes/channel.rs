//! Parallel channels
//!
//! Stored as three points `p1, p2, p3`. Line A runs `p1 -> p2`; line B is
//! line A shifted by `offset = p3 - p1`, so the two lines are parallel by
//! construction. Handles:
//!
//! | index | position          | drag effect                                  |
//! |-------|-------------------|----------------------------------------------|
//! | 0     | `p1`              | moves `p1`                                   |
//! | 1     | `p2`              | moves `p2`                                   |
//! | 2     | `p3`              | moves `p3`                                   |
//! | 3     | `p2 + offset`     | `p3 = target - p2 + p1`                      |
//! | 4     | midpoint of A     | width change along the normal of A           |
//! | 5     | midpoint of B     | width change along the normal of A           |
//!
//! Width changes are measured from the handle's position in the points being
//! reshaped, so callers pass the drag-start snapshot.

use annotations_config::HitTestConfig;
use annotations_shared::{Drawing, DrawingPoint, LineStyle};
use nalgebra_glm as glm;

use super::ShapeBehavior;
use crate::geometry::{near_segment, ScreenPoint};
use crate::mapper::CoordinateMapper;
use crate::render::{RenderCommand, RenderContext};

pub struct ParallelChannelShape;

/// Channel points in continuous data space (time as `f64`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelGeometry {
    pub p1: glm::DVec2,
    pub p2: glm::DVec2,
    pub offset: glm::DVec2,
}

fn to_vec(p: &DrawingPoint) -> glm::DVec2 {
    glm::vec2(p.time as f64, p.price)
}

fn to_point(v: &glm::DVec2) -> DrawingPoint {
    DrawingPoint::new(v.x.round() as i64, v.y)
}

impl ChannelGeometry {
    pub fn of(points: &[DrawingPoint]) -> Option<Self> {
        let [p1, p2, p3] = points else {
            return None;
        };
        Some(Self {
            p1: to_vec(p1),
            p2: to_vec(p2),
            offset: to_vec(p3) - to_vec(p1),
        })
    }

    /// Handle positions in data space, in handle-index order
    pub fn handles(&self) -> [glm::DVec2; 6] {
        let mid_a = (self.p1 + self.p2) * 0.5;
        [
            self.p1,
            self.p2,
            self.p1 + self.offset,
            self.p2 + self.offset,
            mid_a,
            mid_a + self.offset,
        ]
    }

    /// Component of `delta` along the normal of line A.
    /// A degenerate line A leaves only the price component.
    pub fn project_on_normal(&self, delta: &glm::DVec2) -> glm::DVec2 {
        let dir = self.p2 - self.p1;
        let normal = glm::vec2(-dir.y, dir.x);
        let norm_sq = glm::dot(&normal, &normal);
        if norm_sq <= f64::EPSILON {
            return glm::vec2(0.0, delta.y);
        }
        normal * (glm::dot(delta, &normal) / norm_sq)
    }
}

impl ParallelChannelShape {
    fn screen_lines(
        &self,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
    ) -> Option<[ScreenPoint; 4]> {
        let geometry = ChannelGeometry::of(&drawing.points)?;
        let h = geometry.handles();
        let project = |v: &glm::DVec2| -> Option<ScreenPoint> {
            Some(glm::vec2(mapper.time_to_x(v.x)?, mapper.price_to_y(v.y)?))
        };
        Some([project(&h[0])?, project(&h[1])?, project(&h[2])?, project(&h[3])?])
    }
}

impl ShapeBehavior for ParallelChannelShape {
    fn control_points(
        &self,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
    ) -> Option<Vec<ScreenPoint>> {
        let geometry = ChannelGeometry::of(&drawing.points)?;
        geometry
            .handles()
            .iter()
            .map(|h| Some(glm::vec2(mapper.time_to_x(h.x)?, mapper.price_to_y(h.y)?)))
            .collect()
    }

    fn is_near_body(
        &self,
        pos: &ScreenPoint,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
        config: &HitTestConfig,
    ) -> bool {
        let Some([a1, a2, b1, b2]) = self.screen_lines(drawing, mapper) else {
            return false;
        };
        let near = |from: &ScreenPoint, to: &ScreenPoint| {
            near_segment(
                pos,
                from,
                to,
                config.body_threshold,
                config.min_segment_length,
            )
        };
        near(&a1, &a2) || near(&b1, &b2)
    }

    fn reshape(
        &self,
        points: &[DrawingPoint],
        handle: usize,
        target: DrawingPoint,
    ) -> Option<Vec<DrawingPoint>> {
        let geometry = ChannelGeometry::of(points)?;
        let mut next = points.to_vec();
        match handle {
            0 => next[0] = target,
            1 => next[1] = target,
            2 => next[2] = target,
            3 => {
                next[2] = DrawingPoint::new(
                    target.time - points[1].time + points[0].time,
                    target.price - points[1].price + points[0].price,
                );
            }
            4 | 5 => {
                let grabbed = geometry.handles()[handle];
                let delta = to_vec(&target) - grabbed;
                let offset = geometry.offset + geometry.project_on_normal(&delta);
                next[2] = to_point(&(geometry.p1 + offset));
            }
            _ => return None,
        }
        Some(next)
    }

    fn render(&self, drawing: &Drawing, ctx: &RenderContext<'_>, out: &mut Vec<RenderCommand>) {
        let Some([a1, a2, b1, b2]) = self.screen_lines(drawing, ctx.mapper) else {
            return;
        };
        if let Some(fill) = ctx.fill(drawing, vec![a1, a2, b2, b1]) {
            out.push(fill);
        }
        let stroke = ctx.stroke(drawing);
        out.push(RenderCommand::Polyline {
            points: vec![a1, a2],
            closed: false,
            stroke: stroke.clone(),
        });
        out.push(RenderCommand::Polyline {
            points: vec![b1, b2],
            closed: false,
            stroke,
        });
        if drawing.style.show_midline.unwrap_or(false) {
            out.push(RenderCommand::Polyline {
                points: vec![(a1 + b1) * 0.5, (a2 + b2) * 0.5],
                closed: false,
                stroke: ctx.stroke_with(drawing, LineStyle::Dashed),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> Vec<DrawingPoint> {
        vec![
            DrawingPoint::new(0, 100.0),
            DrawingPoint::new(10, 110.0),
            DrawingPoint::new(0, 90.0),
        ]
    }

    fn offset(points: &[DrawingPoint]) -> (i64, f64) {
        (
            points[2].time - points[0].time,
            points[2].price - points[0].price,
        )
    }

    #[test]
    fn test_fourth_corner_solves_for_p3() {
        let next = ParallelChannelShape
            .reshape(&channel(), 3, DrawingPoint::new(12, 95.0))
            .unwrap();
        // p4 = p2 + offset must land on the target
        let (dt, dp) = offset(&next);
        assert_eq!(next[1].time + dt, 12);
        assert!((next[1].price + dp - 95.0).abs() < 1e-9);
        assert_eq!(&next[..2], &channel()[..2]);
    }

    #[test]
    fn test_width_handle_moves_along_normal_only() {
        // line A direction (10, 10) -> normal (-10, 10)
        let before = channel();
        let grabbed = ChannelGeometry::of(&before).unwrap().handles()[4];
        let target = DrawingPoint::new(grabbed.x as i64 - 3, grabbed.y + 5.0);

        let next = ParallelChannelShape.reshape(&before, 4, target).unwrap();
        let (dt0, dp0) = offset(&before);
        let (dt1, dp1) = offset(&next);
        let change = glm::vec2((dt1 - dt0) as f64, dp1 - dp0);

        // projection of (-3, 5) onto (-10, 10) is (-4, 4)
        assert_eq!(dt1 - dt0, -4);
        assert!((dp1 - dp0 - 4.0).abs() < 1e-9);
        assert!(glm::dot(&change, &glm::vec2(10.0, 10.0)).abs() < 1e-9);
        assert_eq!(&next[..2], &before[..2]);
    }

    #[test]
    fn test_flat_channel_width_handle_changes_price_only() {
        let flat = vec![
            DrawingPoint::new(0, 100.0),
            DrawingPoint::new(10, 100.0),
            DrawingPoint::new(0, 90.0),
        ];
        let next = ParallelChannelShape
            .reshape(&flat, 5, DrawingPoint::new(8, 80.0))
            .unwrap();
        assert_eq!(next[2], DrawingPoint::new(0, 80.0));
    }

    #[test]
    fn test_line_a_handle_width_is_measured_from_given_points() {
        let flat = vec![
            DrawingPoint::new(10, 50.0),
            DrawingPoint::new(30, 50.0),
            DrawingPoint::new(10, 40.0),
        ];
        // same target twice from the same snapshot, same answer
        for _ in 0..2 {
            let next = ParallelChannelShape
                .reshape(&flat, 4, DrawingPoint::new(20, 55.0))
                .unwrap();
            assert_eq!(next[2], DrawingPoint::new(10, 45.0));
        }
    }

    #[test]
    fn test_unknown_handle() {
        assert!(ParallelChannelShape
            .reshape(&channel(), 6, DrawingPoint::new(0, 0.0))
            .is_none());
    }
}
