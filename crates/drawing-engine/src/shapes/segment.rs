//! Two-point segments: trendlines and arrows

use annotations_config::HitTestConfig;
use annotations_shared::{Drawing, DrawingPoint};

use super::ShapeBehavior;
use crate::geometry::{near_segment, ScreenPoint};
use crate::mapper::CoordinateMapper;
use crate::render::{arrowhead, RenderCommand, RenderContext};

pub struct SegmentShape {
    pub arrowhead: bool,
}

impl ShapeBehavior for SegmentShape {
    fn control_points(
        &self,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
    ) -> Option<Vec<ScreenPoint>> {
        match drawing.points.as_slice() {
            [a, b] => Some(vec![mapper.to_screen(a)?, mapper.to_screen(b)?]),
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
        self.control_points(drawing, mapper)
            .map(|ends| {
                near_segment(
                    pos,
                    &ends[0],
                    &ends[1],
                    config.body_threshold,
                    config.min_segment_length,
                )
            })
            .unwrap_or(false)
    }

    fn reshape(
        &self,
        points: &[DrawingPoint],
        handle: usize,
        target: DrawingPoint,
    ) -> Option<Vec<DrawingPoint>> {
        if handle >= 2 || points.len() != 2 {
            return None;
        }
        let mut next = points.to_vec();
        next[handle] = target;
        Some(next)
    }

    fn render(&self, drawing: &Drawing, ctx: &RenderContext<'_>, out: &mut Vec<RenderCommand>) {
        let Some(ends) = self.control_points(drawing, ctx.mapper) else {
            return;
        };
        let stroke = ctx.stroke(drawing);
        if self.arrowhead {
            let size = 8.0 + drawing.style.line_width * 2.0;
            if let Some(wings) = arrowhead(&ends[0], &ends[1], size) {
                out.push(RenderCommand::Polyline {
                    points: wings,
                    closed: false,
                    stroke: ctx.stroke_with(drawing, annotations_shared::LineStyle::Solid),
                });
            }
        }
        out.push(RenderCommand::Polyline {
            points: ends,
            closed: false,
            stroke,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::LinearMapper;
    use annotations_shared::{DrawingStyle, DrawingType};
    use nalgebra_glm as glm;

    // 1 bar = 10px, 1 price unit = 4px
    fn mapper() -> LinearMapper {
        LinearMapper::new((0.0, 100.0), (0.0, 100.0), 1000.0, 400.0)
    }

    fn trendline() -> Drawing {
        Drawing::new(
            DrawingType::Trendline,
            vec![DrawingPoint::new(10, 50.0), DrawingPoint::new(30, 50.0)],
            DrawingStyle::default(),
        )
    }

    #[test]
    fn test_body_hit_near_line() {
        let shape = SegmentShape { arrowhead: false };
        let config = HitTestConfig::default();
        let m = mapper();
        // line runs at y = 200 from x = 100 to x = 300
        assert!(shape.is_near_body(&glm::vec2(200.0, 209.0), &trendline(), &m, &config));
        assert!(!shape.is_near_body(&glm::vec2(200.0, 211.0), &trendline(), &m, &config));
        assert!(!shape.is_near_body(&glm::vec2(330.0, 200.0), &trendline(), &m, &config));
    }

    #[test]
    fn test_reshape_endpoint() {
        let shape = SegmentShape { arrowhead: false };
        let d = trendline();
        let next = shape.reshape(&d.points, 1, DrawingPoint::new(40, 70.0)).unwrap();
        assert_eq!(next[0], d.points[0]);
        assert_eq!(next[1], DrawingPoint::new(40, 70.0));
        assert!(shape.reshape(&d.points, 2, DrawingPoint::new(0, 0.0)).is_none());
    }
}
