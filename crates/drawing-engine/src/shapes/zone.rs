//! Two-point boxes with single-axis handles: buy/sell zones and price ranges

use annotations_config::HitTestConfig;
use annotations_shared::{Drawing, DrawingPoint, LineStyle};
use nalgebra_glm as glm;
use serde::Serialize;

use super::ShapeBehavior;
use crate::geometry::{ScreenPoint, ScreenRect};
use crate::mapper::CoordinateMapper;
use crate::render::{arrowhead, RenderCommand, RenderContext, TextBaseline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    Buy,
    Sell,
    /// Handles move prices; the box is annotated with the price delta
    PriceRange,
}

pub struct ZoneShape {
    pub kind: ZoneKind,
}

/// Difference between the two prices of a price range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRangeReadout {
    pub delta: f64,
    /// `None` when the starting price is zero
    pub percent: Option<f64>,
}

impl PriceRangeReadout {
    pub fn between(from: &DrawingPoint, to: &DrawingPoint) -> Self {
        let delta = to.price - from.price;
        let percent = (from.price != 0.0).then(|| delta / from.price.abs() * 100.0);
        Self { delta, percent }
    }

    pub fn label(&self) -> String {
        match self.percent {
            Some(pct) => format!("{:+.2} ({:+.2}%)", self.delta, pct),
            None => format!("{:+.2}", self.delta),
        }
    }
}

impl ZoneShape {
    fn corners(&self, drawing: &Drawing, mapper: &dyn CoordinateMapper) -> Option<[ScreenPoint; 2]> {
        match drawing.points.as_slice() {
            [a, b] => Some([mapper.to_screen(a)?, mapper.to_screen(b)?]),
            _ => None,
        }
    }
}

impl ShapeBehavior for ZoneShape {
    fn control_points(
        &self,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
    ) -> Option<Vec<ScreenPoint>> {
        let [a, b] = self.corners(drawing, mapper)?;
        match self.kind {
            ZoneKind::Buy | ZoneKind::Sell => {
                let mid_y = (a.y + b.y) / 2.0;
                Some(vec![glm::vec2(a.x, mid_y), glm::vec2(b.x, mid_y)])
            }
            ZoneKind::PriceRange => Some(vec![a, b]),
        }
    }

    fn is_near_body(
        &self,
        pos: &ScreenPoint,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
        config: &HitTestConfig,
    ) -> bool {
        self.corners(drawing, mapper)
            .map(|[a, b]| {
                ScreenRect::from_corners(a, b)
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
        if handle >= 2 || points.len() != 2 {
            return None;
        }
        let mut next = points.to_vec();
        match self.kind {
            ZoneKind::Buy | ZoneKind::Sell => next[handle].time = target.time,
            ZoneKind::PriceRange => next[handle].price = target.price,
        }
        Some(next)
    }

    fn render(&self, drawing: &Drawing, ctx: &RenderContext<'_>, out: &mut Vec<RenderCommand>) {
        let Some([a, b]) = self.corners(drawing, ctx.mapper) else {
            return;
        };
        let corners = ScreenRect::from_corners(a, b).corners();
        if let Some(fill) = ctx.fill(drawing, corners.clone()) {
            out.push(fill);
        }
        out.push(RenderCommand::Polyline {
            points: corners,
            closed: true,
            stroke: ctx.stroke(drawing),
        });

        if self.kind != ZoneKind::PriceRange {
            return;
        }
        let mid_x = (a.x + b.x) / 2.0;
        let from = glm::vec2(mid_x, a.y);
        let to = glm::vec2(mid_x, b.y);
        let mut bracket = vec![from, to];
        if let Some(wings) = arrowhead(&from, &to, 8.0) {
            bracket.extend(wings);
        }
        out.push(RenderCommand::Polyline {
            points: bracket,
            closed: false,
            stroke: ctx.stroke_with(drawing, LineStyle::Solid),
        });

        let readout = PriceRangeReadout::between(&drawing.points[0], &drawing.points[1]);
        let label_y = if b.y <= a.y { b.y - 4.0 } else { b.y + 4.0 };
        out.push(RenderCommand::Text {
            position: glm::vec2(mid_x, label_y),
            text: readout.label(),
            color: drawing.style.color.clone(),
            font: "normal normal 12px sans-serif".to_string(),
            opacity: drawing.style.opacity,
            baseline: if b.y <= a.y {
                TextBaseline::Bottom
            } else {
                TextBaseline::Top
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<DrawingPoint> {
        vec![DrawingPoint::new(10, 100.0), DrawingPoint::new(20, 110.0)]
    }

    #[test]
    fn test_zone_handles_move_time_only() {
        let zone = ZoneShape {
            kind: ZoneKind::Buy,
        };
        let next = zone
            .reshape(&points(), 1, DrawingPoint::new(35, 500.0))
            .unwrap();
        assert_eq!(next[0], points()[0]);
        assert_eq!(next[1], DrawingPoint::new(35, 110.0));
    }

    #[test]
    fn test_price_range_handles_move_price_only() {
        let range = ZoneShape {
            kind: ZoneKind::PriceRange,
        };
        let next = range
            .reshape(&points(), 0, DrawingPoint::new(99, 90.0))
            .unwrap();
        assert_eq!(next[0], DrawingPoint::new(10, 90.0));
        assert_eq!(next[1], points()[1]);
    }

    #[test]
    fn test_readout() {
        let readout = PriceRangeReadout::between(&points()[0], &points()[1]);
        assert!((readout.delta - 10.0).abs() < 1e-9);
        assert!((readout.percent.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(readout.label(), "+10.00 (+10.00%)");

        let from_zero =
            PriceRangeReadout::between(&DrawingPoint::new(0, 0.0), &DrawingPoint::new(1, 5.0));
        assert_eq!(from_zero.percent, None);
    }
}
