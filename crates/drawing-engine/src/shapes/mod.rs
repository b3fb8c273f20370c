//! Per-variant shape behaviour
//!
//! Every [`DrawingType`] maps to one [`ShapeBehavior`] implementation that
//! knows where its handles are, how its body is hit, how a dragged handle
//! reshapes it and how it draws itself. Callers go through [`behavior_for`]
//! instead of matching on the type.

use annotations_config::HitTestConfig;
use annotations_shared::{Drawing, DrawingPoint, DrawingType};

use crate::geometry::ScreenPoint;
use crate::mapper::CoordinateMapper;
use crate::render::{RenderCommand, RenderContext};

pub mod brush;
pub mod channel;
pub mod level;
pub mod rectangle;
pub mod segment;
pub mod text;
pub mod zone;

pub use brush::BrushShape;
pub use channel::ParallelChannelShape;
pub use level::{LevelKind, LevelShape};
pub use rectangle::RectangleShape;
pub use segment::SegmentShape;
pub use text::TextShape;
pub use zone::{ZoneKind, ZoneShape};

pub trait ShapeBehavior: Sync {
    /// Screen positions of the draggable handles, in handle-index order.
    /// `None` when the mapper cannot project the drawing.
    fn control_points(
        &self,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
    ) -> Option<Vec<ScreenPoint>>;

    /// Whether `pos` grabs the drawing's body
    fn is_near_body(
        &self,
        pos: &ScreenPoint,
        drawing: &Drawing,
        mapper: &dyn CoordinateMapper,
        config: &HitTestConfig,
    ) -> bool;

    /// New point set after dragging `handle` to `target`.
    /// `points` is the drag-start snapshot, never the output of a previous
    /// frame. `None` when `handle` is not one of this shape's handles.
    fn reshape(
        &self,
        points: &[DrawingPoint],
        handle: usize,
        target: DrawingPoint,
    ) -> Option<Vec<DrawingPoint>>;

    /// Whole-body move of the drag-start snapshot by a data-space delta
    fn translate(&self, original: &[DrawingPoint], dt: i64, dp: f64) -> Vec<DrawingPoint> {
        original.iter().map(|p| p.offset_by(dt, dp)).collect()
    }

    fn render(&self, drawing: &Drawing, ctx: &RenderContext<'_>, out: &mut Vec<RenderCommand>);
}

/// Behaviour object for a drawing type
pub fn behavior_for(drawing_type: DrawingType) -> &'static dyn ShapeBehavior {
    match drawing_type {
        DrawingType::Trendline => &SegmentShape { arrowhead: false },
        DrawingType::Arrow => &SegmentShape { arrowhead: true },
        DrawingType::Ray => &LevelShape {
            kind: LevelKind::Ray,
        },
        DrawingType::Horizontal => &LevelShape {
            kind: LevelKind::Horizontal,
        },
        DrawingType::Vertical => &LevelShape {
            kind: LevelKind::Vertical,
        },
        DrawingType::Rectangle => &RectangleShape,
        DrawingType::BuyZone => &ZoneShape {
            kind: ZoneKind::Buy,
        },
        DrawingType::SellZone => &ZoneShape {
            kind: ZoneKind::Sell,
        },
        DrawingType::PriceRange => &ZoneShape {
            kind: ZoneKind::PriceRange,
        },
        DrawingType::ParallelChannel => &ParallelChannelShape,
        DrawingType::Brush => &BrushShape,
        DrawingType::Text => &TextShape,
    }
}
