//! Drag reshaping: pure functions from a drag gesture to a new point set

use annotations_shared::{Drawing, DrawingPoint, DrawingType};

use crate::shapes::{behavior_for, zone::PriceRangeReadout};

/// New points for `drawing` after dragging handle `handle` to `target`.
///
/// `handle == None` means the body itself was grabbed; body moves go
/// through [`translate`] instead, so the points come back unchanged. An
/// out-of-range handle or a malformed drawing also leaves the points as they are.
pub fn reshape(drawing: &Drawing, handle: Option<usize>, target: DrawingPoint) -> Vec<DrawingPoint> {
    let Some(index) = handle else {
        return drawing.points.clone();
    };
    if !drawing.is_well_formed() {
        log::warn!("Refusing to reshape malformed drawing {}", drawing.id);
        return drawing.points.clone();
    }
    behavior_for(drawing.drawing_type)
        .reshape(&drawing.points, index, target)
        .unwrap_or_else(|| drawing.points.clone())
}

/// Whole-body move. `original` is the snapshot taken at drag start and the
/// delta is always measured from `start`, so repeated calls never accumulate
/// rounding.
pub fn translate(
    drawing_type: DrawingType,
    original: &[DrawingPoint],
    start: DrawingPoint,
    current: DrawingPoint,
) -> Vec<DrawingPoint> {
    let dt = current.time - start.time;
    let dp = current.price - start.price;
    behavior_for(drawing_type).translate(original, dt, dp)
}

/// Delta readout of a price range drawing, `None` for any other drawing
pub fn price_range_readout(drawing: &Drawing) -> Option<PriceRangeReadout> {
    match (drawing.drawing_type, drawing.points.as_slice()) {
        (DrawingType::PriceRange, [from, to]) => Some(PriceRangeReadout::between(from, to)),
        _ => None,
    }
}
