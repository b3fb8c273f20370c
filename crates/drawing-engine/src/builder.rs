//! Multi-click shape construction

use annotations_shared::{Drawing, DrawingPoint, DrawingStyle, DrawingType};

/// Result of feeding one click to a [`ShapeBuilder`]
#[derive(Debug, Clone, PartialEq)]
pub enum BuildStep {
    /// More clicks are needed
    Pending { placed: usize, required: usize },
    /// The shape has all its points; the builder is empty again
    Complete(Vec<DrawingPoint>),
}

/// Accumulates clicks for a fixed-arity tool until the shape is complete
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeBuilder {
    drawing_type: DrawingType,
    required: usize,
    points: Vec<DrawingPoint>,
}

impl ShapeBuilder {
    /// `None` for tools without a fixed click count (brush)
    pub fn new(drawing_type: DrawingType) -> Option<Self> {
        let required = drawing_type.required_clicks()?;
        Some(Self {
            drawing_type,
            required,
            points: Vec::with_capacity(required),
        })
    }

    pub fn drawing_type(&self) -> DrawingType {
        self.drawing_type
    }

    pub fn points(&self) -> &[DrawingPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: DrawingPoint) -> BuildStep {
        self.points.push(point);
        if self.points.len() >= self.required {
            let mut complete = std::mem::take(&mut self.points);
            complete.truncate(self.required);
            return BuildStep::Complete(complete);
        }
        BuildStep::Pending {
            placed: self.points.len(),
            required: self.required,
        }
    }

    /// Discard everything placed so far
    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Placed points followed by the hover point, capped at the arity
    pub fn preview_points(&self, hover: Option<DrawingPoint>) -> Vec<DrawingPoint> {
        let mut points = self.points.clone();
        if let Some(hover) = hover {
            if points.len() < self.required {
                points.push(hover);
            }
        }
        points
    }
}

/// Freehand stroke collected while the pointer button is held
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrushStroke {
    points: Vec<DrawingPoint>,
}

impl BrushStroke {
    pub fn start(point: DrawingPoint) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn extend(&mut self, point: DrawingPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[DrawingPoint] {
        &self.points
    }

    /// The committed point list, or `None` for a single-point tap
    pub fn finish(self) -> Option<Vec<DrawingPoint>> {
        (self.points.len() > 1).then_some(self.points)
    }
}

/// Drawing committed from a finished construction
pub fn commit_drawing(
    drawing_type: DrawingType,
    points: Vec<DrawingPoint>,
    style: DrawingStyle,
    text: Option<String>,
) -> Drawing {
    let mut drawing = Drawing::new(drawing_type, points, style);
    drawing.text = text;
    log::debug!(
        "Committed {} drawing {} with {} points",
        drawing.drawing_type,
        drawing.id,
        drawing.points.len()
    );
    drawing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_needs_three_clicks() {
        let mut builder = ShapeBuilder::new(DrawingType::ParallelChannel).unwrap();
        assert_eq!(
            builder.push(DrawingPoint::new(0, 1.0)),
            BuildStep::Pending {
                placed: 1,
                required: 3
            }
        );
        builder.push(DrawingPoint::new(1, 2.0));
        match builder.push(DrawingPoint::new(2, 3.0)) {
            BuildStep::Complete(points) => assert_eq!(points.len(), 3),
            other => panic!("expected completion, got {other:?}"),
        }
        assert!(builder.is_empty());
    }

    #[test]
    fn test_single_click_tools_complete_immediately() {
        for drawing_type in [
            DrawingType::Horizontal,
            DrawingType::Vertical,
            DrawingType::Ray,
            DrawingType::Text,
        ] {
            let mut builder = ShapeBuilder::new(drawing_type).unwrap();
            assert!(matches!(
                builder.push(DrawingPoint::new(4, 2.0)),
                BuildStep::Complete(points) if points.len() == 1
            ));
        }
    }

    #[test]
    fn test_preview_is_capped() {
        let mut builder = ShapeBuilder::new(DrawingType::Trendline).unwrap();
        assert_eq!(builder.preview_points(Some(DrawingPoint::new(1, 1.0))).len(), 1);
        builder.push(DrawingPoint::new(0, 0.0));
        let preview = builder.preview_points(Some(DrawingPoint::new(5, 5.0)));
        assert_eq!(preview, vec![DrawingPoint::new(0, 0.0), DrawingPoint::new(5, 5.0)]);
        assert_eq!(builder.points().len(), 1);
    }

    #[test]
    fn test_brush_has_no_builder_and_single_tap_is_discarded() {
        assert!(ShapeBuilder::new(DrawingType::Brush).is_none());

        let tap = BrushStroke::start(DrawingPoint::new(0, 0.0));
        assert!(tap.finish().is_none());

        let mut stroke = BrushStroke::start(DrawingPoint::new(0, 0.0));
        stroke.extend(DrawingPoint::new(1, 1.0));
        stroke.extend(DrawingPoint::new(2, 0.5));
        assert_eq!(stroke.finish().map(|p| p.len()), Some(3));
    }
}
