//! Data space <-> screen space conversion
//!
//! The host chart owns pan/zoom and exposes its projection through
//! [`CoordinateMapper`]. Every conversion is fallible: a chart that has not
//! laid out yet answers `None`, which the rest of the engine treats as
//! "nothing can be hit, nothing is drawn".

use annotations_shared::DrawingPoint;
use nalgebra_glm as glm;

/// Bidirectional price/time <-> pixel projection supplied by the host chart
pub trait CoordinateMapper {
    fn price_to_y(&self, price: f64) -> Option<f64>;
    fn y_to_price(&self, y: f64) -> Option<f64>;
    /// Accepts fractional indices so derived handles (midpoints) can be projected
    fn time_to_x(&self, time: f64) -> Option<f64>;
    /// Nearest integer bar index under `x`
    fn x_to_time(&self, x: f64) -> Option<i64>;

    /// Project a data point to screen space
    fn to_screen(&self, point: &DrawingPoint) -> Option<glm::DVec2> {
        let x = self.time_to_x(point.time as f64)?;
        let y = self.price_to_y(point.price)?;
        Some(glm::vec2(x, y))
    }

    /// Unproject a screen position to data space
    fn to_data(&self, x: f64, y: f64) -> Option<DrawingPoint> {
        let time = self.x_to_time(x)?;
        let price = self.y_to_price(y)?;
        Some(DrawingPoint { time, price })
    }

    /// Project every point, failing as a whole if any conversion fails
    fn project_all(&self, points: &[DrawingPoint]) -> Option<Vec<glm::DVec2>> {
        points.iter().map(|p| self.to_screen(p)).collect()
    }
}

/// Mapper for a chart that is not initialized yet
#[derive(Debug, Clone, Copy, Default)]
pub struct UninitializedMapper;

impl CoordinateMapper for UninitializedMapper {
    fn price_to_y(&self, _price: f64) -> Option<f64> {
        None
    }

    fn y_to_price(&self, _y: f64) -> Option<f64> {
        None
    }

    fn time_to_x(&self, _time: f64) -> Option<f64> {
        None
    }

    fn x_to_time(&self, _x: f64) -> Option<i64> {
        None
    }
}

/// Linear projection of a visible data window onto a pixel viewport.
/// Price grows upwards, so screen y is inverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMapper {
    pub time_start: f64,
    pub time_end: f64,
    pub price_min: f64,
    pub price_max: f64,
    pub width: f64,
    pub height: f64,
}

impl LinearMapper {
    pub fn new(
        time_range: (f64, f64),
        price_range: (f64, f64),
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            time_start: time_range.0,
            time_end: time_range.1,
            price_min: price_range.0,
            price_max: price_range.1,
            width,
            height,
        }
    }

    fn time_span(&self) -> Option<f64> {
        let span = self.time_end - self.time_start;
        (span.abs() > f64::EPSILON && self.width > 0.0).then_some(span)
    }

    fn price_span(&self) -> Option<f64> {
        let span = self.price_max - self.price_min;
        (span.abs() > f64::EPSILON && self.height > 0.0).then_some(span)
    }
}

impl CoordinateMapper for LinearMapper {
    fn price_to_y(&self, price: f64) -> Option<f64> {
        let span = self.price_span()?;
        Some((self.price_max - price) / span * self.height)
    }

    fn y_to_price(&self, y: f64) -> Option<f64> {
        let span = self.price_span()?;
        Some(self.price_max - y / self.height * span)
    }

    fn time_to_x(&self, time: f64) -> Option<f64> {
        let span = self.time_span()?;
        Some((time - self.time_start) / span * self.width)
    }

    fn x_to_time(&self, x: f64) -> Option<i64> {
        let span = self.time_span()?;
        let time = self.time_start + x / self.width * span;
        time.is_finite().then(|| time.round() as i64)
    }
}

impl<M: CoordinateMapper + ?Sized> CoordinateMapper for &M {
    fn price_to_y(&self, price: f64) -> Option<f64> {
        (**self).price_to_y(price)
    }

    fn y_to_price(&self, y: f64) -> Option<f64> {
        (**self).y_to_price(y)
    }

    fn time_to_x(&self, time: f64) -> Option<f64> {
        (**self).time_to_x(time)
    }

    fn x_to_time(&self, x: f64) -> Option<i64> {
        (**self).x_to_time(x)
    }
}
