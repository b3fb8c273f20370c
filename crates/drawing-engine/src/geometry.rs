//! Screen-space geometry helpers shared by the shape hit tests

use nalgebra_glm as glm;

pub type ScreenPoint = glm::DVec2;

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Bounding box of two corners in any order
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        Self {
            min: glm::vec2(a.x.min(b.x), a.y.min(b.y)),
            max: glm::vec2(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn expanded(&self, by: f64) -> Self {
        Self {
            min: glm::vec2(self.min.x - by, self.min.y - by),
            max: glm::vec2(self.max.x + by, self.max.y + by),
        }
    }

    pub fn contains(&self, p: &ScreenPoint) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corners clockwise from top-left, ready to be filled as a polygon
    pub fn corners(&self) -> Vec<ScreenPoint> {
        vec![
            self.min,
            glm::vec2(self.max.x, self.min.y),
            self.max,
            glm::vec2(self.min.x, self.max.y),
        ]
    }
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
/// The denominator is clamped to `epsilon` so a degenerate segment never divides by zero.
pub fn distance_to_line(p: &ScreenPoint, a: &ScreenPoint, b: &ScreenPoint, epsilon: f64) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let cross = ab.x * ap.y - ab.y * ap.x;
    cross.abs() / glm::length(&ab).max(epsilon)
}

/// Whether `p` is within `threshold` of segment `a`-`b`: close to the line and
/// inside the segment's bounding box grown by the same threshold.
/// Segments shorter than `min_length` never match.
pub fn near_segment(
    p: &ScreenPoint,
    a: &ScreenPoint,
    b: &ScreenPoint,
    threshold: f64,
    min_length: f64,
) -> bool {
    if glm::distance(a, b) < min_length {
        return false;
    }
    distance_to_line(p, a, b, min_length) <= threshold
        && ScreenRect::from_corners(*a, *b)
            .expanded(threshold)
            .contains(p)
}

/// Distance from `p` to the closest point of segment `a`-`b`
pub fn distance_to_segment(p: &ScreenPoint, a: &ScreenPoint, b: &ScreenPoint) -> f64 {
    let ab = b - a;
    let len_sq = glm::dot(&ab, &ab);
    if len_sq <= f64::EPSILON {
        return glm::distance(p, a);
    }
    let t = (glm::dot(&(p - a), &ab) / len_sq).clamp(0.0, 1.0);
    glm::distance(p, &(a + ab * t))
}

/// Shortest distance from `p` to an open polyline
pub fn distance_to_polyline(p: &ScreenPoint, points: &[ScreenPoint]) -> Option<f64> {
    match points {
        [] => None,
        [only] => Some(glm::distance(p, only)),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(p, &w[0], &w[1]))
            .reduce(f64::min),
    }
}
