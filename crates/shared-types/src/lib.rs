//! Shared types for the chart annotation engine
//!
//! This crate contains the drawing data model that is shared between the
//! configuration, engine and wasm-bridge crates. Everything here serializes
//! to the persisted JSON schema the host application stores.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "typescript")]
use tsify::Tsify;

pub mod errors;
pub mod events;

pub use errors::{DrawingError, DrawingResult, ErrorResponse};

/// A point in data space: a bar index on the time axis and a price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
pub struct DrawingPoint {
    pub time: i64,
    pub price: f64,
}

impl DrawingPoint {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }

    /// Component-wise offset, used by whole-body translation
    pub fn offset_by(&self, dt: i64, dp: f64) -> Self {
        Self {
            time: self.time + dt,
            price: self.price + dp,
        }
    }
}

/// Opaque identifier of a drawing, unique within one store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
#[serde(transparent)]
pub struct DrawingId(pub String);

impl DrawingId {
    /// Fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DrawingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DrawingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// How many points a drawing type needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, len: usize) -> bool {
        match *self {
            Arity::Exactly(n) => len == n,
            Arity::AtLeast(n) => len >= n,
        }
    }
}

/// The annotation shapes a user can draw
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
#[serde(rename_all = "camelCase")]
pub enum DrawingType {
    Trendline,
    Arrow,
    Ray,
    Horizontal,
    Vertical,
    Rectangle,
    BuyZone,
    SellZone,
    PriceRange,
    ParallelChannel,
    Brush,
    Text,
}

impl DrawingType {
    pub const ALL: [DrawingType; 12] = [
        DrawingType::Trendline,
        DrawingType::Arrow,
        DrawingType::Ray,
        DrawingType::Horizontal,
        DrawingType::Vertical,
        DrawingType::Rectangle,
        DrawingType::BuyZone,
        DrawingType::SellZone,
        DrawingType::PriceRange,
        DrawingType::ParallelChannel,
        DrawingType::Brush,
        DrawingType::Text,
    ];

    pub fn arity(&self) -> Arity {
        match self {
            DrawingType::Horizontal
            | DrawingType::Vertical
            | DrawingType::Ray
            | DrawingType::Text => Arity::Exactly(1),
            DrawingType::Trendline
            | DrawingType::Arrow
            | DrawingType::Rectangle
            | DrawingType::BuyZone
            | DrawingType::SellZone
            | DrawingType::PriceRange => Arity::Exactly(2),
            DrawingType::ParallelChannel => Arity::Exactly(3),
            DrawingType::Brush => Arity::AtLeast(2),
        }
    }

    /// Number of clicks that completes the shape, `None` for freehand tools
    pub fn required_clicks(&self) -> Option<usize> {
        match self.arity() {
            Arity::Exactly(n) => Some(n),
            Arity::AtLeast(_) => None,
        }
    }

    /// The literal used in the persisted schema
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawingType::Trendline => "trendline",
            DrawingType::Arrow => "arrow",
            DrawingType::Ray => "ray",
            DrawingType::Horizontal => "horizontal",
            DrawingType::Vertical => "vertical",
            DrawingType::Rectangle => "rectangle",
            DrawingType::BuyZone => "buyZone",
            DrawingType::SellZone => "sellZone",
            DrawingType::PriceRange => "priceRange",
            DrawingType::ParallelChannel => "parallelChannel",
            DrawingType::Brush => "brush",
            DrawingType::Text => "text",
        }
    }
}

impl std::fmt::Display for DrawingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DrawingType {
    type Err = DrawingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DrawingType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DrawingError::UnknownType {
                literal: s.to_string(),
            })
    }
}

/// Stroke pattern
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Canvas dash pattern in pixels, scaled by the stroke width
    pub fn dash_pattern(&self, line_width: f64) -> Vec<f64> {
        let w = line_width.max(1.0);
        match self {
            LineStyle::Solid => vec![],
            LineStyle::Dashed => vec![6.0 * w, 4.0 * w],
            LineStyle::Dotted => vec![w, 3.0 * w],
        }
    }
}

/// Visual attributes of a drawing, flattened into the persisted record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
#[serde(rename_all = "camelCase")]
pub struct DrawingStyle {
    pub color: String,
    pub line_width: f64,
    #[serde(default)]
    pub line_style: LineStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_midline: Option<bool>,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for DrawingStyle {
    fn default() -> Self {
        Self {
            color: "#2962ff".to_string(),
            line_width: 2.0,
            line_style: LineStyle::Solid,
            background_color: None,
            opacity: 1.0,
            background_opacity: None,
            font_weight: None,
            font_style: None,
            font_size: None,
            show_midline: None,
        }
    }
}

/// One persisted annotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "typescript", derive(Tsify))]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub id: DrawingId,
    #[serde(rename = "type")]
    pub drawing_type: DrawingType,
    pub points: Vec<DrawingPoint>,
    #[serde(flatten)]
    pub style: DrawingStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Drawing {
    /// Create a drawing with a fresh id
    pub fn new(drawing_type: DrawingType, points: Vec<DrawingPoint>, style: DrawingStyle) -> Self {
        Self {
            id: DrawingId::generate(),
            drawing_type,
            points,
            style,
            text: None,
        }
    }

    /// Copy of this drawing with its points replaced
    pub fn with_points(&self, points: Vec<DrawingPoint>) -> Self {
        Self {
            points,
            ..self.clone()
        }
    }

    /// Whether the point count matches the type's arity
    pub fn is_well_formed(&self) -> bool {
        self.drawing_type.arity().accepts(self.points.len())
    }

    pub fn validate(&self) -> DrawingResult<()> {
        if !self.is_well_formed() {
            return Err(DrawingError::ArityMismatch {
                drawing_type: self.drawing_type,
                expected: self.drawing_type.arity(),
                actual: self.points.len(),
            });
        }
        if self.points.iter().any(|p| !p.price.is_finite()) {
            return Err(DrawingError::NonFinitePrice {
                id: self.id.to_string(),
            });
        }
        Ok(())
    }
}

/// Parse a persisted JSON array of drawings
pub fn drawings_from_json(json: &str) -> DrawingResult<Vec<Drawing>> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize drawings to the persisted JSON schema
pub fn drawings_to_json(drawings: &[Drawing]) -> DrawingResult<String> {
    Ok(serde_json::to_string(drawings)?)
}
