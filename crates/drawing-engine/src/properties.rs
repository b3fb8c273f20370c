//! Field edits coming from the properties and text editors

use std::str::FromStr;

use annotations_shared::{Drawing, DrawingError, DrawingResult, DrawingType, LineStyle};
use serde_json::Value;

/// Editable drawing field, keyed by its persisted camelCase name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKey {
    Color,
    LineWidth,
    LineStyle,
    BackgroundColor,
    Opacity,
    BackgroundOpacity,
    Text,
    FontWeight,
    FontStyle,
    FontSize,
    ShowMidline,
}

impl PropertyKey {
    pub const ALL: [PropertyKey; 11] = [
        PropertyKey::Color,
        PropertyKey::LineWidth,
        PropertyKey::LineStyle,
        PropertyKey::BackgroundColor,
        PropertyKey::Opacity,
        PropertyKey::BackgroundOpacity,
        PropertyKey::Text,
        PropertyKey::FontWeight,
        PropertyKey::FontStyle,
        PropertyKey::FontSize,
        PropertyKey::ShowMidline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKey::Color => "color",
            PropertyKey::LineWidth => "lineWidth",
            PropertyKey::LineStyle => "lineStyle",
            PropertyKey::BackgroundColor => "backgroundColor",
            PropertyKey::Opacity => "opacity",
            PropertyKey::BackgroundOpacity => "backgroundOpacity",
            PropertyKey::Text => "text",
            PropertyKey::FontWeight => "fontWeight",
            PropertyKey::FontStyle => "fontStyle",
            PropertyKey::FontSize => "fontSize",
            PropertyKey::ShowMidline => "showMidline",
        }
    }

    /// Whether the field means anything for `drawing_type`
    pub fn applies_to(&self, drawing_type: DrawingType) -> bool {
        match self {
            PropertyKey::Text
            | PropertyKey::FontWeight
            | PropertyKey::FontStyle
            | PropertyKey::FontSize => drawing_type == DrawingType::Text,
            PropertyKey::ShowMidline => drawing_type == DrawingType::ParallelChannel,
            _ => true,
        }
    }
}

impl FromStr for PropertyKey {
    type Err = DrawingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DrawingError::UnknownField { key: s.to_string() })
    }
}

fn invalid(key: PropertyKey, message: impl Into<String>) -> DrawingError {
    DrawingError::InvalidFieldValue {
        key: key.as_str().to_string(),
        message: message.into(),
    }
}

fn as_string(key: PropertyKey, value: &Value) -> DrawingResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(key, format!("expected a string, got {value}")))
}

fn as_optional_string(key: PropertyKey, value: &Value) -> DrawingResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        other => as_string(key, other).map(Some),
    }
}

fn as_number(key: PropertyKey, value: &Value) -> DrawingResult<f64> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid(key, format!("expected a number, got {value}")))
}

fn as_unit_interval(key: PropertyKey, value: &Value) -> DrawingResult<f64> {
    let n = as_number(key, value)?;
    if !(0.0..=1.0).contains(&n) {
        return Err(invalid(key, format!("{n} is outside 0..=1")));
    }
    Ok(n)
}

fn as_positive(key: PropertyKey, value: &Value) -> DrawingResult<f64> {
    let n = as_number(key, value)?;
    if n <= 0.0 {
        return Err(invalid(key, format!("{n} must be positive")));
    }
    Ok(n)
}

/// Copy of `drawing` with one field set from a JSON value.
/// `null` clears optional fields.
pub fn apply_field(drawing: &Drawing, key: &str, value: &Value) -> DrawingResult<Drawing> {
    let key: PropertyKey = key.parse()?;
    if !key.applies_to(drawing.drawing_type) {
        return Err(DrawingError::FieldNotApplicable {
            key: key.as_str().to_string(),
            drawing_type: drawing.drawing_type,
        });
    }

    let mut next = drawing.clone();
    let style = &mut next.style;
    match key {
        PropertyKey::Color => style.color = as_string(key, value)?,
        PropertyKey::LineWidth => style.line_width = as_positive(key, value)?,
        PropertyKey::LineStyle => {
            style.line_style = serde_json::from_value::<LineStyle>(value.clone())
                .map_err(|e| invalid(key, e.to_string()))?
        }
        PropertyKey::BackgroundColor => style.background_color = as_optional_string(key, value)?,
        PropertyKey::Opacity => style.opacity = as_unit_interval(key, value)?,
        PropertyKey::BackgroundOpacity => {
            style.background_opacity = match value {
                Value::Null => None,
                other => Some(as_unit_interval(key, other)?),
            }
        }
        PropertyKey::Text => next.text = as_optional_string(key, value)?,
        PropertyKey::FontWeight => style.font_weight = as_optional_string(key, value)?,
        PropertyKey::FontStyle => style.font_style = as_optional_string(key, value)?,
        PropertyKey::FontSize => {
            style.font_size = match value {
                Value::Null => None,
                other => Some(as_positive(key, other)?),
            }
        }
        PropertyKey::ShowMidline => {
            style.show_midline = match value {
                Value::Null => None,
                Value::Bool(b) => Some(*b),
                other => return Err(invalid(key, format!("expected a boolean, got {other}"))),
            }
        }
    }
    Ok(next)
}
