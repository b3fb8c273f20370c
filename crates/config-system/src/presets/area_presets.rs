//! Area tool presets
//!
//! Rectangles, trade zones, price ranges and text labels

use annotations_shared::{DrawingStyle, DrawingType, LineStyle};

use super::ToolPreset;

/// Create all area tool presets
pub fn create_area_presets() -> Vec<ToolPreset> {
    vec![
        filled_preset(DrawingType::Rectangle, "Rectangle", "#2962ff", 0.15),
        filled_preset(DrawingType::BuyZone, "Buy Zone", "#26a69a", 0.2),
        filled_preset(DrawingType::SellZone, "Sell Zone", "#ef5350", 0.2),
        price_range_preset(),
        text_preset(),
    ]
}

fn filled_preset(
    drawing_type: DrawingType,
    label: &str,
    color: &str,
    background_opacity: f64,
) -> ToolPreset {
    ToolPreset {
        drawing_type,
        label: label.to_string(),
        style: DrawingStyle {
            color: color.to_string(),
            line_width: 1.0,
            background_color: Some(color.to_string()),
            background_opacity: Some(background_opacity),
            ..DrawingStyle::default()
        },
    }
}

/// Dashed bracket with a delta/percentage readout
fn price_range_preset() -> ToolPreset {
    ToolPreset {
        drawing_type: DrawingType::PriceRange,
        label: "Price Range".to_string(),
        style: DrawingStyle {
            color: "#2962ff".to_string(),
            line_width: 1.0,
            line_style: LineStyle::Dashed,
            background_color: Some("#2962ff".to_string()),
            background_opacity: Some(0.1),
            ..DrawingStyle::default()
        },
    }
}

fn text_preset() -> ToolPreset {
    ToolPreset {
        drawing_type: DrawingType::Text,
        label: "Text".to_string(),
        style: DrawingStyle {
            color: "#d1d4dc".to_string(),
            line_width: 1.0,
            font_weight: Some("normal".to_string()),
            font_style: Some("normal".to_string()),
            font_size: Some(14.0),
            ..DrawingStyle::default()
        },
    }
}
