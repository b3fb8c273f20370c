//! Line tool presets
//!
//! Trendlines, levels, channels and freehand strokes

use annotations_shared::{DrawingStyle, DrawingType, LineStyle};

use super::ToolPreset;

/// Create all line tool presets
pub fn create_line_presets() -> Vec<ToolPreset> {
    vec![
        line_preset(DrawingType::Trendline, "Trend Line", "#2962ff"),
        line_preset(DrawingType::Arrow, "Arrow", "#2962ff"),
        line_preset(DrawingType::Ray, "Ray", "#ff9800"),
        line_preset(DrawingType::Horizontal, "Horizontal Line", "#ff9800"),
        line_preset(DrawingType::Vertical, "Vertical Line", "#9c27b0"),
        parallel_channel_preset(),
        brush_preset(),
    ]
}

fn line_preset(drawing_type: DrawingType, label: &str, color: &str) -> ToolPreset {
    ToolPreset {
        drawing_type,
        label: label.to_string(),
        style: DrawingStyle {
            color: color.to_string(),
            line_width: 2.0,
            line_style: LineStyle::Solid,
            ..DrawingStyle::default()
        },
    }
}

/// Channel lines with a translucent fill between them
fn parallel_channel_preset() -> ToolPreset {
    ToolPreset {
        drawing_type: DrawingType::ParallelChannel,
        label: "Parallel Channel".to_string(),
        style: DrawingStyle {
            color: "#2962ff".to_string(),
            line_width: 2.0,
            background_color: Some("#2962ff".to_string()),
            background_opacity: Some(0.1),
            show_midline: Some(true),
            ..DrawingStyle::default()
        },
    }
}

fn brush_preset() -> ToolPreset {
    ToolPreset {
        drawing_type: DrawingType::Brush,
        label: "Brush".to_string(),
        style: DrawingStyle {
            color: "#e91e63".to_string(),
            line_width: 3.0,
            ..DrawingStyle::default()
        },
    }
}
