//! Configuration system for the chart annotation engine
//! Manages hit-test tolerances, interaction timing and per-tool style presets

use annotations_shared::{DrawingStyle, DrawingType, LineStyle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod parser;
pub mod presets;
pub mod validation;

pub use presets::{StylePresets, ToolPreset};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub hit_test: HitTestConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub presets: StylePresets,
}

impl EngineConfig {
    /// Default style for a newly committed drawing of `drawing_type`
    pub fn style_for(&self, drawing_type: DrawingType) -> DrawingStyle {
        self.presets.style_for(drawing_type)
    }
}

/// Screen-space tolerances used by the hit tester, in pixels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HitTestConfig {
    /// Maximum distance from a control point that still grabs it
    pub handle_radius: f64,
    /// Maximum distance from a line or edge that still grabs the body
    pub body_threshold: f64,
    /// Width of the invisible stroke used to hit freehand strokes
    pub brush_hit_width: f64,
    /// Approximate glyph width as a fraction of the font size
    pub glyph_width_ratio: f64,
    /// Segments shorter than this are only hittable at their handles
    pub min_segment_length: f64,
    /// Font size assumed for text without one, for the glyph box and rendering
    pub default_font_size: f64,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            handle_radius: 8.0,
            body_threshold: 10.0,
            brush_hit_width: 20.0,
            glyph_width_ratio: 0.6,
            min_segment_length: 1e-6,
            default_font_size: 14.0,
        }
    }
}

/// Interaction timing and tool behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Pointer-downs within this window after a commit are ignored
    pub completion_guard_ms: f64,
    /// Keep the drawing tool active after a commit
    pub lock_tool: bool,
    /// Stroke pattern of the construction preview
    pub preview_line_style: LineStyle,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            completion_guard_ms: 100.0,
            lock_tool: false,
            preview_line_style: LineStyle::Dashed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.hit_test.handle_radius, 8.0);
        assert_eq!(config.hit_test.body_threshold, 10.0);
        assert_eq!(config.interaction.completion_guard_ms, 100.0);
        assert!(!config.interaction.lock_tool);
    }

    #[test]
    fn test_zone_styles_differ() {
        let config = EngineConfig::default();
        let buy = config.style_for(DrawingType::BuyZone);
        let sell = config.style_for(DrawingType::SellZone);
        assert_ne!(buy.color, sell.color);
        assert!(buy.background_color.is_some());
    }
}
