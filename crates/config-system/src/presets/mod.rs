//! Default style presets for each drawing tool

pub mod area_presets;
pub mod line_presets;

pub use area_presets::*;
pub use line_presets::*;

use annotations_shared::{DrawingStyle, DrawingType};
use serde::{Deserialize, Serialize};

/// Style a tool stamps onto the drawings it creates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolPreset {
    pub drawing_type: DrawingType,
    pub label: String,
    pub style: DrawingStyle,
}

/// Collection of tool presets, one per drawing type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StylePresets {
    pub tools: Vec<ToolPreset>,
}

impl Default for StylePresets {
    fn default() -> Self {
        Self {
            tools: get_all_presets(),
        }
    }
}

impl StylePresets {
    pub fn find_preset(&self, drawing_type: DrawingType) -> Option<&ToolPreset> {
        self.tools.iter().find(|p| p.drawing_type == drawing_type)
    }

    /// Preset style, or the neutral default when the type has no preset
    pub fn style_for(&self, drawing_type: DrawingType) -> DrawingStyle {
        self.find_preset(drawing_type)
            .map(|p| p.style.clone())
            .unwrap_or_default()
    }

    /// Replace (or add) the preset for one drawing type
    pub fn set_style(&mut self, drawing_type: DrawingType, style: DrawingStyle) {
        match self.tools.iter_mut().find(|p| p.drawing_type == drawing_type) {
            Some(preset) => preset.style = style,
            None => self.tools.push(ToolPreset {
                drawing_type,
                label: drawing_type.to_string(),
                style,
            }),
        }
    }
}

/// Get all built-in tool presets
pub fn get_all_presets() -> Vec<ToolPreset> {
    let mut presets = create_line_presets();
    presets.extend(create_area_presets());
    presets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_a_preset() {
        let presets = StylePresets::default();
        for t in DrawingType::ALL {
            assert!(presets.find_preset(t).is_some(), "missing preset for {t}");
        }
    }

    #[test]
    fn test_set_style_overrides() {
        let mut presets = StylePresets::default();
        let style = DrawingStyle {
            color: "#000000".to_string(),
            ..DrawingStyle::default()
        };
        presets.set_style(DrawingType::Ray, style);
        assert_eq!(presets.style_for(DrawingType::Ray).color, "#000000");
        assert_eq!(presets.tools.len(), DrawingType::ALL.len());
    }
}
