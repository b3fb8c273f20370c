//! Configuration validation utilities

use crate::{ConfigError, EngineConfig, HitTestConfig, InteractionConfig, Result, StylePresets};

/// Configuration validator with range checks
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    pub fn validate(config: &EngineConfig) -> Result<()> {
        Self::validate_hit_test(&config.hit_test)?;
        Self::validate_interaction(&config.interaction)?;
        Self::validate_presets(&config.presets)?;
        Self::validate_cross_field(config);
        Ok(())
    }

    fn validate_hit_test(hit_test: &HitTestConfig) -> Result<()> {
        if !(hit_test.handle_radius > 0.0 && hit_test.handle_radius <= 64.0) {
            return Err(ConfigError::Validation(format!(
                "Invalid handle_radius: {}. Must be between 0 and 64 px",
                hit_test.handle_radius
            )));
        }

        if !(hit_test.body_threshold > 0.0 && hit_test.body_threshold <= 64.0) {
            return Err(ConfigError::Validation(format!(
                "Invalid body_threshold: {}. Must be between 0 and 64 px",
                hit_test.body_threshold
            )));
        }

        if !(hit_test.brush_hit_width > 0.0 && hit_test.brush_hit_width <= 128.0) {
            return Err(ConfigError::Validation(format!(
                "Invalid brush_hit_width: {}. Must be between 0 and 128 px",
                hit_test.brush_hit_width
            )));
        }

        if !(hit_test.glyph_width_ratio > 0.0 && hit_test.glyph_width_ratio <= 2.0) {
            return Err(ConfigError::Validation(format!(
                "Invalid glyph_width_ratio: {}. Must be between 0 and 2",
                hit_test.glyph_width_ratio
            )));
        }

        if hit_test.min_segment_length <= 0.0 {
            return Err(ConfigError::Validation(
                "min_segment_length must be positive".to_string(),
            ));
        }

        if hit_test.default_font_size <= 0.0 || hit_test.default_font_size > 200.0 {
            return Err(ConfigError::Validation(format!(
                "Invalid default_font_size: {}",
                hit_test.default_font_size
            )));
        }

        Ok(())
    }

    fn validate_interaction(interaction: &InteractionConfig) -> Result<()> {
        if interaction.completion_guard_ms < 0.0 || interaction.completion_guard_ms > 2000.0 {
            return Err(ConfigError::Validation(format!(
                "Invalid completion_guard_ms: {}. Must be between 0 and 2000",
                interaction.completion_guard_ms
            )));
        }

        Ok(())
    }

    fn validate_presets(presets: &StylePresets) -> Result<()> {
        for preset in &presets.tools {
            let style = &preset.style;
            if style.color.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Preset {} has an empty color",
                    preset.label
                )));
            }
            if style.line_width <= 0.0 || style.line_width > 20.0 {
                return Err(ConfigError::Validation(format!(
                    "Preset {} has invalid line width {}",
                    preset.label, style.line_width
                )));
            }
            if !(0.0..=1.0).contains(&style.opacity) {
                return Err(ConfigError::Validation(format!(
                    "Preset {} opacity must be between 0 and 1",
                    preset.label
                )));
            }
            if let Some(bg) = style.background_opacity {
                if !(0.0..=1.0).contains(&bg) {
                    return Err(ConfigError::Validation(format!(
                        "Preset {} background opacity must be between 0 and 1",
                        preset.label
                    )));
                }
            }
        }
        Ok(())
    }

    /// Suspicious but legal combinations only produce warnings
    fn validate_cross_field(config: &EngineConfig) {
        if config.hit_test.handle_radius > config.hit_test.body_threshold {
            log::warn!(
                "handle_radius {} exceeds body_threshold {}; handles will shadow nearby bodies",
                config.hit_test.handle_radius,
                config.hit_test.body_threshold
            );
        }
    }
}
