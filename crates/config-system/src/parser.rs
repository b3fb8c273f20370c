//! Configuration file parser for multiple formats

use crate::validation::ConfigValidator;
use crate::{ConfigError, EngineConfig, Result};
use std::fs;
use std::path::Path;

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Configuration parser
pub struct ConfigParser;

impl ConfigParser {
    /// Parse and validate configuration from a file
    pub fn parse_file(path: impl AsRef<Path>) -> Result<EngineConfig> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)?;
        let format = Self::detect_format(path)?;

        Self::parse_string(&content, format)
    }

    /// Parse and validate configuration from a string
    pub fn parse_string(content: &str, format: ConfigFormat) -> Result<EngineConfig> {
        let config = match format {
            ConfigFormat::Yaml => Self::parse_yaml(content),
            ConfigFormat::Json => Self::parse_json(content),
            ConfigFormat::Toml => Self::parse_toml(content),
        }?;

        ConfigValidator::validate(&config)?;
        log::debug!(
            "Loaded engine config: handle_radius={}, body_threshold={}, {} tool presets",
            config.hit_test.handle_radius,
            config.hit_test.body_threshold,
            config.presets.tools.len()
        );
        Ok(config)
    }

    fn parse_yaml(content: &str) -> Result<EngineConfig> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("YAML parse error: {}", e)))
    }

    fn parse_json(content: &str) -> Result<EngineConfig> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e)))
    }

    fn parse_toml(content: &str) -> Result<EngineConfig> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))
    }

    /// Detect configuration format from file extension
    pub fn detect_format(path: &Path) -> Result<ConfigFormat> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ConfigError::Parse("Cannot determine config format from file extension".to_string())
        })?;

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            "toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::Parse(format!(
                "Unsupported config format: {}",
                ext
            ))),
        }
    }
}

/// Configuration serializer
pub struct ConfigSerializer;

impl ConfigSerializer {
    /// Serialize configuration to a file
    pub fn serialize_file(config: &EngineConfig, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ConfigParser::detect_format(path)?;
        let content = Self::serialize_string(config, format)?;
        fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Serialize configuration to a string
    pub fn serialize_string(config: &EngineConfig, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Yaml => serde_yaml::to_string(config)
                .map_err(|e| ConfigError::Parse(format!("YAML serialize error: {}", e))),
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::Parse(format!("JSON serialize error: {}", e))),
            ConfigFormat::Toml => toml::to_string_pretty(config)
                .map_err(|e| ConfigError::Parse(format!("TOML serialize error: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotations_shared::DrawingType;

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
hit_test:
  handle_radius: 10.0
  body_threshold: 12.0
  brush_hit_width: 24.0
  glyph_width_ratio: 0.55
  min_segment_length: 0.000001
  default_font_size: 16.0
interaction:
  completion_guard_ms: 150.0
  lock_tool: true
  preview_line_style: dotted
"#;

        let config = ConfigParser::parse_string(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.hit_test.handle_radius, 10.0);
        assert!(config.interaction.lock_tool);
        // Missing sections fall back to defaults
        assert_eq!(config.presets.tools.len(), DrawingType::ALL.len());
    }

    #[test]
    fn test_json_partial_parsing() {
        let json = r#"{ "interaction": {
            "completion_guard_ms": 50.0,
            "lock_tool": false,
            "preview_line_style": "dashed"
        } }"#;

        let config = ConfigParser::parse_string(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.interaction.completion_guard_ms, 50.0);
        assert_eq!(config.hit_test.handle_radius, 8.0);
    }

    #[test]
    fn test_partial_sections_fall_back_per_field() {
        let json = r#"{ "hit_test": { "handle_radius": 6.0 }, "interaction": { "lock_tool": true } }"#;

        let config = ConfigParser::parse_string(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.hit_test.handle_radius, 6.0);
        assert_eq!(config.hit_test.body_threshold, 10.0);
        assert_eq!(config.hit_test.default_font_size, 14.0);
        assert!(config.interaction.lock_tool);
        assert_eq!(config.interaction.completion_guard_ms, 100.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let json = r#"{ "hit_test": {
            "handle_radius": -1.0,
            "body_threshold": 10.0,
            "brush_hit_width": 20.0,
            "glyph_width_ratio": 0.6,
            "min_segment_length": 0.000001,
            "default_font_size": 14.0
        } }"#;

        assert!(matches!(
            ConfigParser::parse_string(json, ConfigFormat::Json),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");

        let mut config = EngineConfig::default();
        config.interaction.lock_tool = true;
        ConfigSerializer::serialize_file(&config, &path).unwrap();

        let loaded = ConfigParser::parse_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension() {
        assert!(ConfigParser::detect_format(Path::new("engine.ini")).is_err());
        assert_eq!(
            ConfigParser::detect_format(Path::new("engine.YML")).unwrap(),
            ConfigFormat::Yaml
        );
    }
}
