//! Watermark settings.
//!
//! This module defines the full set of user-configurable parameters
//! controlling watermark appearance and placement. One settings value
//! applies to every image in a session; render calls receive it
//! explicitly rather than reading shared state.
//!
//! Settings can be loaded from a YAML file and overridden field by
//! field from the command line.
//!
//! # Configuration Example
//!
//! ```yaml
//! text: "Copyright 2026"
//! position: bottom-right
//! spacing_x: 10
//! spacing_y: 10
//! font_family: Arial
//! font_size: 24
//! font_color: "#FFFFFF"
//! opacity: 60
//! rotation: -30
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Default values
fn default_position() -> Position {
    Position::Center
}

fn default_spacing() -> u32 {
    10
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    24
}

fn default_font_color() -> String {
    "#000000".to_string()
}

fn default_opacity() -> u8 {
    100
}

/// Watermark anchor class: one of the nine grid positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Position {
    /// All positions in grid order (left to right, top to bottom).
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::Top,
        Position::TopRight,
        Position::Left,
        Position::Center,
        Position::Right,
        Position::BottomLeft,
        Position::Bottom,
        Position::BottomRight,
    ];

    /// The kebab-case name used in configuration and on the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::Top => "top",
            Self::TopRight => "top-right",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::BottomLeft => "bottom-left",
            Self::Bottom => "bottom",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown position '{}' (expected one of: top-left, top, top-right, left, \
                     center, right, bottom-left, bottom, bottom-right)",
                    s
                )
            })
    }
}

/// Full watermark configuration.
///
/// Always fully populated: deserializing an empty document yields the
/// defaults, and every field has exactly one value at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkSettings {
    /// Watermark content. An empty string disables rendering entirely.
    #[serde(default)]
    pub text: String,

    /// Anchor class on the target surface (default: center)
    #[serde(default = "default_position")]
    pub position: Position,

    /// Horizontal margin from the relevant edge, in pixels (default: 10).
    /// Unused for the center column.
    #[serde(default = "default_spacing")]
    pub spacing_x: u32,

    /// Vertical margin from the relevant edge, in pixels (default: 10).
    /// Unused for the center row.
    #[serde(default = "default_spacing")]
    pub spacing_y: u32,

    /// Font family name (default: "Arial"). Resolved against the embedded
    /// font catalog; unknown names fall back to the sans face.
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font size in pixels (default: 24). Must be greater than zero.
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Text color as a hex string, #RGB or #RRGGBB (default: "#000000")
    #[serde(default = "default_font_color")]
    pub font_color: String,

    /// Opacity percentage from 0 (transparent) to 100 (opaque) (default: 100)
    #[serde(default = "default_opacity")]
    pub opacity: u8,

    /// Rotation in degrees, clockwise about the watermark's own center
    /// (default: 0)
    #[serde(default)]
    pub rotation: f32,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: default_position(),
            spacing_x: default_spacing(),
            spacing_y: default_spacing(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            font_color: default_font_color(),
            opacity: default_opacity(),
            rotation: 0.0,
        }
    }
}

impl WatermarkSettings {
    /// Load settings from a YAML file and validate them.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
        let settings: Self = serde_yaml::from_str(&raw)
            .map_err(|e| format!("failed to parse '{}': {}", path.display(), e))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.font_size == 0 {
            return Err("font_size must be greater than zero".to_string());
        }

        if self.opacity > 100 {
            return Err(format!(
                "opacity must be between 0 and 100, got {}",
                self.opacity
            ));
        }

        if !self.rotation.is_finite() {
            return Err(format!(
                "rotation must be a finite number of degrees, got {}",
                self.rotation
            ));
        }

        // Validate hex color format (#RGB or #RRGGBB)
        if let Some(hex_part) = self.font_color.strip_prefix('#') {
            let len = hex_part.len();
            if (len != 3 && len != 6) || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!(
                    "font_color must be in #RGB or #RRGGBB format with valid hex characters, got '{}'",
                    self.font_color
                ));
            }
        } else {
            return Err(format!(
                "font_color must be a hex string starting with '#', got '{}'",
                self.font_color
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let settings = WatermarkSettings::default();
        assert_eq!(settings.text, "");
        assert_eq!(settings.position, Position::Center);
        assert_eq!(settings.spacing_x, 10);
        assert_eq!(settings.spacing_y, 10);
        assert_eq!(settings.font_family, "Arial");
        assert_eq!(settings.font_size, 24);
        assert_eq!(settings.font_color, "#000000");
        assert_eq!(settings.opacity, 100);
        assert_eq!(settings.rotation, 0.0);
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let settings: WatermarkSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, WatermarkSettings::default());
    }

    #[test]
    fn test_position_deserialize_kebab_case() {
        let positions = [
            ("top-left", Position::TopLeft),
            ("top", Position::Top),
            ("top-right", Position::TopRight),
            ("left", Position::Left),
            ("center", Position::Center),
            ("right", Position::Right),
            ("bottom-left", Position::BottomLeft),
            ("bottom", Position::Bottom),
            ("bottom-right", Position::BottomRight),
        ];

        for (yaml_val, expected) in positions {
            let yaml = format!("\"{}\"", yaml_val);
            let pos: Position = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(pos, expected, "Failed for {}", yaml_val);
        }
    }

    #[test]
    fn test_position_from_str_round_trips() {
        for pos in Position::ALL {
            assert_eq!(Position::from_str(pos.as_str()).unwrap(), pos);
        }
    }

    #[test]
    fn test_position_from_str_rejects_unknown() {
        let err = Position::from_str("middle").unwrap_err();
        assert!(err.contains("unknown position"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let settings = WatermarkSettings {
            text: "SAMPLE".to_string(),
            position: Position::BottomRight,
            spacing_x: 20,
            spacing_y: 15,
            font_family: "DejaVu Sans Mono".to_string(),
            font_size: 32,
            font_color: "#FF8800".to_string(),
            opacity: 45,
            rotation: -30.0,
        };

        let yaml = serde_yaml::to_string(&settings).unwrap();
        let parsed: WatermarkSettings = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_validate_ok() {
        assert!(WatermarkSettings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_font_size() {
        let settings = WatermarkSettings {
            font_size: 0,
            ..Default::default()
        };
        let result = settings.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("font_size"));
    }

    #[test]
    fn test_validate_rejects_overrange_opacity() {
        let settings = WatermarkSettings {
            opacity: 101,
            ..Default::default()
        };
        let result = settings.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("opacity"));
    }

    #[test]
    fn test_validate_rejects_non_finite_rotation() {
        let settings = WatermarkSettings {
            rotation: f32::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_color() {
        for color in ["red", "#FFFF", "#GGGGGG", "FF0000"] {
            let settings = WatermarkSettings {
                font_color: color.to_string(),
                ..Default::default()
            };
            assert!(settings.validate().is_err(), "accepted '{}'", color);
        }
    }

    #[test]
    fn test_validate_accepts_short_hex() {
        let settings = WatermarkSettings {
            font_color: "#FFF".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }
}
