use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Runtime configuration for a sprig context. Every field has a default, so
/// a partial JSON document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font loaded when a backend is registered and used by text widgets
    /// unless they name their own.
    pub default_font: String,
    /// Default font size.
    pub font_size: u32,
    /// Multiplier applied to scroll deltas by scrolling widgets.
    pub scroll_acceleration: f32,
    /// Hand the command buffer to the backend after every event that
    /// produced a render.
    pub present_on_event: bool,
    /// Width of a terminal cell in pixels, used when translating terminal
    /// mouse events.
    pub cell_width: u32,
    /// Height of a terminal cell in pixels.
    pub cell_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_font: "default".into(),
            font_size: 16,
            scroll_acceleration: 100.0,
            present_on_event: false,
            cell_width: 1,
            cell_height: 1,
        }
    }
}

impl Config {
    /// Parse a configuration from a JSON string.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&data)
    }

    /// Set the default font.
    pub fn with_font(mut self, name: &str, size: u32) -> Self {
        self.default_font = name.to_string();
        self.font_size = size;
        self
    }

    /// Set the scroll acceleration.
    pub fn with_scroll_acceleration(mut self, accel: f32) -> Self {
        self.scroll_acceleration = accel;
        self
    }

    /// Present automatically after events.
    pub fn with_present_on_event(mut self, present: bool) -> Self {
        self.present_on_event = present;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let c = Config::from_json(r#"{"font_size": 12}"#).unwrap();
        assert_eq!(c.font_size, 12);
        assert_eq!(c.scroll_acceleration, 100.0);
        assert_eq!(c.default_font, "default");
        assert!(!c.present_on_event);
    }

    #[test]
    fn bad_json_is_config_error() {
        assert!(matches!(
            Config::from_json("{font_size"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"font_size": "big"}"#),
            Err(Error::Config(_))
        ));
    }
}
