//! Input configuration.
//!
//! [`InputConfig`] collects the tunables of the dispatch core. Every field
//! has a default, so a TOML file only needs to name what it changes:
//!
//! ```
//! use horizon_input::InputConfig;
//!
//! let config = InputConfig::from_toml_str("focus_on_release = true\npan_point_count = 3").unwrap();
//! assert!(config.focus_on_release);
//! assert_eq!(config.pan_point_count, 3);
//! assert_eq!(config.tooltip_wake_up_ms, 700);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for event dispatch and gesture recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Move keyboard focus on button release instead of press.
    pub focus_on_release: bool,
    /// Delay before a resting pointer shows a tooltip.
    pub tooltip_wake_up_ms: u64,
    /// How long tooltips stay "awake" after one was shown, so that the next
    /// one appears almost immediately.
    pub tooltip_fall_asleep_ms: u64,
    /// Hold duration for the tap-and-hold recognizer.
    pub tap_and_hold_timeout_ms: u64,
    /// Number of touch points the pan recognizer tracks.
    pub pan_point_count: usize,
    /// Register the pan, pinch, swipe, tap and tap-and-hold recognizers
    /// when the application is created.
    pub register_default_recognizers: bool,
    /// Also register the native-gesture passthrough recognizers for pan,
    /// pinch and swipe.
    pub native_gestures: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            focus_on_release: false,
            tooltip_wake_up_ms: 700,
            tooltip_fall_asleep_ms: 2000,
            tap_and_hold_timeout_ms: 700,
            pan_point_count: 2,
            register_default_recognizers: true,
            native_gestures: false,
        }
    }
}

impl InputConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }

    /// Set whether focus moves on release.
    pub fn with_focus_on_release(mut self, on: bool) -> Self {
        self.focus_on_release = on;
        self
    }

    /// Set the tooltip wake-up delay in milliseconds.
    pub fn with_tooltip_wake_up_ms(mut self, ms: u64) -> Self {
        self.tooltip_wake_up_ms = ms;
        self
    }

    /// Set the tooltip fall-asleep delay in milliseconds.
    pub fn with_tooltip_fall_asleep_ms(mut self, ms: u64) -> Self {
        self.tooltip_fall_asleep_ms = ms;
        self
    }

    /// Set the tap-and-hold timeout in milliseconds.
    pub fn with_tap_and_hold_timeout_ms(mut self, ms: u64) -> Self {
        self.tap_and_hold_timeout_ms = ms;
        self
    }

    /// Set the number of points the pan recognizer tracks (at least one).
    pub fn with_pan_point_count(mut self, count: usize) -> Self {
        self.pan_point_count = count.max(1);
        self
    }

    /// Set whether the built-in recognizers are registered.
    pub fn with_default_recognizers(mut self, on: bool) -> Self {
        self.register_default_recognizers = on;
        self
    }

    /// Set whether native-gesture recognizers are registered.
    pub fn with_native_gestures(mut self, on: bool) -> Self {
        self.native_gestures = on;
        self
    }

    pub(crate) fn tooltip_wake_up(&self) -> Duration {
        Duration::from_millis(self.tooltip_wake_up_ms)
    }

    pub(crate) fn tooltip_fall_asleep(&self) -> Duration {
        Duration::from_millis(self.tooltip_fall_asleep_ms)
    }

    pub(crate) fn tap_and_hold_timeout(&self) -> Duration {
        Duration::from_millis(self.tap_and_hold_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InputConfig::default();
        assert!(!config.focus_on_release);
        assert_eq!(config.tooltip_fall_asleep_ms, 2000);
        assert_eq!(config.tap_and_hold_timeout(), Duration::from_millis(700));
        assert_eq!(config.pan_point_count, 2);
        assert!(config.register_default_recognizers);
        assert!(!config.native_gestures);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = InputConfig::from_toml_str("tap_and_hold_timeout_ms = 300").unwrap();
        assert_eq!(config.tap_and_hold_timeout_ms, 300);
        assert_eq!(config.tooltip_wake_up_ms, 700);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = InputConfig::from_toml_str("pan_point_count = \"two\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip_and_builder() {
        let config = InputConfig::new()
            .with_focus_on_release(true)
            .with_native_gestures(true)
            .with_pan_point_count(0);
        assert_eq!(config.pan_point_count, 1);
        let text = config.to_toml_string();
        assert_eq!(InputConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = InputConfig::load("/nonexistent/horizon-input.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
