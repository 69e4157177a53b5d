//! Error types for Horizon Input.
//!
//! The dispatch path itself never fails: a bad receiver or a vanished
//! widget is logged and treated as handled. Errors only surface from
//! registration and configuration calls.

use std::path::PathBuf;

use horizon_input_core::WidgetError;
use thiserror::Error;

use crate::gesture::GestureType;

/// Errors from gesture recognizer registration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    /// The recognizer returned no gesture from `create(None)`.
    #[error("gesture recognizer failed to create a gesture object")]
    RecognizerCreateFailed,

    /// No recognizer is registered for the type.
    #[error("no recognizer registered for gesture type {0:?}")]
    UnknownGestureType(GestureType),

    /// The gesture manager is currently delivering events and cannot be
    /// modified re-entrantly.
    #[error("gesture manager is busy delivering events")]
    ManagerBusy,
}

/// Errors from loading an [`InputConfig`](crate::InputConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML text was malformed or had wrongly typed fields.
    #[error("invalid input configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The crate-level error type.
#[derive(Error, Debug)]
pub enum InputError {
    /// Widget tree error.
    #[error("widget error: {0}")]
    Widget(#[from] WidgetError),

    /// Gesture registration error.
    #[error("gesture error: {0}")]
    Gesture(#[from] GestureError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for Horizon Input operations.
pub type InputResult<T> = Result<T, InputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = InputError::from(GestureError::UnknownGestureType(GestureType::Pinch));
        assert_eq!(
            err.to_string(),
            "gesture error: no recognizer registered for gesture type Pinch"
        );

        let err = InputError::from(WidgetError::InvalidWidgetId);
        assert!(err.to_string().starts_with("widget error:"));
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err: InputError = ConfigError::from(parse).into();
        assert!(matches!(err, InputError::Config(ConfigError::Parse(_))));
    }
}
