//! Error types for the core crate.

use thiserror::Error;

/// Errors reported by fallible widget tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// The widget handle is invalid or the widget has been destroyed.
    #[error("invalid or destroyed widget id")]
    InvalidWidgetId,

    /// Attempted to make a widget its own parent or ancestor.
    #[error("cannot set a widget as its own parent or ancestor")]
    CircularParentage,

    /// Attempted to build a focus proxy chain that loops back on itself.
    #[error("focus proxy would create a loop")]
    FocusProxyLoop,
}

/// Result type for widget tree operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
