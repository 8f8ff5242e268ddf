//! Error types for canvas operations.

use thiserror::Error;

use crate::item::ItemId;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
///
/// Routine gesture outcomes (a zoom past the configured limits, adding an
/// item twice) are not errors; those operations report `false` instead.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Division or modulo by exactly zero in the geometry kernel.
    #[error("Division by zero in {op}")]
    DivisionByZero {
        /// The operation that was attempted.
        op: &'static str,
    },

    /// Item not found in the collection it was looked up in.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration (or event script) deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
