//! Renderer error types.

use canvas_core::CanvasError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No suitable rendering backend available.
    #[error("No rendering backend available: {0}")]
    NoBackend(String),

    /// Surface error (bad size, lost context).
    #[error("Surface error: {0}")]
    Surface(String),

    /// The editor failed to draw the frame.
    #[error("Frame render failed: {0}")]
    Frame(#[from] CanvasError),

    /// Recorded frame could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
