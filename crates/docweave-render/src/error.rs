//! Error types for rendering

use thiserror::Error;

/// Errors that can occur while rendering
#[derive(Error, Debug)]
pub enum RenderError {
    /// Writing to the output buffer failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Unknown output format name
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for rendering
pub type Result<T> = std::result::Result<T, RenderError>;
