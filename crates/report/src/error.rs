//! Error types for report generation.

use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Errors that can occur while persisting or rendering a run.
#[derive(Debug, Error)]
pub enum ReportError {
    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Chart backend failure.
    #[error("Chart rendering error: {0}")]
    Render(String),

    /// No raw capture is available to re-parse.
    #[error("No raw benchmark output available at {}", .0.display())]
    MissingRaw(PathBuf),
}

impl<E> From<DrawingAreaErrorKind<E>> for ReportError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ReportError::Render(err.to_string())
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
