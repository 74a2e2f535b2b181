//! Segmenter error types.

use thiserror::Error;

/// Errors that can occur while segmenting a document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The underlying markup parser rejected the source.
    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

impl ParseError {
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource(message.into())
    }
}
