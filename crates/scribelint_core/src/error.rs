//! Linter error types.
//!
//! Two families: runtime errors abort the current operation (exit 2 at the
//! CLI), configuration errors describe a malformed rule or option and are
//! collected so linting can continue without the offending rule.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or running the linter.
#[derive(Debug, Error)]
pub enum LintError {
    /// Invalid invocation or option value.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// A dictionary could not be loaded.
    #[error("Failed to load dictionary '{path}': {message}")]
    Dictionary { path: PathBuf, message: String },

    /// A configuration error promoted to fatal (strict mode).
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Document segmentation failed.
    #[error("Parse error: {0}")]
    Parse(#[from] scribelint_parser::ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LintError {
    /// Creates a runtime error.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }
}

/// A malformed rule file or config option.
///
/// Carries enough position information to point the user at the offending
/// key.
#[derive(Debug, Clone, Error)]
#[error("{file}:{line} invalid '{token}': {message}")]
pub struct ConfigError {
    /// The file the error was found in.
    pub file: PathBuf,
    /// 1-indexed line, 1 when the position is unknown.
    pub line: usize,
    /// The key or value at fault.
    pub token: String,
    /// What went wrong.
    pub message: String,
}

impl ConfigError {
    pub fn new(
        file: impl Into<PathBuf>,
        token: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line: 1,
            token: token.into(),
            message: message.into(),
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new("Styles/Base/Rule.yml", "extends", "unknown kind 'exists'");
        let text = err.to_string();
        assert!(text.contains("Rule.yml"));
        assert!(text.contains("extends"));
        assert!(text.contains("unknown kind"));
    }

    #[test]
    fn test_config_error_promotes_to_lint_error() {
        let err: LintError = ConfigError::new("a.yml", "level", "bad value").into();
        assert!(matches!(err, LintError::Config(_)));
    }
}
