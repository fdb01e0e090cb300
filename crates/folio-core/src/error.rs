//! Error types for the Folio core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for Folio.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// A source file that could not be loaded. The file is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to load {}: {message}", .path.display())]
pub struct LoadError {
    /// Path of the file (or content root) that failed.
    pub path: PathBuf,
    /// Human-readable cause.
    pub message: String,
}

impl LoadError {
    /// Create a new load error.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A logical document rejected during frontmatter validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid document {}#{ordinal}: {message}", .path.display())]
pub struct ValidationError {
    /// Source path of the blob the document came from.
    pub path: PathBuf,
    /// Position of the document within its source.
    pub ordinal: usize,
    /// Human-readable cause.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(path: impl Into<PathBuf>, ordinal: usize, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ordinal,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CoreError::config("missing field");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_config_error_with_source() {
        let io_err = std::io::Error::other("disk on fire");
        let err = CoreError::config_with_source("cannot read folio.toml", io_err);
        assert!(err.to_string().contains("cannot read folio.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CoreError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_load_error_display() {
        let err = LoadError::new("posts/broken.md", "permission denied");
        assert_eq!(
            err.to_string(),
            "failed to load posts/broken.md: permission denied"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("posts/digest.md", 2, "missing required field `title`");
        assert!(err.to_string().contains("posts/digest.md#2"));
        assert!(err.to_string().contains("title"));
    }
}
