//! Error report handed to callers alongside the index.

use std::path::{Path, PathBuf};

use folio_core::{LoadError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// A skipped file or rejected document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A file could not be read.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A document failed frontmatter validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Error category as it appears in the serialized report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ErrorKind {
    LoadError,
    ValidationError,
}

impl PipelineError {
    /// Error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Load(_) => ErrorKind::LoadError,
            Self::Validation(_) => ErrorKind::ValidationError,
        }
    }

    /// Path of the offending file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Load(e) => &e.path,
            Self::Validation(e) => &e.path,
        }
    }

    /// Document position, for validation errors.
    pub fn ordinal(&self) -> Option<usize> {
        match self {
            Self::Load(_) => None,
            Self::Validation(e) => Some(e.ordinal),
        }
    }

    /// Cause without the path prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Load(e) => &e.message,
            Self::Validation(e) => &e.message,
        }
    }

    /// Serializable report entry.
    pub fn entry(&self) -> ErrorEntry {
        ErrorEntry {
            path: self.path().to_path_buf(),
            ordinal: self.ordinal(),
            kind: self.kind(),
            message: self.message().to_string(),
        }
    }
}

/// One line of the error report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ErrorEntry {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<usize>,
    pub kind: ErrorKind,
    pub message: String,
}

/// Order errors by path, ordinal, kind, then message.
pub fn sort_errors(errors: &mut [PipelineError]) {
    errors.sort_by_cached_key(PipelineError::entry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_entry() {
        let err = PipelineError::from(LoadError::new("a.md", "permission denied"));
        let entry = err.entry();

        assert_eq!(entry.kind, ErrorKind::LoadError);
        assert_eq!(entry.ordinal, None);
        assert_eq!(entry.path, PathBuf::from("a.md"));
        assert_eq!(err.to_string(), "failed to load a.md: permission denied");
    }

    #[test]
    fn test_entry_json_shape() {
        let err = PipelineError::from(ValidationError::new("b.md", 1, "missing required field `title`"));
        let json = serde_json::to_string(&err.entry()).expect("serialize");

        assert_eq!(
            json,
            r#"{"path":"b.md","ordinal":1,"kind":"ValidationError","message":"missing required field `title`"}"#
        );

        let load = PipelineError::from(LoadError::new("c.md", "gone"));
        let json = serde_json::to_string(&load.entry()).expect("serialize");
        assert!(!json.contains("ordinal"));
        assert!(json.contains(r#""kind":"LoadError""#));
    }

    #[test]
    fn test_sort_errors() {
        let mut errors = vec![
            PipelineError::from(ValidationError::new("b.md", 1, "x")),
            PipelineError::from(ValidationError::new("b.md", 0, "x")),
            PipelineError::from(LoadError::new("a.md", "y")),
        ];
        sort_errors(&mut errors);

        let order: Vec<_> = errors
            .iter()
            .map(|e| (e.path().display().to_string(), e.ordinal()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.md".to_string(), None),
                ("b.md".to_string(), Some(0)),
                ("b.md".to_string(), Some(1)),
            ]
        );
    }
}
