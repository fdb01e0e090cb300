//! Multi-document splitting.
//!
//! A single file may hold several posts joined by a separator marker of the
//! form `<|RELATED_DOC_SEP-magic-TOKEN|>`. The marker is matched as an exact
//! literal.

use std::{fmt, path::PathBuf};

use folio_core::{Config, LogicalDocument, RawBlob};
use serde::Serialize;
use tracing::{info, warn};

/// Opening part of the separator marker.
pub const SEPARATOR_PREFIX: &str = "<|RELATED_DOC_SEP-magic-";

/// Closing part of the separator marker.
pub const SEPARATOR_SUFFIX: &str = "|>";

/// Exact-match separator literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator(String);

impl Separator {
    /// Separator marker wrapping the corpus token.
    pub fn from_token(token: &str) -> Self {
        Self(format!("{SEPARATOR_PREFIX}{token}{SEPARATOR_SUFFIX}"))
    }

    /// Arbitrary separator literal. Empty literals are refused.
    pub fn literal(literal: impl Into<String>) -> Option<Self> {
        let literal = literal.into();
        (!literal.is_empty()).then_some(Self(literal))
    }

    /// The literal text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A whitespace-only segment dropped during splitting. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitAnomaly {
    /// Source file.
    pub path: PathBuf,

    /// Index of the dropped segment among the raw segments.
    pub segment: usize,
}

impl fmt::Display for SplitAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: dropped empty segment {}",
            self.path.display(),
            self.segment
        )
    }
}

/// Documents and anomalies produced from one blob.
#[derive(Debug, Default)]
pub struct SplitOutcome {
    /// Non-empty documents with contiguous ordinals.
    pub documents: Vec<LogicalDocument>,

    /// Dropped segments.
    pub anomalies: Vec<SplitAnomaly>,

    /// The blob contains a separator marker but no separator is configured,
    /// so it was kept whole.
    pub unsplit_marker: bool,
}

/// Splits blobs into logical documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentSplitter {
    separator: Option<Separator>,
}

impl DocumentSplitter {
    /// Create a splitter. Without a separator every blob is one document.
    #[must_use]
    pub fn new(separator: Option<Separator>) -> Self {
        Self { separator }
    }

    /// Create a splitter from `content.separator_token`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config
                .content
                .separator_token
                .as_deref()
                .map(Separator::from_token),
        )
    }

    /// The configured separator.
    pub fn separator(&self) -> Option<&Separator> {
        self.separator.as_ref()
    }

    /// Raw segments: N separator occurrences yield N + 1 segments.
    pub fn split_raw<'a>(&self, content: &'a str) -> Vec<&'a str> {
        match &self.separator {
            Some(separator) => content.split(separator.as_str()).collect(),
            None => vec![content],
        }
    }

    /// Rejoin segments with the separator; inverse of [`Self::split_raw`].
    pub fn join(&self, segments: &[&str]) -> String {
        match &self.separator {
            Some(separator) => segments.join(separator.as_str()),
            None => segments.concat(),
        }
    }

    /// Split a blob, dropping whitespace-only segments and renumbering ordinals.
    pub fn split(&self, blob: &RawBlob) -> SplitOutcome {
        let mut outcome = SplitOutcome::default();

        if self.separator.is_none() && blob.content.contains(SEPARATOR_PREFIX) {
            warn!(
                path = %blob.path.display(),
                "separator marker found but no separator_token is configured; keeping file whole"
            );
            outcome.unsplit_marker = true;
        }

        for (segment, text) in self.split_raw(&blob.content).into_iter().enumerate() {
            if text.trim().is_empty() {
                info!(path = %blob.path.display(), segment, "dropping empty segment");
                outcome.anomalies.push(SplitAnomaly {
                    path: blob.path.clone(),
                    segment,
                });
                continue;
            }

            let ordinal = outcome.documents.len();
            outcome
                .documents
                .push(LogicalDocument::new(&blob.path, ordinal, text));
        }

        outcome
    }
}
