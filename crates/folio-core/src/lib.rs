//! Folio Core Library
//!
//! Core types, configuration, error handling, and frontmatter parsing for the
//! Folio content pipeline.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;

pub use config::Config;
pub use content::{LogicalDocument, Post, RawBlob, slugify, word_count};
pub use error::{CoreError, LoadError, Result, ValidationError};
pub use frontmatter::{PostMetadata, normalize_tag, parse_document};
