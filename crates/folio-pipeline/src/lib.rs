//! Folio Pipeline Library
//!
//! Content ingestion for Folio: load files, split multi-post files, parse
//! frontmatter, and build a sorted post index.
//!
//! # Modules
//!
//! - [`loader`] - Content root walking and file reading
//! - [`splitter`] - Multi-document splitting on the separator marker
//! - [`index`] - Post index construction and queries
//! - [`report`] - Error report entries
//! - [`pipeline`] - Stage orchestration

pub mod index;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod splitter;

pub use index::{PostIndex, TagIndex, paginate};
pub use loader::{LoadOutcome, SourceLoader};
pub use pipeline::{Pipeline, PipelineOutput, PipelineStats};
pub use report::{ErrorEntry, ErrorKind, PipelineError};
pub use splitter::{DocumentSplitter, Separator, SplitAnomaly, SplitOutcome};
