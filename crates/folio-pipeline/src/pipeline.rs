//! Pipeline orchestration.
//!
//! Runs Loader → Splitter → Parser → Index Builder and gathers every
//! non-fatal problem into the error report.

use std::{collections::HashMap, path::PathBuf, time::Instant};

use folio_core::{Config, Post, RawBlob, ValidationError, parse_document};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    index::PostIndex,
    loader::SourceLoader,
    report::{PipelineError, sort_errors},
    splitter::{DocumentSplitter, SplitAnomaly},
};

/// Pipeline run statistics.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Files read successfully.
    pub files: usize,

    /// Logical documents produced by splitting.
    pub documents: usize,

    /// Posts in the index.
    pub posts: usize,

    /// Load and validation errors.
    pub errors: usize,

    /// Dropped empty segments.
    pub anomalies: usize,

    /// Run duration in milliseconds.
    pub duration_ms: u64,
}

/// Result of one pipeline run. Always produced, even when every input failed.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    /// The built index.
    pub index: PostIndex,

    /// Skipped files and rejected documents, sorted by path and ordinal.
    pub errors: Vec<PipelineError>,

    /// Informational split anomalies.
    pub anomalies: Vec<SplitAnomaly>,

    /// Run statistics.
    pub stats: PipelineStats,
}

impl PipelineOutput {
    /// Whether any file was skipped or document rejected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Per-blob parse results.
#[derive(Default)]
struct BlobResult {
    documents: usize,
    posts: Vec<Post>,
    errors: Vec<ValidationError>,
    anomalies: Vec<SplitAnomaly>,
}

/// Content pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    loader: SourceLoader,
    splitter: DocumentSplitter,
    parallel: bool,
}

impl Pipeline {
    /// Create a pipeline from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            loader: SourceLoader::from_config(config),
            splitter: DocumentSplitter::from_config(config),
            parallel: config.content.parallel,
        }
    }

    /// Create a pipeline from explicit components.
    #[must_use]
    pub fn with_components(loader: SourceLoader, splitter: DocumentSplitter) -> Self {
        Self {
            loader,
            splitter,
            parallel: true,
        }
    }

    /// Enable or disable parallel parsing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self.loader = self.loader.with_parallel(parallel);
        self
    }

    /// Load everything under the content root and build the index.
    pub fn run(&self) -> PipelineOutput {
        let start = Instant::now();
        info!(root = %self.loader.root().display(), "starting pipeline");

        let loaded = self.loader.load();
        let load_errors = loaded.errors.into_iter().map(PipelineError::from).collect();
        let mut output = self.assemble(loaded.blobs, load_errors);

        output.stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            files = output.stats.files,
            documents = output.stats.documents,
            posts = output.stats.posts,
            errors = output.stats.errors,
            anomalies = output.stats.anomalies,
            duration_ms = output.stats.duration_ms,
            "pipeline complete"
        );

        output
    }

    /// Build the index from already-loaded blobs.
    pub fn process(&self, blobs: Vec<RawBlob>) -> PipelineOutput {
        self.assemble(blobs, Vec::new())
    }

    fn assemble(&self, blobs: Vec<RawBlob>, mut errors: Vec<PipelineError>) -> PipelineOutput {
        let files = blobs.len();

        let results: Vec<BlobResult> = if self.parallel {
            blobs.par_iter().map(|blob| self.process_blob(blob)).collect()
        } else {
            blobs.iter().map(|blob| self.process_blob(blob)).collect()
        };

        let mut documents = 0;
        let mut posts = Vec::new();
        let mut anomalies = Vec::new();
        for result in results {
            documents += result.documents;
            posts.extend(result.posts);
            errors.extend(result.errors.into_iter().map(PipelineError::from));
            anomalies.extend(result.anomalies);
        }

        let (posts, duplicates) = reject_duplicate_slugs(posts);
        errors.extend(duplicates.into_iter().map(PipelineError::from));

        sort_errors(&mut errors);
        anomalies.sort_by(|a, b| a.path.cmp(&b.path).then(a.segment.cmp(&b.segment)));

        let index = PostIndex::build(posts);
        let stats = PipelineStats {
            files,
            documents,
            posts: index.len(),
            errors: errors.len(),
            anomalies: anomalies.len(),
            duration_ms: 0,
        };

        PipelineOutput {
            index,
            errors,
            anomalies,
            stats,
        }
    }

    /// Split one blob and parse each of its documents.
    fn process_blob(&self, blob: &RawBlob) -> BlobResult {
        let split = self.splitter.split(blob);
        let mut result = BlobResult {
            documents: split.documents.len(),
            anomalies: split.anomalies,
            ..Default::default()
        };

        for document in &split.documents {
            match parse_document(document) {
                Ok(post) => {
                    debug!(slug = %post.slug, "parsed post");
                    result.posts.push(post);
                }
                Err(e) => {
                    warn!(
                        path = %e.path.display(),
                        ordinal = e.ordinal,
                        error = %e.message,
                        "rejecting document"
                    );
                    result.errors.push(e);
                }
            }
        }

        result
    }
}

/// Keep the first post per slug in (source path, ordinal) order; reject the rest.
fn reject_duplicate_slugs(mut posts: Vec<Post>) -> (Vec<Post>, Vec<ValidationError>) {
    posts.sort_by(|a, b| {
        a.source_path
            .cmp(&b.source_path)
            .then(a.ordinal.cmp(&b.ordinal))
    });

    let mut owners: HashMap<String, (PathBuf, usize)> = HashMap::new();
    let mut kept = Vec::with_capacity(posts.len());
    let mut rejected = Vec::new();

    for post in posts {
        if let Some((path, ordinal)) = owners.get(&post.slug) {
            warn!(slug = %post.slug, path = %post.source_path.display(), "duplicate slug");
            rejected.push(ValidationError::new(
                &post.source_path,
                post.ordinal,
                format!(
                    "duplicate slug `{}` (already used by {}#{ordinal})",
                    post.slug,
                    path.display()
                ),
            ));
            continue;
        }
        owners.insert(
            post.slug.clone(),
            (post.source_path.clone(), post.ordinal),
        );
        kept.push(post);
    }

    (kept, rejected)
}
