//! Source loading.
//!
//! Walks the content root and reads every matching file into a [`RawBlob`].
//! Unreadable files are reported as [`LoadError`]s and skipped.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use folio_core::{Config, LoadError, RawBlob};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Blobs and errors produced by one loading pass.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Successfully read files, in no particular order.
    pub blobs: Vec<RawBlob>,

    /// Files that could not be read.
    pub errors: Vec<LoadError>,
}

/// Loads content files from a root directory.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    root: PathBuf,
    extensions: Vec<String>,
    max_file_size: u64,
    parallel: bool,
}

impl SourceLoader {
    /// Create a loader for `root` with the default `.md` filter.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let defaults = Config::default();
        Self {
            root: root.into(),
            extensions: defaults.extensions(),
            max_file_size: defaults.content.max_file_size,
            parallel: defaults.content.parallel,
        }
    }

    /// Create a loader from the `[content]` configuration section.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: config.content.root.clone(),
            extensions: config.extensions(),
            max_file_size: config.content.max_file_size,
            parallel: config.content.parallel,
        }
    }

    /// Replace the extension filter (case-insensitive, leading dot optional).
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Set the per-file size limit in bytes.
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Enable or disable parallel reads.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily read matching files in directory-walk order.
    pub fn iter(&self) -> impl Iterator<Item = Result<RawBlob, LoadError>> + '_ {
        self.candidates()
            .map(move |candidate| candidate.and_then(|path| self.read(&path)))
    }

    /// Read all matching files, in parallel when enabled.
    pub fn load(&self) -> LoadOutcome {
        info!(root = %self.root.display(), parallel = self.parallel, "loading content");

        let results: Vec<Result<RawBlob, LoadError>> = if self.parallel {
            let candidates: Vec<_> = self.candidates().collect();
            candidates
                .into_par_iter()
                .map(|candidate| candidate.and_then(|path| self.read(&path)))
                .collect()
        } else {
            self.iter().collect()
        };

        let mut outcome = LoadOutcome::default();
        for result in results {
            match result {
                Ok(blob) => outcome.blobs.push(blob),
                Err(e) => {
                    warn!(path = %e.path.display(), error = %e.message, "skipping unreadable file");
                    outcome.errors.push(e);
                }
            }
        }

        info!(
            files = outcome.blobs.len(),
            errors = outcome.errors.len(),
            "content loaded"
        );
        outcome
    }

    /// Matching file paths under the root; walk failures become errors.
    fn candidates(&self) -> impl Iterator<Item = Result<PathBuf, LoadError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() && self.matches(entry.path()) => {
                    Some(Ok(entry.into_path()))
                }
                Ok(_) => None,
                Err(e) => {
                    let path = e.path().unwrap_or(&self.root).to_path_buf();
                    let message = match e.io_error().map(|io| io.kind()) {
                        Some(ErrorKind::NotFound) if path == self.root => {
                            "content root does not exist".to_string()
                        }
                        _ => e.to_string(),
                    };
                    Some(Err(LoadError::new(path, message)))
                }
            })
    }

    /// Whether the file extension passes the filter.
    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| *allowed == ext))
    }

    /// Read one file into a blob keyed by its root-relative path.
    fn read(&self, path: &Path) -> Result<RawBlob, LoadError> {
        let relative = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();
        debug!(path = %relative.display(), "reading file");

        let size = fs::metadata(path)
            .map_err(|e| LoadError::new(&relative, e.to_string()))?
            .len();
        if size > self.max_file_size {
            return Err(LoadError::new(
                &relative,
                format!(
                    "file is {size} bytes, larger than the {} byte limit",
                    self.max_file_size
                ),
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            let message = if e.kind() == ErrorKind::InvalidData {
                "file is not valid UTF-8".to_string()
            } else {
                e.to_string()
            };
            LoadError::new(&relative, message)
        })?;

        Ok(RawBlob::new(relative, content))
    }
}

/// Hidden files and directories start with a dot.
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
