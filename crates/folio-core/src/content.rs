//! Content types flowing through the pipeline.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::frontmatter::PostMetadata;

/// One loaded source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlob {
    /// Path relative to the content root.
    pub path: PathBuf,

    /// Full file text.
    pub content: String,
}

impl RawBlob {
    /// Create a new blob.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// One post's worth of text extracted from a [`RawBlob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalDocument {
    /// Path of the blob this document was split from.
    pub source_path: PathBuf,

    /// 0-based position within the source, contiguous after dropping empty segments.
    pub ordinal: usize,

    /// Document text, frontmatter included.
    pub raw_text: String,
}

impl LogicalDocument {
    /// Create a new logical document.
    pub fn new(source_path: impl Into<PathBuf>, ordinal: usize, raw_text: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            ordinal,
            raw_text: raw_text.into(),
        }
    }

    /// Slug derived from the source path and ordinal.
    pub fn slug(&self) -> String {
        slug_for(&self.source_path, self.ordinal)
    }
}

/// A fully parsed and validated post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Unique URL-safe identifier.
    pub slug: String,

    /// Validated frontmatter.
    #[serde(flatten)]
    pub metadata: PostMetadata,

    /// Markdown body with the frontmatter block stripped.
    pub body: String,

    /// Whitespace-delimited token count of the body.
    pub word_count: usize,

    /// Source file the post was read from.
    pub source_path: PathBuf,

    /// Position within the source file.
    pub ordinal: usize,
}

impl Post {
    /// Build a post from a validated document, deriving slug and word count.
    pub fn new(document: &LogicalDocument, metadata: PostMetadata, body: String) -> Self {
        Self {
            slug: document.slug(),
            word_count: word_count(&body),
            metadata,
            body,
            source_path: document.source_path.clone(),
            ordinal: document.ordinal,
        }
    }

    /// Post title.
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Publication date.
    pub fn date(&self) -> chrono::NaiveDate {
        self.metadata.date
    }
}

/// Derive the slug for the `ordinal`-th document of `source_path`.
///
/// `posts/Hello World.md` → `posts/hello-world`, with `-N` appended for N > 0.
pub fn slug_for(source_path: &Path, ordinal: usize) -> String {
    let base = slugify_path(source_path);
    if ordinal > 0 {
        format!("{base}-{ordinal}")
    } else {
        base
    }
}

/// Slugify a content path: extension dropped, components slugified and joined with `/`.
fn slugify_path(path: &Path) -> String {
    let without_ext = path.with_extension("");
    let parts: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(slugify(&part.to_string_lossy())),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        "untitled".to_string()
    } else {
        parts.join("/")
    }
}

/// Convert text to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' || c == '.' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Count whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Test 123 Post"), "test-123-post");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("Special!@#Chars"), "specialchars");
        assert_eq!(slugify("snake_case.v2"), "snake-case-v2");
    }

    #[test]
    fn test_slug_for_simple_file() {
        assert_eq!(slug_for(Path::new("a.md"), 0), "a");
    }

    #[test]
    fn test_slug_for_nested_file() {
        assert_eq!(
            slug_for(Path::new("posts/2026/Hello World.md"), 0),
            "posts/2026/hello-world"
        );
    }

    #[test]
    fn test_slug_for_ordinals() {
        let path = Path::new("digest.md");
        assert_eq!(slug_for(path, 0), "digest");
        assert_eq!(slug_for(path, 1), "digest-1");
        assert_eq!(slug_for(path, 2), "digest-2");
    }

    #[test]
    fn test_slug_for_unsluggable_path() {
        assert_eq!(slug_for(Path::new("!!!.md"), 0), "untitled");
        assert_eq!(slug_for(Path::new("!!!.md"), 3), "untitled-3");
    }

    #[test]
    fn test_slug_for_unicode() {
        assert_eq!(slug_for(Path::new("你好 世界.md"), 0), "你好-世界");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("Hello"), 1);
        assert_eq!(word_count("  one\ttwo\nthree  "), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n"), 0);
    }

    #[test]
    fn test_document_slug() {
        let doc = LogicalDocument::new("notes/week.md", 1, "---\n---");
        assert_eq!(doc.slug(), "notes/week-1");
    }
}
