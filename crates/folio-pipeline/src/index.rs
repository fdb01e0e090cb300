//! Post index construction and queries.
//!
//! The index is rebuilt wholesale from a set of posts; it is never mutated
//! in place.

use std::collections::{BTreeMap, BTreeSet};

use folio_core::{Post, normalize_tag};
use serde::Serialize;
use tracing::info;

/// Normalized tag → slugs of the posts carrying it.
pub type TagIndex = BTreeMap<String, BTreeSet<String>>;

/// Sorted, read-only collection of posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostIndex {
    posts: Vec<Post>,
    tag_index: TagIndex,
}

impl PostIndex {
    /// Aggregate posts: newest first, ties by slug, with a derived tag index.
    pub fn build(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| {
            b.metadata
                .date
                .cmp(&a.metadata.date)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        let mut tag_index = TagIndex::new();
        for post in &posts {
            for tag in &post.metadata.tags {
                let key = normalize_tag(tag);
                if key.is_empty() {
                    continue;
                }
                tag_index.entry(key).or_default().insert(post.slug.clone());
            }
        }

        info!(
            posts = posts.len(),
            tags = tag_index.len(),
            "post index built"
        );

        Self { posts, tag_index }
    }

    /// Posts, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Tag → slug mapping.
    pub fn tag_index(&self) -> &TagIndex {
        &self.tag_index
    }

    /// Number of posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the index holds no posts.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Look up a post by slug.
    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.slug == slug)
    }

    /// Posts carrying `tag` (any casing), in index order.
    pub fn posts_tagged(&self, tag: &str) -> Vec<&Post> {
        let Some(slugs) = self.tag_index.get(&normalize_tag(tag)) else {
            return Vec::new();
        };
        self.posts
            .iter()
            .filter(|post| slugs.contains(&post.slug))
            .collect()
    }

    /// Tag keys with their post counts, sorted by tag.
    pub fn tags(&self) -> Vec<(&str, usize)> {
        self.tag_index
            .iter()
            .map(|(tag, slugs)| (tag.as_str(), slugs.len()))
            .collect()
    }

    /// Featured posts, in index order.
    pub fn featured(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|post| post.metadata.featured)
    }

    /// Compact JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON form.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Paginate a slice of items. Pages are 1-based.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> (&[T], usize) {
    if per_page == 0 {
        return (&[], 0);
    }

    let total_pages = items.len().div_ceil(per_page);
    let start = page.saturating_sub(1) * per_page;
    let end = (start + per_page).min(items.len());

    if page == 0 || start >= items.len() {
        (&[], total_pages)
    } else {
        (&items[start..end], total_pages)
    }
}
