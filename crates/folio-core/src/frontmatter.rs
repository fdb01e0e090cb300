//! Frontmatter parsing and schema validation.
//!
//! A document starts with a `---` fence line, followed by `key: value` metadata
//! and a closing `---` line. Everything after the closing fence is the body.
//! Unquoted values are taken verbatim; quoted values, flow lists and indented
//! blocks are read as YAML. The metadata is checked against the post schema
//! before a [`PostMetadata`] is built, so a rejected document never yields
//! partial metadata.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use serde_yaml::Value;

use crate::{
    content::{LogicalDocument, Post},
    error::ValidationError,
};

/// Fence line delimiting the frontmatter block.
pub const FENCE: &str = "---";

/// Required date layout.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Keys with a dedicated field in [`PostMetadata`].
const KNOWN_KEYS: [&str; 5] = ["title", "date", "excerpt", "tags", "featured"];

/// Validated post metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMetadata {
    /// Post title (required, non-empty).
    pub title: String,

    /// Publication date (required).
    pub date: NaiveDate,

    /// Optional summary.
    pub excerpt: Option<String>,

    /// Tags as written, trimmed and deduplicated.
    pub tags: BTreeSet<String>,

    /// Whether the post is featured.
    pub featured: bool,

    /// Unrecognized keys, passed through untouched.
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Why the frontmatter block could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceError {
    /// The first non-blank line is not a fence.
    MissingOpening,
    /// No closing fence after the opening one.
    MissingClosing,
}

impl FenceError {
    fn message(self) -> &'static str {
        match self {
            Self::MissingOpening => {
                "missing frontmatter: document must start with a `---` fence (title and date are required)"
            }
            Self::MissingClosing => "unterminated frontmatter: no closing `---` fence",
        }
    }
}

/// Split document text into the raw frontmatter block and the body.
///
/// Blank lines before the opening fence are skipped.
pub fn split_frontmatter(text: &str) -> Result<(&str, &str), FenceError> {
    let mut offset = 0;
    let mut lines = text.split_inclusive('\n');

    let mut block_start = None;
    for line in lines.by_ref() {
        offset += line.len();
        let trimmed = line.trim_end();
        if trimmed.trim_start().is_empty() {
            continue;
        }
        if trimmed == FENCE {
            block_start = Some(offset);
        }
        break;
    }
    let block_start = block_start.ok_or(FenceError::MissingOpening)?;

    for line in lines {
        let line_start = offset;
        offset += line.len();
        if line.trim_end() == FENCE {
            return Ok((&text[block_start..line_start], &text[offset..]));
        }
    }

    Err(FenceError::MissingClosing)
}

/// Parse and validate a logical document into a [`Post`].
pub fn parse_document(document: &LogicalDocument) -> Result<Post, ValidationError> {
    let reject = |message: String| {
        ValidationError::new(&document.source_path, document.ordinal, message)
    };

    let (block, body) =
        split_frontmatter(&document.raw_text).map_err(|e| reject(e.message().to_string()))?;

    let fields = parse_block(block).map_err(|e| reject(e))?;
    let metadata =
        PostMetadata::from_fields(fields).map_err(|problems| reject(problems.join("; ")))?;

    let body = body
        .trim_start_matches(|c: char| c == '\n' || c == '\r')
        .trim_end()
        .to_string();

    Ok(Post::new(document, metadata, body))
}

/// Parse the frontmatter block into its top-level fields.
///
/// Lines that are indented or start with `-` continue the previous key.
/// Full-line `#` comments at the top level are skipped.
fn parse_block(block: &str) -> Result<BTreeMap<String, Value>, String> {
    const NOT_A_MAPPING: &str = "malformed frontmatter: expected `key: value` pairs";

    let mut entries: Vec<(String, &str, Vec<&str>)> = Vec::new();
    for line in block.lines() {
        let continues = line.trim().is_empty() || line.starts_with([' ', '\t', '-']);
        if continues {
            match entries.last_mut() {
                Some((_, _, rest)) => rest.push(line),
                None if line.trim().is_empty() => {}
                None => return Err(NOT_A_MAPPING.to_string()),
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let (key, inline) = split_entry(line).ok_or_else(|| NOT_A_MAPPING.to_string())?;
        if entries.iter().any(|(existing, _, _)| *existing == key) {
            return Err(format!("malformed frontmatter: duplicate key `{key}`"));
        }
        entries.push((key, inline, Vec::new()));
    }

    entries
        .into_iter()
        .map(|(key, inline, rest)| parse_value(&key, inline, &rest).map(|value| (key, value)))
        .collect()
}

/// Split a top-level line at the first `:` followed by whitespace or the end
/// of the line. Returns the (unquoted) key and the remainder.
fn split_entry(line: &str) -> Option<(String, &str)> {
    let colon = line.char_indices().find_map(|(i, c)| {
        (c == ':' && line[i + 1..].chars().next().is_none_or(char::is_whitespace)).then_some(i)
    })?;

    let key = line[..colon].trim_end();
    let key = ['"', '\'']
        .iter()
        .find_map(|q| key.strip_prefix(*q).and_then(|k| k.strip_suffix(*q)))
        .unwrap_or(key);

    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), &line[colon + 1..]))
}

/// Resolve one field's value from its inline text and continuation lines.
fn parse_value(key: &str, inline: &str, rest: &[&str]) -> Result<Value, String> {
    let malformed = |e: serde_yaml::Error| format!("malformed frontmatter in `{key}`: {e}");
    let inline = inline.trim();

    if inline.is_empty() {
        let nested = dedent(rest);
        if nested.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_yaml::from_str(&nested).map_err(malformed);
    }

    if inline.starts_with(['"', '\'', '[', '{', '|', '>']) {
        let text = std::iter::once(inline)
            .chain(rest.iter().copied())
            .collect::<Vec<_>>()
            .join("\n");
        return serde_yaml::from_str(&text).map_err(malformed);
    }

    // Plain scalar: verbatim, with continuation lines folded into one line.
    let text = std::iter::once(inline)
        .chain(rest.iter().map(|line| line.trim()).filter(|line| !line.is_empty()))
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Value::String(text))
}

/// Strip the common leading indentation of a block.
fn dedent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n")
}

impl PostMetadata {
    /// Validate raw frontmatter fields against the post schema.
    ///
    /// Returns every problem found, so one pass reports all missing or
    /// malformed fields.
    pub fn from_fields(fields: BTreeMap<String, Value>) -> Result<Self, Vec<String>> {
        let mut problems = Vec::new();

        let title = match fields.get("title").filter(|v| !v.is_null()) {
            None => {
                problems.push("missing required field `title`".to_string());
                None
            }
            Some(value) => match scalar_to_string(value) {
                Some(title) if !title.trim().is_empty() => Some(title.trim().to_string()),
                Some(_) => {
                    problems.push("`title` cannot be empty".to_string());
                    None
                }
                None => {
                    problems.push("`title` must be a string".to_string());
                    None
                }
            },
        };

        let date = match fields.get("date").filter(|v| !v.is_null()) {
            None => {
                problems.push("missing required field `date`".to_string());
                None
            }
            Some(value) => {
                let parsed = scalar_to_string(value).and_then(|raw| parse_date(&raw));
                if parsed.is_none() {
                    problems.push(format!(
                        "`date` must be a calendar date in YYYY-MM-DD form, got {}",
                        describe(value)
                    ));
                }
                parsed
            }
        };

        let excerpt = match fields.get("excerpt").filter(|v| !v.is_null()) {
            None => None,
            Some(value) => {
                let excerpt = scalar_to_string(value).map(|s| s.trim().to_string());
                if excerpt.is_none() {
                    problems.push("`excerpt` must be a string".to_string());
                }
                excerpt
            }
        };

        let tags = match fields.get("tags").filter(|v| !v.is_null()) {
            None => BTreeSet::new(),
            Some(Value::Sequence(items)) => {
                let mut tags = BTreeSet::new();
                for item in items {
                    match scalar_to_string(item) {
                        Some(tag) if !tag.trim().is_empty() => {
                            tags.insert(tag.trim().to_string());
                        }
                        Some(_) => tracing::debug!("ignoring blank tag"),
                        None => problems.push(format!(
                            "`tags` entries must be strings, got {}",
                            describe(item)
                        )),
                    }
                }
                tags
            }
            Some(other) => {
                problems.push(format!("`tags` must be a list, got {}", describe(other)));
                BTreeSet::new()
            }
        };

        let featured = match fields.get("featured").filter(|v| !v.is_null()) {
            None => false,
            Some(value) => match parse_bool(value) {
                Some(flag) => flag,
                None => {
                    problems.push(format!(
                        "`featured` must be true or false, got {}",
                        describe(value)
                    ));
                    false
                }
            },
        };

        // Passthrough values end up in the JSON index, so they must convert.
        let mut extra = BTreeMap::new();
        for (key, value) in fields {
            if KNOWN_KEYS.contains(&key.as_str()) {
                continue;
            }
            match serde_json::to_value(&value) {
                Ok(json) => {
                    extra.insert(key, json);
                }
                Err(e) => problems.push(format!("`{key}` cannot be stored in the index: {e}")),
            }
        }

        match (title, date) {
            (Some(title), Some(date)) if problems.is_empty() => Ok(Self {
                title,
                date,
                excerpt,
                tags,
                featured,
                extra,
            }),
            _ => Err(problems),
        }
    }
}

/// Normalized tag key: trimmed and lowercased.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Parse a strict `YYYY-MM-DD` date.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });

    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Case-insensitive `true`/`false`.
fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Textual form of a scalar value.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(_) => "a tagged value".to_string(),
        scalar => format!("{:?}", scalar_to_string(scalar).unwrap_or_default()),
    }
}
