//! End-to-end tests for the Folio pipeline.
//!
//! These tests lay out a content directory on disk and run every stage.

use std::{fs, path::Path};

use folio_core::Config;
use folio_pipeline::{ErrorKind, Pipeline, Separator};

const TOKEN: &str = "e2e-3b91f0";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, content).expect("write file");
}

fn config_for(root: &Path) -> Config {
    let mut config = Config::default();
    config.content.root = root.to_path_buf();
    config.content.separator_token = Some(TOKEN.to_string());
    config
}

fn post(title: &str, date: &str, tags: &str) -> String {
    format!("---\ntitle: \"{title}\"\ndate: \"{date}\"\ntags: [{tags}]\n---\n\n{title} body text.\n")
}

#[test]
fn test_single_file_scenario() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write(
        dir.path(),
        "a.md",
        "---\ntitle: \"A\"\ndate: \"2026-01-01\"\n---\nHello",
    );

    let output = Pipeline::new(&config_for(dir.path())).run();

    assert!(output.errors.is_empty());
    assert_eq!(output.index.len(), 1);
    let post = &output.index.posts()[0];
    assert_eq!(post.slug, "a");
    assert_eq!(post.title(), "A");
    assert_eq!(post.body, "Hello");
    assert_eq!(post.word_count, 1);
}

#[test]
fn test_no_frontmatter_scenario() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write(dir.path(), "notes.md", "# Notes\n\nNo metadata here.\n");

    let output = Pipeline::new(&config_for(dir.path())).run();

    assert!(output.index.is_empty());
    assert!(output.index.posts().is_empty());
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].kind(), ErrorKind::ValidationError);
    assert_eq!(output.errors[0].path(), Path::new("notes.md"));
}

#[test]
fn test_full_corpus() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let separator = Separator::from_token(TOKEN);

    write(
        dir.path(),
        "posts/ci-pipelines.md",
        &post("CI Pipelines", "2026-01-10", "\"DevOps\", \"GitHub\""),
    );
    write(
        dir.path(),
        "posts/weekly.md",
        &format!(
            "{}\n{separator}\n{}\n{separator}\n{}",
            post("Week One", "2026-02-20", "\"devops\""),
            post("Week Two", "2026-01-30", "\"Open-Source\""),
            post("Week Three", "2026-01-30", "\"open-source\", \"github\""),
        ),
    );
    write(
        dir.path(),
        "posts/broken.md",
        "---\ndate: \"2026-03-01\"\n---\nThis post forgot its title.\n",
    );
    write(dir.path(), "README.txt", "not content");

    let output = Pipeline::new(&config_for(dir.path())).run();

    // One rejected document, the rest indexed.
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].kind(), ErrorKind::ValidationError);
    assert_eq!(output.errors[0].path(), Path::new("posts/broken.md"));
    assert_eq!(output.stats.files, 3);
    assert_eq!(output.stats.documents, 5);

    let slugs: Vec<_> = output
        .index
        .posts()
        .iter()
        .map(|p| p.slug.as_str())
        .collect();
    assert_eq!(
        slugs,
        vec![
            "posts/weekly",
            "posts/weekly-1",
            "posts/weekly-2",
            "posts/ci-pipelines",
        ]
    );

    let tags = output.index.tag_index();
    let devops: Vec<_> = tags["devops"].iter().map(String::as_str).collect();
    assert_eq!(devops, vec!["posts/ci-pipelines", "posts/weekly"]);
    let github: Vec<_> = tags["github"].iter().map(String::as_str).collect();
    assert_eq!(github, vec!["posts/ci-pipelines", "posts/weekly-2"]);
    let open_source: Vec<_> = tags["open-source"].iter().map(String::as_str).collect();
    assert_eq!(open_source, vec!["posts/weekly-1", "posts/weekly-2"]);
    assert_eq!(tags.len(), 3);
}

#[test]
fn test_rebuild_is_byte_identical() {
    let dir = tempfile::tempdir().expect("create temp dir");
    for i in 0..12 {
        write(
            dir.path(),
            &format!("p{i:02}.md"),
            &post(&format!("Post {i}"), &format!("2026-01-{:02}", i % 5 + 1), "\"Rust\""),
        );
    }

    let pipeline = Pipeline::new(&config_for(dir.path()));
    let first = pipeline.run().index.to_json_pretty().expect("json");
    let second = pipeline.run().index.to_json_pretty().expect("json");

    assert_eq!(first, second);
}

#[test]
fn test_unreadable_file_is_skipped() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write(dir.path(), "good.md", &post("Good", "2026-01-01", ""));
    fs::write(dir.path().join("binary.md"), [0xc3, 0x28, 0xa0, 0xa1]).expect("write");

    let output = Pipeline::new(&config_for(dir.path())).run();

    assert_eq!(output.index.len(), 1);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].kind(), ErrorKind::LoadError);
    assert_eq!(output.errors[0].ordinal(), None);
}

#[test]
fn test_error_report_serializes() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write(dir.path(), "bad.md", "---\ntitle: \"No date\"\n---\n");

    let output = Pipeline::new(&config_for(dir.path())).run();
    let entries: Vec<_> = output.errors.iter().map(|e| e.entry()).collect();
    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&entries).expect("serialize")).expect("parse");

    assert_eq!(json[0]["path"], "bad.md");
    assert_eq!(json[0]["ordinal"], 0);
    assert_eq!(json[0]["kind"], "ValidationError");
    assert!(
        json[0]["message"]
            .as_str()
            .expect("message")
            .contains("date")
    );
}

#[test]
fn test_sample_corpus_if_present() {
    let content_dir = Path::new("../../demos/blog/content");
    if !content_dir.exists() {
        // Skip if running from different working directory
        return;
    }

    let mut config = Config::load(Path::new("../../demos/blog/folio.toml")).expect("config");
    config.content.root = content_dir.to_path_buf();
    let output = Pipeline::new(&config).run();

    assert!(!output.index.is_empty());
    assert!(output.index.posts().windows(2).all(|w| w[0].date() >= w[1].date()));
}
