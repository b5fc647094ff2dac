use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use quire_site::templates::DEFAULT_TEMPLATES;
use quire_site::{SiteBuilder, SiteLayout};
use tempfile::{tempdir, TempDir};
use walkdir::WalkDir;

const SITE_YML: &str = r#"site_name: Field Notes
author: Sam Doe
tagline: Writing things down
description: Notes on software
base_url: https://example.com
work_links:
  - label: Quire
    url: https://example.com/quire
other_links:
  - name: GitHub
    url: https://github.com/example
"#;

fn site() -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();

    fs::write(root.join("site.yml"), SITE_YML).unwrap();
    fs::create_dir_all(root.join("templates")).unwrap();
    for (name, source) in DEFAULT_TEMPLATES {
        fs::write(root.join("templates").join(name), source).unwrap();
    }
    fs::create_dir_all(root.join("static")).unwrap();
    fs::write(root.join("static/styles.css"), "body { font-family: serif; }\n").unwrap();
    fs::write(root.join("static/404.html"), "<h1>Not found</h1>\n").unwrap();
    fs::create_dir_all(root.join("posts")).unwrap();

    temp
}

fn post(root: &Path, file: &str, contents: &str) {
    fs::write(root.join("posts").join(file), contents).unwrap();
}

fn builder(root: &Path) -> SiteBuilder {
    SiteBuilder::new(SiteLayout::new(root)).with_today(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap()
}

fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(dir).unwrap().to_path_buf();
            (relative, fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn builds_posts_index_and_feed_newest_first() {
    let temp = site();
    let root = temp.path();
    post(root, "a.md", "---\ntitle: First\ndate: 2023-01-01\n---\nThe first post.\n");
    post(root, "b.md", "---\ntitle: Second\ndate: 2023-02-01\n---\nThe second post.\n");

    let result = builder(root).build().unwrap();

    assert_eq!(result.posts, 2);
    assert!(root.join("dist/posts/first.html").exists());
    assert!(root.join("dist/posts/second.html").exists());

    let index = read(root, "dist/index.html");
    assert!(index.find(">Second</a>").unwrap() < index.find(">First</a>").unwrap());
    assert!(index.contains("href=\"https://example.com/posts/second.html\""));

    let feed = read(root, "dist/feed.xml");
    assert_eq!(feed.matches("<item>").count(), 2);
    assert!(feed.find("<title>Second</title>").unwrap() < feed.find("<title>First</title>").unwrap());
    assert!(feed.contains("<pubDate>Wed, 01 Feb 2023 00:00:00 -0000</pubDate>"));
    assert!(feed.contains("<pubDate>Sun, 01 Jan 2023 00:00:00 -0000</pubDate>"));
}

#[test]
fn june_precedes_january() {
    let temp = site();
    let root = temp.path();
    post(root, "1-june.md", "---\ntitle: June\ndate: 2024-06-01\n---\nx\n");
    post(root, "2-january.md", "---\ntitle: January\ndate: 2024-01-01\n---\nx\n");

    builder(root).build().unwrap();

    let index = read(root, "dist/index.html");
    assert!(index.find(">June</a>").unwrap() < index.find(">January</a>").unwrap());
    let feed = read(root, "dist/feed.xml");
    assert!(feed.find("<title>June</title>").unwrap() < feed.find("<title>January</title>").unwrap());
}

#[test]
fn empty_posts_directory_builds() {
    let temp = site();
    let root = temp.path();

    let result = builder(root).build().unwrap();

    assert_eq!(result.posts, 0);
    assert_eq!(result.output_dir, root.join("dist"));
    assert!(read(root, "dist/index.html").contains("Nothing here yet."));
    assert!(!read(root, "dist/index.html").contains("post-list"));
    assert_eq!(read(root, "dist/feed.xml").matches("<item>").count(), 0);
}

#[test]
fn rebuilds_are_byte_identical() {
    let temp = site();
    let root = temp.path();
    fs::write(root.join("about.md"), "---\ntitle: About me\n---\nHello.\n").unwrap();
    post(root, "one.md", "---\ntitle: One\ndate: 2023-05-01T08:00:00+02:00\n---\n# Heading\n\n```rust\nfn main() {}\n```\n");
    post(root, "two.md", "Undated post.\n");

    builder(root).build().unwrap();
    let first = snapshot(&root.join("dist"));
    builder(root).build().unwrap();
    let second = snapshot(&root.join("dist"));

    assert_eq!(first, second);
}

#[test]
fn wipes_stale_output() {
    let temp = site();
    let root = temp.path();
    post(root, "old.md", "---\ntitle: Old\n---\nx\n");
    builder(root).build().unwrap();
    assert!(root.join("dist/posts/old.html").exists());

    fs::remove_file(root.join("posts/old.md")).unwrap();
    builder(root).build().unwrap();

    assert!(!root.join("dist/posts/old.html").exists());
}

#[test]
fn copies_static_assets_verbatim() {
    let temp = site();
    let root = temp.path();

    let result = builder(root).build().unwrap();

    assert_eq!(result.assets, 2);
    assert_eq!(read(root, "dist/styles.css"), "body { font-family: serif; }\n");
    assert_eq!(read(root, "dist/404.html"), "<h1>Not found</h1>\n");
}

#[test]
fn post_page_carries_rendered_markdown_and_reading_time() {
    let temp = site();
    let root = temp.path();
    post(
        root,
        "features.md",
        r#"---
title: Features & Things
date: 2024-02-29
description: A tour of <everything>
---

## Code

```python
print("hi")
```

| a | b |
|---|---|
| 1 | 2 |

A claim.[^src]

[^src]: Source.
"#,
    );

    builder(root).build().unwrap();

    let html = read(root, "dist/posts/features-things.html");
    assert!(html.contains("<title>Features &amp; Things — Field Notes</title>"));
    assert!(html.contains("content=\"A tour of &lt;everything&gt;\""));
    assert!(html.contains("<time datetime=\"2024-02-29\">Feb 29, 2024</time>"));
    assert!(html.contains("1 min read"));
    assert!(html.contains("<h2 id=\"code\">"));
    assert!(html.contains("<pre><code class=\"language-python\">"));
    assert!(html.contains("<table>"));
    assert!(html.contains("footnote-reference"));
}

#[test]
fn index_lists_links() {
    let temp = site();
    let root = temp.path();

    builder(root).build().unwrap();

    let index = read(root, "dist/index.html");
    assert!(index.contains("<a href=\"https://example.com/quire\">Quire</a>"));
    assert!(index.contains("<a href=\"https://github.com/example\">GitHub</a>"));
    assert!(index.contains("<p class=\"tagline\">Writing things down</p>"));
}

#[test]
fn custom_output_directory() {
    let temp = site();
    let root = temp.path();
    let out = temp.path().join("public");

    let result = SiteBuilder::new(SiteLayout::new(root).with_output(&out))
        .build()
        .unwrap();

    assert_eq!(result.output_dir, out);
    assert!(out.join("index.html").exists());
    assert!(!root.join("dist").exists());
}
