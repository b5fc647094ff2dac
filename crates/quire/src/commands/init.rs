//! Scaffold a starter site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quire_site::templates::DEFAULT_TEMPLATES;

/// Run the init command.
pub fn run(root: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing site in {}", root.display());

    let mut files: Vec<(String, &str)> = vec![
        ("site.yml".to_string(), DEFAULT_CONFIG),
        ("about.md".to_string(), DEFAULT_ABOUT),
        ("posts/hello-world.md".to_string(), DEFAULT_POST),
        ("static/styles.css".to_string(), DEFAULT_STYLES),
        ("static/404.html".to_string(), DEFAULT_NOT_FOUND),
    ];
    for &(name, source) in DEFAULT_TEMPLATES {
        files.push((format!("templates/{name}"), source));
    }

    let mut created = 0;
    for (relative, contents) in &files {
        let path = root.join(relative);
        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", relative);
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {relative}"))?;
        tracing::info!("Created {}", relative);
        created += 1;
    }

    tracing::info!("Initialization complete! ({created} files)");
    tracing::info!("Run 'quire build' to generate the site.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Quire site configuration

site_name: My Blog
author: Your Name
tagline: Notes, mostly
description: A blog built with quire

# Absolute URL the site is served from, no trailing slash.
base_url: https://example.com

work_links:
  - label: Projects
    url: https://example.com/projects
    description: Things I have built

other_links:
  - label: GitHub
    url: https://github.com/
"#;

const DEFAULT_ABOUT: &str = r#"---
title: About
description: Who writes this blog
---

Hello! This page comes from `about.md` at the site root.
"#;

const DEFAULT_POST: &str = r#"---
title: Hello, World
date: 2024-01-01
description: The first post
---

Welcome to your new blog.

[TOC]

## Writing posts

Every Markdown file in `posts/` becomes a page under `posts/<slug>.html`.
Front matter sets the `title`, `slug`, `date` and `description`.

## Code

```rust
fn main() {
    println!("Hello, world!");
}
```

!!! note
    Admonitions, tables and footnotes[^1] work too.

[^1]: Like this one.
"#;

const DEFAULT_STYLES: &str = r#"body {
  max-width: 42rem;
  margin: 0 auto;
  padding: 2rem 1rem;
  font-family: Georgia, serif;
  line-height: 1.6;
}

.post-meta,
.tagline {
  color: #666;
}

.headerlink {
  margin-left: 0.25em;
  text-decoration: none;
}

.codehilite {
  overflow-x: auto;
  background: #f6f8fa;
  padding: 0.5rem 1rem;
}

.admonition {
  border-left: 4px solid #4a90d9;
  padding: 0 1rem;
}

.admonition-title {
  font-weight: bold;
}
"#;

const DEFAULT_NOT_FOUND: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Not found</title>
  <link rel="stylesheet" href="/styles.css">
</head>
<body>
  <h1>Not found</h1>
  <p><a href="/">Back to the front page</a></p>
</body>
</html>
"#;
