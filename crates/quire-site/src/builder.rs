//! Site builder.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use walkdir::WalkDir;

use quire_md::{
    extract_frontmatter, reading_time, slugify, FrontMatter, FrontmatterError, MarkdownError,
    MarkdownRenderer, Rendered,
};

use crate::assets::copy_static;
use crate::config::{ConfigError, SiteConfig, SiteLayout};
use crate::post::{sort_newest_first, DateError, PostDate, PostSummary};
use crate::templates::{
    FeedContext, IndexContext, PageContext, SiteContext, TemplateEngine, FEED_TEMPLATE,
    INDEX_TEMPLATE, POST_TEMPLATE,
};

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of posts generated
    pub posts: usize,

    /// Whether an about page was generated
    pub about: bool,

    /// Number of static files copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse front matter in {}", .path.display())]
    FrontMatter {
        path: PathBuf,
        source: FrontmatterError,
    },

    #[error("Failed to render Markdown in {}", .path.display())]
    Markdown {
        path: PathBuf,
        source: MarkdownError,
    },

    #[error("Bad date in {}", .path.display())]
    Date { path: PathBuf, source: DateError },

    #[error("No usable slug for {}: title and file name have no ASCII letters or digits", .path.display())]
    EmptySlug { path: PathBuf },

    #[error("Failed to render template {name}")]
    Template {
        name: String,
        source: minijinja::Error,
    },

    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Refusing to wipe {}: it contains the site sources", .path.display())]
    UnsafeOutput { path: PathBuf },
}

/// A source document after front matter extraction and rendering.
struct Document {
    frontmatter: FrontMatter,
    rendered: Rendered,
}

/// Static site builder.
///
/// One `build` call wipes the output directory and regenerates everything:
/// static files, the about page, every post, the index and the feed.
pub struct SiteBuilder {
    layout: SiteLayout,
    today: NaiveDate,
    markdown: MarkdownRenderer,
}

impl SiteBuilder {
    /// Create a builder that dates undated posts with today's date.
    pub fn new(layout: SiteLayout) -> Self {
        Self {
            layout,
            today: Local::now().date_naive(),
            markdown: MarkdownRenderer::new(),
        }
    }

    /// Pin the run date used for undated posts and the copyright year.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Build the site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        tracing::info!("Building site from {}", self.layout.root.display());

        let site = SiteConfig::load(&self.layout.config_file)?;
        let templates = TemplateEngine::from_dir(&self.layout.templates_dir);

        self.reset_output()?;
        let assets = copy_static(&self.layout.static_dir, &self.layout.output_dir)?;
        let about = self.build_about(&site, &templates)?;
        let posts = self.build_posts(&site, &templates)?;
        self.build_index(&site, &templates, &posts)?;
        self.build_feed(&site, &templates, &posts)?;

        Ok(BuildResult {
            posts: posts.len(),
            about,
            assets,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.layout.output_dir.clone(),
        })
    }

    /// Delete the output directory and create it empty.
    fn reset_output(&self) -> Result<(), BuildError> {
        let output = &self.layout.output_dir;

        if output.exists() {
            if let (Ok(out), Ok(root)) = (fs::canonicalize(output), fs::canonicalize(&self.layout.root)) {
                if root.starts_with(&out) {
                    return Err(BuildError::UnsafeOutput { path: output.clone() });
                }
            }
            fs::remove_dir_all(output).map_err(|source| BuildError::Write {
                path: output.clone(),
                source,
            })?;
        }

        fs::create_dir_all(output).map_err(|source| BuildError::Write {
            path: output.clone(),
            source,
        })
    }

    /// Render `about.md` if it exists.
    fn build_about(&self, site: &SiteConfig, templates: &TemplateEngine) -> Result<bool, BuildError> {
        let source = &self.layout.about_file;
        if !source.is_file() {
            tracing::debug!("No {}, skipping about page", source.display());
            return Ok(false);
        }

        let doc = self.load_document(source)?;
        let context = PageContext {
            site: SiteContext::new(site, self.today.year()),
            title: doc.frontmatter.title.clone().unwrap_or_else(|| "about".to_string()),
            description: doc.frontmatter.description.as_deref().unwrap_or("about"),
            content: &doc.rendered.html,
            toc: &doc.rendered.toc,
            toc_html: &doc.rendered.toc_html,
            iso_date: String::new(),
            human_date: String::new(),
            word_count: None,
            reading_time: None,
        };

        self.render_to(
            templates,
            POST_TEMPLATE,
            &context,
            &self.layout.output_dir.join("about.html"),
        )?;
        Ok(true)
    }

    /// Render every post and return their summaries, newest first.
    fn build_posts(
        &self,
        site: &SiteConfig,
        templates: &TemplateEngine,
    ) -> Result<Vec<PostSummary>, BuildError> {
        let mut posts = Vec::new();
        let mut slugs = HashSet::new();

        for path in self.discover_posts()? {
            let post = self.build_post(&path, site, templates)?;
            if !slugs.insert(post.slug.clone()) {
                tracing::debug!(
                    "Slug '{}' from {} overwrites an earlier post",
                    post.slug,
                    path.display()
                );
            }
            posts.push(post);
        }

        sort_newest_first(&mut posts);
        tracing::info!("Rendered {} posts", posts.len());
        Ok(posts)
    }

    /// Markdown files directly inside the posts directory, in file name order.
    fn discover_posts(&self) -> Result<Vec<PathBuf>, BuildError> {
        let dir = &self.layout.posts_dir;
        if !dir.is_dir() {
            tracing::warn!("Posts directory not found: {}", dir.display());
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| BuildError::Read {
                path: dir.clone(),
                source: e.into(),
            })?;

            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "md") {
                paths.push(path.to_path_buf());
            }
        }

        Ok(paths)
    }

    /// Render one post and summarize it.
    fn build_post(
        &self,
        path: &Path,
        site: &SiteConfig,
        templates: &TemplateEngine,
    ) -> Result<PostSummary, BuildError> {
        let doc = self.load_document(path)?;
        let fm = &doc.frontmatter;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let title = non_empty(&fm.title).unwrap_or(stem.as_str()).to_string();

        let mut slug = slugify(non_empty(&fm.slug).unwrap_or(title.as_str()));
        if slug.is_empty() {
            slug = slugify(&stem);
        }
        if slug.is_empty() {
            return Err(BuildError::EmptySlug {
                path: path.to_path_buf(),
            });
        }

        let date = match non_empty(&fm.date) {
            Some(raw) => PostDate::parse(raw).map_err(|source| BuildError::Date {
                path: path.to_path_buf(),
                source,
            })?,
            None => PostDate::from_date(self.today),
        };

        let description = fm.description.clone().unwrap_or_default();
        let reading = reading_time(&doc.rendered.html);

        let context = PageContext {
            site: SiteContext::new(site, self.today.year()),
            title: format!("{} — {}", title, site.site_name),
            description: &description,
            content: &doc.rendered.html,
            toc: &doc.rendered.toc,
            toc_html: &doc.rendered.toc_html,
            iso_date: date.iso_date(),
            human_date: date.human_date(),
            word_count: Some(reading.words),
            reading_time: Some(reading.minutes),
        };

        let output = self
            .layout
            .output_dir
            .join("posts")
            .join(format!("{}.html", slug));
        self.render_to(templates, POST_TEMPLATE, &context, &output)?;

        Ok(PostSummary::new(
            title,
            slug,
            date,
            description,
            reading.words,
            reading.minutes,
        ))
    }

    /// Render the home page.
    fn build_index(
        &self,
        site: &SiteConfig,
        templates: &TemplateEngine,
        posts: &[PostSummary],
    ) -> Result<(), BuildError> {
        let context = IndexContext {
            site: SiteContext::new(site, self.today.year()),
            title: &site.site_name,
            description: &site.description,
            posts,
            work_links: &site.work_links,
            other_links: &site.other_links,
        };

        self.render_to(
            templates,
            INDEX_TEMPLATE,
            &context,
            &self.layout.output_dir.join("index.html"),
        )
    }

    /// Render the RSS feed.
    fn build_feed(
        &self,
        site: &SiteConfig,
        templates: &TemplateEngine,
        posts: &[PostSummary],
    ) -> Result<(), BuildError> {
        let build_date = posts.first().map(|p| p.rfc2822.as_str()).unwrap_or("");
        let context = FeedContext {
            site: SiteContext::new(site, self.today.year()),
            description: &site.description,
            posts,
            build_date,
        };

        self.render_to(
            templates,
            FEED_TEMPLATE,
            &context,
            &self.layout.output_dir.join("feed.xml"),
        )
    }

    /// Read, split and render a Markdown source file.
    fn load_document(&self, path: &Path) -> Result<Document, BuildError> {
        let content = fs::read_to_string(path).map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (frontmatter, body) =
            extract_frontmatter(&content).map_err(|source| BuildError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?;

        let rendered = self
            .markdown
            .render(body)
            .map_err(|source| BuildError::Markdown {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Document {
            frontmatter,
            rendered,
        })
    }

    /// Render a template and write it to `output`.
    fn render_to<S: Serialize>(
        &self,
        templates: &TemplateEngine,
        template: &str,
        context: &S,
        output: &Path,
    ) -> Result<(), BuildError> {
        let rendered = templates
            .render(template, context)
            .map_err(|source| BuildError::Template {
                name: template.to_string(),
                source,
            })?;

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|source| BuildError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(output, rendered).map_err(|source| BuildError::Write {
            path: output.to_path_buf(),
            source,
        })?;

        tracing::debug!("Wrote {}", output.display());
        Ok(())
    }
}

/// Treat empty front matter values like missing ones.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
