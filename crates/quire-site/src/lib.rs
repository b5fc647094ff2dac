//! Static site generator for quire blogs.
//!
//! Builds a deployable site from Markdown posts with YAML front matter: one
//! page per post, an index, an optional about page and an RSS feed.

pub mod assets;
pub mod builder;
pub mod config;
pub mod post;
pub mod templates;

pub use builder::{BuildError, BuildResult, SiteBuilder};
pub use config::{ConfigError, Link, SiteConfig, SiteLayout};
pub use post::{DateError, PostDate, PostSummary};
pub use templates::TemplateEngine;
