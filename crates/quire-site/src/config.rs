//! Site configuration and source layout.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Site-wide settings from `site.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site_name: String,

    pub author: String,

    #[serde(default)]
    pub tagline: String,

    /// Used by the index page and the feed channel
    #[serde(default)]
    pub description: String,

    /// Absolute URL prefix, stored without a trailing slash
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub work_links: Vec<Link>,

    #[serde(default)]
    pub other_links: Vec<Link>,
}

/// An entry in one of the index page link lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(alias = "name", alias = "title")]
    pub label: String,

    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl SiteConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Where sources live and where output goes.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteLayout {
    /// Site root directory
    pub root: PathBuf,

    /// `site.yml`
    pub config_file: PathBuf,

    /// Optional `about.md`
    pub about_file: PathBuf,

    /// Directory of `*.md` posts
    pub posts_dir: PathBuf,

    /// Directory holding `post.html`, `index.html` and `feed.xml`
    pub templates_dir: PathBuf,

    /// Files copied verbatim into the output
    pub static_dir: PathBuf,

    /// Output directory, wiped on every build
    pub output_dir: PathBuf,
}

impl SiteLayout {
    /// Standard layout under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_file: root.join("site.yml"),
            about_file: root.join("about.md"),
            posts_dir: root.join("posts"),
            templates_dir: root.join("templates"),
            static_dir: root.join("static"),
            output_dir: root.join("dist"),
            root,
        }
    }

    /// Override the output directory.
    pub fn with_output(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self::new(".")
    }
}
