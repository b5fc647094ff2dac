//! Site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quire_site::{BuildResult, SiteBuilder, SiteLayout};

/// Run the build command.
pub fn run(root: &Path, output: Option<PathBuf>) -> Result<()> {
    let mut layout = SiteLayout::new(root);
    if let Some(output) = output {
        layout = layout.with_output(output);
    }

    let result = SiteBuilder::new(layout)
        .build()
        .with_context(|| format!("Failed to build site in {}", root.display()))?;

    tracing::info!(
        "Built {} posts and {} static files in {}ms",
        result.posts,
        result.assets,
        result.duration_ms
    );

    println!("{}", summary(&result, root));

    Ok(())
}

/// One-line report, with the output shown relative to the site root.
fn summary(result: &BuildResult, root: &Path) -> String {
    let shown = result
        .output_dir
        .strip_prefix(root)
        .unwrap_or(&result.output_dir);
    format!("Built {} posts → {}", result.posts, shown.display())
}
