//! Static passthrough assets.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::builder::BuildError;

/// Copy every file under `static_dir` into `output_dir`, keeping relative
/// paths. Returns the number of files copied.
///
/// A missing `static_dir` is skipped with a warning.
pub fn copy_static(static_dir: &Path, output_dir: &Path) -> Result<usize, BuildError> {
    if !static_dir.is_dir() {
        tracing::warn!("Static directory not found: {}", static_dir.display());
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(static_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildError::Read {
            path: static_dir.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(static_dir).unwrap_or(entry.path());
        let target = output_dir.join(relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| BuildError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(entry.path(), &target).map_err(|source| BuildError::Write {
            path: target.clone(),
            source,
        })?;

        tracing::debug!("Copied {}", relative.display());
        copied += 1;
    }

    Ok(copied)
}
