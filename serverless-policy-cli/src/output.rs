//! Writing the rendered policy to disk

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::debug;

/// Write `document` to `dir/file_name`, creating `dir` if needed.
///
/// An existing file is only replaced when `force` is set.
pub fn write_policy(dir: &Path, file_name: &str, document: &str, force: bool) -> Result<PathBuf> {
    let path = dir.join(file_name);
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    fs::write(&path, format!("{document}\n"))
        .with_context(|| format!("Failed to write policy to {}", path.display()))?;

    debug!("write_policy: wrote {} bytes to {}", document.len() + 1, path.display());
    Ok(path)
}
