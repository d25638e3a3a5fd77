//! Asset directory traversal.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::runtime::Runtime;

/// Lists every regular file under `dir`, descending into subdirectories.
///
/// Files of a directory come before the contents of its subdirectories;
/// within a directory the operating system's listing order is kept.
/// Symlinked directories are not descended into, so a link cycle cannot
/// yield the same file twice. Symlinked files are collected.
pub fn collect_asset_files<R: Runtime>(runtime: &R, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    let entries = runtime
        .read_dir(dir)
        .with_context(|| format!("Failed to list assets in {}", dir.display()))?;

    for entry in entries {
        if runtime.is_dir(&entry) {
            if runtime.is_symlink(&entry) {
                debug!("Skipping {:?}: symlinked directory", entry);
                continue;
            }
            subdirs.push(entry);
        } else if runtime.is_file(&entry) {
            files.push(entry);
        } else {
            debug!("Skipping {:?}: not a regular file", entry);
        }
    }

    for subdir in subdirs {
        files.extend(collect_asset_files(runtime, &subdir)?);
    }

    Ok(files)
}

/// The name an asset is uploaded under: its base filename.
pub fn asset_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{:?} has no file name", path))
}
