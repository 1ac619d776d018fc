use crate::error::SortError;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lowercase extensions treated as images. Anything else is never a candidate.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "bmp", "gif", "webp"];

pub fn validate_root(root: &Path) -> Result<(), SortError> {
    if !root.exists() {
        return Err(SortError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(SortError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Collects every supported image under `root`, recursively, in file-name
/// order. Unreadable entries are logged and skipped.
///
/// Symlinks that resolve to a file are candidates (the link itself is what
/// gets renamed). Symlinked directories are not followed.
pub fn collect_image_files(root: &Path) -> Result<Vec<PathBuf>, SortError> {
    validate_root(root)?;

    let mut out = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {err}", root.display());
                continue;
            }
        };
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        if is_supported_image(entry.path()) {
            out.push(entry.into_path());
        }
    }

    Ok(out)
}

pub fn is_supported_image(path: &Path) -> bool {
    lowercase_extension(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
