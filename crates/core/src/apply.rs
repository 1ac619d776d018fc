use crate::error::SortError;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Source and destination are the same path.
    Unchanged,
    WouldRename,
    Renamed,
}

/// Moves `original` to `destination`, creating the destination directory when
/// needed. In dry-run mode nothing on disk is touched.
pub fn rename_file(
    original: &Path,
    destination: &Path,
    dry_run: bool,
) -> Result<RenameOutcome, SortError> {
    if original == destination {
        return Ok(RenameOutcome::Unchanged);
    }
    if dry_run {
        return Ok(RenameOutcome::WouldRename);
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|source| SortError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // fs::rename silently replaces files on Unix.
    if destination.exists() {
        return Err(SortError::DestinationExists {
            from: original.to_path_buf(),
            to: destination.to_path_buf(),
        });
    }

    fs::rename(original, destination).map_err(|source| SortError::Rename {
        from: original.to_path_buf(),
        to: destination.to_path_buf(),
        source,
    })?;
    Ok(RenameOutcome::Renamed)
}
