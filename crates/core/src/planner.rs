use crate::error::SortError;
use crate::metadata::CaptureRecord;
use crate::scanner::lowercase_extension;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Subdirectory that receives files whose name came from the modification time.
pub const NO_EXIF_DIR: &str = "no-exif";

/// Highest `_NN` suffix tried before a file is given up on.
pub const MAX_COLLISION_SUFFIX: u32 = 99;

const FILENAME_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Destinations handed out during one run.
///
/// Claims stop two files from being given the same name even when the first
/// rename has not reached the disk (dry run). Vacated paths are sources that
/// already moved away in this run and are free again even if they still exist
/// on disk.
#[derive(Debug, Default)]
pub struct DestinationLedger {
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl DestinationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_available(&self, candidate: &Path, original: &Path) -> bool {
        if self.claimed.contains(candidate) {
            return false;
        }
        if candidate == original {
            return true;
        }
        self.vacated.contains(candidate) || !candidate.exists()
    }

    pub fn claim(&mut self, path: PathBuf) {
        self.claimed.insert(path);
    }

    /// Gives back a claim whose rename did not happen.
    pub fn release(&mut self, path: &Path) {
        self.claimed.remove(path);
    }

    pub fn mark_vacated(&mut self, path: PathBuf) {
        self.vacated.insert(path);
    }
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(FILENAME_DATE_FORMAT).to_string()
}

/// Picks the destination for `original` and claims it in `ledger`.
///
/// Only existence is checked; nothing is created or locked on disk.
pub fn derive_destination(
    original: &Path,
    record: &CaptureRecord,
    ledger: &mut DestinationLedger,
) -> Result<PathBuf, SortError> {
    let parent = original
        .parent()
        .ok_or_else(|| SortError::NoParent(original.to_path_buf()))?;
    let target_dir = target_directory(parent, record.used_fallback());
    let stem = format_timestamp(&record.timestamp);
    let extension = lowercase_extension(original);

    let names: Vec<PathBuf> = (0..=MAX_COLLISION_SUFFIX)
        .map(|counter| target_dir.join(file_name(&stem, counter, extension.as_deref())))
        .collect();

    // A file already carrying one of its own names (suffixed or not) keeps it,
    // so a later run never shuffles suffixes around.
    let destination = names
        .iter()
        .find(|candidate| {
            candidate.as_path() == original && ledger.is_available(candidate, original)
        })
        .or_else(|| {
            names
                .iter()
                .find(|candidate| ledger.is_available(candidate, original))
        })
        .cloned()
        .ok_or_else(|| SortError::CollisionLimit {
            path: original.to_path_buf(),
            limit: MAX_COLLISION_SUFFIX,
        })?;

    ledger.claim(destination.clone());
    Ok(destination)
}

fn target_directory(parent: &Path, used_fallback: bool) -> PathBuf {
    // A file already sorted into no-exif stays there instead of nesting.
    if !used_fallback || parent.file_name().is_some_and(|name| name == NO_EXIF_DIR) {
        parent.to_path_buf()
    } else {
        parent.join(NO_EXIF_DIR)
    }
}

fn file_name(stem: &str, counter: u32, extension: Option<&str>) -> String {
    let mut name = if counter == 0 {
        stem.to_string()
    } else {
        format!("{stem}_{counter:02}")
    };
    if let Some(ext) = extension {
        name.push('.');
        name.push_str(ext);
    }
    name
}
