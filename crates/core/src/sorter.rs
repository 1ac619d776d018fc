use crate::apply::{rename_file, RenameOutcome};
use crate::error::SortError;
use crate::exif_reader::read_capture_record;
use crate::planner::{derive_destination, DestinationLedger};
use crate::report::{FileEvent, Reporter, RunSummary};
use crate::scanner::collect_image_files;
use log::{debug, warn};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    pub root: PathBuf,
    pub dry_run: bool,
}

struct Processed {
    destination: PathBuf,
    outcome: RenameOutcome,
    used_fallback: bool,
}

/// Renames every image under `options.root` after its capture time.
///
/// Only an invalid root is returned as an error. Failures on individual files
/// are reported, counted in the summary and never stop the run.
pub fn sort_folder(
    options: &SortOptions,
    reporter: &mut dyn Reporter,
) -> Result<RunSummary, SortError> {
    let candidates = collect_image_files(&options.root)?;

    let mut summary = RunSummary {
        found: candidates.len(),
        dry_run: options.dry_run,
        ..RunSummary::default()
    };
    reporter.started(&options.root, summary.found, options.dry_run);

    let mut ledger = DestinationLedger::new();
    for path in &candidates {
        match process_file(path, options.dry_run, &mut ledger) {
            Ok(processed) => {
                summary.processed += 1;
                let event = if processed.outcome == RenameOutcome::Unchanged {
                    FileEvent::Unchanged { path }
                } else {
                    FileEvent::Renamed {
                        from: path,
                        to: &processed.destination,
                        dry_run: processed.outcome == RenameOutcome::WouldRename,
                        moved_to_no_exif: processed.used_fallback
                            && processed.destination.parent() != path.parent(),
                    }
                };
                reporter.file(&event);
            }
            Err(error) => {
                warn!("{error}");
                summary.errors += 1;
                reporter.file(&FileEvent::Failed {
                    path,
                    error: &error,
                });
            }
        }
    }

    reporter.finished(&summary);
    Ok(summary)
}

fn process_file(
    path: &Path,
    dry_run: bool,
    ledger: &mut DestinationLedger,
) -> Result<Processed, SortError> {
    let record = read_capture_record(path)?;
    let destination = derive_destination(path, &record, ledger)?;
    debug!("{} -> {}", path.display(), destination.display());

    let outcome = match rename_file(path, &destination, dry_run) {
        Ok(outcome) => outcome,
        Err(err) => {
            ledger.release(&destination);
            return Err(err);
        }
    };
    if outcome != RenameOutcome::Unchanged {
        ledger.mark_vacated(path.to_path_buf());
    }

    Ok(Processed {
        destination,
        outcome,
        used_fallback: record.used_fallback(),
    })
}
