use crate::error::SortError;
use log::warn;
use std::fmt;
use std::io::{self, Stderr, Stdout, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub found: usize,
    pub processed: usize,
    pub errors: usize,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum FileEvent<'a> {
    Unchanged {
        path: &'a Path,
    },
    Renamed {
        from: &'a Path,
        to: &'a Path,
        dry_run: bool,
        moved_to_no_exif: bool,
    },
    Failed {
        path: &'a Path,
        error: &'a SortError,
    },
}

/// Receives the progress of a run, in order: `started`, one `file` per
/// candidate, then `finished`.
pub trait Reporter {
    fn started(&mut self, root: &Path, found: usize, dry_run: bool);
    fn file(&mut self, event: &FileEvent<'_>);
    fn finished(&mut self, summary: &RunSummary);
}

/// Line-oriented text report. Actions and the summary go to `out`, per-file
/// failures to `err`. Paths are shown relative to the scanned root.
#[derive(Debug)]
pub struct ConsoleReporter<O: Write, E: Write> {
    out: O,
    err: E,
    root: PathBuf,
}

impl ConsoleReporter<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            root: PathBuf::new(),
        }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn started(&mut self, root: &Path, found: usize, dry_run: bool) {
        self.root = root.to_path_buf();
        if found == 0 {
            emit(
                &mut self.out,
                format_args!("No image files found in {}.", root.display()),
            );
            return;
        }

        emit(&mut self.out, format_args!("Found {found} image files."));
        if dry_run {
            emit(
                &mut self.out,
                format_args!("DRY RUN MODE - No files will be renamed."),
            );
            emit(&mut self.out, format_args!(""));
        }
    }

    fn file(&mut self, event: &FileEvent<'_>) {
        match *event {
            FileEvent::Unchanged { .. } => {}
            FileEvent::Renamed {
                from,
                to,
                dry_run,
                moved_to_no_exif,
            } => {
                let verb = if dry_run { "Would rename" } else { "Renamed" };
                emit(
                    &mut self.out,
                    format_args!(
                        "{verb}: {} -> {}",
                        relative(&self.root, from).display(),
                        relative(&self.root, to).display()
                    ),
                );
                if moved_to_no_exif {
                    emit(
                        &mut self.out,
                        format_args!("  (moved to no-exif folder - no EXIF date found)"),
                    );
                }
            }
            FileEvent::Failed { path, error } => emit(
                &mut self.err,
                format_args!(
                    "Skipping {}: {error}",
                    relative(&self.root, path).display()
                ),
            ),
        }
    }

    fn finished(&mut self, summary: &RunSummary) {
        if summary.found == 0 {
            return;
        }
        emit(&mut self.out, format_args!("\nProcessing complete!"));
        emit(
            &mut self.out,
            format_args!("Successfully processed: {} files", summary.processed),
        );
        if summary.errors > 0 {
            emit(
                &mut self.out,
                format_args!("Errors encountered: {} files", summary.errors),
            );
        }
    }
}

fn relative<'p>(root: &Path, path: &'p Path) -> &'p Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn emit(writer: &mut impl Write, line: fmt::Arguments<'_>) {
    if let Err(err) = writeln!(writer, "{line}") {
        warn!("could not write report line: {err}");
    }
}
