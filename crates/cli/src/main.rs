use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::debug;
use picsort_core::{sort_folder, ConsoleReporter, SortOptions};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "picsort")]
#[command(about = "Renames images after the time they were taken (yyyyMMddHHmmss)")]
struct Cli {
    /// Folder to scan recursively for images
    folder: PathBuf,
    /// Show what would be renamed without renaming anything
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Log debug details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = SortOptions {
        root: cli.folder,
        dry_run: cli.dry_run,
    };
    let mut reporter = ConsoleReporter::stdio();
    let summary = sort_folder(&options, &mut reporter)?;
    debug!(
        "done: found={} processed={} errors={} dry_run={}",
        summary.found, summary.processed, summary.errors, summary.dry_run
    );

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
