mod apply;
mod error;
mod exif_reader;
mod metadata;
mod planner;
mod report;
mod scanner;
mod sorter;
#[cfg(test)]
mod test_support;

pub use apply::{rename_file, RenameOutcome};
pub use error::SortError;
pub use exif_reader::read_capture_record;
pub use metadata::{CaptureRecord, TimestampSource};
pub use planner::{
    derive_destination, format_timestamp, DestinationLedger, MAX_COLLISION_SUFFIX, NO_EXIF_DIR,
};
pub use report::{ConsoleReporter, FileEvent, Reporter, RunSummary};
pub use scanner::{collect_image_files, is_supported_image, validate_root, SUPPORTED_EXTENSIONS};
pub use sorter::{sort_folder, SortOptions};
