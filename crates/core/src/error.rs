use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("folder does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not decode {} as an image: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not read modification time of {}: {source}", .path.display())]
    Modified {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no parent directory for {}", .0.display())]
    NoParent(PathBuf),

    #[error("no free name for {} after {limit} numbered suffixes", .path.display())]
    CollisionLimit { path: PathBuf, limit: u32 },

    #[error("could not create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} appeared before {} could be renamed onto it", .to.display(), .from.display())]
    DestinationExists { from: PathBuf, to: PathBuf },

    #[error("could not rename {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SortError {
    /// Fatal errors abort the run before any file is touched; everything else
    /// is scoped to a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RootNotFound(_) | Self::RootNotDirectory(_))
    }
}
