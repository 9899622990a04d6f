//! Error type shared by every stage of the packing pipeline.
use std::{fmt, path::PathBuf};

/// A specialized `Result` type for packing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The pipeline stage during which a filesystem operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ManifestRead,
    Discovery,
    AssetRead,
    Compression,
    OutputWrite,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ManifestRead => "manifest load",
            Self::Discovery => "file discovery",
            Self::AssetRead => "file read",
            Self::Compression => "compression",
            Self::OutputWrite => "write",
        })
    }
}

/// An error that can occur while resolving, packing or emitting assets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid manifest '{}': {reason}", path.display())]
    InvalidManifest { path: PathBuf, reason: String },
    #[error("manifest '{}' is not valid JSON", path.display())]
    ManifestSyntax {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown output type '{0}' (expected 'header' or 'source')")]
    InvalidOutputType(String),
    #[error("invalid glob pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("{stage} failed for '{}'", path.display())]
    FileAccess {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("path '{}' cannot be encoded as an identifier: not valid UTF-8", .0.display())]
    Encoding(PathBuf),
    #[error("asset path '{0}' is produced by more than one file")]
    DuplicateAssetPath(String),
    #[error("{fragments} packed fragments for {entries} file entries")]
    FragmentMismatch { entries: usize, fragments: usize },
    #[error("invalid namespace '{0}'")]
    InvalidNamespace(String),
    #[error("'{0}' is not a valid C++ identifier")]
    InvalidIdentifier(String),
    #[error("compression level {0} is out of range (0-9)")]
    InvalidLevel(u32),
    #[error("could not start the packing worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn file_access(stage: Stage, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            stage,
            path: path.into(),
            source,
        }
    }
}
