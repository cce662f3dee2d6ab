use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building import rule-sets.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("style `{style}` has an invalid pattern: {source}")]
    InvalidPattern {
        style: String,
        #[source]
        source: regex::Error,
    },

    #[error("style `{style}` pattern must contain a named `module` capture group")]
    MissingModuleGroup { style: String },

    #[error("style `{style}` applies to no file extensions")]
    NoExtensions { style: String },

    #[error("style `{style}` has an empty module separator")]
    EmptySeparator { style: String },

    #[error("unknown import rule-set `{name}` (available: {available})")]
    UnknownSet { name: String, available: String },
}

/// Errors that abort a scan before any file is read.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root {} does not exist", .0.display())]
    MissingRoot(PathBuf),

    #[error("scan root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to canonicalize {}: {source}", path.display())]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
