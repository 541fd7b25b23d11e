//! Error types for the photo sorter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for photo sorter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the photo sorter
///
/// Only structural failures end up here. Failures that concern a single
/// file are absorbed into counters and reports instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Date folder already exists: {path}")]
    DateFolderExists { path: PathBuf },

    #[error("Failed to create date folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
