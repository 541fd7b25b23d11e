//! Photo Sorter - un-nest a photo directory and sort it by capture date
//!
//! This library provides:
//! - Depth-first flattening of nested subdirectories
//! - EXIF `DateTimeOriginal` extraction
//! - Grouping of photos by calendar day
//! - Creation of `YYYY-MM-DD` folders for days that meet a threshold

pub mod cli;
pub mod config;
pub mod error;
pub mod flatten;
pub mod folderize;
pub mod index;
pub mod metadata;
pub mod relocate;
pub mod sorter;

pub use cli::Cli;
pub use config::{Config, DEFAULT_THRESHOLD, Threshold};
pub use error::{Error, Result};
pub use flatten::{FlattenReport, OperationCounters, flatten, flatten_with_report};
pub use folderize::{DateTally, FolderizeReport, folderize};
pub use index::{DateGroup, FileEntry, PhotoIndex, index};
pub use metadata::{CaptureDateSource, ExifDateSource};
pub use sorter::{PhotoSorter, RunSummary};
