//! Sorting pipeline
//!
//! Runs the phases in order over one directory:
//! - Flattening nested subdirectories into the root
//! - Indexing the root by capture date
//! - Moving days that meet the threshold into date folders

use crate::config::{Config, Threshold};
use crate::error::Result;
use crate::flatten::{FlattenReport, flatten_with_report};
use crate::folderize::{FolderizeReport, folderize};
use crate::index::index;
use crate::metadata::{CaptureDateSource, ExifDateSource};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{Level, info, span};

/// Everything a run did, for display
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub root: PathBuf,
    pub threshold: Threshold,
    pub flatten: FlattenReport,
    /// Files with a capture date
    pub photos_found: usize,
    /// Distinct capture days among them
    pub distinct_dates: usize,
    pub folderize: FolderizeReport,
    /// Files without a usable capture date, resolved
    pub skipped_files: Vec<PathBuf>,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S>(elapsed: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(elapsed.as_secs_f64())
}

impl RunSummary {
    pub fn folders_created(&self) -> usize {
        self.folderize.created.len()
    }

    pub fn files_sorted(&self) -> usize {
        self.folderize.files_moved()
    }
}

/// Sorts one directory in place
pub struct PhotoSorter<S = ExifDateSource> {
    config: Config,
    source: S,
}

impl PhotoSorter<ExifDateSource> {
    /// Create a sorter that reads capture dates from EXIF
    pub fn new(config: Config) -> Self {
        Self::with_source(config, ExifDateSource)
    }
}

impl<S: CaptureDateSource> PhotoSorter<S> {
    pub fn with_source(config: Config, source: S) -> Self {
        Self { config, source }
    }

    /// Run all phases
    ///
    /// The root is validated before anything is touched. Flattening
    /// finishes before indexing starts.
    pub fn run(&self) -> Result<RunSummary> {
        let _span = span!(Level::INFO, "sorter_run", root = ?self.config.root).entered();
        let started = Instant::now();

        self.config.validate()?;
        let root = &self.config.root;

        info!("Un-nesting subdirectories...");
        let flatten = flatten_with_report(root)?;

        info!("Indexing photos...");
        let photo_index = index(root, &self.source)?;

        info!(threshold = %self.config.threshold, "Sorting into date folders...");
        let folderize = folderize(&photo_index.groups, self.config.threshold, root)?;

        let summary = RunSummary {
            root: root.clone(),
            threshold: self.config.threshold,
            flatten,
            photos_found: photo_index.valid_files.len(),
            distinct_dates: photo_index.groups.len(),
            folderize,
            skipped_files: photo_index.skipped_files,
            elapsed: started.elapsed(),
        };

        info!(
            sorted = summary.files_sorted(),
            folders = summary.folders_created(),
            elapsed_secs = summary.elapsed.as_secs_f64(),
            "Sorting complete"
        );

        Ok(summary)
    }
}
