//! Directory un-nesting
//!
//! Walks a tree depth-first and lifts every entry one level per unwind
//! step, so a file N levels deep reaches the top after N steps. Emptied
//! directories are removed on the way back up.

use crate::error::{Error, Result};
use crate::relocate::{FailedMove, MoveOutcome, move_up_one_level};
use serde::Serialize;
use std::fs::{self, DirEntry};
use std::ops::{Add, AddAssign};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span, warn};
use walkdir::WalkDir;

/// Outcome tallies for a flatten run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationCounters {
    /// Entries moved up one level
    pub moved: usize,
    /// Emptied directories removed
    pub deleted: usize,
    /// Entries that could not be moved
    pub failed_moves: usize,
    /// Directories left in place because they were not empty
    pub failed_deletes: usize,
}

impl AddAssign for OperationCounters {
    fn add_assign(&mut self, other: Self) {
        self.moved += other.moved;
        self.deleted += other.deleted;
        self.failed_moves += other.failed_moves;
        self.failed_deletes += other.failed_deletes;
    }
}

impl Add for OperationCounters {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl OperationCounters {
    pub fn summary(&self) -> String {
        format!(
            "Moved: {}, Deleted: {}, Failed moves: {}, Failed deletes: {}",
            self.moved, self.deleted, self.failed_moves, self.failed_deletes
        )
    }
}

/// Everything a flatten run produced
#[derive(Debug, Default, Serialize)]
pub struct FlattenReport {
    pub counters: OperationCounters,
    /// Moves that did not happen, with the reason
    pub failures: Vec<FailedMove>,
    /// Subdirectories still present after flattening
    pub residue: Vec<PathBuf>,
}

impl FlattenReport {
    fn absorb(&mut self, other: FlattenReport) {
        self.counters += other.counters;
        self.failures.extend(other.failures);
    }
}

/// Flatten `directory` and return the counters
pub fn flatten(directory: &Path) -> Result<OperationCounters> {
    Ok(flatten_with_report(directory)?.counters)
}

/// Flatten `directory`, keeping failed moves and leftover directories
pub fn flatten_with_report(directory: &Path) -> Result<FlattenReport> {
    let _span = span!(Level::INFO, "flatten", ?directory).entered();

    let mut report = unnest(directory)?;
    report.residue = residual_directories(directory)?;

    info!(
        moved = report.counters.moved,
        deleted = report.counters.deleted,
        failed_moves = report.counters.failed_moves,
        failed_deletes = report.counters.failed_deletes,
        "Flattening complete"
    );
    if !report.residue.is_empty() {
        warn!(count = report.residue.len(), "Subdirectories left behind");
    }

    Ok(report)
}

fn unnest(directory: &Path) -> Result<FlattenReport> {
    let mut report = FlattenReport::default();

    for entry in list_entries(directory)? {
        if !is_directory(&entry) {
            continue;
        }
        let subdir = entry.path();
        debug!(?subdir, "Un-nesting");

        report.absorb(unnest(&subdir)?);

        for inner in list_entries(&subdir)? {
            match move_up_one_level(&inner.path()) {
                MoveOutcome::Moved { .. } => report.counters.moved += 1,
                MoveOutcome::Failed(failed) => {
                    report.counters.failed_moves += 1;
                    report.failures.push(failed);
                }
            }
        }

        if is_empty(&subdir)? {
            match fs::remove_dir(&subdir) {
                Ok(()) => report.counters.deleted += 1,
                Err(e) => {
                    warn!(?subdir, error = %e, "Failed to remove empty directory");
                    report.counters.failed_deletes += 1;
                }
            }
        } else {
            debug!(?subdir, "Directory not empty, leaving it");
            report.counters.failed_deletes += 1;
        }
    }

    Ok(report)
}

/// Direct children of `directory`, in name order
fn list_entries(directory: &Path) -> Result<Vec<DirEntry>> {
    let read_err = |source| Error::ReadDir {
        path: directory.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(directory)
        .map_err(read_err)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_err)?;
    entries.sort_by_key(DirEntry::file_name);
    Ok(entries)
}

/// Symlinks are never followed, so a link to a directory counts as a file
fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().map(|t| t.is_dir()).unwrap_or(false)
}

fn is_empty(directory: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(directory).map_err(|source| Error::ReadDir {
        path: directory.to_path_buf(),
        source,
    })?;
    Ok(entries.next().is_none())
}

fn residual_directories(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut residue = Vec::new();
    for entry in WalkDir::new(directory).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            residue.push(entry.into_path());
        }
    }
    Ok(residue)
}
