//! Date folder creation

use crate::config::Threshold;
use crate::error::{Error, Result};
use crate::index::DateGroup;
use crate::relocate::{FailedMove, MoveOutcome, move_into};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{Level, info, span};

/// A date and a file count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateTally {
    pub date: NaiveDate,
    pub count: usize,
}

impl fmt::Display for DateTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.date.format("%Y-%m-%d"), self.count)
    }
}

/// What folderizing did
#[derive(Debug, Default, Serialize)]
pub struct FolderizeReport {
    /// Folders created, with the number of files moved into each
    pub created: Vec<DateTally>,
    /// Dates below threshold, with their group size
    pub skipped: Vec<DateTally>,
    /// Files that stayed put even though their folder was created
    pub failures: Vec<FailedMove>,
}

impl FolderizeReport {
    pub fn files_moved(&self) -> usize {
        self.created.iter().map(|t| t.count).sum()
    }
}

/// Move every group that meets `threshold` into `destination/YYYY-MM-DD`
///
/// A date folder that already exists is an error and stops the run; the
/// groups handled before it stay where they were moved.
pub fn folderize(
    groups: &[DateGroup],
    threshold: Threshold,
    destination: &Path,
) -> Result<FolderizeReport> {
    let _span = span!(Level::INFO, "folderize", ?destination, %threshold).entered();

    let mut groups: Vec<&DateGroup> = groups.iter().collect();
    groups.sort_by_key(|g| g.date);

    let mut report = FolderizeReport::default();

    for group in groups {
        if !threshold.admits(group.len()) {
            info!(date = %group.date, count = group.len(), "Below threshold, leaving in place");
            report.skipped.push(DateTally {
                date: group.date,
                count: group.len(),
            });
            continue;
        }

        let folder = destination.join(group.folder_name());
        fs::create_dir(&folder).map_err(|source| {
            if source.kind() == ErrorKind::AlreadyExists {
                Error::DateFolderExists {
                    path: folder.clone(),
                }
            } else {
                Error::CreateFolder {
                    path: folder.clone(),
                    source,
                }
            }
        })?;

        let mut moved = 0;
        for file in &group.files {
            match move_into(file, &folder) {
                MoveOutcome::Moved { .. } => moved += 1,
                MoveOutcome::Failed(failed) => report.failures.push(failed),
            }
        }

        info!(folder = ?folder, moved, "Created date folder");
        report.created.push(DateTally {
            date: group.date,
            count: moved,
        });
    }

    Ok(report)
}
