//! Single-entry moves that never overwrite

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{trace, warn};

/// Why a move did not happen
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("destination already exists")]
    DestinationExists,

    #[error("entry has no file name")]
    NoFileName,

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Result of one move attempt
#[derive(Debug)]
pub enum MoveOutcome {
    Moved { to: PathBuf },
    Failed(FailedMove),
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// A move that did not happen, kept for reporting
#[derive(Debug, Serialize)]
pub struct FailedMove {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: MoveError,
}

fn serialize_reason<S>(reason: &MoveError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(reason)
}

/// Move `entry` into `target_dir`, keeping its name
///
/// An existing destination is a failure, never an overwrite.
pub fn move_into(entry: &Path, target_dir: &Path) -> MoveOutcome {
    let Some(name) = entry.file_name() else {
        return fail(entry, None, MoveError::NoFileName);
    };
    let destination = target_dir.join(name);

    // symlink_metadata so a dangling link at the destination still counts
    if fs::symlink_metadata(&destination).is_ok() {
        return fail(entry, Some(destination), MoveError::DestinationExists);
    }

    match fs::rename(entry, &destination) {
        Ok(()) => {
            trace!(from = ?entry, to = ?destination, "Moved");
            MoveOutcome::Moved { to: destination }
        }
        Err(e) => fail(entry, Some(destination), MoveError::Io(e)),
    }
}

/// Move `entry` into the parent of its current directory
pub fn move_up_one_level(entry: &Path) -> MoveOutcome {
    match entry.parent().and_then(Path::parent) {
        Some(grandparent) => move_into(entry, grandparent),
        None => fail(
            entry,
            None,
            MoveError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "entry has no grandparent directory",
            )),
        ),
    }
}

fn fail(entry: &Path, destination: Option<PathBuf>, reason: MoveError) -> MoveOutcome {
    warn!(source = ?entry, ?destination, %reason, "Move failed");
    MoveOutcome::Failed(FailedMove {
        source: entry.to_path_buf(),
        destination,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_move_up_one_level() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("photo.jpg"), b"x").unwrap();

        let outcome = move_up_one_level(&nested.join("photo.jpg"));
        assert!(outcome.is_moved());
        assert!(dir.path().join("photo.jpg").exists());
        assert!(!nested.join("photo.jpg").exists());
    }

    #[test]
    fn test_move_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("photo.jpg"), b"top").unwrap();
        fs::write(nested.join("photo.jpg"), b"nested").unwrap();

        match move_up_one_level(&nested.join("photo.jpg")) {
            MoveOutcome::Failed(failed) => {
                assert!(matches!(failed.reason, MoveError::DestinationExists));
                assert_eq!(failed.destination, Some(dir.path().join("photo.jpg")));
            }
            MoveOutcome::Moved { .. } => panic!("move should have been refused"),
        }

        assert_eq!(fs::read(dir.path().join("photo.jpg")).unwrap(), b"top");
        assert_eq!(fs::read(nested.join("photo.jpg")).unwrap(), b"nested");
    }

    #[test]
    fn test_move_missing_source() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();

        match move_into(&dir.path().join("ghost.jpg"), &target) {
            MoveOutcome::Failed(failed) => assert!(matches!(failed.reason, MoveError::Io(_))),
            MoveOutcome::Moved { .. } => panic!("nothing to move"),
        }
    }
}
