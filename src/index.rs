//! Photo indexing by capture date

use crate::error::{Error, Result};
use crate::metadata::CaptureDateSource;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span};

/// A file together with its capture timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub taken: NaiveDateTime,
}

/// Files captured on the same calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub files: Vec<PathBuf>,
}

impl DateGroup {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Folder name for this date, `YYYY-MM-DD`
    pub fn folder_name(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Result of indexing a flat directory
#[derive(Debug, Default, Serialize)]
pub struct PhotoIndex {
    /// One group per distinct date, ascending
    pub groups: Vec<DateGroup>,
    /// Dated files, ascending by timestamp
    pub valid_files: Vec<FileEntry>,
    /// Files without a usable capture date
    pub skipped_files: Vec<PathBuf>,
}

impl PhotoIndex {
    pub fn scanned(&self) -> usize {
        self.valid_files.len() + self.skipped_files.len()
    }
}

/// Index the direct child files of `directory`
///
/// Subdirectories are ignored, so this is meant to run after flattening.
pub fn index<S>(directory: &Path, source: &S) -> Result<PhotoIndex>
where
    S: CaptureDateSource + ?Sized,
{
    let _span = span!(Level::INFO, "index", ?directory).entered();

    let mut valid_files = Vec::new();
    let mut skipped_files = Vec::new();

    for path in list_files(directory)? {
        match source.capture_date(&path) {
            Some(taken) => valid_files.push(FileEntry { path, taken }),
            None => {
                debug!(?path, "Skipping file without capture date");
                skipped_files.push(fs::canonicalize(&path).unwrap_or(path));
            }
        }
    }

    valid_files.sort_by(|a, b| a.taken.cmp(&b.taken).then_with(|| a.path.cmp(&b.path)));
    let groups = group_by_date(&valid_files);

    info!(
        photos = valid_files.len(),
        days = groups.len(),
        skipped = skipped_files.len(),
        "Indexing complete"
    );

    Ok(PhotoIndex {
        groups,
        valid_files,
        skipped_files,
    })
}

/// Group entries by the date part of their timestamp
///
/// Members keep the order they have in `entries`.
pub fn group_by_date(entries: &[FileEntry]) -> Vec<DateGroup> {
    let mut by_date: BTreeMap<NaiveDate, Vec<PathBuf>> = BTreeMap::new();
    for entry in entries {
        by_date
            .entry(entry.taken.date())
            .or_default()
            .push(entry.path.clone());
    }

    by_date
        .into_iter()
        .map(|(date, files)| DateGroup { date, files })
        .collect()
}

fn list_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source| Error::ReadDir {
        path: directory.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(directory).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn source_from(
        dates: HashMap<&'static str, NaiveDateTime>,
    ) -> impl Fn(&Path) -> Option<NaiveDateTime> {
        move |path: &Path| {
            let name = path.file_name()?.to_str()?;
            dates.get(name).copied()
        }
    }

    #[test]
    fn test_index_groups_and_orders() {
        let dir = tempdir().unwrap();
        for name in ["late.jpg", "early.jpg", "next_day.jpg", "no_date.jpg"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let source = source_from(HashMap::from([
            ("late.jpg", at("2022-08-29", "18:00:00")),
            ("early.jpg", at("2022-08-29", "08:00:00")),
            ("next_day.jpg", at("2022-08-30", "07:00:00")),
        ]));

        let index = index(dir.path(), &source).unwrap();

        assert_eq!(index.scanned(), 4);
        assert_eq!(index.skipped_files.len(), 1);
        assert!(index.skipped_files[0].ends_with("no_date.jpg"));

        let order: Vec<_> = index
            .valid_files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(order, ["early.jpg", "late.jpg", "next_day.jpg"]);

        assert_eq!(index.groups.len(), 2);
        assert_eq!(index.groups[0].folder_name(), "2022-08-29");
        assert_eq!(index.groups[0].len(), 2);
        assert_eq!(index.groups[1].folder_name(), "2022-08-30");
        assert_eq!(index.groups[1].len(), 1);
    }

    #[test]
    fn test_groups_partition_valid_files() {
        let entries = vec![
            FileEntry {
                path: PathBuf::from("a.jpg"),
                taken: at("2021-01-01", "00:00:00"),
            },
            FileEntry {
                path: PathBuf::from("b.jpg"),
                taken: at("2021-01-01", "23:59:59"),
            },
            FileEntry {
                path: PathBuf::from("c.jpg"),
                taken: at("2021-01-02", "00:00:00"),
            },
        ];

        let groups = group_by_date(&entries);

        let total: usize = groups.iter().map(DateGroup::len).sum();
        assert_eq!(total, entries.len());
        for entry in &entries {
            let owners = groups.iter().filter(|g| g.files.contains(&entry.path)).count();
            assert_eq!(owners, 1);
        }
        assert_eq!(groups[0].files, [PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);
    }

    #[test]
    fn test_skipped_files_are_resolved() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("blank_exif.jpg"), b"x").unwrap();

        let source = |_: &Path| -> Option<NaiveDateTime> { None };
        let index = index(dir.path(), &source).unwrap();

        assert!(index.groups.is_empty());
        assert!(index.valid_files.is_empty());
        assert_eq!(
            index.skipped_files,
            [fs::canonicalize(dir.path().join("blank_exif.jpg")).unwrap()]
        );
    }

    #[test]
    fn test_index_empty_directory() {
        let dir = tempdir().unwrap();
        let source = |_: &Path| -> Option<NaiveDateTime> { None };
        let index = index(dir.path(), &source).unwrap();
        assert_eq!(index.scanned(), 0);
    }
}
