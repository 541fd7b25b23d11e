//! Capture date extraction
//!
//! The sorter only needs one thing from a photo: when it was taken.
//! [`CaptureDateSource`] is that capability. [`ExifDateSource`] reads it
//! from the EXIF `DateTimeOriginal` tag; any closure
//! `Fn(&Path) -> Option<NaiveDateTime>` works as a source too.

pub mod exif;

use chrono::NaiveDateTime;
use std::path::Path;
use tracing::debug;

/// Something that can tell when a file was captured
///
/// Implementations never fail: unreadable files, missing tags and
/// malformed values all yield `None`.
pub trait CaptureDateSource {
    fn capture_date(&self, path: &Path) -> Option<NaiveDateTime>;
}

impl<F> CaptureDateSource for F
where
    F: Fn(&Path) -> Option<NaiveDateTime>,
{
    fn capture_date(&self, path: &Path) -> Option<NaiveDateTime> {
        self(path)
    }
}

/// Capture dates from EXIF `DateTimeOriginal`
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifDateSource;

impl CaptureDateSource for ExifDateSource {
    fn capture_date(&self, path: &Path) -> Option<NaiveDateTime> {
        match exif::read_date_taken(path) {
            Ok(date) => date,
            Err(e) => {
                debug!(?path, error = %e, "No EXIF capture date");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_closure_source() {
        let source = |path: &Path| {
            (path.extension()? == "jpg").then(|| {
                NaiveDate::from_ymd_opt(2022, 8, 29)
                    .unwrap()
                    .and_hms_opt(12, 34, 56)
                    .unwrap()
            })
        };

        assert!(source.capture_date(Path::new("a.jpg")).is_some());
        assert!(source.capture_date(Path::new("a.txt")).is_none());
    }

    #[test]
    fn test_exif_source_never_fails() {
        let dir = tempdir().unwrap();
        let not_an_image = dir.path().join("notes.jpg");
        std::fs::write(&not_an_image, b"definitely not a jpeg").unwrap();

        assert!(ExifDateSource.capture_date(&not_an_image).is_none());
        assert!(ExifDateSource.capture_date(&dir.path().join("missing.jpg")).is_none());
    }
}
