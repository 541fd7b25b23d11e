//! EXIF reading for images

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// EXIF datetime layout: "YYYY:MM:DD HH:MM:SS"
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

fn read_exif(path: &Path) -> Result<Exif> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| Error::ExifRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Read the `DateTimeOriginal` tag
///
/// `Ok(None)` means the EXIF block was readable but the tag is missing or
/// not in the standard layout.
pub fn read_date_taken(path: &Path) -> Result<Option<NaiveDateTime>> {
    let exif = read_exif(path)?;

    let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) else {
        trace!(?path, "DateTimeOriginal missing");
        return Ok(None);
    };

    let raw = match &field.value {
        Value::Ascii(values) => values.first().map(|v| String::from_utf8_lossy(v).into_owned()),
        _ => None,
    };

    Ok(raw.as_deref().and_then(parse_exif_datetime))
}

/// Parse an EXIF datetime string
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"').trim_end_matches('\0');
    NaiveDateTime::parse_from_str(s, EXIF_DATETIME_FORMAT).ok()
}

/// List every tag of an image as `(name, value)` pairs
///
/// Thumbnail fields and the maker note are left out; they are large and
/// not human readable.
pub fn read_tags(path: &Path) -> Result<Vec<(String, String)>> {
    let exif = read_exif(path)?;

    Ok(exif
        .fields()
        .filter(|field| field.ifd_num != In::THUMBNAIL && field.tag != Tag::MakerNote)
        .map(|field| {
            (
                field.tag.to_string(),
                field.display_value().with_unit(&exif).to_string(),
            )
        })
        .collect())
}
