//! CLI argument parsing with clap

use crate::config::{Config, DEFAULT_THRESHOLD, Threshold};
use clap::Parser;
use std::path::PathBuf;

/// Photo Sorter - un-nest a photo directory and sort it by day
///
/// Moves every file in nested subdirectories up into PATH, removes the
/// emptied subdirectories, then moves photos into YYYY-MM-DD folders based
/// on their EXIF Date Taken tag.
#[derive(Parser, Debug)]
#[command(name = "photo-sorter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory of unsorted photos
    #[arg(required_unless_present = "inspect", value_parser = existing_directory)]
    pub path: Option<PathBuf>,

    /// Minimum number of photos taken on the same day that warrants a
    /// subdirectory
    #[arg(short, long, env = "PHOTO_SORTER_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: usize,

    /// Print the EXIF tags of a single image and exit
    #[arg(long, value_name = "FILE", conflicts_with = "path")]
    pub inspect: Option<PathBuf>,

    /// Also write a log file into this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log file format as JSON
    #[arg(long, requires = "log_dir")]
    pub json_log: bool,
}

/// Reject a missing path or a non-directory at parse time
fn existing_directory(arg: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(arg);
    Config::new(&path).validate().map_err(|e| e.to_string())?;
    Ok(path)
}

impl Cli {
    /// Convert CLI arguments to a run configuration
    ///
    /// Returns `None` in inspect mode, where no directory is sorted.
    pub fn to_config(&self) -> Option<Config> {
        let root = self.path.clone()?;
        Some(Config {
            root,
            threshold: Threshold::new(self.threshold),
            verbose: self.verbose,
            json_summary: self.json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_threshold() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["photo-sorter", root]).unwrap();
        let config = cli.to_config().unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.threshold.get(), DEFAULT_THRESHOLD);
        assert!(!config.json_summary);
    }

    #[test]
    fn test_threshold_flag() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        let cli =
            Cli::try_parse_from(["photo-sorter", root, "--threshold", "5", "--json"]).unwrap();
        let config = cli.to_config().unwrap();
        assert_eq!(config.threshold.get(), 5);
        assert!(config.json_summary);
    }

    #[test]
    fn test_path_required() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        assert!(Cli::try_parse_from(["photo-sorter"]).is_err());
        assert!(Cli::try_parse_from(["photo-sorter", root, "--threshold", "many"]).is_err());
    }

    #[test]
    fn test_invalid_path_is_usage_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let file = dir.path().join("photo.jpg");
        std::fs::write(&file, b"x").unwrap();

        for bad in [&missing, &file] {
            let err = Cli::try_parse_from(["photo-sorter", bad.to_str().unwrap()]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation);
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn test_inspect_mode() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["photo-sorter", "--inspect", "img.jpg"]).unwrap();
        assert_eq!(cli.inspect, Some(PathBuf::from("img.jpg")));
        assert!(cli.to_config().is_none());

        assert!(Cli::try_parse_from(["photo-sorter", root, "--inspect", "img.jpg"]).is_err());
    }
}
