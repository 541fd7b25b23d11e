//! Configuration types for the photo sorter

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Default minimum number of same-day photos that warrants a folder
pub const DEFAULT_THRESHOLD: usize = 3;

/// Minimum group size for a date to get its own folder
///
/// A group is admitted when its size is greater than or equal to the
/// threshold. Older releases used a strict comparison; `>=` is the
/// canonical behavior now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Threshold(usize);

impl Threshold {
    pub fn new(min_count: usize) -> Self {
        Self(min_count)
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Whether a group of `count` files gets a folder
    pub fn admits(self, count: usize) -> bool {
        count >= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration for a sorting run
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory to un-nest and sort in place
    pub root: PathBuf,

    /// Minimum photos per day before a folder is created
    pub threshold: Threshold,

    /// Verbose output
    pub verbose: bool,

    /// Print the run summary as JSON instead of styled text
    pub json_summary: bool,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            threshold: Threshold::default(),
            verbose: false,
            json_summary: false,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = Threshold::new(threshold);
        self
    }

    /// Check the root path before anything on disk is touched
    pub fn validate(&self) -> Result<()> {
        if !self.root.exists() {
            return Err(Error::PathNotFound {
                path: self.root.clone(),
            });
        }
        if !self.root.is_dir() {
            return Err(Error::NotADirectory {
                path: self.root.clone(),
            });
        }
        Ok(())
    }
}
