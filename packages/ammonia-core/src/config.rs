//! Store configuration.

use std::path::PathBuf;

/// Default data file name, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "ammonia_assets.csv";

/// Store and repository configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the delimited data file
    pub data_path: PathBuf,
    /// Reject non-empty controlled-text values outside their vocabulary
    pub enforce_vocabulary: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            enforce_vocabulary: false,
        }
    }
}
