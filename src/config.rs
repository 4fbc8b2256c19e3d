use std::path::{Path, PathBuf};

pub const CURRENT_RATE_FILE: &str = "current_rate.json";
pub const RATES_FILE: &str = "rates.json";

/// Settings for a single update run.
///
/// Data files live in `data/` next to the crate manifest, whatever the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Used when no source produced a usable rate.
    pub fallback_rate: f64,
    /// Maximum number of history entries after the new sample is appended.
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("data"),
            fallback_rate: 40.50,
            history_limit: 30,
        }
    }
}

impl Config {
    pub fn current_rate_path(&self) -> PathBuf {
        self.data_dir.join(CURRENT_RATE_FILE)
    }

    pub fn rates_path(&self) -> PathBuf {
        self.data_dir.join(RATES_FILE)
    }
}
