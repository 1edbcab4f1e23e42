// Application settings.
//
// Settings are read from a JSON file: the path in `TRIP_AUDIT_CONFIG`, or
// `trip_audit.json` in the working directory. A missing file means
// defaults. `TRIP_AUDIT_INPUT` overrides the input path either way.

use crate::error::Result;
use crate::filter::StatusFilter;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "trip_audit.json";
pub const CONFIG_ENV: &str = "TRIP_AUDIT_CONFIG";
pub const INPUT_ENV: &str = "TRIP_AUDIT_INPUT";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub default_status_filter: String,
    pub default_search: String,
    pub preview_rows: usize,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            input_path: PathBuf::from("trips.csv"),
            output_dir: PathBuf::from("."),
            default_status_filter: "all".to_string(),
            default_search: String::new(),
            preview_rows: 5,
            log_filter: "trip_audit=info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn read() -> Result<AppConfig> {
        let path = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        let mut config = Self::read_from(&path)?;
        if let Some(input) = env::var_os(INPUT_ENV) {
            config.input_path = PathBuf::from(input);
        }
        Ok(config)
    }

    pub fn read_from(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let config_str = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn status_filter(&self) -> Result<StatusFilter> {
        self.default_status_filter.parse()
    }
}
