//! Per-user state kept between runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::Result;

pub const APPDATA_FILE: &str = "appdata.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppData {
    /// Version of the tool that last wrote the file
    pub version: String,
    /// Number of completed runs
    pub counter: u64,
    pub last_run: Option<DateTime<Utc>>,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            counter: 0,
            last_run: None,
        }
    }
}

impl AppData {
    /// Default location in the user's data directory
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "reorder-tree")
            .map(|dirs| dirs.data_dir().join(APPDATA_FILE))
    }

    /// Load from `path`. A missing file gives defaults, a corrupted one
    /// gives defaults and a warning.
    pub fn load(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&contents) {
            Ok(appdata) => appdata,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "The AppData config file has been corrupted, using defaults"
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Count a finished run; always stamps the current version
    pub fn record_run(&mut self, at: DateTime<Utc>) {
        self.version = env!("CARGO_PKG_VERSION").to_string();
        self.counter += 1;
        self.last_run = Some(at);
    }
}
