// Application settings
// Loaded from ~/.config/gridpad/settings.json

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name used for CSV export unless `export.fileName` says otherwise.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "spreadsheet.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Grid
    #[serde(rename = "grid.defaultColumns")]
    pub default_columns: usize,

    #[serde(rename = "grid.defaultRows")]
    pub default_rows: usize,

    // Export
    #[serde(rename = "export.fileName")]
    pub export_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_columns: 3,
            default_rows: 3,
            export_file_name: String::from(DEFAULT_EXPORT_FILE_NAME),
        }
    }
}

const DEFAULT_SETTINGS_FILE: &str = r#"{
    // Size of the grid shown before any file is loaded
    "grid.defaultColumns": 3,
    "grid.defaultRows": 3,

    // File name used when exporting to CSV
    "export.fileName": "spreadsheet.csv"
}
"#;

/// Drop `//` comment lines so the file can carry annotations.
fn strip_comments(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.trim().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridpad");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults.
    /// Writes a commented default file on first run.
    pub fn load() -> Self {
        Self::load_or_create(&Self::config_path())
    }

    /// Load from `path`, writing the commented default file there first if
    /// nothing exists yet.
    pub fn load_or_create(path: &Path) -> Self {
        if !path.exists() {
            if let Err(e) = Self::create_default_file(path) {
                warn!("Error writing default {}: {}", path.display(), e);
            }
            return Self::default();
        }

        Self::load_from(path)
    }

    /// Load settings from a specific file, falling back to defaults when it
    /// is missing or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&strip_comments(&contents)) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        fs::write(path, DEFAULT_SETTINGS_FILE).map_err(|e| e.to_string())
    }
}
