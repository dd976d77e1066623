//! Settings document loading.
//!
//! The settings file is a JSON object keyed by data name:
//!
//! ```json
//! {
//!   "rate": {
//!     "db_file_name": "data.db",
//!     "table_name": "usdTlRate",
//!     "table_type": "type1",
//!     "ts_column_name": "stamp",
//!     "column_name": "",
//!     "unit": "TL"
//!   }
//! }
//! ```
//!
//! An empty `column_name` means the value column is named after the data name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::DataSourceConfig;
use crate::error::{AppError, EXIT_UNKNOWN_DATA};

/// Settings file used when neither `--settings` nor the environment names one.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";
/// Environment variable (or `.env` entry) naming the settings file.
pub const SETTINGS_ENV: &str = "XLSXREPORT_SETTINGS";

/// One data name's entry in the settings document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataSettings {
    pub db_file_name: PathBuf,
    pub table_name: String,
    #[serde(default)]
    pub table_type: String,
    pub ts_column_name: String,
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default = "default_localtime")]
    pub localtime: bool,
}

fn default_localtime() -> bool {
    true
}

pub type SettingsDocument = BTreeMap<String, DataSettings>;

/// Pick the settings path: explicit flag, then `$XLSXREPORT_SETTINGS`, then `settings.json`.
pub fn resolve_settings_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    dotenvy::dotenv().ok();
    std::env::var_os(SETTINGS_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}

pub fn load_settings(path: &Path) -> Result<SettingsDocument, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("Failed to read settings '{}': {e}", path.display())))?;
    parse_settings(&text)
        .map_err(|e| AppError::config(format!("Invalid settings '{}': {}", path.display(), e.message())))
}

pub fn parse_settings(text: &str) -> Result<SettingsDocument, AppError> {
    serde_json::from_str(text).map_err(|e| AppError::config(e.to_string()))
}

/// Build the `DataSourceConfig` for `data_name`.
///
/// Relative store paths are resolved against `base_dir` (the settings file's directory).
pub fn data_source(doc: &SettingsDocument, data_name: &str, base_dir: &Path) -> Result<DataSourceConfig, AppError> {
    let entry = doc.get(data_name).ok_or_else(|| {
        let known: Vec<&str> = doc.keys().map(String::as_str).collect();
        AppError::new(
            EXIT_UNKNOWN_DATA,
            format!(
                "Unknown data name '{data_name}'. Known: {}.",
                if known.is_empty() { "(none)".to_string() } else { known.join(", ") }
            ),
        )
    })?;

    if entry.db_file_name.as_os_str().is_empty() {
        return Err(AppError::config(format!("Settings for '{data_name}': `db_file_name` is empty.")));
    }

    let store_location = if entry.db_file_name.is_relative() {
        base_dir.join(&entry.db_file_name)
    } else {
        entry.db_file_name.clone()
    };

    let value_column = if entry.column_name.trim().is_empty() {
        data_name.to_string()
    } else {
        entry.column_name.trim().to_string()
    };

    let config = DataSourceConfig {
        store_location,
        table_name: entry.table_name.trim().to_string(),
        table_type: entry.table_type.clone(),
        timestamp_column: entry.ts_column_name.trim().to_string(),
        value_column,
        value_label: data_name.to_string(),
        unit: entry.unit.clone().filter(|u| !u.trim().is_empty()),
        localize: entry.localtime,
    };
    config
        .validate()
        .map_err(|e| AppError::config(format!("Settings for '{data_name}': {e}")))?;

    Ok(config)
}

/// Load the settings file and resolve `data_name` in one step.
pub fn load_data_source(settings_path: &Path, data_name: &str) -> Result<DataSourceConfig, AppError> {
    let doc = load_settings(settings_path)?;
    let base_dir = settings_path.parent().unwrap_or_else(|| Path::new(""));
    data_source(&doc, data_name, base_dir)
}
