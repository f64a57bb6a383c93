use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::event::{APP_NAME, DOC_VERSION};

/// Configuration from `config.toml` in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub app: AppInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File stem of the stored document (`<key>.json`)
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            key: default_storage_key(),
        }
    }
}

fn default_storage_key() -> String {
    "vertiline_data".to_string()
}

/// Where to fetch the starter document on first run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for exported backups. Absent = current directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Values written into the `meta` block of newly created documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        AppInfo {
            name: default_app_name(),
            version: default_version(),
        }
    }
}

fn default_app_name() -> String {
    APP_NAME.to_string()
}

fn default_version() -> String {
    DOC_VERSION.to_string()
}
