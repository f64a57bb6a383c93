use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

const CONFIG_FILE: &str = "config.toml";

/// Error type for locating and reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no data directory: set --data-dir, VERTILINE_HOME, or HOME")]
    NoDataDir,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolve the data directory: explicit flag, then `VERTILINE_HOME`, then
/// `$XDG_DATA_HOME/vertiline`, then `$HOME/.local/share/vertiline`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = env_path("VERTILINE_HOME") {
        return Ok(dir);
    }
    if let Some(dir) = env_path("XDG_DATA_HOME") {
        return Ok(dir.join("vertiline"));
    }
    env_path("HOME")
        .map(|home| home.join(".local").join("share").join("vertiline"))
        .ok_or(ConfigError::NoDataDir)
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Load `config.toml` from the data directory. A missing file yields the
/// defaults.
pub fn load_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_dir_wins() {
        let dir = resolve_data_dir(Some(Path::new("/tmp/vl-test"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/vl-test"));
    }

    #[test]
    fn missing_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.storage.key, "vertiline_data");
        assert_eq!(config.app.name, "VertiLine");
        assert_eq!(config.app.version, "5.1");
        assert!(config.defaults.url.is_none());
        assert!(config.export.dir.is_none());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            r#"
[defaults]
url = "http://localhost:8000/DefaultData.json"

[export]
dir = "backups"
"#,
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(
            config.defaults.url.as_deref(),
            Some("http://localhost:8000/DefaultData.json")
        );
        assert_eq!(config.export.dir, Some(PathBuf::from("backups")));
        assert_eq!(config.storage.key, "vertiline_data");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[storage\nkey = ").unwrap();
        assert!(matches!(
            load_config(dir.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
