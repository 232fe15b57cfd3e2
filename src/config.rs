// src/config.rs

// Settings loading (config.toml under the platform config directory).

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::history::{DEFAULT_HISTORY_LEN, DEFAULT_SPIKE_THRESHOLD};
use crate::process_list::DEFAULT_PROCESS_LIMIT;

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 3500;
pub const MIN_REFRESH_INTERVAL_MS: u64 = 250;
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub refresh_interval_ms: u64,
    pub process_limit: usize,
    pub history_len: usize,
    pub spike_threshold: f32,
    pub show_graphs: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            process_limit: DEFAULT_PROCESS_LIMIT,
            history_len: DEFAULT_HISTORY_LEN,
            spike_threshold: DEFAULT_SPIKE_THRESHOLD,
            show_graphs: true,
            window_width: 750,
            window_height: 600,
        }
    }
}

impl Settings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ms < MIN_REFRESH_INTERVAL_MS {
            return Err(invalid(
                "refresh_interval_ms",
                format!(
                    "must be at least {MIN_REFRESH_INTERVAL_MS}, got {}",
                    self.refresh_interval_ms
                ),
            ));
        }
        if self.process_limit == 0 {
            return Err(invalid("process_limit", "must be greater than 0".into()));
        }
        if self.history_len < 2 {
            return Err(invalid(
                "history_len",
                format!("must be at least 2, got {}", self.history_len),
            ));
        }
        if !(self.spike_threshold.is_finite() && self.spike_threshold > 0.0) {
            return Err(invalid(
                "spike_threshold",
                format!("must be > 0, got {}", self.spike_threshold),
            ));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(invalid("window_width/window_height", "must be non-zero".into()));
        }
        Ok(())
    }
}

/// Location of the per-user config file, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "taskmgr").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Loads settings from `explicit` when given (it must exist), otherwise
/// from the default location, falling back to defaults when absent.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    match explicit {
        Some(path) => load_from(path),
        None => match default_config_path() {
            Some(path) if path.exists() => load_from(&path),
            Some(path) => {
                debug!("no config at {}, using defaults", path.display());
                Ok(Settings::default())
            }
            None => Ok(Settings::default()),
        },
    }
}

fn load_from(path: &Path) -> Result<Settings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let settings = Settings::from_toml(&text, path)?;
    info!("loaded settings from {}", path.display());
    Ok(settings)
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Settings, ConfigError> {
        Settings::from_toml(text, Path::new("config.toml"))
    }

    #[test]
    fn empty_file_yields_defaults() {
        let settings = parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.refresh_interval(), Duration::from_millis(3500));
    }

    #[test]
    fn partial_override() {
        let settings = parse("refresh_interval_ms = 1000\nshow_graphs = false\n").unwrap();
        assert_eq!(settings.refresh_interval_ms, 1000);
        assert!(!settings.show_graphs);
        assert_eq!(settings.process_limit, DEFAULT_PROCESS_LIMIT);
    }

    #[test]
    fn rejects_invalid_values() {
        match parse("refresh_interval_ms = 10") {
            Err(ConfigError::Validation { field, .. }) => assert_eq!(field, "refresh_interval_ms"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(matches!(
            parse("history_len = 1"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            parse("spike_threshold = -5.0"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_bad_toml_and_unknown_keys() {
        assert!(matches!(parse("refresh_interval_ms = "), Err(ConfigError::Parse { .. })));
        assert!(matches!(parse("colour = \"green\""), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn explicit_path_must_exist() {
        let missing = Path::new("/nonexistent/taskmgr/config.toml");
        assert!(matches!(
            load_settings(Some(missing)),
            Err(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn loads_explicit_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "process_limit = 25").unwrap();
        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.process_limit, 25);
    }
}
