//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where exported images are written.
    pub exports_dir: PathBuf,

    /// Initial editor settings for a new session.
    #[serde(default)]
    pub editor: EditorDefaults,

    /// Remote screenshot-capture service.
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Starting values for a fresh editing session.
///
/// Colors and backgrounds are kept as their CSS-style strings here and
/// parsed by the editor model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorDefaults {
    pub padding: u32,
    pub inset: u32,
    pub shadow: u32,
    pub corner_radius: u32,

    /// `"none"`, a color, or a `linear-gradient(...)` string.
    pub background: String,

    pub pen_color: String,
    pub pen_size: f32,
}

/// Remote screenshot-capture endpoint and its fixed credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Base URL of the capture endpoint. Empty means remote capture is
    /// not configured.
    pub endpoint: String,

    /// Query parameter carrying the page URL to capture.
    pub url_param: String,

    /// Sent as `X-RapidAPI-Key`.
    pub api_key: String,

    /// Sent as `X-RapidAPI-Host`.
    pub api_host: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "shotframe=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exports_dir: default_exports_dir(),
            editor: EditorDefaults::default(),
            capture: CaptureConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            padding: 0,
            inset: 0,
            shadow: 0,
            corner_radius: 0,
            background: "none".to_string(),
            pen_color: "#ff0000".to_string(),
            pen_size: 3.0,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            url_param: "url".to_string(),
            api_key: String::new(),
            api_host: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("shotframe").join("config.json")
}

/// Default export directory.
fn default_exports_dir() -> PathBuf {
    std::env::var("XDG_PICTURES_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join("Pictures"))
        .join("shotframe")
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "shotframe-config-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.editor.padding = 32;
        config.capture.api_key = "secret".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = scratch_dir("missing");
        let loaded = AppConfig::load_from(&dir.join("config.json"));
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let dir = scratch_dir("invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_partial_sections_fall_back_to_defaults() {
        let json = r#"{ "exports_dir": "/tmp/out", "editor": { "padding": 48 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.editor.padding, 48);
        assert_eq!(config.editor.pen_color, "#ff0000");
        assert_eq!(config.capture.url_param, "url");
        assert_eq!(config.logging.level, "info");
    }
}
