use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::resize::{MIN_HEIGHT, MIN_WIDTH};
use crate::settings::DisplayConfig;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "PCMONITOR_CONFIG";

/// Startup settings. Read once; the app never writes this file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Delay between samples in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Mount point whose usage the disk bar shows.
    #[serde(default = "default_disk_mount")]
    pub disk_mount: String,
    /// Initial bar settings for the session.
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_window_width() -> f32 {
    1024.0
}

fn default_window_height() -> f32 {
    768.0
}

fn default_disk_mount() -> String {
    "/".into()
}

const POLL_INTERVAL_RANGE_MS: (u64, u64) = (250, 10_000);

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            disk_mount: default_disk_mount(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Config directory: Windows → AppData/Local/PcMonitor/
    /// Linux → ~/.config/PcMonitor/
    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("PcMonitor")
            .join("config.json")
    }

    /// Load from disk. A missing file means defaults; a broken one is
    /// reported and also falls back to defaults.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::read(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(error = %e, "invalid config file, using defaults");
                Self::default()
            }
        }
    }

    fn read(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&contents)
    }

    /// Parse and sanitize config from a string.
    pub fn load_from_str(s: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(s)?;
        config.sanitize();
        Ok(config)
    }

    /// Clamp all numeric fields to valid ranges.
    fn sanitize(&mut self) {
        let (lo, hi) = POLL_INTERVAL_RANGE_MS;
        self.poll_interval_ms = self.poll_interval_ms.clamp(lo, hi);
        if !self.window_width.is_finite() {
            self.window_width = default_window_width();
        }
        if !self.window_height.is_finite() {
            self.window_height = default_window_height();
        }
        self.window_width = self.window_width.max(MIN_WIDTH);
        self.window_height = self.window_height.max(MIN_HEIGHT);
        if self.disk_mount.trim().is_empty() {
            self.disk_mount = default_disk_mount();
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn window_size(&self) -> iced::Size {
        iced::Size::new(self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ColorMode, Orientation};

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.window_size(), iced::Size::new(1024.0, 768.0));
        assert_eq!(config.disk_mount, "/");
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = AppConfig::load_from_str("{}").unwrap();
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.window_width, 1024.0);
    }

    #[test]
    fn test_sanitize_clamps() {
        let json = r#"{"poll_interval_ms":5,"window_width":100,"window_height":9000,"disk_mount":"  "}"#;
        let config = AppConfig::load_from_str(json).unwrap();
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.window_width, MIN_WIDTH);
        assert_eq!(config.window_height, 9000.0);
        assert_eq!(config.disk_mount, "/");
    }

    #[test]
    fn test_display_section() {
        let json = r##"{"display":{"compact":false,"color_mode":"single","bar_color":"#e84393","orientation":"vertical"}}"##;
        let config = AppConfig::load_from_str(json).unwrap();
        assert!(!config.display.compact);
        assert!(config.display.animated);
        assert_eq!(config.display.color_mode, ColorMode::Single);
        assert_eq!(config.display.orientation, Orientation::Vertical);
        assert_eq!(crate::theme::to_hex(config.display.bar_color), "#e84393");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            AppConfig::load_from_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(AppConfig::load_from_str(r##"{"display":{"bar_color":"red"}}"##).is_err());
    }
}
