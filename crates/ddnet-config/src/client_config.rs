use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use ddnet_types::ConfigFlags;
use log::debug;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "settings_ddnet.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Path of the console input FIFO (named pipe name on Windows).
    /// Empty disables it.
    pub cl_input_fifo: String,
    /// Origin flag attached to commands read from the FIFO.
    pub fifo_flag: ConfigFlags,
    /// Main loop ticks per second.
    pub tick_rate: u32,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cl_input_fifo: String::new(),
            fifo_flag: ConfigFlags::CLIENT,
            tick_rate: 50,
            log_level: "info".to_string(),
        }
    }
}

/// Values given on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub cl_input_fifo: Option<String>,
    pub tick_rate: Option<u32>,
    pub log_level: Option<String>,
}

impl ClientConfig {
    /// Loads config from the default config file.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads config from a specified path.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Saves config to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(CONFIG_FILE)
    }

    /// Saves config to a specified path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(fifo) = &overrides.cl_input_fifo {
            self.cl_input_fifo = fifo.clone();
        }
        if let Some(rate) = overrides.tick_rate {
            self.tick_rate = rate;
        }
        if let Some(level) = &overrides.log_level {
            self.log_level = level.clone();
        }
    }

    /// Duration of one main loop tick.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = ClientConfig::default();
        assert!(config.cl_input_fifo.is_empty());
        assert_eq!(config.fifo_flag, ConfigFlags::CLIENT);
        assert_eq!(config.tick_rate, 50);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempdir().unwrap();
        let config = ClientConfig::load_from(dir.path().join("missing.json")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let config = ClientConfig {
            cl_input_fifo: "/tmp/ddnet.fifo".to_string(),
            fifo_flag: ConfigFlags::SERVER,
            tick_rate: 25,
            log_level: "debug".to_string(),
        };
        config.save_to(&path).unwrap();

        let loaded = ClientConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "cl_input_fifo": "ddnet" }"#).unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.cl_input_fifo, "ddnet");
        assert_eq!(config.tick_rate, 50);
        assert_eq!(config.fifo_flag, ConfigFlags::CLIENT);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = ClientConfig {
            cl_input_fifo: "from-file".to_string(),
            ..Default::default()
        };
        config.apply_overrides(&ConfigOverrides {
            cl_input_fifo: Some("from-cli".to_string()),
            tick_rate: None,
            log_level: Some("warn".to_string()),
        });
        assert_eq!(config.cl_input_fifo, "from-cli");
        assert_eq!(config.tick_rate, 50);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_tick_interval() {
        let mut config = ClientConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(20));
        config.tick_rate = 0;
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }
}
