//! Application configuration, loaded from `config/<env>.yaml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::workload::PairingMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LogConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub harness: HarnessSettings,
    #[serde(default)]
    pub render: RenderSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    pub log_level: String,
    /// Directory for the log file. No file layer is installed when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default)]
    pub use_json: bool,
    /// `hourly`, `daily`, anything else means a single file.
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_file() -> String {
    "range_probe.log".to_string()
}

fn default_rotation() -> String {
    "never".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_dir: None,
            log_file: default_log_file(),
            use_json: false,
            rotation: default_rotation(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GeneratorConfig {
    /// Pairing mode used when neither `--ordered` nor `--unordered` is given.
    #[serde(default)]
    pub default_mode: PairingMode,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct HarnessSettings {
    /// Unchanged lines shown around each diff hunk.
    #[serde(default)]
    pub diff_context: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderSettings {
    pub tool: String,
    pub format: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tool: "dot".to_string(),
            format: "png".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from a YAML document.
    pub fn from_yaml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load `config/<env>.yaml`, falling back to defaults when the file is absent.
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = PathBuf::from(format!("config/{}.yaml", env));
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path)
    }
}
