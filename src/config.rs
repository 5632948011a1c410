use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::controller::ControllerOptions;
use crate::session::phrase::{PhraseError, PhraseSource};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid phrase list: {0}")]
    Phrases(#[from] PhraseError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub phrases: Option<Vec<String>>,
}

fn default_theme() -> String {
    "storm".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            phrases: None,
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(write_err)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typestorm")
            .join("config.toml")
    }

    pub fn normalize(&mut self) {
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }

    pub fn phrase_source(&self) -> Result<PhraseSource, ConfigError> {
        match &self.phrases {
            Some(phrases) => Ok(PhraseSource::new(phrases.as_slice())?),
            None => Ok(PhraseSource::builtin()),
        }
    }

    /// Session timing is fixed; only phrase selection is tunable here.
    pub fn controller_options(&self, seed: Option<u64>) -> ControllerOptions {
        ControllerOptions { seed }
    }
}
