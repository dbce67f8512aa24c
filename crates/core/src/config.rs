//! Typed configuration store over a dotenv-style `KEY=value` file.
//!
//! The file holds a fixed set of five keys. Every read parses the file fresh,
//! applies each key's parser and yields a [`ValidConfig`]; nothing is cached
//! between calls. Validation failures are "known" errors meant to reach the
//! user as a plain message.

use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;
use tracing::instrument;

use crate::{assets::get_config_file, locale};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(String),
    #[error("{prefix}: {0}", prefix = locale::t("Invalid config property"))]
    InvalidKey(String),
    #[error("Please set your OpenAI API key via `ez config set OPENAI_KEY=<your token>`")]
    MissingKey,
}

/// The five known configuration keys, in their fixed display and file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    OpenaiKey,
    Model,
    SilentMode,
    OpenaiApiEndpoint,
    Language,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::OpenaiKey,
        ConfigKey::Model,
        ConfigKey::SilentMode,
        ConfigKey::OpenaiApiEndpoint,
        ConfigKey::Language,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::OpenaiKey => "OPENAI_KEY",
            ConfigKey::Model => "MODEL",
            ConfigKey::SilentMode => "SILENT_MODE",
            ConfigKey::OpenaiApiEndpoint => "OPENAI_API_ENDPOINT",
            ConfigKey::Language => "LANGUAGE",
        }
    }

    /// Applies this key's parser to a raw value, returning the normalized
    /// string representation that is stored on disk.
    pub fn normalize(&self, value: Option<&str>) -> Result<String, ConfigError> {
        let value = value.filter(|v| !v.is_empty());
        match self {
            ConfigKey::OpenaiKey => value
                .map(str::to_string)
                .ok_or(ConfigError::MissingKey),
            ConfigKey::Model => Ok(value.unwrap_or(DEFAULT_MODEL).to_string()),
            ConfigKey::SilentMode => {
                let enabled = value.is_some_and(|v| v.eq_ignore_ascii_case("true"));
                Ok(enabled.to_string())
            }
            ConfigKey::OpenaiApiEndpoint => Ok(value.unwrap_or(DEFAULT_API_ENDPOINT).to_string()),
            ConfigKey::Language => Ok(value.unwrap_or(DEFAULT_LANGUAGE).to_string()),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidKey(s.to_string()))
    }
}

/// Raw key-value pairs as read from disk. May contain keys outside the known
/// set; those are preserved on rewrite but never validated or displayed.
pub type RawConfig = HashMap<String, String>;

/// Fully validated configuration. Every known key is present and normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidConfig {
    pub openai_key: String,
    pub model: String,
    pub silent_mode: bool,
    pub openai_api_endpoint: String,
    pub language: String,
}

/// The persisted configuration file and its validation rules.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.unwrap_or_else(get_config_file),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw key-value pairs. A missing file is an empty config, not
    /// an error.
    pub fn read_raw(&self) -> Result<RawConfig, ConfigError> {
        if !self.path.exists() {
            return Ok(RawConfig::new());
        }
        let iter = dotenvy::from_path_iter(&self.path)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut raw = RawConfig::new();
        for item in iter {
            let (key, value) = item.map_err(|e| ConfigError::Parse(e.to_string()))?;
            raw.insert(key, value);
        }
        Ok(raw)
    }

    /// Derives a fresh [`ValidConfig`]. `overrides` take precedence over the
    /// file contents, keyed by the on-disk key names.
    #[instrument(skip_all)]
    pub fn load(&self, overrides: &RawConfig) -> Result<ValidConfig, ConfigError> {
        let raw = self.read_raw()?;
        let value_of = |key: ConfigKey| {
            overrides
                .get(key.as_str())
                .or_else(|| raw.get(key.as_str()))
                .map(String::as_str)
        };

        Ok(ValidConfig {
            openai_key: ConfigKey::OpenaiKey.normalize(value_of(ConfigKey::OpenaiKey))?,
            model: ConfigKey::Model.normalize(value_of(ConfigKey::Model))?,
            silent_mode: ConfigKey::SilentMode.normalize(value_of(ConfigKey::SilentMode))?
                == "true",
            openai_api_endpoint: ConfigKey::OpenaiApiEndpoint
                .normalize(value_of(ConfigKey::OpenaiApiEndpoint))?,
            language: ConfigKey::Language.normalize(value_of(ConfigKey::Language))?,
        })
    }

    /// Validates and persists a batch of key-value pairs. Unknown keys and
    /// parser failures abort the whole batch before anything is written, so a
    /// failed `set` leaves the file untouched.
    #[instrument(skip_all)]
    pub fn set(&self, pairs: &[(String, String)]) -> Result<(), ConfigError> {
        let mut raw = self.read_raw()?;
        for (name, value) in pairs {
            let key: ConfigKey = name.parse()?;
            let normalized = key.normalize(Some(value))?;
            raw.insert(key.as_str().to_string(), normalized);
        }
        self.write_raw(&raw)
    }

    /// Normalized display values in fixed key order, for `config get`. The
    /// credential has no default; when absent it renders as an empty value
    /// instead of failing.
    pub fn entries(&self) -> Result<Vec<(ConfigKey, String)>, ConfigError> {
        let raw = self.read_raw()?;
        ConfigKey::ALL
            .into_iter()
            .map(|key| {
                let value = match key.normalize(raw.get(key.as_str()).map(String::as_str)) {
                    Ok(v) => v,
                    Err(ConfigError::MissingKey) => String::new(),
                    Err(e) => return Err(e),
                };
                Ok((key, value))
            })
            .collect()
    }

    /// Rewrites the whole file: known keys first in their fixed order, then
    /// any unknown leftovers in name order.
    fn write_raw(&self, raw: &RawConfig) -> Result<(), ConfigError> {
        let mut out = String::new();
        for key in ConfigKey::ALL {
            if let Some(value) = raw.get(key.as_str()) {
                out.push_str(&format!("{key}={value}\n"));
            }
        }
        let mut extras: Vec<(&String, &String)> = raw
            .iter()
            .filter(|(name, _)| ConfigKey::from_str(name).is_err())
            .collect();
        extras.sort();
        for (name, value) in extras {
            out.push_str(&format!("{name}={value}\n"));
        }
        fs::write(&self.path, out)?;
        Ok(())
    }
}
