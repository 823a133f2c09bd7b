// Update settings
// Loaded from ~/.config/radar-sites/settings.toml (every key optional)

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use radarsite_recon::UpdatePolicy;

pub const DEFAULT_HOMR_URL: &str = "https://www.ncdc.noaa.gov/homr/services/station";

/// Upstream registry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomrSettings {
    /// Station service root; `/search` is appended
    pub base_url: String,

    /// Platforms fetched on every run, in output order
    pub platforms: Vec<String>,

    /// Platforms added by `--more-radars`
    pub extra_platforms: Vec<String>,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for HomrSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HOMR_URL.to_string(),
            platforms: vec!["NEXRAD".into(), "TDWR".into()],
            extra_platforms: vec!["AWOS".into(), "UPPERAIR".into()],
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllowListSettings {
    /// Update-source value that authorizes a full position update
    pub sentinel: String,
}

impl Default for AllowListSettings {
    fn default() -> Self {
        Self { sentinel: "HOMR".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub homr: HomrSettings,
    pub allow_list: AllowListSettings,
    pub policy: UpdatePolicy,

    /// Upstream platform → catalog `type`, used for fresh catalogs
    pub types: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            homr: HomrSettings::default(),
            allow_list: AllowListSettings::default(),
            policy: UpdatePolicy::default(),
            types: HashMap::from([
                ("NEXRAD".to_string(), "wsr88d".to_string()),
                ("TDWR".to_string(), "tdwr".to_string()),
            ]),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: String, message: String },
    Parse { path: String, message: String },
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read settings {path}: {message}"),
            Self::Parse { path, message } => write!(f, "invalid settings {path}: {message}"),
            Self::Validation(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Settings {
    /// Get the default settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("radar-sites");
        config_dir.join("settings.toml")
    }

    /// Load settings.
    ///
    /// An explicit path must exist. The default path is optional: when it is
    /// missing, defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = Self::config_path();
                if !p.exists() {
                    return Ok(Self::default());
                }
                p
            }
        };

        let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_toml(&contents).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(input).map_err(|e| ConfigError::Parse {
            path: "<input>".to_string(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        let url = &self.homr.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "homr.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.homr.platforms.is_empty() {
            return Err(ConfigError::Validation("homr.platforms must not be empty".into()));
        }
        if self.homr.timeout_secs == 0 {
            return Err(ConfigError::Validation("homr.timeout_secs must be positive".into()));
        }
        if self.allow_list.sentinel.is_empty() {
            return Err(ConfigError::Validation("allow_list.sentinel must not be empty".into()));
        }

        Ok(())
    }

    /// Platforms to query, optionally including the extra ones.
    pub fn platforms(&self, more_radars: bool) -> Vec<&str> {
        let extra = if more_radars { self.homr.extra_platforms.as_slice() } else { &[] };
        self.homr
            .platforms
            .iter()
            .chain(extra)
            .map(String::as_str)
            .collect()
    }
}
