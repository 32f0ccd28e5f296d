use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{self, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    core::utils::{ensure_dir, PathResolver},
    currency::CurrencySettings,
};

const TMP_SUFFIX: &str = "tmp";
const DEFAULT_ITEMS_PER_PAGE: usize = 15;
pub const MAX_ITEMS_PER_PAGE: usize = 500;
const DEFAULT_BACKUP_RETENTION: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

/// User preferences persisted next to the ledger data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_items_per_page")]
    pub items_per_page: usize,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            items_per_page: Self::default_items_per_page(),
            backup_retention: Self::default_backup_retention(),
            export_dir: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "locale",
        "currency",
        "items_per_page",
        "backup_retention",
        "export_dir",
        "ui_color_enabled",
    ];

    fn default_locale() -> String {
        "en-IN".into()
    }

    fn default_currency() -> String {
        "INR".into()
    }

    fn default_items_per_page() -> usize {
        DEFAULT_ITEMS_PER_PAGE
    }

    fn default_backup_retention() -> usize {
        DEFAULT_BACKUP_RETENTION
    }

    fn default_ui_color_enabled() -> bool {
        true
    }

    /// Rows per ledger sheet, kept within `1..=MAX_ITEMS_PER_PAGE`.
    pub fn page_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.items_per_page.min(MAX_ITEMS_PER_PAGE))
            .or_else(|| NonZeroUsize::new(DEFAULT_ITEMS_PER_PAGE))
            .unwrap_or(NonZeroUsize::MIN)
    }

    pub fn currency_settings(&self) -> CurrencySettings {
        CurrencySettings::new(&self.locale, &self.currency)
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::Invalid(
                "items_per_page must be at least 1".into(),
            ));
        }
        if self.items_per_page > MAX_ITEMS_PER_PAGE {
            return Err(ConfigError::Invalid(format!(
                "items_per_page must be at most {}",
                MAX_ITEMS_PER_PAGE
            )));
        }
        if self.backup_retention == 0 {
            return Err(ConfigError::Invalid(
                "backup_retention must be at least 1".into(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency cannot be empty".into()));
        }
        Ok(())
    }

    /// Updates one key from its textual form, leaving the config untouched on error.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = self.clone();
        let value = value.trim();
        match key {
            "locale" => next.locale = value.to_string(),
            "currency" => next.currency = value.to_ascii_uppercase(),
            "items_per_page" => next.items_per_page = parse_count(key, value)?,
            "backup_retention" => next.backup_retention = parse_count(key, value)?,
            "export_dir" => {
                next.export_dir = match value {
                    "" | "none" | "-" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            "ui_color_enabled" => next.ui_color_enabled = parse_flag(key, value)?,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown config key `{}` (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("locale", self.locale.clone()),
            ("currency", self.currency.clone()),
            ("items_per_page", self.items_per_page.to_string()),
            ("backup_retention", self.backup_retention.to_string()),
            (
                "export_dir",
                self.export_dir
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "(current directory)".into()),
            ),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
        ]
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .parse::<usize>()
        .map_err(|_| ConfigError::Invalid(format!("{} must be a positive integer", key)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::Invalid(format!("{} must be true or false", key))),
    }
}

/// Loads and saves `config/config.json` under the data directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("json.{}", TMP_SUFFIX));
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
