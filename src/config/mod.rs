use chrono::{
    format::{Item, StrftimeItems},
    NaiveDate,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use crate::core::{
    errors::TrackerError,
    utils::{ensure_dir, write_atomic, PathResolver},
};

/// Keys accepted by [`ConfigManager::set`].
pub const CONFIG_KEYS: [&str; 4] = ["currency_symbol", "date_format", "export_dir", "data_dir"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_currency_symbol() -> String {
    "$".into()
}

fn default_date_format() -> String {
    "%b %d, %Y".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            date_format: default_date_format(),
            export_dir: None,
            data_dir: None,
        }
    }
}

/// Formats `date` with a strftime `pattern`.
///
/// Returns `None` when the pattern does not parse or asks for fields a plain
/// date cannot supply (`%H`, `%T`, `%Z`, ...).
pub fn render_date(pattern: &str, date: NaiveDate) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    write!(out, "{}", date.format_with_items(items.iter())).ok()?;
    Some(out)
}

impl Config {
    /// Renders `date` with the configured format, or as `YYYY-MM-DD` when the
    /// stored format cannot render a date.
    pub fn format_date(&self, date: NaiveDate) -> String {
        render_date(&self.date_format, date).unwrap_or_else(|| date.format("%Y-%m-%d").to_string())
    }

    /// Renders `amount` with the configured symbol and two decimals.
    pub fn format_amount(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.currency_symbol, amount.abs())
        } else {
            format!("{}{:.2}", self.currency_symbol, amount)
        }
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, TrackerError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, TrackerError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, TrackerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, TrackerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| TrackerError::Config(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), TrackerError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    /// Updates one setting in `config`. An empty value clears optional paths.
    pub fn set(config: &mut Config, key: &str, value: &str) -> Result<(), TrackerError> {
        let value = value.trim();
        match key {
            "currency_symbol" => config.currency_symbol = value.to_string(),
            "date_format" => {
                if value.is_empty() {
                    return Err(TrackerError::Config("date_format cannot be empty".into()));
                }
                let sample = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap_or_default();
                if render_date(value, sample).is_none() {
                    return Err(TrackerError::Config(format!(
                        "`{}` is not a valid date format",
                        value
                    )));
                }
                config.date_format = value.to_string();
            }
            "export_dir" => config.export_dir = optional_path(value),
            "data_dir" => config.data_dir = optional_path(value),
            other => {
                return Err(TrackerError::Config(format!(
                    "unknown setting `{}` (known: {})",
                    other,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Directory the shell's store lives in.
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config
            .data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(&self.base))
    }

    /// Directory exports are written to when no explicit target is given.
    pub fn export_dir(&self, config: &Config) -> PathBuf {
        config
            .export_dir
            .clone()
            .unwrap_or_else(|| PathResolver::export_dir_in(&self.base))
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        ConfigManager::set(&mut config, "currency_symbol", "€").unwrap();
        ConfigManager::set(&mut config, "export_dir", "/tmp/out").unwrap();
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = Config::default();
        let err = ConfigManager::set(&mut config, "theme", "dark").unwrap_err();
        assert!(matches!(err, TrackerError::Config(ref message) if message.contains("theme")));
    }

    #[test]
    fn invalid_date_format_is_rejected() {
        let mut config = Config::default();
        assert!(ConfigManager::set(&mut config, "date_format", "%Y/%Q").is_err());
        ConfigManager::set(&mut config, "date_format", "%d.%m.%Y").unwrap();
        assert_eq!(config.date_format, "%d.%m.%Y");
    }

    #[test]
    fn time_fields_are_rejected_as_date_format() {
        let mut config = Config::default();
        for pattern in ["%H:%M", "%T", "%Z"] {
            let err = ConfigManager::set(&mut config, "date_format", pattern).unwrap_err();
            assert!(matches!(err, TrackerError::Config(_)), "{pattern}");
        }
        assert_eq!(config.date_format, "%b %d, %Y");
    }

    #[test]
    fn stored_unrenderable_format_falls_back_to_iso() {
        let config = Config {
            date_format: "%H:%M".into(),
            ..Config::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(config.format_date(date), "2024-01-05");
        assert_eq!(Config::default().format_date(date), "Jan 05, 2024");
    }

    #[test]
    fn default_dirs_live_under_base() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config::default();
        assert_eq!(manager.data_dir(&config), temp.path().join("data"));
        assert_eq!(manager.export_dir(&config), temp.path().join("exports"));
    }

    #[test]
    fn amounts_render_with_symbol() {
        let config = Config::default();
        assert_eq!(config.format_amount(12.5), "$12.50");
        assert_eq!(config.format_amount(-3.0), "-$3.00");
    }
}
