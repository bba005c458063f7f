use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    core::utils::{ensure_dir, is_valid_date_format, PathResolver},
    errors::{ExpenseError, Result},
    storage::json_backend::{tmp_path, write_atomic},
};

/// Environment variable selecting the classifier endpoint.
pub const ENVIRONMENT_VAR: &str = "EXPENSE_CORE_ENV";

const PRODUCTION_ENDPOINT: &str = "https://expense-classifier-api.onrender.com/predict";
const DEVELOPMENT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";

/// Deployment environment; decides which classifier endpoint is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    pub fn from_env() -> Self {
        env::var(ENVIRONMENT_VAR)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    /// `production`/`prod` select production; anything else is development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn classifier_endpoint(self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_ENDPOINT,
            Environment::Development => DEVELOPMENT_ENDPOINT,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => f.write_str("production"),
            Environment::Development => f.write_str("development"),
        }
    }
}

/// User preferences persisted as `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub recent_limit: usize,
    pub date_format: String,
    pub request_timeout_secs: u64,
    pub category_assist: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".into(),
            recent_limit: 5,
            date_format: "%Y-%m-%d".into(),
            request_timeout_secs: 10,
            category_assist: true,
            export_dir: None,
        }
    }
}

impl Config {
    pub const KEYS: &'static [&'static str] = &[
        "currency_symbol",
        "recent_limit",
        "date_format",
        "request_timeout_secs",
        "category_assist",
        "export_dir",
    ];

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Updates a single preference from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "recent_limit" => self.recent_limit = parse_number(key, value)?,
            "date_format" => {
                if value.trim().is_empty() || !is_valid_date_format(value) {
                    return Err(ExpenseError::Config(format!(
                        "`{}` is not a valid date format",
                        value
                    )));
                }
                self.date_format = value.to_string();
            }
            "request_timeout_secs" => self.request_timeout_secs = parse_number(key, value)?,
            "category_assist" => self.category_assist = parse_flag(value)?,
            "export_dir" => {
                self.export_dir = if value.trim().is_empty() || value == "none" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            other => {
                return Err(ExpenseError::Config(format!(
                    "unknown setting `{}` (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Returns `(key, value)` pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency_symbol", self.currency_symbol.clone()),
            ("recent_limit", self.recent_limit.to_string()),
            ("date_format", self.date_format.clone()),
            ("request_timeout_secs", self.request_timeout_secs.to_string()),
            ("category_assist", self.category_assist.to_string()),
            (
                "export_dir",
                self.export_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "(current directory)".into()),
            ),
        ]
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ExpenseError::Config(format!("`{}` expects a whole number", key)))
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(ExpenseError::Config(format!(
            "expected on/off, got `{}`",
            other
        ))),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    /// An unusable `date_format` is replaced by the default.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let mut config: Config = serde_json::from_str(&data).map_err(|err| {
            ExpenseError::Config(format!("{}: {}", self.path.display(), err))
        })?;
        if config.date_format.trim().is_empty() || !is_valid_date_format(&config.date_format) {
            let fallback = Config::default().date_format;
            warn!(
                date_format = %config.date_format,
                fallback = %fallback,
                "invalid date format in config, using default"
            );
            config.date_format = fallback;
        }
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
