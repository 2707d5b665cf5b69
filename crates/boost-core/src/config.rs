use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that supplies the weather API key.
pub const WEATHER_API_KEY_ENV: &str = "DAILY_BOOST_WEATHER_API_KEY";

const PLACEHOLDER_API_KEY: &str = "YOUR_OPENWEATHER_API_KEY";
const APP_DIR_NAME: &str = "daily-boost";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the persisted task list and last city
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Quote provider settings
    #[serde(default)]
    pub quotes: QuotesConfig,

    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    /// Create at: https://home.openweathermap.org/api_keys
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Current-weather endpoint
    #[serde(default = "default_weather_url")]
    pub base_url: String,
}

impl WeatherConfig {
    /// Check if the API key is set (not empty, not a placeholder)
    pub fn is_configured(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && !key.starts_with("YOUR_")
    }

    /// Use `env_key` in place of a missing or placeholder key.
    ///
    /// The result only lives in memory; a key from the file always wins.
    pub fn apply_env_key(&mut self, env_key: Option<String>) {
        if self.is_configured() {
            return;
        }
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key;
        }
    }
}

fn default_api_key() -> String {
    PLACEHOLDER_API_KEY.to_string()
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_weather_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotesConfig {
    /// Primary quote source (ZenQuotes)
    #[serde(default = "default_primary_quote_url")]
    pub primary_url: String,

    /// Fallback quote source (Quotable)
    #[serde(default = "default_fallback_quote_url")]
    pub fallback_url: String,
}

fn default_primary_quote_url() -> String {
    "https://zenquotes.io/api/today".to_string()
}

fn default_fallback_quote_url() -> String {
    "https://api.quotable.io/random".to_string()
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            primary_url: default_primary_quote_url(),
            fallback_url: default_fallback_quote_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            weather: WeatherConfig::default(),
            quotes: QuotesConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let mut config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            config
                .weather
                .apply_env_key(std::env::var(WEATHER_API_KEY_ENV).ok());
            return Ok(config);
        }

        Self::load_from(&config_path).context("Failed to load config file")
    }

    /// Load configuration from an explicit file.
    ///
    /// The API key environment variable overrides a placeholder key from the file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;

        let mut config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config
            .weather
            .apply_env_key(std::env::var(WEATHER_API_KEY_ENV).ok());

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);
        self.validate_url(&self.quotes.primary_url, "quotes.primary_url", &mut result);
        self.validate_url(&self.quotes.fallback_url, "quotes.fallback_url", &mut result);

        if self.http.timeout_secs == 0 {
            result.add_error("http.timeout_secs", "Timeout must be greater than 0");
        } else if self.http.timeout_secs > 300 {
            result.add_warning(
                "http.timeout_secs",
                "Timeout is unusually long (>300 seconds)",
            );
        }

        // The session falls back to in-memory storage
        if self.data_dir.exists() && !self.data_dir.is_dir() {
            result.add_warning(
                "data_dir",
                format!(
                    "Path is not a directory, changes will not be saved: {}",
                    self.data_dir.display()
                ),
            );
        }

        // Weather still works as a panel without a key; it just shows a reminder
        if !self.weather.is_configured() {
            result.add_warning(
                "weather.api_key",
                format!(
                    "OpenWeatherMap API key not configured - set it in the config file or {}",
                    WEATHER_API_KEY_ENV
                ),
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to the given file, creating parent directories
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir.join("config.toml"))
    }
}
