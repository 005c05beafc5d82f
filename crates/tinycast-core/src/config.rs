use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::thresholds::Thresholds;

/// Environment variable that overrides `provider.api_key`.
pub const API_KEY_ENV: &str = "TINYCAST_WEATHER_API_KEY";

const DEFAULT_PROVIDER_URL: &str = "https://weather.googleapis.com/v1";

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
    /// Application configuration directory
    pub config_dir: PathBuf,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub display: DisplayConfig,

    /// Children the briefing is prepared for
    #[serde(default)]
    pub children: Vec<ChildConfig>,

    /// Scoring bands and weights
    #[serde(default)]
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Weather API key (can also be set via `TINYCAST_WEATHER_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the weather provider
    #[serde(default = "default_provider_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_url() -> String {
    DEFAULT_PROVIDER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_provider_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// API key from the environment, falling back to the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Seattle, WA
        Self {
            latitude: 47.6062,
            longitude: -122.3321,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_forecast_hours")]
    pub hours: u32,
    #[serde(default = "default_forecast_days")]
    pub days: u32,
}

fn default_forecast_hours() -> u32 {
    12
}

fn default_forecast_days() -> u32 {
    7
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            hours: default_forecast_hours(),
            days: default_forecast_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Logical key of the single weather slot
    #[serde(default = "default_cache_key")]
    pub key: String,
    #[serde(default = "default_cache_minutes")]
    pub duration_minutes: u32,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_key() -> String {
    "weather_data".to_string()
}

fn default_cache_minutes() -> u32 {
    30
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            key: default_cache_key(),
            duration_minutes: default_cache_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts per request, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay unit; the n-th retry waits `n * base_delay_ms`
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    /// Convert an internal Fahrenheit value into this unit.
    pub fn convert(&self, fahrenheit: f64) -> f64 {
        match self {
            Self::Fahrenheit => fahrenheit,
            Self::Celsius => (fahrenheit - 32.0) * 5.0 / 9.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Fahrenheit => "°F",
            Self::Celsius => "°C",
        }
    }

    /// Format an internal Fahrenheit value, e.g. `68°F` or `20°C`.
    pub fn format(&self, fahrenheit: f64) -> String {
        format!("{:.0}{}", self.convert(fahrenheit), self.symbol())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildConfig {
    pub name: String,
    pub age_months: u32,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tinycast");

        Self {
            config_dir,
            provider: ProviderConfig::default(),
            location: LocationConfig::default(),
            forecast: ForecastConfig::default(),
            cache: CacheConfig::default(),
            retry: RetrySettings::default(),
            display: DisplayConfig::default(),
            children: Vec::new(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating it if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.provider.base_url, "provider.base_url", &mut result);

        if self.provider.resolved_api_key().is_none() {
            result.add_warning(
                "provider.api_key",
                format!("No API key configured (set {})", API_KEY_ENV),
            );
        }

        if !(-90.0..=90.0).contains(&self.location.latitude) {
            result.add_error("location.latitude", "Latitude must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            result.add_error(
                "location.longitude",
                "Longitude must be between -180 and 180",
            );
        }

        if self.forecast.hours == 0 {
            result.add_error("forecast.hours", "Hourly horizon must be greater than 0");
        } else if self.forecast.hours > 240 {
            result.add_warning("forecast.hours", "Hourly horizon is more than 10 days");
        }
        if self.forecast.days == 0 {
            result.add_error("forecast.days", "Daily horizon must be greater than 0");
        }

        if self.cache.enabled && self.cache.duration_minutes == 0 {
            result.add_warning(
                "cache.duration_minutes",
                "Cache enabled with a 0 minute duration; every read will miss",
            );
        }
        if self.cache.key.trim().is_empty() {
            result.add_error("cache.key", "Cache key cannot be empty");
        }

        if self.retry.max_attempts == 0 {
            result.add_error("retry.max_attempts", "At least one attempt is required");
        }

        for (i, child) in self.children.iter().enumerate() {
            if child.name.trim().is_empty() {
                result.add_error(format!("children[{}].name", i), "Name cannot be empty");
            }
        }

        self.validate_thresholds(&mut result);

        result
    }

    fn validate_thresholds(&self, result: &mut ValidationResult) {
        let t = &self.thresholds;

        let total = t.weights.total();
        if (total - 1.0).abs() > 0.001 {
            result.add_error(
                "thresholds.weights",
                format!("Scoring weights must sum to 1.0, got {:.3}", total),
            );
        }

        let temps = &t.temperature;
        let ordered = temps.too_cold_for_playground <= temps.too_cold
            && temps.too_cold <= temps.ideal_min
            && temps.ideal_min <= temps.ideal_max
            && temps.ideal_max <= temps.hot
            && temps.hot <= temps.very_hot;
        if !ordered {
            result.add_error(
                "thresholds.temperature",
                "Temperature bands must be in ascending order",
            );
        }

        let q = &t.quality;
        if !(q.perfect > q.good && q.good > q.fair) || q.perfect > 100 {
            result.add_error(
                "thresholds.quality",
                "Quality cutoffs must satisfy 100 >= perfect > good > fair",
            );
        }

        for (field, scale) in [
            ("thresholds.rain.scale", &t.rain.scale),
            ("thresholds.uv.scale", &t.uv.scale),
            ("thresholds.wind.scale", &t.wind.scale),
        ] {
            if !scale.is_monotone_decreasing() {
                result.add_error(field, "Step scale must be ascending and non-increasing");
            }
        }

        if t.humidity.comfortable_min > t.humidity.comfortable_max {
            result.add_error(
                "thresholds.humidity",
                "Comfortable humidity band is inverted",
            );
        }

        if t.activity.start_hour > t.activity.end_hour || t.activity.end_hour > 23 {
            result.add_error(
                "thresholds.activity",
                "Activity hours must satisfy start <= end <= 23",
            );
        }
    }

    /// Validate a URL field
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
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("tinycast");

        Ok(config_dir.join("config.toml"))
    }
}
