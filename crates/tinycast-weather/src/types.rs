use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tinycast_core::{AppError, ConfigError, NetworkError, ReqwestErrorExt};

/// Normalized weather condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    Thunderstorm,
    HeavyRain,
    LightRain,
    Rain,
    Snow,
    Sleet,
    Hail,
    Fog,
    Overcast,
    #[default]
    PartlyCloudy,
    Cloudy,
    MostlyClear,
    Clear,
    Sunny,
}

impl WeatherCondition {
    /// Normalize a provider condition string.
    ///
    /// Rules are checked in order and the first match wins, so more specific
    /// conditions must stay ahead of general ones ("heavy rain" before
    /// "rain", "partly cloudy" before "cloudy"). Unknown text maps to
    /// `PartlyCloudy`.
    pub fn from_provider_text(text: &str) -> Self {
        let text = text.to_lowercase().replace(['_', '-'], " ");
        let has = |needle: &str| text.contains(needle);

        if has("thunder") || has("tstorm") {
            Self::Thunderstorm
        } else if has("heavy") && (has("rain") || has("shower")) {
            Self::HeavyRain
        } else if has("rain") || has("drizzle") || has("shower") {
            if has("light") || has("drizzle") {
                Self::LightRain
            } else {
                Self::Rain
            }
        } else if has("snow") || has("flurr") {
            Self::Snow
        } else if has("sleet") || has("ice") {
            Self::Sleet
        } else if has("hail") {
            Self::Hail
        } else if has("fog") || has("mist") || has("haze") {
            Self::Fog
        } else if has("overcast") {
            Self::Overcast
        } else if has("cloud") {
            if has("partly") {
                Self::PartlyCloudy
            } else {
                Self::Cloudy
            }
        } else if has("clear") {
            if has("mostly") {
                Self::MostlyClear
            } else {
                Self::Clear
            }
        } else if has("sunny") || has("fair") {
            Self::Sunny
        } else {
            Self::PartlyCloudy
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::HeavyRain => "Heavy Rain",
            Self::LightRain => "Light Rain",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Hail => "Hail",
            Self::Fog => "Fog",
            Self::Overcast => "Overcast",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::MostlyClear => "Mostly Clear",
            Self::Clear => "Clear",
            Self::Sunny => "Sunny",
        }
    }

    /// Liquid precipitation is falling.
    pub fn is_rainy(&self) -> bool {
        matches!(
            self,
            Self::Thunderstorm | Self::HeavyRain | Self::LightRain | Self::Rain
        )
    }

    /// Ground is likely to be icy.
    pub fn is_icy(&self) -> bool {
        matches!(self, Self::Snow | Self::Sleet | Self::Hail)
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub uv_index: f64,
    pub precipitation_probability: f64,
    pub condition: WeatherCondition,
    pub observed_at: DateTime<Utc>,
}

/// Hourly forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: DateTime<Utc>,
    /// Local hour of day (0-23) at the forecast location
    pub hour: u32,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub uv_index: f64,
    pub precipitation_probability: f64,
    pub condition: WeatherCondition,
}

/// Daily forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub precipitation_probability: f64,
    pub uv_index: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub condition: WeatherCondition,
}

/// Complete weather data bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub location: Coordinates,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl WeatherData {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Highest precipitation probability across the hourly horizon.
    pub fn max_precipitation_probability(&self) -> f64 {
        self.hourly
            .iter()
            .map(|h| h.precipitation_probability)
            .fold(self.current.precipitation_probability, f64::max)
    }

    /// Highest UV index across current conditions and the hourly horizon.
    pub fn max_uv_index(&self) -> f64 {
        self.hourly
            .iter()
            .map(|h| h.uv_index)
            .fold(self.current.uv_index, f64::max)
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("No weather API key configured")]
    MissingApiKey,
}

impl WeatherError {
    /// Transport failures and non-2xx responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) if e.is_timeout() => "The request timed out. Please try again.",
            Self::Network(_) => "Unable to reach the weather service. Check your connection.",
            Self::Status { status, .. } if *status == 401 || *status == 403 => {
                "Weather API key is invalid. Check settings."
            }
            Self::Status { status, .. } if *status >= 500 => {
                "The weather service is having trouble. Please try again later."
            }
            Self::Status { .. } => "The weather request failed. Please try again.",
            Self::Parse(_) => "Received an unexpected weather response.",
            Self::Cache(_) => "Weather data may be outdated.",
            Self::MissingApiKey => {
                "No weather API key configured. Set TINYCAST_WEATHER_API_KEY or add it to config.toml."
            }
        }
    }
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Status { status, body } => AppError::Network(NetworkError::ServerError {
                status,
                message: body,
            }),
            WeatherError::Parse(msg) => AppError::Network(NetworkError::InvalidResponse(msg)),
            WeatherError::Cache(msg) => AppError::Cache(msg),
            WeatherError::MissingApiKey => AppError::Config(ConfigError::MissingSetting(
                "provider.api_key".to_string(),
            )),
        }
    }
}
