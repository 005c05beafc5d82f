//! Weather provider client.
//!
//! Three lookup endpoints are hit with a POST each. `fetch_all_weather`
//! issues them concurrently and only caches the bundle when all three
//! succeed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use reqwest::Client;
use serde_json::{json, Value};
use tinycast_core::Config;
use tracing::instrument;

use crate::cache::WeatherCache;
use crate::parse::{parse_current, parse_daily, parse_hourly};
use crate::retry::{with_retry, RetryPolicy};
use crate::types::{
    Coordinates, CurrentConditions, DailyForecast, HourlyForecast, WeatherData, WeatherError,
};

const CURRENT_ENDPOINT: &str = "currentConditions:lookup";
const HOURLY_ENDPOINT: &str = "forecast/hours:lookup";
const DAILY_ENDPOINT: &str = "forecast/days:lookup";

/// Everything the provider needs besides a cache.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub forecast_hours: u32,
    pub forecast_days: u32,
    pub cache_duration: chrono::Duration,
}

impl ProviderSettings {
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let api_key = config
            .provider
            .resolved_api_key()
            .ok_or(WeatherError::MissingApiKey)?;

        Ok(Self {
            base_url: config.provider.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(config.provider.timeout_secs),
            retry: RetryPolicy::from(&config.retry),
            forecast_hours: config.forecast.hours,
            forecast_days: config.forecast.days,
            cache_duration: chrono::Duration::minutes(i64::from(config.cache.duration_minutes)),
        })
    }
}

/// Cache behaviour for a single `fetch_all_weather` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Read from and write to the cache
    pub use_cache: bool,
    /// Skip the cache read but still refresh the cached copy
    pub force_refresh: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    settings: ProviderSettings,
    cache: Option<WeatherCache>,
    last_good: Arc<Mutex<Option<WeatherData>>>,
}

impl WeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            settings,
            cache: None,
            last_good: Arc::new(Mutex::new(None)),
        })
    }

    pub fn with_cache(mut self, cache: WeatherCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// The most recent payload returned by this provider, fresh or cached.
    pub fn last_known_good(&self) -> Option<WeatherData> {
        self.last_good.lock().clone()
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current_conditions(
        &self,
        location: Coordinates,
    ) -> Result<CurrentConditions, WeatherError> {
        let body = self
            .post_with_retry(CURRENT_ENDPOINT, request_body(location, None))
            .await?;
        Ok(parse_current(&body, Utc::now()))
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_hourly_forecast(
        &self,
        location: Coordinates,
        hours: u32,
    ) -> Result<Vec<HourlyForecast>, WeatherError> {
        let body = self
            .post_with_retry(HOURLY_ENDPOINT, request_body(location, Some(("hours", hours))))
            .await?;
        let mut forecast = parse_hourly(&body, Utc::now());
        forecast.truncate(hours as usize);
        Ok(forecast)
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_daily_forecast(
        &self,
        location: Coordinates,
        days: u32,
    ) -> Result<Vec<DailyForecast>, WeatherError> {
        let body = self
            .post_with_retry(DAILY_ENDPOINT, request_body(location, Some(("days", days))))
            .await?;
        let mut forecast = parse_daily(&body, Utc::now());
        forecast.truncate(days as usize);
        Ok(forecast)
    }

    /// Current conditions plus both forecasts, served from cache when fresh.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_all_weather(
        &self,
        location: Coordinates,
        options: FetchOptions,
    ) -> Result<WeatherData, WeatherError> {
        if options.use_cache && !options.force_refresh {
            if let Some(cached) = self.cache.as_ref().and_then(|c| c.load(Utc::now())) {
                tracing::debug!("Serving weather from cache (expires {})", cached.expires_at);
                *self.last_good.lock() = Some(cached.clone());
                return Ok(cached);
            }
        }

        tracing::info!(
            "Fetching weather for {:.4}, {:.4}",
            location.latitude,
            location.longitude
        );

        let (current, hourly, daily) = tokio::try_join!(
            self.fetch_current_conditions(location),
            self.fetch_hourly_forecast(location, self.settings.forecast_hours),
            self.fetch_daily_forecast(location, self.settings.forecast_days),
        )?;

        if hourly.is_empty() {
            return Err(WeatherError::Parse("hourly forecast is empty".to_string()));
        }
        if daily.is_empty() {
            return Err(WeatherError::Parse("daily forecast is empty".to_string()));
        }

        let fetched_at = Utc::now();
        let data = WeatherData {
            location,
            current,
            hourly,
            daily,
            fetched_at,
            expires_at: fetched_at + self.settings.cache_duration,
        };

        if options.use_cache {
            if let Some(cache) = &self.cache {
                if let Err(e) = cache.store(&data) {
                    tracing::warn!("Failed to cache weather data: {}", e);
                }
            }
        }

        *self.last_good.lock() = Some(data.clone());
        tracing::info!(
            "Fetched {} hourly and {} daily entries",
            data.hourly.len(),
            data.daily.len()
        );
        Ok(data)
    }

    /// Like `fetch_all_weather`, but falls back to the last payload this
    /// provider produced when the fetch fails.
    pub async fn fetch_or_last_known_good(
        &self,
        location: Coordinates,
        options: FetchOptions,
    ) -> Result<WeatherData, WeatherError> {
        match self.fetch_all_weather(location, options).await {
            Ok(data) => Ok(data),
            Err(e) => match self.last_known_good() {
                Some(stale) => {
                    tracing::warn!(
                        "Weather fetch failed ({}); using data fetched at {}",
                        e,
                        stale.fetched_at
                    );
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }

    async fn post_with_retry(&self, endpoint: &str, body: Value) -> Result<Value, WeatherError> {
        let url = format!("{}/{}", self.settings.base_url, endpoint);
        with_retry(&self.settings.retry, || self.post_once(&url, &body)).await
    }

    async fn post_once(&self, url: &str, body: &Value) -> Result<Value, WeatherError> {
        let response = self
            .client
            .post(url)
            .query(&[("key", self.settings.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

fn request_body(location: Coordinates, horizon: Option<(&str, u32)>) -> Value {
    let mut body = json!({
        "location": {
            "latitude": location.latitude,
            "longitude": location.longitude,
        },
        "unitsSystem": "METRIC",
    });
    if let Some((key, count)) = horizon {
        body[key] = json!(count);
    }
    body
}
