//! Shared foundation for TinyCast: configuration, error taxonomy, logging
//! setup and the threshold catalog every analyzer reads from.

pub mod config;
pub mod error;
pub mod thresholds;

pub use config::{
    CacheConfig, ChildConfig, Config, DisplayConfig, ForecastConfig, LocationConfig,
    ProviderConfig, RetrySettings, TemperatureUnit, ValidationResult,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};
pub use thresholds::{AgeGroup, Thresholds};

use anyhow::Result;

/// Initialize tracing for the process
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("TinyCast core initialized");
    Ok(())
}
