//! Retry utilities for provider requests with linear backoff.
//!
//! The n-th retry waits `base_delay * n`, so with the defaults a request is
//! tried at t=0, t=1s and t=3s before the last error is handed back.
//!
//! Only errors that report themselves as retryable are retried; parse
//! failures and missing credentials surface immediately.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tinycast_core::RetrySettings;

use crate::types::WeatherError;

/// Default retry configuration
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// How often and how patiently to retry a fallible operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay unit between attempts
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self::new(settings.max_attempts, settings.base_delay_ms)
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    /// Delay to wait after the given (1-based) failed attempt
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Errors that know whether another attempt could succeed
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for WeatherError {
    fn is_retryable(&self) -> bool {
        WeatherError::is_retryable(self)
    }
}

/// Run `operation` until it succeeds, fails permanently, or the policy's
/// attempts are used up. The error from the final attempt is returned.
///
/// # Example
/// ```ignore
/// let body = with_retry(&RetryPolicy::default(), || provider.post_once(url, &payload)).await?;
/// ```
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("Request succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => {
                tracing::debug!("Non-retryable error: {}", e);
                return Err(e);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::error!("All {} attempts exhausted: {}", max_attempts, e);
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    "Attempt {} of {} failed: {}; retrying in {:?}",
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
