//! Weather acquisition for TinyCast
//!
//! Fetches current conditions plus hourly and daily forecasts, converts them
//! to Fahrenheit/mph, and keeps a time-boxed cache behind an injectable store.

pub mod cache;
pub mod parse;
pub mod provider;
pub mod retry;
pub mod types;
pub mod units;

pub use cache::{CacheStore, FileStore, MemoryStore, WeatherCache};
pub use provider::{FetchOptions, ProviderSettings, WeatherProvider};
pub use retry::{with_retry, RetryPolicy, Retryable};
pub use types::*;
