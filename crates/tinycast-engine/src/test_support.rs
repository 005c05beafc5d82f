//! Forecast builders shared by the analyzer tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tinycast_weather::{
    Coordinates, CurrentConditions, DailyForecast, HourlyForecast, WeatherCondition, WeatherData,
};

/// Midnight UTC on Thursday 2026-05-07. Hours are treated as local.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 7, 0, 0, 0).unwrap()
}

pub fn at_hour(hour: u32) -> DateTime<Utc> {
    base_time() + Duration::hours(i64::from(hour))
}

/// A calm, dry, low-UV hour at the given temperature.
pub fn hour(hour: u32, temperature: f64) -> HourlyForecast {
    HourlyForecast {
        time: at_hour(hour),
        hour,
        temperature,
        feels_like: temperature,
        humidity: 50.0,
        wind_speed: 3.0,
        uv_index: 2.0,
        precipitation_probability: 0.0,
        condition: WeatherCondition::Sunny,
    }
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

pub fn day(date: NaiveDate, high: f64, low: f64) -> DailyForecast {
    DailyForecast {
        date,
        high,
        low,
        precipitation_probability: 0.0,
        uv_index: 3.0,
        humidity: 50.0,
        wind_speed: 5.0,
        condition: WeatherCondition::Sunny,
    }
}

pub fn current(temperature: f64) -> CurrentConditions {
    CurrentConditions {
        temperature,
        feels_like: temperature,
        humidity: 50.0,
        wind_speed: 3.0,
        uv_index: 2.0,
        precipitation_probability: 0.0,
        condition: WeatherCondition::Sunny,
        observed_at: base_time(),
    }
}

/// Weather whose current conditions mirror the first hour (68°F if none).
pub fn weather_with_hours(hourly: Vec<HourlyForecast>) -> WeatherData {
    let temperature = hourly.first().map_or(68.0, |h| h.temperature);
    WeatherData {
        location: Coordinates::new(47.6062, -122.3321),
        current: current(temperature),
        hourly,
        daily: vec![day(date(5, 7), 72.0, 55.0)],
        fetched_at: base_time(),
        expires_at: base_time() + Duration::minutes(30),
    }
}

/// Flat forecast from 6am to 6pm at one temperature.
pub fn flat_day(temperature: f64) -> WeatherData {
    weather_with_hours((6..=18).map(|h| hour(h, temperature)).collect())
}
