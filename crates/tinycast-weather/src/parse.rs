//! Tolerant parsing of provider responses.
//!
//! Field names have moved around between provider API revisions, so every
//! value is looked up under each shape we have seen, in order. Nothing here
//! fails on a missing or malformed field; numbers fall back through
//! [`crate::units`] and timestamps fall back to positions relative to `now`.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde_json::Value;

use crate::types::{CurrentConditions, DailyForecast, HourlyForecast, WeatherCondition};
use crate::units::{coerce_converted, coerce_number, coerce_or_default, Field};

fn at<'a>(value: &'a Value, pointer: &str) -> Option<&'a Value> {
    value.pointer(pointer).filter(|v| !v.is_null())
}

fn condition_at(value: &Value, pointers: &[&str]) -> WeatherCondition {
    pointers
        .iter()
        .find_map(|p| at(value, p).and_then(Value::as_str))
        .map(WeatherCondition::from_provider_text)
        .unwrap_or_default()
}

fn timestamp_at(value: &Value, pointers: &[&str]) -> Option<DateTime<Utc>> {
    pointers
        .iter()
        .filter_map(|p| at(value, p).and_then(Value::as_str))
        .find_map(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn list_at<'a>(value: &'a Value, pointers: &[&str]) -> &'a [Value] {
    pointers
        .iter()
        .find_map(|p| at(value, p).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn parse_current(body: &Value, now: DateTime<Utc>) -> CurrentConditions {
    let temperature = coerce_or_default(
        Field::Temperature,
        &[at(body, "/temperature"), at(body, "/temp")],
    );
    let feels_like = coerce_converted(
        Field::Temperature,
        &[at(body, "/feelsLikeTemperature"), at(body, "/feelsLike")],
    )
    .unwrap_or(temperature);

    CurrentConditions {
        temperature,
        feels_like,
        humidity: coerce_or_default(
            Field::Humidity,
            &[at(body, "/relativeHumidity"), at(body, "/humidity")],
        ),
        wind_speed: coerce_or_default(
            Field::WindSpeed,
            &[at(body, "/wind/speed"), at(body, "/windSpeed")],
        ),
        uv_index: coerce_or_default(Field::UvIndex, &[at(body, "/uvIndex"), at(body, "/uv")]),
        precipitation_probability: coerce_or_default(
            Field::PrecipitationProbability,
            &[
                at(body, "/precipitation/probability"),
                at(body, "/precipitationProbability"),
            ],
        ),
        condition: condition_at(
            body,
            &[
                "/weatherCondition/description/text",
                "/weatherCondition/type",
                "/condition",
            ],
        ),
        observed_at: timestamp_at(body, &["/currentTime", "/time"]).unwrap_or(now),
    }
}

pub fn parse_hourly(body: &Value, now: DateTime<Utc>) -> Vec<HourlyForecast> {
    let mut hours: Vec<HourlyForecast> = list_at(body, &["/forecastHours", "/hours"])
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let time = timestamp_at(entry, &["/interval/startTime", "/time"])
                .unwrap_or_else(|| now + Duration::hours(i as i64));
            let hour = at(entry, "/displayDateTime/hours")
                .and_then(coerce_number)
                .map(|h| h as u32 % 24)
                .unwrap_or_else(|| time.hour());
            let temperature = coerce_or_default(
                Field::Temperature,
                &[at(entry, "/temperature"), at(entry, "/temp")],
            );

            HourlyForecast {
                time,
                hour,
                temperature,
                feels_like: coerce_converted(
                    Field::Temperature,
                    &[at(entry, "/feelsLikeTemperature"), at(entry, "/feelsLike")],
                )
                .unwrap_or(temperature),
                humidity: coerce_or_default(
                    Field::Humidity,
                    &[at(entry, "/relativeHumidity"), at(entry, "/humidity")],
                ),
                wind_speed: coerce_or_default(
                    Field::WindSpeed,
                    &[at(entry, "/wind/speed"), at(entry, "/windSpeed")],
                ),
                uv_index: coerce_or_default(
                    Field::UvIndex,
                    &[at(entry, "/uvIndex"), at(entry, "/uv")],
                ),
                precipitation_probability: coerce_or_default(
                    Field::PrecipitationProbability,
                    &[
                        at(entry, "/precipitation/probability"),
                        at(entry, "/precipitationProbability"),
                    ],
                ),
                condition: condition_at(
                    entry,
                    &[
                        "/weatherCondition/description/text",
                        "/weatherCondition/type",
                        "/condition",
                    ],
                ),
            }
        })
        .collect();

    hours.sort_by_key(|h| h.time);
    hours
}

fn date_of(entry: &Value) -> Option<NaiveDate> {
    if let Some(display) = at(entry, "/displayDate") {
        let part = |key: &str| display.get(key).and_then(coerce_number);
        if let (Some(y), Some(m), Some(d)) = (part("year"), part("month"), part("day")) {
            return NaiveDate::from_ymd_opt(y as i32, m as u32, d as u32);
        }
    }
    at(entry, "/date")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

pub fn parse_daily(body: &Value, now: DateTime<Utc>) -> Vec<DailyForecast> {
    let today = now.date_naive();

    let mut days: Vec<DailyForecast> = list_at(body, &["/forecastDays", "/days"])
        .iter()
        .enumerate()
        .map(|(i, entry)| DailyForecast {
            date: date_of(entry).unwrap_or_else(|| today + Duration::days(i as i64)),
            high: coerce_or_default(
                Field::Temperature,
                &[at(entry, "/maxTemperature"), at(entry, "/high")],
            ),
            low: coerce_or_default(
                Field::Temperature,
                &[at(entry, "/minTemperature"), at(entry, "/low")],
            ),
            precipitation_probability: coerce_or_default(
                Field::PrecipitationProbability,
                &[
                    at(entry, "/daytimeForecast/precipitation/probability"),
                    at(entry, "/precipitationProbability"),
                ],
            ),
            uv_index: coerce_or_default(
                Field::UvIndex,
                &[at(entry, "/daytimeForecast/uvIndex"), at(entry, "/uvIndex")],
            ),
            humidity: coerce_or_default(
                Field::Humidity,
                &[
                    at(entry, "/daytimeForecast/relativeHumidity"),
                    at(entry, "/humidity"),
                ],
            ),
            wind_speed: coerce_or_default(
                Field::WindSpeed,
                &[at(entry, "/daytimeForecast/wind/speed"), at(entry, "/windSpeed")],
            ),
            condition: condition_at(
                entry,
                &[
                    "/daytimeForecast/weatherCondition/description/text",
                    "/daytimeForecast/weatherCondition/type",
                    "/condition",
                ],
            ),
        })
        .collect();

    days.sort_by_key(|d| d.date);
    days
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 7, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_current_nested_shape() {
        let body = json!({
            "currentTime": "2026-05-07T13:55:00Z",
            "weatherCondition": {"description": {"text": "Light rain"}, "type": "LIGHT_RAIN"},
            "temperature": {"degrees": 20.0, "unit": "CELSIUS"},
            "feelsLikeTemperature": {"degrees": 18.5},
            "relativeHumidity": 81,
            "uvIndex": 2,
            "precipitation": {"probability": {"percent": 65, "type": "RAIN"}},
            "wind": {"speed": {"value": 4.47, "unit": "METERS_PER_SECOND"}}
        });

        let current = parse_current(&body, now());
        assert_eq!(current.temperature, 68.0);
        assert_eq!(current.feels_like, 65.0);
        assert_eq!(current.humidity, 81.0);
        assert_eq!(current.wind_speed, 10.0);
        assert_eq!(current.uv_index, 2.0);
        assert_eq!(current.precipitation_probability, 65.0);
        assert_eq!(current.condition, WeatherCondition::LightRain);
        assert_eq!(current.observed_at, Utc.with_ymd_and_hms(2026, 5, 7, 13, 55, 0).unwrap());
    }

    #[test]
    fn test_current_flat_shape() {
        let body = json!({
            "temp": "15",
            "humidity": "40",
            "windSpeed": 2,
            "precipitationProbability": 10,
            "condition": "Sunny"
        });

        let current = parse_current(&body, now());
        assert_eq!(current.temperature, 59.0);
        assert_eq!(current.feels_like, 59.0);
        assert_eq!(current.humidity, 40.0);
        assert_eq!(current.wind_speed, 4.0);
        assert_eq!(current.condition, WeatherCondition::Sunny);
        assert_eq!(current.observed_at, now());
    }

    #[test]
    fn test_current_empty_payload_uses_defaults() {
        let current = parse_current(&json!({}), now());
        assert_eq!(current.temperature, 70.0);
        assert_eq!(current.feels_like, 70.0);
        assert_eq!(current.humidity, 50.0);
        assert_eq!(current.wind_speed, 0.0);
        assert_eq!(current.uv_index, 0.0);
        assert_eq!(current.precipitation_probability, 0.0);
        assert_eq!(current.condition, WeatherCondition::PartlyCloudy);
    }

    #[test]
    fn test_hourly_sorted_with_local_hour() {
        let body = json!({
            "forecastHours": [
                {
                    "interval": {"startTime": "2026-05-07T16:00:00Z"},
                    "displayDateTime": {"hours": 9},
                    "temperature": {"degrees": 16}
                },
                {
                    "interval": {"startTime": "2026-05-07T15:00:00Z"},
                    "displayDateTime": {"hours": 8},
                    "temperature": {"degrees": 15},
                    "uvIndex": null
                }
            ]
        });

        let hours = parse_hourly(&body, now());
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].hour, 8);
        assert_eq!(hours[1].hour, 9);
        assert_eq!(hours[0].temperature, 59.0);
        assert_eq!(hours[0].uv_index, 0.0);
    }

    #[test]
    fn test_hourly_missing_times_are_spaced_from_now() {
        let body = json!({"hours": [{"temp": 10}, {"temp": 11}, {"temp": 12}]});
        let hours = parse_hourly(&body, now());
        assert_eq!(hours.len(), 3);
        assert_eq!(hours[2].time, now() + Duration::hours(2));
        assert_eq!(hours[2].hour, 16);
    }

    #[test]
    fn test_hourly_missing_list_is_empty() {
        assert!(parse_hourly(&json!({"unexpected": true}), now()).is_empty());
    }

    #[test]
    fn test_daily_shapes() {
        let body = json!({
            "forecastDays": [
                {
                    "displayDate": {"year": 2026, "month": 5, "day": 8},
                    "maxTemperature": {"degrees": 25},
                    "minTemperature": {"degrees": 12},
                    "daytimeForecast": {
                        "precipitation": {"probability": {"percent": 20}},
                        "uvIndex": 7,
                        "relativeHumidity": 55,
                        "wind": {"speed": {"value": 3}},
                        "weatherCondition": {"description": {"text": "Mostly sunny"}}
                    }
                },
                {"date": "2026-05-07", "high": 20, "low": 10, "condition": "Rain"}
            ]
        });

        let days = parse_daily(&body, now());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 5, 7).unwrap());
        assert_eq!(days[0].condition, WeatherCondition::Rain);
        assert_eq!(days[1].high, 77.0);
        assert_eq!(days[1].low, 54.0);
        assert_eq!(days[1].precipitation_probability, 20.0);
        assert_eq!(days[1].uv_index, 7.0);
        assert_eq!(days[1].wind_speed, 7.0);
        assert_eq!(days[1].condition, WeatherCondition::Sunny);
    }
}
