//! Unit conversion and the coerce-or-default policy for upstream numbers.
//!
//! The provider is asked for metric units; everything past this module is
//! Fahrenheit and mph. Any field that is missing or not numeric resolves to
//! the single default listed in [`Field::default_value`].

use serde_json::Value;

pub const MPS_TO_MPH: f64 = 2.237;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    (celsius * 9.0 / 5.0 + 32.0).round()
}

pub fn mps_to_mph(mps: f64) -> f64 {
    (mps * MPS_TO_MPH).round()
}

/// Numeric field read from a provider payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Temperature,
    WindSpeed,
    Humidity,
    UvIndex,
    PrecipitationProbability,
}

impl Field {
    /// Fallback in internal units (°F, mph, percent, index).
    pub fn default_value(self) -> f64 {
        match self {
            Self::Temperature => 70.0,
            Self::WindSpeed => 0.0,
            Self::Humidity => 50.0,
            Self::UvIndex => 0.0,
            Self::PrecipitationProbability => 0.0,
        }
    }

    /// Convert a raw metric reading into internal units.
    fn from_metric(self, raw: f64) -> f64 {
        match self {
            Self::Temperature => celsius_to_fahrenheit(raw),
            Self::WindSpeed => mps_to_mph(raw).max(0.0),
            Self::Humidity | Self::PrecipitationProbability => raw.clamp(0.0, 100.0),
            Self::UvIndex => raw.max(0.0),
        }
    }
}

/// Keys under which providers have wrapped a bare number.
const WRAPPER_KEYS: [&str; 5] = ["degrees", "value", "percent", "probability", "amount"];

/// Read a number from any of the shapes seen upstream: a JSON number, a
/// numeric string, or an object wrapping one under a known key.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Object(map) => WRAPPER_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(coerce_number),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// First candidate that coerces, converted to internal units.
pub fn coerce_converted(field: Field, candidates: &[Option<&Value>]) -> Option<f64> {
    candidates
        .iter()
        .flatten()
        .find_map(|v| coerce_number(v))
        .map(|raw| field.from_metric(raw))
}

pub fn coerce_or_default(field: Field, candidates: &[Option<&Value>]) -> f64 {
    coerce_converted(field, candidates).unwrap_or_else(|| field.default_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_celsius_conversion_rounds() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(20.0), 68.0);
        assert_eq!(celsius_to_fahrenheit(21.3), 70.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn test_wind_conversion_rounds() {
        assert_eq!(mps_to_mph(0.0), 0.0);
        assert_eq!(mps_to_mph(4.47), 10.0);
        assert_eq!(mps_to_mph(1.3), 3.0);
    }

    #[test]
    fn test_coerce_shapes() {
        assert_eq!(coerce_number(&json!(12.5)), Some(12.5));
        assert_eq!(coerce_number(&json!("7")), Some(7.0));
        assert_eq!(coerce_number(&json!({"degrees": 20.0, "unit": "CELSIUS"})), Some(20.0));
        assert_eq!(coerce_number(&json!({"probability": {"percent": 40}})), Some(40.0));
        assert_eq!(coerce_number(&json!("n/a")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!([1, 2])), None);
    }

    #[test]
    fn test_defaults_when_missing() {
        let payload = json!({"temperature": "warm"});
        assert_eq!(
            coerce_or_default(Field::Temperature, &[payload.get("temperature")]),
            70.0
        );
        assert_eq!(coerce_or_default(Field::WindSpeed, &[payload.get("wind")]), 0.0);
        assert_eq!(coerce_or_default(Field::Humidity, &[None]), 50.0);
        assert_eq!(coerce_or_default(Field::UvIndex, &[]), 0.0);
        assert_eq!(
            coerce_or_default(Field::PrecipitationProbability, &[None, None]),
            0.0
        );
    }

    #[test]
    fn test_first_usable_candidate_wins() {
        let payload = json!({"a": "bad", "b": {"degrees": 25}, "c": 0});
        let value = coerce_or_default(
            Field::Temperature,
            &[payload.get("missing"), payload.get("a"), payload.get("b"), payload.get("c")],
        );
        assert_eq!(value, 77.0);
    }

    #[test]
    fn test_percentages_are_clamped() {
        let payload = json!({"humidity": 140});
        assert_eq!(coerce_or_default(Field::Humidity, &[payload.get("humidity")]), 100.0);
    }
}
