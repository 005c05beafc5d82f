//! Activity window analysis.
//!
//! Each forecast hour gets a 0-100 score from five weighted sub-scores. Hours
//! inside the activity range are bucketed into a [`Quality`] and runs of
//! consecutive same-quality hours become [`ActivityWindow`]s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tinycast_core::thresholds::{HumidityBands, QualityCutoffs, TemperatureBands};
use tinycast_core::Thresholds;
use tinycast_weather::{HourlyForecast, WeatherData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Perfect,
    Good,
    Fair,
    Skip,
}

impl Quality {
    pub fn from_score(score: u8, cutoffs: &QualityCutoffs) -> Self {
        if score >= cutoffs.perfect {
            Self::Perfect
        } else if score >= cutoffs.good {
            Self::Good
        } else if score >= cutoffs.fair {
            Self::Fair
        } else {
            Self::Skip
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Skip => "skip",
        }
    }
}

/// Judgment for one forecast hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityHour {
    pub time: DateTime<Utc>,
    pub hour: u32,
    pub score: u8,
    pub quality: Quality,
    pub reason: String,
    pub temperature: f64,
    pub precipitation_probability: f64,
}

/// Run of consecutive hours sharing one quality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityWindow {
    pub start_hour: u32,
    /// Exclusive
    pub end_hour: u32,
    pub quality: Quality,
    pub average_score: u8,
    pub average_temperature: f64,
    /// e.g. "8am - 11am"
    pub label: String,
    pub description: String,
}

impl ActivityWindow {
    pub fn len(&self) -> u32 {
        self.end_hour - self.start_hour
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityAnalysis {
    /// Scored hours inside the activity range, chronological
    pub hours: Vec<ActivityHour>,
    pub windows: Vec<ActivityWindow>,
    pub best_window: Option<ActivityWindow>,
    pub summary: String,
}

impl ActivityAnalysis {
    pub fn count(&self, quality: Quality) -> usize {
        self.hours.iter().filter(|h| h.quality == quality).count()
    }
}

/// 12-hour clock label for an hour of day, e.g. `0 -> "12am"`, `15 -> "3pm"`.
pub fn format_hour(hour: u32) -> String {
    let hour = hour % 24;
    let suffix = if hour < 12 { "am" } else { "pm" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}{}", display, suffix)
}

pub fn temperature_score(temperature: f64, bands: &TemperatureBands) -> f64 {
    let score = if temperature < bands.too_cold_for_playground || temperature > bands.very_hot {
        bands.extreme_score
    } else if temperature < bands.ideal_min {
        let falloff = (bands.ideal_min - temperature) * bands.cold_falloff_per_degree;
        (100.0 - falloff).max(bands.falloff_floor)
    } else if temperature > bands.ideal_max {
        let falloff = (temperature - bands.ideal_max) * bands.hot_falloff_per_degree;
        (100.0 - falloff).max(bands.falloff_floor)
    } else {
        100.0
    };
    score.clamp(0.0, 100.0)
}

pub fn humidity_score(humidity: f64, bands: &HumidityBands) -> f64 {
    let score = if humidity < bands.comfortable_min {
        let penalty = (bands.comfortable_min - humidity) * bands.dry_penalty_per_point;
        (100.0 - penalty).max(bands.dry_floor)
    } else if humidity <= bands.comfortable_max {
        100.0
    } else if humidity >= bands.oppressive {
        bands.oppressive_score
    } else if humidity >= bands.very_humid {
        bands.very_humid_score
    } else {
        bands.humid_score
    };
    score.clamp(0.0, 100.0)
}

pub fn rain_score(probability: f64, thresholds: &Thresholds) -> f64 {
    thresholds.rain.scale.score(probability).clamp(0.0, 100.0)
}

pub fn uv_score(uv_index: f64, thresholds: &Thresholds) -> f64 {
    thresholds.uv.scale.score(uv_index).clamp(0.0, 100.0)
}

pub fn wind_score(wind_speed: f64, thresholds: &Thresholds) -> f64 {
    thresholds.wind.scale.score(wind_speed).clamp(0.0, 100.0)
}

/// Weighted, rounded hour score. Off-limits temperatures cap the result so
/// those hours always land in `skip`.
pub fn hour_score(hour: &HourlyForecast, thresholds: &Thresholds) -> u8 {
    let weights = &thresholds.weights;
    let weighted = temperature_score(hour.temperature, &thresholds.temperature)
        * weights.temperature
        + rain_score(hour.precipitation_probability, thresholds) * weights.rain
        + uv_score(hour.uv_index, thresholds) * weights.uv
        + humidity_score(hour.humidity, &thresholds.humidity) * weights.humidity
        + wind_score(hour.wind_speed, thresholds) * weights.wind;

    let bands = &thresholds.temperature;
    let mut score = weighted.round().clamp(0.0, 100.0);
    if hour.temperature < bands.too_cold_for_playground || hour.temperature > bands.very_hot {
        score = score.min(bands.unsafe_score_cap);
    }
    score as u8
}

fn reason_for(hour: &HourlyForecast, score: u8, thresholds: &Thresholds) -> String {
    let mut reasons: Vec<String> = Vec::new();

    let t = &thresholds.temperature;
    if hour.temperature < t.too_cold {
        reasons.push("too cold".to_string());
    } else if hour.temperature < t.ideal_min {
        reasons.push("chilly".to_string());
    } else if hour.temperature > t.hot {
        reasons.push("too hot".to_string());
    } else if hour.temperature > t.ideal_max {
        reasons.push("warm".to_string());
    }

    if hour.precipitation_probability >= thresholds.rain.possible {
        reasons.push(format!("rain risk ({:.0}%)", hour.precipitation_probability));
    }

    let uv = &thresholds.uv;
    if hour.uv_index >= uv.extreme {
        reasons.push("extreme UV".to_string());
    } else if hour.uv_index >= uv.very_high {
        reasons.push("very high UV".to_string());
    } else if hour.uv_index >= uv.high {
        reasons.push("high UV".to_string());
    }

    let h = &thresholds.humidity;
    if hour.humidity < h.comfortable_min {
        reasons.push("dry air".to_string());
    } else if hour.humidity >= h.oppressive {
        reasons.push("oppressive humidity".to_string());
    } else if hour.humidity >= h.very_humid {
        reasons.push("very humid".to_string());
    } else if hour.humidity > h.comfortable_max {
        reasons.push("humid".to_string());
    }

    let w = &thresholds.wind;
    if hour.wind_speed >= w.very_windy {
        reasons.push("very windy".to_string());
    } else if hour.wind_speed >= w.windy {
        reasons.push("windy".to_string());
    } else if hour.wind_speed >= w.breezy {
        reasons.push("breezy".to_string());
    }

    if reasons.is_empty() {
        return if score >= thresholds.quality.perfect {
            "Perfect conditions".to_string()
        } else {
            "Good conditions".to_string()
        };
    }

    let joined = reasons.join(", ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => joined,
    }
}

pub fn score_hour(hour: &HourlyForecast, thresholds: &Thresholds) -> ActivityHour {
    let score = hour_score(hour, thresholds);
    ActivityHour {
        time: hour.time,
        hour: hour.hour,
        score,
        quality: Quality::from_score(score, &thresholds.quality),
        reason: reason_for(hour, score, thresholds),
        temperature: hour.temperature,
        precipitation_probability: hour.precipitation_probability,
    }
}

/// Wording for a window, picked from its quality, then rain, then temperature.
fn describe(quality: Quality, temperature: f64, rain: f64, thresholds: &Thresholds) -> String {
    let t = &thresholds.temperature;
    let wet = rain >= thresholds.rain.possible;
    let description = match quality {
        Quality::Perfect if temperature > thresholds.activity.warm_play_temperature => {
            "Perfect for water play and splash pads"
        }
        Quality::Perfect => "Perfect for playground time",
        Quality::Good if wet => "Good for outdoor play, keep rain gear handy",
        Quality::Good if temperature > t.ideal_max => "Good for outdoor play, stick to the shade",
        Quality::Good if temperature < t.ideal_min => "Good for outdoor play with a warm layer",
        Quality::Good => "Good for outdoor play",
        Quality::Fair if wet => "Okay for a short outing. Bring rain gear",
        Quality::Fair if temperature > t.ideal_max => "Okay for a short outing. Bring water",
        Quality::Fair if temperature < t.ideal_min => "Okay for a short outing if bundled up",
        Quality::Fair => "Okay for a short outing",
        Quality::Skip if rain >= thresholds.rain.likely => "Rain likely. Plan indoor play",
        Quality::Skip if temperature < t.too_cold => "Too cold for outdoor play",
        Quality::Skip if temperature > t.hot => "Too hot for outdoor play",
        Quality::Skip => "Better spent indoors",
    };
    description.to_string()
}

fn close_window(run: &[ActivityHour], thresholds: &Thresholds) -> Option<ActivityWindow> {
    let first = run.first()?;
    let last = run.last()?;
    let count = run.len() as f64;

    let average_score = run.iter().map(|h| f64::from(h.score)).sum::<f64>() / count;
    let average_temperature = (run.iter().map(|h| h.temperature).sum::<f64>() / count).round();
    let max_rain = run
        .iter()
        .map(|h| h.precipitation_probability)
        .fold(0.0, f64::max);
    let end_hour = last.hour + 1;

    Some(ActivityWindow {
        start_hour: first.hour,
        end_hour,
        quality: first.quality,
        average_score: average_score.round() as u8,
        average_temperature,
        label: format!("{} - {}", format_hour(first.hour), format_hour(end_hour)),
        description: describe(first.quality, average_temperature, max_rain, thresholds),
    })
}

/// Group scored hours into windows. A run ends on a quality change, an
/// out-of-range hour, or a gap in the hour sequence.
fn build_windows(
    hourly: &[HourlyForecast],
    thresholds: &Thresholds,
) -> (Vec<ActivityHour>, Vec<ActivityWindow>) {
    let mut hours = Vec::new();
    let mut windows = Vec::new();
    let mut run: Vec<ActivityHour> = Vec::new();

    for forecast in hourly {
        if !thresholds.activity.contains(forecast.hour) {
            windows.extend(close_window(&run, thresholds));
            run.clear();
            continue;
        }

        let scored = score_hour(forecast, thresholds);
        let continues = run
            .last()
            .is_some_and(|prev| prev.quality == scored.quality && prev.hour + 1 == scored.hour);
        if !continues {
            windows.extend(close_window(&run, thresholds));
            run.clear();
        }

        run.push(scored.clone());
        hours.push(scored);
    }
    windows.extend(close_window(&run, thresholds));

    (hours, windows)
}

fn best_window(windows: &[ActivityWindow]) -> Option<ActivityWindow> {
    let mut best: Option<&ActivityWindow> = None;
    for window in windows
        .iter()
        .filter(|w| matches!(w.quality, Quality::Perfect | Quality::Good))
    {
        if best.map_or(true, |b| window.average_score > b.average_score) {
            best = Some(window);
        }
    }
    best.cloned()
}

fn summarize(hours: &[ActivityHour], thresholds: &Thresholds) -> String {
    let count = |q: Quality| hours.iter().filter(|h| h.quality == q).count();
    let perfect = count(Quality::Perfect);
    let good = count(Quality::Good);
    let skip = count(Quality::Skip);
    let range = &thresholds.activity;

    if perfect >= range.great_day_perfect_hours {
        "Great day for outdoor activities!".to_string()
    } else if perfect + good >= range.good_opportunity_hours {
        "Good opportunities for outdoor play".to_string()
    } else if perfect + good >= range.limited_window_hours {
        "Limited windows for outdoor play, so plan around them".to_string()
    } else if skip * 2 > hours.len() {
        "Challenging day. Plan indoor activities".to_string()
    } else {
        "Mixed conditions. Check the hourly breakdown".to_string()
    }
}

/// Score the hourly forecast and group it into activity windows.
///
/// Returns `None` when there is no hourly data to analyze.
pub fn analyze_activity_windows(
    weather: &WeatherData,
    thresholds: &Thresholds,
) -> Option<ActivityAnalysis> {
    if weather.hourly.is_empty() {
        return None;
    }

    let (hours, windows) = build_windows(&weather.hourly, thresholds);
    let best_window = best_window(&windows);
    let summary = summarize(&hours, thresholds);

    tracing::debug!(
        "Activity analysis: {} hours in range, {} windows, best {:?}",
        hours.len(),
        windows.len(),
        best_window.as_ref().map(|w| w.label.as_str())
    );

    Some(ActivityAnalysis {
        hours,
        windows,
        best_window,
        summary,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::test_support::{hour, weather_with_hours};

    fn thresholds() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn test_format_hour() {
        assert_eq!(format_hour(0), "12am");
        assert_eq!(format_hour(8), "8am");
        assert_eq!(format_hour(12), "12pm");
        assert_eq!(format_hour(15), "3pm");
        assert_eq!(format_hour(24), "12am");
    }

    #[test]
    fn test_temperature_score_bands() {
        let bands = &thresholds().temperature;
        assert_eq!(temperature_score(68.0, bands), 100.0);
        assert_eq!(temperature_score(60.0, bands), 100.0);
        assert_eq!(temperature_score(75.0, bands), 100.0);
        assert_eq!(temperature_score(50.0, bands), 70.0);
        assert_eq!(temperature_score(80.0, bands), 80.0);
        assert_eq!(temperature_score(34.0, bands), 22.0);
        assert_eq!(temperature_score(33.0, bands), 20.0);
        assert_eq!(temperature_score(30.0, bands), 10.0);
        assert_eq!(temperature_score(96.0, bands), 10.0);
    }

    #[test]
    fn test_humidity_score_bands() {
        let bands = &thresholds().humidity;
        assert_eq!(humidity_score(45.0, bands), 100.0);
        assert_eq!(humidity_score(20.0, bands), 80.0);
        assert_eq!(humidity_score(0.0, bands), 40.0);
        assert_eq!(humidity_score(65.0, bands), 80.0);
        assert_eq!(humidity_score(75.0, bands), 60.0);
        assert_eq!(humidity_score(90.0, bands), 40.0);
    }

    #[test]
    fn test_step_scores() {
        let t = thresholds();
        assert_eq!(rain_score(5.0, &t), 100.0);
        assert_eq!(rain_score(30.0, &t), 70.0);
        assert_eq!(rain_score(71.0, &t), 5.0);
        assert_eq!(uv_score(2.0, &t), 100.0);
        assert_eq!(uv_score(3.0, &t), 85.0);
        assert_eq!(uv_score(11.0, &t), 20.0);
        assert_eq!(wind_score(3.0, &t), 100.0);
        assert_eq!(wind_score(25.0, &t), 10.0);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let t = thresholds();
        for temperature in [-40.0, 0.0, 32.0, 55.0, 70.0, 90.0, 120.0] {
            for rain in [0.0, 45.0, 100.0] {
                for humidity in [0.0, 50.0, 100.0] {
                    let mut h = hour(10, temperature);
                    h.precipitation_probability = rain;
                    h.humidity = humidity;
                    h.uv_index = 12.0;
                    h.wind_speed = 40.0;

                    let subscores = [
                        temperature_score(temperature, &t.temperature),
                        humidity_score(humidity, &t.humidity),
                        rain_score(rain, &t),
                        uv_score(h.uv_index, &t),
                        wind_score(h.wind_speed, &t),
                    ];
                    for sub in subscores {
                        assert!((0.0..=100.0).contains(&sub), "sub-score {} out of range", sub);
                    }
                    assert!(hour_score(&h, &t) <= 100);
                }
            }
        }

        for uv in [0.0, 3.0, 6.0, 8.0, 11.0, 20.0] {
            assert!((0.0..=100.0).contains(&uv_score(uv, &t)));
        }
        for wind in [0.0, 8.0, 15.0, 25.0, 80.0] {
            assert!((0.0..=100.0).contains(&wind_score(wind, &t)));
        }
        for rain in [-5.0, 150.0] {
            assert!((0.0..=100.0).contains(&rain_score(rain, &t)));
        }
    }

    #[test]
    fn test_quality_boundaries() {
        let cutoffs = QualityCutoffs::default();
        assert_eq!(Quality::from_score(85, &cutoffs), Quality::Perfect);
        assert_eq!(Quality::from_score(84, &cutoffs), Quality::Good);
        assert_eq!(Quality::from_score(70, &cutoffs), Quality::Good);
        assert_eq!(Quality::from_score(69, &cutoffs), Quality::Fair);
        assert_eq!(Quality::from_score(50, &cutoffs), Quality::Fair);
        assert_eq!(Quality::from_score(49, &cutoffs), Quality::Skip);
    }

    #[test]
    fn test_freezing_hour_is_skip() {
        let mut h = hour(10, 30.0);
        h.precipitation_probability = 0.0;
        h.uv_index = 1.0;

        let scored = score_hour(&h, &thresholds());
        assert_eq!(scored.quality, Quality::Skip);
        assert!(scored.reason.starts_with("Too cold"));
    }

    #[test]
    fn test_ideal_hour_is_perfect() {
        let mut h = hour(10, 68.0);
        h.precipitation_probability = 5.0;
        h.uv_index = 3.0;
        h.humidity = 50.0;
        h.wind_speed = 3.0;

        let scored = score_hour(&h, &thresholds());
        assert!(scored.score >= 85);
        assert_eq!(scored.quality, Quality::Perfect);
        assert_eq!(scored.reason, "Perfect conditions");
    }

    #[test]
    fn test_reasons_follow_fixed_order() {
        let mut h = hour(13, 88.0);
        h.precipitation_probability = 40.0;
        h.uv_index = 9.0;
        h.humidity = 85.0;
        h.wind_speed = 16.0;

        let scored = score_hour(&h, &thresholds());
        assert_eq!(
            scored.reason,
            "Too hot, rain risk (40%), very high UV, oppressive humidity, windy"
        );
    }

    #[test]
    fn test_good_conditions_reason() {
        let mut t = thresholds();
        t.quality.perfect = 95;
        let mut h = hour(10, 65.0);
        h.precipitation_probability = 25.0;
        h.uv_index = 5.0;

        let scored = score_hour(&h, &t);
        assert_eq!(scored.score, 89);
        assert_eq!(scored.quality, Quality::Good);
        assert_eq!(scored.reason, "Good conditions");
    }

    #[test]
    fn test_windows_split_on_quality_and_range() {
        let t = thresholds();
        let mut hours: Vec<_> = (5..12).map(|h| hour(h, 68.0)).collect();
        // 10am turns rainy
        hours[5].precipitation_probability = 80.0;
        let weather = weather_with_hours(hours);

        let analysis = analyze_activity_windows(&weather, &t).unwrap();

        assert!(analysis.hours.iter().all(|h| t.activity.contains(h.hour)));
        assert_eq!(analysis.hours.len(), 5);
        assert_eq!(analysis.windows.len(), 3);
        assert_eq!(analysis.windows[0].label, "7am - 10am");
        assert_eq!(analysis.windows[0].quality, Quality::Perfect);
        assert_eq!(analysis.windows[1].start_hour, 10);
        assert_ne!(analysis.windows[1].quality, Quality::Perfect);
        assert_eq!(analysis.windows[2].label, "11am - 12pm");

        for pair in analysis.windows.windows(2) {
            if pair[0].end_hour == pair[1].start_hour {
                assert_ne!(pair[0].quality, pair[1].quality);
            }
        }
    }

    #[test]
    fn test_window_average_is_rounded_mean() {
        let t = thresholds();
        let mut a = hour(9, 68.0);
        a.uv_index = 3.0;
        let b = hour(10, 68.0);
        let weather = weather_with_hours(vec![a.clone(), b.clone()]);

        let analysis = analyze_activity_windows(&weather, &t).unwrap();
        let window = &analysis.windows[0];
        let expected = ((f64::from(hour_score(&a, &t)) + f64::from(hour_score(&b, &t))) / 2.0)
            .round() as u8;

        assert_eq!(analysis.windows.len(), 1);
        assert_eq!(window.average_score, expected);
        assert_eq!(window.average_temperature, 68.0);
        assert_eq!(window.description, "Perfect for playground time");
    }

    #[test]
    fn test_descriptions_follow_rain_then_temperature() {
        let t = thresholds();
        let cases = [
            (Quality::Perfect, 80.0, 0.0, "Perfect for water play and splash pads"),
            (Quality::Perfect, 68.0, 0.0, "Perfect for playground time"),
            (Quality::Good, 68.0, 40.0, "Good for outdoor play, keep rain gear handy"),
            (Quality::Good, 80.0, 0.0, "Good for outdoor play, stick to the shade"),
            (Quality::Good, 55.0, 0.0, "Good for outdoor play with a warm layer"),
            (Quality::Good, 68.0, 0.0, "Good for outdoor play"),
            (Quality::Fair, 68.0, 45.0, "Okay for a short outing. Bring rain gear"),
            (Quality::Fair, 82.0, 0.0, "Okay for a short outing. Bring water"),
            (Quality::Fair, 45.0, 0.0, "Okay for a short outing if bundled up"),
            (Quality::Fair, 68.0, 10.0, "Okay for a short outing"),
            (Quality::Skip, 68.0, 80.0, "Rain likely. Plan indoor play"),
            (Quality::Skip, 30.0, 0.0, "Too cold for outdoor play"),
            (Quality::Skip, 97.0, 0.0, "Too hot for outdoor play"),
            (Quality::Skip, 68.0, 0.0, "Better spent indoors"),
        ];

        for (quality, temperature, rain, expected) in cases {
            assert_eq!(describe(quality, temperature, rain, &t), expected);
        }
    }

    #[test]
    fn test_rainy_window_mentions_rain() {
        let t = thresholds();
        let mut hours: Vec<_> = (9..12).map(|h| hour(h, 38.0)).collect();
        for h in &mut hours {
            h.precipitation_probability = 80.0;
        }
        let weather = weather_with_hours(hours);

        let analysis = analyze_activity_windows(&weather, &t).unwrap();

        assert_eq!(analysis.windows.len(), 1);
        assert_eq!(analysis.windows[0].quality, Quality::Skip);
        assert_eq!(analysis.windows[0].description, "Rain likely. Plan indoor play");
    }

    #[test]
    fn test_best_window_prefers_highest_average() {
        let t = thresholds();
        let mut hours: Vec<_> = (8..14).map(|h| hour(h, 68.0)).collect();
        for h in &mut hours[..2] {
            h.uv_index = 4.0;
        }
        hours[2].precipitation_probability = 90.0;
        let weather = weather_with_hours(hours);

        let analysis = analyze_activity_windows(&weather, &t).unwrap();
        let best = analysis.best_window.unwrap();

        assert_eq!(best.start_hour, 11);
        assert_eq!(best.label, "11am - 2pm");
    }

    #[test]
    fn test_no_best_window_on_bad_day() {
        let t = thresholds();
        let weather = weather_with_hours((8..12).map(|h| hour(h, 20.0)).collect());

        let analysis = analyze_activity_windows(&weather, &t).unwrap();

        assert!(analysis.best_window.is_none());
        assert_eq!(analysis.summary, "Challenging day. Plan indoor activities");
    }

    #[test]
    fn test_great_day_summary() {
        let t = thresholds();
        let weather = weather_with_hours((8..14).map(|h| hour(h, 70.0)).collect());

        let analysis = analyze_activity_windows(&weather, &t).unwrap();

        assert_eq!(analysis.count(Quality::Perfect), 6);
        assert_eq!(analysis.summary, "Great day for outdoor activities!");
    }

    #[test]
    fn test_limited_windows_summary() {
        let t = thresholds();
        let mut hours: Vec<_> = (8..12).map(|h| hour(h, 68.0)).collect();
        hours[2].temperature = 40.0;
        hours[3].temperature = 40.0;
        hours[2].precipitation_probability = 80.0;
        hours[3].precipitation_probability = 80.0;
        let weather = weather_with_hours(hours);

        let analysis = analyze_activity_windows(&weather, &t).unwrap();
        assert_eq!(
            analysis.summary,
            "Limited windows for outdoor play, so plan around them"
        );
    }

    #[test]
    fn test_empty_hourly_yields_none() {
        let weather = weather_with_hours(Vec::new());
        assert!(analyze_activity_windows(&weather, &thresholds()).is_none());
    }
}
