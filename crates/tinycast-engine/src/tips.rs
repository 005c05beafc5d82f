//! Smart tips.
//!
//! Seven generators each look at the weather on their own and may emit any
//! number of tips. The merged list is stably sorted by priority and then
//! reduced to one tip per `(category, priority)` pair.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tinycast_core::thresholds::TipThresholds;
use tinycast_core::Thresholds;
use tinycast_weather::{DailyForecast, WeatherCondition, WeatherData};

use crate::activity::format_hour;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipType {
    Alert,
    Info,
    Tip,
    Warning,
}

/// Ordered high to low, so sorting ascending puts urgent tips first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
    Temperature,
    Rain,
    Uv,
    Comfort,
    Wind,
    Playground,
    Weekend,
    Safety,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartTip {
    pub id: String,
    pub tip_type: TipType,
    pub priority: TipPriority,
    pub title: String,
    pub message: String,
    pub category: TipCategory,
    pub action: Option<String>,
}

impl SmartTip {
    fn new(
        id: &str,
        tip_type: TipType,
        priority: TipPriority,
        category: TipCategory,
        title: &str,
        message: String,
    ) -> Self {
        Self {
            id: id.to_string(),
            tip_type,
            priority,
            title: title.to_string(),
            message,
            category,
            action: None,
        }
    }

    fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartTipsResult {
    pub tips: Vec<SmartTip>,
    pub primary_tip: Option<SmartTip>,
    pub alerts: Vec<SmartTip>,
}

/// Inputs shared by every generator.
struct TipContext<'a> {
    weather: &'a WeatherData,
    thresholds: &'a Thresholds,
    today: NaiveDate,
}

impl TipContext<'_> {
    fn tips(&self) -> &TipThresholds {
        &self.thresholds.tips
    }
}

fn temperature_tips(ctx: &TipContext) -> Vec<SmartTip> {
    let t = ctx.tips();
    let weather = ctx.weather;
    let now = weather.current.temperature;
    let high = weather
        .hourly
        .iter()
        .map(|h| h.temperature)
        .fold(now, f64::max);
    let low = weather
        .hourly
        .iter()
        .map(|h| h.temperature)
        .fold(now, f64::min);
    let mut tips = Vec::new();

    if now >= t.dangerous_heat {
        tips.push(
            SmartTip::new(
                "temperature-dangerous-heat",
                TipType::Alert,
                TipPriority::High,
                TipCategory::Temperature,
                "Dangerous Heat",
                format!(
                    "It's {:.0}°F. Keep outdoor time short, stay in the shade and offer water \
                     every 15 minutes.",
                    now
                ),
            )
            .with_action("Plan indoor play"),
        );
    } else if high >= t.hot_day {
        tips.push(SmartTip::new(
            "temperature-hot-day",
            TipType::Warning,
            TipPriority::Medium,
            TipCategory::Temperature,
            "Hot Day Ahead",
            format!(
                "Temperatures reach {:.0}°F. Head out early and bring plenty of water.",
                high
            ),
        ));
    }

    if now < t.dangerous_cold {
        tips.push(
            SmartTip::new(
                "temperature-dangerous-cold",
                TipType::Alert,
                TipPriority::High,
                TipCategory::Temperature,
                "Dangerous Cold",
                format!(
                    "It's {:.0}°F. Limit time outside and cover every bit of exposed skin.",
                    now
                ),
            )
            .with_action("Plan indoor play"),
        );
    } else if low < t.freezing {
        tips.push(SmartTip::new(
            "temperature-freezing",
            TipType::Warning,
            TipPriority::Medium,
            TipCategory::Temperature,
            "Freezing Temperatures",
            format!(
                "Temperatures drop to {:.0}°F. Watch for frost and icy patches.",
                low
            ),
        ));
    }

    if let Some(day) = weather.daily.first() {
        let swing = day.high - day.low;
        if swing >= t.big_daily_swing {
            tips.push(SmartTip::new(
                "temperature-big-swing",
                TipType::Tip,
                TipPriority::Low,
                TipCategory::Temperature,
                "Big Temperature Swing",
                format!(
                    "It ranges from {:.0}°F to {:.0}°F today. Layers make it easy to adjust.",
                    day.low, day.high
                ),
            ));
        }
    }

    tips
}

fn rain_tips(ctx: &TipContext) -> Vec<SmartTip> {
    let t = ctx.tips();
    let weather = ctx.weather;

    if weather.current.precipitation_probability >= t.rain_expected {
        let clears = weather
            .hourly
            .iter()
            .find(|h| h.precipitation_probability < t.rain_clears_below);
        return match clears {
            Some(hour) => vec![SmartTip::new(
                "rain-clearing",
                TipType::Info,
                TipPriority::Medium,
                TipCategory::Rain,
                "Rain Clearing Later",
                format!(
                    "Rain should clear by {}. Save outdoor time for after that.",
                    format_hour(hour.hour)
                ),
            )],
            None => vec![SmartTip::new(
                "rain-all-day",
                TipType::Warning,
                TipPriority::Medium,
                TipCategory::Rain,
                "Rainy Day",
                "Rain is likely all day. Puddle jumping in rain boots still counts as outside \
                 time."
                    .to_string(),
            )
            .with_action("Pack rain gear")],
        };
    }

    let Some(first_wet) = weather
        .hourly
        .iter()
        .find(|h| h.precipitation_probability >= t.rain_expected)
    else {
        return Vec::new();
    };

    let peak = weather.max_precipitation_probability();
    let tip = if peak >= t.heavy_rain {
        SmartTip::new(
            "rain-heavy",
            TipType::Warning,
            TipPriority::High,
            TipCategory::Rain,
            "Heavy Rain Expected",
            format!(
                "{:.0}% chance of rain starting around {}. Get outside before then.",
                peak,
                format_hour(first_wet.hour)
            ),
        )
    } else {
        SmartTip::new(
            "rain-expected",
            TipType::Info,
            TipPriority::Medium,
            TipCategory::Rain,
            "Rain Expected",
            format!(
                "Rain is likely around {}. Get outside before then.",
                format_hour(first_wet.hour)
            ),
        )
    };
    vec![tip.with_action("Pack rain gear")]
}

fn uv_tips(ctx: &TipContext) -> Vec<SmartTip> {
    let uv = &ctx.thresholds.uv;
    let weather = ctx.weather;
    let peak = weather.max_uv_index();
    let peak_hour = weather
        .hourly
        .iter()
        .find(|h| h.uv_index >= peak)
        .map(|h| format_hour(h.hour));
    let around = peak_hour
        .map(|label| format!(" around {}", label))
        .unwrap_or_default();

    let tip = if peak >= uv.extreme {
        SmartTip::new(
            "uv-extreme",
            TipType::Alert,
            TipPriority::High,
            TipCategory::Uv,
            "Extreme UV",
            format!(
                "UV peaks at {:.0}{}. Keep little ones in full shade through midday.",
                peak, around
            ),
        )
    } else if peak >= uv.very_high {
        SmartTip::new(
            "uv-very-high",
            TipType::Warning,
            TipPriority::High,
            TipCategory::Uv,
            "Very High UV",
            format!(
                "UV peaks at {:.0}{}. Sunscreen, hats and shade breaks are a must.",
                peak, around
            ),
        )
    } else if peak >= uv.high {
        SmartTip::new(
            "uv-high",
            TipType::Tip,
            TipPriority::Medium,
            TipCategory::Uv,
            "High UV",
            format!(
                "UV reaches {:.0}{}. Apply sunscreen 15 minutes before heading out.",
                peak, around
            ),
        )
    } else if peak >= uv.moderate {
        SmartTip::new(
            "uv-moderate",
            TipType::Tip,
            TipPriority::Low,
            TipCategory::Uv,
            "Sunscreen Reminder",
            "Moderate UV today. A quick layer of sunscreen is enough.".to_string(),
        )
    } else {
        return Vec::new();
    };
    vec![tip.with_action("Pack sunscreen")]
}

fn comfort_tips(ctx: &TipContext) -> Vec<SmartTip> {
    let t = ctx.tips();
    let current = &ctx.weather.current;
    let mut tips = Vec::new();

    if current.humidity >= t.muggy_humidity && current.temperature >= t.muggy_temperature {
        tips.push(SmartTip::new(
            "comfort-muggy",
            TipType::Warning,
            TipPriority::Medium,
            TipCategory::Comfort,
            "Muggy Conditions",
            format!(
                "Humidity is {:.0}%. Kids overheat faster in sticky air, so plan extra water \
                 breaks.",
                current.humidity
            ),
        ));
    } else if current.humidity <= t.dry_air {
        tips.push(SmartTip::new(
            "comfort-dry-air",
            TipType::Tip,
            TipPriority::Low,
            TipCategory::Comfort,
            "Dry Air",
            "The air is dry. Lip balm and moisturizer help with chapped skin.".to_string(),
        ));
    }

    if (current.feels_like - current.temperature).abs() >= t.feels_like_gap {
        tips.push(SmartTip::new(
            "comfort-feels-like",
            TipType::Info,
            TipPriority::Low,
            TipCategory::Comfort,
            "Feels Different Outside",
            format!(
                "It's {:.0}°F but feels like {:.0}°F. Dress for the feels-like temperature.",
                current.temperature, current.feels_like
            ),
        ));
    }

    if current.wind_speed >= t.strong_wind {
        tips.push(SmartTip::new(
            "wind-strong",
            TipType::Warning,
            TipPriority::High,
            TipCategory::Wind,
            "Strong Winds",
            format!(
                "Winds of {:.0} mph. Skip strollers with canopies and stay clear of trees.",
                current.wind_speed
            ),
        ));
    } else if current.wind_speed >= t.windy {
        tips.push(SmartTip::new(
            "wind-windy",
            TipType::Info,
            TipPriority::Medium,
            TipCategory::Wind,
            "Windy Day",
            format!(
                "Winds of {:.0} mph make it feel colder. A windproof layer helps.",
                current.wind_speed
            ),
        ));
    }

    tips
}

fn playground_tips(ctx: &TipContext) -> Vec<SmartTip> {
    let t = ctx.tips();
    let current = &ctx.weather.current;
    let mut tips = Vec::new();

    if current.temperature >= t.hot_equipment_temperature {
        tips.push(
            SmartTip::new(
                "playground-hot-equipment",
                TipType::Warning,
                TipPriority::High,
                TipCategory::Playground,
                "Hot Playground Equipment",
                "Slides and metal surfaces can burn. Touch-test them before kids climb on."
                    .to_string(),
            )
            .with_action("Choose shaded playgrounds"),
        );
    }

    if current.condition.is_icy() || current.temperature < t.freezing {
        tips.push(SmartTip::new(
            "playground-icy",
            TipType::Warning,
            TipPriority::Medium,
            TipCategory::Playground,
            "Icy Surfaces",
            "Play structures may be icy. Check ladders and platforms before climbing."
                .to_string(),
        ));
    } else if current.condition.is_rainy()
        || current.precipitation_probability >= t.wet_playground_precipitation
    {
        tips.push(
            SmartTip::new(
                "playground-wet",
                TipType::Tip,
                TipPriority::Medium,
                TipCategory::Playground,
                "Wet Playground",
                "Equipment will be slippery. Bring a towel to dry off slides and swings."
                    .to_string(),
            )
            .with_action("Pack a towel"),
        );
    }

    tips
}

/// 0-100 outdoor score for a weekend day.
pub fn weekend_day_score(day: &DailyForecast, t: &TipThresholds) -> f64 {
    let rain_penalty = t
        .weekend_rain_penalties
        .iter()
        .find(|tier| day.precipitation_probability >= tier.at_least)
        .map_or(0.0, |tier| tier.penalty);

    let heat_penalty = if day.high >= t.weekend_hot_high {
        t.weekend_hot_penalty
    } else if day.high >= t.weekend_warm_high {
        t.weekend_warm_penalty
    } else {
        0.0
    };

    let cold_penalty = if day.high < t.weekend_cold_high {
        t.weekend_cold_penalty
    } else if day.high < t.weekend_cool_high {
        t.weekend_cool_penalty
    } else {
        0.0
    };

    (100.0 - rain_penalty - heat_penalty - cold_penalty).max(0.0)
}

fn weekend_tips(ctx: &TipContext) -> Vec<SmartTip> {
    let weekday = ctx.today.weekday();
    if !matches!(weekday, Weekday::Thu | Weekday::Fri) {
        return Vec::new();
    }

    let days_to_saturday = i64::from(
        Weekday::Sat.num_days_from_monday() - weekday.num_days_from_monday(),
    );
    let saturday_date = ctx.today + Duration::days(days_to_saturday);
    let sunday_date = saturday_date + Duration::days(1);
    let find = |date: NaiveDate| ctx.weather.daily.iter().find(|d| d.date == date);

    let (Some(saturday), Some(sunday)) = (find(saturday_date), find(sunday_date)) else {
        return Vec::new();
    };

    let t = ctx.tips();
    let saturday_score = weekend_day_score(saturday, t);
    let sunday_score = weekend_day_score(sunday, t);
    let saturday_good = saturday_score >= t.weekend_good_day;
    let sunday_good = sunday_score >= t.weekend_good_day;

    tracing::debug!(
        "Weekend scores: Saturday {:.0}, Sunday {:.0}",
        saturday_score,
        sunday_score
    );

    let tip = if saturday_good && sunday_good {
        SmartTip::new(
            "weekend-great",
            TipType::Info,
            TipPriority::Low,
            TipCategory::Weekend,
            "Great Weekend Ahead",
            "Both weekend days look good for outdoor adventures. Time to plan a park day or \
             a hike."
                .to_string(),
        )
    } else if saturday_good {
        SmartTip::new(
            "weekend-saturday",
            TipType::Tip,
            TipPriority::Medium,
            TipCategory::Weekend,
            "Plan Outdoor Fun for Saturday",
            format!(
                "Saturday looks better ({:.0}/100) than Sunday ({:.0}/100). Save indoor \
                 plans for Sunday.",
                saturday_score, sunday_score
            ),
        )
    } else if sunday_good {
        SmartTip::new(
            "weekend-sunday",
            TipType::Tip,
            TipPriority::Medium,
            TipCategory::Weekend,
            "Plan Outdoor Fun for Sunday",
            format!(
                "Sunday looks better ({:.0}/100) than Saturday ({:.0}/100). Save indoor \
                 plans for Saturday.",
                sunday_score, saturday_score
            ),
        )
    } else {
        SmartTip::new(
            "weekend-indoor",
            TipType::Info,
            TipPriority::Medium,
            TipCategory::Weekend,
            "Indoor Weekend",
            "Neither weekend day looks great. Line up a museum, library or indoor play space."
                .to_string(),
        )
        .with_action("Find indoor activities")
    };
    vec![tip]
}

fn safety_tips(ctx: &TipContext) -> Vec<SmartTip> {
    let t = ctx.tips();
    let weather = ctx.weather;
    let current = &weather.current;
    let mut tips = Vec::new();

    let storm = current.condition == WeatherCondition::Thunderstorm
        || weather
            .hourly
            .iter()
            .any(|h| h.condition == WeatherCondition::Thunderstorm);
    if storm {
        tips.push(
            SmartTip::new(
                "safety-thunderstorm",
                TipType::Alert,
                TipPriority::High,
                TipCategory::Safety,
                "Thunderstorms",
                "When thunder roars, go indoors. Wait 30 minutes after the last thunder before \
                 heading back out."
                    .to_string(),
            )
            .with_action("Plan indoor play"),
        );
    }

    if current.temperature < t.car_seat_below {
        tips.push(SmartTip::new(
            "safety-car-seat",
            TipType::Warning,
            TipPriority::High,
            TipCategory::Safety,
            "Car Seat Safety",
            "Take off puffy coats before buckling up. Bulky layers keep harness straps from \
             fitting snugly. Use a blanket over the straps instead."
                .to_string(),
        ));
    }

    if current.temperature >= t.hot_day {
        tips.push(SmartTip::new(
            "safety-hot-car",
            TipType::Warning,
            TipPriority::Medium,
            TipCategory::Safety,
            "Hot Car Reminder",
            "Cars heat up fast. Never leave a child in a parked car, even for a minute."
                .to_string(),
        ));
    }

    tips
}

type Generator = fn(&TipContext) -> Vec<SmartTip>;

const GENERATORS: [Generator; 7] = [
    temperature_tips,
    rain_tips,
    uv_tips,
    comfort_tips,
    playground_tips,
    weekend_tips,
    safety_tips,
];

/// Stable priority sort, then drop every tip whose `(category, priority)`
/// was already taken by an earlier one.
fn rank(mut tips: Vec<SmartTip>) -> Vec<SmartTip> {
    tips.sort_by_key(|tip| tip.priority);
    let mut seen = HashSet::new();
    tips.retain(|tip| seen.insert((tip.category, tip.priority)));
    tips
}

/// Calendar date at the forecast location.
///
/// Daily entries carry local dates, so the weekday has to be local too. The
/// UTC offset is recovered from the first hourly sample (local hour against
/// UTC hour), wrapped into -12..=11 hours.
fn local_today(weather: &WeatherData, now: DateTime<Utc>) -> NaiveDate {
    match weather.hourly.first() {
        Some(sample) => {
            let diff = i64::from(sample.hour) - i64::from(sample.time.hour());
            let offset = (diff + 12).rem_euclid(24) - 12;
            (now + Duration::hours(offset)).date_naive()
        }
        None => weather
            .daily
            .first()
            .map_or_else(|| now.date_naive(), |day| day.date),
    }
}

/// Tips for the given weather, with the weekend check run against `now`.
pub fn generate_smart_tips_at(
    weather: &WeatherData,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> SmartTipsResult {
    let ctx = TipContext {
        weather,
        thresholds,
        today: local_today(weather, now),
    };

    let generated: Vec<SmartTip> = GENERATORS
        .iter()
        .flat_map(|generate| generate(&ctx))
        .collect();
    let generated_count = generated.len();
    let tips = rank(generated);

    tracing::debug!(
        "Generated {} tips, {} after dedup",
        generated_count,
        tips.len()
    );

    SmartTipsResult {
        primary_tip: tips.first().cloned(),
        alerts: tips
            .iter()
            .filter(|tip| tip.priority == TipPriority::High)
            .cloned()
            .collect(),
        tips,
    }
}

pub fn generate_smart_tips(weather: &WeatherData, thresholds: &Thresholds) -> SmartTipsResult {
    generate_smart_tips_at(weather, thresholds, Utc::now())
}
