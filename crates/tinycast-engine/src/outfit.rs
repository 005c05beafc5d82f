//! Outfit composition for one child.
//!
//! Every layer is decided on its own from the morning/afternoon temperatures,
//! rain, UV and wind. The item list is then deduplicated so that each layer
//! other than accessories carries a single required item. Packed extras ride
//! along.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tinycast_core::thresholds::OutfitThresholds;
use tinycast_core::{AgeGroup, Thresholds};
use tinycast_weather::{HourlyForecast, WeatherData};
use uuid::Uuid;

use crate::child::Child;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClothingLayer {
    Base,
    Mid,
    Outer,
    Footwear,
    Accessory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub name: String,
    pub layer: ClothingLayer,
    /// False for items that are packed rather than worn
    pub required: bool,
}

impl ClothingItem {
    fn worn(name: impl Into<String>, layer: ClothingLayer) -> Self {
        Self {
            name: name.into(),
            layer,
            required: true,
        }
    }

    fn packed(name: impl Into<String>, layer: ClothingLayer) -> Self {
        Self {
            name: name.into(),
            layer,
            required: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempCategory {
    Freezing,
    Cold,
    Cool,
    Mild,
    Warm,
    Hot,
}

impl TempCategory {
    pub fn classify(temperature: f64, t: &OutfitThresholds) -> Self {
        if temperature < t.freezing {
            Self::Freezing
        } else if temperature < t.cold {
            Self::Cold
        } else if temperature < t.cool {
            Self::Cool
        } else if temperature < t.mild {
            Self::Mild
        } else if temperature < t.warm {
            Self::Warm
        } else {
            Self::Hot
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitRecommendation {
    pub child_id: Uuid,
    pub child_name: String,
    pub age_group: AgeGroup,
    pub items: Vec<ClothingItem>,
    pub tips: Vec<String>,
    pub summary: String,
    pub temp_category: TempCategory,
    pub needs_rain_gear: bool,
    pub needs_sun_protection: bool,
    pub morning_temperature: f64,
    pub afternoon_temperature: f64,
    pub temperature_swing: f64,
}

impl OutfitRecommendation {
    pub fn items_for(&self, layer: ClothingLayer) -> impl Iterator<Item = &ClothingItem> {
        self.items.iter().filter(move |item| item.layer == layer)
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }
}

/// Conditions the composer works from, derived once per weather payload.
#[derive(Debug, Clone, Copy)]
struct DayOutlook {
    morning: f64,
    afternoon: f64,
    rise: f64,
    swing: f64,
    rain: f64,
    uv: f64,
    wind: f64,
    humidity: f64,
    recent_rain: bool,
}

fn average_in(hourly: &[HourlyForecast], matches: impl Fn(u32) -> bool) -> Option<f64> {
    let temps: Vec<f64> = hourly
        .iter()
        .filter(|h| matches(h.hour))
        .map(|h| h.temperature)
        .collect();
    if temps.is_empty() {
        None
    } else {
        Some(temps.iter().sum::<f64>() / temps.len() as f64)
    }
}

fn outlook(weather: &WeatherData, t: &OutfitThresholds, now: DateTime<Utc>) -> DayOutlook {
    let hourly = &weather.hourly;
    let current_sample = hourly.iter().rev().find(|h| h.time <= now);

    let morning = match current_sample {
        Some(sample) if sample.hour > t.morning.end => sample.temperature,
        _ => average_in(hourly, |h| t.morning.contains(h))
            .or_else(|| hourly.first().map(|h| h.temperature))
            .unwrap_or(weather.current.temperature),
    };
    let afternoon = average_in(hourly, |h| t.afternoon.contains(h))
        .or_else(|| hourly.last().map(|h| h.temperature))
        .unwrap_or(weather.current.temperature);

    let morning = morning.round();
    let afternoon = afternoon.round();
    let max_wind = hourly
        .iter()
        .map(|h| h.wind_speed)
        .fold(weather.current.wind_speed, f64::max);
    let max_humidity = hourly
        .iter()
        .map(|h| h.humidity)
        .fold(weather.current.humidity, f64::max);

    DayOutlook {
        morning,
        afternoon,
        rise: afternoon - morning,
        swing: (afternoon - morning).abs(),
        rain: weather.max_precipitation_probability(),
        uv: weather.max_uv_index(),
        wind: max_wind,
        humidity: max_humidity,
        recent_rain: weather.current.condition.is_rainy()
            || weather.current.precipitation_probability >= t.recent_rain_at,
    }
}

fn base_layer(age_group: AgeGroup, day: &DayOutlook, t: &OutfitThresholds) -> ClothingItem {
    let name = if day.morning >= t.shorts_from {
        "T-shirt & shorts"
    } else if day.morning >= t.short_sleeves_from {
        "T-shirt & light pants"
    } else {
        "Long-sleeve top & pants"
    };

    if age_group == AgeGroup::Baby && day.morning < t.baby_onesie_below {
        ClothingItem::worn(
            format!("Onesie + {}", name.to_lowercase()),
            ClothingLayer::Base,
        )
    } else {
        ClothingItem::worn(name, ClothingLayer::Base)
    }
}

fn mid_layers(age_group: AgeGroup, day: &DayOutlook, t: &OutfitThresholds) -> Vec<ClothingItem> {
    let mut items = Vec::new();

    let extra_layers = t.extra_layers_for(age_group.layer_proxy_months());
    let adjusted = day.morning - f64::from(extra_layers) * t.degrees_per_extra_layer;

    if adjusted < t.heavy_mid_below {
        items.push(ClothingItem::worn("Warm fleece", ClothingLayer::Mid));
    } else if adjusted < t.medium_mid_below {
        items.push(ClothingItem::worn("Cozy sweater", ClothingLayer::Mid));
    } else if adjusted < t.light_mid_below {
        items.push(ClothingItem::worn("Light cardigan", ClothingLayer::Mid));
    }

    if day.rise >= t.swing_layer_rise {
        items.push(ClothingItem::packed("Removable zip-up hoodie", ClothingLayer::Mid));
    }

    items
}

fn outer_layers(day: &DayOutlook, thresholds: &Thresholds) -> Vec<ClothingItem> {
    let t = &thresholds.outfit;
    let mut items = Vec::new();

    if day.morning < t.winter_coat_below {
        items.push(ClothingItem::worn("Winter coat", ClothingLayer::Outer));
    } else if day.morning < t.warm_jacket_below {
        items.push(ClothingItem::worn("Warm jacket", ClothingLayer::Outer));
    } else if day.morning < t.light_jacket_below {
        items.push(ClothingItem::worn("Light jacket", ClothingLayer::Outer));
    }

    if day.rain >= t.rain_jacket_at {
        items.push(ClothingItem::worn("Rain jacket", ClothingLayer::Outer));
    } else if day.rain >= t.rain_shell_at {
        items.push(ClothingItem::packed("Packable rain shell", ClothingLayer::Outer));
    }

    if day.wind >= thresholds.wind.windy {
        items.push(ClothingItem::worn("Windbreaker", ClothingLayer::Outer));
    }

    items
}

fn footwear(day: &DayOutlook, t: &OutfitThresholds) -> ClothingItem {
    let name = if day.recent_rain {
        "Rain boots"
    } else if day.morning < t.freezing {
        "Insulated snow boots"
    } else if day.rain >= t.rain_boots_at {
        "Rain boots"
    } else if day.morning < t.warm_boots_below {
        "Warm boots"
    } else if day.morning >= t.sandals_from {
        "Breathable sandals"
    } else {
        "Sneakers"
    };
    ClothingItem::worn(name, ClothingLayer::Footwear)
}

fn accessories(day: &DayOutlook, thresholds: &Thresholds) -> Vec<ClothingItem> {
    let t = &thresholds.outfit;
    let uv = &thresholds.uv;
    let mut items = Vec::new();

    if day.morning < t.winter_hat_below {
        items.push(ClothingItem::worn("Winter hat", ClothingLayer::Accessory));
        items.push(ClothingItem::worn("Mittens", ClothingLayer::Accessory));
    } else if day.morning < t.beanie_below {
        items.push(ClothingItem::worn("Beanie", ClothingLayer::Accessory));
        items.push(ClothingItem::worn("Light gloves", ClothingLayer::Accessory));
    }

    if day.uv >= uv.very_high {
        items.push(ClothingItem::worn("Wide-brim sun hat", ClothingLayer::Accessory));
        items.push(ClothingItem::worn("Kids' sunglasses", ClothingLayer::Accessory));
        items.push(ClothingItem::worn("SPF 50+ sunscreen", ClothingLayer::Accessory));
    } else if day.uv >= uv.high {
        items.push(ClothingItem::worn("Sun hat", ClothingLayer::Accessory));
        items.push(ClothingItem::worn("SPF 50 sunscreen", ClothingLayer::Accessory));
    } else if day.uv >= uv.moderate {
        items.push(ClothingItem::worn("SPF 30 sunscreen", ClothingLayer::Accessory));
    }

    if day.rain >= t.umbrella_at {
        items.push(ClothingItem::packed("Umbrella", ClothingLayer::Accessory));
    }

    items
}

/// Keep the first required item of every non-accessory layer. Packed items
/// are never dropped.
fn dedup_layers(items: Vec<ClothingItem>) -> Vec<ClothingItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            !item.required || item.layer == ClothingLayer::Accessory || seen.insert(item.layer)
        })
        .collect()
}

fn rain_in(weather: &WeatherData, window: impl Fn(u32) -> bool, at: f64) -> bool {
    weather
        .hourly
        .iter()
        .any(|h| window(h.hour) && h.precipitation_probability >= at)
}

fn outfit_tips(
    age_group: AgeGroup,
    day: &DayOutlook,
    weather: &WeatherData,
    thresholds: &Thresholds,
) -> Vec<String> {
    let t = &thresholds.outfit;
    let mut tips = Vec::new();

    if day.swing >= t.swing_notice {
        let direction = if day.rise >= 0.0 { "warms up" } else { "cools down" };
        tips.push(format!(
            "It {} by {:.0}° between morning and afternoon. Dress in layers that are easy to take off.",
            direction, day.swing
        ));
    }

    match age_group {
        AgeGroup::Baby => tips.push(
            "Babies can't regulate their temperature well. Check the back of their neck to \
             see if they're too warm or too cold."
                .to_string(),
        ),
        AgeGroup::Toddler => {
            tips.push("Pack a backup set of clothes for spills and puddles.".to_string());
            if day.humidity >= t.toddler_humidity_at {
                tips.push(
                    "It's humid today. Breathable cotton helps prevent heat rash.".to_string(),
                );
            }
        }
        AgeGroup::Preschool | AgeGroup::SchoolAge => {}
    }

    if rain_in(weather, |h| t.dropoff.contains(h), t.umbrella_at) {
        tips.push("Rain is likely at drop-off. Keep the umbrella by the door.".to_string());
    }
    if rain_in(weather, |h| t.pickup.contains(h), t.umbrella_at) {
        tips.push("Rain is expected around pickup. Pack rain gear in the backpack.".to_string());
    }

    if day.uv >= thresholds.uv.very_high {
        tips.push(
            "UV is very high. Reapply sunscreen every 2 hours and find shade at midday."
                .to_string(),
        );
    } else if day.uv >= thresholds.uv.high {
        tips.push("High UV today. Apply sunscreen 15 minutes before heading out.".to_string());
    }

    if day.morning < t.car_seat_below {
        tips.push(
            "Take off puffy coats before buckling into the car seat. Tuck a blanket over the \
             straps instead."
                .to_string(),
        );
    }

    if weather.current.humidity >= t.humidity_feel_at
        && day.afternoon >= t.humidity_feel_temperature
    {
        tips.push("The humidity will make it feel warmer than the thermometer says.".to_string());
    }

    tips
}

fn summary(items: &[ClothingItem], day: &DayOutlook, t: &OutfitThresholds) -> String {
    let mut summary = items
        .iter()
        .find(|item| item.layer == ClothingLayer::Base)
        .map(|item| item.name.clone())
        .unwrap_or_default();

    if day.swing >= t.swing_layer_rise {
        summary.push_str(&format!(" + layers for {:.0}° swing", day.swing));
    }
    if day.rain >= t.umbrella_at {
        summary.push_str(" + rain gear");
    }
    summary
}

/// Outfit for one child, judged at `now`.
pub fn generate_outfit_recommendation_at(
    child: &Child,
    weather: &WeatherData,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> OutfitRecommendation {
    let t = &thresholds.outfit;
    let day = outlook(weather, t, now);
    let age_group = thresholds.age_groups.classify(child.age_months);

    let mut items = vec![base_layer(age_group, &day, t)];
    items.extend(mid_layers(age_group, &day, t));
    items.extend(outer_layers(&day, thresholds));
    items.push(footwear(&day, t));
    items.extend(accessories(&day, thresholds));
    let items = dedup_layers(items);

    let tips = outfit_tips(age_group, &day, weather, thresholds);
    let category_temperature = day.morning.max(weather.current.temperature.round());
    let summary = summary(&items, &day, t);

    tracing::debug!(
        "Outfit for {} ({}): {} items, morning {:.0}°F, afternoon {:.0}°F",
        child.name,
        age_group.label(),
        items.len(),
        day.morning,
        day.afternoon
    );

    OutfitRecommendation {
        child_id: child.id,
        child_name: child.name.clone(),
        age_group,
        items,
        tips,
        summary,
        temp_category: TempCategory::classify(category_temperature, t),
        needs_rain_gear: day.rain >= t.umbrella_at,
        needs_sun_protection: day.uv >= thresholds.uv.moderate,
        morning_temperature: day.morning,
        afternoon_temperature: day.afternoon,
        temperature_swing: day.swing,
    }
}

pub fn generate_outfit_recommendation(
    child: &Child,
    weather: &WeatherData,
    thresholds: &Thresholds,
) -> OutfitRecommendation {
    generate_outfit_recommendation_at(child, weather, thresholds, Utc::now())
}

/// One outfit per child, in roster order. Empty without weather.
pub fn generate_all_outfit_recommendations(
    children: &[Child],
    weather: Option<&WeatherData>,
    thresholds: &Thresholds,
) -> Vec<OutfitRecommendation> {
    generate_all_outfit_recommendations_at(children, weather, thresholds, Utc::now())
}

pub fn generate_all_outfit_recommendations_at(
    children: &[Child],
    weather: Option<&WeatherData>,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> Vec<OutfitRecommendation> {
    let Some(weather) = weather else {
        return Vec::new();
    };
    children
        .iter()
        .map(|child| generate_outfit_recommendation_at(child, weather, thresholds, now))
        .collect()
}
