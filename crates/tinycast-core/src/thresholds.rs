//! Threshold catalog for the recommendation engine.
//!
//! Every band, weight and cutoff the analyzers consult lives here so that it
//! can be tuned from `config.toml` without touching code. All temperatures
//! are degrees Fahrenheit, wind speeds are mph, and percentages are 0-100.

use serde::{Deserialize, Serialize};

/// Developmental age band of a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeGroup {
    Baby,
    Toddler,
    Preschool,
    SchoolAge,
}

impl AgeGroup {
    /// Classify an age in months using the default band boundaries.
    pub fn from_age_months(age_months: u32) -> Self {
        AgeGroupBounds::default().classify(age_months)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Baby => "baby",
            Self::Toddler => "toddler",
            Self::Preschool => "preschool",
            Self::SchoolAge => "school-age",
        }
    }

    /// Representative age in months used by the mid-layer table.
    ///
    /// The table is keyed on these fixed proxies rather than the child's
    /// actual age; see DESIGN.md before changing it.
    pub fn layer_proxy_months(&self) -> u32 {
        match self {
            Self::Baby => 6,
            Self::Toddler => 24,
            Self::Preschool | Self::SchoolAge => 60,
        }
    }
}

/// Upper month boundaries (inclusive) for each age band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeGroupBounds {
    pub baby_max_months: u32,
    pub toddler_max_months: u32,
    pub preschool_max_months: u32,
}

impl Default for AgeGroupBounds {
    fn default() -> Self {
        Self {
            baby_max_months: 12,
            toddler_max_months: 36,
            preschool_max_months: 60,
        }
    }
}

impl AgeGroupBounds {
    pub fn classify(&self, age_months: u32) -> AgeGroup {
        if age_months <= self.baby_max_months {
            AgeGroup::Baby
        } else if age_months <= self.toddler_max_months {
            AgeGroup::Toddler
        } else if age_months <= self.preschool_max_months {
            AgeGroup::Preschool
        } else {
            AgeGroup::SchoolAge
        }
    }
}

/// One step of a monotone step function: values `<= up_to` score `score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub up_to: f64,
    pub score: f64,
}

/// Piecewise-constant scale. Steps are checked in ascending `up_to` order and
/// anything beyond the last step scores `otherwise`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepScale {
    pub steps: Vec<Step>,
    pub otherwise: f64,
}

impl StepScale {
    fn new(steps: &[(f64, f64)], otherwise: f64) -> Self {
        Self {
            steps: steps
                .iter()
                .map(|&(up_to, score)| Step { up_to, score })
                .collect(),
            otherwise,
        }
    }

    pub fn score(&self, value: f64) -> f64 {
        self.steps
            .iter()
            .find(|step| value <= step.up_to)
            .map_or(self.otherwise, |step| step.score)
    }

    /// True when `up_to` strictly increases and scores never increase.
    pub fn is_monotone_decreasing(&self) -> bool {
        let ordered = self
            .steps
            .windows(2)
            .all(|w| w[0].up_to < w[1].up_to && w[0].score >= w[1].score);
        let tail = self
            .steps
            .last()
            .map_or(true, |last| last.score >= self.otherwise);
        ordered && tail
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureBands {
    /// Below this the playground is off limits.
    pub too_cold_for_playground: f64,
    pub too_cold: f64,
    pub ideal_min: f64,
    pub ideal_max: f64,
    pub hot: f64,
    /// Above this the playground is off limits.
    pub very_hot: f64,
    pub cold_falloff_per_degree: f64,
    pub hot_falloff_per_degree: f64,
    pub falloff_floor: f64,
    pub extreme_score: f64,
    /// Ceiling applied to the hour score when temperature is off limits.
    pub unsafe_score_cap: f64,
}

impl Default for TemperatureBands {
    fn default() -> Self {
        Self {
            too_cold_for_playground: 32.0,
            too_cold: 40.0,
            ideal_min: 60.0,
            ideal_max: 75.0,
            hot: 85.0,
            very_hot: 95.0,
            cold_falloff_per_degree: 3.0,
            hot_falloff_per_degree: 4.0,
            falloff_floor: 20.0,
            extreme_score: 10.0,
            unsafe_score_cap: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainBands {
    pub scale: StepScale,
    pub possible: f64,
    pub likely: f64,
    pub very_likely: f64,
}

impl Default for RainBands {
    fn default() -> Self {
        Self {
            scale: StepScale::new(
                &[(10.0, 100.0), (20.0, 85.0), (30.0, 70.0), (50.0, 45.0), (70.0, 20.0)],
                5.0,
            ),
            possible: 30.0,
            likely: 50.0,
            very_likely: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UvBands {
    pub scale: StepScale,
    pub moderate: f64,
    pub high: f64,
    pub very_high: f64,
    pub extreme: f64,
}

impl Default for UvBands {
    fn default() -> Self {
        Self {
            scale: StepScale::new(
                &[(2.0, 100.0), (5.0, 85.0), (7.0, 65.0), (10.0, 40.0)],
                20.0,
            ),
            moderate: 3.0,
            high: 6.0,
            very_high: 8.0,
            extreme: 11.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumidityBands {
    pub comfortable_min: f64,
    pub comfortable_max: f64,
    pub very_humid: f64,
    pub oppressive: f64,
    pub dry_penalty_per_point: f64,
    pub dry_floor: f64,
    pub humid_score: f64,
    pub very_humid_score: f64,
    pub oppressive_score: f64,
}

impl Default for HumidityBands {
    fn default() -> Self {
        Self {
            comfortable_min: 30.0,
            comfortable_max: 60.0,
            very_humid: 70.0,
            oppressive: 80.0,
            dry_penalty_per_point: 2.0,
            dry_floor: 40.0,
            humid_score: 80.0,
            very_humid_score: 60.0,
            oppressive_score: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindBands {
    pub scale: StepScale,
    pub breezy: f64,
    pub windy: f64,
    pub very_windy: f64,
}

impl Default for WindBands {
    fn default() -> Self {
        Self {
            scale: StepScale::new(
                &[(5.0, 100.0), (10.0, 90.0), (15.0, 70.0), (20.0, 40.0)],
                10.0,
            ),
            breezy: 10.0,
            windy: 15.0,
            very_windy: 20.0,
        }
    }
}

/// Relative weight of each sub-score in the hour score. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub temperature: f64,
    pub rain: f64,
    pub uv: f64,
    pub humidity: f64,
    pub wind: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            temperature: 0.35,
            rain: 0.30,
            uv: 0.15,
            humidity: 0.10,
            wind: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.temperature + self.rain + self.uv + self.humidity + self.wind
    }
}

/// Minimum score for each quality bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityCutoffs {
    pub perfect: u8,
    pub good: u8,
    pub fair: u8,
}

impl Default for QualityCutoffs {
    fn default() -> Self {
        Self {
            perfect: 85,
            good: 70,
            fair: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityRange {
    /// First local hour considered for outdoor play (inclusive).
    pub start_hour: u32,
    /// Last local hour considered for outdoor play (inclusive).
    pub end_hour: u32,
    pub great_day_perfect_hours: usize,
    pub good_opportunity_hours: usize,
    pub limited_window_hours: usize,
    /// Average window temperature above which water play is suggested.
    pub warm_play_temperature: f64,
}

impl Default for ActivityRange {
    fn default() -> Self {
        Self {
            start_hour: 7,
            end_hour: 19,
            great_day_perfect_hours: 4,
            good_opportunity_hours: 4,
            limited_window_hours: 2,
            warm_play_temperature: 72.0,
        }
    }
}

impl ActivityRange {
    pub fn contains(&self, hour: u32) -> bool {
        (self.start_hour..=self.end_hour).contains(&hour)
    }
}

/// Inclusive local hour-of-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.start..=self.end).contains(&hour)
    }
}

/// Age-derived count of extra insulating layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeLayerRule {
    pub max_months: u32,
    pub extra_layers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutfitThresholds {
    pub morning: HourRange,
    pub afternoon: HourRange,
    pub dropoff: HourRange,
    pub pickup: HourRange,

    // Temperature categories (upper bounds, exclusive)
    pub freezing: f64,
    pub cold: f64,
    pub cool: f64,
    pub mild: f64,
    pub warm: f64,

    /// Babies get a onesie under the base layer below this temperature.
    pub baby_onesie_below: f64,
    pub short_sleeves_from: f64,
    pub shorts_from: f64,

    pub age_layers: Vec<AgeLayerRule>,
    /// Degrees the mid-layer decision is shifted per extra layer.
    pub degrees_per_extra_layer: f64,
    pub heavy_mid_below: f64,
    pub medium_mid_below: f64,
    pub light_mid_below: f64,
    /// Afternoon rise that triggers a removable layer.
    pub swing_layer_rise: f64,
    pub swing_notice: f64,

    pub winter_coat_below: f64,
    pub warm_jacket_below: f64,
    pub light_jacket_below: f64,
    pub rain_jacket_at: f64,
    pub rain_shell_at: f64,

    pub rain_boots_at: f64,
    pub recent_rain_at: f64,
    pub warm_boots_below: f64,
    pub sandals_from: f64,

    pub winter_hat_below: f64,
    pub beanie_below: f64,
    pub umbrella_at: f64,

    pub car_seat_below: f64,
    pub toddler_humidity_at: f64,
    pub humidity_feel_at: f64,
    pub humidity_feel_temperature: f64,
}

impl Default for OutfitThresholds {
    fn default() -> Self {
        Self {
            morning: HourRange::new(7, 9),
            afternoon: HourRange::new(14, 16),
            dropoff: HourRange::new(7, 9),
            pickup: HourRange::new(15, 17),
            freezing: 32.0,
            cold: 45.0,
            cool: 60.0,
            mild: 70.0,
            warm: 85.0,
            baby_onesie_below: 65.0,
            short_sleeves_from: 70.0,
            shorts_from: 78.0,
            age_layers: vec![
                AgeLayerRule {
                    max_months: 12,
                    extra_layers: 2,
                },
                AgeLayerRule {
                    max_months: 36,
                    extra_layers: 1,
                },
            ],
            degrees_per_extra_layer: 5.0,
            heavy_mid_below: 45.0,
            medium_mid_below: 55.0,
            light_mid_below: 65.0,
            swing_layer_rise: 15.0,
            swing_notice: 10.0,
            winter_coat_below: 32.0,
            warm_jacket_below: 45.0,
            light_jacket_below: 55.0,
            rain_jacket_at: 50.0,
            rain_shell_at: 30.0,
            rain_boots_at: 50.0,
            recent_rain_at: 50.0,
            warm_boots_below: 45.0,
            sandals_from: 80.0,
            winter_hat_below: 32.0,
            beanie_below: 45.0,
            umbrella_at: 40.0,
            car_seat_below: 45.0,
            toddler_humidity_at: 65.0,
            humidity_feel_at: 70.0,
            humidity_feel_temperature: 75.0,
        }
    }
}

impl OutfitThresholds {
    /// Extra insulating layers for a representative age in months.
    pub fn extra_layers_for(&self, age_months: u32) -> u32 {
        self.age_layers
            .iter()
            .find(|rule| age_months <= rule.max_months)
            .map_or(0, |rule| rule.extra_layers)
    }
}

/// Penalty applied when a value reaches `at_least`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyTier {
    pub at_least: f64,
    pub penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TipThresholds {
    pub dangerous_heat: f64,
    pub hot_day: f64,
    pub dangerous_cold: f64,
    pub freezing: f64,
    pub big_daily_swing: f64,

    pub rain_expected: f64,
    pub heavy_rain: f64,
    pub rain_clears_below: f64,

    pub muggy_humidity: f64,
    pub muggy_temperature: f64,
    pub dry_air: f64,
    pub windy: f64,
    pub strong_wind: f64,
    pub feels_like_gap: f64,

    pub hot_equipment_temperature: f64,
    pub wet_playground_precipitation: f64,

    pub car_seat_below: f64,

    /// Rain penalties for the weekend day score, highest tier first.
    pub weekend_rain_penalties: Vec<PenaltyTier>,
    pub weekend_hot_high: f64,
    pub weekend_hot_penalty: f64,
    pub weekend_warm_high: f64,
    pub weekend_warm_penalty: f64,
    pub weekend_cold_high: f64,
    pub weekend_cold_penalty: f64,
    pub weekend_cool_high: f64,
    pub weekend_cool_penalty: f64,
    pub weekend_good_day: f64,
}

impl Default for TipThresholds {
    fn default() -> Self {
        Self {
            dangerous_heat: 95.0,
            hot_day: 85.0,
            dangerous_cold: 20.0,
            freezing: 32.0,
            big_daily_swing: 20.0,
            rain_expected: 50.0,
            heavy_rain: 80.0,
            rain_clears_below: 30.0,
            muggy_humidity: 80.0,
            muggy_temperature: 75.0,
            dry_air: 25.0,
            windy: 20.0,
            strong_wind: 30.0,
            feels_like_gap: 5.0,
            hot_equipment_temperature: 85.0,
            wet_playground_precipitation: 50.0,
            car_seat_below: 45.0,
            weekend_rain_penalties: vec![
                PenaltyTier {
                    at_least: 70.0,
                    penalty: 50.0,
                },
                PenaltyTier {
                    at_least: 50.0,
                    penalty: 35.0,
                },
                PenaltyTier {
                    at_least: 30.0,
                    penalty: 20.0,
                },
            ],
            weekend_hot_high: 95.0,
            weekend_hot_penalty: 30.0,
            weekend_warm_high: 88.0,
            weekend_warm_penalty: 15.0,
            weekend_cold_high: 40.0,
            weekend_cold_penalty: 30.0,
            weekend_cool_high: 50.0,
            weekend_cool_penalty: 15.0,
            weekend_good_day: 70.0,
        }
    }
}

/// The complete catalog handed to every analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub age_groups: AgeGroupBounds,
    pub temperature: TemperatureBands,
    pub rain: RainBands,
    pub uv: UvBands,
    pub humidity: HumidityBands,
    pub wind: WindBands,
    pub weights: ScoringWeights,
    pub quality: QualityCutoffs,
    pub activity: ActivityRange,
    pub outfit: OutfitThresholds,
    pub tips: TipThresholds,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(AgeGroup::from_age_months(0), AgeGroup::Baby);
        assert_eq!(AgeGroup::from_age_months(12), AgeGroup::Baby);
        assert_eq!(AgeGroup::from_age_months(13), AgeGroup::Toddler);
        assert_eq!(AgeGroup::from_age_months(36), AgeGroup::Toddler);
        assert_eq!(AgeGroup::from_age_months(37), AgeGroup::Preschool);
        assert_eq!(AgeGroup::from_age_months(60), AgeGroup::Preschool);
        assert_eq!(AgeGroup::from_age_months(61), AgeGroup::SchoolAge);
    }

    #[test]
    fn test_age_group_label() {
        assert_eq!(AgeGroup::SchoolAge.label(), "school-age");
        assert_eq!(AgeGroup::Baby.label(), "baby");
    }

    #[test]
    fn test_step_scale_lookup() {
        let rain = RainBands::default();
        assert_eq!(rain.scale.score(0.0), 100.0);
        assert_eq!(rain.scale.score(10.0), 100.0);
        assert_eq!(rain.scale.score(11.0), 85.0);
        assert_eq!(rain.scale.score(70.0), 20.0);
        assert_eq!(rain.scale.score(71.0), 5.0);
    }

    #[test]
    fn test_default_scales_are_monotone() {
        assert!(RainBands::default().scale.is_monotone_decreasing());
        assert!(UvBands::default().scale.is_monotone_decreasing());
        assert!(WindBands::default().scale.is_monotone_decreasing());
    }

    #[test]
    fn test_non_monotone_scale_detected() {
        let scale = StepScale::new(&[(5.0, 50.0), (10.0, 90.0)], 10.0);
        assert!(!scale.is_monotone_decreasing());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ScoringWeights::default().total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_extra_layers_follow_proxy_table() {
        let outfit = OutfitThresholds::default();
        assert_eq!(outfit.extra_layers_for(AgeGroup::Baby.layer_proxy_months()), 2);
        assert_eq!(outfit.extra_layers_for(AgeGroup::Toddler.layer_proxy_months()), 1);
        assert_eq!(outfit.extra_layers_for(AgeGroup::Preschool.layer_proxy_months()), 0);
        assert_eq!(outfit.extra_layers_for(AgeGroup::SchoolAge.layer_proxy_months()), 0);
    }

    #[test]
    fn test_partial_toml_override_keeps_defaults() {
        let toml_src = r#"
            [weights]
            temperature = 0.4
            rain = 0.25

            [activity]
            start_hour = 8
        "#;
        let thresholds: Thresholds = toml::from_str(toml_src).unwrap();
        assert_eq!(thresholds.weights.temperature, 0.4);
        assert_eq!(thresholds.weights.uv, 0.15);
        assert_eq!(thresholds.activity.start_hour, 8);
        assert_eq!(thresholds.activity.end_hour, 19);
        assert_eq!(thresholds.temperature, TemperatureBands::default());
    }

    #[test]
    fn test_hour_range_is_inclusive() {
        let range = HourRange::new(7, 9);
        assert!(range.contains(7));
        assert!(range.contains(9));
        assert!(!range.contains(10));
    }
}
