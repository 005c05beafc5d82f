//! Recommendation engine for TinyCast
//!
//! Three independent analyzers read a [`WeatherData`] snapshot: the activity
//! window analyzer, the per-child outfit composer and the smart tips
//! generator. [`RecommendationEngine`] runs all three against one threshold
//! catalog.

pub mod activity;
pub mod child;
pub mod outfit;
pub mod tips;

#[cfg(test)]
mod test_support;

pub use activity::{
    analyze_activity_windows, ActivityAnalysis, ActivityHour, ActivityWindow, Quality,
};
pub use child::Child;
pub use outfit::{
    generate_all_outfit_recommendations, generate_outfit_recommendation, ClothingItem,
    ClothingLayer, OutfitRecommendation, TempCategory,
};
pub use tips::{
    generate_smart_tips, SmartTip, SmartTipsResult, TipCategory, TipPriority, TipType,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tinycast_core::Thresholds;
use tinycast_weather::WeatherData;

/// Everything the engine derives from one weather snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub outfits: Vec<OutfitRecommendation>,
    pub activity: Option<ActivityAnalysis>,
    pub tips: Option<SmartTipsResult>,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    thresholds: Thresholds,
}

impl RecommendationEngine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Run every analyzer. Without weather, all results are empty.
    pub fn recommend(&self, weather: Option<&WeatherData>, children: &[Child]) -> Recommendations {
        self.recommend_at(weather, children, Utc::now())
    }

    pub fn recommend_at(
        &self,
        weather: Option<&WeatherData>,
        children: &[Child],
        now: DateTime<Utc>,
    ) -> Recommendations {
        let Some(weather) = weather else {
            tracing::debug!("No weather data yet, skipping recommendations");
            return Recommendations::default();
        };

        Recommendations {
            outfits: outfit::generate_all_outfit_recommendations_at(
                children,
                Some(weather),
                &self.thresholds,
                now,
            ),
            activity: analyze_activity_windows(weather, &self.thresholds),
            tips: Some(tips::generate_smart_tips_at(weather, &self.thresholds, now)),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::test_support::{base_time, flat_day};

    #[test]
    fn test_no_weather_gives_neutral_results() {
        let engine = RecommendationEngine::default();
        let result = engine.recommend(None, &[Child::new("Ada", 8)]);

        assert!(result.outfits.is_empty());
        assert!(result.activity.is_none());
        assert!(result.tips.is_none());
    }

    #[test]
    fn test_no_children_still_analyzes_the_day() {
        let engine = RecommendationEngine::default();
        let weather = flat_day(68.0);
        let result = engine.recommend_at(Some(&weather), &[], base_time());

        assert!(result.outfits.is_empty());
        assert!(result.activity.is_some());
        assert!(result.tips.is_some());
    }

    #[test]
    fn test_hot_day_end_to_end() {
        let engine = RecommendationEngine::default();
        let weather = flat_day(96.0);
        let children = [Child::new("Ada", 8), Child::new("Ben", 50)];

        let result = engine.recommend_at(Some(&weather), &children, base_time());

        assert_eq!(result.outfits.len(), 2);
        assert!(result
            .outfits
            .iter()
            .all(|o| o.temp_category == TempCategory::Hot));
        let tips = result.tips.unwrap();
        assert_eq!(tips.primary_tip.unwrap().title, "Dangerous Heat");
        let activity = result.activity.unwrap();
        assert!(activity.hours.iter().all(|h| h.quality == Quality::Skip));
        assert!(activity.best_window.is_none());
    }

    #[test]
    fn test_custom_thresholds_flow_through() {
        let mut thresholds = Thresholds::default();
        thresholds.tips.dangerous_heat = 110.0;
        let engine = RecommendationEngine::new(thresholds);

        let tips = engine
            .recommend_at(Some(&flat_day(96.0)), &[], base_time())
            .tips
            .unwrap();

        assert!(tips.tips.iter().all(|t| t.title != "Dangerous Heat"));
        assert_eq!(engine.thresholds().tips.dangerous_heat, 110.0);
    }

    #[test]
    fn test_recommendations_serialize_with_lowercase_tags() {
        let engine = RecommendationEngine::default();
        let result = engine.recommend_at(
            Some(&flat_day(96.0)),
            &[Child::new("Ada", 8)],
            base_time(),
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outfits"][0]["temp_category"], "hot");
        assert_eq!(json["outfits"][0]["age_group"], "baby");
        assert_eq!(json["tips"]["primary_tip"]["priority"], "high");
        assert_eq!(json["tips"]["primary_tip"]["tip_type"], "alert");
        assert_eq!(json["activity"]["hours"][0]["quality"], "skip");
    }
}
