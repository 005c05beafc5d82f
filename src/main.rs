use std::sync::Arc;

use anyhow::Result;
use tinycast_core::{AppError, Config, TemperatureUnit};
use tinycast_engine::{Child, ClothingLayer, RecommendationEngine, Recommendations};
use tinycast_weather::{
    Coordinates, FetchOptions, FileStore, ProviderSettings, WeatherCache, WeatherData,
    WeatherProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    tinycast_core::init()?;

    let (config, _) = Config::load_validated()?;
    let force_refresh = std::env::args().any(|arg| arg == "--refresh");

    let weather = match fetch_weather(&config, force_refresh).await {
        Ok(weather) => weather,
        Err(e) => {
            tracing::error!("Weather fetch failed: {}", e);
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };

    let bounds = &config.thresholds.age_groups;
    let children: Vec<Child> = config
        .children
        .iter()
        .map(|child| Child::with_bounds(child.name.clone(), child.age_months, bounds))
        .collect();
    let engine = RecommendationEngine::new(config.thresholds.clone());
    let recommendations = engine.recommend(Some(&weather), &children);

    print_briefing(&weather, &recommendations, config.display.temperature_unit);
    Ok(())
}

async fn fetch_weather(config: &Config, force_refresh: bool) -> Result<WeatherData, AppError> {
    let settings = ProviderSettings::from_config(config)?;
    let mut provider = WeatherProvider::new(settings)?;
    if config.cache.enabled {
        let store = Arc::new(FileStore::new(&config.config_dir.join("cache")));
        provider = provider.with_cache(WeatherCache::new(store, config.cache.key.clone()));
    }

    let location = Coordinates::new(config.location.latitude, config.location.longitude);
    let options = FetchOptions {
        use_cache: config.cache.enabled,
        force_refresh,
    };

    Ok(provider.fetch_or_last_known_good(location, options).await?)
}

fn print_briefing(weather: &WeatherData, recs: &Recommendations, unit: TemperatureUnit) {
    let current = &weather.current;
    println!("TinyCast - {}", weather.fetched_at.format("%A %B %-d"));
    println!(
        "Now: {} (feels like {}), {}",
        unit.format(current.temperature),
        unit.format(current.feels_like),
        current.condition.description()
    );

    if let Some(tips) = &recs.tips {
        for alert in &tips.alerts {
            println!("\n!! {}: {}", alert.title, alert.message);
        }
    }

    for outfit in &recs.outfits {
        println!(
            "\n{} ({}): {}",
            outfit.child_name,
            outfit.age_group.label(),
            outfit.summary
        );
        println!(
            "  Morning {}, afternoon {}",
            unit.format(outfit.morning_temperature),
            unit.format(outfit.afternoon_temperature)
        );
        for item in &outfit.items {
            let packed = if item.required { "" } else { " (pack)" };
            let marker = match item.layer {
                ClothingLayer::Accessory => "+",
                _ => "-",
            };
            println!("  {} {}{}", marker, item.name, packed);
        }
        for tip in &outfit.tips {
            println!("  * {}", tip);
        }
    }

    if let Some(activity) = &recs.activity {
        println!("\nOutdoor play: {}", activity.summary);
        for window in &activity.windows {
            println!(
                "  {:<12} {:<8} {} ({})",
                window.label,
                window.quality.label(),
                window.description,
                unit.format(window.average_temperature)
            );
        }
        if let Some(best) = &activity.best_window {
            println!("  Best window: {}", best.label);
        }
    }

    if let Some(tips) = &recs.tips {
        let rest: Vec<_> = tips
            .tips
            .iter()
            .filter(|tip| tip.priority != tinycast_engine::TipPriority::High)
            .collect();
        if !rest.is_empty() {
            println!("\nTips:");
            for tip in rest {
                match &tip.action {
                    Some(action) => println!("  {}: {} [{}]", tip.title, tip.message, action),
                    None => println!("  {}: {}", tip.title, tip.message),
                }
            }
        }
    }
}
