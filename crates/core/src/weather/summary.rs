//! Turns a raw multi-day forecast into clothing and activity advice.
//!
//! Every day is judged on its own; the only cross-day work is the aggregate
//! averages and the conditions sentence at the end.

use crate::weather::{ForecastDay, RawForecast, WeatherError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Below this much rain a day can still count as good weather.
const GOOD_WEATHER_MAX_PRECIP_MM: f64 = 5.0;

const OUTDOOR_GENERAL: &[&str] = &[
    "Sightseeing tours",
    "Walking tours",
    "Outdoor dining",
    "Parks and gardens",
    "Photography walks",
];

const OUTDOOR_WARM: &[&str] = &[
    "Beach activities",
    "Outdoor swimming",
    "Boat tours",
    "Outdoor cafes",
];

const OUTDOOR_MILD: &[&str] = &[
    "Hiking",
    "Biking tours",
    "Outdoor markets",
    "Wildlife watching",
    "Picnics",
];

const OUTDOOR_COLD: &[&str] = &["Winter sports", "Scenic drives", "Hot springs (if available)"];

const INDOOR: &[&str] = &[
    "Museum visits",
    "Indoor shopping",
    "Local food tour",
    "Cooking classes",
    "Spa treatments",
    "Art galleries",
    "Local theaters or performances",
    "Indoor markets",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecommendation {
    pub date: NaiveDate,
    pub condition: String,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    #[serde(rename = "clothing_recommendations")]
    pub clothing: Vec<String>,
    #[serde(rename = "activity_recommendations")]
    pub recommended_activities: Vec<String>,
    pub alternative_activities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub location: String,
    pub forecast_days: usize,
    pub avg_max_temp_c: f64,
    pub avg_min_temp_c: f64,
    pub conditions_summary: String,
    pub daily_forecasts: Vec<DailyRecommendation>,
}

/// Wardrobe bucket keyed on the midpoint of the day's max and min temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureTier {
    /// below 0°C
    Freezing,
    /// 0°C up to 10°C
    Cold,
    /// 10°C up to 20°C
    Cool,
    /// 20°C up to 25°C
    Mild,
    /// 25°C and above
    Hot,
}

impl TemperatureTier {
    pub fn from_midpoint(temp_c: f64) -> Self {
        if temp_c < 0.0 {
            TemperatureTier::Freezing
        } else if temp_c < 10.0 {
            TemperatureTier::Cold
        } else if temp_c < 20.0 {
            TemperatureTier::Cool
        } else if temp_c < 25.0 {
            TemperatureTier::Mild
        } else {
            TemperatureTier::Hot
        }
    }

    pub fn base_wardrobe(self) -> &'static [&'static str] {
        match self {
            TemperatureTier::Freezing => &[
                "Heavy winter coat",
                "Thermal underlayers",
                "Winter hat",
                "Gloves",
                "Scarf",
                "Insulated boots",
            ],
            TemperatureTier::Cold => &["Winter coat", "Sweater/layers", "Light gloves", "Warm hat"],
            TemperatureTier::Cool => &[
                "Light jacket or coat",
                "Long sleeves",
                "Light scarf",
                "Closed-toe shoes",
            ],
            TemperatureTier::Mild => &[
                "Light layers",
                "Long or short sleeves",
                "Light pants or long shorts",
            ],
            TemperatureTier::Hot => &[
                "Light breathable clothing",
                "Short sleeves",
                "Shorts or light pants",
                "Sun hat",
            ],
        }
    }
}

/// Base wardrobe for the temperature, then extras for every condition keyword that matches.
pub fn clothing_for(mid_temp_c: f64, condition: &str) -> Vec<String> {
    let mut out: Vec<String> = TemperatureTier::from_midpoint(mid_temp_c)
        .base_wardrobe()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let condition = condition.to_lowercase();
    let has = |keyword: &str| condition.contains(keyword);

    if has("rain") || has("drizzle") || has("shower") {
        out.extend(["Waterproof jacket", "Umbrella", "Waterproof shoes"].map(String::from));
    }
    if has("snow") {
        out.extend(["Waterproof boots", "Snow-appropriate outerwear"].map(String::from));
    }
    if has("sun") || has("clear") {
        out.extend(["Sunglasses", "Sunscreen", "Brimmed hat"].map(String::from));
    }
    if has("wind") {
        out.push("Windbreaker".to_string());
    }

    out
}

pub fn is_good_weather(day: &ForecastDay) -> bool {
    let condition = day.condition.to_lowercase();
    day.precip_mm < GOOD_WEATHER_MAX_PRECIP_MM
        && !condition.contains("rain")
        && !condition.contains("storm")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityPlan {
    pub recommended: Vec<String>,
    pub alternatives: Vec<String>,
}

pub fn activities_for(day: &ForecastDay) -> ActivityPlan {
    let indoor = to_strings(INDOOR);
    if !is_good_weather(day) {
        return ActivityPlan {
            recommended: indoor,
            alternatives: Vec::new(),
        };
    }

    let avg_temp = day.mid_temp_c();
    let second_tier = if avg_temp > 20.0 {
        OUTDOOR_WARM
    } else if avg_temp > 10.0 {
        OUTDOOR_MILD
    } else {
        OUTDOOR_COLD
    };

    let mut recommended = to_strings(OUTDOOR_GENERAL);
    recommended.extend(second_tier.iter().map(|s| s.to_string()));

    ActivityPlan {
        recommended,
        alternatives: indoor,
    }
}

pub fn recommend_day(day: &ForecastDay) -> DailyRecommendation {
    let activities = activities_for(day);
    DailyRecommendation {
        date: day.date,
        condition: day.condition.clone(),
        max_temp_c: day.max_temp_c,
        min_temp_c: day.min_temp_c,
        clothing: clothing_for(day.mid_temp_c(), &day.condition),
        recommended_activities: activities.recommended,
        alternative_activities: activities.alternatives,
    }
}

/// Summarizes the first `min(duration, available)` forecast days.
pub fn summarize(forecast: &RawForecast, duration: u32) -> Result<WeatherSummary, WeatherError> {
    let effective_days = (duration as usize).min(forecast.days.len());
    if effective_days == 0 {
        return Err(WeatherError::EmptyForecast);
    }

    let daily_forecasts: Vec<DailyRecommendation> = forecast.days[..effective_days]
        .iter()
        .map(recommend_day)
        .collect();

    let n = effective_days as f64;
    let avg_max_temp_c = daily_forecasts.iter().map(|d| d.max_temp_c).sum::<f64>() / n;
    let avg_min_temp_c = daily_forecasts.iter().map(|d| d.min_temp_c).sum::<f64>() / n;

    let conditions: Vec<&str> = daily_forecasts.iter().map(|d| d.condition.as_str()).collect();

    Ok(WeatherSummary {
        location: format!("{}, {}", forecast.location_name, forecast.country),
        forecast_days: effective_days,
        avg_max_temp_c,
        avg_min_temp_c,
        conditions_summary: summarize_conditions(&conditions),
        daily_forecasts,
    })
}

/// One sentence describing the trip's weather.
///
/// Conditions are ranked by frequency; ties keep the order they were first seen in.
pub fn summarize_conditions(conditions: &[&str]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for &condition in conditions {
        match counts.iter_mut().find(|(c, _)| *c == condition) {
            Some((_, n)) => *n += 1,
            None => counts.push((condition, 1)),
        }
    }
    // stable: equal counts stay in encounter order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let Some(&(main, main_count)) = counts.first() else {
        return String::new();
    };

    if counts.len() == 1 {
        return format!("Consistently {main} throughout your trip");
    }

    if main_count * 2 >= conditions.len() {
        let others: Vec<&str> = counts[1..].iter().map(|(c, _)| *c).collect();
        format!("Mostly {main} with some {}", others.join(", "))
    } else {
        let top: Vec<&str> = counts.iter().take(3).map(|(c, _)| *c).collect();
        format!("Variable conditions including {}", top.join(", "))
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::forecast_day;

    fn raw(days: Vec<ForecastDay>) -> RawForecast {
        RawForecast {
            location_name: "Paris".to_string(),
            country: "France".to_string(),
            days,
        }
    }

    #[test]
    fn temperature_tiers_partition_at_boundaries() {
        assert_eq!(TemperatureTier::from_midpoint(-0.1), TemperatureTier::Freezing);
        assert_eq!(TemperatureTier::from_midpoint(0.0), TemperatureTier::Cold);
        assert_eq!(TemperatureTier::from_midpoint(9.9), TemperatureTier::Cold);
        assert_eq!(TemperatureTier::from_midpoint(10.0), TemperatureTier::Cool);
        assert_eq!(TemperatureTier::from_midpoint(19.9), TemperatureTier::Cool);
        assert_eq!(TemperatureTier::from_midpoint(20.0), TemperatureTier::Mild);
        assert_eq!(TemperatureTier::from_midpoint(24.9), TemperatureTier::Mild);
        assert_eq!(TemperatureTier::from_midpoint(25.0), TemperatureTier::Hot);
    }

    #[test]
    fn condition_extras_are_case_insensitive_and_additive() {
        let clothing = clothing_for(15.0, "Light Rain and Wind");
        assert_eq!(clothing[0], "Light jacket or coat");
        assert!(clothing.contains(&"Umbrella".to_string()));
        assert!(clothing.contains(&"Windbreaker".to_string()));
        assert!(!clothing.contains(&"Sunscreen".to_string()));

        let clothing = clothing_for(-3.0, "Patchy light SNOW showers");
        assert!(clothing.contains(&"Heavy winter coat".to_string()));
        assert!(clothing.contains(&"Snow-appropriate outerwear".to_string()));
        assert!(clothing.contains(&"Waterproof jacket".to_string()));
    }

    #[test]
    fn good_weather_hinges_on_precipitation_and_keywords() {
        let day = forecast_day(0, "Partly cloudy", 30.0, -10.0, 4.9);
        assert!(is_good_weather(&day));

        let day = forecast_day(0, "Partly cloudy", 30.0, 20.0, 6.0);
        assert!(!is_good_weather(&day));

        let day = forecast_day(0, "Thunderstorm", 30.0, 20.0, 0.0);
        assert!(!is_good_weather(&day));

        let day = forecast_day(0, "Moderate Rain", 30.0, 20.0, 0.0);
        assert!(!is_good_weather(&day));
    }

    #[test]
    fn bad_weather_day_has_indoor_plan_and_no_alternatives() {
        let plan = activities_for(&forecast_day(0, "Heavy rain", 18.0, 12.0, 20.0));
        assert_eq!(plan.recommended[0], "Museum visits");
        assert_eq!(plan.recommended.len(), 8);
        assert!(plan.alternatives.is_empty());
    }

    #[test]
    fn good_weather_second_tier_follows_average_temperature() {
        let warm = activities_for(&forecast_day(0, "Sunny", 30.0, 22.0, 0.0));
        assert!(warm.recommended.contains(&"Beach activities".to_string()));
        assert_eq!(warm.alternatives.len(), 8);

        // exactly 20 is not "above 20"
        let mild = activities_for(&forecast_day(0, "Sunny", 24.0, 16.0, 0.0));
        assert!(mild.recommended.contains(&"Hiking".to_string()));

        let cold = activities_for(&forecast_day(0, "Clear", 8.0, 2.0, 0.0));
        assert!(cold.recommended.contains(&"Winter sports".to_string()));
        assert_eq!(cold.recommended[0], "Sightseeing tours");
    }

    #[test]
    fn truncates_to_available_days() {
        let days = (0..5)
            .map(|i| forecast_day(i, "Sunny", 20.0, 10.0, 0.0))
            .collect();
        let summary = summarize(&raw(days), 10).unwrap();
        assert_eq!(summary.forecast_days, 5);
        assert_eq!(summary.daily_forecasts.len(), 5);
        assert_eq!(summary.location, "Paris, France");
    }

    #[test]
    fn truncates_to_duration_and_averages_selected_days_only() {
        let days = vec![
            forecast_day(0, "Sunny", 20.0, 10.0, 0.0),
            forecast_day(1, "Sunny", 30.0, 20.0, 0.0),
            forecast_day(2, "Sunny", 99.0, 99.0, 0.0),
        ];
        let summary = summarize(&raw(days), 2).unwrap();
        assert_eq!(summary.forecast_days, 2);
        assert_eq!(summary.avg_max_temp_c, 25.0);
        assert_eq!(summary.avg_min_temp_c, 15.0);
    }

    #[test]
    fn empty_forecast_is_an_error() {
        let err = summarize(&raw(Vec::new()), 3).unwrap_err();
        assert!(matches!(err, WeatherError::EmptyForecast));
    }

    #[test]
    fn conditions_summary_wording() {
        assert_eq!(
            summarize_conditions(&["Sunny", "Sunny", "Sunny"]),
            "Consistently Sunny throughout your trip"
        );
        assert_eq!(
            summarize_conditions(&["Sunny", "Sunny", "Rain", "Cloudy"]),
            "Mostly Sunny with some Rain, Cloudy"
        );
        assert_eq!(
            summarize_conditions(&["Fog", "Rain", "Sunny", "Cloudy", "Rain"]),
            "Variable conditions including Rain, Fog, Sunny"
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        assert_eq!(
            summarize_conditions(&["Cloudy", "Sunny", "Sunny", "Cloudy"]),
            "Mostly Cloudy with some Sunny"
        );
        assert_eq!(
            summarize_conditions(&["Fog", "Rain", "Sunny", "Cloudy"]),
            "Variable conditions including Fog, Rain, Sunny"
        );
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let day = recommend_day(&forecast_day(0, "Sunny", 30.0, 25.0, 0.0));
        let v = serde_json::to_value(&day).unwrap();
        assert!(v.get("clothing_recommendations").is_some());
        assert!(v.get("activity_recommendations").is_some());
        assert!(v.get("alternative_activities").is_some());
    }
}
