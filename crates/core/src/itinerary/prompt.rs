//! Generation prompt for an itinerary.
//!
//! The builder owns the field set (trip parameters, weather, web results,
//! transport results); rendering to text happens in one place so another
//! generator back-end only needs a different `render`.

use crate::domain::itinerary::WeatherOutcome;
use crate::domain::request::TravelRequest;
use crate::search::SearchResult;

pub const REQUIREMENTS: [&str; 9] = [
    "Personalized day-by-day breakdown",
    "Activities matching specific interests",
    "Budget-conscious recommendations",
    "Detailed accommodation suggestions",
    "Dining options considering dietary needs",
    "Transportation logistics",
    "Cultural insights and local experiences",
    "Weather-appropriate activities and clothing for each day",
    "Indoor alternatives for days with poor weather",
];

pub const OUTPUT_SECTIONS: [&str; 6] = [
    "Overall trip overview",
    "Weather outlook and packing list",
    "Detailed day-by-day itinerary",
    "Getting there and getting around",
    "Budget breakdown",
    "Travel tips and local recommendations",
];

#[derive(Debug, Clone)]
pub struct ItineraryPrompt<'a> {
    request: &'a TravelRequest,
    weather: Option<&'a WeatherOutcome>,
    web_results: &'a [SearchResult],
    transport: Option<&'a [SearchResult]>,
}

impl<'a> ItineraryPrompt<'a> {
    pub fn new(request: &'a TravelRequest) -> Self {
        Self {
            request,
            weather: None,
            web_results: &[],
            transport: None,
        }
    }

    pub fn weather(mut self, weather: &'a WeatherOutcome) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn web_results(mut self, results: &'a [SearchResult]) -> Self {
        self.web_results = results;
        self
    }

    /// Adds the transport section. Only set when the trip has an origin.
    pub fn transport(mut self, results: &'a [SearchResult]) -> Self {
        self.transport = Some(results);
        self
    }

    pub fn render(&self) -> Result<String, serde_json::Error> {
        let r = self.request;
        let mut out = format!(
            "Create a comprehensive {}-day travel plan for {}\n",
            r.duration, r.destination
        );

        out.push_str("\nTravel Context:\n");
        if let Some(source) = r.source() {
            out.push_str(&format!("- Traveling From: {source}\n"));
        }
        out.push_str(&format!("- Budget: ${}\n", r.budget));
        out.push_str(&format!("- Duration: {} days\n", r.duration));
        if let Some(start) = r.start_date {
            out.push_str(&format!("- Start Date: {}\n", start.format("%Y-%m-%d")));
        }
        out.push_str(&format!("- Interests: {}\n", r.interests.join(", ")));
        out.push_str(&format!("- Accommodation: {}\n", r.accommodation));
        out.push_str(&format!("- Dietary Needs: {}\n", r.dietary_or_default()));
        if let Some(pref) = r.weather_preference.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            out.push_str(&format!("- Weather Preference: {pref}\n"));
        }

        out.push_str("\nWeather Forecast:\n");
        match self.weather {
            Some(WeatherOutcome::Summary(summary)) => {
                out.push_str(&serde_json::to_string_pretty(summary)?);
                out.push('\n');
            }
            Some(WeatherOutcome::Failed { error, details }) => {
                out.push_str(&format!("Weather data unavailable ({error}: {details})\n"));
            }
            None => out.push_str("Weather data unavailable\n"),
        }

        out.push_str("\nWeb Search Insights:\n");
        out.push_str(&serde_json::to_string_pretty(self.web_results)?);
        out.push('\n');

        if let Some(transport) = self.transport {
            out.push_str("\nTransportation Options:\n");
            out.push_str(&serde_json::to_string_pretty(transport)?);
            out.push('\n');
        }

        out.push_str("\nItinerary Requirements:\n");
        for (i, requirement) in REQUIREMENTS.iter().enumerate() {
            out.push_str(&format!("{}. {requirement}\n", i + 1));
        }

        out.push_str("\nProvide a structured response with:\n");
        for section in OUTPUT_SECTIONS {
            out.push_str(&format!("- {section}\n"));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherError;

    fn request() -> TravelRequest {
        let mut r = TravelRequest::new("Paris", 3).unwrap();
        r.budget = 1000;
        r.interests = vec!["Food".to_string(), "History".to_string()];
        r
    }

    #[test]
    fn includes_trip_parameters_and_fixed_bullets() {
        let request = request();
        let text = ItineraryPrompt::new(&request).render().unwrap();

        assert!(text.starts_with("Create a comprehensive 3-day travel plan for Paris"));
        assert!(text.contains("- Budget: $1000"));
        assert!(text.contains("- Interests: Food, History"));
        assert!(text.contains("- Accommodation: Budget"));
        assert!(text.contains("- Dietary Needs: No restrictions"));
        assert!(text.contains("9. Indoor alternatives for days with poor weather"));
        assert_eq!(
            text.lines().filter(|l| l.starts_with("- ")).count(),
            5 + OUTPUT_SECTIONS.len()
        );
        assert!(!text.contains("Transportation Options"));
        assert!(!text.contains("Traveling From"));
    }

    #[test]
    fn start_date_and_weather_preference_lines_when_set() {
        let mut request = request();
        request.start_date = chrono::NaiveDate::from_ymd_opt(2026, 6, 1);
        request.weather_preference = Some("  Warm and dry ".to_string());

        let text = ItineraryPrompt::new(&request).render().unwrap();
        let context: Vec<&str> = text
            .lines()
            .skip_while(|l| *l != "Travel Context:")
            .take_while(|l| !l.is_empty())
            .collect();
        assert_eq!(
            context,
            vec![
                "Travel Context:",
                "- Budget: $1000",
                "- Duration: 3 days",
                "- Start Date: 2026-06-01",
                "- Interests: Food, History",
                "- Accommodation: Budget",
                "- Dietary Needs: No restrictions",
                "- Weather Preference: Warm and dry",
            ]
        );

        request.weather_preference = Some("   ".to_string());
        let text = ItineraryPrompt::new(&request).render().unwrap();
        assert!(!text.contains("Weather Preference"));
    }

    #[test]
    fn transport_section_only_when_set() {
        let mut request = request();
        request.source = Some("Lyon".to_string());
        let transport = vec![SearchResult {
            title: "TGV Lyon to Paris".to_string(),
            ..Default::default()
        }];

        let text = ItineraryPrompt::new(&request)
            .transport(&transport)
            .render()
            .unwrap();
        assert!(text.contains("- Traveling From: Lyon"));
        assert!(text.contains("Transportation Options:"));
        assert!(text.contains("TGV Lyon to Paris"));
    }

    #[test]
    fn failed_weather_leaves_placeholder() {
        let request = request();
        let weather = WeatherOutcome::from_result(Err(WeatherError::EmptyForecast));
        let text = ItineraryPrompt::new(&request)
            .weather(&weather)
            .render()
            .unwrap();
        assert!(text.contains("Weather data unavailable (Failed to fetch weather data:"));
    }
}
