use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripmate_core::domain::itinerary::{ItineraryResult, WeatherOutcome};
use tripmate_core::domain::request::{
    normalize_interests, Accommodation, TravelRequest, DEFAULT_BUDGET, DEFAULT_DURATION_DAYS,
};
use tripmate_core::itinerary::ItineraryAssembler;

#[derive(Debug, Parser)]
#[command(name = "tripmate", about = "Plan a weather-aware trip from the terminal")]
struct Args {
    /// Where the trip goes.
    destination: String,

    /// Where the trip starts. Adds a transport search when set.
    #[arg(long)]
    source: Option<String>,

    /// Total budget in USD.
    #[arg(long, default_value_t = DEFAULT_BUDGET, value_parser = clap::value_parser!(u32).range(100..=50_000))]
    budget: u32,

    /// Trip length in days.
    #[arg(long, default_value_t = DEFAULT_DURATION_DAYS, value_parser = clap::value_parser!(u32).range(1..=45))]
    duration: u32,

    /// Repeat for several interests.
    #[arg(long = "interest")]
    interests: Vec<String>,

    /// Budget, Mid-range, Luxury, Hostel or Airbnb.
    #[arg(long, default_value = "Budget")]
    accommodation: Accommodation,

    #[arg(long)]
    dietary: Option<String>,

    /// First day of the trip (YYYY-MM-DD).
    #[arg(long)]
    start_date: Option<String>,

    #[arg(long)]
    weather_preference: Option<String>,

    /// Print the full result as JSON instead of the itinerary text.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn into_request(self) -> anyhow::Result<TravelRequest> {
        let start_date = self
            .start_date
            .as_deref()
            .map(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .transpose()
            .context("--start-date must be YYYY-MM-DD")?;

        let request = TravelRequest {
            source: self.source,
            destination: self.destination.trim().to_string(),
            budget: self.budget,
            duration: self.duration,
            interests: normalize_interests(&self.interests),
            accommodation: self.accommodation,
            dietary: self.dietary.unwrap_or_default(),
            start_date,
            weather_preference: self.weather_preference,
        };
        request.validate()?;
        Ok(request)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = tripmate_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let json = args.json;
    let request = args.into_request()?;

    let assembler = ItineraryAssembler::from_settings(&settings)?;

    let result = match assembler.assemble(&request).await {
        Ok(result) => result,
        Err(err) => {
            let err = anyhow::Error::new(err);
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(destination = %request.destination, error = %err, "itinerary run failed");
            return Err(err);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_text(&result));
    }
    Ok(())
}

fn render_text(result: &ItineraryResult) -> String {
    let mut out = String::new();
    match &result.weather_data {
        WeatherOutcome::Summary(summary) => {
            out.push_str(&format!(
                "Weather for {}: {} (avg {:.1}°C / {:.1}°C)\n",
                summary.location,
                summary.conditions_summary,
                summary.avg_max_temp_c,
                summary.avg_min_temp_c
            ));
            for day in &summary.daily_forecasts {
                out.push_str(&format!(
                    "  {} {}: wear {}\n",
                    day.date,
                    day.condition,
                    day.clothing.join(", ")
                ));
            }
        }
        WeatherOutcome::Failed { error, details } => {
            out.push_str(&format!("Weather: {error} ({details})\n"));
        }
    }
    out.push('\n');
    out.push_str(result.ai_generated_itinerary.trim_end());
    out.push('\n');

    if !result.transport_options.is_empty() {
        out.push_str("\nGetting there:\n");
        for option in &result.transport_options {
            out.push_str(&format!("  - {} <{}>\n", option.title, option.link));
        }
    }
    out
}

fn init_sentry(settings: &tripmate_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
