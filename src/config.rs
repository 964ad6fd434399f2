use crate::error::SeedError;
use crate::places::client::DEFAULT_BASE_URL;
use crate::places::normalize::PhotoSettings;
use crate::places::SearchQuery;
use crate::seeder::SeederOptions;
use clap::Parser;
use std::time::Duration;

/// Environment variable holding the Places API key
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Seed the spots table with tourist attractions from the Google Places API.
///
/// The API key is read from the `GOOGLE_API_KEY` environment variable.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Latitude of the search center
    #[arg(long, default_value_t = 25.0330, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude of the search center
    #[arg(long, default_value_t = 121.5654, allow_negative_numbers = true)]
    pub lng: f64,

    /// Search radius in meters
    #[arg(long, default_value_t = 50_000.0)]
    pub radius: f64,

    /// Number of result pages to fetch, up to 20 places each
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Database to seed
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://spots.db")]
    pub database_url: String,

    /// Seconds to wait between page requests
    #[arg(long, value_name = "SECONDS", default_value_t = 2)]
    pub page_delay_secs: u64,

    /// Language for place names and addresses
    #[arg(long, default_value = "zh-TW")]
    pub language: String,

    /// Region used to format addresses and phone numbers
    #[arg(long, default_value = "TW")]
    pub region: String,

    /// Maximum width in pixels of stored photo URLs
    #[arg(long, value_name = "PX", default_value_t = 800)]
    pub photo_max_width: u32,
}

/// Fully resolved run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub database_url: String,
    pub seeder: SeederOptions,
}

impl Config {
    /// Combine CLI options with the credential returned by `lookup`.
    ///
    /// A missing or empty key is a configuration error.
    pub fn resolve<F>(cli: Cli, lookup: F) -> Result<Self, SeedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(SeedError::MissingApiKey { var: API_KEY_VAR })?;

        let seeder = SeederOptions {
            query: SearchQuery {
                latitude: cli.lat,
                longitude: cli.lng,
                radius: cli.radius,
                language_code: cli.language,
                region_code: cli.region,
            },
            pages: cli.pages.max(1),
            page_delay: Duration::from_secs(cli.page_delay_secs),
            photos: PhotoSettings {
                media_base_url: DEFAULT_BASE_URL.to_string(),
                max_width_px: cli.photo_max_width,
                api_key: api_key.clone(),
            },
        };

        Ok(Self {
            api_key,
            database_url: cli.database_url,
            seeder,
        })
    }
}
