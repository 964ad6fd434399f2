use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum stored length, in characters, of each text column
pub const NAME_MAX: usize = 1000;
pub const ADDRESS_MAX: usize = 255;
pub const CITY_MAX: usize = 100;
pub const PHONE_MAX: usize = 20;
pub const URL_MAX: usize = 500;
pub const PLACE_ID_MAX: usize = 255;
pub const PHOTO_URL_MAX: usize = 500;

/// A tourist attraction as persisted in the `spots` table.
///
/// `name` is the identity key: once a spot with a given name exists it is
/// never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub rating: Option<f64>,
    pub place_id: Option<String>,
    pub opening_hours: Option<Vec<String>>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Counters reported at the end of a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub pages: u32,
    pub created: u64,
    pub skipped: u64,
}
