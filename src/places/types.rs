use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Place category requested from the search endpoint
pub const TOURIST_ATTRACTION: &str = "tourist_attraction";

/// Upper bound the API accepts for results per page
pub const MAX_RESULT_COUNT: u32 = 20;

/// Geographic query parameters for a nearby search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Circle center latitude
    pub latitude: f64,
    /// Circle center longitude
    pub longitude: f64,
    /// Circle radius in meters
    pub radius: f64,
    /// Language for localized fields, e.g. display names
    pub language_code: String,
    /// Region used to format addresses and phone numbers
    pub region_code: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        // Taipei 101
        Self {
            latitude: 25.0330,
            longitude: 121.5654,
            radius: 50_000.0,
            language_code: "zh-TW".to_string(),
            region_code: "TW".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNearbyRequest {
    pub language_code: String,
    pub region_code: String,
    pub included_types: Vec<String>,
    pub max_result_count: u32,
    pub rank_preference: String,
    pub location_restriction: LocationRestriction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl SearchNearbyRequest {
    /// Build the request for one page; `page_token` is `None` on the first page.
    pub fn new(query: &SearchQuery, page_token: Option<String>) -> Self {
        Self {
            language_code: query.language_code.clone(),
            region_code: query.region_code.clone(),
            included_types: vec![TOURIST_ATTRACTION.to_string()],
            max_result_count: MAX_RESULT_COUNT,
            rank_preference: "POPULARITY".to_string(),
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: LatLng {
                        latitude: query.latitude,
                        longitude: query.longitude,
                    },
                    radius: query.radius,
                },
            },
            page_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRestriction {
    pub circle: Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    pub center: LatLng,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Decode a field as `T`, or `None` when it is missing or has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a list, dropping entries that do not fit `T`; a non-array is empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// One page of nearby-search results
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNearbyResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub places: Vec<Place>,
    #[serde(default, deserialize_with = "lenient")]
    pub next_page_token: Option<String>,
}

/// A place as returned by the API, restricted to the requested field mask.
///
/// Every field decodes on its own: a wrong type blanks that field only.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<LocalizedText>,
    #[serde(default, deserialize_with = "lenient")]
    pub formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub short_formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<RawLocation>,
    /// Raw JSON, coerced when normalizing
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub website_uri: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub national_phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub regular_opening_hours: Option<OpeningHours>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub address_components: Vec<AddressComponent>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedText {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

/// Coordinates kept as raw JSON so malformed values degrade per field
/// instead of failing the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    #[serde(default, deserialize_with = "lenient")]
    pub weekday_descriptions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressComponent {
    #[serde(default, deserialize_with = "lenient")]
    pub long_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub short_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Photo {
    /// Resource name, e.g. `places/ChIJ.../photos/AUc7...`
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}
