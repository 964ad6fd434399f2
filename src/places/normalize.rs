//! Mapping from raw Places API records to [`Spot`] rows.
//!
//! Every optional field degrades to `None` on bad input; only a missing
//! display name rejects a place outright.

use crate::models::{
    Spot, ADDRESS_MAX, CITY_MAX, NAME_MAX, PHONE_MAX, PHOTO_URL_MAX, PLACE_ID_MAX, URL_MAX,
};
use crate::places::types::{AddressComponent, Place};
use chrono::Utc;
use reqwest::Url;
use serde_json::Value;

const LOCALITY: &str = "locality";
const ADMIN_AREA_LEVEL_1: &str = "administrative_area_level_1";

/// Where photo media URLs point and how large the rendered image should be
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoSettings {
    pub media_base_url: String,
    pub max_width_px: u32,
    pub api_key: String,
}

/// Keep at most `max` characters of `value`.
pub fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((end, _)) => value[..end].to_string(),
        None => value.to_string(),
    }
}

fn truncate_opt(value: Option<&str>, max: usize) -> Option<String> {
    value.map(|v| truncate(v, max))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Coerce a raw JSON number (coordinate, rating) into a finite `f64`.
///
/// Accepts numbers and numeric strings; anything else is `None`.
pub fn parse_number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    parsed.is_finite().then_some(parsed)
}

fn component_name(component: &AddressComponent) -> Option<&str> {
    non_empty(component.long_text.as_deref()).or_else(|| non_empty(component.short_text.as_deref()))
}

fn first_named_of_type<'a>(components: &'a [AddressComponent], kind: &str) -> Option<&'a str> {
    components
        .iter()
        .filter(|c| c.types.iter().any(|t| t == kind))
        .find_map(component_name)
}

/// Pick the city for a place: the first named locality anywhere in the
/// list, else the first named first-level administrative area.
pub fn pick_city(components: &[AddressComponent]) -> Option<String> {
    first_named_of_type(components, LOCALITY)
        .or_else(|| first_named_of_type(components, ADMIN_AREA_LEVEL_1))
        .map(|name| truncate(name, CITY_MAX))
}

/// Media URL for the first listed photo that has a resource name
pub fn photo_url(place: &Place, settings: &PhotoSettings) -> Option<String> {
    let name = place
        .photos
        .iter()
        .find_map(|photo| non_empty(photo.name.as_deref()))?;

    let mut url = Url::parse(&format!(
        "{}/{}/media",
        settings.media_base_url.trim_end_matches('/'),
        name.trim_start_matches('/')
    ))
    .ok()?;
    url.query_pairs_mut()
        .append_pair("maxWidthPx", &settings.max_width_px.to_string())
        .append_pair("key", &settings.api_key);

    Some(truncate(url.as_str(), PHOTO_URL_MAX))
}

/// Normalize one place into a spot, or `None` when it has no display name.
pub fn spot_from_place(place: &Place, photos: &PhotoSettings) -> Option<Spot> {
    let name = non_empty(place.display_name.as_ref().and_then(|d| d.text.as_deref()))?;

    let address = non_empty(place.formatted_address.as_deref())
        .or_else(|| non_empty(place.short_formatted_address.as_deref()));

    let (latitude, longitude) = match &place.location {
        Some(location) => (
            parse_number(location.latitude.as_ref()),
            parse_number(location.longitude.as_ref()),
        ),
        None => (None, None),
    };

    let opening_hours = place
        .regular_opening_hours
        .as_ref()
        .and_then(|h| h.weekday_descriptions.clone());

    Some(Spot {
        name: truncate(name, NAME_MAX),
        address: truncate_opt(address, ADDRESS_MAX),
        city: pick_city(&place.address_components),
        latitude,
        longitude,
        phone: truncate_opt(place.national_phone_number.as_deref(), PHONE_MAX),
        url: truncate_opt(place.website_uri.as_deref(), URL_MAX),
        rating: parse_number(place.rating.as_ref()),
        place_id: truncate_opt(place.id.as_deref(), PLACE_ID_MAX),
        opening_hours,
        description: None,
        photo_url: photo_url(place, photos),
        created_at: Utc::now(),
    })
}
