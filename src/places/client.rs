use crate::places::error::{PlacesError, ERROR_BODY_MAX};
use crate::places::normalize::truncate;
use crate::places::traits::PlacesSearch;
use crate::places::types::{SearchNearbyRequest, SearchNearbyResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Production Places API host
pub const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1";

const SEARCH_NEARBY_PATH: &str = "/places:searchNearby";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const FIELD_MASK: &str = "places.id,\
places.displayName,\
places.formattedAddress,\
places.shortFormattedAddress,\
places.location,\
places.rating,\
places.websiteUri,\
places.nationalPhoneNumber,\
places.regularOpeningHours.weekdayDescriptions,\
places.addressComponents,\
places.photos,\
nextPageToken";

/// HTTP client for the Places API (New) nearby search
pub struct PlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    /// Create a client against the production endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self, PlacesError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client against a custom host, e.g. a local mock server
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_NEARBY_PATH)
    }
}

#[async_trait]
impl PlacesSearch for PlacesClient {
    async fn search_nearby(
        &self,
        request: &SearchNearbyRequest,
    ) -> Result<SearchNearbyResponse, PlacesError> {
        let url = self.search_url();
        debug!("POST {} (page token: {:?})", url, request.page_token);

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Places API returned status: {}", status);
            return Err(PlacesError::Status {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_MAX),
            });
        }

        debug!("Downloaded {} bytes of JSON", body.len());
        Ok(serde_json::from_str(&body)?)
    }

    fn source_name(&self) -> &'static str {
        "Google Places"
    }
}
