use crate::places::error::PlacesError;
use crate::places::types::{SearchNearbyRequest, SearchNearbyResponse};
use async_trait::async_trait;

/// Common trait for nearby-search backends
/// The seeder only depends on this, so tests can script responses page by page
#[async_trait]
pub trait PlacesSearch: Send + Sync {
    /// Fetch one page of places for the given request
    async fn search_nearby(
        &self,
        request: &SearchNearbyRequest,
    ) -> Result<SearchNearbyResponse, PlacesError>;

    /// Get the name of the search source
    fn source_name(&self) -> &'static str;
}
