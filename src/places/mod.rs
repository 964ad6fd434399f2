pub mod client;
pub mod error;
pub mod normalize;
pub mod traits;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use traits::PlacesSearch;
pub use types::{SearchNearbyRequest, SearchNearbyResponse, SearchQuery};
