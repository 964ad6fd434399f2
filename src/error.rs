use thiserror::Error;

use crate::places::PlacesError;

/// Errors that abort a seeding run.
///
/// Per-record problems (missing name, unparsable coordinates) never surface
/// here; they are absorbed while normalizing.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("environment variable {var} is not set")]
    MissingApiKey { var: &'static str },

    #[error(transparent)]
    Places(#[from] PlacesError),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
