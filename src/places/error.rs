use thiserror::Error;

/// Longest response body, in characters, kept on a status error
pub const ERROR_BODY_MAX: usize = 500;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("places request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("places API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode places response: {0}")]
    Decode(#[from] serde_json::Error),
}
