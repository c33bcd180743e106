use std::time::Duration;

use thiserror::Error;

/// Failure of the network-assisted extractor. Never surfaced past
/// [`OfferParser`](crate::OfferParser), which falls back to patterns.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extraction service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("extraction did not finish within {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("extraction service returned empty content")]
    EmptyContent,
}
