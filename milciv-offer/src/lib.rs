//! Offer-letter extraction.
//!
//! Turns free-form offer text into [`OfferTerms`]. Two extractors implement
//! [`OfferExtractor`]:
//!
//! | Extractor             | Confidence | Notes                                   |
//! |-----------------------|------------|-----------------------------------------|
//! | [`AssistedExtractor`] | 0.9        | One HTTP call to a chat-completions API |
//! | [`PatternExtractor`]  | up to 0.5  | Local regexes, never fails              |
//!
//! [`OfferParser`] tries the assisted extractor once under a deadline and
//! falls back to patterns on any failure, so parsing never returns an error.

mod assisted;
mod error;
mod parser;
mod pattern;
mod terms;

use async_trait::async_trait;

pub use assisted::{
    ASSISTED_CONFIDENCE, AssistedConfig, AssistedExtractor, DEFAULT_ENDPOINT, DEFAULT_MODEL,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::ExtractionError;
pub use parser::OfferParser;
pub use pattern::{DEFAULT_SHARE_PRICE, PATTERN_CONFIDENCE, PatternExtractor};
pub use terms::{ExtractionMethod, LOW_CONFIDENCE, OfferField, OfferTerms};

/// Something that can pull compensation terms out of offer text.
#[async_trait]
pub trait OfferExtractor: Send + Sync {
    fn method(&self) -> ExtractionMethod;

    async fn extract(&self, text: &str) -> Result<OfferTerms, ExtractionError>;
}
