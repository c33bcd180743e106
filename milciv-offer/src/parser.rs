use std::time::Duration;

use tracing::{info, warn};

use crate::{AssistedConfig, AssistedExtractor, OfferExtractor, OfferTerms, PatternExtractor};

/// Runs the primary extractor at most once, bounded by a deadline, and falls
/// back to the pattern extractor on any error or timeout.
pub struct OfferParser {
    primary: Option<Box<dyn OfferExtractor>>,
    fallback: PatternExtractor,
    timeout: Duration,
}

impl OfferParser {
    /// Pattern matching only.
    pub fn pattern_only(fallback: PatternExtractor) -> Self {
        Self {
            primary: None,
            fallback,
            timeout: Duration::ZERO,
        }
    }

    pub fn with_primary(
        primary: Box<dyn OfferExtractor>,
        fallback: PatternExtractor,
        timeout: Duration,
    ) -> Self {
        Self {
            primary: Some(primary),
            fallback,
            timeout,
        }
    }

    /// Uses the assisted extractor when an API key is available. A client
    /// that cannot be built is logged and skipped.
    pub fn from_config(
        config: &AssistedConfig,
        api_key: Option<String>,
    ) -> Self {
        let fallback = PatternExtractor::new(config.share_price);

        let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) else {
            info!("no offer extraction API key, using pattern matching");
            return Self::pattern_only(fallback);
        };

        match AssistedExtractor::new(config.clone(), api_key) {
            Ok(extractor) => Self::with_primary(Box::new(extractor), fallback, config.timeout()),
            Err(err) => {
                warn!(%err, "could not build assisted extractor, using pattern matching");
                Self::pattern_only(fallback)
            }
        }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn parse(&self, text: &str) -> OfferTerms {
        if let Some(primary) = &self.primary {
            match tokio::time::timeout(self.timeout, primary.extract(text)).await {
                Ok(Ok(terms)) => {
                    info!(
                        method = primary.method().as_str(),
                        fields = terms.extracted_fields.len(),
                        "offer extracted"
                    );
                    return terms;
                }
                Ok(Err(err)) => {
                    warn!(%err, "offer extraction failed, falling back to pattern matching");
                }
                Err(_) => {
                    warn!(
                        timeout_secs = self.timeout.as_secs_f64(),
                        "offer extraction timed out, falling back to pattern matching"
                    );
                }
            }
        }

        self.fallback.extract_terms(text)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ExtractionMethod;

    #[test]
    fn test_from_config_without_key_is_pattern_only() {
        let parser = OfferParser::from_config(&AssistedConfig::default(), None);

        assert!(!parser.has_primary());
    }

    #[test]
    fn test_from_config_ignores_blank_key() {
        let parser = OfferParser::from_config(&AssistedConfig::default(), Some("  ".to_string()));

        assert!(!parser.has_primary());
    }

    #[test]
    fn test_from_config_with_key_has_primary() {
        let parser =
            OfferParser::from_config(&AssistedConfig::default(), Some("secret".to_string()));

        assert!(parser.has_primary());
    }

    #[tokio::test]
    async fn test_pattern_only_parse() {
        let parser = OfferParser::pattern_only(PatternExtractor::default());

        let terms = parser.parse("Base salary: $90,000").await;

        assert_eq!(terms.method, ExtractionMethod::Pattern);
        assert_eq!(terms.base_salary, rust_decimal_macros::dec!(90000));
    }
}
