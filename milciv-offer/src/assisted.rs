use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pattern::DEFAULT_SHARE_PRICE;
use crate::terms::price_shares;
use crate::{ExtractionError, ExtractionMethod, OfferExtractor, OfferField, OfferTerms};

/// Confidence reported for a successful assisted extraction.
pub const ASSISTED_CONFIDENCE: Decimal = dec!(0.9);

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

const SYSTEM_PROMPT: &str = "\
You extract compensation terms from job offer letters. \
Respond with a single JSON object and nothing else, using these keys: \
base_salary (annual dollars), sign_on_bonus (dollars, 0 if absent), \
annual_bonus_percent (e.g. 15 for 15%, null if absent), \
annual_bonus_amount (dollars, null if absent), \
equity_grant (total dollar value, 0 if absent), \
equity_shares (share or RSU count, 0 if absent), \
is_public_company (false for private companies or startups). \
Numbers must be plain JSON numbers without commas or currency symbols.";

/// Connection settings for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistedConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Price used when the reply gives only a share count.
    pub share_price: Decimal,
}

impl Default for AssistedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            share_price: DEFAULT_SHARE_PRICE,
        }
    }
}

impl AssistedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: u8,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// The JSON object the model is asked to return. Missing keys default.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ExtractedFields {
    base_salary: Decimal,
    sign_on_bonus: Decimal,
    annual_bonus_percent: Option<Decimal>,
    annual_bonus_amount: Option<Decimal>,
    equity_grant: Decimal,
    equity_shares: u64,
    is_public_company: bool,
}

impl Default for ExtractedFields {
    fn default() -> Self {
        Self {
            base_salary: Decimal::ZERO,
            sign_on_bonus: Decimal::ZERO,
            annual_bonus_percent: None,
            annual_bonus_amount: None,
            equity_grant: Decimal::ZERO,
            equity_shares: 0,
            is_public_company: true,
        }
    }
}

/// Extractor backed by a remote chat-completions service.
///
/// Makes exactly one request per call and never retries; on failure the
/// caller falls back to [`PatternExtractor`](crate::PatternExtractor).
#[derive(Debug, Clone)]
pub struct AssistedExtractor {
    client: Client,
    config: AssistedConfig,
    api_key: String,
}

impl AssistedExtractor {
    pub fn new(
        config: AssistedConfig,
        api_key: String,
    ) -> Result<Self, ExtractionError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &AssistedConfig {
        &self.config
    }

    async fn request(&self, text: &str) -> Result<String, ExtractionError> {
        let body = ChatRequest {
            model: &self.config.model,
            temperature: 0,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorReply>(&body)
                .map(|reply| reply.error.message)
                .unwrap_or(body);
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response.json().await.map_err(|err| self.classify(err))?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ExtractionError::EmptyContent)
    }

    fn classify(&self, err: reqwest::Error) -> ExtractionError {
        if err.is_timeout() {
            ExtractionError::Timeout(self.config.timeout())
        } else {
            ExtractionError::Http(err)
        }
    }
}

#[async_trait]
impl OfferExtractor for AssistedExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Assisted
    }

    async fn extract(&self, text: &str) -> Result<OfferTerms, ExtractionError> {
        let content = self.request(text).await?;
        debug!(model = %self.config.model, bytes = content.len(), "assisted extraction replied");
        terms_from_reply(&content, self.config.share_price)
    }
}

/// Builds terms from the model's reply text.
pub(crate) fn terms_from_reply(
    content: &str,
    share_price: Decimal,
) -> Result<OfferTerms, ExtractionError> {
    let fields: ExtractedFields = serde_json::from_str(strip_json_fences(content))?;

    let mut terms = OfferTerms {
        base_salary: fields.base_salary,
        sign_on_bonus: fields.sign_on_bonus,
        annual_bonus_percent: fields.annual_bonus_percent.filter(|p| !p.is_zero()),
        annual_bonus_amount: fields.annual_bonus_amount.filter(|a| !a.is_zero()),
        equity_grant: fields.equity_grant,
        equity_shares: fields.equity_shares,
        is_public_company: fields.is_public_company,
        confidence: ASSISTED_CONFIDENCE,
        ..OfferTerms::empty(ExtractionMethod::Assisted)
    };
    if terms.equity_grant.is_zero() && terms.equity_shares > 0 {
        terms.equity_grant = price_shares(terms.equity_shares, share_price).unwrap_or_default();
    }

    let found = [
        (OfferField::BaseSalary, !terms.base_salary.is_zero()),
        (OfferField::SignOnBonus, !terms.sign_on_bonus.is_zero()),
        (OfferField::AnnualBonusPercent, terms.annual_bonus_percent.is_some()),
        (OfferField::AnnualBonusAmount, terms.annual_bonus_amount.is_some()),
        (OfferField::EquityGrant, !terms.equity_grant.is_zero()),
        (OfferField::EquityShares, terms.equity_shares > 0),
    ];
    terms.extracted_fields = found
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect();

    Ok(terms)
}

/// Strips ```json ... ``` or ``` ... ``` fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let inner = inner.trim_start();
    inner.strip_suffix("```").map_or(inner, str::trim)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // strip_json_fences tests
    // =========================================================================

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"base_salary\": 1}\n```";
        assert_eq!(strip_json_fences(input), "{\"base_salary\": 1}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"base_salary\": 1}\n```";
        assert_eq!(strip_json_fences(input), "{\"base_salary\": 1}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"base_salary\": 1}\n";
        assert_eq!(strip_json_fences(input), "{\"base_salary\": 1}");
    }

    // =========================================================================
    // terms_from_reply tests
    // =========================================================================

    #[test]
    fn test_reply_with_every_field() {
        let reply = r#"{
            "base_salary": 150000,
            "sign_on_bonus": 20000,
            "annual_bonus_percent": 10,
            "annual_bonus_amount": null,
            "equity_grant": 200000,
            "equity_shares": 0,
            "is_public_company": true
        }"#;

        let terms = terms_from_reply(reply, DEFAULT_SHARE_PRICE).unwrap();

        assert_eq!(terms.base_salary, dec!(150000));
        assert_eq!(terms.annual_bonus_percent, Some(dec!(10)));
        assert_eq!(terms.equity_grant, dec!(200000));
        assert_eq!(terms.confidence, dec!(0.9));
        assert_eq!(terms.method, ExtractionMethod::Assisted);
        assert!(!terms.is_low_confidence());
        assert_eq!(
            terms.extracted_fields,
            vec![
                OfferField::BaseSalary,
                OfferField::SignOnBonus,
                OfferField::AnnualBonusPercent,
                OfferField::EquityGrant,
            ]
        );
    }

    #[test]
    fn test_reply_with_missing_keys_and_shares() {
        let reply = "```json\n{\"base_salary\": 98000.5, \"equity_shares\": 1000, \"is_public_company\": false}\n```";

        let terms = terms_from_reply(reply, dec!(20)).unwrap();

        assert_eq!(terms.base_salary, dec!(98000.5));
        assert_eq!(terms.sign_on_bonus, dec!(0));
        assert_eq!(terms.equity_grant, dec!(20000));
        assert!(!terms.is_public_company);
        assert!(terms.has_field(OfferField::EquityShares));
    }

    #[test]
    fn test_reply_with_unpriceable_shares() {
        let terms = terms_from_reply(r#"{"equity_shares": 5000}"#, Decimal::MAX).unwrap();

        assert_eq!(terms.equity_shares, 5000);
        assert_eq!(terms.equity_grant, dec!(0));
    }

    #[test]
    fn test_zero_bonus_is_treated_as_absent() {
        let terms = terms_from_reply(r#"{"annual_bonus_percent": 0}"#, DEFAULT_SHARE_PRICE).unwrap();

        assert_eq!(terms.annual_bonus_percent, None);
        assert!(terms.extracted_fields.is_empty());
    }

    #[test]
    fn test_reply_that_is_not_json() {
        let result = terms_from_reply("I could not find any salary.", DEFAULT_SHARE_PRICE);

        assert!(matches!(result, Err(ExtractionError::Parse(_))));
    }

    // =========================================================================
    // config tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = AssistedConfig::default();

        assert_eq!(config.timeout(), Duration::from_secs(20));
        assert_eq!(config.share_price, dec!(50));
    }

    #[test]
    fn test_extractor_builds_without_network() {
        let extractor = AssistedExtractor::new(AssistedConfig::default(), "key".to_string()).unwrap();

        assert_eq!(extractor.method(), ExtractionMethod::Assisted);
        assert_eq!(extractor.config().model, DEFAULT_MODEL);
    }
}
