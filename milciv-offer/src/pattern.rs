//! Local keyword extractor.
//!
//! Matches are made against the lowercased text. For each field the first
//! pattern (in list order) that yields a parseable number wins.
//!
//! Confidence scales with coverage of the four headline fields (base salary,
//! sign-on bonus, annual bonus, equity) and tops out at
//! [`PATTERN_CONFIDENCE`].

use std::str::FromStr;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::terms::price_shares;
use crate::{ExtractionError, ExtractionMethod, OfferExtractor, OfferField, OfferTerms};

/// Confidence reported when every headline field was found.
pub const PATTERN_CONFIDENCE: Decimal = dec!(0.5);

/// Price per share used when an offer states only a share count.
pub const DEFAULT_SHARE_PRICE: Decimal = dec!(50);

const HEADLINE_FIELDS: u32 = 4;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("offer pattern is valid"))
        .collect()
}

static BASE_SALARY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"base salary[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
        r"annual salary[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
        r"salary of[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
        r"salary will be \$([0-9,]+(?:\.[0-9]{1,2})?)",
    ])
});

static SIGN_ON: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"sign[- ]?on bonus[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
        r"signing bonus[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
    ])
});

static BONUS_PERCENT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"annual bonus[:\s]+([0-9]+(?:\.[0-9]+)?)%",
        r"target bonus[:\s]+([0-9]+(?:\.[0-9]+)?)%",
        r"bonus target[:\s]+([0-9]+(?:\.[0-9]+)?)%",
    ])
});

static BONUS_AMOUNT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"annual bonus[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
        r"target bonus[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
        r"bonus target[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
    ])
});

static EQUITY_VALUE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"equity grant[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
        r"rsu grant[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
        r"stock grant[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
        r"equity package[:\s]+\$([0-9,]+(?:\.[0-9]{1,2})?)",
    ])
});

static EQUITY_SHARES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"([0-9][0-9,]*)\s+rsus", r"([0-9][0-9,]*)\s+shares"])
});

/// First capture of the first pattern that parses as `T`.
fn first_match<T: FromStr>(
    patterns: &[Regex],
    text: &str,
) -> Option<T> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().replace(',', "").parse().ok())
    })
}

/// Regex extractor used when no assisted extractor is configured, or when it
/// fails.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    share_price: Decimal,
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_SHARE_PRICE)
    }
}

impl PatternExtractor {
    pub fn new(share_price: Decimal) -> Self {
        Self { share_price }
    }

    pub fn share_price(&self) -> Decimal {
        self.share_price
    }

    /// Never fails; text with nothing recognisable gives
    /// [`OfferTerms::empty`] with zero confidence.
    pub fn extract_terms(&self, text: &str) -> OfferTerms {
        let text = text.to_lowercase();
        let mut terms = OfferTerms::empty(ExtractionMethod::Pattern);
        let mut headline = 0u32;

        if let Some(salary) = first_match::<Decimal>(&BASE_SALARY, &text) {
            terms.base_salary = salary;
            terms.extracted_fields.push(OfferField::BaseSalary);
            headline += 1;
        }

        if let Some(sign_on) = first_match::<Decimal>(&SIGN_ON, &text) {
            terms.sign_on_bonus = sign_on;
            terms.extracted_fields.push(OfferField::SignOnBonus);
            headline += 1;
        }

        let bonus_percent = first_match::<Decimal>(&BONUS_PERCENT, &text);
        let bonus_amount = first_match::<Decimal>(&BONUS_AMOUNT, &text);
        if let Some(percent) = bonus_percent {
            terms.annual_bonus_percent = Some(percent);
            terms.extracted_fields.push(OfferField::AnnualBonusPercent);
        }
        if let Some(amount) = bonus_amount {
            terms.annual_bonus_amount = Some(amount);
            terms.extracted_fields.push(OfferField::AnnualBonusAmount);
        }
        if bonus_percent.is_some() || bonus_amount.is_some() {
            headline += 1;
        }

        if let Some(value) = first_match::<Decimal>(&EQUITY_VALUE, &text) {
            terms.equity_grant = value;
            terms.extracted_fields.push(OfferField::EquityGrant);
        }
        if let Some(shares) = first_match::<u64>(&EQUITY_SHARES, &text) {
            terms.equity_shares = shares;
            terms.extracted_fields.push(OfferField::EquityShares);
            if terms.equity_grant.is_zero() && shares > 0 {
                if let Some(value) = price_shares(shares, self.share_price) {
                    terms.equity_grant = value;
                    terms.extracted_fields.push(OfferField::EquityGrant);
                }
            }
        }
        if !terms.equity_grant.is_zero() {
            headline += 1;
        }

        if text.contains("private") || text.contains("startup") {
            terms.is_public_company = false;
        }

        terms.confidence =
            PATTERN_CONFIDENCE * Decimal::from(headline) / Decimal::from(HEADLINE_FIELDS);

        debug!(
            fields = terms.extracted_fields.len(),
            confidence = %terms.confidence,
            "pattern extraction finished"
        );

        terms
    }
}

#[async_trait]
impl OfferExtractor for PatternExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Pattern
    }

    async fn extract(&self, text: &str) -> Result<OfferTerms, ExtractionError> {
        Ok(self.extract_terms(text))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const OFFER: &str = "\
Dear Jordan,

We are pleased to offer you the position of Site Reliability Engineer.

Base Salary: $145,000 per year, paid semi-monthly.
Sign-On Bonus: $15,000, payable within 30 days of your start date.
Target Bonus: 12% of base salary.
Equity Grant: $120,000 in RSUs vesting over four years.
";

    fn extract(text: &str) -> OfferTerms {
        PatternExtractor::default().extract_terms(text)
    }

    // =========================================================================
    // extract_terms tests
    // =========================================================================

    #[test]
    fn test_full_offer_letter() {
        let terms = extract(OFFER);

        assert_eq!(terms.base_salary, dec!(145000));
        assert_eq!(terms.sign_on_bonus, dec!(15000));
        assert_eq!(terms.annual_bonus_percent, Some(dec!(12)));
        assert_eq!(terms.annual_bonus_amount, None);
        assert_eq!(terms.equity_grant, dec!(120000));
        assert!(terms.is_public_company);
        assert_eq!(terms.confidence, dec!(0.5));
        assert_eq!(terms.method, ExtractionMethod::Pattern);
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
    fn test_alternate_phrasings() {
        let terms = extract("Your starting annual base salary will be... annual salary: $98,500. Signing bonus $5,000.");

        assert_eq!(terms.base_salary, dec!(98500));
        assert_eq!(terms.sign_on_bonus, dec!(5000));
        assert_eq!(terms.confidence, dec!(0.25));
    }

    #[test]
    fn test_salary_of_and_cents() {
        let terms = extract("We offer a salary of $101,250.50 annually.");

        assert_eq!(terms.base_salary, dec!(101250.50));
    }

    #[test]
    fn test_flat_bonus_amount() {
        let terms = extract("Base salary: $100,000. Annual bonus: $10,000 at target.");

        assert_eq!(terms.annual_bonus_amount, Some(dec!(10000)));
        assert_eq!(terms.annual_bonus_percent, None);
        assert_eq!(terms.bonus_terms().annual_amount(terms.base_salary), dec!(10000));
    }

    #[test]
    fn test_share_count_priced_at_estimate() {
        let terms = extract("You will receive 2,500 RSUs, subject to board approval.");

        assert_eq!(terms.equity_shares, 2500);
        assert_eq!(terms.equity_grant, dec!(125000));
        assert!(terms.has_field(OfferField::EquityShares));
        assert!(terms.has_field(OfferField::EquityGrant));
    }

    #[test]
    fn test_share_count_does_not_override_dollar_value() {
        let terms = extract("Equity grant: $40,000 (800 shares).");

        assert_eq!(terms.equity_grant, dec!(40000));
        assert_eq!(terms.equity_shares, 800);
    }

    #[test]
    fn test_share_value_too_large_to_price_is_left_out() {
        let terms =
            PatternExtractor::new(Decimal::MAX).extract_terms("10,000 shares of common stock");

        assert_eq!(terms.equity_shares, 10000);
        assert_eq!(terms.equity_grant, dec!(0));
        assert!(terms.has_field(OfferField::EquityShares));
        assert!(!terms.has_field(OfferField::EquityGrant));
    }

    #[test]
    fn test_custom_share_price() {
        let terms = PatternExtractor::new(dec!(12.50)).extract_terms("10,000 shares of common stock");

        assert_eq!(terms.equity_grant, dec!(125000));
    }

    #[test]
    fn test_private_company_detection() {
        assert!(!extract("Join our startup as employee #12.").is_public_company);
        assert!(!extract("We are a privately held, PRIVATE company.").is_public_company);
        assert!(extract("Listed on NASDAQ.").is_public_company);
    }

    #[test]
    fn test_unrecognised_text_gives_empty_terms() {
        let terms = extract("Thanks for interviewing with us! We'll be in touch.");

        assert_eq!(terms, OfferTerms::empty(ExtractionMethod::Pattern));
        assert!(terms.is_low_confidence());
    }

    #[test]
    fn test_pattern_confidence_never_exceeds_cap() {
        let terms = extract(OFFER);

        assert!(terms.confidence <= PATTERN_CONFIDENCE);
        assert!(terms.is_low_confidence());
    }

    #[tokio::test]
    async fn test_trait_extract_is_infallible() {
        let extractor = PatternExtractor::default();

        let terms = extractor.extract("").await.unwrap();

        assert_eq!(extractor.method(), ExtractionMethod::Pattern);
        assert_eq!(terms.confidence, dec!(0));
    }
}
