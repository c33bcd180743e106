use milciv_core::FilingStatus;
use milciv_core::calculations::{BonusTerms, CivilianInput, EquityGrant};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Results at or below this confidence should be reviewed before use.
pub const LOW_CONFIDENCE: Decimal = dec!(0.5);

/// Which extractor produced a set of terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Assisted,
    Pattern,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assisted => "assisted",
            Self::Pattern => "pattern",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferField {
    BaseSalary,
    SignOnBonus,
    AnnualBonusPercent,
    AnnualBonusAmount,
    EquityGrant,
    EquityShares,
}

/// Compensation terms pulled out of free-form offer text.
///
/// Fields that were not found are zero (or `None` for the bonus forms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTerms {
    pub base_salary: Decimal,
    pub sign_on_bonus: Decimal,
    /// Target bonus as a percentage of base, e.g. `15` for 15%.
    pub annual_bonus_percent: Option<Decimal>,
    pub annual_bonus_amount: Option<Decimal>,
    /// Total grant value in dollars. Share-count grants are priced at the
    /// estimated share price when no dollar value is stated.
    pub equity_grant: Decimal,
    pub equity_shares: u64,
    pub is_public_company: bool,
    pub confidence: Decimal,
    pub extracted_fields: Vec<OfferField>,
    pub method: ExtractionMethod,
}

impl OfferTerms {
    /// A record with nothing extracted.
    pub fn empty(method: ExtractionMethod) -> Self {
        Self {
            base_salary: Decimal::ZERO,
            sign_on_bonus: Decimal::ZERO,
            annual_bonus_percent: None,
            annual_bonus_amount: None,
            equity_grant: Decimal::ZERO,
            equity_shares: 0,
            is_public_company: true,
            confidence: Decimal::ZERO,
            extracted_fields: Vec::new(),
            method,
        }
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence <= LOW_CONFIDENCE
    }

    pub fn has_field(&self, field: OfferField) -> bool {
        self.extracted_fields.contains(&field)
    }

    pub fn bonus_terms(&self) -> BonusTerms {
        BonusTerms {
            percent: self.annual_bonus_percent,
            flat: self.annual_bonus_amount,
        }
    }

    /// Civilian calculator input for these terms. Equity is left at zero; use
    /// [`equity_grant`](Self::equity_grant) to build a vesting schedule.
    pub fn civilian_input(
        &self,
        state: &str,
        filing_status: FilingStatus,
    ) -> CivilianInput {
        CivilianInput {
            bonus: self.bonus_terms(),
            sign_on_bonus: self.sign_on_bonus,
            ..CivilianInput::new(self.base_salary, state, filing_status)
        }
    }

    /// The grant on the default vesting schedule, if any equity was found.
    pub fn equity_grant(&self) -> Option<EquityGrant> {
        (self.equity_grant > Decimal::ZERO)
            .then(|| EquityGrant::new(self.equity_grant, self.is_public_company))
    }
}

/// Dollar value of a share-count grant, or `None` when the product does not
/// fit in a `Decimal`.
pub(crate) fn price_shares(
    shares: u64,
    share_price: Decimal,
) -> Option<Decimal> {
    let value = Decimal::from(shares).checked_mul(share_price);
    if value.is_none() {
        warn!(shares, %share_price, "share grant value overflows, leaving it unpriced");
    }
    value
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_price_shares() {
        assert_eq!(price_shares(2500, dec!(50)), Some(dec!(125000)));
        assert_eq!(price_shares(u64::MAX, Decimal::MAX), None);
    }

    #[test]
    fn test_empty_terms_are_low_confidence() {
        let terms = OfferTerms::empty(ExtractionMethod::Pattern);

        assert!(terms.is_low_confidence());
        assert!(terms.is_public_company);
        assert_eq!(terms.equity_grant(), None);
    }

    #[test]
    fn test_civilian_input_carries_bonus_and_sign_on() {
        let terms = OfferTerms {
            base_salary: dec!(120000),
            sign_on_bonus: dec!(10000),
            annual_bonus_percent: Some(dec!(15)),
            ..OfferTerms::empty(ExtractionMethod::Pattern)
        };

        let input = terms.civilian_input("tx", FilingStatus::Married);

        assert_eq!(input.base_salary, dec!(120000));
        assert_eq!(input.sign_on_bonus, dec!(10000));
        assert_eq!(input.bonus.annual_amount(input.base_salary), dec!(18000));
        assert_eq!(input.filing_status, FilingStatus::Married);
        assert_eq!(input.annual_equity, dec!(0));
    }

    #[test]
    fn test_equity_grant_keeps_company_type() {
        let terms = OfferTerms {
            equity_grant: dec!(80000),
            is_public_company: false,
            ..OfferTerms::empty(ExtractionMethod::Assisted)
        };

        let grant = terms.equity_grant().unwrap();

        assert_eq!(grant.total_value, dec!(80000));
        assert!(!grant.is_public);
        assert_eq!(grant.vesting_years, 4);
    }
}
