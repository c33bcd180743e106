use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// Payroll tax parameters for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FicaPolicy {
    pub social_security_rate: Decimal,
    /// Annual wage base above which social security is not withheld.
    pub social_security_wage_base: Decimal,
    pub medicare_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_threshold_single: Decimal,
    pub additional_medicare_threshold_married: Decimal,
}

impl FicaPolicy {
    pub fn additional_medicare_threshold(&self, status: FilingStatus) -> Decimal {
        match status {
            FilingStatus::Single => self.additional_medicare_threshold_single,
            FilingStatus::Married => self.additional_medicare_threshold_married,
        }
    }

    /// Largest social security tax any single wage earner can owe.
    pub fn max_social_security_tax(&self) -> Decimal {
        self.social_security_wage_base * self.social_security_rate
    }
}

impl Default for FicaPolicy {
    /// 2025 rates.
    fn default() -> Self {
        Self {
            social_security_rate: dec!(0.062),
            social_security_wage_base: dec!(176100),
            medicare_rate: dec!(0.0145),
            additional_medicare_rate: dec!(0.009),
            additional_medicare_threshold_single: dec!(200000),
            additional_medicare_threshold_married: dec!(250000),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn threshold_depends_on_filing_status() {
        let fica = FicaPolicy::default();

        assert_eq!(fica.additional_medicare_threshold(FilingStatus::Single), dec!(200000));
        assert_eq!(fica.additional_medicare_threshold(FilingStatus::Married), dec!(250000));
    }

    #[test]
    fn max_social_security_tax_is_wage_base_times_rate() {
        assert_eq!(FicaPolicy::default().max_social_security_tax(), dec!(10918.200));
    }
}
