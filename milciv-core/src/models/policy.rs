//! Named policy constants behind the comparison's simplifications.
//!
//! Every number here is an approximation the comparison makes on purpose
//! (flat private-equity discount, two-tier allowance tax advantage, flat
//! supplemental withholding). They live in one overridable struct so a
//! rate-table directory can replace any of them through `policy.toml`.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// Funding stage of a private employer, used to pick a liquidity discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStage {
    Public,
    PreIpo,
    LateStage,
    Growth,
    Early,
}

impl CompanyStage {
    pub const ALL: [CompanyStage; 5] = [
        CompanyStage::Public,
        CompanyStage::PreIpo,
        CompanyStage::LateStage,
        CompanyStage::Growth,
        CompanyStage::Early,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::PreIpo => "pre_ipo",
            Self::LateStage => "late_stage",
            Self::Growth => "growth",
            Self::Early => "early",
        }
    }

    /// Accepts the snake_case name or its hyphenated form.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|stage| stage.as_str() == normalized)
    }
}

impl fmt::Display for CompanyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Liquidity discount per company stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageDiscounts {
    pub public: Decimal,
    pub pre_ipo: Decimal,
    pub late_stage: Decimal,
    pub growth: Decimal,
    pub early: Decimal,
}

impl Default for StageDiscounts {
    fn default() -> Self {
        Self {
            public: dec!(0),
            pre_ipo: dec!(0.15),
            late_stage: dec!(0.30),
            growth: dec!(0.50),
            early: dec!(0.70),
        }
    }
}

/// Overridable policy numbers used by the calculators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConstants {
    /// Discount applied to a private-company grant when no stage is given.
    pub private_equity_discount: Decimal,
    pub stage_discounts: StageDiscounts,
    /// Approximate marginal rate for taxable base pay under the threshold.
    pub tax_advantage_lower_rate: Decimal,
    pub tax_advantage_upper_rate: Decimal,
    /// Annual taxable base pay at or above which the upper rate applies.
    pub tax_advantage_threshold: Decimal,
    pub supplemental_withholding_rate: Decimal,
    /// Employer retirement match as a fraction of military base pay.
    pub retirement_match_rate: Decimal,
    pub child_tax_credit_per_child: Decimal,
    pub child_tax_credit_phaseout_single: Decimal,
    pub child_tax_credit_phaseout_married: Decimal,
    /// Credit reduction per full $1,000 of income above the phase-out.
    pub child_tax_credit_reduction_per_thousand: Decimal,
    /// Price used to value offers quoted only as a share count.
    pub estimated_share_price: Decimal,
}

impl PolicyConstants {
    /// Two-tier rate used to price tax-free allowances.
    pub fn tax_advantage_rate(&self, annual_taxable: Decimal) -> Decimal {
        if annual_taxable < self.tax_advantage_threshold {
            self.tax_advantage_lower_rate
        } else {
            self.tax_advantage_upper_rate
        }
    }

    pub fn stage_discount(&self, stage: CompanyStage) -> Decimal {
        let d = &self.stage_discounts;
        match stage {
            CompanyStage::Public => d.public,
            CompanyStage::PreIpo => d.pre_ipo,
            CompanyStage::LateStage => d.late_stage,
            CompanyStage::Growth => d.growth,
            CompanyStage::Early => d.early,
        }
    }

    pub fn child_tax_credit_phaseout(&self, status: FilingStatus) -> Decimal {
        match status {
            FilingStatus::Single => self.child_tax_credit_phaseout_single,
            FilingStatus::Married => self.child_tax_credit_phaseout_married,
        }
    }
}

impl Default for PolicyConstants {
    fn default() -> Self {
        Self {
            private_equity_discount: dec!(0.50),
            stage_discounts: StageDiscounts::default(),
            tax_advantage_lower_rate: dec!(0.15),
            tax_advantage_upper_rate: dec!(0.22),
            tax_advantage_threshold: dec!(50000),
            supplemental_withholding_rate: dec!(0.22),
            retirement_match_rate: dec!(0.05),
            child_tax_credit_per_child: dec!(2000),
            child_tax_credit_phaseout_single: dec!(200000),
            child_tax_credit_phaseout_married: dec!(400000),
            child_tax_credit_reduction_per_thousand: dec!(50),
            estimated_share_price: dec!(50),
        }
    }
}
