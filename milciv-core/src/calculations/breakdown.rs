use rust_decimal::Decimal;
use serde::Serialize;

use crate::Warning;

/// Per-category tax amounts for one year, each rounded to cents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    /// Federal income tax after the child tax credit.
    pub federal: Decimal,
    /// Portion of the child tax credit actually used against federal tax.
    pub child_tax_credit: Decimal,
    pub state: Decimal,
    pub social_security: Decimal,
    /// Medicare including the additional medicare tax.
    pub medicare: Decimal,
    pub total: Decimal,
}

impl TaxBreakdown {
    pub fn fica(&self) -> Decimal {
        self.social_security + self.medicare
    }
}

/// Taxable vs non-taxable split, gross, taxes and net for one side of the
/// comparison. Produced fresh by every calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompensationBreakdown {
    pub taxable_annual: Decimal,
    pub non_taxable_annual: Decimal,
    pub gross_annual: Decimal,
    pub gross_monthly: Decimal,
    pub taxes: TaxBreakdown,
    pub net_annual: Decimal,
    pub net_monthly: Decimal,
    /// Total tax over gross, four decimal places.
    pub effective_tax_rate: Decimal,
    /// Fallbacks taken while computing this breakdown.
    pub warnings: Vec<Warning>,
}
