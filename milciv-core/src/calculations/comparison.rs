use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculations::civilian::CivilianCompensation;
use crate::calculations::common::to_annual;
use crate::calculations::military::MilitaryCompensation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leader {
    Military,
    Civilian,
    Even,
}

/// Side-by-side net monthly figures for one military and one civilian result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub military_monthly: Decimal,
    pub civilian_monthly: Decimal,
    /// Civilian minus military; negative when the military side pays more.
    pub monthly_difference: Decimal,
    pub annual_difference: Decimal,
    pub leader: Leader,
}

pub fn compare_monthly(
    military: &MilitaryCompensation,
    civilian: &CivilianCompensation,
) -> ComparisonSummary {
    let military_monthly = military.breakdown.net_monthly;
    let civilian_monthly = civilian.breakdown.net_monthly;
    let monthly_difference = civilian_monthly - military_monthly;

    let leader = match monthly_difference.cmp(&Decimal::ZERO) {
        Ordering::Greater => Leader::Civilian,
        Ordering::Less => Leader::Military,
        Ordering::Equal => Leader::Even,
    };

    ComparisonSummary {
        military_monthly,
        civilian_monthly,
        monthly_difference,
        annual_difference: to_annual(monthly_difference),
        leader,
    }
}
