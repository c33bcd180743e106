//! Compensation calculators.
//!
//! Every calculator borrows an immutable [`RateTables`](crate::RateTables)
//! and is a pure function of its input and those tables.
//!
//! | Module         | Entry point                         |
//! |----------------|-------------------------------------|
//! | [`military`]   | [`compute_military_compensation`]   |
//! | [`civilian`]   | [`compute_civilian_compensation`]   |
//! | [`equity`]     | [`compute_vesting_schedule`]        |
//! | [`projection`] | [`compute_projection`]              |

pub mod breakdown;
pub mod civilian;
pub mod common;
pub mod comparison;
pub mod equity;
pub mod military;
pub mod projection;

#[cfg(test)]
pub(crate) mod test_support;

pub use breakdown::{CompensationBreakdown, TaxBreakdown};
pub use civilian::{
    AnnualTaxes, BonusTerms, CivilianCalculator, CivilianCompensation, CivilianInput,
    StateTreatment, SupplementalWithholding, compute_civilian_compensation,
};
pub use comparison::{ComparisonSummary, Leader, compare_monthly};
pub use equity::{
    EquityComparison, EquityGrant, EquityValuation, Preference, VestingPeriod, VestingSchedule,
    compare_equity_grants, compute_vesting_schedule, value_equity_grant,
};
pub use military::{
    HousingSource, MilitaryCalculator, MilitaryCompensation, MilitaryInput,
    compute_military_compensation,
};
pub use projection::{
    MonthlyPoint, Projection, ProjectionInput, ProjectionYear, compute_projection,
};
