//! Equity grant valuation and vesting.
//!
//! A grant is first risk-adjusted: public-company grants keep their full
//! value; private grants take the flat private discount, or the company-stage
//! discount when a stage is given. The adjusted value is then split into
//! equal yearly tranches. Year `k` vests the rounded cumulative target
//! `adjusted × k / years` less the previous year's target, so every tranche
//! is non-negative and the schedule sums to the adjusted value exactly.
//!
//! A year whose end month is at or before the cliff vests nothing; its
//! tranche is deferred to the first year after the cliff.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use milciv_core::calculations::EquityGrant;
//! use milciv_core::{RateTables, compute_vesting_schedule};
//!
//! let grant = EquityGrant::new(dec!(100000), false);
//! let schedule = compute_vesting_schedule(&RateTables::default(), &grant).unwrap();
//!
//! let vested: Vec<_> = schedule.periods().iter().map(|p| p.vested).collect();
//! assert_eq!(vested, vec![dec!(0), dec!(25000), dec!(12500), dec!(12500)]);
//! assert_eq!(schedule.adjusted_value(), dec!(50000));
//! ```

use std::cmp::Ordering;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{ensure_amount, round_half_up, to_monthly};
use crate::{CompanyStage, InputError, MAX_HORIZON_YEARS, PolicyConstants, RateTables};

const MONTHS_PER_YEAR: u32 = 12;

pub const DEFAULT_VESTING_YEARS: u32 = 4;
pub const DEFAULT_CLIFF_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityGrant {
    /// Face value of the whole grant.
    pub total_value: Decimal,
    #[serde(default = "default_vesting_years")]
    pub vesting_years: u32,
    #[serde(default = "default_cliff_months")]
    pub cliff_months: u32,
    pub is_public: bool,
    /// Funding stage of a private company; replaces the flat private discount.
    #[serde(default)]
    pub stage: Option<CompanyStage>,
}

fn default_vesting_years() -> u32 {
    DEFAULT_VESTING_YEARS
}

fn default_cliff_months() -> u32 {
    DEFAULT_CLIFF_MONTHS
}

impl EquityGrant {
    /// A grant on the standard four-year schedule with a one-year cliff.
    pub fn new(
        total_value: Decimal,
        is_public: bool,
    ) -> Self {
        Self {
            total_value,
            vesting_years: DEFAULT_VESTING_YEARS,
            cliff_months: DEFAULT_CLIFF_MONTHS,
            is_public,
            stage: None,
        }
    }

    fn validate(&self) -> Result<(), InputError> {
        ensure_amount("equity_grant", self.total_value)?;
        if !(1..=MAX_HORIZON_YEARS).contains(&self.vesting_years) {
            return Err(InputError::InvalidVestingHorizon(self.vesting_years));
        }
        if self.cliff_months >= self.vesting_years.saturating_mul(MONTHS_PER_YEAR) {
            return Err(InputError::CliffExceedsHorizon {
                cliff_months: self.cliff_months,
                horizon_years: self.vesting_years,
            });
        }
        Ok(())
    }

    /// Liquidity discount this grant receives under `policy`.
    pub fn discount(&self, policy: &PolicyConstants) -> Decimal {
        if self.is_public {
            return Decimal::ZERO;
        }
        self.stage
            .map_or(policy.private_equity_discount, |stage| policy.stage_discount(stage))
    }
}

/// Risk-adjusted value of a grant, independent of cliff timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquityValuation {
    pub total_value: Decimal,
    /// Fraction removed for illiquidity, e.g. `0.5`.
    pub discount: Decimal,
    pub adjusted_value: Decimal,
    /// Adjusted value / vesting years.
    pub annualized_value: Decimal,
    pub monthly_value: Decimal,
    pub liquidity_note: String,
}

/// Values `grant` under `policy` without building a schedule.
pub fn value_equity_grant(
    policy: &PolicyConstants,
    grant: &EquityGrant,
) -> Result<EquityValuation, InputError> {
    grant.validate()?;

    let discount = grant.discount(policy);
    let adjusted_value = round_half_up(grant.total_value * (Decimal::ONE - discount));
    let annualized = adjusted_value / Decimal::from(grant.vesting_years);

    Ok(EquityValuation {
        total_value: grant.total_value,
        discount,
        adjusted_value,
        annualized_value: round_half_up(annualized),
        monthly_value: to_monthly(annualized),
        liquidity_note: liquidity_note(grant, discount),
    })
}

fn liquidity_note(
    grant: &EquityGrant,
    discount: Decimal,
) -> String {
    if grant.total_value.is_zero() {
        return "No equity grant".to_string();
    }
    if grant.is_public {
        return "Public stock: can sell immediately upon vesting".to_string();
    }
    let percent = (discount * dec!(100)).normalize();
    match grant.stage {
        Some(stage) => format!(
            "Private stock ({stage}): {percent}% risk discount applied, illiquid until IPO or acquisition"
        ),
        None => format!(
            "Private stock: {percent}% risk discount applied, illiquid until IPO or acquisition"
        ),
    }
}

/// One year of a vesting schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VestingPeriod {
    /// 1-based year index.
    pub year: u32,
    pub vested: Decimal,
    pub cumulative: Decimal,
    pub remaining: Decimal,
}

/// Yearly vesting of a risk-adjusted grant.
///
/// Invariants: per-period amounts sum to the adjusted value, cumulative is
/// non-decreasing, and periods inside the cliff vest zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VestingSchedule {
    valuation: EquityValuation,
    cliff_months: u32,
    periods: Vec<VestingPeriod>,
}

impl VestingSchedule {
    pub fn valuation(&self) -> &EquityValuation {
        &self.valuation
    }

    pub fn adjusted_value(&self) -> Decimal {
        self.valuation.adjusted_value
    }

    pub fn cliff_months(&self) -> u32 {
        self.cliff_months
    }

    pub fn periods(&self) -> &[VestingPeriod] {
        &self.periods
    }

    /// Amount vesting in 1-based `year`; zero outside the schedule.
    pub fn vested_in_year(&self, year: u32) -> Decimal {
        self.periods
            .iter()
            .find(|p| p.year == year)
            .map_or(Decimal::ZERO, |p| p.vested)
    }

    /// Amount vested by the end of 1-based `year`.
    pub fn cumulative_through(&self, year: u32) -> Decimal {
        self.periods
            .iter()
            .take_while(|p| p.year <= year)
            .last()
            .map_or(Decimal::ZERO, |p| p.cumulative)
    }
}

/// Builds the cliff-accurate yearly schedule for `grant`.
pub fn compute_vesting_schedule(
    tables: &RateTables,
    grant: &EquityGrant,
) -> Result<VestingSchedule, InputError> {
    let valuation = value_equity_grant(&tables.policy, grant)?;
    let adjusted = valuation.adjusted_value;

    let periods = build_periods(adjusted, grant.vesting_years, grant.cliff_months);

    debug!(
        total = %grant.total_value,
        %adjusted,
        years = grant.vesting_years,
        cliff_months = grant.cliff_months,
        "computed vesting schedule"
    );

    Ok(VestingSchedule {
        valuation,
        cliff_months: grant.cliff_months,
        periods,
    })
}

fn build_periods(
    adjusted: Decimal,
    years: u32,
    cliff_months: u32,
) -> Vec<VestingPeriod> {
    let target = |year: u32| round_half_up(adjusted * Decimal::from(year) / Decimal::from(years));

    let mut periods = Vec::with_capacity(years as usize);
    let mut deferred = Decimal::ZERO;
    let mut cumulative = Decimal::ZERO;

    for year in 1..=years {
        let scheduled = target(year) - target(year - 1);

        let vested = if year * MONTHS_PER_YEAR <= cliff_months {
            deferred += scheduled;
            Decimal::ZERO
        } else {
            let amount = scheduled + deferred;
            deferred = Decimal::ZERO;
            amount
        };

        cumulative += vested;
        periods.push(VestingPeriod {
            year,
            vested,
            cumulative,
            remaining: adjusted - cumulative,
        });
    }

    periods
}

/// Which of two grants is worth more per month after adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    First,
    Second,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquityComparison {
    pub first_monthly: Decimal,
    pub second_monthly: Decimal,
    /// Absolute monthly difference.
    pub monthly_difference: Decimal,
    pub preferred: Preference,
}

/// Compares two grants by adjusted monthly value.
pub fn compare_equity_grants(
    policy: &PolicyConstants,
    first: &EquityGrant,
    second: &EquityGrant,
) -> Result<EquityComparison, InputError> {
    let first_monthly = value_equity_grant(policy, first)?.monthly_value;
    let second_monthly = value_equity_grant(policy, second)?.monthly_value;

    let preferred = match first_monthly.cmp(&second_monthly) {
        Ordering::Greater => Preference::First,
        Ordering::Less => Preference::Second,
        Ordering::Equal => Preference::Tie,
    };

    Ok(EquityComparison {
        first_monthly,
        second_monthly,
        monthly_difference: (first_monthly - second_monthly).abs(),
        preferred,
    })
}
