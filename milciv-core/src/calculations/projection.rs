//! Multi-year cumulative wealth projection.
//!
//! The military side is constant: monthly RMC plus an employer retirement
//! match priced as a fixed share of base pay. The civilian side is
//! recomputed for every plan year with that year's vested equity and, in
//! year 1 only, the sign-on bonus; each year's net pay is spread evenly over
//! its months.
//!
//! The breakeven month is found by scanning cumulative monthly totals in
//! order. Inputs are piecewise constant (with a step at the vesting cliff),
//! so there is nothing to solve in closed form.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::civilian::{CivilianCalculator, CivilianInput};
use crate::calculations::common::{round_half_up, to_annual};
use crate::calculations::equity::{EquityGrant, compute_vesting_schedule};
use crate::calculations::military::{MilitaryCalculator, MilitaryInput};
use crate::{InputError, MAX_HORIZON_YEARS, RateTables, Warning};

pub const DEFAULT_PROJECTION_YEARS: u32 = 4;

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub military: MilitaryInput,
    /// Salary terms held flat every year. `annual_equity` is replaced by the
    /// grant's schedule when `equity` is set.
    pub civilian: CivilianInput,
    #[serde(default)]
    pub equity: Option<EquityGrant>,
    #[serde(default = "default_years")]
    pub years: u32,
}

fn default_years() -> u32 {
    DEFAULT_PROJECTION_YEARS
}

impl ProjectionInput {
    pub fn new(
        military: MilitaryInput,
        civilian: CivilianInput,
    ) -> Self {
        Self {
            military,
            civilian,
            equity: None,
            years: DEFAULT_PROJECTION_YEARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub military_annual: Decimal,
    pub civilian_net_annual: Decimal,
    pub civilian_equity_vested: Decimal,
    pub civilian_sign_on: Decimal,
    /// Running totals at the end of this year.
    pub military_cumulative: Decimal,
    pub civilian_cumulative: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    /// 1-based month since the start of the projection.
    pub month: u32,
    pub military_cumulative: Decimal,
    pub civilian_cumulative: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// RMC plus retirement match.
    pub military_monthly: Decimal,
    pub retirement_match_monthly: Decimal,
    pub years: Vec<ProjectionYear>,
    pub months: Vec<MonthlyPoint>,
    /// First month at which cumulative civilian wealth exceeds military.
    pub breakeven_month: Option<u32>,
    pub warnings: Vec<Warning>,
}

impl Projection {
    pub fn military_total(&self) -> Decimal {
        self.years
            .last()
            .map_or(Decimal::ZERO, |y| y.military_cumulative)
    }

    pub fn civilian_total(&self) -> Decimal {
        self.years
            .last()
            .map_or(Decimal::ZERO, |y| y.civilian_cumulative)
    }
}

/// Projects cumulative military and civilian wealth over `input.years`.
pub fn compute_projection(
    tables: &RateTables,
    input: &ProjectionInput,
) -> Result<Projection, InputError> {
    if !(1..=MAX_HORIZON_YEARS).contains(&input.years) {
        return Err(InputError::InvalidProjectionHorizon(input.years));
    }

    let military = MilitaryCalculator::new(tables).calculate(&input.military)?;
    let schedule = input
        .equity
        .as_ref()
        .map(|grant| compute_vesting_schedule(tables, grant))
        .transpose()?;

    let retirement_match_monthly =
        round_half_up(military.base_pay_monthly * tables.policy.retirement_match_rate);
    let military_monthly = military.total_monthly + retirement_match_monthly;
    let military_annual = to_annual(military_monthly);

    let mut warnings = military.breakdown.warnings.clone();
    let civilian_calculator = CivilianCalculator::new(tables);

    let mut years = Vec::with_capacity(input.years as usize);
    let mut months = Vec::with_capacity((input.years * MONTHS_PER_YEAR) as usize);
    let mut civilian_cumulative = Decimal::ZERO;
    let mut breakeven_month = None;

    for year in 1..=input.years {
        let annual_equity = match &schedule {
            Some(schedule) => schedule.vested_in_year(year),
            None => input.civilian.annual_equity,
        };
        let civilian_input = CivilianInput {
            plan_year: year,
            annual_equity,
            ..input.civilian.clone()
        };
        let civilian = civilian_calculator.calculate(&civilian_input)?;
        for warning in civilian.breakdown.warnings {
            if !warnings.contains(&warning) {
                warnings.push(warning);
            }
        }

        let net_annual = civilian.breakdown.net_annual;
        let year_start = civilian_cumulative;

        for month_in_year in 1..=MONTHS_PER_YEAR {
            let month = (year - 1) * MONTHS_PER_YEAR + month_in_year;
            let civilian_so_far = year_start
                + round_half_up(net_annual * Decimal::from(month_in_year) / dec!(12));
            let military_so_far = military_monthly * Decimal::from(month);

            if breakeven_month.is_none() && civilian_so_far > military_so_far {
                breakeven_month = Some(month);
            }
            months.push(MonthlyPoint {
                month,
                military_cumulative: military_so_far,
                civilian_cumulative: civilian_so_far,
            });
        }

        civilian_cumulative = year_start + net_annual;
        years.push(ProjectionYear {
            year,
            military_annual,
            civilian_net_annual: net_annual,
            civilian_equity_vested: annual_equity,
            civilian_sign_on: civilian.sign_on_bonus,
            military_cumulative: military_annual * Decimal::from(year),
            civilian_cumulative,
        });
    }

    debug!(
        years = input.years,
        %military_monthly,
        ?breakeven_month,
        "computed projection"
    );

    Ok(Projection {
        military_monthly,
        retirement_match_monthly,
        years,
        months,
        breakeven_month,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::FilingStatus;
    use crate::calculations::test_support::{rank, tables};

    fn e6_norfolk() -> MilitaryInput {
        MilitaryInput::new(rank("E-6"), 6, "NORFOLK/PORTSMOUTH, VA", false, FilingStatus::Single)
    }

    fn civilian(base_salary: Decimal) -> CivilianInput {
        CivilianInput::new(base_salary, "VA", FilingStatus::Single)
    }

    // =========================================================================
    // compute_projection tests
    // =========================================================================

    #[test]
    fn military_side_includes_retirement_match() {
        let tables = tables();
        let input = ProjectionInput::new(e6_norfolk(), civilian(dec!(100000)));

        let projection = compute_projection(&tables, &input).unwrap();

        // 3682.80 × 5%
        assert_eq!(projection.retirement_match_monthly, dec!(184.14));
        assert_eq!(projection.military_monthly, dec!(6717.53));
        assert_eq!(projection.military_total(), dec!(322441.44));
    }

    #[test]
    fn flat_salary_accumulates_net_pay() {
        let tables = tables();
        let input = ProjectionInput::new(e6_norfolk(), civilian(dec!(100000)));

        let projection = compute_projection(&tables, &input).unwrap();

        assert_eq!(projection.years.len(), 4);
        assert_eq!(projection.months.len(), 48);
        assert_eq!(projection.years[0].civilian_net_annual, dec!(73408.50));
        assert_eq!(projection.civilian_total(), dec!(293634.00));
        assert_eq!(projection.months[47].civilian_cumulative, dec!(293634.00));
        assert_eq!(projection.breakeven_month, None);
    }

    #[test]
    fn higher_salary_breaks_even_in_first_month() {
        let tables = tables();
        let input = ProjectionInput::new(e6_norfolk(), civilian(dec!(150000)));

        let projection = compute_projection(&tables, &input).unwrap();

        assert_eq!(projection.breakeven_month, Some(1));
    }

    #[test]
    fn sign_on_counts_only_in_year_one() {
        let tables = tables();
        let input = ProjectionInput::new(
            e6_norfolk(),
            CivilianInput {
                sign_on_bonus: dec!(20000),
                ..civilian(dec!(100000))
            },
        );

        let projection = compute_projection(&tables, &input).unwrap();

        assert_eq!(projection.years[0].civilian_sign_on, dec!(20000));
        assert_eq!(projection.years[1].civilian_sign_on, dec!(0));
        assert!(projection.years[0].civilian_net_annual > projection.years[1].civilian_net_annual);
    }

    #[test]
    fn equity_follows_vesting_cliff() {
        let tables = tables();
        let input = ProjectionInput {
            equity: Some(EquityGrant::new(dec!(100000), false)),
            ..ProjectionInput::new(e6_norfolk(), civilian(dec!(100000)))
        };

        let projection = compute_projection(&tables, &input).unwrap();
        let vested: Vec<_> = projection
            .years
            .iter()
            .map(|y| y.civilian_equity_vested)
            .collect();

        assert_eq!(vested, vec![dec!(0), dec!(25000), dec!(12500), dec!(12500)]);
        assert_eq!(projection.years[0].civilian_net_annual, dec!(73408.50));
    }

    #[test]
    fn cliff_catch_up_can_create_breakeven() {
        let tables = tables();
        let input = ProjectionInput {
            equity: Some(EquityGrant {
                cliff_months: 24,
                ..EquityGrant::new(dec!(200000), true)
            }),
            ..ProjectionInput::new(e6_norfolk(), civilian(dec!(100000)))
        };

        let projection = compute_projection(&tables, &input).unwrap();
        let breakeven = projection.breakeven_month.unwrap();

        // Nothing vests until year 3; the civilian side trails until then.
        assert!(breakeven > 24, "breakeven at month {breakeven}");
        let point = projection.months[(breakeven - 1) as usize];
        assert!(point.civilian_cumulative > point.military_cumulative);
        let before = projection.months[(breakeven - 2) as usize];
        assert!(before.civilian_cumulative <= before.military_cumulative);
    }

    #[test]
    fn cumulative_series_are_non_decreasing() {
        let tables = tables();
        let input = ProjectionInput {
            equity: Some(EquityGrant::new(dec!(80000), true)),
            years: 6,
            ..ProjectionInput::new(e6_norfolk(), civilian(dec!(120000)))
        };

        let projection = compute_projection(&tables, &input).unwrap();

        assert_eq!(projection.months.len(), 72);
        for pair in projection.months.windows(2) {
            assert!(pair[1].military_cumulative >= pair[0].military_cumulative);
            assert!(pair[1].civilian_cumulative >= pair[0].civilian_cumulative);
        }
        assert_eq!(projection.years[5].civilian_equity_vested, dec!(0));
    }

    #[test]
    fn zero_year_horizon_is_rejected() {
        let tables = tables();
        let input = ProjectionInput {
            years: 0,
            ..ProjectionInput::new(e6_norfolk(), civilian(dec!(100000)))
        };

        assert_eq!(
            compute_projection(&tables, &input),
            Err(InputError::InvalidProjectionHorizon(0))
        );
    }

    #[test]
    fn horizon_past_maximum_is_rejected() {
        let tables = tables();

        for years in [MAX_HORIZON_YEARS + 1, 400_000_000, u32::MAX] {
            let input = ProjectionInput {
                years,
                ..ProjectionInput::new(e6_norfolk(), civilian(dec!(100000)))
            };

            assert_eq!(
                compute_projection(&tables, &input),
                Err(InputError::InvalidProjectionHorizon(years))
            );
        }
    }

    #[test]
    fn warnings_are_collected_once() {
        let tables = tables();
        let input = ProjectionInput::new(
            e6_norfolk(),
            CivilianInput::new(dec!(100000), "ZZ", FilingStatus::Single),
        );

        let projection = compute_projection(&tables, &input).unwrap();

        assert_eq!(
            projection.warnings,
            vec![Warning::StateNotSupported {
                state: "ZZ".to_string(),
            }]
        );
    }
}
