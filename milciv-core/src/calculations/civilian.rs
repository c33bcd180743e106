//! Civilian take-home pay.
//!
//! # Calculation order
//!
//! | Step | Amount                                                                   |
//! |------|--------------------------------------------------------------------------|
//! | 1    | Gross = base + bonus + sign-on (plan year 1 only) + vested equity        |
//! | 2    | Federal = brackets(gross − standard deduction) − child tax credit        |
//! | 3    | State = state method applied to gross                                    |
//! | 4    | Social security = min(gross, wage base) × rate                           |
//! | 5    | Medicare = gross × rate + (gross − threshold)⁺ × additional rate         |
//! | 6    | Net = gross − (2 + 3 + 4 + 5); monthly = net / 12                        |
//!
//! Bonus and vested equity also get a [`SupplementalWithholding`] estimate:
//! what a paycheck would withhold at the flat supplemental rate. That figure
//! is illustrative cash flow only and is never added to the annual tax.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use milciv_core::calculations::{CivilianCalculator, CivilianInput};
//! use milciv_core::{BracketSchedule, FilingStatus, RateTables, StateTaxMethod, TaxBracket};
//!
//! let mut tables = RateTables::default();
//! tables.federal.set_schedule(
//!     FilingStatus::Single,
//!     BracketSchedule::new(vec![TaxBracket {
//!         min_income: dec!(0),
//!         max_income: None,
//!         rate: dec!(0.10),
//!     }])
//!     .unwrap(),
//! );
//! tables.states.insert("TX", StateTaxMethod::NoIncomeTax);
//!
//! let input = CivilianInput::new(dec!(60000), "TX", FilingStatus::Single);
//! let result = CivilianCalculator::new(&tables).calculate(&input).unwrap();
//!
//! // (60000 − 15750) × 10%
//! assert_eq!(result.breakdown.taxes.federal, dec!(4425.00));
//! // 60000 × 7.65%
//! assert_eq!(result.breakdown.taxes.fica(), dec!(4590.00));
//! assert_eq!(result.breakdown.net_monthly, dec!(4248.75));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::breakdown::{CompensationBreakdown, TaxBreakdown};
use crate::calculations::common::{
    MAX_AMOUNT, ensure_amount, rate_or_zero, round_half_up, to_monthly,
};
use crate::{FilingStatus, InputError, RateTables, StateTaxMethod, Warning, normalize_state};

/// Annual bonus as a percentage of base salary, a flat amount, or both.
///
/// When a flat amount is present the percentage is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTerms {
    /// Percent of base salary, e.g. `15` for 15%.
    pub percent: Option<Decimal>,
    pub flat: Option<Decimal>,
}

impl BonusTerms {
    pub fn percent(percent: Decimal) -> Self {
        Self {
            percent: Some(percent),
            flat: None,
        }
    }

    pub fn flat(amount: Decimal) -> Self {
        Self {
            percent: None,
            flat: Some(amount),
        }
    }

    pub fn annual_amount(&self, base_salary: Decimal) -> Decimal {
        match (self.flat, self.percent) {
            (Some(flat), _) => flat,
            (None, Some(percent)) => {
                round_half_up(base_salary.saturating_mul(percent) / dec!(100))
            }
            (None, None) => Decimal::ZERO,
        }
    }

    fn validate(&self) -> Result<(), InputError> {
        if let Some(percent) = self.percent {
            ensure_amount("bonus_percent", percent)?;
        }
        if let Some(flat) = self.flat {
            ensure_amount("bonus_flat", flat)?;
        }
        Ok(())
    }
}

/// Inputs for one year of civilian compensation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivilianInput {
    pub base_salary: Decimal,
    #[serde(default)]
    pub bonus: BonusTerms,
    /// One-time bonus, counted only in plan year 1.
    #[serde(default)]
    pub sign_on_bonus: Decimal,
    /// Equity value vesting during this year.
    #[serde(default)]
    pub annual_equity: Decimal,
    /// Two-letter state code.
    pub state: String,
    pub filing_status: FilingStatus,
    #[serde(default)]
    pub num_children: u32,
    /// 1-based year of employment being computed.
    #[serde(default = "first_year")]
    pub plan_year: u32,
}

fn first_year() -> u32 {
    1
}

impl CivilianInput {
    pub fn new(
        base_salary: Decimal,
        state: &str,
        filing_status: FilingStatus,
    ) -> Self {
        Self {
            base_salary,
            bonus: BonusTerms::default(),
            sign_on_bonus: Decimal::ZERO,
            annual_equity: Decimal::ZERO,
            state: state.to_string(),
            filing_status,
            num_children: 0,
            plan_year: first_year(),
        }
    }

    fn validate(&self) -> Result<(), InputError> {
        ensure_amount("base_salary", self.base_salary)?;
        ensure_amount("sign_on_bonus", self.sign_on_bonus)?;
        ensure_amount("annual_equity", self.annual_equity)?;
        self.bonus.validate()
    }
}

/// How state tax was determined for the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateTreatment {
    NoIncomeTax,
    Flat { rate: Decimal },
    Progressive,
    /// The state is not in the table; no state tax was assumed.
    NotSupported,
}

impl From<&StateTaxMethod> for StateTreatment {
    fn from(method: &StateTaxMethod) -> Self {
        match method {
            StateTaxMethod::NoIncomeTax => Self::NoIncomeTax,
            StateTaxMethod::Flat(rate) => Self::Flat { rate: *rate },
            StateTaxMethod::Progressive { .. } => Self::Progressive,
        }
    }
}

/// Paycheck withholding on a supplemental payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplementalWithholding {
    pub gross: Decimal,
    pub federal: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    /// Never negative.
    pub net: Decimal,
}

/// Annual taxes for a gross income, before any presentation concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnualTaxes {
    pub taxes: TaxBreakdown,
    pub state_treatment: StateTreatment,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CivilianCompensation {
    pub base_salary: Decimal,
    pub bonus_annual: Decimal,
    /// Sign-on bonus counted in this plan year.
    pub sign_on_bonus: Decimal,
    pub equity_annual: Decimal,
    pub state: String,
    pub state_treatment: StateTreatment,
    pub federal_effective_rate: Decimal,
    pub state_effective_rate: Decimal,
    pub fica_effective_rate: Decimal,
    pub bonus_withholding: Option<SupplementalWithholding>,
    pub equity_withholding: Option<SupplementalWithholding>,
    pub breakdown: CompensationBreakdown,
}

impl CivilianCompensation {
    pub fn warnings(&self) -> &[Warning] {
        &self.breakdown.warnings
    }
}

/// Computes civilian net pay against a borrowed set of rate tables.
pub struct CivilianCalculator<'a> {
    tables: &'a RateTables,
}

impl<'a> CivilianCalculator<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    pub fn calculate(
        &self,
        input: &CivilianInput,
    ) -> Result<CivilianCompensation, InputError> {
        input.validate()?;

        let bonus_annual = input.bonus.annual_amount(input.base_salary);
        let sign_on_bonus = if input.plan_year <= 1 {
            input.sign_on_bonus
        } else {
            Decimal::ZERO
        };
        let gross_annual = input.base_salary + bonus_annual + sign_on_bonus + input.annual_equity;

        let AnnualTaxes {
            taxes,
            state_treatment,
            warnings,
        } = self.annual_taxes(
            gross_annual,
            input.filing_status,
            &input.state,
            input.num_children,
        );

        let net_annual = gross_annual - taxes.total;

        debug!(
            %gross_annual,
            federal = %taxes.federal,
            state = %taxes.state,
            fica = %taxes.fica(),
            %net_annual,
            "computed civilian compensation"
        );

        let bonus_withholding = self.supplemental_withholding(bonus_annual, input.base_salary);
        // Equity is paid after salary, bonus and sign-on for wage base purposes.
        let equity_withholding = self.supplemental_withholding(
            input.annual_equity,
            input.base_salary + bonus_annual + sign_on_bonus,
        );

        Ok(CivilianCompensation {
            base_salary: input.base_salary,
            bonus_annual,
            sign_on_bonus,
            equity_annual: input.annual_equity,
            state: normalize_state(&input.state),
            state_treatment,
            federal_effective_rate: rate_or_zero(taxes.federal, gross_annual),
            state_effective_rate: rate_or_zero(taxes.state, gross_annual),
            fica_effective_rate: rate_or_zero(taxes.fica(), gross_annual),
            bonus_withholding,
            equity_withholding,
            breakdown: CompensationBreakdown {
                taxable_annual: gross_annual,
                non_taxable_annual: Decimal::ZERO,
                gross_annual,
                gross_monthly: to_monthly(gross_annual),
                effective_tax_rate: rate_or_zero(taxes.total, gross_annual),
                taxes,
                net_annual,
                net_monthly: to_monthly(net_annual),
                warnings,
            },
        })
    }

    /// Federal, state and FICA tax on `gross_annual`.
    pub fn annual_taxes(
        &self,
        gross_annual: Decimal,
        filing_status: FilingStatus,
        state: &str,
        num_children: u32,
    ) -> AnnualTaxes {
        let mut warnings = Vec::new();

        let federal_before_credit = self.federal_tax(gross_annual, filing_status, &mut warnings);
        let child_tax_credit = self
            .child_tax_credit(gross_annual, filing_status, num_children)
            .min(federal_before_credit);
        let federal = federal_before_credit - child_tax_credit;

        let (state_tax, state_treatment) =
            self.state_tax(gross_annual, filing_status, state, &mut warnings);
        let social_security = self.social_security_tax(gross_annual);
        let medicare = self.medicare_tax(gross_annual, filing_status);

        let taxes = TaxBreakdown {
            federal,
            child_tax_credit,
            state: state_tax,
            social_security,
            medicare,
            total: federal + state_tax + social_security + medicare,
        };

        AnnualTaxes {
            taxes,
            state_treatment,
            warnings,
        }
    }

    fn federal_tax(
        &self,
        gross_annual: Decimal,
        filing_status: FilingStatus,
        warnings: &mut Vec<Warning>,
    ) -> Decimal {
        let federal = &self.tables.federal;
        let Some(schedule) = federal.schedule(filing_status) else {
            warn!(%filing_status, "no federal schedule loaded, using 0");
            warnings.push(Warning::FederalScheduleUnavailable { filing_status });
            return Decimal::ZERO;
        };

        let taxable = (gross_annual - federal.standard_deduction(filing_status)).max(Decimal::ZERO);
        round_half_up(schedule.tax_on(taxable))
    }

    /// Credit before it is capped at federal tax owed.
    fn child_tax_credit(
        &self,
        gross_annual: Decimal,
        filing_status: FilingStatus,
        num_children: u32,
    ) -> Decimal {
        if num_children == 0 {
            return Decimal::ZERO;
        }

        let policy = &self.tables.policy;
        let full_credit = policy.child_tax_credit_per_child * Decimal::from(num_children);
        let threshold = policy.child_tax_credit_phaseout(filing_status);
        if gross_annual <= threshold {
            return full_credit;
        }

        let thousands_over = ((gross_annual - threshold) / dec!(1000)).floor();
        let reduction = thousands_over * policy.child_tax_credit_reduction_per_thousand;
        (full_credit - reduction).max(Decimal::ZERO)
    }

    fn state_tax(
        &self,
        gross_annual: Decimal,
        filing_status: FilingStatus,
        state: &str,
        warnings: &mut Vec<Warning>,
    ) -> (Decimal, StateTreatment) {
        match self.tables.states.get(state) {
            Some(method) => (
                round_half_up(method.tax_on(gross_annual, filing_status)),
                StateTreatment::from(method),
            ),
            None => {
                let state = normalize_state(state);
                warn!(%state, "state not in tax table, assuming no state income tax");
                warnings.push(Warning::StateNotSupported { state });
                (Decimal::ZERO, StateTreatment::NotSupported)
            }
        }
    }

    fn social_security_tax(&self, wages: Decimal) -> Decimal {
        let fica = &self.tables.fica;
        round_half_up(wages.min(fica.social_security_wage_base) * fica.social_security_rate)
    }

    fn medicare_tax(
        &self,
        wages: Decimal,
        filing_status: FilingStatus,
    ) -> Decimal {
        let fica = &self.tables.fica;
        let over_threshold =
            (wages - fica.additional_medicare_threshold(filing_status)).max(Decimal::ZERO);
        round_half_up(wages * fica.medicare_rate + over_threshold * fica.additional_medicare_rate)
    }

    /// Withholding on `amount` paid after `prior_wages` this year. Social
    /// security applies only to the part still under the wage base.
    fn supplemental_withholding(
        &self,
        amount: Decimal,
        prior_wages: Decimal,
    ) -> Option<SupplementalWithholding> {
        if amount <= Decimal::ZERO {
            return None;
        }

        let fica = &self.tables.fica;
        let remaining_wage_base = (fica.social_security_wage_base - prior_wages).max(Decimal::ZERO);

        let federal = round_half_up(amount * self.tables.policy.supplemental_withholding_rate);
        let social_security =
            round_half_up(amount.min(remaining_wage_base) * fica.social_security_rate);
        let medicare = round_half_up(amount * fica.medicare_rate);
        let net = (amount - federal - social_security - medicare).max(Decimal::ZERO);

        Some(SupplementalWithholding {
            gross: amount,
            federal,
            social_security,
            medicare,
            net,
        })
    }
}

/// Computes one year of civilian net pay for `input` against `tables`.
pub fn compute_civilian_compensation(
    tables: &RateTables,
    input: &CivilianInput,
) -> Result<CivilianCompensation, InputError> {
    CivilianCalculator::new(tables).calculate(input)
}
