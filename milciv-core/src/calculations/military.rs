//! Regular Military Compensation (RMC).
//!
//! Monthly RMC is built from four parts:
//!
//! | Part            | Taxable | Source                                        |
//! |-----------------|---------|-----------------------------------------------|
//! | Base pay        | yes     | [`BasePayTable`](crate::BasePayTable) lookup  |
//! | Housing (BAH)   | no      | [`HousingTable`](crate::HousingTable) lookup or manual override |
//! | Subsistence     | no      | flat officer / enlisted rate                  |
//! | Tax advantage   | n/a     | (BAH + BAS) × two-tier approximate rate       |
//!
//! plus the after-tax share of any annual special pay.
//!
//! The tax advantage is the civilian pre-tax value of receiving housing and
//! subsistence tax-free. It uses a lower flat rate when annual base pay less
//! the standard deduction is under the policy threshold, and an upper flat
//! rate otherwise. It is an approximation, not a bracket integration.
//!
//! Lookup misses never fail: they fall back to a documented value and add a
//! [`Warning`] to the breakdown.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use milciv_core::calculations::{MilitaryCalculator, MilitaryInput};
//! use milciv_core::{FilingStatus, HousingRate, Rank, RateTables};
//!
//! let e6 = Rank::parse("E-6").unwrap();
//! let mut tables = RateTables::default();
//! tables.base_pay.insert(e6, 6, dec!(3682.80));
//! tables.housing.insert(
//!     "NORFOLK/PORTSMOUTH, VA",
//!     e6,
//!     HousingRate { without_dependents: dec!(2013.00), with_dependents: dec!(2373.00) },
//! );
//!
//! let input = MilitaryInput::new(e6, 6, "NORFOLK/PORTSMOUTH, VA", false, FilingStatus::Single);
//! let result = MilitaryCalculator::new(&tables).calculate(&input).unwrap();
//!
//! assert_eq!(result.subsistence_monthly, dec!(465.77));
//! assert_eq!(result.tax_advantage_monthly, dec!(371.82));
//! assert_eq!(result.total_monthly, dec!(6533.39));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::breakdown::CompensationBreakdown;
use crate::calculations::common::{
    MAX_AMOUNT, ensure_amount, round_half_up, to_annual, to_monthly,
};
use crate::{FilingStatus, InputError, Rank, RateTables, Warning};

/// Inputs for one military compensation calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilitaryInput {
    pub rank: Rank,
    /// Whole years of service. Negative values are rejected.
    pub years_of_service: i32,
    /// Duty-station name as it appears in the housing table.
    pub location: String,
    pub has_dependents: bool,
    pub filing_status: FilingStatus,
    /// Annual taxable special or incentive pay.
    #[serde(default)]
    pub special_pay_annual: Option<Decimal>,
    /// Monthly housing amount that replaces the table lookup when positive.
    #[serde(default)]
    pub manual_housing: Option<Decimal>,
}

impl MilitaryInput {
    pub fn new(
        rank: Rank,
        years_of_service: i32,
        location: &str,
        has_dependents: bool,
        filing_status: FilingStatus,
    ) -> Self {
        Self {
            rank,
            years_of_service,
            location: location.to_string(),
            has_dependents,
            filing_status,
            special_pay_annual: None,
            manual_housing: None,
        }
    }
}

/// Where the housing figure came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HousingSource {
    /// Table rate for the requested duty station.
    Official,
    /// The requested duty station was unknown; the default station's rate
    /// was used.
    DefaultLocation { requested: String, used: String },
    /// Caller-supplied override.
    Manual,
    /// No rate could be found; housing is zero.
    Unavailable,
}

/// Monthly RMC detail plus the shared breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilitaryCompensation {
    pub base_pay_monthly: Decimal,
    pub housing_monthly: Decimal,
    pub housing_source: HousingSource,
    pub subsistence_monthly: Decimal,
    pub tax_advantage_monthly: Decimal,
    /// Rate the tax advantage was priced at.
    pub tax_advantage_rate: Decimal,
    pub special_pay_after_tax_monthly: Decimal,
    /// Base + housing + subsistence + tax advantage + special pay after tax.
    pub total_monthly: Decimal,
    pub breakdown: CompensationBreakdown,
}

impl MilitaryCompensation {
    pub fn non_taxable_monthly(&self) -> Decimal {
        self.housing_monthly + self.subsistence_monthly
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.breakdown.warnings
    }
}

/// Computes RMC against a borrowed set of rate tables.
pub struct MilitaryCalculator<'a> {
    tables: &'a RateTables,
}

impl<'a> MilitaryCalculator<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    pub fn calculate(
        &self,
        input: &MilitaryInput,
    ) -> Result<MilitaryCompensation, InputError> {
        let years = u32::try_from(input.years_of_service)
            .map_err(|_| InputError::NegativeYearsOfService(input.years_of_service))?;
        let special_pay_annual =
            ensure_amount("special_pay_annual", input.special_pay_annual.unwrap_or_default())?;
        if let Some(manual) = input.manual_housing {
            ensure_amount("manual_housing", manual)?;
        }

        let mut warnings = Vec::new();

        let base_pay_monthly = self.base_pay(input.rank, years, &mut warnings);
        let (housing_monthly, housing_source) = self.housing(input, &mut warnings);
        let subsistence_monthly = self.tables.subsistence.for_rank(input.rank);

        let standard_deduction = self.tables.federal.standard_deduction(input.filing_status);
        let annual_base = to_annual(base_pay_monthly);

        let tax_advantage_rate = self.advantage_rate(annual_base, standard_deduction);
        let tax_advantage_monthly =
            round_half_up((housing_monthly + subsistence_monthly) * tax_advantage_rate);

        let special_pay_after_tax_monthly = if special_pay_annual.is_zero() {
            Decimal::ZERO
        } else {
            let rate = self.advantage_rate(annual_base + special_pay_annual, standard_deduction);
            to_monthly(special_pay_annual * (Decimal::ONE - rate))
        };

        let total_monthly = base_pay_monthly
            + housing_monthly
            + subsistence_monthly
            + tax_advantage_monthly
            + special_pay_after_tax_monthly;

        debug!(
            rank = %input.rank,
            years,
            %base_pay_monthly,
            %housing_monthly,
            %subsistence_monthly,
            %tax_advantage_monthly,
            %total_monthly,
            "computed military compensation"
        );

        let taxable_annual = annual_base + special_pay_annual;
        let non_taxable_annual = to_annual(housing_monthly + subsistence_monthly);
        let gross_annual = taxable_annual + non_taxable_annual;

        let breakdown = CompensationBreakdown {
            taxable_annual,
            non_taxable_annual,
            gross_annual,
            gross_monthly: to_monthly(gross_annual),
            taxes: Default::default(),
            net_annual: to_annual(total_monthly),
            net_monthly: total_monthly,
            effective_tax_rate: Decimal::ZERO,
            warnings,
        };

        Ok(MilitaryCompensation {
            base_pay_monthly,
            housing_monthly,
            housing_source,
            subsistence_monthly,
            tax_advantage_monthly,
            tax_advantage_rate,
            special_pay_after_tax_monthly,
            total_monthly,
            breakdown,
        })
    }

    fn base_pay(
        &self,
        rank: Rank,
        years: u32,
        warnings: &mut Vec<Warning>,
    ) -> Decimal {
        match self.tables.base_pay.monthly(rank, years) {
            Some(pay) => pay,
            None => {
                warn!(%rank, years, "no base pay row for rank, using 0");
                warnings.push(Warning::BasePayUnavailable {
                    rank,
                    years_of_service: years,
                });
                Decimal::ZERO
            }
        }
    }

    /// Manual override, then the requested station, then the default station.
    fn housing(
        &self,
        input: &MilitaryInput,
        warnings: &mut Vec<Warning>,
    ) -> (Decimal, HousingSource) {
        if let Some(manual) = input.manual_housing.filter(|m| *m > Decimal::ZERO) {
            return (manual, HousingSource::Manual);
        }

        let housing = &self.tables.housing;

        if let Some(rate) = housing.rate(&input.location, input.rank) {
            return (rate.for_dependents(input.has_dependents), HousingSource::Official);
        }

        let default_location = housing.default_location();
        if let Some(rate) = housing.rate(default_location, input.rank) {
            warn!(
                requested = %input.location,
                used = default_location,
                "duty station not found, using default station housing rate"
            );
            warnings.push(Warning::HousingLocationFallback {
                requested: input.location.clone(),
                used: default_location.to_string(),
            });
            let source = HousingSource::DefaultLocation {
                requested: input.location.clone(),
                used: default_location.to_string(),
            };
            return (rate.for_dependents(input.has_dependents), source);
        }

        warn!(location = %input.location, rank = %input.rank, "no housing rate available, using 0");
        warnings.push(Warning::HousingRateUnavailable {
            location: input.location.clone(),
            rank: input.rank,
        });
        (Decimal::ZERO, HousingSource::Unavailable)
    }

    fn advantage_rate(
        &self,
        annual_taxable_pay: Decimal,
        standard_deduction: Decimal,
    ) -> Decimal {
        let taxable = (annual_taxable_pay - standard_deduction).max(Decimal::ZERO);
        self.tables.policy.tax_advantage_rate(taxable)
    }
}

/// Computes monthly RMC for `input` against `tables`.
pub fn compute_military_compensation(
    tables: &RateTables,
    input: &MilitaryInput,
) -> Result<MilitaryCompensation, InputError> {
    MilitaryCalculator::new(tables).calculate(input)
}
