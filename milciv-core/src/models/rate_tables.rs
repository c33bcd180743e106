//! Static reference data consumed by the calculators.
//!
//! [`RateTables`] is built once (usually by `milciv-data`) and then passed by
//! reference into every calculation. Nothing in here is mutated after
//! loading; the `insert` methods exist for loaders and test fixtures.
//!
//! | Table              | Key                                   | Value                     |
//! |--------------------|---------------------------------------|---------------------------|
//! | [`BasePayTable`]   | rank, years-of-service breakpoint     | monthly base pay          |
//! | [`HousingTable`]   | duty station, rank                    | [`HousingRate`]           |
//! | [`SubsistenceRates`]| officer / enlisted                   | monthly allowance         |
//! | [`FederalTaxTable`]| filing status                         | schedule, std. deduction  |
//! | [`StateTaxTable`]  | two-letter state code                 | [`StateTaxMethod`]        |

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{BracketSchedule, FicaPolicy, FilingStatus, PolicyConstants, Rank};

/// Duty station whose housing rates stand in for unknown locations.
pub const DEFAULT_DUTY_STATION: &str = "NORFOLK/PORTSMOUTH, VA";

// =============================================================================
// Base pay
// =============================================================================

/// Monthly base pay by rank and years-of-service breakpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasePayTable {
    rows: BTreeMap<Rank, BTreeMap<u32, Decimal>>,
}

impl BasePayTable {
    pub fn insert(
        &mut self,
        rank: Rank,
        min_years: u32,
        monthly: Decimal,
    ) {
        self.rows.entry(rank).or_default().insert(min_years, monthly);
    }

    /// Pay at the highest breakpoint not above `years_of_service`.
    ///
    /// A service length below the first breakpoint gets the first
    /// breakpoint's pay. Returns `None` only when the rank has no row.
    pub fn monthly(
        &self,
        rank: Rank,
        years_of_service: u32,
    ) -> Option<Decimal> {
        let row = self.rows.get(&rank)?;
        row.range(..=years_of_service)
            .next_back()
            .or_else(|| row.iter().next())
            .map(|(_, pay)| *pay)
    }

    /// Breakpoints and pay for one rank, in ascending years.
    pub fn row(&self, rank: Rank) -> impl Iterator<Item = (u32, Decimal)> + '_ {
        self.rows
            .get(&rank)
            .into_iter()
            .flat_map(|row| row.iter().map(|(years, pay)| (*years, *pay)))
    }

    pub fn ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        self.rows.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Housing
// =============================================================================

/// Monthly housing allowance for one rank at one duty station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingRate {
    pub without_dependents: Decimal,
    pub with_dependents: Decimal,
}

impl HousingRate {
    pub fn for_dependents(&self, has_dependents: bool) -> Decimal {
        if has_dependents {
            self.with_dependents
        } else {
            self.without_dependents
        }
    }
}

/// Housing allowance by duty station and rank.
///
/// Location keys are stored trimmed and upper-cased, so lookups are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HousingTable {
    rates: BTreeMap<String, BTreeMap<Rank, HousingRate>>,
    default_location: String,
}

impl HousingTable {
    pub fn new(default_location: &str) -> Self {
        Self {
            rates: BTreeMap::new(),
            default_location: normalize_location(default_location),
        }
    }

    pub fn insert(
        &mut self,
        location: &str,
        rank: Rank,
        rate: HousingRate,
    ) {
        self.rates
            .entry(normalize_location(location))
            .or_default()
            .insert(rank, rate);
    }

    pub fn rate(
        &self,
        location: &str,
        rank: Rank,
    ) -> Option<&HousingRate> {
        self.rates
            .get(&normalize_location(location))
            .and_then(|by_rank| by_rank.get(&rank))
    }

    pub fn contains_location(&self, location: &str) -> bool {
        self.rates.contains_key(&normalize_location(location))
    }

    pub fn default_location(&self) -> &str {
        &self.default_location
    }

    /// Known duty stations in alphabetical order.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for HousingTable {
    fn default() -> Self {
        Self::new(DEFAULT_DUTY_STATION)
    }
}

pub fn normalize_location(location: &str) -> String {
    location.trim().to_uppercase()
}

// =============================================================================
// Subsistence
// =============================================================================

/// Flat monthly subsistence allowance by rank family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsistenceRates {
    pub enlisted: Decimal,
    pub officer: Decimal,
}

impl SubsistenceRates {
    /// Warrant officers draw the officer rate.
    pub fn for_rank(&self, rank: Rank) -> Decimal {
        if rank.category().is_officer() {
            self.officer
        } else {
            self.enlisted
        }
    }
}

impl Default for SubsistenceRates {
    /// 2025 rates.
    fn default() -> Self {
        Self {
            enlisted: dec!(465.77),
            officer: dec!(320.78),
        }
    }
}

// =============================================================================
// Federal
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardDeductions {
    pub single: Decimal,
    pub married: Decimal,
}

impl StandardDeductions {
    pub fn for_status(&self, status: FilingStatus) -> Decimal {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::Married => self.married,
        }
    }
}

impl Default for StandardDeductions {
    /// 2025 amounts.
    fn default() -> Self {
        Self {
            single: dec!(15750),
            married: dec!(31500),
        }
    }
}

/// Federal bracket schedules and standard deductions per filing status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FederalTaxTable {
    schedules: BTreeMap<FilingStatus, BracketSchedule>,
    pub standard_deductions: StandardDeductions,
}

impl FederalTaxTable {
    pub fn set_schedule(
        &mut self,
        status: FilingStatus,
        schedule: BracketSchedule,
    ) {
        self.schedules.insert(status, schedule);
    }

    pub fn schedule(&self, status: FilingStatus) -> Option<&BracketSchedule> {
        self.schedules.get(&status)
    }

    pub fn standard_deduction(&self, status: FilingStatus) -> Decimal {
        self.standard_deductions.for_status(status)
    }
}

// =============================================================================
// State
// =============================================================================

/// How a state taxes wage income.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateTaxMethod {
    NoIncomeTax,
    Flat(Decimal),
    /// Married filers use `single` when the state has no separate table.
    Progressive {
        single: BracketSchedule,
        married: Option<BracketSchedule>,
    },
}

impl StateTaxMethod {
    /// State tax on `income`, unrounded.
    pub fn tax_on(
        &self,
        income: Decimal,
        status: FilingStatus,
    ) -> Decimal {
        if income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        match self {
            Self::NoIncomeTax => Decimal::ZERO,
            Self::Flat(rate) => income * rate,
            Self::Progressive { single, married } => {
                let schedule = match status {
                    FilingStatus::Married => married.as_ref().unwrap_or(single),
                    FilingStatus::Single => single,
                };
                schedule.tax_on(income)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoIncomeTax => "none",
            Self::Flat(_) => "flat",
            Self::Progressive { .. } => "progressive",
        }
    }
}

/// Income-tax treatment by two-letter state code (DC included).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateTaxTable {
    states: BTreeMap<String, StateTaxMethod>,
}

impl StateTaxTable {
    pub fn insert(
        &mut self,
        state: &str,
        method: StateTaxMethod,
    ) {
        self.states.insert(normalize_state(state), method);
    }

    pub fn get(&self, state: &str) -> Option<&StateTaxMethod> {
        self.states.get(&normalize_state(state))
    }

    pub fn states(&self) -> impl Iterator<Item = (&str, &StateTaxMethod)> {
        self.states.iter().map(|(code, method)| (code.as_str(), method))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

pub fn normalize_state(state: &str) -> String {
    state.trim().to_ascii_uppercase()
}

// =============================================================================
// Aggregate
// =============================================================================

/// Every table and policy number a calculation may consult.
///
/// `RateTables::default()` has empty lookup tables and the 2025 policy,
/// FICA, subsistence and standard-deduction values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateTables {
    pub base_pay: BasePayTable,
    pub housing: HousingTable,
    pub subsistence: SubsistenceRates,
    pub federal: FederalTaxTable,
    pub states: StateTaxTable,
    pub fica: FicaPolicy,
    pub policy: PolicyConstants,
}
