use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use milciv_core::{
    BasePayTable, BracketSchedule, FederalTaxTable, FilingStatus, HousingRate, HousingTable, Rank,
    RateTables, StandardDeductions, StateTaxMethod, StateTaxTable, SubsistenceRates, TaxBracket,
    normalize_state,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::LoaderError;
use crate::records::{
    BasePayRecord, HousingRecord, PolicyFile, StateTaxRecord, SubsistenceRecord, TaxBracketRecord,
};

const FEDERAL_JURISDICTION: &str = "US";

/// Raw text of each rate-table file. `None` means the file is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateTableSources<'a> {
    pub base_pay: Option<&'a str>,
    pub housing: Option<&'a str>,
    pub subsistence: Option<&'a str>,
    pub tax_brackets: Option<&'a str>,
    pub state_taxes: Option<&'a str>,
    pub policy: Option<&'a str>,
}

/// Loader for rate-table directories.
///
/// Parsing is split from table building so each step can be tested with
/// in-memory CSV text, the same way a file on disk is read.
pub struct RateTableLoader;

impl RateTableLoader {
    pub const BASE_PAY_FILE: &'static str = "base_pay.csv";
    pub const HOUSING_FILE: &'static str = "bah.csv";
    pub const SUBSISTENCE_FILE: &'static str = "bas.csv";
    pub const TAX_BRACKETS_FILE: &'static str = "tax_brackets.csv";
    pub const STATE_TAXES_FILE: &'static str = "state_taxes.csv";
    pub const POLICY_FILE: &'static str = "policy.toml";

    /// Parse records of type `T` from a CSV reader with a header row.
    pub fn parse<T: DeserializeOwned, R: Read>(
        file: &'static str,
        reader: R,
    ) -> Result<Vec<T>, LoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: T = result.map_err(|err| LoaderError::CsvParse {
                file,
                message: err.to_string(),
            })?;
            records.push(record);
        }

        Ok(records)
    }

    pub fn parse_policy(text: &str) -> Result<PolicyFile, LoaderError> {
        Ok(toml::from_str(text)?)
    }

    pub fn base_pay_table(records: &[BasePayRecord]) -> Result<BasePayTable, LoaderError> {
        let mut table = BasePayTable::default();
        for record in records {
            table.insert(parse_rank(&record.rank)?, record.min_years, record.monthly_pay);
        }
        Ok(table)
    }

    pub fn housing_table(
        records: &[HousingRecord],
        default_location: &str,
    ) -> Result<HousingTable, LoaderError> {
        let mut table = HousingTable::new(default_location);
        for record in records {
            table.insert(
                &record.location,
                parse_rank(&record.rank)?,
                HousingRate {
                    without_dependents: record.without_dependents,
                    with_dependents: record.with_dependents,
                },
            );
        }
        Ok(table)
    }

    /// Starts from the built-in rates and overrides whichever categories the
    /// file lists.
    pub fn subsistence_rates(records: &[SubsistenceRecord]) -> Result<SubsistenceRates, LoaderError> {
        let mut rates = SubsistenceRates::default();
        for record in records {
            match record.category.trim().to_ascii_lowercase().as_str() {
                "enlisted" => rates.enlisted = record.monthly_rate,
                "officer" => rates.officer = record.monthly_rate,
                other => return Err(LoaderError::UnknownCategory(other.to_string())),
            }
        }
        Ok(rates)
    }

    pub fn federal_table(
        brackets: &[TaxBracketRecord],
        standard_deductions: StandardDeductions,
    ) -> Result<FederalTaxTable, LoaderError> {
        let mut table = FederalTaxTable::default();
        table.standard_deductions = standard_deductions;

        let mut grouped = group_brackets(brackets)?;
        for status in FilingStatus::ALL {
            if let Some(schedule) = grouped.remove(&(FEDERAL_JURISDICTION.to_string(), status)) {
                table.set_schedule(status, schedule);
            }
        }
        Ok(table)
    }

    pub fn state_table(
        states: &[StateTaxRecord],
        brackets: &[TaxBracketRecord],
    ) -> Result<StateTaxTable, LoaderError> {
        let mut grouped = group_brackets(brackets)?;
        let mut table = StateTaxTable::default();

        for record in states {
            let state = normalize_state(&record.state);
            let method = match record.method.trim().to_ascii_lowercase().as_str() {
                "none" => StateTaxMethod::NoIncomeTax,
                "flat" => StateTaxMethod::Flat(
                    record
                        .rate
                        .ok_or_else(|| LoaderError::MissingStateRate(state.clone()))?,
                ),
                "progressive" => {
                    let single = grouped
                        .remove(&(state.clone(), FilingStatus::Single))
                        .ok_or_else(|| LoaderError::MissingStateBrackets(state.clone()))?;
                    let married = grouped.remove(&(state.clone(), FilingStatus::Married));
                    StateTaxMethod::Progressive { single, married }
                }
                other => {
                    return Err(LoaderError::UnknownStateMethod {
                        state,
                        method: other.to_string(),
                    });
                }
            };
            table.insert(&state, method);
        }

        Ok(table)
    }

    /// Builds every table from in-memory sources. Absent sources give empty
    /// tables or built-in defaults.
    pub fn from_sources(sources: &RateTableSources<'_>) -> Result<RateTables, LoaderError> {
        let policy = match sources.policy {
            Some(text) => Self::parse_policy(text)?,
            None => PolicyFile::default(),
        };

        let base_pay: Vec<BasePayRecord> = parse_optional(Self::BASE_PAY_FILE, sources.base_pay)?;
        let housing: Vec<HousingRecord> = parse_optional(Self::HOUSING_FILE, sources.housing)?;
        let subsistence: Vec<SubsistenceRecord> =
            parse_optional(Self::SUBSISTENCE_FILE, sources.subsistence)?;
        let brackets: Vec<TaxBracketRecord> =
            parse_optional(Self::TAX_BRACKETS_FILE, sources.tax_brackets)?;
        let states: Vec<StateTaxRecord> =
            parse_optional(Self::STATE_TAXES_FILE, sources.state_taxes)?;

        let tables = RateTables {
            base_pay: Self::base_pay_table(&base_pay)?,
            housing: Self::housing_table(&housing, &policy.housing.default_location)?,
            subsistence: Self::subsistence_rates(&subsistence)?,
            federal: Self::federal_table(&brackets, policy.standard_deduction)?,
            states: Self::state_table(&states, &brackets)?,
            fica: policy.fica,
            policy: policy.policy,
        };

        debug!(
            base_pay_rows = base_pay.len(),
            housing_rows = housing.len(),
            bracket_rows = brackets.len(),
            states = tables.states.len(),
            "built rate tables"
        );

        Ok(tables)
    }

    /// Loads a rate-table directory. Missing files are logged and treated as
    /// absent; unreadable or malformed files are errors.
    pub fn from_dir(dir: &Path) -> Result<RateTables, LoaderError> {
        let base_pay = read_optional(dir, Self::BASE_PAY_FILE)?;
        let housing = read_optional(dir, Self::HOUSING_FILE)?;
        let subsistence = read_optional(dir, Self::SUBSISTENCE_FILE)?;
        let tax_brackets = read_optional(dir, Self::TAX_BRACKETS_FILE)?;
        let state_taxes = read_optional(dir, Self::STATE_TAXES_FILE)?;
        let policy = read_optional(dir, Self::POLICY_FILE)?;

        let tables = Self::from_sources(&RateTableSources {
            base_pay: base_pay.as_deref(),
            housing: housing.as_deref(),
            subsistence: subsistence.as_deref(),
            tax_brackets: tax_brackets.as_deref(),
            state_taxes: state_taxes.as_deref(),
            policy: policy.as_deref(),
        })?;

        info!(dir = %dir.display(), "loaded rate tables");
        Ok(tables)
    }

    /// The 2025 snapshot compiled into the binary.
    pub fn bundled() -> Result<RateTables, LoaderError> {
        Self::from_sources(&RateTableSources {
            base_pay: Some(include_str!("../data/base_pay.csv")),
            housing: Some(include_str!("../data/bah.csv")),
            subsistence: Some(include_str!("../data/bas.csv")),
            tax_brackets: Some(include_str!("../data/tax_brackets.csv")),
            state_taxes: Some(include_str!("../data/state_taxes.csv")),
            policy: Some(include_str!("../data/policy.toml")),
        })
    }
}

fn parse_rank(s: &str) -> Result<Rank, LoaderError> {
    Rank::parse(s).map_err(|_| LoaderError::UnknownRank(s.to_string()))
}

fn parse_optional<T: DeserializeOwned>(
    file: &'static str,
    text: Option<&str>,
) -> Result<Vec<T>, LoaderError> {
    match text {
        Some(text) => RateTableLoader::parse(file, text.as_bytes()),
        None => Ok(Vec::new()),
    }
}

fn read_optional(
    dir: &Path,
    file: &str,
) -> Result<Option<String>, LoaderError> {
    let path = dir.join(file);
    if !path.exists() {
        warn!(path = %path.display(), "rate table file missing, using empty table");
        return Ok(None);
    }
    fs::read_to_string(&path)
        .map(Some)
        .map_err(|source| LoaderError::Io { path, source })
}

/// Groups bracket rows by (jurisdiction, filing status) and validates each
/// group as a schedule.
fn group_brackets(
    records: &[TaxBracketRecord],
) -> Result<BTreeMap<(String, FilingStatus), BracketSchedule>, LoaderError> {
    let mut groups: BTreeMap<(String, FilingStatus), Vec<TaxBracket>> = BTreeMap::new();

    for record in records {
        let status = FilingStatus::parse(&record.filing_status)
            .ok_or_else(|| LoaderError::UnknownFilingStatus(record.filing_status.clone()))?;
        groups
            .entry((normalize_state(&record.jurisdiction), status))
            .or_default()
            .push(TaxBracket {
                min_income: record.min_income,
                max_income: record.max_income,
                rate: record.rate,
            });
    }

    groups
        .into_iter()
        .map(|((jurisdiction, status), brackets)| match BracketSchedule::new(brackets) {
            Ok(schedule) => Ok(((jurisdiction, status), schedule)),
            Err(source) => Err(LoaderError::InvalidSchedule {
                jurisdiction,
                filing_status: status.to_string(),
                source,
            }),
        })
        .collect()
}
