use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use milciv_core::calculations::{BonusTerms, CivilianInput, EquityGrant, MilitaryInput};
use milciv_core::{CompanyStage, DEFAULT_DUTY_STATION, FilingStatus, Rank};
use rust_decimal::Decimal;

// --- CLI definition ---

/// Compare military Regular Military Compensation with a civilian offer.
///
/// Rate tables come from `--data-dir` (or `data_dir` in the config file);
/// without either, the bundled 2025 snapshot is used.
#[derive(Debug, Parser)]
#[command(name = "milciv", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file. Defaults to ./milciv.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding rate-table CSV and policy files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `milciv_core=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append log output to this file as well as stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare monthly RMC with a civilian offer and project cumulative pay.
    Compare(CompareArgs),
    /// Show the risk-adjusted vesting schedule for an equity grant.
    Vesting(VestingArgs),
    /// Extract compensation terms from offer-letter text.
    ParseOffer(ParseOfferArgs),
    /// List duty stations with housing rates.
    Stations,
}

fn parse_stage(s: &str) -> Result<CompanyStage, String> {
    CompanyStage::parse(s).ok_or_else(|| {
        let names: Vec<&str> = CompanyStage::ALL.iter().map(|stage| stage.as_str()).collect();
        format!("unknown company stage '{s}' (expected one of: {})", names.join(", "))
    })
}

// --- Military ---

#[derive(Debug, Clone, Args)]
pub struct MilitaryArgs {
    /// Pay grade, e.g. E-6, W-2 or O-3.
    #[arg(long)]
    pub rank: Rank,

    /// Whole years of service.
    #[arg(long, allow_negative_numbers = true)]
    pub years_of_service: i32,

    /// Duty station as listed by `milciv stations`.
    #[arg(long, default_value = DEFAULT_DUTY_STATION)]
    pub location: String,

    /// Use the with-dependents housing rate.
    #[arg(long, default_value_t = false)]
    pub dependents: bool,

    /// Annual taxable special or incentive pay.
    #[arg(long)]
    pub special_pay: Option<Decimal>,

    /// Monthly housing amount to use instead of the table rate.
    #[arg(long)]
    pub manual_bah: Option<Decimal>,
}

impl MilitaryArgs {
    pub fn to_input(&self, filing_status: FilingStatus) -> MilitaryInput {
        MilitaryInput {
            special_pay_annual: self.special_pay,
            manual_housing: self.manual_bah,
            ..MilitaryInput::new(
                self.rank,
                self.years_of_service,
                &self.location,
                self.dependents,
                filing_status,
            )
        }
    }
}

// --- Civilian ---

#[derive(Debug, Clone, Args)]
pub struct CivilianArgs {
    /// Annual base salary.
    #[arg(long)]
    pub salary: Decimal,

    /// Target annual bonus as a percent of salary, e.g. 15.
    #[arg(long)]
    pub bonus_percent: Option<Decimal>,

    /// Flat annual bonus; takes precedence over --bonus-percent.
    #[arg(long)]
    pub bonus_amount: Option<Decimal>,

    /// One-time sign-on bonus, counted in year 1 only.
    #[arg(long, default_value = "0")]
    pub sign_on: Decimal,

    /// Two-letter state code for the civilian job.
    #[arg(long)]
    pub state: String,

    /// Qualifying children for the child tax credit.
    #[arg(long, default_value_t = 0)]
    pub children: u32,
}

impl CivilianArgs {
    pub fn to_input(&self, filing_status: FilingStatus) -> CivilianInput {
        CivilianInput {
            bonus: BonusTerms {
                percent: self.bonus_percent,
                flat: self.bonus_amount,
            },
            sign_on_bonus: self.sign_on,
            num_children: self.children,
            ..CivilianInput::new(self.salary, &self.state, filing_status)
        }
    }
}

// --- Equity ---

#[derive(Debug, Clone, Args)]
pub struct EquityArgs {
    /// Total grant value in dollars.
    #[arg(long = "equity", value_name = "DOLLARS")]
    pub value: Option<Decimal>,

    /// The grant is private-company stock.
    #[arg(long, default_value_t = false)]
    pub private: bool,

    /// Company stage; replaces the flat private discount.
    #[arg(long, value_parser = parse_stage)]
    pub stage: Option<CompanyStage>,

    /// Vesting horizon in years.
    #[arg(long, default_value_t = milciv_core::calculations::equity::DEFAULT_VESTING_YEARS)]
    pub vesting_years: u32,

    /// Months before anything vests.
    #[arg(long, default_value_t = milciv_core::calculations::equity::DEFAULT_CLIFF_MONTHS)]
    pub cliff_months: u32,
}

impl EquityArgs {
    /// `None` when no grant value was given.
    pub fn to_grant(&self) -> Option<EquityGrant> {
        self.value.map(|value| self.grant(value))
    }

    fn grant(&self, value: Decimal) -> EquityGrant {
        EquityGrant {
            vesting_years: self.vesting_years,
            cliff_months: self.cliff_months,
            stage: self.stage,
            ..EquityGrant::new(value, !self.private && self.stage.is_none())
        }
    }
}

// --- Subcommands ---

#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub military: MilitaryArgs,

    #[command(flatten)]
    pub civilian: CivilianArgs,

    #[command(flatten)]
    pub equity: EquityArgs,

    /// Filing status for both sides: single or married.
    #[arg(long, default_value = "single")]
    pub filing_status: FilingStatus,

    /// Projection horizon in years.
    #[arg(long, default_value_t = milciv_core::calculations::projection::DEFAULT_PROJECTION_YEARS)]
    pub years: u32,

    /// Print the full result as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct VestingArgs {
    #[command(flatten)]
    pub equity: EquityArgs,

    /// Second grant value to compare against, on the same terms.
    #[arg(long, value_name = "DOLLARS")]
    pub compare_with: Option<Decimal>,

    /// Print the schedule as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl VestingArgs {
    pub fn grant(&self) -> Result<EquityGrant> {
        match self.equity.to_grant() {
            Some(grant) => Ok(grant),
            None => bail!("--equity is required"),
        }
    }

    pub fn other_grant(&self) -> Option<EquityGrant> {
        self.compare_with.map(|value| self.equity.grant(value))
    }
}

#[derive(Debug, Clone, Args)]
pub struct ParseOfferArgs {
    /// Offer-letter text file. Reads stdin when omitted.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Also compute civilian take-home pay for this state.
    #[arg(long)]
    pub state: Option<String>,

    #[arg(long, default_value = "single")]
    pub filing_status: FilingStatus,

    /// Print the extracted terms as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
