use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use milciv_core::{
    RateTables, compute_civilian_compensation, compute_military_compensation,
    compute_projection, compute_vesting_schedule,
    calculations::{ProjectionInput, compare_equity_grants, compare_monthly},
};
use milciv_data::RateTableLoader;
use milciv_offer::OfferParser;
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{Command, CompareArgs, ParseOfferArgs, VestingArgs};
use crate::config::{self, Config};
use crate::report::{CompareReport, OfferReport, StationsReport, VestingReport};

/// Rate tables from `data_dir`, or the bundled snapshot.
pub fn load_tables(data_dir: Option<&Path>) -> Result<RateTables> {
    match data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "loading rate tables");
            RateTableLoader::from_dir(dir)
                .with_context(|| format!("Failed to load rate tables from: {}", dir.display()))
        }
        None => {
            debug!("using bundled rate tables");
            RateTableLoader::bundled().context("Failed to load bundled rate tables")
        }
    }
}

pub fn compare(
    tables: &RateTables,
    args: &CompareArgs,
) -> Result<CompareReport> {
    let military_input = args.military.to_input(args.filing_status);
    let military =
        compute_military_compensation(tables, &military_input).context("Invalid military input")?;

    let grant = args.equity.to_grant();
    let schedule = grant
        .as_ref()
        .map(|grant| compute_vesting_schedule(tables, grant))
        .transpose()
        .context("Invalid equity grant")?;

    // The side-by-side figure uses the steady-state annual equity value; the
    // projection follows the cliff-accurate schedule.
    let mut civilian_input = args.civilian.to_input(args.filing_status);
    if let Some(schedule) = &schedule {
        civilian_input.annual_equity = schedule.valuation().annualized_value;
    }
    let civilian =
        compute_civilian_compensation(tables, &civilian_input).context("Invalid civilian input")?;

    let summary = compare_monthly(&military, &civilian);

    let projection = compute_projection(
        tables,
        &ProjectionInput {
            equity: grant,
            years: args.years,
            ..ProjectionInput::new(military_input, args.civilian.to_input(args.filing_status))
        },
    )
    .context("Invalid projection input")?;

    Ok(CompareReport {
        military,
        civilian,
        equity: schedule,
        summary,
        projection,
    })
}

pub fn vesting(
    tables: &RateTables,
    args: &VestingArgs,
) -> Result<VestingReport> {
    let grant = args.grant()?;
    let schedule = compute_vesting_schedule(tables, &grant).context("Invalid equity grant")?;

    let comparison = args
        .other_grant()
        .map(|other| compare_equity_grants(&tables.policy, &grant, &other))
        .transpose()
        .context("Invalid comparison grant")?;

    Ok(VestingReport {
        schedule,
        comparison,
    })
}

pub async fn parse_offer(
    tables: &RateTables,
    parser: &OfferParser,
    text: &str,
    args: &ParseOfferArgs,
) -> Result<OfferReport> {
    let terms = parser.parse(text).await;

    let civilian = match &args.state {
        Some(state) => Some(
            compute_civilian_compensation(tables, &terms.civilian_input(state, args.filing_status))
                .context("Extracted terms are not a valid civilian input")?,
        ),
        None => None,
    };

    Ok(OfferReport { terms, civilian })
}

pub fn stations(tables: &RateTables) -> StationsReport {
    StationsReport {
        default_location: tables.housing.default_location().to_string(),
        locations: tables.housing.locations().map(str::to_string).collect(),
    }
}

fn read_offer_text(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read offer: {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read offer from stdin")?;
            Ok(text)
        }
    }
}

fn print<T: Serialize + std::fmt::Display>(
    report: &T,
    json: bool,
) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("Failed to serialize report")?
        );
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Runs one subcommand against loaded tables.
pub async fn run(
    command: &Command,
    config: &Config,
    tables: &RateTables,
) -> Result<()> {
    match command {
        Command::Compare(args) => print(&compare(tables, args)?, args.json),
        Command::Vesting(args) => print(&vesting(tables, args)?, args.json),
        Command::ParseOffer(args) => {
            let text = read_offer_text(args.file.as_deref())?;
            let parser = OfferParser::from_config(&config.offer_parser, config::api_key());
            print(&parse_offer(tables, &parser, &text, args).await?, args.json)
        }
        Command::Stations => print(&stations(tables), false),
    }
}
