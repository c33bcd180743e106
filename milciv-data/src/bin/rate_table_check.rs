use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use milciv_core::{FilingStatus, Rank};
use milciv_data::RateTableLoader;

/// Validate a rate-table directory and print a summary of what it holds.
///
/// The directory may contain any of:
/// - base_pay.csv: rank, min_years, monthly_pay
/// - bah.csv: location, rank, without_dependents, with_dependents
/// - bas.csv: category, monthly_rate
/// - tax_brackets.csv: jurisdiction, filing_status, min_income, max_income, rate
/// - state_taxes.csv: state, method, rate
/// - policy.toml: default duty station, FICA and policy constants
///
/// Without `--dir` the bundled snapshot is checked.
#[derive(Parser, Debug)]
#[command(name = "rate-table-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the rate-table files
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Print every duty station in the housing table
    #[arg(short, long, default_value_t = false)]
    stations: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let tables = match &args.dir {
        Some(dir) => {
            println!("Loading rate tables from: {}", dir.display());
            RateTableLoader::from_dir(dir)
                .with_context(|| format!("Failed to load rate tables from: {}", dir.display()))?
        }
        None => {
            println!("Loading bundled rate tables");
            RateTableLoader::bundled().context("Failed to load bundled rate tables")?
        }
    };

    let ranks = tables.base_pay.ranks().count();
    let missing: Vec<String> = Rank::all()
        .filter(|rank| tables.base_pay.monthly(*rank, 0).is_none())
        .map(|rank| rank.to_string())
        .collect();
    println!("Base pay: {} ranks", ranks);
    if !missing.is_empty() {
        println!("  missing: {}", missing.join(", "));
    }

    let locations: Vec<&str> = tables.housing.locations().collect();
    println!(
        "Housing: {} duty stations (default {})",
        locations.len(),
        tables.housing.default_location()
    );
    if !tables.housing.contains_location(tables.housing.default_location()) {
        println!("  default duty station has no rates");
    }
    if args.stations {
        for location in &locations {
            println!("  {}", location);
        }
    }

    println!(
        "Subsistence: enlisted {}, officer {}",
        tables.subsistence.enlisted, tables.subsistence.officer
    );

    for status in FilingStatus::ALL {
        match tables.federal.schedule(status) {
            Some(schedule) => println!(
                "Federal {}: {} brackets, standard deduction {}",
                status,
                schedule.brackets().len(),
                tables.federal.standard_deduction(status)
            ),
            None => println!("Federal {}: no schedule", status),
        }
    }

    let mut by_method: Vec<(&str, usize)> = Vec::new();
    for (_, method) in tables.states.states() {
        match by_method.iter_mut().find(|(label, _)| *label == method.label()) {
            Some((_, count)) => *count += 1,
            None => by_method.push((method.label(), 1)),
        }
    }
    println!("States: {}", tables.states.len());
    for (label, count) in by_method {
        println!("  {}: {}", label, count);
    }

    println!("Rate tables OK.");

    Ok(())
}
