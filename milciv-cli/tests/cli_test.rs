use clap::Parser;
use milciv_cli::cli::{Cli, Command};
use milciv_cli::commands;
use milciv_core::RateTables;
use milciv_core::calculations::{Leader, Preference};
use milciv_offer::{ExtractionMethod, OfferParser, PatternExtractor};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn bundled() -> RateTables {
    commands::load_tables(None).unwrap()
}

fn command(args: &[&str]) -> Command {
    Cli::try_parse_from(args).unwrap().command
}

// =============================================================================
// fn compare
// =============================================================================

fn e6_vs_virginia(extra: &[&str]) -> Command {
    let mut args = vec![
        "milciv", "compare", "--rank", "E-6", "--years-of-service", "6", "--salary", "100000",
        "--state", "VA",
    ];
    args.extend_from_slice(extra);
    command(&args)
}

#[test]
fn test_compare_e6_against_virginia_offer() {
    let Command::Compare(args) = e6_vs_virginia(&[]) else {
        panic!("expected compare");
    };

    let report = commands::compare(&bundled(), &args).unwrap();

    assert_eq!(report.military.total_monthly, dec!(6533.39));
    assert_eq!(report.civilian.breakdown.net_monthly, dec!(6117.38));
    assert_eq!(report.summary.monthly_difference, dec!(-416.01));
    assert_eq!(report.summary.annual_difference, dec!(-4992.12));
    assert_eq!(report.summary.leader, Leader::Military);
    assert!(report.equity.is_none());

    assert_eq!(report.projection.years.len(), 4);
    assert_eq!(report.projection.retirement_match_monthly, dec!(184.14));
    assert_eq!(report.projection.military_total(), dec!(322441.44));
    assert_eq!(report.projection.breakeven_month, None);
}

#[test]
fn test_compare_report_renders_every_section() {
    let Command::Compare(args) = e6_vs_virginia(&[]) else {
        panic!("expected compare");
    };

    let text = commands::compare(&bundled(), &args).unwrap().to_string();

    assert!(text.contains("Military (monthly)"));
    assert!(text.contains("$6,533.39"));
    assert!(text.contains("Civilian (annual, VA)"));
    assert!(text.contains("$6,117.38"));
    assert!(text.contains("Comparison (net monthly)"));
    assert!(text.contains("-$416.01"));
    assert!(text.contains("Civilian never pulls ahead"));
}

#[test]
fn test_compare_with_equity_adds_schedule() {
    let Command::Compare(args) = e6_vs_virginia(&["--equity", "100000", "--private"]) else {
        panic!("expected compare");
    };

    let report = commands::compare(&bundled(), &args).unwrap();

    let schedule = report.equity.as_ref().unwrap();
    assert_eq!(schedule.adjusted_value(), dec!(50000));
    assert_eq!(report.civilian.equity_annual, dec!(12500));
    assert!(report.civilian.breakdown.net_monthly > dec!(6117.38));
}

#[test]
fn test_compare_json_is_valid() {
    let Command::Compare(args) = e6_vs_virginia(&[]) else {
        panic!("expected compare");
    };

    let report = commands::compare(&bundled(), &args).unwrap();
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["summary"]["leader"], "military");
    assert_eq!(json["projection"]["years"].as_array().unwrap().len(), 4);
}

#[test]
fn test_compare_rejects_out_of_range_service_years() {
    let Command::Compare(args) = command(&[
        "milciv", "compare", "--rank", "E-6", "--years-of-service", "-1", "--salary", "100000",
        "--state", "VA",
    ]) else {
        panic!("expected compare");
    };

    assert!(commands::compare(&bundled(), &args).is_err());
}

#[test]
fn test_compare_rejects_projection_past_fifty_years() {
    let Command::Compare(args) = e6_vs_virginia(&["--years", "51"]) else {
        panic!("expected compare");
    };

    assert!(commands::compare(&bundled(), &args).is_err());
}

// =============================================================================
// fn vesting
// =============================================================================

#[test]
fn test_vesting_private_grant() {
    let Command::Vesting(args) = command(&["milciv", "vesting", "--equity", "100000", "--private"])
    else {
        panic!("expected vesting");
    };

    let report = commands::vesting(&bundled(), &args).unwrap();

    let vested: Vec<_> = (1..=4).map(|y| report.schedule.vested_in_year(y)).collect();
    assert_eq!(vested, vec![dec!(0), dec!(25000), dec!(12500), dec!(12500)]);
    assert!(report.comparison.is_none());
}

#[test]
fn test_vesting_compares_two_grants() {
    let Command::Vesting(args) = command(&[
        "milciv", "vesting", "--equity", "60000", "--compare-with", "100000",
    ]) else {
        panic!("expected vesting");
    };

    let report = commands::vesting(&bundled(), &args).unwrap();

    let comparison = report.comparison.as_ref().unwrap();
    assert_eq!(comparison.preferred, Preference::Second);
    assert!(report.to_string().contains("second grant is worth more"));
}

#[test]
fn test_vesting_without_equity_fails() {
    let Command::Vesting(args) = command(&["milciv", "vesting"]) else {
        panic!("expected vesting");
    };

    assert!(commands::vesting(&bundled(), &args).is_err());
}

// =============================================================================
// fn parse_offer
// =============================================================================

const OFFER: &str = "\
Base Salary: $120,000 per year.
Sign-On Bonus: $10,000.
We are a privately held startup.
";

#[tokio::test]
async fn test_parse_offer_with_state_computes_take_home() {
    let Command::ParseOffer(args) = command(&["milciv", "parse-offer", "--state", "TX"]) else {
        panic!("expected parse-offer");
    };
    let parser = OfferParser::pattern_only(PatternExtractor::default());

    let report = commands::parse_offer(&bundled(), &parser, OFFER, &args)
        .await
        .unwrap();

    assert_eq!(report.terms.method, ExtractionMethod::Pattern);
    assert_eq!(report.terms.base_salary, dec!(120000));
    assert_eq!(report.terms.sign_on_bonus, dec!(10000));
    assert!(!report.terms.is_public_company);

    let civilian = report.civilian.as_ref().unwrap();
    assert_eq!(civilian.base_salary, dec!(120000));
    assert_eq!(civilian.breakdown.taxes.state, dec!(0));

    let text = report.to_string();
    assert!(text.contains("low confidence"));
    assert!(text.contains("private"));
}

#[tokio::test]
async fn test_parse_offer_without_state_skips_take_home() {
    let Command::ParseOffer(args) = command(&["milciv", "parse-offer"]) else {
        panic!("expected parse-offer");
    };
    let parser = OfferParser::pattern_only(PatternExtractor::default());

    let report = commands::parse_offer(&bundled(), &parser, OFFER, &args)
        .await
        .unwrap();

    assert!(report.civilian.is_none());
}

// =============================================================================
// fn stations
// =============================================================================

#[test]
fn test_stations_lists_default() {
    let report = commands::stations(&bundled());

    assert_eq!(report.default_location, "NORFOLK/PORTSMOUTH, VA");
    assert!(report.locations.iter().any(|l| *l == report.default_location));
    assert!(report.to_string().contains("NORFOLK/PORTSMOUTH, VA (default)"));
}
