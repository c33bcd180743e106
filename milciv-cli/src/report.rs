//! Report types printed by the subcommands.
//!
//! Each report serializes to JSON for `--json` and implements `Display` for
//! the plain-text form.

use std::fmt;

use milciv_core::Warning;
use milciv_core::calculations::{
    CivilianCompensation, ComparisonSummary, EquityComparison, HousingSource, Leader,
    MilitaryCompensation, Preference, Projection, StateTreatment, SupplementalWithholding,
    VestingSchedule,
};
use milciv_offer::OfferTerms;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

// --- Formatting helpers ---

/// `$1,234.56`, with a leading `-` for negatives.
pub fn money(value: Decimal) -> String {
    let fixed = format!("{:.2}", round_cents(value.abs()));
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// `0.1345` → `13.45%`.
pub fn percent(rate: Decimal) -> String {
    format!("{:.2}%", round_cents(rate * Decimal::ONE_HUNDRED))
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn write_warnings(
    f: &mut fmt::Formatter<'_>,
    warnings: &[Warning],
) -> fmt::Result {
    for warning in warnings {
        writeln!(f, "  ! {warning}")?;
    }
    Ok(())
}

fn housing_note(source: &HousingSource) -> String {
    match source {
        HousingSource::Official => "table rate".to_string(),
        HousingSource::DefaultLocation { used, .. } => format!("default station {used}"),
        HousingSource::Manual => "manual".to_string(),
        HousingSource::Unavailable => "unavailable".to_string(),
    }
}

fn state_note(treatment: &StateTreatment) -> String {
    match treatment {
        StateTreatment::NoIncomeTax => "no income tax".to_string(),
        StateTreatment::Flat { rate } => format!("flat {}", percent(*rate)),
        StateTreatment::Progressive => "brackets".to_string(),
        StateTreatment::NotSupported => "not in table, assumed 0".to_string(),
    }
}

// --- Military ---

struct MilitarySection<'a>(&'a MilitaryCompensation);

impl fmt::Display for MilitarySection<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let m = self.0;
        writeln!(f, "Military (monthly)")?;
        writeln!(f, "  Base pay:          {:>14}", money(m.base_pay_monthly))?;
        writeln!(
            f,
            "  Housing (BAH):     {:>14}  {}",
            money(m.housing_monthly),
            housing_note(&m.housing_source)
        )?;
        writeln!(f, "  Subsistence (BAS): {:>14}", money(m.subsistence_monthly))?;
        writeln!(
            f,
            "  Tax advantage:     {:>14}  at {}",
            money(m.tax_advantage_monthly),
            percent(m.tax_advantage_rate)
        )?;
        if !m.special_pay_after_tax_monthly.is_zero() {
            writeln!(
                f,
                "  Special pay (net): {:>14}",
                money(m.special_pay_after_tax_monthly)
            )?;
        }
        writeln!(f, "  Total RMC:         {:>14}", money(m.total_monthly))?;
        write_warnings(f, &m.breakdown.warnings)
    }
}

// --- Civilian ---

struct CivilianSection<'a>(&'a CivilianCompensation);

fn write_withholding(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    w: &SupplementalWithholding,
) -> fmt::Result {
    writeln!(
        f,
        "  {label} withholding: {} gross, {} federal, {} FICA, {} net",
        money(w.gross),
        money(w.federal),
        money(w.social_security + w.medicare),
        money(w.net)
    )
}

impl fmt::Display for CivilianSection<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let c = self.0;
        let b = &c.breakdown;
        let t = &b.taxes;
        writeln!(f, "Civilian (annual, {})", c.state)?;
        writeln!(f, "  Base salary:       {:>14}", money(c.base_salary))?;
        writeln!(f, "  Bonus:             {:>14}", money(c.bonus_annual))?;
        writeln!(f, "  Sign-on:           {:>14}", money(c.sign_on_bonus))?;
        writeln!(f, "  Equity:            {:>14}", money(c.equity_annual))?;
        writeln!(f, "  Gross:             {:>14}", money(b.gross_annual))?;
        writeln!(
            f,
            "  Federal tax:       {:>14}  {}",
            money(t.federal),
            percent(c.federal_effective_rate)
        )?;
        if !t.child_tax_credit.is_zero() {
            writeln!(f, "    child credit:    {:>14}", money(t.child_tax_credit))?;
        }
        writeln!(
            f,
            "  State tax:         {:>14}  {}",
            money(t.state),
            state_note(&c.state_treatment)
        )?;
        writeln!(
            f,
            "  FICA:              {:>14}  {}",
            money(t.fica()),
            percent(c.fica_effective_rate)
        )?;
        writeln!(
            f,
            "  Total tax:         {:>14}  {}",
            money(t.total),
            percent(b.effective_tax_rate)
        )?;
        writeln!(f, "  Net annual:        {:>14}", money(b.net_annual))?;
        writeln!(f, "  Net monthly:       {:>14}", money(b.net_monthly))?;
        if let Some(w) = &c.bonus_withholding {
            write_withholding(f, "Bonus", w)?;
        }
        if let Some(w) = &c.equity_withholding {
            write_withholding(f, "Equity", w)?;
        }
        write_warnings(f, &b.warnings)
    }
}

// --- Equity ---

struct VestingSection<'a>(&'a VestingSchedule);

impl fmt::Display for VestingSection<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = self.0;
        let v = s.valuation();
        writeln!(f, "Equity")?;
        writeln!(f, "  Grant value:       {:>14}", money(v.total_value))?;
        writeln!(
            f,
            "  Adjusted value:    {:>14}  {} discount",
            money(v.adjusted_value),
            percent(v.discount)
        )?;
        writeln!(f, "  Monthly value:     {:>14}", money(v.monthly_value))?;
        writeln!(f, "  {}", v.liquidity_note)?;
        writeln!(f, "  Year        Vested     Cumulative      Remaining")?;
        for p in s.periods() {
            writeln!(
                f,
                "  {:>4} {:>13} {:>14} {:>14}",
                p.year,
                money(p.vested),
                money(p.cumulative),
                money(p.remaining)
            )?;
        }
        Ok(())
    }
}

// --- Comparison ---

struct SummarySection<'a>(&'a ComparisonSummary);

impl fmt::Display for SummarySection<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = self.0;
        let verdict = match s.leader {
            Leader::Military => "military pays more",
            Leader::Civilian => "civilian pays more",
            Leader::Even => "even",
        };
        writeln!(f, "Comparison (net monthly)")?;
        writeln!(f, "  Military:          {:>14}", money(s.military_monthly))?;
        writeln!(f, "  Civilian:          {:>14}", money(s.civilian_monthly))?;
        writeln!(
            f,
            "  Difference:        {:>14}  {} per year, {}",
            money(s.monthly_difference),
            money(s.annual_difference),
            verdict
        )
    }
}

struct ProjectionSection<'a>(&'a Projection);

impl fmt::Display for ProjectionSection<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let p = self.0;
        writeln!(
            f,
            "Projection (military {} per month incl. {} retirement match)",
            money(p.military_monthly),
            money(p.retirement_match_monthly)
        )?;
        writeln!(f, "  Year    Military total   Civilian total")?;
        for y in &p.years {
            writeln!(
                f,
                "  {:>4} {:>17} {:>16}",
                y.year,
                money(y.military_cumulative),
                money(y.civilian_cumulative)
            )?;
        }
        match p.breakeven_month {
            Some(month) => writeln!(f, "  Civilian pulls ahead in month {month}"),
            None => writeln!(f, "  Civilian never pulls ahead"),
        }
    }
}

// --- Reports ---

#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub military: MilitaryCompensation,
    pub civilian: CivilianCompensation,
    pub equity: Option<VestingSchedule>,
    pub summary: ComparisonSummary,
    pub projection: Projection,
}

impl fmt::Display for CompareReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{}", MilitarySection(&self.military))?;
        writeln!(f, "{}", CivilianSection(&self.civilian))?;
        if let Some(schedule) = &self.equity {
            writeln!(f, "{}", VestingSection(schedule))?;
        }
        writeln!(f, "{}", SummarySection(&self.summary))?;
        write!(f, "{}", ProjectionSection(&self.projection))
    }
}

#[derive(Debug, Serialize)]
pub struct VestingReport {
    pub schedule: VestingSchedule,
    pub comparison: Option<EquityComparison>,
}

impl fmt::Display for VestingReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", VestingSection(&self.schedule))?;
        if let Some(c) = &self.comparison {
            let verdict = match c.preferred {
                Preference::First => "first grant is worth more",
                Preference::Second => "second grant is worth more",
                Preference::Tie => "grants are worth the same",
            };
            writeln!(
                f,
                "\nMonthly value {} vs {}: {} ({} difference)",
                money(c.first_monthly),
                money(c.second_monthly),
                verdict,
                money(c.monthly_difference)
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct OfferReport {
    pub terms: OfferTerms,
    pub civilian: Option<CivilianCompensation>,
}

impl fmt::Display for OfferReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let t = &self.terms;
        writeln!(
            f,
            "Offer terms ({}, confidence {})",
            t.method.as_str(),
            t.confidence.round_dp(2)
        )?;
        writeln!(f, "  Base salary:       {:>14}", money(t.base_salary))?;
        writeln!(f, "  Sign-on bonus:     {:>14}", money(t.sign_on_bonus))?;
        match (t.annual_bonus_amount, t.annual_bonus_percent) {
            (Some(amount), _) => writeln!(f, "  Annual bonus:      {:>14}", money(amount))?,
            (None, Some(pct)) => writeln!(f, "  Annual bonus:      {:>13}%", pct)?,
            (None, None) => writeln!(f, "  Annual bonus:      {:>14}", "none")?,
        }
        writeln!(f, "  Equity grant:      {:>14}", money(t.equity_grant))?;
        if t.equity_shares > 0 {
            writeln!(f, "  Shares:            {:>14}", t.equity_shares)?;
        }
        writeln!(
            f,
            "  Company:           {:>14}",
            if t.is_public_company { "public" } else { "private" }
        )?;
        if t.is_low_confidence() {
            writeln!(f, "  ! low confidence, check these figures against the letter")?;
        }
        if let Some(civilian) = &self.civilian {
            write!(f, "\n{}", CivilianSection(civilian))?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct StationsReport {
    pub default_location: String,
    pub locations: Vec<String>,
}

impl fmt::Display for StationsReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for location in &self.locations {
            let marker = if *location == self.default_location { " (default)" } else { "" };
            writeln!(f, "{location}{marker}")?;
        }
        Ok(())
    }
}
