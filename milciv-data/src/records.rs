use milciv_core::{FicaPolicy, PolicyConstants, StandardDeductions, DEFAULT_DUTY_STATION};
use rust_decimal::Decimal;
use serde::Deserialize;

/// A row of `base_pay.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BasePayRecord {
    pub rank: String,
    /// Lowest whole years of service this pay applies to.
    pub min_years: u32,
    pub monthly_pay: Decimal,
}

/// A row of `bah.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HousingRecord {
    pub location: String,
    pub rank: String,
    pub without_dependents: Decimal,
    pub with_dependents: Decimal,
}

/// A row of `bas.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubsistenceRecord {
    pub category: String,
    pub monthly_rate: Decimal,
}

/// A row of `tax_brackets.csv`.
///
/// - `jurisdiction`: `US` for federal, otherwise a two-letter state code
/// - `filing_status`: `single` or `married`
/// - `max_income`: empty for the unbounded top bracket
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub jurisdiction: String,
    pub filing_status: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// A row of `state_taxes.csv`. `rate` is only read for the `flat` method.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StateTaxRecord {
    pub state: String,
    pub method: String,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub rate: Option<Decimal>,
}

pub(crate) fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Contents of `policy.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicyFile {
    pub housing: HousingSection,
    pub standard_deduction: StandardDeductions,
    pub fica: FicaPolicy,
    pub policy: PolicyConstants,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HousingSection {
    pub default_location: String,
}

impl Default for HousingSection {
    fn default() -> Self {
        Self {
            default_location: DEFAULT_DUTY_STATION.to_string(),
        }
    }
}
