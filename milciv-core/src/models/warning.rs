use std::fmt;

use serde::Serialize;

use super::{FilingStatus, Rank};

/// A lookup miss that was resolved with a fallback value.
///
/// Calculations never fail on missing reference data; instead they attach
/// one of these to the result so the caller can tell the user which figure
/// is an assumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The duty station was not in the housing table; the default
    /// location's rate was used instead.
    HousingLocationFallback { requested: String, used: String },

    /// No housing rate exists for the rank at any usable location.
    HousingRateUnavailable { location: String, rank: Rank },

    /// The base pay table has no row for the rank.
    BasePayUnavailable { rank: Rank, years_of_service: u32 },

    /// The state has no entry in the state tax table; no state income tax
    /// was assumed.
    StateNotSupported { state: String },

    /// No federal schedule is loaded for the filing status; federal tax was
    /// taken as zero.
    FederalScheduleUnavailable { filing_status: FilingStatus },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HousingLocationFallback { requested, used } => write!(
                f,
                "duty station '{requested}' not found; using housing rate for '{used}'"
            ),
            Self::HousingRateUnavailable { location, rank } => {
                write!(f, "no housing rate for {rank} at '{location}'; housing taken as 0")
            }
            Self::BasePayUnavailable {
                rank,
                years_of_service,
            } => write!(
                f,
                "no base pay for {rank} with {years_of_service} years of service; base pay taken as 0"
            ),
            Self::StateNotSupported { state } => {
                write!(f, "state '{state}' not supported; no state income tax assumed")
            }
            Self::FederalScheduleUnavailable { filing_status } => write!(
                f,
                "no federal brackets loaded for {filing_status}; federal tax taken as 0"
            ),
        }
    }
}
