//! Input-validation errors shared by every calculator.
//!
//! Lookup misses (unknown duty station, unsupported state, absent pay-table
//! cell) are deliberately *not* represented here: those degrade to a
//! documented default and surface as a [`crate::Warning`] on the result.

use rust_decimal::Decimal;
use thiserror::Error;

/// Longest vesting or projection horizon accepted, in years.
pub const MAX_HORIZON_YEARS: u32 = 50;

/// Rejected calculator input. Always an input problem, never transient.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    /// A monetary input was below zero.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// A monetary input or percentage exceeded the supported maximum.
    #[error("{field} must not exceed {max}, got {value}", max = crate::calculations::common::MAX_AMOUNT)]
    AmountTooLarge { field: &'static str, value: Decimal },

    /// The rank string did not name an enlisted, warrant or officer grade.
    #[error("unknown rank '{0}'")]
    UnknownRank(String),

    /// The filing status string was not one of the supported statuses.
    #[error("unsupported filing status '{0}'")]
    UnsupportedFilingStatus(String),

    #[error("years of service must not be negative, got {0}")]
    NegativeYearsOfService(i32),

    /// Vesting horizons are whole years between 1 and [`MAX_HORIZON_YEARS`].
    #[error("vesting horizon must be 1 to {max} years, got {0}", max = MAX_HORIZON_YEARS)]
    InvalidVestingHorizon(u32),

    /// A cliff at or past the end of the horizon would never vest anything.
    #[error("cliff of {cliff_months} months does not end before the {horizon_years}-year horizon")]
    CliffExceedsHorizon { cliff_months: u32, horizon_years: u32 },

    #[error("projection horizon must be 1 to {max} years, got {0}", max = MAX_HORIZON_YEARS)]
    InvalidProjectionHorizon(u32),
}
