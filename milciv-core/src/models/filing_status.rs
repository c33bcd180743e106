use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::InputError;

/// Filing status used to pick bracket schedules, standard deductions and
/// phase-out thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingStatus {
    Single,
    Married,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 2] = [FilingStatus::Single, FilingStatus::Married];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Married => "married",
        }
    }

    /// Case-insensitive parse. Accepts the long names and the IRS short codes
    /// `S` and `MFJ`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "s" => Some(Self::Single),
            "married" | "mfj" | "married_filing_jointly" => Some(Self::Married),
            _ => None,
        }
    }
}

impl FromStr for FilingStatus {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InputError::UnsupportedFilingStatus(s.to_string()))
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(FilingStatus::parse("SINGLE"), Some(FilingStatus::Single));
        assert_eq!(FilingStatus::parse("Single"), Some(FilingStatus::Single));
        assert_eq!(FilingStatus::parse(" married "), Some(FilingStatus::Married));
    }

    #[test]
    fn parse_accepts_short_codes() {
        assert_eq!(FilingStatus::parse("S"), Some(FilingStatus::Single));
        assert_eq!(FilingStatus::parse("mfj"), Some(FilingStatus::Married));
    }

    #[test]
    fn from_str_rejects_unsupported_status() {
        let result = "HOH".parse::<FilingStatus>();

        assert_eq!(
            result,
            Err(InputError::UnsupportedFilingStatus("HOH".to_string()))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for status in FilingStatus::ALL {
            assert_eq!(FilingStatus::parse(&status.to_string()), Some(status));
        }
    }
}
