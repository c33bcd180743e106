use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One marginal-rate band: income in `(min_income, max_income]` is taxed at
/// `rate`. `max_income` of `None` means the band is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// Reasons a bracket list cannot form a schedule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("bracket schedule is empty")]
    Empty,

    #[error("first bracket must start at 0, starts at {0}")]
    NotStartingAtZero(Decimal),

    /// Adjacent brackets must share a boundary exactly.
    #[error("bracket {index} starts at {found}, expected {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {0} has an upper bound at or below its lower bound")]
    EmptyBand(usize),

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd(usize),

    #[error("last bracket must be unbounded")]
    MissingUnboundedTop,

    #[error("bracket {index} rate {rate} is lower than the preceding rate {previous}")]
    DecreasingRate {
        index: usize,
        rate: Decimal,
        previous: Decimal,
    },

    #[error("rate {0} is outside [0, 1]")]
    RateOutOfRange(Decimal),
}

/// An ordered, validated progressive bracket table.
///
/// Invariants (checked by [`BracketSchedule::new`]):
/// - starts at zero and bounds are contiguous and non-overlapping
/// - only the final bracket is unbounded
/// - rates lie in `[0, 1]` and never decrease with bracket index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Builds a schedule, sorting brackets by lower bound before validating.
    pub fn new(mut brackets: Vec<TaxBracket>) -> Result<Self, ScheduleError> {
        brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));

        let first = brackets.first().ok_or(ScheduleError::Empty)?;
        if !first.min_income.is_zero() {
            return Err(ScheduleError::NotStartingAtZero(first.min_income));
        }

        let last_index = brackets.len() - 1;
        let mut previous: Option<&TaxBracket> = None;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(ScheduleError::RateOutOfRange(bracket.rate));
            }

            match bracket.max_income {
                Some(max) if max <= bracket.min_income => {
                    return Err(ScheduleError::EmptyBand(index));
                }
                None if index != last_index => {
                    return Err(ScheduleError::UnboundedBeforeEnd(index));
                }
                _ => {}
            }

            if let Some(prev) = previous {
                // prev.max_income is Some here; an unbounded non-final bracket
                // was rejected on the previous iteration.
                let expected = prev.max_income.unwrap_or(Decimal::MAX);
                if bracket.min_income != expected {
                    return Err(ScheduleError::NotContiguous {
                        index,
                        expected,
                        found: bracket.min_income,
                    });
                }
                if bracket.rate < prev.rate {
                    return Err(ScheduleError::DecreasingRate {
                        index,
                        rate: bracket.rate,
                        previous: prev.rate,
                    });
                }
            }

            previous = Some(bracket);
        }

        if brackets[last_index].max_income.is_some() {
            return Err(ScheduleError::MissingUnboundedTop);
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Progressive tax on `income`: each bracket's rate applies only to the
    /// slice of income that falls inside it. Unrounded.
    pub fn tax_on(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        self.brackets
            .iter()
            .take_while(|b| income > b.min_income)
            .map(|b| {
                let upper = b.max_income.map_or(income, |max| max.min(income));
                (upper - b.min_income) * b.rate
            })
            .sum()
    }

    /// Rate applied to the last dollar of `income`. Income at or below zero
    /// reports the first bracket's rate.
    pub fn marginal_rate(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.brackets
            .iter()
            .find(|b| b.max_income.is_none_or(|max| income <= max))
            .map_or(Decimal::ZERO, |b| b.rate)
    }
}

impl<'de> Deserialize<'de> for BracketSchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let brackets = Vec::<TaxBracket>::deserialize(deserializer)?;
        BracketSchedule::new(brackets).map_err(serde::de::Error::custom)
    }
}
