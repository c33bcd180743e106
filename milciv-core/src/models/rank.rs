use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::InputError;

/// Pay-grade family a rank belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankCategory {
    Enlisted,
    Warrant,
    Officer,
}

impl RankCategory {
    pub const ALL: [RankCategory; 3] = [
        RankCategory::Enlisted,
        RankCategory::Warrant,
        RankCategory::Officer,
    ];

    fn prefix(self) -> char {
        match self {
            Self::Enlisted => 'E',
            Self::Warrant => 'W',
            Self::Officer => 'O',
        }
    }

    fn from_prefix(c: char) -> Option<Self> {
        match c {
            'E' => Some(Self::Enlisted),
            'W' => Some(Self::Warrant),
            'O' => Some(Self::Officer),
            _ => None,
        }
    }

    /// Highest supported grade in this family.
    pub fn max_grade(self) -> u8 {
        match self {
            Self::Enlisted => 9,
            Self::Warrant => 5,
            Self::Officer => 6,
        }
    }

    /// Warrant and commissioned officers draw the officer subsistence rate.
    pub fn is_officer(self) -> bool {
        matches!(self, Self::Warrant | Self::Officer)
    }
}

/// A validated military pay grade such as `E-6`, `W-2` or `O-3`.
///
/// Construction always validates, so a `Rank` value is never out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rank {
    category: RankCategory,
    grade: u8,
}

impl Rank {
    pub fn new(
        category: RankCategory,
        grade: u8,
    ) -> Result<Self, InputError> {
        if grade == 0 || grade > category.max_grade() {
            return Err(InputError::UnknownRank(format!(
                "{}-{}",
                category.prefix(),
                grade
            )));
        }
        Ok(Self { category, grade })
    }

    /// Parses `E-6`, `e6`, `E06` and similar spellings.
    pub fn parse(s: &str) -> Result<Self, InputError> {
        let unknown = || InputError::UnknownRank(s.to_string());

        let normalized = s.trim().to_ascii_uppercase();
        let mut chars = normalized.chars();
        let category = chars
            .next()
            .and_then(RankCategory::from_prefix)
            .ok_or_else(unknown)?;

        let digits = chars.as_str().trim_start_matches('-');
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(unknown());
        }
        let grade: u8 = digits.parse().map_err(|_| unknown())?;

        Self::new(category, grade).map_err(|_| unknown())
    }

    pub fn category(&self) -> RankCategory {
        self.category
    }

    pub fn grade(&self) -> u8 {
        self.grade
    }

    /// Every supported rank, enlisted first, then warrant, then officer.
    pub fn all() -> impl Iterator<Item = Rank> {
        RankCategory::ALL.into_iter().flat_map(|category| {
            (1..=category.max_grade()).map(move |grade| Rank { category, grade })
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}-{}", self.category.prefix(), self.grade)
    }
}

impl FromStr for Rank {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rank {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        rank.to_string()
    }
}
