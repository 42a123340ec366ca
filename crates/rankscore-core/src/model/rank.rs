use core::fmt;
use serde::{Deserialize, Serialize};

/// Finishing position within a round; 1st is best.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Rank {
    First = 1,
    Second = 2,
    Third = 3,
    #[default]
    Fourth = 4,
}

impl Rank {
    pub const ORDERED: [Rank; 4] = [Rank::First, Rank::Second, Rank::Third, Rank::Fourth];

    /// Rank handed out automatically to the one seat left unselected.
    pub const LAST: Rank = Rank::Fourth;

    pub const fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(Rank::First),
            2 => Some(Rank::Second),
            3 => Some(Rank::Third),
            4 => Some(Rank::Fourth),
            _ => None,
        }
    }

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn points(self) -> i32 {
        match self {
            Rank::First => 3,
            Rank::Second => 2,
            Rank::Third => 1,
            Rank::Fourth => 0,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Rank::First => "1st",
            Rank::Second => "2nd",
            Rank::Third => "3rd",
            Rank::Fourth => "4th",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank.number()
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::from_number(value).ok_or_else(|| format!("rank {value} is outside 1..=4"))
    }
}
