use core::fmt;
use core::ops::{Index, IndexMut};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Seat {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Seat {
    pub const ALL: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Default display name used when a player has not been named.
    pub const fn label(self) -> &'static str {
        match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Seat::North => "north",
            Seat::East => "east",
            Seat::South => "south",
            Seat::West => "west",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeatError(String);

impl fmt::Display for ParseSeatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown seat '{}' (expected north, east, south or west)",
            self.0
        )
    }
}

impl std::error::Error for ParseSeatError {}

impl FromStr for Seat {
    type Err = ParseSeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" | "top" => Ok(Seat::North),
            "east" | "e" | "right" => Ok(Seat::East),
            "south" | "s" | "bottom" => Ok(Seat::South),
            "west" | "w" | "left" => Ok(Seat::West),
            _ => Err(ParseSeatError(s.to_string())),
        }
    }
}

/// One value per seat, serialised as an object keyed by seat name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct SeatTable<T> {
    pub north: T,
    pub east: T,
    pub south: T,
    pub west: T,
}

impl<T> SeatTable<T> {
    pub fn from_fn(mut f: impl FnMut(Seat) -> T) -> Self {
        Self {
            north: f(Seat::North),
            east: f(Seat::East),
            south: f(Seat::South),
            west: f(Seat::West),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        Seat::ALL.into_iter().map(move |seat| (seat, &self[seat]))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Seat, &T) -> U) -> SeatTable<U> {
        SeatTable::from_fn(|seat| f(seat, &self[seat]))
    }

    pub fn to_array(&self) -> [T; 4]
    where
        T: Copy,
    {
        [self.north, self.east, self.south, self.west]
    }
}

impl SeatTable<i32> {
    pub fn sum(&self) -> i64 {
        self.iter().map(|(_, value)| i64::from(*value)).sum()
    }
}

impl<T> Index<Seat> for SeatTable<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &T {
        match seat {
            Seat::North => &self.north,
            Seat::East => &self.east,
            Seat::South => &self.south,
            Seat::West => &self.west,
        }
    }
}

impl<T> IndexMut<Seat> for SeatTable<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut T {
        match seat {
            Seat::North => &mut self.north,
            Seat::East => &mut self.east,
            Seat::South => &mut self.south,
            Seat::West => &mut self.west,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Seat, SeatTable};

    #[test]
    fn index_follows_table_order() {
        for (i, seat) in Seat::ALL.iter().enumerate() {
            assert_eq!(seat.index(), i);
        }
    }

    #[test]
    fn parses_compass_names_and_table_aliases() {
        assert_eq!("East".parse::<Seat>(), Ok(Seat::East));
        assert_eq!(" w ".parse::<Seat>(), Ok(Seat::West));
        assert_eq!("top".parse::<Seat>(), Ok(Seat::North));
        assert_eq!("bottom".parse::<Seat>(), Ok(Seat::South));
        assert!("middle".parse::<Seat>().is_err());
    }

    #[test]
    fn table_serializes_as_keyed_object() {
        let table = SeatTable::from_fn(|seat| seat.index() as i32);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"north":0,"east":1,"south":2,"west":3}"#);
    }

    #[test]
    fn table_fills_missing_keys_with_default() {
        let table: SeatTable<i32> = serde_json::from_str(r#"{"east":7}"#).unwrap();
        assert_eq!(table[Seat::East], 7);
        assert_eq!(table[Seat::North], 0);
        assert_eq!(table.sum(), 7);
    }
}
