use crate::model::player::Player;
use crate::model::seat::{Seat, SeatTable};

pub const OVERRIDE_MIN: i32 = -100;
pub const OVERRIDE_MAX: i32 = 100;

/// Clamps a manual score into the accepted override range.
pub fn clamp_override(points: i32) -> i32 {
    points.clamp(OVERRIDE_MIN, OVERRIDE_MAX)
}

pub fn totals(players: &SeatTable<Player>) -> SeatTable<i32> {
    players.map(|_, player| player.total)
}

/// Seats ordered by running total, highest first; ties keep table order.
pub fn standings(players: &SeatTable<Player>) -> [Seat; 4] {
    let mut order = Seat::ALL;
    order.sort_by(|a, b| players[*b].total.cmp(&players[*a].total));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players_with(totals: [i32; 4]) -> SeatTable<Player> {
        SeatTable::from_fn(|seat| Player {
            total: totals[seat.index()],
            ..Player::for_seat(seat, None)
        })
    }

    #[test]
    fn clamp_limits_both_ends() {
        assert_eq!(clamp_override(250), 100);
        assert_eq!(clamp_override(-101), -100);
        assert_eq!(clamp_override(5), 5);
    }

    #[test]
    fn standings_sort_descending_with_stable_ties() {
        let players = players_with([4, 9, 4, 1]);
        assert_eq!(
            standings(&players),
            [Seat::East, Seat::North, Seat::South, Seat::West]
        );
    }

    #[test]
    fn totals_snapshot_matches_players() {
        let players = players_with([1, 2, 3, 4]);
        assert_eq!(totals(&players).to_array(), [1, 2, 3, 4]);
    }
}
