//! Plain-text rendering of scoreboards, reviews and history.

use rankscore_core::game::state::GameState;
use rankscore_core::game::timer::clock_label;
use rankscore_core::model::record::RoundRecord;
use rankscore_core::model::round::{ReviewLine, RoundPhase};
use rankscore_core::Seat;
use std::fmt::Write;

/// Running totals, best first, with how often each seat finished 1st to 4th.
pub fn standings(state: &GameState) -> String {
    let mut out = String::new();
    for (place, seat) in state.standings().iter().enumerate() {
        let player = state.player(*seat);
        let [first, second, third, fourth] = state.ledger().rank_counts(*seat);
        let _ = writeln!(
            out,
            "{}. {:<12} {:<6} {:>5}  1st/2nd/3rd/4th {first}/{second}/{third}/{fourth}",
            place + 1,
            player.name,
            seat.label(),
            player.total
        );
    }
    out
}

pub fn review(lines: &[ReviewLine]) -> String {
    let mut out = String::new();
    for line in lines {
        let rank = line.rank.map(|r| r.title()).unwrap_or("-");
        let _ = write!(
            out,
            "{:<6} {:<12} {:<3} default {:>3}",
            line.seat.label(),
            line.name,
            rank,
            line.default_points
        );
        if line.is_overridden() {
            let _ = write!(out, "  -> {}", line.value());
        }
        out.push('\n');
    }
    out
}

pub fn selection(state: &GameState) -> String {
    let picks: Vec<String> = state
        .engine()
        .assignments()
        .iter()
        .map(|a| format!("{} {} ({} pts)", a.rank, state.player(a.seat).name, a.points))
        .collect();
    if picks.is_empty() {
        "No seats ranked yet".to_string()
    } else {
        picks.join(", ")
    }
}

pub fn status(state: &GameState, elapsed: u64) -> String {
    let mut out = String::new();
    let round = state.next_round_number();
    let timer = format!(
        "{}{}",
        clock_label(elapsed),
        if state.timer().is_running() { "" } else { " (paused)" }
    );
    let _ = match state.phase() {
        RoundPhase::Idle => writeln!(out, "Round {round} not started | timer {timer}"),
        RoundPhase::Selecting => writeln!(out, "Round {round} ranking | timer {timer}"),
        RoundPhase::ReadyToConfirm => {
            writeln!(out, "Round {round} ready to commit | timer {timer}")
        }
    };
    if state.engine().is_active() {
        let _ = writeln!(out, "{}", selection(state));
    }
    out.push_str(&standings(state));
    out
}

pub fn history(state: &GameState) -> String {
    if state.ledger().is_empty() {
        return "No rounds recorded\n".to_string();
    }
    let mut out = String::new();
    let _ = write!(out, "{:>5}", "Round");
    for seat in Seat::ALL {
        let _ = write!(out, " {:>12}", state.player(seat).name);
    }
    let _ = writeln!(out, " {:>7}  When", "Time");
    for record in state.ledger().records() {
        out.push_str(&history_row(record));
    }
    out
}

fn history_row(record: &RoundRecord) -> String {
    let mut row = format!("{:>5}", record.round_number);
    for seat in Seat::ALL {
        let cell = format!("{} ({})", record.scores[seat], record.ranks[seat].number());
        let _ = write!(row, " {cell:>12}");
    }
    let _ = writeln!(row, " {:>7}  {}", record.duration_label, record.timestamp);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn played() -> GameState {
        let now = datetime!(2024-05-01 20:00:00 UTC);
        let mut state = GameState::new();
        state.start_round(now).unwrap();
        for seat in [Seat::East, Seat::South, Seat::West] {
            state.select_seat(seat).unwrap();
        }
        state.set_override(Seat::West, -4).unwrap();
        state
    }

    #[test]
    fn review_marks_overrides() {
        let state = played();
        let text = review(&state.review());
        assert!(text.contains("West"));
        assert!(text.contains("-> -4"));
        assert!(text.lines().count() == 4);
    }

    #[test]
    fn history_lists_newest_first() {
        let now = datetime!(2024-05-01 20:10:00 UTC);
        let mut state = played();
        state.commit(now).unwrap();
        state.start_round(now).unwrap();
        for seat in [Seat::North, Seat::East, Seat::South] {
            state.select_seat(seat).unwrap();
        }
        state.commit(now).unwrap();

        let text = history(&state);
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert!(rows[0].trim_start().starts_with('2'));
        assert!(rows[1].trim_start().starts_with('1'));
    }

    #[test]
    fn status_reports_phase() {
        let state = played();
        let text = status(&state, 61);
        assert!(text.starts_with("Round 1 ready to commit | timer 00:01:01"));
        assert!(text.contains("1st East"));
    }

    #[test]
    fn standings_show_finish_tallies() {
        let now = datetime!(2024-05-01 20:10:00 UTC);
        let mut state = played();
        state.commit(now).unwrap();
        state.start_round(now).unwrap();
        for seat in [Seat::East, Seat::North, Seat::West] {
            state.select_seat(seat).unwrap();
        }
        state.commit(now).unwrap();

        let text = standings(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("1. East"));
        assert!(lines[0].ends_with("1st/2nd/3rd/4th 2/0/0/0"));
        let south = lines.iter().find(|l| l.contains("South")).unwrap();
        assert!(south.ends_with("1st/2nd/3rd/4th 0/1/0/1"));
    }
}
