use super::ledger::Ledger;
use super::state::GameState;
use super::timer::RoundTimer;
use crate::error::{PersistenceError, SnapshotError};
use crate::model::player::{Player, display_name};
use crate::model::record::RoundRecord;
use crate::model::round::{RankAssignment, RoundEngine};
use crate::model::score::{OVERRIDE_MAX, OVERRIDE_MIN};
use crate::model::seat::{Seat, SeatTable};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Persisted form of a [`GameState`]. Every field is optional on input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSnapshot {
    pub players: SeatTable<Player>,
    /// Newest first.
    pub ledger: Vec<RoundRecord>,
    pub next_round_number: u32,
    pub active_round_in_progress: bool,
    pub active_assignments: Vec<RankAssignment>,
    pub active_overrides: SeatTable<Option<i32>>,
    pub timer: RoundTimer,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            players: SeatTable::default(),
            ledger: Vec::new(),
            next_round_number: 1,
            active_round_in_progress: false,
            active_assignments: Vec::new(),
            active_overrides: SeatTable::default(),
            timer: RoundTimer::default(),
        }
    }
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        GameSnapshot {
            players: state.players().clone(),
            ledger: state.ledger().records().to_vec(),
            next_round_number: state.next_round_number(),
            active_round_in_progress: state.engine().is_active(),
            active_assignments: state.engine().assignments().to_vec(),
            active_overrides: state.engine().overrides(),
            timer: *state.timer(),
        }
    }

    /// Rebuilds a state. Totals are recomputed from the ledger so a tampered
    /// or truncated document cannot break the totals/history identity.
    ///
    /// Fails when a recorded score lies outside the override range or the
    /// recorded totals do not fit.
    pub fn restore(self) -> Result<GameState, SnapshotError> {
        for record in &self.ledger {
            for seat in Seat::ALL {
                let score = record.scores[seat];
                if !(OVERRIDE_MIN..=OVERRIDE_MAX).contains(&score) {
                    return Err(SnapshotError::ScoreOutOfRange {
                        round: record.round_number,
                        seat,
                        score,
                    });
                }
            }
        }

        let mut players = self.players;
        for seat in Seat::ALL {
            let name = display_name(seat, Some(players[seat].name.as_str()));
            players[seat].name = name;
        }

        let ledger = Ledger::from_parts(self.ledger, self.next_round_number);
        let recorded = ledger
            .recorded_totals()
            .map_err(|seat| SnapshotError::TotalOverflow { seat })?;
        for seat in Seat::ALL {
            if players[seat].total != recorded[seat] {
                warn!(
                    %seat,
                    stored = players[seat].total,
                    recorded = recorded[seat],
                    "stored total disagrees with history; using history"
                );
                players[seat].total = recorded[seat];
            }
        }

        let mut engine = RoundEngine::new();
        engine.restore(
            self.active_round_in_progress,
            &self.active_assignments,
            &self.active_overrides,
            &mut players,
        );

        Ok(GameState::from_parts(players, ledger, engine, self.timer))
    }

    /// Parses and restores in one step.
    pub fn load(bytes: &[u8]) -> Result<GameState, PersistenceError> {
        Ok(Self::from_slice(bytes)?.restore()?)
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::capture(state))
    }

    pub fn to_vec(state: &GameState) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(&Self::capture(state))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::GameSnapshot;
    use crate::error::{PersistenceError, SnapshotError};
    use crate::game::state::GameState;
    use crate::model::rank::Rank;
    use crate::model::round::RoundPhase;
    use crate::model::seat::{Seat, SeatTable};
    use time::macros::datetime;

    fn played_state() -> GameState {
        let now = datetime!(2024-05-01 20:00:00 UTC);
        let names = SeatTable::from_fn(|seat| Some(format!("{}-player", seat.key())));
        let mut state = GameState::with_names(&names);
        state.start_round(now).unwrap();
        for seat in [Seat::East, Seat::South, Seat::West] {
            state.select_seat(seat).unwrap();
        }
        state.commit(now).unwrap();
        state.start_round(now).unwrap();
        state.select_seat(Seat::North).unwrap();
        state
    }

    #[test]
    fn snapshot_uses_documented_field_names() {
        let json = GameSnapshot::to_json(&played_state()).unwrap();
        assert!(json.contains("\"nextRoundNumber\": 2"));
        assert!(json.contains("\"activeRoundInProgress\": true"));
        assert!(json.contains("\"currentRoundScore\""));
        assert!(json.contains("\"east\": 3"));
    }

    #[test]
    fn snapshot_roundtrip_restores_state() {
        let state = played_state();
        let json = GameSnapshot::to_json(&state).unwrap();
        let restored = GameSnapshot::from_json(&json).unwrap().restore().unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.phase(), RoundPhase::Selecting);
        assert_eq!(
            restored.engine().assignment(Seat::North).map(|a| a.rank),
            Some(Rank::First)
        );
    }

    #[test]
    fn overrides_survive_roundtrip() {
        let now = datetime!(2024-05-01 20:00:00 UTC);
        let mut state = GameState::new();
        state.start_round(now).unwrap();
        for seat in [Seat::East, Seat::South, Seat::West] {
            state.select_seat(seat).unwrap();
        }
        state.set_override(Seat::South, 7).unwrap();

        let restored = GameSnapshot::from_json(&GameSnapshot::to_json(&state).unwrap())
            .unwrap()
            .restore().unwrap();
        assert_eq!(restored.engine().override_for(Seat::South), Some(7));
        assert_eq!(restored, state);
    }

    #[test]
    fn empty_document_restores_fresh_game() {
        let restored = GameSnapshot::from_json("{}").unwrap().restore().unwrap();
        assert_eq!(restored, GameState::new());
    }

    #[test]
    fn partial_document_defaults_each_field() {
        let json = r#"{
            "players": { "west": { "name": "Lan", "total": 40 } },
            "ledger": [
                { "roundNumber": 3, "scores": { "west": 1, "north": 3 }, "ranks": { "north": 1, "west": 3 } }
            ]
        }"#;
        let restored = GameSnapshot::from_json(json).unwrap().restore().unwrap();

        assert_eq!(restored.player(Seat::West).name, "Lan");
        assert_eq!(restored.player(Seat::North).name, "North");
        assert_eq!(restored.player(Seat::West).total, 1);
        assert_eq!(restored.player(Seat::North).total, 3);
        assert_eq!(restored.next_round_number(), 4);
        assert_eq!(restored.phase(), RoundPhase::Idle);
        assert!(restored.is_consistent());
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(GameSnapshot::from_json("{\"ledger\": 5}").is_err());
        assert!(GameSnapshot::from_slice(b"not json").is_err());
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let json = r#"{
            "ledger": [
                { "roundNumber": 2, "scores": { "north": 2147483647 } },
                { "roundNumber": 1, "scores": { "north": 2147483647 } }
            ]
        }"#;
        let err = GameSnapshot::from_json(json).unwrap().restore().unwrap_err();
        assert_eq!(
            err,
            SnapshotError::ScoreOutOfRange {
                round: 2,
                seat: Seat::North,
                score: i32::MAX,
            }
        );
        assert!(matches!(
            GameSnapshot::load(json.as_bytes()),
            Err(PersistenceError::Invalid(_))
        ));
    }

    #[test]
    fn extreme_timer_does_not_overflow() {
        let json = r#"{ "timer": { "elapsedSeconds": 18446744073709551615, "runningSince": 0 } }"#;
        let mut restored = GameSnapshot::load(json.as_bytes()).unwrap();
        assert_eq!(restored.elapsed(datetime!(2024-05-01 20:00:00 UTC)), u64::MAX);
        restored.pause_timer(datetime!(2024-05-01 20:00:00 UTC));
        assert_eq!(restored.timer().elapsed_seconds, u64::MAX);
    }
}
