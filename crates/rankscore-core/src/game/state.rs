use crate::error::GameError;
use crate::game::ledger::Ledger;
use crate::game::timer::{RoundTimer, duration_label};
use crate::model::player::{Player, display_name};
use crate::model::record::RoundRecord;
use crate::model::round::{ReviewLine, RoundEngine, RoundPhase, Selection};
use crate::model::score;
use crate::model::seat::{Seat, SeatTable};
use time::OffsetDateTime;
use time::macros::format_description;

/// Everything a game session owns: the four players, the committed history,
/// the round being ranked and its timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    players: SeatTable<Player>,
    ledger: Ledger,
    engine: RoundEngine,
    timer: RoundTimer,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::with_names(&SeatTable::default())
    }

    pub fn with_names(names: &SeatTable<Option<String>>) -> Self {
        Self {
            players: SeatTable::from_fn(|seat| Player::for_seat(seat, names[seat].as_deref())),
            ledger: Ledger::new(),
            engine: RoundEngine::new(),
            timer: RoundTimer::default(),
        }
    }

    pub(crate) fn from_parts(
        players: SeatTable<Player>,
        ledger: Ledger,
        engine: RoundEngine,
        timer: RoundTimer,
    ) -> Self {
        Self {
            players,
            ledger,
            engine,
            timer,
        }
    }

    pub fn players(&self) -> &SeatTable<Player> {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat]
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    pub fn phase(&self) -> RoundPhase {
        self.engine.phase()
    }

    pub fn next_round_number(&self) -> u32 {
        self.ledger.next_round_number()
    }

    pub fn totals(&self) -> SeatTable<i32> {
        score::totals(&self.players)
    }

    pub fn standings(&self) -> [Seat; 4] {
        score::standings(&self.players)
    }

    /// True when every seat's total equals what the ledger records for it.
    pub fn is_consistent(&self) -> bool {
        self.ledger.recorded_totals() == Ok(self.totals())
    }

    /// Wipes the session, applies the given names and opens round 1.
    pub fn new_game(
        &mut self,
        names: &SeatTable<Option<String>>,
        now: OffsetDateTime,
    ) -> Result<u32, GameError> {
        self.reset();
        for seat in Seat::ALL {
            self.players[seat].name = display_name(seat, names[seat].as_deref());
        }
        self.start_round(now)
    }

    pub fn start_round(&mut self, now: OffsetDateTime) -> Result<u32, GameError> {
        self.engine.start_round(&mut self.players)?;
        self.timer.restart(now.unix_timestamp());
        Ok(self.ledger.next_round_number())
    }

    pub fn select_seat(&mut self, seat: Seat) -> Result<Selection, GameError> {
        self.engine.select_seat(seat, &mut self.players)
    }

    pub fn deselect_seat(&mut self, seat: Seat) -> bool {
        self.engine.deselect_seat(seat, &mut self.players)
    }

    pub fn set_override(&mut self, seat: Seat, points: i32) -> Result<i32, GameError> {
        self.engine.set_override(seat, points, &mut self.players)
    }

    pub fn clear_overrides(&mut self) -> Result<(), GameError> {
        self.engine.clear_overrides(&mut self.players)
    }

    pub fn review(&self) -> [ReviewLine; 4] {
        self.engine.review(&self.players)
    }

    /// Commits the ranked round into the ledger.
    pub fn commit(&mut self, now: OffsetDateTime) -> Result<RoundRecord, GameError> {
        let elapsed = self.timer.elapsed(now.unix_timestamp());
        let record = self.engine.commit(
            &mut self.players,
            self.ledger.next_round_number(),
            duration_label(elapsed),
            format_timestamp(now),
        )?;
        self.timer.pause(now.unix_timestamp());
        self.ledger.append(record.clone(), &mut self.players);
        Ok(record)
    }

    /// Applies `overrides` and commits; nothing changes unless every seat is
    /// ranked.
    pub fn commit_with(
        &mut self,
        overrides: &[(Seat, i32)],
        now: OffsetDateTime,
    ) -> Result<RoundRecord, GameError> {
        let phase = self.engine.phase();
        if phase != RoundPhase::ReadyToConfirm {
            return Err(GameError::InvalidState {
                operation: "commit",
                phase,
            });
        }
        for (seat, points) in overrides {
            self.set_override(*seat, *points)?;
        }
        self.commit(now)
    }

    pub fn cancel(&mut self, now: OffsetDateTime) -> bool {
        let discarded = self.engine.cancel(&mut self.players);
        if discarded {
            self.timer.pause(now.unix_timestamp());
        }
        discarded
    }

    pub fn undo_last(&mut self) -> Result<RoundRecord, GameError> {
        self.ledger.undo_last(&mut self.players)
    }

    pub fn delete_round(&mut self, round_number: u32) -> Result<RoundRecord, GameError> {
        self.ledger.delete_round(round_number, &mut self.players)
    }

    /// Full wipe: history, totals, active round, timer and names.
    pub fn reset(&mut self) {
        self.engine.cancel(&mut self.players);
        self.ledger.reset(&mut self.players);
        self.timer.reset();
        for seat in Seat::ALL {
            self.players[seat] = Player::for_seat(seat, None);
        }
    }

    pub fn start_timer(&mut self, now: OffsetDateTime) {
        self.timer.start(now.unix_timestamp());
    }

    pub fn pause_timer(&mut self, now: OffsetDateTime) {
        self.timer.pause(now.unix_timestamp());
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
    }

    pub fn elapsed(&self, now: OffsetDateTime) -> u64 {
        self.timer.elapsed(now.unix_timestamp())
    }
}

pub fn format_timestamp(now: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    now.format(&format).unwrap_or_else(|_| now.to_string())
}
