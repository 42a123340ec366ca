use crate::error::GameError;
use crate::model::player::Player;
use crate::model::rank::Rank;
use crate::model::record::RoundRecord;
use crate::model::score::clamp_override;
use crate::model::seat::{Seat, SeatTable};
use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of seats ranked by hand; the remaining seat is ranked automatically.
pub const MANUAL_SELECTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankAssignment {
    pub seat: Seat,
    pub rank: Rank,
    pub points: i32,
}

impl RankAssignment {
    pub const fn new(seat: Seat, rank: Rank) -> Self {
        Self {
            seat,
            rank,
            points: rank.points(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    Selecting,
    ReadyToConfirm,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoundPhase::Idle => "idle",
            RoundPhase::Selecting => "selecting",
            RoundPhase::ReadyToConfirm => "ready to confirm",
        };
        f.write_str(label)
    }
}

/// What a `select_seat` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Ranked(RankAssignment),
    /// The third manual pick; `last` is the seat ranked automatically.
    Completed {
        picked: RankAssignment,
        last: RankAssignment,
    },
    /// The seat was already ranked, so the call toggled it off.
    Deselected(Seat),
}

/// One row of the pre-commit review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLine {
    pub seat: Seat,
    pub name: String,
    pub rank: Option<Rank>,
    pub default_points: i32,
    pub override_points: Option<i32>,
}

impl ReviewLine {
    pub fn value(&self) -> i32 {
        self.override_points.unwrap_or(self.default_points)
    }

    pub fn is_overridden(&self) -> bool {
        self.override_points
            .is_some_and(|points| points != self.default_points)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ActiveRound {
    // Selection order; ranks always form 1..=len.
    assignments: Vec<RankAssignment>,
    overrides: SeatTable<Option<i32>>,
}

impl ActiveRound {
    fn position(&self, seat: Seat) -> Option<usize> {
        self.assignments.iter().position(|a| a.seat == seat)
    }

    fn is_complete(&self) -> bool {
        self.assignments.len() == Seat::ALL.len()
    }

    fn rerank(&mut self, players: &mut SeatTable<Player>) {
        self.assignments.sort_by_key(|a| a.rank);
        for (assignment, rank) in self.assignments.iter_mut().zip(Rank::ORDERED) {
            if assignment.rank != rank {
                debug!(seat = %assignment.seat, from = %assignment.rank, to = %rank, "re-ranked");
            }
            *assignment = RankAssignment::new(assignment.seat, rank);
            players[assignment.seat].current_round_score = assignment.points;
        }
    }

    fn rank_remaining_last(&mut self, players: &mut SeatTable<Player>) -> Option<RankAssignment> {
        let remaining = Seat::ALL
            .iter()
            .copied()
            .find(|seat| self.position(*seat).is_none())?;
        let last = RankAssignment::new(remaining, Rank::LAST);
        self.assignments.push(last);
        players[remaining].current_round_score = last.points;
        debug!(seat = %remaining, "last seat ranked automatically");
        Some(last)
    }

    fn withdraw(&mut self, seat: Seat, players: &mut SeatTable<Player>) -> bool {
        let Some(index) = self.position(seat) else {
            return false;
        };
        self.overrides = SeatTable::default();
        self.assignments.remove(index);
        players[seat].current_round_score = 0;
        self.rerank(players);
        debug!(%seat, remaining = self.assignments.len(), "seat deselected");
        true
    }

    fn clear_overrides(&mut self, players: &mut SeatTable<Player>) {
        self.overrides = SeatTable::default();
        for assignment in &self.assignments {
            players[assignment.seat].current_round_score = assignment.points;
        }
    }
}

/// Rank selection for the round currently being played.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundEngine {
    active: Option<ActiveRound>,
}

impl RoundEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RoundPhase {
        match &self.active {
            None => RoundPhase::Idle,
            Some(round) if round.is_complete() => RoundPhase::ReadyToConfirm,
            Some(_) => RoundPhase::Selecting,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn assignments(&self) -> &[RankAssignment] {
        self.active
            .as_ref()
            .map(|round| round.assignments.as_slice())
            .unwrap_or(&[])
    }

    pub fn assignment(&self, seat: Seat) -> Option<&RankAssignment> {
        self.assignments().iter().find(|a| a.seat == seat)
    }

    pub fn overrides(&self) -> SeatTable<Option<i32>> {
        self.active
            .as_ref()
            .map(|round| round.overrides)
            .unwrap_or_default()
    }

    pub fn override_for(&self, seat: Seat) -> Option<i32> {
        self.active.as_ref().and_then(|round| round.overrides[seat])
    }

    pub fn start_round(&mut self, players: &mut SeatTable<Player>) -> Result<(), GameError> {
        self.require_idle("start a round")?;
        for seat in Seat::ALL {
            players[seat].current_round_score = 0;
        }
        self.active = Some(ActiveRound::default());
        Ok(())
    }

    /// Ranks `seat` next, or toggles it off if it already holds a rank.
    /// A ranked seat toggles off in ReadyToConfirm too, dropping the round back
    /// to Selecting.
    pub fn select_seat(
        &mut self,
        seat: Seat,
        players: &mut SeatTable<Player>,
    ) -> Result<Selection, GameError> {
        let phase = self.phase();
        let Some(round) = self.active.as_mut() else {
            return Err(GameError::InvalidState {
                operation: "select a seat",
                phase,
            });
        };

        if round.position(seat).is_some() {
            round.withdraw(seat, players);
            return Ok(Selection::Deselected(seat));
        }

        if round.assignments.len() >= MANUAL_SELECTIONS {
            return Err(GameError::SelectionFull);
        }

        let rank = Rank::ORDERED[round.assignments.len()];
        let picked = RankAssignment::new(seat, rank);
        round.assignments.push(picked);
        players[seat].current_round_score = picked.points;
        debug!(%seat, %rank, "seat ranked");

        if round.assignments.len() < MANUAL_SELECTIONS {
            return Ok(Selection::Ranked(picked));
        }

        match round.rank_remaining_last(players) {
            Some(last) => Ok(Selection::Completed { picked, last }),
            None => Ok(Selection::Ranked(picked)),
        }
    }

    /// Removes the seat's rank and closes the gap it leaves. Returns whether
    /// anything changed.
    pub fn deselect_seat(&mut self, seat: Seat, players: &mut SeatTable<Player>) -> bool {
        self.active
            .as_mut()
            .is_some_and(|round| round.withdraw(seat, players))
    }

    /// Sets a manual score for `seat`, clamped into the override range.
    /// Returns the value actually stored.
    pub fn set_override(
        &mut self,
        seat: Seat,
        points: i32,
        players: &mut SeatTable<Player>,
    ) -> Result<i32, GameError> {
        let round = self.ready_round("override a score")?;
        let clamped = clamp_override(points);
        if clamped != points {
            debug!(%seat, requested = points, stored = clamped, "override clamped");
        }
        round.overrides[seat] = Some(clamped);
        players[seat].current_round_score = clamped;
        Ok(clamped)
    }

    /// Drops every override so each seat reverts to its rank-derived points.
    pub fn clear_overrides(&mut self, players: &mut SeatTable<Player>) -> Result<(), GameError> {
        let round = self.ready_round("auto-fill scores")?;
        round.clear_overrides(players);
        Ok(())
    }

    pub fn review(&self, players: &SeatTable<Player>) -> [ReviewLine; 4] {
        Seat::ALL.map(|seat| {
            let assignment = self.assignment(seat);
            ReviewLine {
                seat,
                name: players[seat].name.clone(),
                rank: assignment.map(|a| a.rank),
                default_points: assignment.map(|a| a.points).unwrap_or(0),
                override_points: self.override_for(seat),
            }
        })
    }

    /// Closes the round into a record. The engine returns to idle; appending
    /// the record to the ledger is the caller's job.
    pub fn commit(
        &mut self,
        players: &mut SeatTable<Player>,
        round_number: u32,
        duration_label: String,
        timestamp: String,
    ) -> Result<RoundRecord, GameError> {
        let round = self.ready_round("commit")?;
        let mut scores = SeatTable::default();
        let mut ranks = SeatTable::default();
        for assignment in &round.assignments {
            let points = round.overrides[assignment.seat].unwrap_or(assignment.points);
            scores[assignment.seat] = points;
            ranks[assignment.seat] = assignment.rank;
            players[assignment.seat].current_round_score = points;
        }
        self.active = None;

        Ok(RoundRecord {
            round_number,
            scores,
            ranks,
            duration_label,
            timestamp,
        })
    }

    /// Throws away the active round. Returns whether a round was active.
    pub fn cancel(&mut self, players: &mut SeatTable<Player>) -> bool {
        if self.active.take().is_none() {
            return false;
        }
        for seat in Seat::ALL {
            players[seat].current_round_score = 0;
        }
        true
    }

    /// Rebuilds an active round from persisted assignments, repairing
    /// duplicate seats and rank gaps. Overrides survive only when all four
    /// seats are ranked.
    pub fn restore(
        &mut self,
        in_progress: bool,
        assignments: &[RankAssignment],
        overrides: &SeatTable<Option<i32>>,
        players: &mut SeatTable<Player>,
    ) {
        if !in_progress {
            self.active = None;
            return;
        }

        let mut round = ActiveRound::default();
        for assignment in assignments {
            if round.position(assignment.seat).is_none() {
                round.assignments.push(*assignment);
            }
        }
        for seat in Seat::ALL {
            players[seat].current_round_score = 0;
        }
        round.rerank(players);
        if round.is_complete() {
            for seat in Seat::ALL {
                if let Some(points) = overrides[seat] {
                    let clamped = clamp_override(points);
                    round.overrides[seat] = Some(clamped);
                    players[seat].current_round_score = clamped;
                }
            }
        }
        self.active = Some(round);
    }

    fn require_idle(&self, operation: &'static str) -> Result<(), GameError> {
        match self.phase() {
            RoundPhase::Idle => Ok(()),
            phase => Err(GameError::InvalidState { operation, phase }),
        }
    }

    fn ready_round(&mut self, operation: &'static str) -> Result<&mut ActiveRound, GameError> {
        let phase = self.phase();
        match self.active.as_mut() {
            Some(round) if round.is_complete() => Ok(round),
            _ => Err(GameError::InvalidState { operation, phase }),
        }
    }
}
