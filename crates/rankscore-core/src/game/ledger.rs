use crate::error::GameError;
use crate::model::player::Player;
use crate::model::rank::Rank;
use crate::model::record::RoundRecord;
use crate::model::seat::{Seat, SeatTable};
use tracing::info;

/// Committed rounds, newest first, together with the number the next commit
/// will receive.
///
/// Every mutation adjusts the players' totals by exactly the scores of the
/// record it adds or removes, so the sum of totals always equals the sum of
/// all recorded scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<RoundRecord>,
    next_round_number: u32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            next_round_number: 1,
        }
    }

    pub(crate) fn from_parts(records: Vec<RoundRecord>, next_round_number: u32) -> Self {
        let floor = records
            .iter()
            .map(|record| record.round_number.saturating_add(1))
            .max()
            .unwrap_or(1);
        Self {
            records,
            next_round_number: next_round_number.max(floor),
        }
    }

    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn next_round_number(&self) -> u32 {
        self.next_round_number
    }

    pub fn append(&mut self, record: RoundRecord, players: &mut SeatTable<Player>) {
        for seat in Seat::ALL {
            players[seat].total += record.scores[seat];
        }
        info!(
            round = record.round_number,
            scores = ?record.scores.to_array(),
            "round recorded"
        );
        self.next_round_number = record.round_number.max(self.next_round_number) + 1;
        self.records.insert(0, record);
    }

    /// Removes the most recently appended record. This is the inverse of
    /// `append` only when nothing else was removed in between.
    pub fn undo_last(&mut self, players: &mut SeatTable<Player>) -> Result<RoundRecord, GameError> {
        if self.records.is_empty() {
            return Err(GameError::EmptyLedger);
        }
        let record = self.records.remove(0);
        Self::reverse(&record, players);
        self.next_round_number = self.next_round_number.saturating_sub(1).max(1);
        info!(round = record.round_number, "last round undone");
        Ok(record)
    }

    /// Removes the record numbered `round_number` wherever it sits. Round
    /// numbers are never handed out again, so the counter is left alone.
    pub fn delete_round(
        &mut self,
        round_number: u32,
        players: &mut SeatTable<Player>,
    ) -> Result<RoundRecord, GameError> {
        let index = self
            .records
            .iter()
            .position(|r| r.round_number == round_number)
            .ok_or(GameError::NotFound {
                round: round_number,
            })?;
        let record = self.records.remove(index);
        Self::reverse(&record, players);
        info!(round = round_number, "round deleted");
        Ok(record)
    }

    pub fn reset(&mut self, players: &mut SeatTable<Player>) {
        self.records.clear();
        self.next_round_number = 1;
        for seat in Seat::ALL {
            players[seat].total = 0;
        }
        info!("ledger reset");
    }

    /// Per-seat totals implied by the records alone, or the first seat whose
    /// total would overflow.
    pub fn recorded_totals(&self) -> Result<SeatTable<i32>, Seat> {
        let mut totals = SeatTable::<i32>::default();
        for record in &self.records {
            for seat in Seat::ALL {
                totals[seat] = totals[seat]
                    .checked_add(record.scores[seat])
                    .ok_or(seat)?;
            }
        }
        Ok(totals)
    }

    pub fn score_sum(&self) -> i64 {
        self.records.iter().map(RoundRecord::score_sum).sum()
    }

    /// How often `seat` finished 1st, 2nd, 3rd and 4th.
    pub fn rank_counts(&self, seat: Seat) -> [u32; 4] {
        let mut counts = [0u32; 4];
        for record in &self.records {
            let rank: Rank = record.ranks[seat];
            counts[usize::from(rank.number()) - 1] += 1;
        }
        counts
    }

    fn reverse(record: &RoundRecord, players: &mut SeatTable<Player>) {
        for seat in Seat::ALL {
            players[seat].total -= record.scores[seat];
        }
    }
}
