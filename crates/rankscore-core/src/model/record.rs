use crate::model::rank::Rank;
use crate::model::seat::SeatTable;
use serde::{Deserialize, Serialize};

/// A committed round. Scores may disagree with the rank table when a manual
/// override was entered; ranks always reflect selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoundRecord {
    pub round_number: u32,
    pub scores: SeatTable<i32>,
    pub ranks: SeatTable<Rank>,
    pub duration_label: String,
    pub timestamp: String,
}

impl RoundRecord {
    pub fn score_sum(&self) -> i64 {
        self.scores.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::RoundRecord;
    use crate::model::rank::Rank;
    use crate::model::seat::SeatTable;

    #[test]
    fn record_uses_camel_case_keys() {
        let record = RoundRecord {
            round_number: 4,
            scores: SeatTable::from_fn(|seat| seat.index() as i32),
            ranks: SeatTable::from_fn(|seat| Rank::ORDERED[3 - seat.index()]),
            duration_label: "2m05s".into(),
            timestamp: "2024-03-01 20:15:00".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"roundNumber\":4"));
        assert!(json.contains("\"durationLabel\":\"2m05s\""));
        assert!(json.contains("\"ranks\":{\"north\":4,\"east\":3,\"south\":2,\"west\":1}"));
        assert_eq!(record.score_sum(), 6);
    }
}
