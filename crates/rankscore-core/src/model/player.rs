use super::seat::Seat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub total: i32,
    pub current_round_score: i32,
}

impl Player {
    /// Fresh player for `seat`, falling back to the seat label for blank names.
    pub fn for_seat(seat: Seat, name: Option<&str>) -> Self {
        Self {
            name: display_name(seat, name),
            ..Self::default()
        }
    }
}

pub fn display_name(seat: Seat, name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => seat.label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Player, display_name};
    use crate::model::seat::Seat;

    #[test]
    fn blank_names_fall_back_to_seat_label() {
        assert_eq!(display_name(Seat::West, Some("   ")), "West");
        assert_eq!(display_name(Seat::North, None), "North");
        assert_eq!(display_name(Seat::East, Some(" Mai ")), "Mai");
    }

    #[test]
    fn partial_player_document_defaults_fields() {
        let player: Player = serde_json::from_str(r#"{"total": 12}"#).unwrap();
        assert_eq!(player.total, 12);
        assert_eq!(player.current_round_score, 0);
        assert!(player.name.is_empty());
    }
}
