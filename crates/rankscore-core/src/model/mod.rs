pub mod player;
pub mod rank;
pub mod record;
pub mod round;
pub mod score;
pub mod seat;
