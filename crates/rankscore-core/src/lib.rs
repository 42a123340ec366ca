#![deny(warnings)]
pub mod error;
pub mod game;
pub mod model;

pub use error::{GameError, PersistenceError, SnapshotError};
pub use game::controller::{Command, GameController, Outcome};
pub use game::state::GameState;
pub use model::seat::{Seat, SeatTable};
