pub mod controller;
pub mod ledger;
pub mod ports;
pub mod serialization;
pub mod state;
pub mod timer;
