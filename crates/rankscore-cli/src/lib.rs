#![deny(warnings)]
pub mod cli;
pub mod config;
pub mod console;
pub mod logging;
pub mod session;
pub mod store;
pub mod view;
