//! Command-line driver for the ledger

pub mod commands;

pub use commands::{cmd_demo, cmd_mine, cmd_validate, CliResult};
