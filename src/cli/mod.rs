//! CLI support for the multisig demo binary

pub mod commands;

pub use commands::{AppState, CliResult};
