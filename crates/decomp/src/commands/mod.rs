//! Command implementations for decomp CLI.

pub mod check;
pub mod generate;
pub mod intents;
