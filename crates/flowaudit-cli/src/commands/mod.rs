//! Subcommand implementations for the `flowaudit` CLI.

pub mod audit;
pub mod categories;
