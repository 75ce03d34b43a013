//! Subcommand implementations.

pub mod config;
pub mod eval;
pub mod usernames;
