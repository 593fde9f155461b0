//! CLI subcommand implementations.

pub mod close;
pub mod common;
pub mod fetch;
pub mod metadata;
