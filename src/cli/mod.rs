//! Operator tooling.
//!
//! Configuration loading for the producer and output formatting for the
//! `arkham-oracle` command line tool.

pub mod config;
pub mod output;

pub use config::*;
pub use output::*;
