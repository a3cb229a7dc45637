//! Unseal CLI library
//!
//! This library provides the command-line interface around the
//! `unseal-core` recovery pipeline: key-material loading, subcommand
//! orchestration, and report formatting.

pub mod commands;
pub mod error;
pub mod keys;
pub mod output;

pub use error::CliError;
