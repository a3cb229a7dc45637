//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Key, nonce, or tag file unusable
    KeyMaterial(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::KeyMaterial(msg) => write!(f, "Key material error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}
