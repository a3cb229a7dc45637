//! Run command implementation: recover, then analyze

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::analyze::analyze_file;
use super::init_logging;
use super::recover::recover_to_file;
use crate::keys;
use crate::output::{self, Format};

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Encrypted payload file
    #[arg(short, long, value_name = "FILE")]
    pub ciphertext: PathBuf,

    /// Key file; its first 32 bytes are used
    #[arg(short, long, value_name = "FILE")]
    pub key: PathBuf,

    /// 12-byte nonce file
    #[arg(short, long, value_name = "FILE")]
    pub nonce: PathBuf,

    /// 16-byte authentication tag file
    #[arg(short, long, value_name = "FILE")]
    pub tag: PathBuf,

    /// Destination for the recovered plaintext
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Output format for the analysis report
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: Format,

    /// Analysis chunk size in bytes
    #[arg(long, value_name = "BYTES", default_value_t = unseal_core::analyze::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl RunArgs {
    /// Execute the run command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        let ctx = keys::load_cipher_context(&self.key, &self.nonce, &self.tag)?;
        let written = recover_to_file(&self.ciphertext, &ctx, &self.output)?;
        log::info!(
            "recovered {written} plaintext bytes into {}",
            self.output.display()
        );

        let report = analyze_file(&self.output, self.chunk_size)?;
        output::print_report(&report, self.format)
    }
}
