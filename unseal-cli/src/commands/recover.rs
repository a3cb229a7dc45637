//! Recover command implementation

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use unseal_core::CipherContext;

use super::init_logging;
use crate::keys;

/// Arguments for the recover command
#[derive(Debug, Args)]
pub struct RecoverArgs {
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

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl RecoverArgs {
    /// Execute the recover command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        let ctx = keys::load_cipher_context(&self.key, &self.nonce, &self.tag)?;
        let written = recover_to_file(&self.ciphertext, &ctx, &self.output)?;
        log::info!(
            "recovered {written} plaintext bytes into {}",
            self.output.display()
        );
        Ok(())
    }
}

/// Stream-decrypt and inflate `ciphertext` into `output`.
///
/// Plaintext written before tag verification is provisional, so the partial
/// output file is removed on any failure.
pub(crate) fn recover_to_file(
    ciphertext: &Path,
    ctx: &CipherContext,
    output: &Path,
) -> Result<u64> {
    let source = File::open(ciphertext)
        .with_context(|| format!("failed to open ciphertext file: {}", ciphertext.display()))?;
    let reader = BufReader::new(source);

    let sink = File::create(output)
        .with_context(|| format!("failed to create output file: {}", output.display()))?;
    let mut writer = BufWriter::new(sink);

    match unseal_core::recover(reader, ctx, &mut writer).and_then(|written| {
        writer.flush()?;
        Ok(written)
    }) {
        Ok(written) => Ok(written),
        Err(err) => {
            drop(writer);
            if let Err(remove_err) = fs::remove_file(output) {
                log::warn!(
                    "could not remove partial output {}: {remove_err}",
                    output.display()
                );
            }
            Err(err).with_context(|| format!("recovering {}", ciphertext.display()))
        }
    }
}
