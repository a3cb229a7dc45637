//! Analyze command implementation

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use unseal_core::{analyze_all, AnalysisReport, TextAnalyzer};

use super::init_logging;
use crate::output::{self, Format};

/// Arguments for the analyze command
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Recovered plaintext file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output format
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

impl AnalyzeArgs {
    /// Execute the analyze command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        let report = analyze_file(&self.input, self.chunk_size)?;
        log::info!(
            "analysis complete: {} sentence(s), codeword of {} character(s)",
            report.sentence_sums.len(),
            report.codeword.chars().count()
        );
        output::print_report(&report, self.format)
    }
}

/// Run the three analysis passes over a plaintext file.
pub(crate) fn analyze_file(input: &Path, chunk_size: usize) -> Result<AnalysisReport> {
    let analyzer = TextAnalyzer::with_chunk_size(chunk_size);
    analyze_all(|| File::open(input).map(BufReader::new), &analyzer)
        .with_context(|| format!("analyzing {}", input.display()))
}
