//! Report formatting module

use anyhow::Result;
use unseal_core::AnalysisReport;

/// Trait for report formatters
pub trait ReportFormatter {
    /// Format and output an analysis report
    fn write_report(&mut self, report: &AnalysisReport) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Output formats supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Human-readable key/value lines
    Text,
    /// Pretty-printed JSON object
    Json,
}

/// Write a report to stdout in the requested format.
pub fn print_report(report: &AnalysisReport, format: Format) -> Result<()> {
    let stdout = std::io::stdout();
    match format {
        Format::Text => TextFormatter::new(stdout.lock()).write_report(report),
        Format::Json => JsonFormatter::new(stdout.lock()).write_report(report),
    }
}
