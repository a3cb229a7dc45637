//! JSON report formatter

use std::io::Write;

use anyhow::Result;
use unseal_core::AnalysisReport;

use super::ReportFormatter;

/// JSON formatter - outputs the report as a pretty-printed object
pub struct JsonFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportFormatter for JsonFormatter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_valid_json_with_all_fields() {
        let report = AnalysisReport {
            digit_sum: 3,
            vowel_weighted_sum: 2,
            sentence_sums: vec![1, 2],
            trailing_remainder: String::new(),
            codeword: "\u{1}\u{1}".to_string(),
            lossy_chunks: 0,
        };

        let mut out = Vec::new();
        JsonFormatter::new(&mut out).write_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["digit_sum"], 3);
        assert_eq!(value["sentence_sums"], serde_json::json!([1, 2]));
        assert_eq!(value["lossy_chunks"], 0);
    }
}
