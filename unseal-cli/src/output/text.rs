//! Plain text report formatter

use std::io::Write;

use anyhow::Result;
use unseal_core::AnalysisReport;

use super::ReportFormatter;

/// Plain text formatter - one result per line
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportFormatter for TextFormatter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> Result<()> {
        writeln!(self.writer, "digit sum:          {}", report.digit_sum)?;
        writeln!(
            self.writer,
            "vowel weighted sum: {}",
            report.vowel_weighted_sum
        )?;
        let sums: Vec<String> = report.sentence_sums.iter().map(u64::to_string).collect();
        writeln!(self.writer, "sentence sums:      [{}]", sums.join(", "))?;
        if !report.trailing_remainder.is_empty() {
            writeln!(
                self.writer,
                "trailing remainder: {:?}",
                report.trailing_remainder
            )?;
        }
        if report.lossy_chunks > 0 {
            writeln!(self.writer, "lossy chunks:       {}", report.lossy_chunks)?;
        }
        writeln!(self.writer, "codeword:           {}", report.codeword)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            digit_sum: 25,
            vowel_weighted_sum: 24,
            sentence_sums: vec![6, 0, 10],
            trailing_remainder: "tail 9".to_string(),
            codeword: "ABC".to_string(),
            lossy_chunks: 0,
        }
    }

    #[test]
    fn renders_every_result_line() {
        let mut out = Vec::new();
        TextFormatter::new(&mut out)
            .write_report(&sample_report())
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("digit sum:          25"));
        assert!(text.contains("vowel weighted sum: 24"));
        assert!(text.contains("sentence sums:      [6, 0, 10]"));
        assert!(text.contains("trailing remainder: \"tail 9\""));
        assert!(text.contains("codeword:           ABC"));
        // No lossy chunks, no lossy line.
        assert!(!text.contains("lossy chunks"));
    }

    #[test]
    fn empty_remainder_is_omitted() {
        let mut report = sample_report();
        report.trailing_remainder.clear();

        let mut out = Vec::new();
        TextFormatter::new(&mut out).write_report(&report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("trailing remainder"));
    }
}
