//! End-to-end wiring of the recovery stages
//!
//! The pipeline is a single-threaded pull chain: each stage requests the
//! next chunk from its upstream stage only once it has finished the current
//! one. A stage failure stops all downstream consumption immediately and is
//! re-classified into the [`UnsealError`] taxonomy at this boundary.

use std::io::{self, Read, Write};

use serde::Serialize;

use crate::analyze::TextAnalyzer;
use crate::codeword::derive_codeword;
use crate::decrypt::{AuthenticatedDecryptor, CipherContext};
use crate::error::{Result, UnsealError};
use crate::inflate::Decompressor;

/// Decrypt and inflate a ciphertext stream into `out`.
///
/// Returns the number of plaintext bytes written. Everything written before
/// the return is provisional: on any error — authentication in particular —
/// the caller must discard the sink's contents.
///
/// Tag verification always runs, even when the gzip stream declares its own
/// end before the ciphertext is exhausted.
pub fn recover<R: Read, W: Write>(ciphertext: R, ctx: &CipherContext, mut out: W) -> Result<u64> {
    let mut plaintext = Decompressor::new(AuthenticatedDecryptor::new(ciphertext, ctx));
    let copied = io::copy(&mut plaintext, &mut out);
    let mut decryptor = plaintext.into_inner();

    // Drain whatever ciphertext the gzip layer did not consume (its trailer
    // can end before the stream does) so tag verification always runs. When
    // inflation failed, the tag verdict decides whether the input was
    // tampered with or merely badly framed.
    let drained = io::copy(&mut decryptor, &mut io::sink());

    match (copied, drained) {
        (Ok(written), Ok(_)) => {
            log::debug!("recovered {written} plaintext bytes, tag verified");
            Ok(written)
        }
        (_, Err(err)) if is_authentication(&err) => Err(UnsealError::Authentication),
        (Err(err), _) | (Ok(_), Err(err)) => Err(UnsealError::classify_io(err)),
    }
}

fn is_authentication(err: &io::Error) -> bool {
    matches!(
        err.get_ref().and_then(|e| e.downcast_ref::<UnsealError>()),
        Some(UnsealError::Authentication)
    )
}

/// Combined result of the three analysis passes and the codeword
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// Face-value sum of every decimal digit in the stream
    pub digit_sum: u64,
    /// Weighted vowel sum (a=2, e=4, i=8, o=16, u=32)
    pub vowel_weighted_sum: u64,
    /// Digit sum per completed sentence, in document order
    pub sentence_sums: Vec<u64>,
    /// Unterminated trailing fragment, excluded from `sentence_sums`
    pub trailing_remainder: String,
    /// Codeword derived from `sentence_sums`
    pub codeword: String,
    /// Chunks across all passes that required lossy UTF-8 decoding
    pub lossy_chunks: u64,
}

/// Run the three analysis passes over the same plaintext and derive the
/// codeword.
///
/// `open` is called once per pass and must yield a fresh reader positioned
/// at the start of the plaintext — the passes are independent single
/// traversals, deliberately not fused.
pub fn analyze_all<R, F>(mut open: F, analyzer: &TextAnalyzer) -> Result<AnalysisReport>
where
    R: Read,
    F: FnMut() -> io::Result<R>,
{
    let digits = analyzer.digit_sum(open()?)?;
    let vowels = analyzer.vowel_weighted_sum(open()?)?;
    let sentences = analyzer.sentence_digit_sums(open()?)?;

    let codeword = derive_codeword(&sentences.value.sums);
    Ok(AnalysisReport {
        digit_sum: digits.value,
        vowel_weighted_sum: vowels.value,
        sentence_sums: sentences.value.sums,
        trailing_remainder: sentences.value.remainder,
        codeword,
        lossy_chunks: digits.lossy_chunks + vowels.lossy_chunks + sentences.lossy_chunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_all_combines_the_three_passes() {
        let text = "a1b2c3. eee. 55.tail 9";
        let report = analyze_all(|| Ok(text.as_bytes()), &TextAnalyzer::new()).unwrap();

        assert_eq!(report.digit_sum, 1 + 2 + 3 + 5 + 5 + 9);
        // a(2) + e+e+e(12) + a(2) + i(8)
        assert_eq!(report.vowel_weighted_sum, 24);
        assert_eq!(report.sentence_sums, vec![6, 0, 10]);
        assert_eq!(report.trailing_remainder, "tail 9");
        assert_eq!(report.codeword, derive_codeword(&[6, 0, 10]));
        assert_eq!(report.lossy_chunks, 0);
    }

    #[test]
    fn analysis_passes_are_idempotent() {
        let text = "re-run me. 1 and 2. 3.";
        let analyzer = TextAnalyzer::new();
        let first = analyze_all(|| Ok(text.as_bytes()), &analyzer).unwrap();
        let second = analyze_all(|| Ok(text.as_bytes()), &analyzer).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_plaintext_resolves_to_identity_values() {
        let report = analyze_all(|| Ok(&b""[..]), &TextAnalyzer::new()).unwrap();
        assert_eq!(report.digit_sum, 0);
        assert_eq!(report.vowel_weighted_sum, 0);
        assert!(report.sentence_sums.is_empty());
        assert_eq!(report.trailing_remainder, "");
        assert_eq!(report.codeword, "");
    }

    #[test]
    fn report_serializes_to_json() {
        let report = analyze_all(|| Ok(&b"1."[..]), &TextAnalyzer::new()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["digit_sum"], 1);
        assert_eq!(json["sentence_sums"][0], 1);
    }
}
