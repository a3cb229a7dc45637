//! Chunked text analysis over byte streams
//!
//! Each analysis pass consumes a byte stream in fixed-size chunks as if it
//! were one contiguous text, with bounded memory per chunk. Two pieces of
//! cross-chunk state keep the results independent of where chunk boundaries
//! fall: [`Utf8Carry`] holds an incomplete trailing multi-byte sequence, and
//! [`SentenceSplitter`] holds the unterminated sentence fragment. Per-pass
//! state is created at the start of a pass, finalized at stream end, and
//! never shared across passes.

use std::io::Read;

use crate::error::{Result, UnsealError};

/// Default chunk size for analysis passes
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Result of one analysis pass
///
/// `lossy_chunks` counts chunks whose byte-to-text decoding produced
/// replacement characters. Lossy decoding is tolerated, never fatal; the
/// count is the caller's encoding-tolerance signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass<T> {
    /// The computed value
    pub value: T,
    /// Number of chunks decoded lossily
    pub lossy_chunks: u64,
}

/// Outcome of the per-sentence pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceSums {
    /// Digit sum of each completed sentence, in document order
    pub sums: Vec<u64>,
    /// Trailing fragment after the last delimiter; tracked but never scored
    pub remainder: String,
}

/// Runs one of the analysis modes over an arbitrarily-chunked byte stream
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    chunk_size: usize,
}

impl TextAnalyzer {
    /// Analyzer with the default chunk size.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Analyzer with an explicit chunk size (clamped to at least 1 byte).
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Sum the face value of every decimal digit in the stream.
    ///
    /// Each digit contributes 0–9 regardless of its position in a larger
    /// number: "42" contributes 4 + 2 = 6. No digits yields 0.
    pub fn digit_sum<R: Read>(&self, reader: R) -> Result<Pass<u64>> {
        let mut total = 0u64;
        let lossy_chunks = self.for_each_chunk(reader, |text| total += digit_sum_of(text))?;
        Ok(Pass {
            value: total,
            lossy_chunks,
        })
    }

    /// Sum a fixed weight per vowel occurrence, case-insensitive.
    pub fn vowel_weighted_sum<R: Read>(&self, reader: R) -> Result<Pass<u64>> {
        let mut total = 0u64;
        let lossy_chunks = self.for_each_chunk(reader, |text| total += vowel_weight_of(text))?;
        Ok(Pass {
            value: total,
            lossy_chunks,
        })
    }

    /// Digit sum per `.`-delimited sentence, in document order.
    ///
    /// The trailing fragment after the final delimiter is exposed as
    /// [`SentenceSums::remainder`] and is not scored. The output does not
    /// depend on where chunk boundaries fall.
    pub fn sentence_digit_sums<R: Read>(&self, reader: R) -> Result<Pass<SentenceSums>> {
        let mut splitter = SentenceSplitter::new();
        let lossy_chunks = self.for_each_chunk(reader, |text| splitter.push_chunk(text))?;
        Ok(Pass {
            value: splitter.finish(),
            lossy_chunks,
        })
    }

    /// Drive one bounded-memory pass, handing decoded text pieces to `f`.
    fn for_each_chunk<R: Read>(&self, mut reader: R, mut f: impl FnMut(&str)) -> Result<u64> {
        let mut carry = Utf8Carry::default();
        let mut lossy_chunks = 0u64;
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            let n = reader.read(&mut buf).map_err(UnsealError::classify_io)?;
            if n == 0 {
                break;
            }
            let (text, lossy) = carry.decode(&buf[..n]);
            if lossy {
                lossy_chunks += 1;
            }
            f(&text);
        }

        let (tail, lossy) = carry.finish();
        if lossy {
            lossy_chunks += 1;
        }
        if !tail.is_empty() {
            f(&tail);
        }

        if lossy_chunks > 0 {
            log::warn!("{lossy_chunks} chunk(s) contained invalid UTF-8, decoded lossily");
        }
        Ok(lossy_chunks)
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Face-value digit sum of a text fragment.
pub fn digit_sum_of(text: &str) -> u64 {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .map(u64::from)
        .sum()
}

/// Vowel-weighted sum of a text fragment: a=2, e=4, i=8, o=16, u=32.
pub fn vowel_weight_of(text: &str) -> u64 {
    text.chars()
        .map(|c| match c.to_ascii_lowercase() {
            'a' => 2,
            'e' => 4,
            'i' => 8,
            'o' => 16,
            'u' => 32,
            _ => 0,
        })
        .sum()
}

/// Splits incrementally-delivered text into `.`-delimited sentences
///
/// Splitting always runs over `carry + chunk`; every piece before the final
/// delimiter is a completed sentence and is scored, and only the text after
/// the final delimiter becomes the new carry. Empty sentences from
/// consecutive delimiters are preserved as zero-valued entries.
#[derive(Debug, Default)]
pub struct SentenceSplitter {
    carry: String,
    sums: Vec<u64>,
}

impl SentenceSplitter {
    /// Fresh splitter with no carry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk of text.
    pub fn push_chunk(&mut self, chunk: &str) {
        if !chunk.contains('.') {
            self.carry.push_str(chunk);
            return;
        }

        self.carry.push_str(chunk);
        let combined = std::mem::take(&mut self.carry);
        let mut pieces = combined.split('.').peekable();
        while let Some(piece) = pieces.next() {
            if pieces.peek().is_some() {
                self.sums.push(digit_sum_of(piece));
            } else {
                self.carry.push_str(piece);
            }
        }
    }

    /// Finish the stream. The leftover carry is the unterminated remainder.
    pub fn finish(self) -> SentenceSums {
        SentenceSums {
            sums: self.sums,
            remainder: self.carry,
        }
    }
}

/// Carries an incomplete trailing UTF-8 sequence across chunk boundaries
///
/// A chunk edge can split a multi-byte character; the undelivered lead and
/// continuation bytes (at most 3) are held back and prepended to the next
/// chunk so the character decodes intact. Genuinely invalid bytes decode
/// via `from_utf8_lossy`.
#[derive(Debug, Default)]
struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    /// Decode a chunk, returning the text and whether decoding was lossy.
    fn decode(&mut self, chunk: &[u8]) -> (String, bool) {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let split = trailing_incomplete(&bytes);
        self.pending = bytes.split_off(split);

        match String::from_utf8(bytes) {
            Ok(text) => (text, false),
            Err(err) => {
                let text = String::from_utf8_lossy(&err.into_bytes()).into_owned();
                (text, true)
            }
        }
    }

    /// Flush at end of stream. A held partial sequence decodes lossily.
    fn finish(self) -> (String, bool) {
        if self.pending.is_empty() {
            (String::new(), false)
        } else {
            (String::from_utf8_lossy(&self.pending).into_owned(), true)
        }
    }
}

/// Byte offset where a trailing incomplete multi-byte sequence starts, or
/// `bytes.len()` if the buffer ends on a character boundary.
fn trailing_incomplete(bytes: &[u8]) -> usize {
    let len = bytes.len();
    for back in 1..=len.min(3) {
        let idx = len - back;
        let byte = bytes[idx];
        if byte < 0x80 {
            return len;
        }
        if byte >= 0xC0 {
            let need = if byte >= 0xF0 {
                4
            } else if byte >= 0xE0 {
                3
            } else {
                2
            };
            // A complete (or over-long, hence invalid) sequence stays put;
            // lossy decoding deals with invalid ones.
            return if back >= need { len } else { idx };
        }
        // Continuation byte, keep scanning backwards.
    }
    len
}
