//! Codeword derivation from the per-sentence number sequence
//!
//! Pure and deterministic. The selection keeps duplicates, the re-ordering
//! is stable with respect to the first occurrence of each value, and the
//! index adjustment is not clamped.

use std::collections::HashMap;

/// Maximum number of entries contributing to the codeword
const TOP_N: usize = 10;

/// Derive the codeword from a finished number sequence.
///
/// 1. Select the `min(10, len)` largest values (duplicates allowed).
/// 2. Re-order the selection by the first-occurrence index of each value in
///    the original sequence; equal values stay adjacent.
/// 3. Replace the i-th value `v` with `v - i`.
/// 4. Map each adjusted value to a UTF-16 code unit by truncation modulo
///    2^16 (the coercion `String.fromCharCode` applies, which also covers
///    negative results) and decode lossily, so an unpaired surrogate
///    renders as U+FFFD instead of failing.
///
/// An empty sequence yields an empty codeword.
pub fn derive_codeword(sequence: &[u64]) -> String {
    let n = sequence.len().min(TOP_N);
    if n == 0 {
        return String::new();
    }

    let mut top: Vec<u64> = sequence.to_vec();
    top.sort_unstable_by(|a, b| b.cmp(a));
    top.truncate(n);

    let mut first_seen: HashMap<u64, usize> = HashMap::new();
    for (idx, &value) in sequence.iter().enumerate() {
        first_seen.entry(value).or_insert(idx);
    }
    // Stable sort: values tied in magnitude keep their relative order and
    // group by where the value first occurs in the document.
    top.sort_by_key(|value| first_seen[value]);

    let units: Vec<u16> = top
        .iter()
        .enumerate()
        .map(|(i, &value)| (value as i64 - i as i64) as u16)
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_yields_empty_codeword() {
        assert_eq!(derive_codeword(&[]), "");
    }

    #[test]
    fn duplicates_order_by_first_occurrence_and_adjust_by_index() {
        // All four entries of [5, 5, 3, 5] are selected. The three 5s come
        // before the 3 (value 5 first occurs at index 0, value 3 at index
        // 2), then the i-th value loses i: [5-0, 5-1, 5-2, 3-3].
        let word = derive_codeword(&[5, 5, 3, 5]);
        let units: Vec<u16> = word.encode_utf16().collect();
        assert_eq!(units, vec![5, 4, 3, 0]);
    }

    #[test]
    fn selection_keeps_document_order() {
        // Twelve distinct values; 6 and 5 miss the cut. The surviving ten
        // keep document order before the index adjustment.
        let seq = [20, 9, 19, 8, 18, 7, 17, 6, 16, 5, 15, 14];
        let word = derive_codeword(&seq);
        let units: Vec<u16> = word.encode_utf16().collect();
        assert_eq!(units, vec![20, 8, 17, 5, 14, 2, 11, 9, 7, 5]);
    }

    #[test]
    fn short_sequences_use_their_full_length() {
        // [70, 72]: document order 70, 72; adjusted 70, 71 => "FG".
        assert_eq!(derive_codeword(&[70, 72]), "FG");
    }

    #[test]
    fn adjustment_below_zero_wraps_modulo_u16() {
        // Single zero entry adjusted by index 0 stays 0 => NUL.
        assert_eq!(derive_codeword(&[0]), "\u{0}");
        // [1, 0]: order 1, 0; adjusted 1, -1 => 0x0001, 0xFFFF.
        let word = derive_codeword(&[1, 0]);
        let units: Vec<u16> = word.encode_utf16().collect();
        assert_eq!(units, vec![0x0001, 0xFFFF]);
    }

    #[test]
    fn more_than_ten_entries_keep_only_the_top_ten() {
        let seq: Vec<u64> = (1..=15).collect();
        let word = derive_codeword(&seq);
        // Top ten are 6..=15 in document order; adjusted i-th is (6+i) - i.
        let units: Vec<u16> = word.encode_utf16().collect();
        assert_eq!(units, vec![6; 10]);
    }

    #[test]
    fn derivation_is_deterministic() {
        let seq = [9, 9, 2, 9, 9, 1, 9];
        assert_eq!(derive_codeword(&seq), derive_codeword(&seq));
    }
}
