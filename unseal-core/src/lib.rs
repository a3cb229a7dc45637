//! Streaming recovery and analysis of sealed text payloads
//!
//! A payload arrives as an authenticated-encrypted (AES-256-GCM), gzipped
//! byte stream. This crate recovers the plaintext without ever holding it in
//! memory as a whole, then runs a set of bounded-memory text analyses over
//! it:
//!
//! - [`AuthenticatedDecryptor`] decrypts incrementally and verifies the
//!   authentication tag once the ciphertext is exhausted.
//! - [`Decompressor`] inflates the decrypted gzip stream.
//! - [`TextAnalyzer`] consumes the plaintext in fixed-size chunks and
//!   computes digit sums, vowel-weighted sums, and per-sentence digit sums,
//!   carrying sentence fragments across chunk boundaries so results do not
//!   depend on where the chunks fall.
//! - [`derive_codeword`] turns the per-sentence sums into the final
//!   codeword string.
//!
//! [`pipeline::recover`] and [`pipeline::analyze_all`] wire the stages into
//! the single-direction pull chain described above.

#![warn(missing_docs)]

pub mod analyze;
pub mod codeword;
pub mod decrypt;
pub mod error;
pub mod inflate;
pub mod pipeline;

// Re-export key types
pub use analyze::{Pass, SentenceSums, TextAnalyzer};
pub use codeword::derive_codeword;
pub use decrypt::{AuthenticatedDecryptor, CipherContext};
pub use error::{Result, UnsealError};
pub use inflate::Decompressor;
pub use pipeline::{analyze_all, recover, AnalysisReport};
