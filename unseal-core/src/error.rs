//! Layered error types for the recovery pipeline

use std::io;

use thiserror::Error;

/// Pipeline-level errors
///
/// Lossy UTF-8 decoding during analysis is deliberately not represented
/// here: it is non-fatal, counted per pass (see
/// [`Pass::lossy_chunks`](crate::analyze::Pass)), and reported through
/// `log::warn!`.
#[derive(Error, Debug)]
pub enum UnsealError {
    /// The computed authentication tag does not match the expected one.
    ///
    /// Any plaintext emitted before this point is unauthenticated and must
    /// be discarded by the consumer.
    #[error("authentication tag mismatch")]
    Authentication,

    /// The compressed framing is corrupt or truncated.
    #[error("malformed compressed stream: {0}")]
    MalformedStream(String),

    /// Key, nonce, or tag of the wrong length.
    #[error("invalid key material: {0}")]
    KeyMaterial(String),

    /// Transport failure while reading or writing a stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl UnsealError {
    /// Re-classify an error that crossed a `std::io::Read` seam.
    ///
    /// Stage errors travel inside `io::Error` so the stages can compose as
    /// plain readers. An [`UnsealError`] payload is unwrapped as-is; the
    /// error kinds flate2 produces for corrupt or truncated gzip framing
    /// map to [`UnsealError::MalformedStream`].
    pub(crate) fn classify_io(err: io::Error) -> Self {
        match err.downcast::<UnsealError>() {
            Ok(inner) => inner,
            Err(err) => match err.kind() {
                io::ErrorKind::InvalidData
                | io::ErrorKind::InvalidInput
                | io::ErrorKind::UnexpectedEof => UnsealError::MalformedStream(err.to_string()),
                _ => UnsealError::Io(err),
            },
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, UnsealError>;
