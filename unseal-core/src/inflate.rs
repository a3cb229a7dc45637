//! Streaming gzip inflation
//!
//! A thin pull adapter over flate2's [`GzDecoder`]. No knowledge of the
//! original size is assumed; output length is whatever inflate produces.
//! Corrupt or truncated framing surfaces as an `io::Error` and is
//! classified to [`MalformedStream`](crate::UnsealError::MalformedStream)
//! at the pipeline boundary.

use std::io::{self, Read};

use flate2::read::GzDecoder;

/// Pull-based gzip decompressor over a compressed byte source
///
/// Finite and not restartable; a single traversal consumes the source.
pub struct Decompressor<R: Read> {
    inner: GzDecoder<R>,
}

impl<R: Read> Decompressor<R> {
    /// Wrap a source known to contain a gzip stream.
    pub fn new(source: R) -> Self {
        Self {
            inner: GzDecoder::new(source),
        }
    }

    /// Unwrap, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R: Read> Read for Decompressor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
