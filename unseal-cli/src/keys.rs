//! Key-material loading
//!
//! The sealed payload ships with three sidecar files: the key, the nonce,
//! and the expected authentication tag. The key file contributes its first
//! 32 bytes, so a longer key file (for example base64 text) is accepted;
//! nonce and tag files must match their exact lengths, with a single
//! trailing newline tolerated.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use unseal_core::CipherContext;

use crate::error::CliError;

/// Bytes taken from the front of the key file
pub const KEY_LEN: usize = 32;
/// Required nonce file length
pub const NONCE_LEN: usize = 12;
/// Required tag file length
pub const TAG_LEN: usize = 16;

/// Load the key, nonce, and tag files into a [`CipherContext`].
pub fn load_cipher_context(key: &Path, nonce: &Path, tag: &Path) -> Result<CipherContext> {
    let key_bytes = read_prefix(key, KEY_LEN, "key")?;
    let nonce_bytes = read_exact(nonce, NONCE_LEN, "nonce")?;
    let tag_bytes = read_exact(tag, TAG_LEN, "tag")?;

    CipherContext::new(&key_bytes, &nonce_bytes, &tag_bytes)
        .context("constructing cipher context")
}

/// Read a file that must hold at least `len` bytes; the rest is ignored.
fn read_prefix(path: &Path, len: usize, what: &str) -> Result<Vec<u8>> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read {what} file: {}", path.display()))?;
    if bytes.len() < len {
        return Err(CliError::KeyMaterial(format!(
            "{what} file {} holds {} bytes, need at least {len}",
            path.display(),
            bytes.len()
        ))
        .into());
    }
    Ok(bytes[..len].to_vec())
}

/// Read a file that must hold exactly `len` bytes (a trailing newline is
/// trimmed).
fn read_exact(path: &Path, len: usize, what: &str) -> Result<Vec<u8>> {
    let mut bytes = fs::read(path)
        .with_context(|| format!("failed to read {what} file: {}", path.display()))?;
    if bytes.len() == len + 1 && bytes[len] == b'\n' {
        bytes.truncate(len);
    }
    if bytes.len() != len {
        return Err(CliError::KeyMaterial(format!(
            "{what} file {} holds {} bytes, need exactly {len}",
            path.display(),
            bytes.len()
        ))
        .into());
    }
    Ok(bytes)
}
