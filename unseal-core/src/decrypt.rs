//! Streaming AES-256-GCM decryption
//!
//! The decryptor is a [`Read`] adapter assembled from the RustCrypto
//! primitives: an AES-256 CTR keystream (starting one counter past `J0`, as
//! GCM prescribes) decrypts ciphertext in place while GHASH absorbs the
//! ciphertext bytes. Once the source is exhausted, the final tag
//! `E_K(J0) XOR GHASH(C)` is compared against the expected tag in constant
//! time. Plaintext handed out before that comparison is provisional.

use std::io::{self, Read};

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit, KeyIvInit, StreamCipher};
use aes::Aes256;
use ghash::universal_hash::UniversalHash;
use ghash::GHash;
use subtle::ConstantTimeEq;

use crate::error::{Result, UnsealError};

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;
/// GCM nonce length in bytes (the 96-bit fast path)
pub const NONCE_LEN: usize = 12;
/// GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

const BLOCK: usize = 16;

type Ctr32 = ctr::Ctr32BE<Aes256>;

/// Immutable key material for one decryption run
///
/// Must be fully populated before the first decrypt call; the tag is only
/// checked after the last ciphertext byte has been processed.
#[derive(Clone)]
pub struct CipherContext {
    key: [u8; KEY_LEN],
    nonce: [u8; NONCE_LEN],
    expected_tag: [u8; TAG_LEN],
}

impl CipherContext {
    /// Build a context from raw key material, validating lengths.
    pub fn new(key: &[u8], nonce: &[u8], expected_tag: &[u8]) -> Result<Self> {
        let key = key.try_into().map_err(|_| {
            UnsealError::KeyMaterial(format!("key must be {KEY_LEN} bytes, got {}", key.len()))
        })?;
        let nonce = nonce.try_into().map_err(|_| {
            UnsealError::KeyMaterial(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                nonce.len()
            ))
        })?;
        let expected_tag = expected_tag.try_into().map_err(|_| {
            UnsealError::KeyMaterial(format!(
                "tag must be {TAG_LEN} bytes, got {}",
                expected_tag.len()
            ))
        })?;
        Ok(Self {
            key,
            nonce,
            expected_tag,
        })
    }
}

impl std::fmt::Debug for CipherContext {
    // Key material stays out of logs and panic messages.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherContext").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Streaming,
    Verified,
    Failed,
}

/// Streaming AES-256-GCM decryptor over a ciphertext source
///
/// Single traversal, not restartable. Reads return plaintext of the same
/// length as the ciphertext consumed. At EOF the authentication tag is
/// verified exactly once — including for a zero-length ciphertext — and a
/// mismatch surfaces as [`UnsealError::Authentication`] wrapped in an
/// `io::Error`. Reads after successful verification return `Ok(0)`.
pub struct AuthenticatedDecryptor<R> {
    source: R,
    keystream: Ctr32,
    // Taken at finalization; `None` only once the tag has been checked.
    ghash: Option<GHash>,
    tag_mask: [u8; TAG_LEN],
    expected_tag: [u8; TAG_LEN],
    // Partial GHASH block carried between reads.
    pending: [u8; BLOCK],
    pending_len: usize,
    ciphertext_len: u64,
    phase: Phase,
}

impl<R: Read> AuthenticatedDecryptor<R> {
    /// Wrap a ciphertext source with the given key material.
    pub fn new(source: R, ctx: &CipherContext) -> Self {
        let cipher = Aes256::new(GenericArray::from_slice(&ctx.key));

        // Hash subkey H = E_K(0^128)
        let mut subkey = ghash::Block::default();
        cipher.encrypt_block(&mut subkey);

        // J0 = nonce || 0^31 || 1 for a 96-bit nonce; E_K(J0) masks the tag.
        let mut j0 = [0u8; BLOCK];
        j0[..NONCE_LEN].copy_from_slice(&ctx.nonce);
        j0[BLOCK - 1] = 1;
        let mut tag_mask = GenericArray::from(j0);
        cipher.encrypt_block(&mut tag_mask);

        // The payload keystream starts one counter past J0.
        let mut iv = j0;
        iv[BLOCK - 1] = 2;
        let keystream = Ctr32::new(
            GenericArray::from_slice(&ctx.key),
            GenericArray::from_slice(&iv),
        );

        Self {
            source,
            keystream,
            ghash: Some(GHash::new(&subkey)),
            tag_mask: tag_mask.into(),
            expected_tag: ctx.expected_tag,
            pending: [0u8; BLOCK],
            pending_len: 0,
            ciphertext_len: 0,
            phase: Phase::Streaming,
        }
    }

    /// Whether the trailing tag has been verified successfully.
    pub fn is_verified(&self) -> bool {
        self.phase == Phase::Verified
    }

    /// Absorb ciphertext bytes into GHASH, carrying partial blocks.
    fn absorb(&mut self, mut data: &[u8]) {
        self.ciphertext_len += data.len() as u64;
        let Some(ghash) = self.ghash.as_mut() else {
            return;
        };

        if self.pending_len > 0 {
            let take = data.len().min(BLOCK - self.pending_len);
            self.pending[self.pending_len..self.pending_len + take]
                .copy_from_slice(&data[..take]);
            self.pending_len += take;
            data = &data[take..];
            if self.pending_len == BLOCK {
                ghash.update(&[self.pending.into()]);
                self.pending_len = 0;
            }
        }

        let full = data.len() - data.len() % BLOCK;
        for block in data[..full].chunks_exact(BLOCK) {
            ghash.update(&[ghash::Block::clone_from_slice(block)]);
        }
        data = &data[full..];

        if !data.is_empty() {
            self.pending[..data.len()].copy_from_slice(data);
            self.pending_len = data.len();
        }
    }

    /// Finalize GHASH and compare tags in constant time.
    fn verify(&mut self) -> io::Result<()> {
        let Some(mut ghash) = self.ghash.take() else {
            return Ok(());
        };

        if self.pending_len > 0 {
            let mut block = [0u8; BLOCK];
            block[..self.pending_len].copy_from_slice(&self.pending[..self.pending_len]);
            ghash.update(&[block.into()]);
            self.pending_len = 0;
        }

        // No AAD, so the high half of the length block stays zero.
        let mut lengths = [0u8; BLOCK];
        lengths[8..].copy_from_slice(&(self.ciphertext_len * 8).to_be_bytes());
        ghash.update(&[lengths.into()]);

        let mut tag: [u8; TAG_LEN] = ghash.finalize().into();
        for (byte, mask) in tag.iter_mut().zip(self.tag_mask.iter()) {
            *byte ^= mask;
        }

        if bool::from(tag.ct_eq(&self.expected_tag)) {
            self.phase = Phase::Verified;
            Ok(())
        } else {
            self.phase = Phase::Failed;
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                UnsealError::Authentication,
            ))
        }
    }
}

impl<R: Read> Read for AuthenticatedDecryptor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.phase {
            Phase::Verified => return Ok(0),
            Phase::Failed => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    UnsealError::Authentication,
                ))
            }
            Phase::Streaming => {}
        }
        if buf.is_empty() {
            return Ok(0);
        }

        let n = self.source.read(buf)?;
        if n == 0 {
            self.verify()?;
            return Ok(0);
        }

        self.absorb(&buf[..n]);
        self.keystream.apply_keystream(&mut buf[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes_gcm::aead::{Aead, KeyInit as _};
    use aes_gcm::{Aes256Gcm, Nonce};
    use std::io::Read;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];
    const NONCE: [u8; NONCE_LEN] = [0x24; NONCE_LEN];

    fn seal(plaintext: &[u8]) -> (Vec<u8>, [u8; TAG_LEN]) {
        let cipher = Aes256Gcm::new(&KEY.into());
        let mut sealed = cipher
            .encrypt(Nonce::from_slice(&NONCE), plaintext)
            .unwrap();
        let tag_start = sealed.len() - TAG_LEN;
        let tag: [u8; TAG_LEN] = sealed[tag_start..].try_into().unwrap();
        sealed.truncate(tag_start);
        (sealed, tag)
    }

    fn context(tag: &[u8; TAG_LEN]) -> CipherContext {
        CipherContext::new(&KEY, &NONCE, tag).unwrap()
    }

    #[test]
    fn context_rejects_bad_lengths() {
        assert!(matches!(
            CipherContext::new(&[0u8; 16], &NONCE, &[0u8; TAG_LEN]),
            Err(UnsealError::KeyMaterial(_))
        ));
        assert!(matches!(
            CipherContext::new(&KEY, &[0u8; 16], &[0u8; TAG_LEN]),
            Err(UnsealError::KeyMaterial(_))
        ));
        assert!(matches!(
            CipherContext::new(&KEY, &NONCE, &[0u8; 12]),
            Err(UnsealError::KeyMaterial(_))
        ));
    }

    #[test]
    fn decrypts_and_verifies() {
        let plaintext = b"attack at dawn. 4 riders, 2 flanks.";
        let (ciphertext, tag) = seal(plaintext);

        let mut decryptor = AuthenticatedDecryptor::new(&ciphertext[..], &context(&tag));
        let mut recovered = Vec::new();
        decryptor.read_to_end(&mut recovered).unwrap();

        assert_eq!(recovered, plaintext);
        assert!(decryptor.is_verified());
    }

    #[test]
    fn decrypts_across_tiny_reads() {
        // Partial GHASH blocks must carry across read calls.
        let plaintext = b"0123456789abcdef0123456789abcdef!";
        let (ciphertext, tag) = seal(plaintext);

        let mut decryptor = AuthenticatedDecryptor::new(&ciphertext[..], &context(&tag));
        let mut recovered = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match decryptor.read(&mut byte).unwrap() {
                0 => break,
                n => recovered.extend_from_slice(&byte[..n]),
            }
        }

        assert_eq!(recovered, plaintext);
        assert!(decryptor.is_verified());
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let (mut ciphertext, tag) = seal(b"the one true payload");
        ciphertext[3] ^= 0x01;

        let mut decryptor = AuthenticatedDecryptor::new(&ciphertext[..], &context(&tag));
        let err = decryptor.read_to_end(&mut Vec::new()).unwrap_err();
        assert!(matches!(
            UnsealError::classify_io(err),
            UnsealError::Authentication
        ));
    }

    #[test]
    fn tampered_tag_fails_authentication() {
        let (ciphertext, mut tag) = seal(b"the one true payload");
        tag[0] ^= 0x80;

        let mut decryptor = AuthenticatedDecryptor::new(&ciphertext[..], &context(&tag));
        assert!(decryptor.read_to_end(&mut Vec::new()).is_err());
        assert!(!decryptor.is_verified());
    }

    #[test]
    fn empty_ciphertext_still_checks_tag() {
        let (ciphertext, tag) = seal(b"");
        assert!(ciphertext.is_empty());

        let mut decryptor = AuthenticatedDecryptor::new(&ciphertext[..], &context(&tag));
        let mut recovered = Vec::new();
        decryptor.read_to_end(&mut recovered).unwrap();
        assert!(recovered.is_empty());
        assert!(decryptor.is_verified());

        // Same empty input with a wrong tag must not be waved through.
        let bad = context(&[0u8; TAG_LEN]);
        let mut decryptor = AuthenticatedDecryptor::new(&[][..], &bad);
        assert!(decryptor.read_to_end(&mut Vec::new()).is_err());
    }
}
