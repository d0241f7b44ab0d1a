//! HMAC (Hash-based Message Authentication Code) implementation.
//!
//! HMAC provides message authentication using a cryptographic hash function
//! combined with a secret key, as defined in RFC 2104.
//!
//! HMAC(K, m) = H((K' XOR opad) || H((K' XOR ipad) || m))
//!
//! where K' is the key padded/hashed to block size, ipad = 0x36, opad = 0x5c.
//!
//! The underlying hash is chosen at runtime by [`HashAlgId`], matching how a
//! TLS server hands its preferred digest to collaborators.

use crate::provider::{Digest, HashAlgorithm};
use rescache_types::{CryptoError, HashAlgId};
use zeroize::Zeroize;

/// HMAC context over a runtime-selected hash algorithm.
pub struct Hmac {
    /// Inner hash context (initialized with ipad-xored key).
    inner: Box<dyn Digest>,
    /// Outer hash context (initialized with opad-xored key).
    outer: Box<dyn Digest>,
    /// Underlying hash algorithm (for reset).
    alg: HashAlgId,
    /// Processed key block (for reset).
    key_block: Vec<u8>,
}

fn absorb_pad(ctx: &mut dyn Digest, key_block: &[u8], pad: u8) -> Result<(), CryptoError> {
    let mut padded = vec![0u8; key_block.len()];
    for (i, byte) in padded.iter_mut().enumerate() {
        *byte = key_block[i] ^ pad;
    }
    let result = ctx.update(&padded);
    padded.zeroize();
    result
}

impl Hmac {
    /// Create a new HMAC instance keyed with `key`.
    ///
    /// Per RFC 2104, a key longer than the hash block size is hashed first;
    /// a shorter key is zero-padded.
    pub fn new(alg: HashAlgId, key: &[u8]) -> Result<Self, CryptoError> {
        let block_size = alg.block_size();

        let mut key_block = vec![0u8; block_size];
        if key.len() > block_size {
            let mut hashed_key = alg.hash(key)?;
            key_block[..hashed_key.len()].copy_from_slice(&hashed_key);
            hashed_key.zeroize();
        } else {
            key_block[..key.len()].copy_from_slice(key);
        }

        let mut inner = alg.new_digest();
        let mut outer = alg.new_digest();
        absorb_pad(inner.as_mut(), &key_block, 0x36)?;
        absorb_pad(outer.as_mut(), &key_block, 0x5c)?;

        Ok(Self {
            inner,
            outer,
            alg,
            key_block,
        })
    }

    /// The MAC output size in bytes (the underlying digest size).
    pub fn output_size(&self) -> usize {
        self.inner.output_size()
    }

    /// Feed data into the HMAC computation.
    pub fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.inner.update(data)
    }

    /// Finalize the HMAC computation and write the result to `out`.
    /// The length of `out` must be at least `output_size()`.
    pub fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        let mut inner_hash = vec![0u8; self.inner.output_size()];
        self.inner.finish(&mut inner_hash)?;

        self.outer.update(&inner_hash)?;
        inner_hash.zeroize();

        self.outer.finish(out)
    }

    /// Reset the HMAC state for reuse with the same key.
    pub fn reset(&mut self) {
        self.inner = self.alg.new_digest();
        self.outer = self.alg.new_digest();
        // Re-absorbing the stored key block cannot fail on a fresh context
        let _ = absorb_pad(self.inner.as_mut(), &self.key_block, 0x36);
        let _ = absorb_pad(self.outer.as_mut(), &self.key_block, 0x5c);
    }

    /// One-shot HMAC computation.
    pub fn mac(alg: HashAlgId, key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut ctx = Self::new(alg, key)?;
        ctx.update(data)?;
        let mut out = vec![0u8; ctx.output_size()];
        ctx.finish(&mut out)?;
        Ok(out)
    }
}

impl Drop for Hmac {
    fn drop(&mut self) {
        self.key_block.zeroize();
    }
}
