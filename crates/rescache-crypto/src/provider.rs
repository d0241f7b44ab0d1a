//! Trait-based provider mechanism for the cache's cryptographic collaborators.
//!
//! The cache never owns algorithm implementations; it borrows whatever the
//! server context supplies through these traits. This replaces C-style
//! function pointer tables with Rust's trait system.

use rescache_types::CryptoError;

/// A hash / message digest algorithm.
pub trait Digest: Send + Sync {
    /// The output size in bytes.
    fn output_size(&self) -> usize;

    /// The internal block size in bytes.
    fn block_size(&self) -> usize;

    /// Feed data into the hash state.
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    /// Finalize the hash and write the digest to `out`.
    /// The length of `out` must be at least `output_size()`.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;

    /// Reset the hash state to process a new message.
    fn reset(&mut self);
}

/// A convenience wrapper trait for creating digest instances.
pub trait HashAlgorithm: Send + Sync {
    /// Create a new digest context.
    fn new_digest(&self) -> Box<dyn Digest>;

    /// One-shot hash computation.
    fn hash(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut ctx = self.new_digest();
        ctx.update(data)?;
        let mut out = vec![0u8; ctx.output_size()];
        ctx.finish(&mut out)?;
        Ok(out)
    }
}

/// A source of cryptographically strong random bytes.
pub trait RandomSource {
    /// Fill `out` with random bytes.
    fn random_bytes(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;
}
