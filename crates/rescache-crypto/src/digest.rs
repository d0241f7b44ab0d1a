//! Digest contexts for the hash algorithms a TLS server's RNG is built on.
//!
//! SHA-1, SHA-256, and SHA-384 are exposed behind the [`Digest`] trait so the
//! session cache can work with whichever algorithm the server prefers,
//! selected at runtime. The compression functions come from the RustCrypto
//! `sha1`/`sha2` crates.

use crate::provider::{Digest, HashAlgorithm};
use rescache_types::{CryptoError, HashAlgId};
use sha1::Digest as _;

fn check_out(out: &[u8], need: usize) -> Result<(), CryptoError> {
    if out.len() < need {
        return Err(CryptoError::BufferTooSmall {
            need,
            got: out.len(),
        });
    }
    Ok(())
}

macro_rules! digest_context {
    ($name:ident, $inner:ty, $alg:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Default)]
        pub struct $name {
            inner: $inner,
        }

        impl $name {
            /// Create a new hash context.
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl Digest for $name {
            fn output_size(&self) -> usize {
                $alg.output_size()
            }

            fn block_size(&self) -> usize {
                $alg.block_size()
            }

            fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
                self.inner.update(data);
                Ok(())
            }

            fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
                check_out(out, self.output_size())?;
                let digest = self.inner.finalize_reset();
                out[..digest.len()].copy_from_slice(&digest);
                Ok(())
            }

            fn reset(&mut self) {
                self.inner = <$inner>::default();
            }
        }
    };
}

digest_context!(Sha1, sha1::Sha1, HashAlgId::Sha1, "SHA-1 hash context.");
digest_context!(
    Sha256,
    sha2::Sha256,
    HashAlgId::Sha256,
    "SHA-256 hash context."
);
digest_context!(
    Sha384,
    sha2::Sha384,
    HashAlgId::Sha384,
    "SHA-384 hash context."
);

impl HashAlgorithm for HashAlgId {
    fn new_digest(&self) -> Box<dyn Digest> {
        match self {
            HashAlgId::Sha1 => Box::new(Sha1::new()),
            HashAlgId::Sha256 => Box::new(Sha256::new()),
            HashAlgId::Sha384 => Box::new(Sha384::new()),
        }
    }
}
