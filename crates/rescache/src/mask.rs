//! Session ID masking.
//!
//! The search tree is never actively rebalanced, so an attacker who could
//! choose the tree's ordering keys (by replaying chosen session IDs) could
//! drive it degenerate and make lookups linear, a denial of service that
//! outlives the attacker's own connections. Indexing therefore uses
//! HMAC(index_key, session_id) in place of the session ID: without the
//! per-instance secret, every chosen ID lands at a pseudorandom position and
//! the tree stays logarithmic in expectation.
//!
//! The risk of a MAC collision is far below that of a transmission error and
//! has the same mild consequence (one resumption fails, the client falls
//! back to a full handshake).

use crate::{ServerContext, SESSION_ID_LEN};
use rescache_crypto::hmac::Hmac;
use rescache_types::{CryptoError, HashAlgId};
use zeroize::Zeroize;

/// The fixed per-instance masking state: a secret key and a hash choice.
/// Once built, neither changes for the lifetime of the cache.
pub(crate) struct KeyMasker {
    index_key: [u8; 32],
    hash: HashAlgId,
}

impl KeyMasker {
    /// Draw a fresh indexing secret from the server's random generator and
    /// fix the MAC on the server's preferred hash.
    pub(crate) fn init(server: &mut dyn ServerContext) -> Result<Self, CryptoError> {
        let mut index_key = [0u8; 32];
        server.random_bytes(&mut index_key)?;
        Ok(Self {
            index_key,
            hash: server.preferred_hash(),
        })
    }

    /// Transform a session ID into the 32-byte indexed key.
    ///
    /// The output starts as a copy of the ID, then its first
    /// `min(digest_len, 32)` bytes are overwritten by the MAC: SHA-256
    /// replaces all 32, SHA-384 is truncated to 32, and SHA-1 replaces the
    /// first 20 while the final 12 ID bytes remain.
    pub(crate) fn mask(
        &self,
        id: &[u8; SESSION_ID_LEN],
    ) -> Result<[u8; SESSION_ID_LEN], CryptoError> {
        let mut out = *id;
        let mut mac = Hmac::mac(self.hash, &self.index_key, id)?;
        let n = mac.len().min(SESSION_ID_LEN);
        out[..n].copy_from_slice(&mac[..n]);
        mac.zeroize();
        Ok(out)
    }
}

impl Drop for KeyMasker {
    fn drop(&mut self) {
        self.index_key.zeroize();
    }
}
