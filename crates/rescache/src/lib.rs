#![forbid(unsafe_code)]
#![doc = "Bounded LRU session cache for TLS servers."]

//! Records the parameters of completed TLS handshakes (session ID, protocol
//! version, cipher suite, master secret) so that a returning client
//! presenting a known session ID can resume without a full key agreement.
//!
//! The cache lives entirely inside one byte region supplied at construction
//! time. Space is recycled by evicting the least-recently-used entry, and
//! lookups stay logarithmic even against adversarial session IDs: entries
//! are indexed by a keyed MAC of the ID rather than the ID itself, so an
//! attacker who does not know the per-instance key cannot shape the search
//! tree.

pub mod cache;
mod lru;
mod mask;
mod store;
mod tree;

pub use cache::LruSessionCache;

use core::fmt;

use rescache_crypto::rand::SystemRandom;
use rescache_crypto::RandomSource;
use rescache_types::{CryptoError, HashAlgId};
use zeroize::Zeroize;

/// Session ID length in bytes. IDs are always exactly this long; shorter
/// wire IDs are padded or rejected by the TLS layer before reaching the
/// cache.
pub const SESSION_ID_LEN: usize = 32;

/// Master secret length in bytes.
pub const MASTER_SECRET_LEN: usize = 48;

/// Parameters of a completed handshake, as recorded for resumption.
///
/// The structure is transient at the cache boundary: `save` copies its
/// contents into the store, and `load` copies them back out.
#[derive(Clone)]
pub struct SessionParams {
    /// Session identifier presented by the client.
    pub session_id: [u8; SESSION_ID_LEN],
    /// Negotiated protocol version (wire value, e.g. 0x0303).
    pub version: u16,
    /// Negotiated cipher suite (wire value).
    pub cipher_suite: u16,
    /// Master secret derived during the handshake.
    pub master_secret: [u8; MASTER_SECRET_LEN],
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            session_id: [0u8; SESSION_ID_LEN],
            version: 0,
            cipher_suite: 0,
            master_secret: [0u8; MASTER_SECRET_LEN],
        }
    }
}

impl Drop for SessionParams {
    fn drop(&mut self) {
        self.master_secret.zeroize();
    }
}

impl fmt::Debug for SessionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionParams")
            .field("session_id", &self.session_id)
            .field("version", &format_args!("{:#06x}", self.version))
            .field("cipher_suite", &format_args!("{:#06x}", self.cipher_suite))
            .field("master_secret", &"<redacted>")
            .finish()
    }
}

/// The server-side collaborators a session cache may borrow.
///
/// The cache draws its indexing secret from the server's random generator
/// and builds its MAC on the server's preferred hash; it performs no other
/// cryptography.
pub trait ServerContext {
    /// Fill `out` with cryptographically strong random bytes.
    fn random_bytes(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;

    /// The hash primitive the server's random generator is built on.
    fn preferred_hash(&self) -> HashAlgId;
}

/// Server context backed by the operating system's entropy source.
pub struct SystemServerContext {
    rng: SystemRandom,
    hash: HashAlgId,
}

impl SystemServerContext {
    pub fn new(hash: HashAlgId) -> Self {
        Self {
            rng: SystemRandom::new(),
            hash,
        }
    }
}

impl Default for SystemServerContext {
    fn default() -> Self {
        Self::new(HashAlgId::Sha256)
    }
}

impl ServerContext for SystemServerContext {
    fn random_bytes(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        self.rng.random_bytes(out)
    }

    fn preferred_hash(&self) -> HashAlgId {
        self.hash
    }
}

/// Cache of completed-handshake parameters, keyed by session ID.
///
/// Implementations may apply any storage and eviction strategy. The default
/// implementation is [`LruSessionCache`].
pub trait SessionCache {
    /// Record a session. `params` is transient; its contents are copied.
    ///
    /// Failures (full store handled by eviction, tiny store, duplicate ID)
    /// are absorbed silently: a session that is not recorded merely costs a
    /// future full handshake.
    fn save(&mut self, server: &mut dyn ServerContext, params: &SessionParams);

    /// Look up the session whose ID is in `params.session_id`.
    ///
    /// On a hit, fills `version`, `cipher_suite`, and `master_secret` in
    /// `params` (the session ID is left untouched) and returns `true`.
    fn load(&mut self, server: &mut dyn ServerContext, params: &mut SessionParams) -> bool;
}
