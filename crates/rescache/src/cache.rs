//! The LRU session cache.
//!
//! Two structures share the backing region: a recency list for eviction
//! order and a search tree for lookup. Every mutation must leave both
//! consistent; the save and load paths below touch them in lockstep.

use core::fmt;

use crate::lru::LruList;
use crate::mask::KeyMasker;
use crate::store::{
    EntryStore, CIPHER_SUITE_OFF, ENTRY_LEN, INDEXED_KEY_OFF, MASTER_SECRET_OFF, NULL_ADDR,
    VERSION_OFF,
};
use crate::tree::Tree;
use crate::{ServerContext, SessionCache, SessionParams};

/// Bounded session cache with LRU eviction and tree-indexed lookup.
///
/// The cache lives inside the byte region supplied to [`new`](Self::new);
/// each entry occupies exactly 100 bytes, so a region of `n * 100` bytes
/// holds `n` sessions. Regions too small for a single entry produce a cache
/// that silently stores nothing.
///
/// On the first save, the cache draws a 32-byte indexing secret from the
/// server's random generator and adopts the server's preferred hash for the
/// lifetime of the instance.
pub struct LruSessionCache {
    store: EntryStore,
    list: LruList,
    tree: Tree,
    masker: Option<KeyMasker>,
}

impl LruSessionCache {
    /// Create a cache over a caller-supplied byte region.
    ///
    /// The region's contents are taken over as scratch space and zeroized
    /// when the cache is dropped.
    pub fn new(store: Vec<u8>) -> Self {
        Self {
            store: EntryStore::new(store),
            list: LruList::new(),
            tree: Tree::new(),
            masker: None,
        }
    }

    /// Create a cache with room for `entries` sessions.
    pub fn with_capacity(entries: usize) -> Self {
        Self::new(vec![0u8; entries.saturating_mul(ENTRY_LEN as usize)])
    }

    /// Number of sessions currently stored.
    pub fn len(&self) -> usize {
        self.store.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sessions the region can hold.
    pub fn capacity(&self) -> usize {
        self.store.slot_capacity() as usize
    }

    /// Record a session.
    ///
    /// Silently does nothing when the region cannot hold an entry, when
    /// the randomness draw for first-time initialization fails (a later
    /// save retries), or when the session's indexed key is already present
    /// (the stored parameters are kept and its recency is unchanged).
    pub fn save(&mut self, server: &mut dyn ServerContext, params: &SessionParams) {
        if !self.store.is_usable() {
            return;
        }

        // First save on this instance: fix the indexing secret and hash.
        if self.masker.is_none() {
            match KeyMasker::init(server) {
                Ok(masker) => self.masker = Some(masker),
                Err(_) => return,
            }
        }
        let Some(masker) = self.masker.as_ref() else {
            return;
        };
        let Ok(key) = masker.mask(&params.session_id) else {
            return;
        };

        // Indexed-key collision: the session is treated as already cached.
        // The attach point is NOT recorded by this lookup; an eviction
        // below may restructure the tree and invalidate it.
        let (existing, _) = self.tree.find(&self.store, &key);
        if existing != NULL_ADDR {
            return;
        }

        let slot = if self.store.has_room() {
            self.store.allocate()
        } else {
            // The region holds at least one entry, so the tail exists. The
            // evicted slot may simultaneously be the list head when the
            // region holds exactly one entry.
            let victim = self.list.evict_tail(&mut self.store);
            self.tree.unlink(&mut self.store, victim);
            victim
        };

        // The tree's shape is final now; look up where the entry attaches.
        let (_, link) = self.tree.find(&self.store, &key);
        self.tree.attach(&mut self.store, link, slot);
        self.list.push_front(&mut self.store, slot);

        self.store.write(slot + INDEXED_KEY_OFF, &key);
        self.store.write(slot + MASTER_SECRET_OFF, &params.master_secret);
        self.store.put_u16(slot + VERSION_OFF, params.version);
        self.store.put_u16(slot + CIPHER_SUITE_OFF, params.cipher_suite);
    }

    /// Look up the session whose ID is in `params.session_id`.
    ///
    /// On a hit, fills in `version`, `cipher_suite`, and `master_secret`,
    /// promotes the entry to most-recently-used, and returns `true`. The
    /// session ID itself is left untouched. Before the first successful
    /// save, every lookup misses.
    pub fn load(&mut self, params: &mut SessionParams) -> bool {
        let Some(masker) = self.masker.as_ref() else {
            return false;
        };
        let Ok(key) = masker.mask(&params.session_id) else {
            return false;
        };
        let (addr, _) = self.tree.find(&self.store, &key);
        if addr == NULL_ADDR {
            return false;
        }

        params.version = self.store.get_u16(addr + VERSION_OFF);
        params.cipher_suite = self.store.get_u16(addr + CIPHER_SUITE_OFF);
        self.store
            .read(addr + MASTER_SECRET_OFF, &mut params.master_secret);

        self.list.move_to_front(&mut self.store, addr);
        true
    }
}

impl SessionCache for LruSessionCache {
    fn save(&mut self, server: &mut dyn ServerContext, params: &SessionParams) {
        LruSessionCache::save(self, server, params);
    }

    fn load(&mut self, _server: &mut dyn ServerContext, params: &mut SessionParams) -> bool {
        LruSessionCache::load(self, params)
    }
}

impl fmt::Debug for LruSessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruSessionCache")
            .field("entries", &self.len())
            .field("capacity", &self.capacity())
            .field("initialized", &self.masker.is_some())
            .finish_non_exhaustive()
    }
}
