//! In-place entry storage.
//!
//! Entries are concatenated in one byte region. "Addresses" are offsets into
//! the region, expressed over 32 bits, so a cache may span at most 4 GiB.
//! The region's alignment is never relied on: all multibyte fields are
//! assembled and split bytewise, big-endian.
//!
//! Entry format (100 bytes):
//!
//! | offset | length | field |
//! |-------:|-------:|-------|
//! |      0 |     32 | indexed key (MAC of the session ID) |
//! |     32 |     48 | master secret |
//! |     80 |      2 | protocol version |
//! |     82 |      2 | cipher suite |
//! |     84 |      4 | list prev |
//! |     88 |      4 | list next |
//! |     92 |      4 | tree left child |
//! |     96 |      4 | tree right child |

use crate::SESSION_ID_LEN;
use zeroize::Zeroize;

/// Size of one stored entry in bytes.
pub(crate) const ENTRY_LEN: u32 = 100;

/// The null address, marking the absence of a link.
pub(crate) const NULL_ADDR: u32 = u32::MAX;

pub(crate) const INDEXED_KEY_OFF: u32 = 0;
pub(crate) const MASTER_SECRET_OFF: u32 = 32;
pub(crate) const VERSION_OFF: u32 = 80;
pub(crate) const CIPHER_SUITE_OFF: u32 = 82;
const LIST_PREV_OFF: u32 = 84;
const LIST_NEXT_OFF: u32 = 88;
const TREE_LEFT_OFF: u32 = 92;
const TREE_RIGHT_OFF: u32 = 96;

/// Accessors for one 4-byte link field within an entry. The optional third
/// name exposes the absolute offset of the field itself, for link-slot
/// rewriting by the tree.
macro_rules! link_field {
    ($get:ident, $set:ident, $off:expr) => {
        pub(crate) fn $get(&self, entry: u32) -> u32 {
            self.get_u32(entry + $off)
        }

        pub(crate) fn $set(&mut self, entry: u32, addr: u32) {
            self.put_u32(entry + $off, addr);
        }
    };
    ($get:ident, $set:ident, $slot:ident, $off:expr) => {
        link_field!($get, $set, $off);

        pub(crate) fn $slot(&self, entry: u32) -> u32 {
            entry + $off
        }
    };
}

/// The backing byte region plus the append pointer.
///
/// Occupied slots are exactly `{0, 100, 200, ..., store_ptr - 100}`; the
/// pointer never decreases. Slots are recycled in place after eviction, so
/// an entry's address never moves while it is live.
pub(crate) struct EntryStore {
    buf: Vec<u8>,
    store_len: u32,
    store_ptr: u32,
}

impl EntryStore {
    /// Wrap a caller-supplied byte region. Bytes beyond 2^32 - 1 are
    /// unaddressable and stay unused.
    pub(crate) fn new(buf: Vec<u8>) -> Self {
        let store_len = buf.len().min(u32::MAX as usize) as u32;
        Self {
            buf,
            store_len,
            store_ptr: 0,
        }
    }

    /// Whether the region can hold at least one entry.
    pub(crate) fn is_usable(&self) -> bool {
        self.store_len >= ENTRY_LEN
    }

    /// Whether an entry can still be appended without evicting.
    pub(crate) fn has_room(&self) -> bool {
        self.store_ptr as u64 + ENTRY_LEN as u64 <= self.store_len as u64
    }

    /// Take the next free slot and advance the append pointer.
    /// The caller must have checked `has_room()`.
    pub(crate) fn allocate(&mut self) -> u32 {
        debug_assert!(self.has_room());
        let slot = self.store_ptr;
        self.store_ptr += ENTRY_LEN;
        slot
    }

    /// Number of occupied slots.
    pub(crate) fn entry_count(&self) -> u32 {
        self.store_ptr / ENTRY_LEN
    }

    /// Number of slots the region can ever hold.
    pub(crate) fn slot_capacity(&self) -> u32 {
        self.store_len / ENTRY_LEN
    }

    pub(crate) fn get_u16(&self, off: u32) -> u16 {
        let i = off as usize;
        u16::from_be_bytes([self.buf[i], self.buf[i + 1]])
    }

    pub(crate) fn put_u16(&mut self, off: u32, val: u16) {
        let i = off as usize;
        self.buf[i..i + 2].copy_from_slice(&val.to_be_bytes());
    }

    pub(crate) fn get_u32(&self, off: u32) -> u32 {
        let i = off as usize;
        u32::from_be_bytes([self.buf[i], self.buf[i + 1], self.buf[i + 2], self.buf[i + 3]])
    }

    pub(crate) fn put_u32(&mut self, off: u32, val: u32) {
        let i = off as usize;
        self.buf[i..i + 4].copy_from_slice(&val.to_be_bytes());
    }

    /// Copy `out.len()` bytes starting at `off` into `out`.
    pub(crate) fn read(&self, off: u32, out: &mut [u8]) {
        let i = off as usize;
        out.copy_from_slice(&self.buf[i..i + out.len()]);
    }

    /// Copy `data` into the region starting at `off`.
    pub(crate) fn write(&mut self, off: u32, data: &[u8]) {
        let i = off as usize;
        self.buf[i..i + data.len()].copy_from_slice(data);
    }

    /// The indexed key stored in the entry at `entry`.
    pub(crate) fn key_at(&self, entry: u32) -> &[u8] {
        let i = (entry + INDEXED_KEY_OFF) as usize;
        &self.buf[i..i + SESSION_ID_LEN]
    }

    link_field!(prev, set_prev, LIST_PREV_OFF);
    link_field!(next, set_next, LIST_NEXT_OFF);
    link_field!(left, set_left, left_slot, TREE_LEFT_OFF);
    link_field!(right, set_right, right_slot, TREE_RIGHT_OFF);
}

impl Drop for EntryStore {
    fn drop(&mut self) {
        // The region holds master secrets; scrub it when the cache retires.
        self.buf.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_round_trip_unaligned() {
        let mut store = EntryStore::new(vec![0u8; 64]);
        for off in [0u32, 1, 3, 17] {
            store.put_u16(off, 0xA1B2);
            assert_eq!(store.get_u16(off), 0xA1B2);
        }
    }

    #[test]
    fn test_u16_is_big_endian() {
        let mut store = EntryStore::new(vec![0u8; 4]);
        store.put_u16(1, 0x0303);
        let mut raw = [0u8; 2];
        store.read(1, &mut raw);
        assert_eq!(raw, [0x03, 0x03]);

        store.put_u16(1, 0xC02F);
        store.read(1, &mut raw);
        assert_eq!(raw, [0xC0, 0x2F]);
    }

    #[test]
    fn test_u32_is_big_endian() {
        let mut store = EntryStore::new(vec![0u8; 8]);
        store.put_u32(3, 0x01020304);
        let mut raw = [0u8; 4];
        store.read(3, &mut raw);
        assert_eq!(raw, [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(store.get_u32(3), 0x01020304);
    }

    #[test]
    fn test_span_read_write() {
        let mut store = EntryStore::new(vec![0u8; 200]);
        let data: Vec<u8> = (0u8..48).collect();
        store.write(MASTER_SECRET_OFF, &data);
        let mut out = vec![0u8; 48];
        store.read(MASTER_SECRET_OFF, &mut out);
        assert_eq!(out, data);
    }

    #[test]
    fn test_link_accessors() {
        let mut store = EntryStore::new(vec![0u8; 300]);
        let entry = 100;
        store.set_prev(entry, 0);
        store.set_next(entry, 200);
        store.set_left(entry, NULL_ADDR);
        store.set_right(entry, 200);

        assert_eq!(store.prev(entry), 0);
        assert_eq!(store.next(entry), 200);
        assert_eq!(store.left(entry), NULL_ADDR);
        assert_eq!(store.right(entry), 200);

        // Link slots are the absolute offsets of the fields
        assert_eq!(store.left_slot(entry), 192);
        assert_eq!(store.right_slot(entry), 196);
    }

    #[test]
    fn test_allocation_and_counts() {
        let mut store = EntryStore::new(vec![0u8; 250]);
        assert!(store.is_usable());
        assert_eq!(store.slot_capacity(), 2);
        assert_eq!(store.entry_count(), 0);

        assert!(store.has_room());
        assert_eq!(store.allocate(), 0);
        assert!(store.has_room());
        assert_eq!(store.allocate(), 100);
        // 50 trailing bytes cannot hold a third entry
        assert!(!store.has_room());
        assert_eq!(store.entry_count(), 2);
    }

    #[test]
    fn test_tiny_store_unusable() {
        for len in [0usize, 1, 50, 99] {
            let store = EntryStore::new(vec![0u8; len]);
            assert!(!store.is_usable());
            assert_eq!(store.slot_capacity(), 0);
        }
        assert!(EntryStore::new(vec![0u8; 100]).is_usable());
    }

    #[test]
    fn test_key_at() {
        let mut store = EntryStore::new(vec![0u8; 200]);
        let key = [0x5Au8; 32];
        store.write(100 + INDEXED_KEY_OFF, &key);
        assert_eq!(store.key_at(100), &key[..]);
    }
}
