//! Ordered binary tree over indexed keys.
//!
//! All left descendants of a node carry a lexicographically lower indexed
//! key, all right descendants a higher one. Balance is not maintained here;
//! it comes probabilistically from the keyed masking of session IDs.
//!
//! Operations are expressed in terms of link-slots: the locations that hold
//! an entry address and can be rewritten when the tree changes shape. A
//! link-slot is either a child field inside an entry or the root anchor.

use crate::store::{EntryStore, NULL_ADDR};
use crate::SESSION_ID_LEN;
use core::cmp::Ordering;

/// A rewritable location holding an entry address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkSlot {
    /// The root anchor.
    Root,
    /// A child field inside an entry, by absolute byte offset.
    Child(u32),
}

/// The tree index. Holds only the root anchor; node links live inside the
/// entries themselves.
pub(crate) struct Tree {
    root: u32,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self { root: NULL_ADDR }
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> u32 {
        self.root
    }

    fn read_slot(&self, store: &EntryStore, slot: LinkSlot) -> u32 {
        match slot {
            LinkSlot::Root => self.root,
            LinkSlot::Child(off) => store.get_u32(off),
        }
    }

    fn write_slot(&mut self, store: &mut EntryStore, slot: LinkSlot, addr: u32) {
        match slot {
            LinkSlot::Root => self.root = addr,
            LinkSlot::Child(off) => store.put_u32(off, addr),
        }
    }

    /// Find the entry with the given indexed key.
    ///
    /// Returns the entry address (or `NULL_ADDR` on a miss) together with
    /// the last followed link-slot: on a hit, the slot that points at the
    /// found entry; on a miss, the null-valued slot where an insertion
    /// would attach.
    pub(crate) fn find(&self, store: &EntryStore, key: &[u8; SESSION_ID_LEN]) -> (u32, LinkSlot) {
        let mut x = self.root;
        let mut slot = LinkSlot::Root;
        while x != NULL_ADDR {
            match key.as_slice().cmp(store.key_at(x)) {
                Ordering::Less => {
                    slot = LinkSlot::Child(store.left_slot(x));
                    x = store.left(x);
                }
                Ordering::Equal => return (x, slot),
                Ordering::Greater => {
                    slot = LinkSlot::Child(store.right_slot(x));
                    x = store.right(x);
                }
            }
        }
        (NULL_ADDR, slot)
    }

    /// Install the entry at `addr` as a leaf at the given link-slot.
    pub(crate) fn attach(&mut self, store: &mut EntryStore, slot: LinkSlot, addr: u32) {
        debug_assert_eq!(self.read_slot(store, slot), NULL_ADDR);
        self.write_slot(store, slot, addr);
        store.set_left(addr, NULL_ADDR);
        store.set_right(addr, NULL_ADDR);
    }

    /// Remove the entry at `addr` from the tree. The entry must be present.
    ///
    /// A node with two children is replaced by its in-order predecessor
    /// (the rightmost descendant of the left subtree), which adopts the
    /// removed node's children; a node with one child is replaced by that
    /// child. Every other entry stays reachable.
    pub(crate) fn unlink(&mut self, store: &mut EntryStore, addr: u32) {
        // Locate the incoming link-slot by re-running the descent.
        let mut key = [0u8; SESSION_ID_LEN];
        key.copy_from_slice(store.key_at(addr));
        let (found, incoming) = self.find(store, &key);
        debug_assert_eq!(found, addr);

        let left = store.left(addr);
        let right = store.right(addr);

        if left == NULL_ADDR {
            // Zero or one child: promote the other side (possibly null).
            self.write_slot(store, incoming, right);
            return;
        }
        if right == NULL_ADDR {
            self.write_slot(store, incoming, left);
            return;
        }

        // Two children: the replacement is the rightmost descendant of the
        // left subtree. It has no right child of its own.
        let mut parent = NULL_ADDR;
        let mut repl = left;
        while store.right(repl) != NULL_ADDR {
            parent = repl;
            repl = store.right(repl);
        }
        if parent != NULL_ADDR {
            // Detach the replacement; its left subtree takes its place.
            store.set_right(parent, store.left(repl));
            store.set_left(repl, left);
        }
        // If the replacement is the direct left child, it keeps its own
        // left subtree and only adopts the right side.
        store.set_right(repl, right);
        self.write_slot(store, incoming, repl);
    }
}
