//! Kind and subkind chains.
//!
//! A [`ChainIndex`] threads every live entity onto one doubly-linked chain
//! per key, using parallel arrays of links indexed by handle. Chains keep
//! insertion order, support O(1) append and unlink, and can be walked with
//! `first`/`next` cursors.
//!
//! Unlinking leaves the removed node's forward link in place, so a caller
//! that deletes the entity it is currently visiting can still step to its
//! successor. Deleting any *other* entity mid-walk is not supported by the
//! cursor; use [`ChainIndex::collect`] for that.

use std::hash::Hash;

use oly_foundation::BoxId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct ChainLink {
    next: BoxId,
    prev: BoxId,
    linked: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct ChainEnds {
    head: BoxId,
    tail: BoxId,
    len: usize,
}

/// Insertion-ordered chains of handles, one chain per key.
#[derive(Clone, Debug)]
pub struct ChainIndex<K>
where
    K: Hash + Eq + Clone,
{
    links: im::Vector<ChainLink>,
    ends: im::HashMap<K, ChainEnds>,
}

impl<K> Default for ChainIndex<K>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ChainIndex<K>
where
    K: Hash + Eq + Clone,
{
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            links: im::Vector::new(),
            ends: im::HashMap::new(),
        }
    }

    fn link(&self, id: BoxId) -> ChainLink {
        self.links.get(id.index()).copied().unwrap_or_default()
    }

    fn link_mut(&mut self, id: BoxId) -> &mut ChainLink {
        while self.links.len() <= id.index() {
            self.links.push_back(ChainLink::default());
        }
        &mut self.links[id.index()]
    }

    /// Returns true if `id` is currently on some chain.
    #[must_use]
    pub fn contains(&self, id: BoxId) -> bool {
        self.link(id).linked
    }

    /// Appends `id` to the tail of the chain for `key`.
    ///
    /// Does nothing if `id` is the sentinel or already linked.
    pub fn insert(&mut self, key: K, id: BoxId) {
        if id.is_none() || self.contains(id) {
            return;
        }
        let mut ends = self.ends.get(&key).copied().unwrap_or_default();
        let tail = ends.tail;

        *self.link_mut(id) = ChainLink {
            next: BoxId::NONE,
            prev: tail,
            linked: true,
        };
        if tail.is_none() {
            ends.head = id;
        } else {
            self.link_mut(tail).next = id;
        }
        ends.tail = id;
        ends.len += 1;
        self.ends.insert(key, ends);
    }

    /// Unlinks `id` from the chain for `key`.
    ///
    /// The removed node keeps its forward link so an in-progress cursor can
    /// continue past it.
    pub fn remove(&mut self, key: &K, id: BoxId) {
        let link = self.link(id);
        if !link.linked {
            return;
        }
        let mut ends = self.ends.get(key).copied().unwrap_or_default();

        if link.prev.is_none() {
            ends.head = link.next;
        } else {
            self.link_mut(link.prev).next = link.next;
        }
        if link.next.is_none() {
            ends.tail = link.prev;
        } else {
            self.link_mut(link.next).prev = link.prev;
        }
        ends.len = ends.len.saturating_sub(1);

        let node = self.link_mut(id);
        node.linked = false;
        node.prev = BoxId::NONE;

        if ends.len == 0 {
            self.ends.remove(key);
        } else {
            self.ends.insert(key.clone(), ends);
        }
    }

    /// Returns the first handle on the chain for `key`, or the sentinel.
    #[must_use]
    pub fn first(&self, key: &K) -> BoxId {
        self.ends.get(key).map_or(BoxId::NONE, |e| e.head)
    }

    /// Returns the handle after `id` on its chain, or the sentinel.
    #[must_use]
    pub fn next(&self, id: BoxId) -> BoxId {
        self.link(id).next
    }

    /// Returns the number of handles on the chain for `key`.
    #[must_use]
    pub fn len(&self, key: &K) -> usize {
        self.ends.get(key).map_or(0, |e| e.len)
    }

    /// Returns true if the chain for `key` is empty.
    #[must_use]
    pub fn is_empty(&self, key: &K) -> bool {
        self.len(key) == 0
    }

    /// Walks the chain for `key`.
    pub fn iter(&self, key: &K) -> ChainIter<'_, K> {
        ChainIter {
            index: self,
            cursor: self.first(key),
        }
    }

    /// Copies the chain for `key` into a vector, safe to hold across deletes.
    #[must_use]
    pub fn collect(&self, key: &K) -> Vec<BoxId> {
        self.iter(key).collect()
    }
}

/// Cursor over one chain of a [`ChainIndex`].
pub struct ChainIter<'a, K>
where
    K: Hash + Eq + Clone,
{
    index: &'a ChainIndex<K>,
    cursor: BoxId,
}

impl<K> Iterator for ChainIter<'_, K>
where
    K: Hash + Eq + Clone,
{
    type Item = BoxId;

    fn next(&mut self) -> Option<BoxId> {
        let current = self.cursor.to_option()?;
        self.cursor = self.index.next(current);
        Some(current)
    }
}
