//! KeyedTable: hash index over borrowed items with derived, cached keys.

use crate::reentrancy::ReentryCheck;
use core::fmt;
use core::hash::BuildHasher;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Wrapper record for one stored item. The key aliases storage reachable
/// from the item; the hash is precomputed so neither the identification
/// function nor the hasher runs again for this entry after insertion.
struct Record<'it, T: ?Sized> {
    item: &'it T,
    key: &'it str,
    hash: u64,
}

/// A hash table over caller-owned items. Keys are not supplied by the
/// caller at insertion; the table derives them with the identification
/// function it was constructed with, caches them, and indexes by byte-exact
/// key content. The table never copies, allocates, or drops items or key
/// bytes, only its own records.
pub struct KeyedTable<'it, T: ?Sized, F, S = RandomState> {
    hasher: S,
    identify: F,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Record<'it, T>>, // record storage, generational keys
    reentry: ReentryCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// An item with a byte-equal derived key is already stored. The table
    /// is unchanged; the earlier entry is retained.
    DuplicateKey,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => f.write_str("an item with this derived key is already stored"),
        }
    }
}

impl std::error::Error for InsertError {}

impl<'it, T: ?Sized, F> KeyedTable<'it, T, F>
where
    F: Fn(&T) -> &str,
{
    /// Create an empty table bound to `identify` for the rest of its life.
    pub fn new(identify: F) -> Self {
        Self::with_capacity_and_hasher(identify, 0, RandomState::new())
    }

    /// Like [`new`](Self::new), pre-sizing the index and record store for
    /// roughly `capacity` items. A hint only; the table grows past it.
    pub fn with_capacity(identify: F, capacity: usize) -> Self {
        Self::with_capacity_and_hasher(identify, capacity, RandomState::new())
    }
}

impl<'it, T: ?Sized, F, S> KeyedTable<'it, T, F, S>
where
    F: Fn(&T) -> &str,
    S: BuildHasher,
{
    pub fn with_hasher(identify: F, hasher: S) -> Self {
        Self::with_capacity_and_hasher(identify, 0, hasher)
    }

    pub fn with_capacity_and_hasher(identify: F, capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            identify,
            index: HashTable::with_capacity(capacity),
            slots: SlotMap::with_capacity_and_key(capacity),
            reentry: ReentryCheck::new(),
        }
    }

    // Single probing path shared by get/contains_key/insert-precheck. Does
    // not claim the reentry ticket; callers do.
    fn find_slot(&self, key: &str) -> Option<DefaultKey> {
        let hash = self.hasher.hash_one(key);
        self.index
            .find(hash, |&slot| {
                self.slots
                    .get(slot)
                    .map(|r| r.key == key)
                    .unwrap_or(false)
            })
            .copied()
    }

    /// Derive the item's key, cache it, and store the item under it.
    ///
    /// Returns the same reference back on success, so inserts can be
    /// chained. Fails with [`InsertError::DuplicateKey`] if a byte-equal
    /// key is already present, leaving both the table and the earlier
    /// entry untouched.
    pub fn insert(&mut self, item: &'it T) -> Result<&'it T, InsertError> {
        let _t = self.reentry.claim();
        let key = (self.identify)(item);
        let hash = self.hasher.hash_one(key);
        match self.index.entry(
            hash,
            |&slot| {
                self.slots
                    .get(slot)
                    .map(|r| r.key == key)
                    .unwrap_or(false)
            },
            |&slot| self.slots.get(slot).map(|r| r.hash).unwrap_or(0),
        ) {
            hashbrown::hash_table::Entry::Occupied(_) => Err(InsertError::DuplicateKey),
            hashbrown::hash_table::Entry::Vacant(vacant) => {
                let slot = self.slots.insert(Record { item, key, hash });
                let _ = vacant.insert(slot);
                Ok(item)
            }
        }
    }

    /// Look up an item by byte-exact key content. Two distinct key buffers
    /// with identical bytes match.
    pub fn get(&self, key: &str) -> Option<&'it T> {
        let _t = self.reentry.claim();
        let slot = self.find_slot(key)?;
        self.slots.get(slot).map(|r| r.item)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let _t = self.reentry.claim();
        self.find_slot(key).is_some()
    }

    /// Remove the entry stored under `key`, returning the item it wrapped.
    /// Absent keys are a no-op returning `None`; the item itself is never
    /// dropped, only the table's record.
    pub fn remove(&mut self, key: &str) -> Option<&'it T> {
        let _t = self.reentry.claim();
        let hash = self.hasher.hash_one(key);
        let occupied = self
            .index
            .find_entry(hash, |&slot| {
                self.slots
                    .get(slot)
                    .map(|r| r.key == key)
                    .unwrap_or(false)
            })
            .ok()?;
        let (slot, _) = occupied.remove();
        let record = self.slots.remove(slot)?;
        Some(record.item)
    }
}

impl<'it, T: ?Sized, F, S> KeyedTable<'it, T, F, S> {
    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Visit every stored `(key, item)` pair. Order is unspecified and must
    /// not be relied upon. Mutating the table during iteration is rejected
    /// by the borrow checker; traversal context lives in the caller's
    /// closure state.
    pub fn iter(&self) -> Iter<'_, 'it, T> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<'it, T: ?Sized + fmt::Debug, F, S> fmt::Debug for KeyedTable<'it, T, F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(key, item)` pairs of a [`KeyedTable`].
pub struct Iter<'t, 'it, T: ?Sized> {
    it: slotmap::basic::Iter<'t, DefaultKey, Record<'it, T>>,
}

impl<'t, 'it, T: ?Sized> Iterator for Iter<'t, 'it, T> {
    type Item = (&'it str, &'it T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_slot, r)| (r.key, r.item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'t, 'it, T: ?Sized> ExactSizeIterator for Iter<'t, 'it, T> {}
impl<'t, 'it, T: ?Sized> core::iter::FusedIterator for Iter<'t, 'it, T> {}

impl<'t, 'it, T: ?Sized, F, S> IntoIterator for &'t KeyedTable<'it, T, F, S> {
    type Item = (&'it str, &'it T);
    type IntoIter = Iter<'t, 'it, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
