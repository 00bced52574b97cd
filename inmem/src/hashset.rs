//! A [`RawSet`] is a hash set whose hashing and equality logic is supplied by the caller.
//!
//! The logic is a [`HashEq`] capability, passed on every call rather than stored,
//! so that it can borrow data owned next to the set
//! (e.g. the buffers that the stored handles point to).
//! Callers must pass an equivalent capability on every call to the same set.
use hashbrown::hash_table::{Entry, HashTable, Iter};

/// Hashing and equality logic for the items of a [`RawSet`].
///
/// `eq(a, b)` must imply `hash(a) == hash(b)`.
/// The converse is never assumed: equal hashes always fall back to `eq`.
pub trait HashEq<T: ?Sized> {
    /// The bucket hash of `item`.
    fn hash(&self, item: &T) -> u64;
    /// Whether `a` and `b` are the same item.
    fn eq(&self, a: &T, b: &T) -> bool;
}

/// A deduplicated set of `T`, hashed and compared by a [`HashEq`] capability.
#[derive(Clone, Debug)]
pub struct RawSet<T> {
    table: HashTable<T>,
}

impl<T> Default for RawSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RawSet<T> {
    /// An empty set.
    pub fn new() -> Self {
        RawSet {
            table: HashTable::new(),
        }
    }

    /// An empty set with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        RawSet {
            table: HashTable::with_capacity(capacity),
        }
    }

    /// The number of items in this set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether this set has no item.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate over the items of this set, in arbitrary order.
    ///
    /// The order only depends on the sequence of operations applied to the set
    /// and on the hashes of the items.
    pub fn iter(&self) -> Iter<'_, T> {
        self.table.iter()
    }

    /// Remove all items.
    pub fn clear(&mut self) {
        self.table.clear()
    }

    /// Make room for `additional` more items.
    pub fn reserve<C: HashEq<T>>(&mut self, cap: &C, additional: usize) {
        self.table.reserve(additional, |x| cap.hash(x))
    }

    /// Insert `item`; return false (and drop `item`) if an equal item is present.
    pub fn insert<C: HashEq<T>>(&mut self, cap: &C, item: T) -> bool {
        let hash = cap.hash(&item);
        match self
            .table
            .entry(hash, |x| cap.eq(x, &item), |x| cap.hash(x))
        {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                e.insert(item);
                true
            }
        }
    }

    /// Insert `item`, whose hash is `hash`, without checking for an equal item.
    ///
    /// # Precondition
    /// No item equal to `item` may be in the set.
    pub fn insert_unique<C: HashEq<T>>(&mut self, cap: &C, hash: u64, item: T) {
        debug_assert_eq!(hash, cap.hash(&item));
        self.table.insert_unique(hash, item, |x| cap.hash(x));
    }

    /// The item with hash `hash` for which `is_match` returns true, if any.
    pub fn find(&self, hash: u64, is_match: impl FnMut(&T) -> bool) -> Option<&T> {
        self.table.find(hash, is_match)
    }

    /// Whether an item equal to `item` is present.
    pub fn contains<C: HashEq<T>>(&self, cap: &C, item: &T) -> bool {
        self.table
            .find(cap.hash(item), |x| cap.eq(x, item))
            .is_some()
    }

    /// Remove and return the item equal to `item`, if any.
    pub fn remove<C: HashEq<T>>(&mut self, cap: &C, item: &T) -> Option<T> {
        match self.table.find_entry(cap.hash(item), |x| cap.eq(x, item)) {
            Ok(e) => Some(e.remove().0),
            Err(_) => None,
        }
    }

    /// Keep only the items for which `keep` returns true;
    /// return the number of removed items.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.table.len();
        self.table.retain(|x| keep(&*x));
        before - self.table.len()
    }
}

impl<'a, T> IntoIterator for &'a RawSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
