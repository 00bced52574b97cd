//! Defines the options for configuring in-memory sets.

use crate::hash::{ContentHasher, HashSeed};

/// Options of an in-memory triple set.
///
/// ```
/// # use lsup_api::options::SetOptions;
/// # use lsup_api::hash::HashSeed;
/// let options = SetOptions::new()
///     .with_seed(HashSeed::from_config(b"my app"))
///     .with_capacity(1024);
/// assert_eq!(options.capacity(), 1024);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetOptions {
    seed: HashSeed,
    capacity: usize,
}

impl SetOptions {
    /// Build the default options:
    /// [default seed](HashSeed::default), no pre-allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key the content hash with `seed`.
    pub fn with_seed(mut self, seed: HashSeed) -> Self {
        self.seed = seed;
        self
    }

    /// Pre-allocate room for `capacity` triples.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// The seed of the content hash.
    pub fn seed(&self) -> HashSeed {
        self.seed
    }

    /// The number of triples to pre-allocate room for.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// A content hasher keyed with [`seed`](SetOptions::seed).
    pub fn hasher(&self) -> ContentHasher {
        ContentHasher::new(self.seed)
    }
}
