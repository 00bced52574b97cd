//! I define the seeded content hash used to bucket terms and triples.
//!
//! The hash is XXH3-128.
//! It is not cryptographic, and collisions are expected:
//! no code may treat equal hashes as equal content.
use lazy_static::lazy_static;
use xxhash_rust::xxh3::{xxh3_128, Xxh3};

/// The configuration value from which the default [`HashSeed`] is derived.
pub const DEFAULT_SEED_CONFIG: &[u8] = b"lsup_hash_seed";

lazy_static! {
    static ref DEFAULT_SEED: HashSeed = HashSeed::from_config(DEFAULT_SEED_CONFIG);
}

/// A 128-bit digest produced by a [`ContentHasher`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ContentHash(pub u128);

impl ContentHash {
    /// The low 64 bits of this digest, used as a bucket hash.
    #[inline]
    pub fn bucket(self) -> u64 {
        self.0 as u64
    }

    /// The little-endian bytes of this digest.
    #[inline]
    pub fn to_le_bytes(self) -> [u8; 16] {
        self.0.to_le_bytes()
    }
}

/// The pair of seeds keying a [`ContentHasher`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct HashSeed {
    /// Seed of the hash state.
    pub s0: u64,
    /// Key absorbed before any data.
    pub s1: u64,
}

impl HashSeed {
    /// Derive a seed pair from an arbitrary configuration value.
    pub fn from_config(config: &[u8]) -> Self {
        let h = xxh3_128(config);
        HashSeed {
            s0: h as u64,
            s1: (h >> 64) as u64,
        }
    }
}

/// The seed derived from [`DEFAULT_SEED_CONFIG`], computed once per process.
impl Default for HashSeed {
    fn default() -> Self {
        *DEFAULT_SEED
    }
}

/// Computes [`ContentHash`]es of byte strings under a fixed [`HashSeed`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ContentHasher {
    seed: HashSeed,
}

impl ContentHasher {
    /// Build a hasher keyed by `seed`.
    pub fn new(seed: HashSeed) -> Self {
        ContentHasher { seed }
    }

    /// The seed of this hasher.
    pub fn seed(&self) -> HashSeed {
        self.seed
    }

    /// Hash `data`.
    pub fn content_hash(&self, data: &[u8]) -> ContentHash {
        let mut state = Xxh3::with_seed(self.seed.s0);
        state.update(&self.seed.s1.to_le_bytes());
        state.update(data);
        ContentHash(state.digest128())
    }

    /// Hash the concatenation of several byte strings,
    /// without materializing it.
    pub fn content_hash_parts<'a, I>(&self, parts: I) -> ContentHash
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut state = Xxh3::with_seed(self.seed.s0);
        state.update(&self.seed.s1.to_le_bytes());
        for part in parts {
            state.update(part);
        }
        ContentHash(state.digest128())
    }
}
