//! A [`TermBuffers`] interns the encodings of terms, and associates them with short numeric [indices](`Index`).
//!
//! Buffers are bucketed by their [content hash](ContentHash),
//! and compared byte-for-byte on hash equality.
//! A buffer stays in its [`TermBuffers`] until the whole structure is dropped,
//! even if no triple refers to it anymore.
use std::fmt::Debug;
use std::hash::Hash;

use lsup_api::codec;
use lsup_api::graph::{GraphError, GraphResult};
use lsup_api::hash::{ContentHash, ContentHasher};
use lsup_api::term::Term;
use thiserror::Error;

use crate::hashset::{HashEq, RawSet};

/// Abstraction of the short numeric indices representing terms in a [`TermBuffers`].
pub trait Index: Copy + Debug + Default + Eq + Hash + Ord {
    /// The number of distinct values of this type,
    /// i.e. the maximum number of terms in a [`TermBuffers`] using it.
    const CAPACITY: usize;

    /// `None` if `other` does not fit in this type.
    fn try_from_usize(other: usize) -> Option<Self>;
    fn into_usize(self) -> usize;
}

impl Index for usize {
    const CAPACITY: usize = usize::MAX;

    fn try_from_usize(other: usize) -> Option<Self> {
        Some(other)
    }
    fn into_usize(self) -> usize {
        self
    }
}

impl Index for u32 {
    const CAPACITY: usize = (u32::MAX as usize).saturating_add(1);

    fn try_from_usize(other: usize) -> Option<Self> {
        other.try_into().ok()
    }
    fn into_usize(self) -> usize {
        self as usize
    }
}

impl Index for u16 {
    const CAPACITY: usize = u16::MAX as usize + 1;

    fn try_from_usize(other: usize) -> Option<Self> {
        other.try_into().ok()
    }
    fn into_usize(self) -> usize {
        self as usize
    }
}

/// A [`TermBuffers`] is full.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("Term buffers are full: at most {capacity} distinct terms")]
pub struct CapacityError {
    /// The maximum number of distinct terms.
    pub capacity: usize,
}

impl From<CapacityError> for GraphError {
    fn from(e: CapacityError) -> Self {
        GraphError::Capacity(e.capacity)
    }
}

#[derive(Clone, Debug)]
struct Buffer {
    hash: ContentHash,
    data: Box<[u8]>,
}

#[derive(Clone, Debug, Default)]
struct Buffers(Vec<Buffer>);

// indices are unique per buffer, so equal indices are equal buffers
impl<I: Index> HashEq<I> for Buffers {
    fn hash(&self, i: &I) -> u64 {
        self.0[i.into_usize()].hash.bucket()
    }
    fn eq(&self, a: &I, b: &I) -> bool {
        a == b
    }
}

/// A bidirectional association of term encodings with short numeric [indices](`Index`).
#[derive(Clone, Debug)]
pub struct TermBuffers<I: Index> {
    hasher: ContentHasher,
    buffers: Buffers,
    index: RawSet<I>,
}

impl<I: Index> TermBuffers<I> {
    pub fn new(hasher: ContentHasher) -> Self {
        Self::with_capacity(hasher, 0)
    }

    pub fn with_capacity(hasher: ContentHasher, capacity: usize) -> Self {
        TermBuffers {
            hasher,
            buffers: Buffers(Vec::with_capacity(capacity)),
            index: RawSet::with_capacity(capacity),
        }
    }

    /// The hasher used to bucket buffers.
    pub fn hasher(&self) -> ContentHasher {
        self.hasher
    }

    /// The number of distinct buffers.
    pub fn len(&self) -> usize {
        self.buffers.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the index of buffer `data`, if it exists.
    pub fn get_index(&self, data: &[u8]) -> Option<I> {
        self.get_index_hashed(self.hasher.content_hash(data), data)
    }

    /// Get the index of buffer `data`, whose hash is `hash`, if it exists.
    pub fn get_index_hashed(&self, hash: ContentHash, data: &[u8]) -> Option<I> {
        let buffers = &self.buffers.0;
        self.index
            .find(hash.bucket(), |i| {
                let b = &buffers[i.into_usize()];
                b.hash == hash && *b.data == *data
            })
            .copied()
    }

    /// Get the index of buffer `data`, copying it in if necessary.
    ///
    /// Fails if `data` is new and this [`TermBuffers`] is full.
    pub fn ensure_index(&mut self, data: &[u8]) -> Result<I, CapacityError> {
        self.ensure_index_hashed(self.hasher.content_hash(data), data)
    }

    /// Get the index of buffer `data`, whose hash is `hash`, copying it in if necessary.
    pub fn ensure_index_hashed(
        &mut self,
        hash: ContentHash,
        data: &[u8],
    ) -> Result<I, CapacityError> {
        if let Some(i) = self.get_index_hashed(hash, data) {
            return Ok(i);
        }
        let i = I::try_from_usize(self.buffers.0.len()).ok_or(CapacityError {
            capacity: I::CAPACITY,
        })?;
        self.buffers.0.push(Buffer {
            hash,
            data: data.into(),
        });
        self.index.insert_unique(&self.buffers, hash.bucket(), i);
        Ok(i)
    }

    /// The number of buffers that can still be added.
    pub fn room(&self) -> usize {
        I::CAPACITY - self.len()
    }

    /// Get the index of the encoding of `t`, if it exists.
    pub fn get_term_index(&self, t: &Term) -> Result<Option<I>, codec::CodecError> {
        Ok(self.get_index(&codec::serialize(t)?))
    }

    /// Get the index of the encoding of `t`, adding it if necessary.
    pub fn ensure_term_index(&mut self, t: &Term) -> GraphResult<I> {
        Ok(self.ensure_index(&codec::serialize(t)?)?)
    }

    /// The buffer at index `i`.
    ///
    /// # Precondition
    /// `i` must have been returned by this [`TermBuffers`],
    /// otherwise this method may panic.
    pub fn data(&self, i: I) -> &[u8] {
        &self.buffers.0[i.into_usize()].data
    }

    /// The content hash of the buffer at index `i`.
    pub fn hash(&self, i: I) -> ContentHash {
        self.buffers.0[i.into_usize()].hash
    }

    /// Decode the buffer at index `i`.
    pub fn get_term(&self, i: I) -> Result<Term, codec::CodecError> {
        codec::deserialize(self.data(i))
    }

    /// The hash that this [`TermBuffers`] would give to buffer `i` of `other`.
    fn foreign_hash(&self, other: &Self, i: I) -> ContentHash {
        if self.hasher == other.hasher {
            other.hash(i)
        } else {
            self.hasher.content_hash(other.data(i))
        }
    }

    /// Get the index of buffer `i` of `other` in this [`TermBuffers`], if it exists.
    pub fn find_foreign(&self, other: &Self, i: I) -> Option<I> {
        self.get_index_hashed(self.foreign_hash(other, i), other.data(i))
    }

    /// Get the index of buffer `i` of `other` in this [`TermBuffers`], copying it in if necessary.
    pub fn import(&mut self, other: &Self, i: I) -> Result<I, CapacityError> {
        let hash = self.foreign_hash(other, i);
        self.ensure_index_hashed(hash, other.data(i))
    }
}
