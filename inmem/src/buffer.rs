//! A [`BufferSet`] is a deduplicated set of triples of term buffers.
//!
//! It is the raw storage under [`GenericSimpleGraph`](crate::graph::GenericSimpleGraph):
//! it knows about encodings, content hashes and indices, but not about terms.
//! A [`BufferSet`] can be filled directly with encoded terms
//! (e.g. read from a store)
//! and then adopted by a graph without copying
//! (see [`GenericSimpleGraph::from_set`](crate::graph::GenericSimpleGraph::from_set)).
use lsup_api::codec::{self, CodecError};
use lsup_api::hash::{ContentHash, ContentHasher};
use lsup_api::matcher::{Matcher, Pattern, TermPattern};
use lsup_api::options::SetOptions;
use lsup_api::term::{Term, Triple};

use crate::hashset::{HashEq, RawSet};
use crate::index::{CapacityError, Index, TermBuffers};

/// A triple of buffer indices, with its content hash.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BufferTriple<I> {
    ids: [I; 3],
    hash: ContentHash,
}

struct TripleHashEq;

impl<I: Index> HashEq<BufferTriple<I>> for TripleHashEq {
    fn hash(&self, t: &BufferTriple<I>) -> u64 {
        t.hash.bucket()
    }
    fn eq(&self, a: &BufferTriple<I>, b: &BufferTriple<I>) -> bool {
        a.hash == b.hash && a.ids == b.ids
    }
}

/// A set of triples of term buffers.
///
/// It holds at most [`I::CAPACITY`](Index::CAPACITY) distinct term buffers.
/// Operations that may add buffers fail with [`CapacityError`] beyond that;
/// in-place operations check it before modifying the set.
#[derive(Clone, Debug)]
pub struct BufferSet<I: Index = u32> {
    terms: TermBuffers<I>,
    triples: RawSet<BufferTriple<I>>,
}

impl<I: Index> Default for BufferSet<I> {
    fn default() -> Self {
        Self::new(SetOptions::default())
    }
}

impl<I: Index> BufferSet<I> {
    pub fn new(options: SetOptions) -> Self {
        BufferSet {
            terms: TermBuffers::with_capacity(options.hasher(), options.capacity()),
            triples: RawSet::with_capacity(options.capacity()),
        }
    }

    /// A new empty set, with the same hasher as this one.
    pub fn empty_like(&self) -> Self {
        self.empty_with_capacity(0)
    }

    fn empty_with_capacity(&self, capacity: usize) -> Self {
        BufferSet {
            terms: TermBuffers::with_capacity(self.terms.hasher(), capacity),
            triples: RawSet::with_capacity(capacity),
        }
    }

    pub fn hasher(&self) -> ContentHasher {
        self.terms.hasher()
    }

    /// The term buffers referred to by the triples of this set.
    pub fn terms(&self) -> &TermBuffers<I> {
        &self.terms
    }

    /// The number of triples in this set.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Remove all triples.
    ///
    /// Term buffers are kept.
    pub fn clear(&mut self) {
        self.triples.clear()
    }

    fn triple_hash(&self, ids: &[I; 3]) -> ContentHash {
        let hashes = ids.map(|i| self.terms.hash(i).to_le_bytes());
        self.terms
            .hasher()
            .content_hash_parts(hashes.iter().map(|h| &h[..]))
    }

    /// Get the index of buffer `data`, copying it in if necessary.
    pub fn ensure_buffer(&mut self, data: &[u8]) -> Result<I, CapacityError> {
        self.terms.ensure_index(data)
    }

    /// Get the indices of three buffers, copying them in if necessary.
    pub fn ensure_buffers(&mut self, spo: [&[u8]; 3]) -> Result<[I; 3], CapacityError> {
        Ok([
            self.terms.ensure_index(spo[0])?,
            self.terms.ensure_index(spo[1])?,
            self.terms.ensure_index(spo[2])?,
        ])
    }

    /// Insert the triple made of the three given term encodings.
    ///
    /// Return false if it was already present.
    pub fn insert_buffers(&mut self, spo: [&[u8]; 3]) -> Result<bool, CapacityError> {
        let ids = self.ensure_buffers(spo)?;
        Ok(self.insert_indices(ids))
    }

    /// Insert a triple of indices, all returned by [`terms`](BufferSet::terms).
    pub fn insert_indices(&mut self, ids: [I; 3]) -> bool {
        let hash = self.triple_hash(&ids);
        self.triples.insert(&TripleHashEq, BufferTriple { ids, hash })
    }

    pub fn contains_indices(&self, ids: [I; 3]) -> bool {
        let hash = self.triple_hash(&ids);
        self.triples.contains(&TripleHashEq, &BufferTriple { ids, hash })
    }

    pub fn remove_indices(&mut self, ids: [I; 3]) -> bool {
        let hash = self.triple_hash(&ids);
        self.triples
            .remove(&TripleHashEq, &BufferTriple { ids, hash })
            .is_some()
    }

    /// Iterate over the triples of this set, as indices.
    pub fn indices(&self) -> impl Iterator<Item = [I; 3]> + '_ {
        self.triples.iter().map(|t| t.ids)
    }

    /// Iterate over the triples of this set matching `m`.
    pub fn matching(&self, m: Matcher<I>) -> Box<dyn Iterator<Item = [I; 3]> + '_> {
        match m.exact() {
            Some(ids) => {
                let ids = *ids;
                Box::new(self.contains_indices(ids).then_some(ids).into_iter())
            }
            None => Box::new(self.indices().filter(move |t| m.matches(t))),
        }
    }

    /// Remove the triples matching `m`, and return how many were removed.
    pub fn remove_matching(&mut self, m: Matcher<I>) -> usize {
        match m.exact() {
            Some(ids) => usize::from(self.remove_indices(*ids)),
            None => self.triples.retain(|t| !m.matches(&t.ids)),
        }
    }

    /// Remove the triples not matching `m`, and return how many were removed.
    pub fn retain_matching(&mut self, m: Matcher<I>) -> usize {
        self.triples.retain(|t| m.matches(&t.ids))
    }

    /// Translate `pattern` into indices of this set.
    ///
    /// Return `None` if a bound term is absent,
    /// in which case no triple of this set can match.
    pub fn index_pattern(&self, pattern: TermPattern) -> Result<Option<Pattern<I>>, CodecError> {
        let mut ret = [None; 3];
        for (i, t) in ret.iter_mut().zip(pattern) {
            if let Some(t) = t {
                match self.terms.get_term_index(t)? {
                    None => return Ok(None),
                    Some(idx) => *i = Some(idx),
                }
            }
        }
        Ok(Some(ret))
    }

    /// Decode a triple of indices.
    pub fn get_triple(&self, ids: [I; 3]) -> Result<Triple, CodecError> {
        Ok([
            self.terms.get_term(ids[0])?,
            self.terms.get_term(ids[1])?,
            self.terms.get_term(ids[2])?,
        ])
    }

    /// Copy the triple `ids` of `other` into this set.
    pub fn import(&mut self, other: &Self, ids: [I; 3]) -> Result<bool, CapacityError> {
        let ids = [
            self.terms.import(&other.terms, ids[0])?,
            self.terms.import(&other.terms, ids[1])?,
            self.terms.import(&other.terms, ids[2])?,
        ];
        Ok(self.insert_indices(ids))
    }

    /// Whether the triple `ids`, whose buffers are in `src`, is in this set.
    fn holds(&self, src: &TermBuffers<I>, ids: &[I; 3]) -> bool {
        let mut local = [I::default(); 3];
        for (l, i) in local.iter_mut().zip(ids) {
            match self.terms.find_foreign(src, *i) {
                Some(j) => *l = j,
                None => return false,
            }
        }
        self.contains_indices(local)
    }

    /// Whether every triple of this set is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.triples.iter().all(|t| other.holds(&self.terms, &t.ids))
    }

    fn import_all(&mut self, other: &Self) -> Result<(), CapacityError> {
        for t in other.triples.iter() {
            self.import(other, t.ids)?;
        }
        Ok(())
    }

    /// Check that every buffer of `other` used by its triples fits in this set.
    ///
    /// Buffers already present need no room.
    fn check_room(&self, other: &Self) -> Result<(), CapacityError> {
        if other.terms.len() <= self.terms.room() {
            return Ok(());
        }
        let mut used: Vec<I> = other.indices().flatten().collect();
        used.sort_unstable();
        used.dedup();
        let missing = used
            .into_iter()
            .filter(|i| self.terms.find_foreign(&other.terms, *i).is_none())
            .count();
        if missing > self.terms.room() {
            return Err(CapacityError {
                capacity: I::CAPACITY,
            });
        }
        Ok(())
    }

    /// A new set with the triples of this set for which `keep` holds.
    ///
    /// Only the buffers of this set are copied, so this fails only if this set is
    /// itself over capacity.
    fn filtered(&self, mut keep: impl FnMut(&[I; 3]) -> bool) -> Result<Self, CapacityError> {
        let mut ret = self.empty_like();
        for t in self.triples.iter().filter(|t| keep(&t.ids)) {
            ret.import(self, t.ids)?;
        }
        Ok(ret)
    }

    /// A new set with the triples of both sets.
    pub fn union(&self, other: &Self) -> Result<Self, CapacityError> {
        let mut ret = self.empty_with_capacity(self.len() + other.len());
        ret.import_all(self)?;
        ret.import_all(other)?;
        Ok(ret)
    }

    /// A new set with the triples present in both sets.
    pub fn intersection(&self, other: &Self) -> Result<Self, CapacityError> {
        self.filtered(|ids| other.holds(&self.terms, ids))
    }

    /// A new set with the triples of this set absent from `other`.
    pub fn difference(&self, other: &Self) -> Result<Self, CapacityError> {
        self.filtered(|ids| !other.holds(&self.terms, ids))
    }

    /// A new set with the triples present in exactly one of the sets.
    pub fn symmetric_difference(&self, other: &Self) -> Result<Self, CapacityError> {
        let mut ret = self.difference(other)?;
        for t in other.triples.iter() {
            if !self.holds(&other.terms, &t.ids) {
                ret.import(other, t.ids)?;
            }
        }
        Ok(ret)
    }

    /// Add the triples of `other` to this set.
    ///
    /// If they do not fit, fail without modifying this set.
    pub fn union_with(&mut self, other: &Self) -> Result<(), CapacityError> {
        self.check_room(other)?;
        self.import_all(other)
    }

    pub fn intersect_with(&mut self, other: &Self) {
        let terms = &self.terms;
        self.triples.retain(|t| other.holds(terms, &t.ids));
    }

    pub fn subtract(&mut self, other: &Self) {
        let terms = &self.terms;
        self.triples.retain(|t| !other.holds(terms, &t.ids));
    }

    /// Keep only the triples present in exactly one of the sets.
    ///
    /// If they do not fit, fail without modifying this set.
    pub fn symmetric_difference_with(&mut self, other: &Self) -> Result<(), CapacityError> {
        self.check_room(other)?;
        let missing: Vec<[I; 3]> = other
            .triples
            .iter()
            .filter(|t| !self.holds(&other.terms, &t.ids))
            .map(|t| t.ids)
            .collect();
        self.subtract(other);
        for ids in missing {
            self.import(other, ids)?;
        }
        Ok(())
    }
}

/// Encode the three terms of `triple`.
pub(crate) fn encode_triple(triple: [&Term; 3]) -> Result<[Vec<u8>; 3], CodecError> {
    Ok([
        codec::serialize(triple[0])?,
        codec::serialize(triple[1])?,
        codec::serialize(triple[2])?,
    ])
}
