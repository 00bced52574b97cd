//! Store-keyed triple sets.
//!
//! A [`Graph`] holds the [keys](TripleKey) of its triples,
//! as assigned by a [`TermStore`] it is bound to.
//! Set operations never touch the store;
//! terms are only resolved ("hydrated") when returned to the caller,
//! within a single read transaction per call.
//! Only [`add_triple`](TripleSet::add_triple) and [`set`](TripleSet::set)
//! may assign new keys; queries on terms unknown to the store match nothing.
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use lsup_api::graph::{bound_triple, single_value, GraphError, GraphResult, TripleSet};
use lsup_api::hash::ContentHasher;
use lsup_api::key::{triple_key_bytes, TermKey, TripleKey};
use lsup_api::matcher::{Matcher, Pattern, Position, Shape, TermPattern};
use lsup_api::options::SetOptions;
use lsup_api::slice::Slice;
use lsup_api::store::{Hydrator, TermStore};
use lsup_api::term::{Term, Triple};

use crate::hashset::{HashEq, RawSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct KeyHashEq(ContentHasher);

impl HashEq<TripleKey> for KeyHashEq {
    fn hash(&self, key: &TripleKey) -> u64 {
        self.0.content_hash(&triple_key_bytes(key)).bucket()
    }
    fn eq(&self, a: &TripleKey, b: &TripleKey) -> bool {
        a == b
    }
}

/// A deduplicated set of [`TripleKey`]s.
#[derive(Clone, Debug)]
pub struct KeySet {
    keys: RawSet<TripleKey>,
    cap: KeyHashEq,
}

impl Default for KeySet {
    fn default() -> Self {
        Self::new(SetOptions::default())
    }
}

impl KeySet {
    pub fn new(options: SetOptions) -> Self {
        KeySet {
            keys: RawSet::with_capacity(options.capacity()),
            cap: KeyHashEq(options.hasher()),
        }
    }

    /// A new empty set, with the same hasher as this one.
    pub fn empty_like(&self) -> Self {
        KeySet {
            keys: RawSet::new(),
            cap: self.cap,
        }
    }

    pub fn hasher(&self) -> ContentHasher {
        self.cap.0
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear()
    }

    /// Insert `key`; return false if it was already present.
    pub fn insert(&mut self, key: TripleKey) -> bool {
        self.keys.insert(&self.cap, key)
    }

    pub fn contains(&self, key: &TripleKey) -> bool {
        self.keys.contains(&self.cap, key)
    }

    pub fn remove(&mut self, key: &TripleKey) -> bool {
        self.keys.remove(&self.cap, key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TripleKey> + '_ {
        self.keys.iter()
    }

    /// Iterate over the keys of this set matching `m`.
    pub fn matching(&self, m: Matcher<TermKey>) -> Box<dyn Iterator<Item = TripleKey> + '_> {
        match m.exact() {
            Some(key) => {
                let key = *key;
                Box::new(self.contains(&key).then_some(key).into_iter())
            }
            None => Box::new(self.keys.iter().filter(move |k| m.matches(k)).copied()),
        }
    }

    /// Remove the keys matching `m`, and return how many were removed.
    pub fn remove_matching(&mut self, m: Matcher<TermKey>) -> usize {
        match m.exact() {
            Some(key) => usize::from(self.remove(key)),
            None => self.keys.retain(|k| !m.matches(k)),
        }
    }

    /// Remove the keys not matching `m`, and return how many were removed.
    pub fn retain_matching(&mut self, m: Matcher<TermKey>) -> usize {
        self.keys.retain(|k| m.matches(k))
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut ret = self.clone();
        ret.union_with(other);
        ret
    }

    pub fn intersection(&self, other: &Self) -> Self {
        let mut ret = self.empty_like();
        ret.extend(self.iter().filter(|k| other.contains(k)).copied());
        ret
    }

    pub fn difference(&self, other: &Self) -> Self {
        let mut ret = self.empty_like();
        ret.extend(self.iter().filter(|k| !other.contains(k)).copied());
        ret
    }

    pub fn symmetric_difference(&self, other: &Self) -> Self {
        let mut ret = self.difference(other);
        ret.extend(other.iter().filter(|k| !self.contains(k)).copied());
        ret
    }

    pub fn union_with(&mut self, other: &Self) {
        self.keys.reserve(&self.cap, other.len());
        self.extend(other.iter().copied());
    }

    pub fn intersect_with(&mut self, other: &Self) {
        self.keys.retain(|k| other.contains(k));
    }

    pub fn subtract(&mut self, other: &Self) {
        self.keys.retain(|k| !other.contains(k));
    }

    pub fn symmetric_difference_with(&mut self, other: &Self) {
        let missing: Vec<TripleKey> = other
            .iter()
            .filter(|k| !self.contains(k))
            .copied()
            .collect();
        self.subtract(other);
        self.extend(missing);
    }
}

impl Extend<TripleKey> for KeySet {
    fn extend<T: IntoIterator<Item = TripleKey>>(&mut self, iter: T) {
        for k in iter {
            self.insert(k);
        }
    }
}

/// A triple set bound to a [`TermStore`], holding only the keys of its triples.
///
/// A graph may have an identifier (see [`with_uri`](Graph::with_uri)),
/// which every graph derived from it inherits.
pub struct Graph<S: TermStore> {
    store: Arc<S>,
    uri: Option<Term>,
    keys: KeySet,
}

impl<S: TermStore> Clone for Graph<S> {
    fn clone(&self) -> Self {
        Graph {
            store: Arc::clone(&self.store),
            uri: self.uri.clone(),
            keys: self.keys.clone(),
        }
    }
}

impl<S: TermStore> fmt::Debug for Graph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("uri", &self.uri)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl<S: TermStore> Graph<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_options(store, SetOptions::default())
    }

    pub fn with_options(store: Arc<S>, options: SetOptions) -> Self {
        Graph {
            store,
            uri: None,
            keys: KeySet::new(options),
        }
    }

    /// Identify this graph with the IRI `uri`.
    pub fn with_uri<U: Into<String>>(mut self, uri: U) -> Self {
        self.uri = Some(Term::iri(uri));
        self
    }

    /// Adopt `keys` as the content of a new graph, without copying them.
    pub fn from_key_set(store: Arc<S>, keys: KeySet) -> Self {
        log::debug!("adopting a set of {} keys", keys.len());
        Graph {
            store,
            uri: None,
            keys,
        }
    }

    /// Build a graph from triple `keys` assigned by `store`.
    pub fn from_keys<K>(store: Arc<S>, keys: K) -> Self
    where
        K: IntoIterator<Item = TripleKey>,
    {
        let mut g = Self::new(store);
        g.keys.extend(keys);
        g
    }

    /// Build a graph from `triples`, assigning keys in `store` as needed.
    pub fn from_triples<T>(store: Arc<S>, triples: T) -> GraphResult<Self>
    where
        T: IntoIterator<Item = Triple>,
    {
        let mut g = Self::new(store);
        g.add(triples)?;
        Ok(g)
    }

    /// Build a graph from the triples of `store` in `context` matching `pattern`.
    ///
    /// If `context` is `None`, all contexts are searched.
    /// No term is hydrated.
    pub fn from_store(
        store: Arc<S>,
        pattern: TermPattern,
        context: Option<&Term>,
    ) -> GraphResult<Self> {
        let mut g = Self::new(store);
        if let Some(kp) = g.key_pattern(pattern)? {
            let keys = g.store.triple_keys(&kp, context)?;
            g.keys.extend(keys);
        }
        Ok(g)
    }

    /// The store this graph is bound to.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The identifier of this graph, if any.
    pub fn uri(&self) -> Option<&Term> {
        self.uri.as_ref()
    }

    pub fn key_set(&self) -> &KeySet {
        &self.keys
    }

    pub fn into_key_set(self) -> KeySet {
        self.keys
    }

    /// Iterate over the keys of the triples of this graph.
    pub fn keys(&self) -> impl Iterator<Item = TripleKey> + '_ {
        self.keys.iter().copied()
    }

    /// Insert triple `keys`; return how many were new.
    pub fn add_keys<K>(&mut self, keys: K) -> usize
    where
        K: IntoIterator<Item = TripleKey>,
    {
        keys.into_iter().filter(|k| self.keys.insert(*k)).count()
    }

    /// Translate `pattern` into store keys, without assigning any.
    ///
    /// Return `None` if a bound term is unknown to the store,
    /// in which case no triple can match.
    pub fn key_pattern(&self, pattern: TermPattern) -> GraphResult<Option<Pattern<TermKey>>> {
        let mut ret = [None; 3];
        for (k, t) in ret.iter_mut().zip(pattern) {
            if let Some(t) = t {
                match self.store.get_key(t)? {
                    Some(key) => *k = Some(key),
                    None => return Ok(None),
                }
            }
        }
        Ok(Some(ret))
    }

    /// A new graph containing the triples of this graph matching the key `pattern`.
    pub fn lookup_keys(&self, pattern: Pattern<TermKey>) -> Self {
        let mut ret = self.empty_like();
        ret.keys.extend(self.keys.matching(Matcher::new(pattern)));
        ret
    }

    /// Project the triples matching the key `pattern` onto its unbound positions,
    /// without hydrating them.
    pub fn slice_keys(&self, pattern: Pattern<TermKey>) -> Slice<TermKey> {
        let m = Matcher::new(pattern);
        Slice::collect(m.shape(), self.keys.matching(m))
    }

    /// Hydrate triple `keys`, within one read transaction.
    pub fn hydrate<K>(&self, keys: K) -> GraphResult<Vec<Triple>>
    where
        K: IntoIterator<Item = TripleKey>,
    {
        let txn = self.store.begin_read()?;
        let mut h = Hydrator::new(&txn);
        let ret = keys
            .into_iter()
            .map(|k| h.triple(&k))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("hydrated {} triples ({} distinct keys)", ret.len(), h.resolved());
        Ok(ret)
    }

    /// The value of `predicate` for this graph's identifier.
    ///
    /// Fails with [`GraphError::NoIdentifier`] if this graph has none.
    /// See [`TripleSet::value_for`] for the meaning of `strict`.
    pub fn value(&self, predicate: &Term, strict: bool) -> GraphResult<Option<Term>> {
        let uri = self.uri.as_ref().ok_or(GraphError::NoIdentifier)?;
        self.value_for(uri, predicate, strict)
    }

    fn derived(&self, keys: KeySet) -> Self {
        Graph {
            store: Arc::clone(&self.store),
            uri: self.uri.clone(),
            keys,
        }
    }

    fn check_store(&self, other: &Self) {
        debug_assert!(
            Arc::ptr_eq(&self.store, &other.store),
            "graphs bound to different stores"
        );
    }
}

impl<S: TermStore> TripleSet for Graph<S> {
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn empty_like(&self) -> Self {
        self.derived(self.keys.empty_like())
    }

    fn add_triple(&mut self, triple: &Triple) -> GraphResult<bool> {
        let key = self.store.triple_to_key(triple)?;
        Ok(self.keys.insert(key))
    }

    fn contains(&self, triple: &Triple) -> GraphResult<bool> {
        Ok(
            match self.key_pattern([Some(&triple[0]), Some(&triple[1]), Some(&triple[2])])? {
                Some([Some(s), Some(p), Some(o)]) => self.keys.contains(&[s, p, o]),
                _ => false,
            },
        )
    }

    fn remove(&mut self, pattern: TermPattern) -> GraphResult<usize> {
        Ok(match self.key_pattern(pattern)? {
            Some(kp) => self.keys.remove_matching(Matcher::new(kp)),
            None => 0,
        })
    }

    fn retain(&mut self, pattern: TermPattern) -> GraphResult<usize> {
        Ok(match self.key_pattern(pattern)? {
            Some(kp) => self.keys.retain_matching(Matcher::new(kp)),
            None => {
                let n = self.keys.len();
                self.keys.clear();
                n
            }
        })
    }

    fn lookup(&self, pattern: TermPattern) -> GraphResult<Self> {
        Ok(match self.key_pattern(pattern)? {
            Some(kp) => self.lookup_keys(kp),
            None => self.empty_like(),
        })
    }

    fn slice(&self, pattern: TermPattern) -> GraphResult<Slice<Term>> {
        let Some(kp) = self.key_pattern(pattern)? else {
            return Ok(Slice::collect(Shape::of(&pattern), std::iter::empty()));
        };
        let slice = self.slice_keys(kp);
        let txn = self.store.begin_read()?;
        let mut h = Hydrator::new(&txn);
        Ok(slice.try_map(|k| h.term(k))?)
    }

    fn data(&self) -> GraphResult<Vec<Triple>> {
        self.hydrate(self.keys())
    }

    fn set(&mut self, triple: TermPattern) -> GraphResult<()> {
        let [s, p, o] = bound_triple(triple)?;
        let key = [
            self.store.to_key(s)?,
            self.store.to_key(p)?,
            self.store.to_key(o)?,
        ];
        let removed = self
            .keys
            .remove_matching(Matcher::new([Some(key[0]), Some(key[1]), None]));
        log::trace!("replacing {removed} value(s) of {s} {p}");
        self.keys.insert(key);
        Ok(())
    }

    fn terms(&self, position: Position) -> GraphResult<HashSet<Term>> {
        let i = position.index();
        let keys: HashSet<TermKey> = self.keys.iter().map(|k| k[i]).collect();
        let txn = self.store.begin_read()?;
        let mut h = Hydrator::new(&txn);
        Ok(keys
            .into_iter()
            .map(|k| h.term(k))
            .collect::<Result<_, _>>()?)
    }

    fn value_for(
        &self,
        subject: &Term,
        predicate: &Term,
        strict: bool,
    ) -> GraphResult<Option<Term>> {
        let Some(kp) = self.key_pattern([Some(subject), Some(predicate), None])? else {
            return Ok(None);
        };
        let objects: Vec<TermKey> = self.keys.matching(Matcher::new(kp)).map(|k| k[2]).collect();
        let txn = self.store.begin_read()?;
        let mut h = Hydrator::new(&txn);
        let values = objects
            .into_iter()
            .take(if strict { usize::MAX } else { 1 })
            .map(|k| h.term(k))
            .collect::<Result<Vec<_>, _>>()?;
        single_value(subject, predicate, values, strict)
    }

    fn union(&self, other: &Self) -> Self {
        self.check_store(other);
        self.derived(self.keys.union(&other.keys))
    }

    fn intersection(&self, other: &Self) -> Self {
        self.check_store(other);
        self.derived(self.keys.intersection(&other.keys))
    }

    fn difference(&self, other: &Self) -> Self {
        self.check_store(other);
        self.derived(self.keys.difference(&other.keys))
    }

    fn symmetric_difference(&self, other: &Self) -> Self {
        self.check_store(other);
        self.derived(self.keys.symmetric_difference(&other.keys))
    }

    fn union_with(&mut self, other: &Self) -> &mut Self {
        self.check_store(other);
        self.keys.union_with(&other.keys);
        self
    }

    fn intersect_with(&mut self, other: &Self) -> &mut Self {
        self.check_store(other);
        self.keys.intersect_with(&other.keys);
        self
    }

    fn subtract(&mut self, other: &Self) -> &mut Self {
        self.check_store(other);
        self.keys.subtract(&other.keys);
        self
    }

    fn symmetric_difference_with(&mut self, other: &Self) -> &mut Self {
        self.check_store(other);
        self.keys.symmetric_difference_with(&other.keys);
        self
    }
}

crate::impl_set_operators!([S: TermStore] Graph<S>);
