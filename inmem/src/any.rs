//! A triple set whose representation is chosen at construction,
//! depending on whether a store is available.
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use lsup_api::graph::{GraphResult, TripleSet};
use lsup_api::matcher::{Position, TermPattern};
use lsup_api::options::SetOptions;
use lsup_api::slice::Slice;
use lsup_api::store::TermStore;
use lsup_api::term::{Term, Triple};

use crate::graph::SimpleGraph;
use crate::keyed::Graph;

/// Either a store-keyed [`Graph`] or a buffer-backed [`SimpleGraph`].
///
/// # Panics
/// Set algebra between a keyed and a buffered [`AnyGraph`] panics.
/// Sets derived with [`empty_like`](TripleSet::empty_like)
/// always have the same representation as their origin.
///
/// Equality does not panic: a keyed and a buffered set are never equal.
pub enum AnyGraph<S: TermStore> {
    /// A set bound to a store
    Keyed(Graph<S>),
    /// A set owning its term encodings
    Buffered(SimpleGraph),
}

macro_rules! dispatch {
    ($graph: expr, $g: ident => $e: expr) => {
        match $graph {
            AnyGraph::Keyed($g) => $e,
            AnyGraph::Buffered($g) => $e,
        }
    };
}

macro_rules! dispatch_binary {
    ($graph: expr, $other: expr, $g: ident, $h: ident => $e: expr) => {
        match ($graph, $other) {
            (AnyGraph::Keyed($g), AnyGraph::Keyed($h)) => $e,
            (AnyGraph::Buffered($g), AnyGraph::Buffered($h)) => $e,
            _ => panic!("cannot combine a store-keyed set with a buffered set"),
        }
    };
}

impl<S: TermStore> AnyGraph<S> {
    /// A keyed set if `store` is given, a buffered one otherwise.
    pub fn new(store: Option<Arc<S>>, options: SetOptions) -> Self {
        match store {
            Some(store) => AnyGraph::Keyed(Graph::with_options(store, options)),
            None => AnyGraph::Buffered(SimpleGraph::with_options(options)),
        }
    }

    /// A set filled with `triples`, keyed if `store` is given, buffered otherwise.
    pub fn from_triples<T>(
        store: Option<Arc<S>>,
        options: SetOptions,
        triples: T,
    ) -> GraphResult<Self>
    where
        T: IntoIterator<Item = Triple>,
    {
        let mut g = Self::new(store, options);
        g.add(triples)?;
        Ok(g)
    }

    /// Whether this set is bound to a store.
    pub fn is_keyed(&self) -> bool {
        matches!(self, AnyGraph::Keyed(_))
    }

    /// The keyed set, if this is one.
    pub fn as_keyed(&self) -> Option<&Graph<S>> {
        match self {
            AnyGraph::Keyed(g) => Some(g),
            AnyGraph::Buffered(_) => None,
        }
    }

    /// The buffer-backed set, if this is one.
    pub fn as_buffered(&self) -> Option<&SimpleGraph> {
        match self {
            AnyGraph::Keyed(_) => None,
            AnyGraph::Buffered(g) => Some(g),
        }
    }
}

impl<S: TermStore> Clone for AnyGraph<S> {
    fn clone(&self) -> Self {
        dispatch!(self, g => g.clone().into())
    }
}

impl<S: TermStore> fmt::Debug for AnyGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyGraph::Keyed(g) => f.debug_tuple("Keyed").field(g).finish(),
            AnyGraph::Buffered(g) => f.debug_tuple("Buffered").field(g).finish(),
        }
    }
}

impl<S: TermStore> From<Graph<S>> for AnyGraph<S> {
    fn from(g: Graph<S>) -> Self {
        AnyGraph::Keyed(g)
    }
}

impl<S: TermStore> From<SimpleGraph> for AnyGraph<S> {
    fn from(g: SimpleGraph) -> Self {
        AnyGraph::Buffered(g)
    }
}

impl<S: TermStore> TripleSet for AnyGraph<S> {
    fn len(&self) -> usize {
        dispatch!(self, g => g.len())
    }

    fn empty_like(&self) -> Self {
        dispatch!(self, g => g.empty_like().into())
    }

    fn add_triple(&mut self, triple: &Triple) -> GraphResult<bool> {
        dispatch!(self, g => g.add_triple(triple))
    }

    fn contains(&self, triple: &Triple) -> GraphResult<bool> {
        dispatch!(self, g => g.contains(triple))
    }

    fn remove(&mut self, pattern: TermPattern) -> GraphResult<usize> {
        dispatch!(self, g => g.remove(pattern))
    }

    fn retain(&mut self, pattern: TermPattern) -> GraphResult<usize> {
        dispatch!(self, g => g.retain(pattern))
    }

    fn lookup(&self, pattern: TermPattern) -> GraphResult<Self> {
        dispatch!(self, g => Ok(g.lookup(pattern)?.into()))
    }

    fn slice(&self, pattern: TermPattern) -> GraphResult<Slice<Term>> {
        dispatch!(self, g => g.slice(pattern))
    }

    fn data(&self) -> GraphResult<Vec<Triple>> {
        dispatch!(self, g => g.data())
    }

    fn set(&mut self, triple: TermPattern) -> GraphResult<()> {
        dispatch!(self, g => g.set(triple))
    }

    fn terms(&self, position: Position) -> GraphResult<HashSet<Term>> {
        dispatch!(self, g => g.terms(position))
    }

    fn value_for(
        &self,
        subject: &Term,
        predicate: &Term,
        strict: bool,
    ) -> GraphResult<Option<Term>> {
        dispatch!(self, g => g.value_for(subject, predicate, strict))
    }

    fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (AnyGraph::Keyed(g), AnyGraph::Keyed(h)) => g.equals(h),
            (AnyGraph::Buffered(g), AnyGraph::Buffered(h)) => g.equals(h),
            _ => false,
        }
    }

    fn union(&self, other: &Self) -> Self {
        dispatch_binary!(self, other, g, h => g.union(h).into())
    }

    fn intersection(&self, other: &Self) -> Self {
        dispatch_binary!(self, other, g, h => g.intersection(h).into())
    }

    fn difference(&self, other: &Self) -> Self {
        dispatch_binary!(self, other, g, h => g.difference(h).into())
    }

    fn symmetric_difference(&self, other: &Self) -> Self {
        dispatch_binary!(self, other, g, h => g.symmetric_difference(h).into())
    }

    fn union_with(&mut self, other: &Self) -> &mut Self {
        dispatch_binary!(&mut *self, other, g, h => { g.union_with(h); });
        self
    }

    fn intersect_with(&mut self, other: &Self) -> &mut Self {
        dispatch_binary!(&mut *self, other, g, h => { g.intersect_with(h); });
        self
    }

    fn subtract(&mut self, other: &Self) -> &mut Self {
        dispatch_binary!(&mut *self, other, g, h => { g.subtract(h); });
        self
    }

    fn symmetric_difference_with(&mut self, other: &Self) -> &mut Self {
        dispatch_binary!(&mut *self, other, g, h => { g.symmetric_difference_with(h); });
        self
    }
}

crate::impl_set_operators!([S: TermStore] AnyGraph<S>);
