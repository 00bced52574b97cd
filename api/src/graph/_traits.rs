// this module is transparently re-exported by its parent `graph`
use std::collections::HashSet;

use super::{ExternalGraph, GraphError, GraphResult};
use crate::matcher::{Position, TermPattern};
use crate::slice::Slice;
use crate::term::{Term, Triple};

/// The contract shared by all in-memory triple sets.
///
/// Implementations hold no duplicate triples,
/// and their equality is set equality
/// (see [`equals`](TripleSet::equals)).
///
/// Set-algebra operations are total:
/// they never fail on valid operands.
/// Operands are expected to share the same configuration
/// (e.g. the same store binding, for store-keyed sets).
pub trait TripleSet: Sized {
    /// The number of triples in this set.
    fn len(&self) -> usize;

    /// Whether this set contains no triple.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A new empty set, configured like this one
    /// (same store binding, same identity, same hash seed).
    fn empty_like(&self) -> Self;

    /// Insert `triple`; return false if it was already present.
    fn add_triple(&mut self, triple: &Triple) -> GraphResult<bool>;

    /// Insert all `triples`.
    ///
    /// Triples already present are silently skipped.
    fn add<I>(&mut self, triples: I) -> GraphResult<()>
    where
        I: IntoIterator<Item = Triple>,
    {
        for t in triples {
            self.add_triple(&t)?;
        }
        Ok(())
    }

    /// Whether `triple` is in this set.
    fn contains(&self, triple: &Triple) -> GraphResult<bool>;

    /// Remove every triple matching `pattern`, and return how many were removed.
    fn remove(&mut self, pattern: TermPattern) -> GraphResult<usize>;

    /// Remove every triple *not* matching `pattern`, and return how many were removed.
    fn retain(&mut self, pattern: TermPattern) -> GraphResult<usize>;

    /// A new set containing the triples of this set matching `pattern`.
    fn lookup(&self, pattern: TermPattern) -> GraphResult<Self>;

    /// Project the triples matching `pattern` onto its unbound positions.
    ///
    /// See [`Slice`] for the shape of the result.
    fn slice(&self, pattern: TermPattern) -> GraphResult<Slice<Term>>;

    /// All the triples of this set, as terms.
    fn data(&self) -> GraphResult<Vec<Triple>>;

    /// Replace the value of (subject, predicate) with the object of `triple`.
    ///
    /// Every triple with the same subject and predicate is removed
    /// before `triple` is inserted.
    /// Fails with [`GraphError::InvalidTriple`] if any position is unbound,
    /// in which case the set is left unchanged.
    fn set(&mut self, triple: TermPattern) -> GraphResult<()>;

    /// The set of distinct terms found at `position`.
    fn terms(&self, position: Position) -> GraphResult<HashSet<Term>> {
        let i = position.index();
        Ok(self.data()?.into_iter().map(|t| t[i].clone()).collect())
    }

    /// One object of (`subject`, `predicate`, *), if any.
    ///
    /// If several objects exist,
    /// fail with [`GraphError::MultipleValues`] if `strict`,
    /// or return an arbitrary one otherwise.
    fn value_for(
        &self,
        subject: &Term,
        predicate: &Term,
        strict: bool,
    ) -> GraphResult<Option<Term>> {
        let values = match self.slice([Some(subject), Some(predicate), None])? {
            Slice::Terms(values) => values,
            _ => unreachable!("one unbound position always yields Slice::Terms"),
        };
        single_value(subject, predicate, values, strict)
    }

    /// Whether this set and `other` contain exactly the same triples.
    fn equals(&self, other: &Self) -> bool {
        self.len() == other.len() && self.symmetric_difference(other).is_empty()
    }

    /// A new set with the triples of both sets.
    fn union(&self, other: &Self) -> Self;

    /// A new set with the triples present in both sets.
    fn intersection(&self, other: &Self) -> Self;

    /// A new set with the triples of this set absent from `other`.
    fn difference(&self, other: &Self) -> Self;

    /// A new set with the triples present in exactly one of the sets.
    fn symmetric_difference(&self, other: &Self) -> Self;

    /// Add the triples of `other` to this set.
    fn union_with(&mut self, other: &Self) -> &mut Self;

    /// Keep only the triples of this set also present in `other`.
    fn intersect_with(&mut self, other: &Self) -> &mut Self;

    /// Remove the triples of `other` from this set.
    fn subtract(&mut self, other: &Self) -> &mut Self;

    /// Keep only the triples present in exactly one of the sets.
    fn symmetric_difference_with(&mut self, other: &Self) -> &mut Self;

    /// Convert this set to an [`ExternalGraph`].
    fn as_external_graph<G: ExternalGraph>(&self) -> GraphResult<G> {
        let mut g = G::default();
        for t in self.data()? {
            g.insert_triple(t);
        }
        Ok(g)
    }
}

/// Check that all positions of `pattern` are bound.
pub fn bound_triple(pattern: TermPattern) -> GraphResult<[&Term; 3]> {
    match pattern {
        [Some(s), Some(p), Some(o)] => Ok([s, p, o]),
        _ => Err(GraphError::InvalidTriple(pattern.map(|t| t.is_some()))),
    }
}

/// Pick the value of (`subject`, `predicate`) among `values`,
/// as specified by [`TripleSet::value_for`].
pub fn single_value<I>(
    subject: &Term,
    predicate: &Term,
    values: I,
    strict: bool,
) -> GraphResult<Option<Term>>
where
    I: IntoIterator<Item = Term>,
{
    let mut values = values.into_iter();
    let first = values.next();
    if strict {
        let others = values.count();
        if others > 0 {
            return Err(GraphError::MultipleValues {
                subject: subject.clone(),
                predicate: predicate.clone(),
                count: others + 1,
            });
        }
    }
    Ok(first)
}
