//! I define [`Slice`], the result of projecting a set onto the unbound positions of a pattern.
use std::collections::HashSet;
use std::hash::Hash;

use crate::matcher::Shape;

/// The projection of the triples matching a pattern onto its unbound positions.
///
/// The variant depends only on the number of unbound positions.
/// Callers are expected to branch on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slice<T: Eq + Hash> {
    /// All positions were bound: whether the triple is in the set.
    Contains(bool),
    /// One position was unbound: its distinct values.
    Terms(HashSet<T>),
    /// Two positions were unbound: their distinct value pairs, in triple order.
    Pairs(HashSet<(T, T)>),
    /// No position was bound: all the triples.
    Triples(HashSet<[T; 3]>),
}

impl<T: Eq + Hash + Clone> Slice<T> {
    /// Project `matches`, which must all match a pattern of the given `shape`.
    pub fn collect<I>(shape: Shape, matches: I) -> Self
    where
        I: IntoIterator<Item = [T; 3]>,
    {
        let mut matches = matches.into_iter();
        match shape.unbound() {
            [] => Slice::Contains(matches.next().is_some()),
            [i] => Slice::Terms(matches.map(|t| t[*i].clone()).collect()),
            [i, j] => Slice::Pairs(
                matches
                    .map(|t| (t[*i].clone(), t[*j].clone()))
                    .collect(),
            ),
            _ => Slice::Triples(matches.collect()),
        }
    }
}

impl<T: Eq + Hash> Slice<T> {
    /// Convert every value of this slice with `f`, stopping at the first error.
    pub fn try_map<U, E, F>(self, mut f: F) -> Result<Slice<U>, E>
    where
        U: Eq + Hash,
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(match self {
            Slice::Contains(b) => Slice::Contains(b),
            Slice::Terms(s) => Slice::Terms(s.into_iter().map(f).collect::<Result<_, E>>()?),
            Slice::Pairs(s) => Slice::Pairs(
                s.into_iter()
                    .map(|(a, b)| Ok((f(a)?, f(b)?)))
                    .collect::<Result<_, E>>()?,
            ),
            Slice::Triples(s) => Slice::Triples(
                s.into_iter()
                    .map(|[a, b, c]| Ok([f(a)?, f(b)?, f(c)?]))
                    .collect::<Result<_, E>>()?,
            ),
        })
    }

    /// If this slice is [`Slice::Contains`], its value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Slice::Contains(b) => Some(*b),
            _ => None,
        }
    }

    /// If this slice is [`Slice::Terms`], its values.
    pub fn as_terms(&self) -> Option<&HashSet<T>> {
        match self {
            Slice::Terms(s) => Some(s),
            _ => None,
        }
    }

    /// If this slice is [`Slice::Pairs`], its values.
    pub fn as_pairs(&self) -> Option<&HashSet<(T, T)>> {
        match self {
            Slice::Pairs(s) => Some(s),
            _ => None,
        }
    }

    /// If this slice is [`Slice::Triples`], its values.
    pub fn as_triples(&self) -> Option<&HashSet<[T; 3]>> {
        match self {
            Slice::Triples(s) => Some(s),
            _ => None,
        }
    }

    /// The number of values in this slice (0 or 1 for [`Slice::Contains`]).
    pub fn len(&self) -> usize {
        match self {
            Slice::Contains(b) => *b as usize,
            Slice::Terms(s) => s.len(),
            Slice::Pairs(s) => s.len(),
            Slice::Triples(s) => s.len(),
        }
    }

    /// Whether this slice is empty (or `false`).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
