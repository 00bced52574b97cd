//! This crate is part of `lsup`,
//! the in-memory [RDF] core of the Lakesuperior repository.
//!
//! It provides two implementations of [`TripleSet`](lsup_api::graph::TripleSet):
//! * [`SimpleGraph`](graph::SimpleGraph) owns the encodings of its terms,
//!   and is independent of any store;
//! * [`Graph`](keyed::Graph) is bound to a [`TermStore`](lsup_api::store::TermStore),
//!   and only holds the keys of its triples.
//!
//! Which one to use depends on whether a store is available:
//! both expose the same operations, and share the same test suite.
//! [`AnyGraph`](any::AnyGraph) makes that choice at construction.
//!
//! [RDF]: https://www.w3.org/TR/rdf-primer/

pub mod any;
pub mod buffer;
pub mod graph;
pub mod hashset;
pub mod index;
pub mod keyed;
pub mod store;

/// Implement the set-algebra operators of [`TripleSet`](lsup_api::graph::TripleSet)
/// for a type already implementing it:
/// `|`, `&`, `-`, `^` on references, their assigning forms,
/// and [`PartialEq`] as set equality.
///
/// Generic parameters, if any, are given in brackets:
/// `impl_set_operators!([S: TermStore] Graph<S>)`.
#[macro_export]
macro_rules! impl_set_operators {
    ([$($gen: tt)*] $t: ty) => {
        impl<$($gen)*> std::ops::BitOr<&$t> for &$t {
            type Output = $t;
            fn bitor(self, rhs: &$t) -> $t {
                ::lsup_api::graph::TripleSet::union(self, rhs)
            }
        }

        impl<$($gen)*> std::ops::BitAnd<&$t> for &$t {
            type Output = $t;
            fn bitand(self, rhs: &$t) -> $t {
                ::lsup_api::graph::TripleSet::intersection(self, rhs)
            }
        }

        impl<$($gen)*> std::ops::Sub<&$t> for &$t {
            type Output = $t;
            fn sub(self, rhs: &$t) -> $t {
                ::lsup_api::graph::TripleSet::difference(self, rhs)
            }
        }

        impl<$($gen)*> std::ops::BitXor<&$t> for &$t {
            type Output = $t;
            fn bitxor(self, rhs: &$t) -> $t {
                ::lsup_api::graph::TripleSet::symmetric_difference(self, rhs)
            }
        }

        impl<$($gen)*> std::ops::BitOrAssign<&$t> for $t {
            fn bitor_assign(&mut self, rhs: &$t) {
                ::lsup_api::graph::TripleSet::union_with(self, rhs);
            }
        }

        impl<$($gen)*> std::ops::BitAndAssign<&$t> for $t {
            fn bitand_assign(&mut self, rhs: &$t) {
                ::lsup_api::graph::TripleSet::intersect_with(self, rhs);
            }
        }

        impl<$($gen)*> std::ops::SubAssign<&$t> for $t {
            fn sub_assign(&mut self, rhs: &$t) {
                ::lsup_api::graph::TripleSet::subtract(self, rhs);
            }
        }

        impl<$($gen)*> std::ops::BitXorAssign<&$t> for $t {
            fn bitxor_assign(&mut self, rhs: &$t) {
                ::lsup_api::graph::TripleSet::symmetric_difference_with(self, rhs);
            }
        }

        impl<$($gen)*> PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                ::lsup_api::graph::TripleSet::equals(self, other)
            }
        }

        impl<$($gen)*> Eq for $t {}
    };
    ($t: ty) => {
        $crate::impl_set_operators!([] $t);
    };
}
