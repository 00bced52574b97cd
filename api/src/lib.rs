//! This crate is part of `lsup`,
//! the in-memory [RDF] core of the Lakesuperior repository.
//!
//! It defines the building blocks shared by all triple-set implementations:
//! * [terms](term::Term) and their binary [codec],
//! * the seeded [content hash](hash::ContentHasher) used to bucket them,
//! * the [keys](key::TermKey) assigned to terms by an external [store],
//! * [patterns and matchers](matcher) selecting triples,
//! * the [`TripleSet`](graph::TripleSet) contract, and its [`Slice`](slice::Slice) projections.
//!
//! Implementations live in `lsup_inmem` and `lsup_resource`.
//!
//! [RDF]: https://www.w3.org/TR/rdf-primer/

pub mod codec;
pub mod graph;
pub mod hash;
pub mod key;
pub mod matcher;
pub mod options;
pub mod prelude;
pub mod slice;
pub mod store;
pub mod term;
