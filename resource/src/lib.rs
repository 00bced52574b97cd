//! This crate is part of `lsup`,
//! the in-memory [RDF] core of the Lakesuperior repository.
//!
//! It provides [`Imr`] (in-memory resource),
//! a buffer-backed triple set anchored to the subject it describes.
//!
//! [RDF]: https://www.w3.org/TR/rdf-primer/
#![deny(missing_docs)]

pub mod resource;

pub use resource::Imr;
