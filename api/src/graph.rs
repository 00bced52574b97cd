//! A graph is a deduplicated set of triples.
//!
//! This module provides the [`TripleSet`] contract,
//! shared by the store-keyed and the buffer-backed implementations,
//! the [`ExternalGraph`] interchange abstraction,
//! and the errors raised by graph operations.

#[cfg(any(test, feature = "test_macro"))]
#[macro_use]
pub mod test;

mod _error;
pub use self::_error::*;
mod _foreign_impl;
pub use self::_foreign_impl::*;
mod _traits;
pub use self::_traits::*;
