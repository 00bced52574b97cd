// this module is transparently re-exported by its parent `graph`
use thiserror::Error;

use crate::codec::CodecError;
use crate::store::StoreError;
use crate::term::Term;

/// An error raised by a graph operation.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A triple was expected, but some positions were unbound.
    ///
    /// The flags tell which positions were bound.
    #[error("Invalid triple: bound positions are {0:?}, all three are required")]
    InvalidTriple([bool; 3]),
    /// A single value was expected, but several were found.
    #[error("Multiple values for {subject} {predicate} ({count} found)")]
    MultipleValues {
        /// The subject
        subject: Term,
        /// The predicate
        predicate: Term,
        /// The number of values found
        count: usize,
    },
    /// The graph has no identifier, but the operation requires one.
    #[error("Graph has no identifier")]
    NoIdentifier,
    /// The set can not hold more distinct terms.
    ///
    /// The value is the maximum number of distinct terms of the set.
    #[error("Set is full: it can hold at most {0} distinct terms")]
    Capacity(usize),
    /// A term could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The term store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Type alias for results of graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
