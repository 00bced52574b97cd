//! General-use types and traits from the lsup API.

pub use crate::graph::{ExternalGraph, GraphError, GraphResult, TripleSet};
pub use crate::key::{TermKey, TripleKey};
pub use crate::matcher::{Position, TermPattern};
pub use crate::options::SetOptions;
pub use crate::slice::Slice;
pub use crate::store::{ReadTxn, TermStore};
pub use crate::term::{Term, TermKind, Triple};
