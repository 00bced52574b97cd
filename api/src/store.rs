//! I define the contract of the external term store,
//! which maps term encodings to [`TermKey`]s and back.
//!
//! The store itself (persistence, transactions, key derivation)
//! lives outside this workspace;
//! sets only consume it through [`TermStore`] and [`ReadTxn`].
use std::collections::HashMap;
use std::error::Error;

use thiserror::Error;

use crate::codec::CodecError;
use crate::key::{TermKey, TripleKey};
use crate::matcher::Pattern;
use crate::term::{Term, Triple};

/// An error raised by a [`TermStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key is not known to the store.
    #[error("Unknown key: {0}")]
    UnknownKey(TermKey),
    /// A term could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The storage backend failed.
    #[error("Store backend error: {0}")]
    Backend(#[from] Box<dyn Error + Send + Sync>),
}

/// A scoped read transaction on a [`TermStore`].
///
/// All lookups performed through one transaction see the same snapshot.
/// The transaction ends when the value is dropped.
pub trait ReadTxn {
    /// Retrieve the term identified by `key`.
    ///
    /// Fails with [`StoreError::UnknownKey`] if the store has no such key.
    fn from_key(&self, key: TermKey) -> Result<Term, StoreError>;
}

/// The contract of an external store of terms and triples.
pub trait TermStore {
    /// The read transactions of this store.
    type Txn<'s>: ReadTxn
    where
        Self: 's;

    /// Get the key of `term`, assigning one if the term is new to the store.
    ///
    /// Keys are content-addressed, so this method is idempotent.
    fn to_key(&self, term: &Term) -> Result<TermKey, StoreError>;

    /// Get the key of `term`, or `None` if the term is new to the store.
    ///
    /// Unlike [`to_key`](TermStore::to_key), this should not assign keys.
    /// The default implementation falls back to [`to_key`](TermStore::to_key),
    /// for stores that can not tell known terms apart.
    fn get_key(&self, term: &Term) -> Result<Option<TermKey>, StoreError> {
        self.to_key(term).map(Some)
    }

    /// Open a read transaction.
    fn begin_read(&self) -> Result<Self::Txn<'_>, StoreError>;

    /// Scan the triples stored in `context` (or in all contexts if `None`)
    /// that match `pattern`.
    fn triple_keys(
        &self,
        pattern: &Pattern<TermKey>,
        context: Option<&Term>,
    ) -> Result<Vec<TripleKey>, StoreError>;

    /// Retrieve the term identified by `key`, in its own transaction.
    ///
    /// For more than one lookup, use [`begin_read`](TermStore::begin_read)
    /// and a [`Hydrator`] instead.
    fn from_key(&self, key: TermKey) -> Result<Term, StoreError> {
        self.begin_read()?.from_key(key)
    }

    /// Get the keys of the three terms of `triple`.
    fn triple_to_key(&self, triple: &Triple) -> Result<TripleKey, StoreError> {
        Ok([
            self.to_key(&triple[0])?,
            self.to_key(&triple[1])?,
            self.to_key(&triple[2])?,
        ])
    }
}

/// Resolves keys to terms within a single [`ReadTxn`],
/// looking up each distinct key only once.
pub struct Hydrator<'t, T: ReadTxn + ?Sized> {
    txn: &'t T,
    cache: HashMap<TermKey, Term>,
}

impl<'t, T: ReadTxn + ?Sized> Hydrator<'t, T> {
    /// Build a hydrator reading through `txn`.
    pub fn new(txn: &'t T) -> Self {
        Hydrator {
            txn,
            cache: HashMap::new(),
        }
    }

    /// The term identified by `key`.
    pub fn term(&mut self, key: TermKey) -> Result<Term, StoreError> {
        if let Some(t) = self.cache.get(&key) {
            return Ok(t.clone());
        }
        let t = self.txn.from_key(key)?;
        log::trace!("hydrated {key} -> {t}");
        self.cache.insert(key, t.clone());
        Ok(t)
    }

    /// The triple identified by `key`.
    pub fn triple(&mut self, key: &TripleKey) -> Result<Triple, StoreError> {
        Ok([self.term(key[0])?, self.term(key[1])?, self.term(key[2])?])
    }

    /// The number of distinct keys resolved so far.
    pub fn resolved(&self) -> usize {
        self.cache.len()
    }
}
