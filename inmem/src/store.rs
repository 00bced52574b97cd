//! A [`TermStore`] kept entirely in memory.
//!
//! [`MemoryStore`] is the reference store of this crate:
//! it is used to test the store-keyed [`Graph`](crate::keyed::Graph),
//! and is fit for small, short-lived repositories.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use lsup_api::codec;
use lsup_api::key::{TermKey, TripleKey};
use lsup_api::matcher::{Matcher, Pattern};
use lsup_api::store::{ReadTxn, StoreError, TermStore};
use lsup_api::term::{Term, Triple};
use thiserror::Error;

/// An error raised by the backend of a [`MemoryStore`].
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    /// A thread panicked while holding the store lock.
    #[error("Memory store lock poisoned")]
    Poisoned,
}

impl From<MemoryStoreError> for StoreError {
    fn from(e: MemoryStoreError) -> Self {
        StoreError::Backend(Box::new(e))
    }
}

#[derive(Debug, Default)]
struct StoreData {
    e2k: HashMap<Box<[u8]>, TermKey>,
    k2e: Vec<Box<[u8]>>,
    contexts: BTreeMap<Option<TermKey>, BTreeSet<TripleKey>>,
}

impl StoreData {
    fn key_of(&self, data: &[u8]) -> Option<TermKey> {
        self.e2k.get(data).copied()
    }

    fn ensure_key(&mut self, data: &[u8]) -> TermKey {
        if let Some(k) = self.key_of(data) {
            return k;
        }
        // keys start at 1
        let k = TermKey(self.k2e.len() as u64 + 1);
        self.k2e.push(data.into());
        self.e2k.insert(data.into(), k);
        log::trace!("assigned {k}");
        k
    }

    fn encoding(&self, key: TermKey) -> Option<&[u8]> {
        let i = usize::try_from(key.0).ok()?.checked_sub(1)?;
        self.k2e.get(i).map(|e| &e[..])
    }
}

/// A store of terms and triples, held in memory.
///
/// Keys are assigned sequentially, and never reused.
/// Triples are grouped by context; `None` is the default context.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreData>, MemoryStoreError> {
        self.data.read().map_err(|_| MemoryStoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreData>, MemoryStoreError> {
        self.data.write().map_err(|_| MemoryStoreError::Poisoned)
    }

    /// The number of distinct terms known to this store.
    pub fn term_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.k2e.len())
    }

    /// Store `triple` in `context`, and return its key.
    pub fn insert(&self, context: Option<&Term>, triple: &Triple) -> Result<TripleKey, StoreError> {
        let encoded = [
            codec::serialize(&triple[0])?,
            codec::serialize(&triple[1])?,
            codec::serialize(&triple[2])?,
        ];
        let context = context.map(codec::serialize).transpose()?;
        let mut data = self.write()?;
        let key = encoded.map(|e| data.ensure_key(&e));
        let ckey = context.map(|c| data.ensure_key(&c));
        data.contexts.entry(ckey).or_default().insert(key);
        Ok(key)
    }
}

impl TermStore for MemoryStore {
    type Txn<'s> = MemoryTxn<'s> where Self: 's;

    fn to_key(&self, term: &Term) -> Result<TermKey, StoreError> {
        let encoded = codec::serialize(term)?;
        if let Some(k) = self.read()?.key_of(&encoded) {
            return Ok(k);
        }
        Ok(self.write()?.ensure_key(&encoded))
    }

    fn get_key(&self, term: &Term) -> Result<Option<TermKey>, StoreError> {
        Ok(self.read()?.key_of(&codec::serialize(term)?))
    }

    fn begin_read(&self) -> Result<Self::Txn<'_>, StoreError> {
        Ok(MemoryTxn { data: self.read()? })
    }

    fn triple_keys(
        &self,
        pattern: &Pattern<TermKey>,
        context: Option<&Term>,
    ) -> Result<Vec<TripleKey>, StoreError> {
        let data = self.read()?;
        let m = Matcher::new(*pattern);
        let ret: Vec<TripleKey> = match context {
            Some(c) => {
                let Some(ckey) = data.key_of(&codec::serialize(c)?) else {
                    return Ok(vec![]);
                };
                data.contexts
                    .get(&Some(ckey))
                    .into_iter()
                    .flatten()
                    .filter(|k| m.matches(k))
                    .copied()
                    .collect()
            }
            None => data
                .contexts
                .values()
                .flatten()
                .filter(|k| m.matches(k))
                .copied()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };
        log::debug!("store scan {:?} found {} triples", m.shape(), ret.len());
        Ok(ret)
    }
}

/// A read transaction on a [`MemoryStore`].
///
/// It holds the store's read lock until dropped.
pub struct MemoryTxn<'s> {
    data: RwLockReadGuard<'s, StoreData>,
}

impl ReadTxn for MemoryTxn<'_> {
    fn from_key(&self, key: TermKey) -> Result<Term, StoreError> {
        match self.data.encoding(key) {
            Some(e) => Ok(codec::deserialize(e)?),
            None => Err(StoreError::UnknownKey(key)),
        }
    }
}
