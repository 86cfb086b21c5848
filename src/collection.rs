//! Collection managers: in-memory CRUD mirrored to the store.
//!
//! Every operation mutates the caller's in-memory collection and
//! immediately persists the full resulting collection - there is no
//! deferred or batched write and no optimistic-concurrency check.

use crate::backend::StorageBackend;
use crate::error::Result;
use crate::model::StoreRecord;
use crate::store::{Scope, Store};

/// Add/update/delete over any stored collection, bound to one scope.
///
/// The manager never owns the collection: callers thread their in-memory
/// `Vec<T>` through each call, keeping application state explicit.
#[derive(Clone)]
pub struct CollectionManager<B: StorageBackend> {
    store: Store<B>,
    scope: Scope,
}

impl<B: StorageBackend> CollectionManager<B> {
    /// Create a manager writing through `store` under `scope`.
    pub fn new(store: Store<B>, scope: Scope) -> Self {
        CollectionManager { store, scope }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Prepend a record and persist the whole collection.
    pub async fn add<T: StoreRecord>(&self, records: &mut Vec<T>, record: T) -> Result<()> {
        records.insert(0, record);
        self.store.save(&self.scope, records).await
    }

    /// Replace the record with the same id and persist.
    ///
    /// Returns whether a record was replaced. A miss still rewrites the
    /// (unchanged) collection.
    pub async fn update<T: StoreRecord>(&self, records: &mut Vec<T>, record: T) -> Result<bool> {
        let mut replaced = false;
        for existing in records.iter_mut() {
            if existing.record_id() == record.record_id() {
                *existing = record.clone();
                replaced = true;
            }
        }
        self.store.save(&self.scope, records).await?;
        Ok(replaced)
    }

    /// Remove the record with `id` and persist. Unconditional: no
    /// confirmation step exists at this layer.
    ///
    /// Returns whether a record was removed.
    pub async fn delete<T: StoreRecord>(&self, records: &mut Vec<T>, id: &str) -> Result<bool> {
        let before = records.len();
        records.retain(|r| r.record_id() != id);
        self.store.save(&self.scope, records).await?;
        Ok(records.len() != before)
    }
}
