//! Storage abstraction for Vitals.
//!
//! The [`KvStore`] trait is the only thing the ledger needs from a backend:
//! string values addressed by string keys. Collections and scalar counters
//! are encoded on top of it by [`crate::records`].
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

pub use memory::InMemoryStore;

/// Abstract key-value backend.
///
/// All operations are async (via `async-trait`) so a database-backed store
/// can sit behind the same seam as the in-memory one. Every `put` must be
/// durable by the time it returns.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get`](KvStore::get) | Read one value, `None` if the key is absent |
/// | [`put`](KvStore::put) | Insert or replace one value |
/// | [`delete`](KvStore::delete) | Remove a key; absent keys are not an error |
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn put(&self, key: &str, value: &str) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;
}

/// Shared handles delegate to the inner store, so a caller can keep a
/// reference to a backend it has handed to a ledger.
#[async_trait]
impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }
}
