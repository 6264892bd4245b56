//! Moka backend implementation.

use async_trait::async_trait;
use moka::future::Cache;
use restless_backend::{Backend, BackendResult, CacheValue, DeleteStatus};
use restless_core::{CacheKey, Raw};
use tracing::trace;

/// In-memory response storage powered by Moka.
///
/// Reads are lock-free and writes use fine-grained locking, so a single
/// instance can be shared by every client in the process.
///
/// # Caveats
///
/// - Data is **not persisted**; it is lost on process restart
/// - Data is **not shared** across processes
#[derive(Clone)]
pub struct MokaBackend {
    cache: Cache<CacheKey, CacheValue<Raw>>,
    name: String,
}

impl std::fmt::Debug for MokaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaBackend")
            .field("name", &self.name)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl MokaBackend {
    /// Creates a new builder. Pick a capacity with
    /// [`max_entries`](crate::MokaBackendBuilder::max_entries) or
    /// [`max_bytes`](crate::MokaBackendBuilder::max_bytes).
    pub fn builder() -> crate::builder::MokaBackendBuilder<crate::builder::NoCapacity> {
        crate::builder::MokaBackendBuilder::new()
    }

    pub(crate) fn from_parts(cache: Cache<CacheKey, CacheValue<Raw>>, name: String) -> Self {
        MokaBackend { cache, name }
    }

    /// The underlying Moka cache.
    pub fn cache(&self) -> &Cache<CacheKey, CacheValue<Raw>> {
        &self.cache
    }
}

#[async_trait]
impl Backend for MokaBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        Ok(self.cache.get(key).await)
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        trace!(%key, bytes = value.data().len(), "moka insert");
        self.cache.insert(key.clone(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        match self.cache.remove(key).await {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
