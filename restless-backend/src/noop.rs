use async_trait::async_trait;
use restless_core::{CacheKey, Raw};

use crate::{Backend, BackendResult, CacheValue, DeleteStatus};

/// Backend for hosts without persistent response storage.
///
/// Reads always miss and writes are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackend;

#[async_trait]
impl Backend for NoopBackend {
    async fn read(&self, _key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        Ok(None)
    }

    async fn write(&self, _key: &CacheKey, _value: CacheValue<Raw>) -> BackendResult<()> {
        Ok(())
    }

    async fn remove(&self, _key: &CacheKey) -> BackendResult<DeleteStatus> {
        Ok(DeleteStatus::Missing)
    }

    fn name(&self) -> &str {
        "noop"
    }
}
