//! Builder for configuring [`MokaBackend`].

use moka::future::CacheBuilder;
use moka::policy::EvictionPolicy;
use restless_backend::CacheValue;
use restless_core::{CacheKey, Raw};

use crate::backend::MokaBackend;

/// Marker: no capacity chosen yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Capacity bounded by number of entries.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) u64);

/// Capacity bounded by approximate memory use in bytes.
#[derive(Debug, Clone, Copy)]
pub struct ByteCapacity(pub(crate) u64);

/// Builder for [`MokaBackend`]. A capacity must be chosen before `build`.
#[derive(Debug)]
pub struct MokaBackendBuilder<Cap> {
    capacity: Cap,
    name: String,
    eviction_policy: Option<EvictionPolicy>,
}

impl MokaBackendBuilder<NoCapacity> {
    /// Creates a builder with no capacity set.
    pub fn new() -> Self {
        Self {
            capacity: NoCapacity,
            name: "moka".to_owned(),
            eviction_policy: None,
        }
    }

    /// Bounds the cache by number of entries.
    pub fn max_entries(self, capacity: u64) -> MokaBackendBuilder<EntryCapacity> {
        MokaBackendBuilder {
            capacity: EntryCapacity(capacity),
            name: self.name,
            eviction_policy: self.eviction_policy,
        }
    }

    /// Bounds the cache by key and value size in bytes.
    pub fn max_bytes(self, bytes: u64) -> MokaBackendBuilder<ByteCapacity> {
        MokaBackendBuilder {
            capacity: ByteCapacity(bytes),
            name: self.name,
            eviction_policy: self.eviction_policy,
        }
    }
}

impl Default for MokaBackendBuilder<NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cap> MokaBackendBuilder<Cap> {
    /// Name reported in logs and metrics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Eviction policy, TinyLFU by default.
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }

    fn apply_policy(
        &self,
        builder: CacheBuilder<CacheKey, CacheValue<Raw>, moka::future::Cache<CacheKey, CacheValue<Raw>>>,
    ) -> CacheBuilder<CacheKey, CacheValue<Raw>, moka::future::Cache<CacheKey, CacheValue<Raw>>> {
        match &self.eviction_policy {
            Some(policy) => builder.eviction_policy(policy.clone()),
            None => builder,
        }
    }
}

impl MokaBackendBuilder<EntryCapacity> {
    /// Builds the backend.
    pub fn build(self) -> MokaBackend {
        let builder = self.apply_policy(CacheBuilder::new(self.capacity.0));
        MokaBackend::from_parts(builder.build(), self.name)
    }
}

impl MokaBackendBuilder<ByteCapacity> {
    /// Builds the backend.
    pub fn build(self) -> MokaBackend {
        let builder = CacheBuilder::default()
            .max_capacity(self.capacity.0)
            .weigher(|key: &CacheKey, value: &CacheValue<Raw>| -> u32 {
                let size = key.url().len() + key.namespace().len() + value.data().len();
                u32::try_from(size).unwrap_or(u32::MAX)
            });
        let builder = self.apply_policy(builder);
        MokaBackend::from_parts(builder.build(), self.name)
    }
}
