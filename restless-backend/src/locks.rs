//! Per-key serialization of store operations.

use std::sync::Arc;

use dashmap::DashMap;
use restless_core::CacheKey;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per cache key.
///
/// Operations on the same key run one after another; different keys never
/// wait on each other. A key's mutex is dropped from the map as soon as no
/// one holds or waits for it.
#[derive(Debug, Clone, Default)]
pub struct KeyLocks {
    locks: Arc<DashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    ///
    /// Cancelling the wait still reclaims the key's mutex when nobody else
    /// needs it.
    pub async fn lock(&self, key: &CacheKey) -> KeyGuard {
        let mutex = self.locks.entry(key.clone()).or_default().clone();
        let reclaim = Reclaim {
            locks: self.locks.clone(),
            key: key.clone(),
        };
        let guard = mutex.lock_owned().await;
        KeyGuard {
            guard: Some(guard),
            _reclaim: reclaim,
        }
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Drops the key's map entry once its mutex has no other users.
#[derive(Debug)]
struct Reclaim {
    locks: Arc<DashMap<CacheKey, Arc<Mutex<()>>>>,
    key: CacheKey,
}

impl Drop for Reclaim {
    fn drop(&mut self) {
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

/// Exclusive access to one key, released on drop.
#[derive(Debug)]
pub struct KeyGuard {
    guard: Option<OwnedMutexGuard<()>>,
    _reclaim: Reclaim,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // The mutex must be released before `_reclaim` counts its users.
        drop(self.guard.take());
    }
}
