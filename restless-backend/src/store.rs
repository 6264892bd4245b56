//! Response cache store.
//!
//! [`ResponseStore`] sits between the client and a [`Backend`]. It decides
//! whether a response may be stored (via [`Expiration`]), hands out
//! independent copies of stored responses, and prunes expired entries the
//! first time a lookup finds them.
//!
//! ## Prune after serve
//!
//! A lookup that finds an expired entry removes it from the backend but
//! still returns it, marked [`Lookup::Expired`]. The next lookup for the
//! same key misses. Callers decide whether a just-expired response is good
//! enough for them.

use std::fmt;
use std::sync::Arc;

use restless_core::{CacheKey, CachedResponse, Clock, Expiration, SystemClock};
use tracing::{debug, trace, warn};

use crate::format::{Format, JsonFormat};
use crate::metrics::{record_lookup, record_prune, record_write};
use crate::{Backend, BackendResult, CacheValue, DeleteStatus, KeyLocks, NoopBackend};

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The entry is still fresh.
    Fresh(CachedResponse),
    /// The entry had expired and was pruned by this lookup.
    Expired(CachedResponse),
}

impl Lookup {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Lookup::Fresh(_))
    }

    pub fn response(&self) -> &CachedResponse {
        match self {
            Lookup::Fresh(response) | Lookup::Expired(response) => response,
        }
    }

    pub fn into_response(self) -> CachedResponse {
        match self {
            Lookup::Fresh(response) | Lookup::Expired(response) => response,
        }
    }
}

/// Cache of responses keyed by [`CacheKey`].
///
/// Cheap to clone; clones share the backend and the per-key locks.
///
/// ```
/// use restless_backend::ResponseStore;
///
/// // Without a storage capability every lookup misses.
/// let store = ResponseStore::disabled();
/// assert_eq!(store.backend_name(), "noop");
/// ```
#[derive(Clone)]
pub struct ResponseStore {
    backend: Arc<dyn Backend>,
    format: Arc<dyn Format>,
    clock: Arc<dyn Clock>,
    locks: KeyLocks,
}

impl ResponseStore {
    /// Creates a store over `backend` with JSON values and the system clock.
    pub fn new<B>(backend: B) -> Self
    where
        B: Backend + 'static,
    {
        ResponseStore {
            backend: Arc::new(backend),
            format: Arc::new(JsonFormat),
            clock: Arc::new(SystemClock),
            locks: KeyLocks::new(),
        }
    }

    /// A store that never caches anything.
    pub fn disabled() -> Self {
        Self::new(NoopBackend)
    }

    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_format<F>(mut self, format: F) -> Self
    where
        F: Format + 'static,
    {
        self.format = Arc::new(format);
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Looks `key` up, pruning the entry when it has expired.
    ///
    /// The expired response is still returned, as [`Lookup::Expired`].
    pub async fn lookup(&self, key: &CacheKey) -> BackendResult<Option<Lookup>> {
        let backend = self.backend.name();
        let _guard = self.locks.lock(key).await;

        let value = match self.backend.read(key).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                trace!(%key, "cache miss");
                record_lookup(backend, "miss");
                return Ok(None);
            }
            Err(error) => {
                record_lookup(backend, "error");
                return Err(error);
            }
        };

        let response = match self.format.deserialize(value.data()) {
            Ok(response) => response,
            Err(error) => {
                record_lookup(backend, "error");
                return Err(error.into());
            }
        };

        if !response.expiration().is_expired(self.clock.now()) {
            debug!(%key, "cache hit");
            record_lookup(backend, "hit");
            return Ok(Some(Lookup::Fresh(response)));
        }

        debug!(%key, "cache hit on expired entry");
        record_lookup(backend, "expired");
        if let Err(error) = self.remove(key).await {
            warn!(%key, %error, "failed to prune expired entry");
        }
        Ok(Some(Lookup::Expired(response)))
    }

    /// Stores a copy of `response` under `key` unless it forbids caching.
    ///
    /// Returns the expiration the decision was based on.
    pub async fn store(&self, key: &CacheKey, response: &CachedResponse) -> BackendResult<Expiration> {
        let backend = self.backend.name();
        let expiration = response.expiration();
        if !expiration.is_cacheable() {
            debug!(%key, "response forbids caching, skipping store");
            record_write(backend, "skipped");
            return Ok(expiration);
        }

        let raw = self.format.serialize(response)?;
        let _guard = self.locks.lock(key).await;
        match self
            .backend
            .write(key, CacheValue::new(raw, expiration.expires_at()))
            .await
        {
            Ok(()) => {
                debug!(%key, expire = ?expiration.expires_at(), "response stored");
                record_write(backend, "written");
                Ok(expiration)
            }
            Err(error) => {
                record_write(backend, "error");
                Err(error)
            }
        }
    }

    /// Removes `key` if `response`, as read from the store, has expired.
    ///
    /// Returns `None` when the response is still fresh and nothing was touched.
    pub async fn prune(
        &self,
        key: &CacheKey,
        response: &CachedResponse,
    ) -> BackendResult<Option<DeleteStatus>> {
        if !response.expiration().is_expired(self.clock.now()) {
            return Ok(None);
        }
        let _guard = self.locks.lock(key).await;
        self.remove(key).await.map(Some)
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        let status = self.backend.remove(key).await?;
        trace!(%key, ?status, "pruned expired entry");
        record_prune(self.backend.name());
        Ok(status)
    }
}

impl fmt::Debug for ResponseStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseStore")
            .field("backend", &self.backend.name())
            .field("format", &self.format.name())
            .field("locks", &self.locks.len())
            .finish()
    }
}
