//! Client side of the tunnel: cache check and envelope construction.

use restless_backend::{Lookup, ResponseStore};
use restless_core::{CacheKey, CachedResponse, Envelope, LogicalRequest};
use tracing::{debug, warn};
use url::Url;

use crate::config::{ClientConfig, StalePolicy};

/// An envelope ready to be posted.
#[derive(Debug, Clone, PartialEq)]
pub struct Tunnel {
    /// Final URL, query merged in.
    pub url: Url,
    /// Key the response will be cached under.
    pub key: CacheKey,
    /// The packed request.
    pub envelope: Envelope,
}

/// Where a response handed to the caller came from.
///
/// [`RestlessClient`](crate::RestlessClient) puts it into the extensions of
/// every response it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Fresh cached response.
    Hit,
    /// Expired cached response, served once under [`StalePolicy::Return`].
    Stale,
    /// Fetched over the network.
    Miss,
}

/// Result of encoding a logical request.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    /// A cached response can be returned right away. The status is never `Miss`.
    Cached(CachedResponse, CacheStatus),
    /// Nothing usable in cache; the envelope has to go over the network.
    Tunnel(Tunnel),
}

/// Turns logical requests into cached responses or envelopes.
#[derive(Debug, Clone)]
pub struct RequestEncoder {
    store: ResponseStore,
    config: ClientConfig,
}

impl RequestEncoder {
    pub fn new(store: ResponseStore, config: ClientConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &ResponseStore {
        &self.store
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves the URL, consults the cache and, on a miss, packs the request.
    ///
    /// A failing cache backend counts as a miss.
    pub async fn encode(&self, request: &LogicalRequest) -> Result<Encoded, EncodeError> {
        let url = request.resolve_url(self.config.base_url.as_ref())?;
        let key = CacheKey::new(
            self.config.namespace.as_str(),
            self.config.key,
            request.method(),
            &url,
        );

        match self.store.lookup(&key).await {
            Ok(Some(Lookup::Fresh(response))) => {
                debug!(%key, "serving cached response");
                return Ok(Encoded::Cached(response, CacheStatus::Hit));
            }
            Ok(Some(Lookup::Expired(response))) => match self.config.stale {
                StalePolicy::Return => {
                    debug!(%key, "serving expired cached response one last time");
                    return Ok(Encoded::Cached(response, CacheStatus::Stale));
                }
                StalePolicy::Revalidate => {
                    debug!(%key, "cached response expired, revalidating");
                }
            },
            Ok(None) => {}
            Err(error) => {
                warn!(%key, %error, "cache lookup failed, going to the network");
            }
        }

        let envelope = request.to_envelope()?;
        Ok(Encoded::Tunnel(Tunnel { url, key, envelope }))
    }
}

/// Failure to build a tunnel for a logical request.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Body(#[from] serde_json::Error),
}

impl<E> From<EncodeError> for crate::ClientError<E> {
    fn from(error: EncodeError) -> Self {
        match error {
            EncodeError::InvalidUrl(error) => crate::ClientError::InvalidUrl(error),
            EncodeError::Body(error) => crate::ClientError::Body(error),
        }
    }
}
