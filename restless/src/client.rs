//! The caching tunnel client.

use bytes::Bytes;
use http::Response;
use restless_backend::ResponseStore;
use restless_core::{CacheKey, CachedResponse, LogicalRequest, Transport};
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::encoder::{CacheStatus, Encoded, RequestEncoder, Tunnel};
use crate::error::ClientError;
use crate::offload::WriteOffload;

/// Sends logical requests through a [`Transport`], caching successful responses.
///
/// Successful (2xx) responses are stored in the background; the caller gets
/// the response as soon as the transport returns it. Use
/// [`flush`](Self::flush) to wait for those writes.
#[derive(Debug, Clone)]
pub struct RestlessClient<T> {
    encoder: RequestEncoder,
    transport: T,
    offload: WriteOffload,
}

impl<T> RestlessClient<T>
where
    T: Transport,
{
    pub fn new(transport: T, store: ResponseStore, config: ClientConfig) -> Self {
        RestlessClient {
            encoder: RequestEncoder::new(store, config),
            transport,
            offload: WriteOffload::new(),
        }
    }

    /// Client with default configuration that never caches.
    pub fn uncached(transport: T) -> Self {
        Self::new(transport, ResponseStore::disabled(), ClientConfig::default())
    }

    /// Performs `request`, from cache when possible.
    ///
    /// Transport errors are returned as [`ClientError::Transport`] unchanged.
    #[instrument(skip_all, fields(method = %request.method(), url = request.url()))]
    pub async fn request(
        &self,
        request: LogicalRequest,
    ) -> Result<Response<Bytes>, ClientError<T::Error>> {
        let Tunnel { url, key, envelope } = match self.encoder.encode(&request).await? {
            Encoded::Cached(cached, status) => {
                let mut response = cached.into_response();
                response.extensions_mut().insert(status);
                return Ok(response);
            }
            Encoded::Tunnel(tunnel) => tunnel,
        };

        let mut response = self
            .transport
            .send(&url, envelope)
            .await
            .map_err(ClientError::Transport)?;
        debug!(status = %response.status(), "tunneled request completed");

        if response.status().is_success() {
            self.store_in_background(key, CachedResponse::from_response(&response));
        }
        response.extensions_mut().insert(CacheStatus::Miss);
        Ok(response)
    }

    fn store_in_background(&self, key: CacheKey, response: CachedResponse) {
        let store = self.encoder.store().clone();
        self.offload.spawn("store", async move {
            if let Err(error) = store.store(&key, &response).await {
                warn!(%key, %error, "failed to store response");
            }
        });
    }

    /// Waits for every background cache write spawned so far.
    pub async fn flush(&self) {
        self.offload.wait_all().await;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &ResponseStore {
        self.encoder.store()
    }

    pub fn config(&self) -> &ClientConfig {
        self.encoder.config()
    }

    pub fn offload(&self) -> &WriteOffload {
        &self.offload
    }
}
