use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::Response;
use url::Url;

use crate::envelope::Envelope;

/// Sends envelopes over the network as `multipart/form-data` POST requests.
///
/// The client never retries or times out on its own; both are left to the
/// implementation.
///
/// # Examples
///
/// ```rust,ignore
/// use restless_core::{Envelope, Transport};
///
/// struct Canned(http::Response<bytes::Bytes>);
///
/// #[async_trait::async_trait]
/// impl Transport for Canned {
///     type Error = std::convert::Infallible;
///
///     async fn send(&self, _url: &url::Url, _envelope: Envelope)
///         -> Result<http::Response<bytes::Bytes>, Self::Error>
///     {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Network error type, handed back to callers unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// POSTs `envelope` to `url` and returns the buffered response.
    async fn send(&self, url: &Url, envelope: Envelope) -> Result<Response<Bytes>, Self::Error>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    type Error = T::Error;

    async fn send(&self, url: &Url, envelope: Envelope) -> Result<Response<Bytes>, Self::Error> {
        (**self).send(url, envelope).await
    }
}
