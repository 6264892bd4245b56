//! Serializable response snapshot.

use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode, Version};
use serde::{Deserialize, Serialize};

use crate::expiration::Expiration;

/// A fully buffered response as kept by the client cache.
///
/// Built from a clone of the transport's response, so the original stays
/// usable by the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CachedResponse {
    #[serde(with = "http_serde::status_code")]
    status: StatusCode,
    #[serde(with = "http_serde::version")]
    version: Version,
    #[serde(with = "http_serde::header_map")]
    headers: HeaderMap,
    body: Bytes,
}

impl CachedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        CachedResponse {
            status,
            version: Version::HTTP_11,
            headers,
            body,
        }
    }

    /// Snapshots a buffered response without consuming it.
    pub fn from_response(response: &Response<Bytes>) -> Self {
        CachedResponse {
            status: response.status(),
            version: response.version(),
            headers: response.headers().clone(),
            body: response.body().clone(),
        }
    }

    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers;
        response
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Freshness of this response according to its own headers.
    pub fn expiration(&self) -> Expiration {
        Expiration::from_headers(&self.headers)
    }
}

impl From<Response<Bytes>> for CachedResponse {
    fn from(response: Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        CachedResponse {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
        }
    }
}
