//! Tunnel HTTP requests through multipart POSTs, with a response cache.
//!
//! Some intermediaries only let plain `POST` requests with a
//! `multipart/form-data` body through. [`RestlessClient`] packs the method,
//! headers and JSON body of a [`LogicalRequest`] into such a POST (an
//! [`Envelope`]) and hands it to a [`Transport`]. The server side unpacks it
//! again, see `restless-tower`.
//!
//! Successful responses are cached according to their `Cache-Control`,
//! `Expires` and `Date` headers, so repeated requests for the same URL are
//! answered without a round-trip while the response is fresh.
//!
//! ```no_run
//! # use restless::{ClientConfig, RestlessClient, ResponseStore, Transport, LogicalRequest};
//! # async fn run<T: Transport>(transport: T) -> Result<(), restless::ClientError<T::Error>> {
//! let client = RestlessClient::new(transport, ResponseStore::disabled(), ClientConfig::default());
//!
//! let response = client
//!     .request(LogicalRequest::get("http://h/r/42").header("Authorization", "Bearer T"))
//!     .await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod offload;

pub use client::RestlessClient;
pub use config::{ClientConfig, ClientConfigBuilder, StalePolicy};
pub use encoder::{CacheStatus, EncodeError, Encoded, RequestEncoder, Tunnel};
pub use error::ClientError;
pub use offload::WriteOffload;

pub use restless_backend::{Backend, NoopBackend, ResponseStore};
pub use restless_core::{
    CacheKey, CachedResponse, Envelope, KeyScope, LogicalRequest, ManualClock, Transport,
};
