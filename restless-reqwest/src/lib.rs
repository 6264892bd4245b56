//! [`reqwest`] transport for the restless request tunnel.
//!
//! [`ReqwestTransport`] posts each [`Envelope`](restless_core::Envelope) as a
//! `multipart/form-data` body through a [`reqwest_middleware`] client, so
//! retries, tracing or auth middleware can be stacked the usual way.
//!
//! ```no_run
//! use restless::{ClientConfig, LogicalRequest, ResponseStore, RestlessClient};
//! use restless_reqwest::ReqwestTransport;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestlessClient::new(
//!     ReqwestTransport::from(reqwest::Client::new()),
//!     ResponseStore::disabled(),
//!     ClientConfig::default(),
//! );
//! let response = client.request(LogicalRequest::get("http://h/r/42")).await?;
//! # Ok(())
//! # }
//! ```

mod transport;

pub use transport::ReqwestTransport;

pub use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
