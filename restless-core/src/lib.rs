//! Core types of the restless request tunneling protocol.
//!
//! A *logical* HTTP request (any method, headers and body) is packed into a
//! single `multipart/form-data` POST so it can cross intermediaries that only
//! let plain POSTs through. This crate holds the pieces shared by both sides
//! of the tunnel:
//!
//! - [`header`] - the `"Name: Value"` header codec
//! - [`Envelope`] - the wire representation of a tunneled request
//! - [`LogicalRequest`] - the request as the caller means it
//! - [`decoder`] - rewriting inbound request parts from an envelope
//! - [`Expiration`] - cache freshness computed from response headers
//! - [`CachedResponse`] and [`CacheKey`] - what the client cache stores and under which key
//! - [`Clock`] and [`Transport`] - collaborators injected into the client
//!
//! ## Wire format
//!
//! | field    | cardinality | content                               |
//! |----------|-------------|---------------------------------------|
//! | `method` | exactly 1   | HTTP method name, uppercase           |
//! | `header` | 0..N        | `"<Name>: <Value>"`, one per field    |
//! | `body`   | 0..1        | text-serialized body, POST/PUT only   |

pub mod clock;
pub mod decoder;
pub mod envelope;
pub mod expiration;
pub mod header;
pub mod key;
pub mod request;
pub mod response;
pub mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use decoder::{DecodeError, DecodeOptions};
pub use envelope::{BODY_FIELD, Envelope, HEADER_FIELD, METHOD_FIELD};
pub use expiration::Expiration;
pub use header::DecodedHeader;
pub use key::{CacheKey, DEFAULT_NAMESPACE, KeyScope};
pub use request::LogicalRequest;
pub use response::CachedResponse;
pub use transport::Transport;

/// Raw cached data.
pub type Raw = bytes::Bytes;
