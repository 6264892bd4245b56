//! Rewriting an inbound request from its envelope.
//!
//! [`apply`] is framework agnostic: it works on [`http::request::Parts`] and
//! hands back the tunneled body so the integration can swap it in.

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, HeaderName, HeaderValue};
use http::request::Parts;
use http::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::envelope::Envelope;

/// Options of the decoding side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Lowercase tunneled header names before they are applied.
    #[serde(default)]
    pub lowercase_headers: bool,
}

/// Envelope could not be turned into a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The envelope has no `method` field.
    #[error("tunneled request has no `method` field")]
    MissingMethod,
    /// The `method` field is not a valid HTTP method token.
    #[error("tunneled method {0:?} is not a valid HTTP method")]
    InvalidMethod(String),
}

/// Overrides method and headers in `parts` and returns the tunneled body.
///
/// Tunneled headers overwrite same-named headers of the carrying POST.
/// The carrier's `Content-Length` describes the multipart body, so it is
/// dropped and, when a body was tunneled, replaced by the body length
/// unless the envelope supplied its own. Headers that `http` cannot
/// represent are skipped.
pub fn apply(
    parts: &mut Parts,
    envelope: Envelope,
    options: DecodeOptions,
) -> Result<Option<Bytes>, DecodeError> {
    let method = envelope.method().ok_or(DecodeError::MissingMethod)?;
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| DecodeError::InvalidMethod(method.to_owned()))?;

    parts.headers.remove(CONTENT_LENGTH);
    let mut tunneled_length = false;
    for header in envelope.decoded_headers(options.lowercase_headers) {
        let name = match HeaderName::from_bytes(header.name.as_bytes()) {
            Ok(name) => name,
            Err(_) => {
                warn!(name = %header.name, "skipping tunneled header with invalid name");
                continue;
            }
        };
        let value = match HeaderValue::from_str(&header.value) {
            Ok(value) => value,
            Err(_) => {
                warn!(%name, "skipping tunneled header with invalid value");
                continue;
            }
        };
        tunneled_length |= name == CONTENT_LENGTH;
        parts.headers.insert(name, value);
    }

    let body = envelope.into_body().map(Bytes::from);
    if let Some(body) = &body {
        if !tunneled_length {
            parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        }
    }

    debug!(%method, uri = %parts.uri, "decoded tunneled request");
    parts.method = method;
    Ok(body)
}
