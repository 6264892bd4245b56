//! Wire representation of a tunneled request.

use crate::header::{self, DecodedHeader};

/// Form field carrying the tunneled method.
pub const METHOD_FIELD: &str = "method";
/// Form field carrying one encoded header. May repeat.
pub const HEADER_FIELD: &str = "header";
/// Form field carrying the serialized body.
pub const BODY_FIELD: &str = "body";

/// A logical request packed into multipart form fields.
///
/// Field order on the wire is insignificant. `headers` keeps the encoded
/// `"Name: Value"` strings in the order they were produced or received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    method: Option<String>,
    headers: Vec<String>,
    body: Option<String>,
}

impl Envelope {
    /// Creates an envelope for the given method with no headers and no body.
    pub fn new(method: impl Into<String>) -> Self {
        Envelope {
            method: Some(method.into()),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends an encoded `header` field for the pair.
    pub fn push_header(&mut self, name: &str, value: &str) {
        self.headers.push(header::encode(name, value));
    }

    /// Sets the `body` field.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    /// The tunneled method, absent when a received envelope carried none.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Encoded `header` field values.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Decodes every `header` field into name/value pairs.
    pub fn decoded_headers(&self, lowercase: bool) -> impl Iterator<Item = DecodedHeader> + '_ {
        self.headers
            .iter()
            .map(move |field| header::decode(field, lowercase))
    }

    /// The `body` field, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Consumes the envelope returning its body.
    pub fn into_body(self) -> Option<String> {
        self.body
    }

    /// Form fields in wire order: `method`, every `header`, then `body`.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = Vec::with_capacity(self.headers.len() + 2);
        if let Some(method) = &self.method {
            fields.push((METHOD_FIELD, method.as_str()));
        }
        fields.extend(self.headers.iter().map(|h| (HEADER_FIELD, h.as_str())));
        if let Some(body) = &self.body {
            fields.push((BODY_FIELD, body.as_str()));
        }
        fields
    }

    /// Builds an envelope from parsed form fields.
    ///
    /// Whatever shape the form parser gives `header` (absent, one, many) ends
    /// up as an ordered list. Unknown fields are ignored; a repeated `method`
    /// or `body` keeps the last value.
    pub fn from_fields<I, N, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let mut envelope = Envelope::default();
        for (name, value) in fields {
            match name.as_ref() {
                METHOD_FIELD => envelope.method = Some(value.into()),
                HEADER_FIELD => envelope.headers.push(value.into()),
                BODY_FIELD => envelope.body = Some(value.into()),
                other => tracing::trace!(field = other, "ignoring unknown envelope field"),
            }
        }
        envelope
    }
}
