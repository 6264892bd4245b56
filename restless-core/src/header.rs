//! Header codec.
//!
//! Every tunneled header travels as one `header` form field holding
//! `"<name>: <value>"`. Values are not escaped: decoding splits on the
//! *first* `": "` only, so a value may contain the separator again, but a
//! name containing `": "` cannot be recovered.

/// Separator between header name and value inside an encoded field.
pub const SEPARATOR: &str = ": ";

/// A header name/value pair recovered from an encoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHeader {
    /// Header name, lowercased when requested.
    pub name: String,
    /// Header value, empty when the field had no separator.
    pub value: String,
}

/// Encodes a header pair into a single field value.
///
/// ```
/// use restless_core::header;
///
/// assert_eq!(header::encode("Authorization", "Bearer T"), "Authorization: Bearer T");
/// ```
pub fn encode(name: &str, value: &str) -> String {
    let mut field = String::with_capacity(name.len() + SEPARATOR.len() + value.len());
    field.push_str(name);
    field.push_str(SEPARATOR);
    field.push_str(value);
    field
}

/// Decodes a field produced by [`encode`].
///
/// A field without a separator decodes to the whole field as name and an
/// empty value.
///
/// ```
/// use restless_core::header;
///
/// let header = header::decode("X-Test: a: b", false);
/// assert_eq!(header.name, "X-Test");
/// assert_eq!(header.value, "a: b");
/// ```
pub fn decode(field: &str, lowercase: bool) -> DecodedHeader {
    let (name, value) = field.split_once(SEPARATOR).unwrap_or((field, ""));
    let name = if lowercase {
        name.to_lowercase()
    } else {
        name.to_owned()
    };
    DecodedHeader {
        name,
        value: value.to_owned(),
    }
}
