//! The request as the caller means it.

use http::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::envelope::Envelope;

/// A logical HTTP request to be tunneled.
///
/// Built once per call and consumed by the encoder.
///
/// ```
/// use restless_core::LogicalRequest;
///
/// let request = LogicalRequest::get("http://h/r/42")
///     .header("Authorization", "Bearer T")
///     .query("page", "2");
///
/// let url = request.resolve_url(None).unwrap();
/// assert_eq!(url.as_str(), "http://h/r/42?page=2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalRequest {
    url: String,
    method: Method,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl LogicalRequest {
    /// Creates a request with the given method and URL.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        LogicalRequest {
            url: url.into(),
            method,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::HEAD, url)
    }

    /// Adds a header. Names are kept exactly as given.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a query parameter. Repeated keys accumulate.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the body to an already structured JSON value.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the body from any serializable value.
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, serde_json::Error> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Resolves the final URL: `url` against `base` when relative, with every
    /// `query` pair appended after the ones already present.
    pub fn resolve_url(&self, base: Option<&Url>) -> Result<Url, url::ParseError> {
        let mut url = Url::options().base_url(base).parse(&self.url)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }

    /// Whether the body travels in the envelope for this method.
    pub fn carries_body(&self) -> bool {
        self.method == Method::POST || self.method == Method::PUT
    }

    /// Packs method, headers and (for POST/PUT) the JSON-serialized body.
    pub fn to_envelope(&self) -> Result<Envelope, serde_json::Error> {
        let mut envelope = Envelope::new(self.method.as_str());
        for (name, value) in &self.headers {
            envelope.push_header(name, value);
        }
        match &self.body {
            Some(body) if self.carries_body() && !is_falsy(body) => {
                envelope.set_body(serde_json::to_string(body)?);
            }
            _ => {}
        }
        Ok(envelope)
    }
}

/// `null`, `false`, zero and `""` count as "no body".
fn is_falsy(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn query_is_additive() {
        let request = LogicalRequest::get("http://h/r?a=1")
            .query("a", "2")
            .query("b", "x y");
        let url = request.resolve_url(None).unwrap();
        assert_eq!(url.as_str(), "http://h/r?a=1&a=2&b=x+y");
    }

    #[test]
    fn url_without_query_stays_untouched() {
        let url = LogicalRequest::get("http://h/r").resolve_url(None).unwrap();
        assert_eq!(url.as_str(), "http://h/r");
    }

    #[test]
    fn relative_url_needs_base() {
        let request = LogicalRequest::get("/resource/1");
        assert!(request.resolve_url(None).is_err());

        let base = Url::parse("http://localhost:3000").unwrap();
        let url = request.resolve_url(Some(&base)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/resource/1");
    }

    #[test]
    fn body_only_travels_for_post_and_put() {
        let body = json!({"id": 42});
        for (method, expected) in [
            (Method::POST, Some(r#"{"id":42}"#)),
            (Method::PUT, Some(r#"{"id":42}"#)),
            (Method::GET, None),
            (Method::DELETE, None),
            (Method::HEAD, None),
        ] {
            let envelope = LogicalRequest::new(method.clone(), "http://h/")
                .body(body.clone())
                .to_envelope()
                .unwrap();
            assert_eq!(envelope.body(), expected, "method {method}");
        }
    }

    #[test]
    fn falsy_bodies_are_skipped() {
        for body in [Value::Null, json!(false), json!(0), json!(0.0), json!("")] {
            let envelope = LogicalRequest::post("http://h/")
                .body(body.clone())
                .to_envelope()
                .unwrap();
            assert_eq!(envelope.body(), None, "body {body}");
        }
    }

    #[test]
    fn empty_containers_and_truthy_scalars_are_sent() {
        for (body, expected) in [
            (json!(true), "true"),
            (json!(1), "1"),
            (json!("0"), r#""0""#),
            (json!([]), "[]"),
            (json!({}), "{}"),
        ] {
            let envelope = LogicalRequest::put("http://h/")
                .body(body)
                .to_envelope()
                .unwrap();
            assert_eq!(envelope.body(), Some(expected));
        }
    }

    #[test]
    fn string_body_is_json_encoded() {
        let envelope = LogicalRequest::put("http://h/")
            .json("plain")
            .unwrap()
            .to_envelope()
            .unwrap();
        assert_eq!(envelope.body(), Some(r#""plain""#));
    }

    #[test]
    fn headers_keep_caller_casing() {
        let envelope = LogicalRequest::get("http://h/r/42")
            .header("Authorization", "Bearer T")
            .header("x-correlation-id", "abc")
            .to_envelope()
            .unwrap();
        assert_eq!(envelope.method(), Some("GET"));
        assert_eq!(
            envelope.headers(),
            ["Authorization: Bearer T".to_owned(), "x-correlation-id: abc".to_owned()]
        );
    }
}
