//! Cache key construction.
//!
//! Responses are keyed by the canonical form of the resolved request URL,
//! inside a namespace. By default the method is **not** part of the key, so
//! a GET and a POST to the same URL share an entry. [`KeyScope::MethodAndUrl`]
//! makes the key composite.
//!
//! ```
//! use http::Method;
//! use restless_core::{CacheKey, KeyScope};
//! use url::Url;
//!
//! let url = Url::parse("http://h/r/42?a=1").unwrap();
//!
//! let key = CacheKey::new("RESTLESS_CACHE", KeyScope::Url, &Method::GET, &url);
//! assert_eq!(key.to_string(), "RESTLESS_CACHE:http://h/r/42?a=1");
//!
//! let key = CacheKey::new("RESTLESS_CACHE", KeyScope::MethodAndUrl, &Method::GET, &url);
//! assert_eq!(key.to_string(), "RESTLESS_CACHE:GET http://h/r/42?a=1");
//! ```

use std::fmt;
use std::sync::Arc;

use http::Method;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use url::Url;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "RESTLESS_CACHE";

/// Which parts of a request make up its cache key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyScope {
    /// Resolved URL only.
    #[default]
    Url,
    /// Method and resolved URL.
    MethodAndUrl,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct CacheKeyInner {
    namespace: SmolStr,
    method: Option<Method>,
    url: String,
}

/// Key of a cached response. Cloning only bumps a reference count.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    inner: Arc<CacheKeyInner>,
}

impl CacheKey {
    pub fn new(namespace: impl Into<SmolStr>, scope: KeyScope, method: &Method, url: &Url) -> Self {
        let method = match scope {
            KeyScope::Url => None,
            KeyScope::MethodAndUrl => Some(method.clone()),
        };
        CacheKey {
            inner: Arc::new(CacheKeyInner {
                namespace: namespace.into(),
                method,
                url: url.as_str().to_owned(),
            }),
        }
    }

    /// URL-only key in the given namespace.
    pub fn from_url(namespace: impl Into<SmolStr>, url: &Url) -> Self {
        Self::new(namespace, KeyScope::Url, &Method::GET, url)
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn method(&self) -> Option<&Method> {
        self.inner.method.as_ref()
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.inner.namespace)?;
        if let Some(method) = &self.inner.method {
            write!(f, "{method} ")?;
        }
        f.write_str(&self.inner.url)
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheKey").field(&self.to_string()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_scope_ignores_method() {
        let url = Url::parse("http://h/r").unwrap();
        let get = CacheKey::new(DEFAULT_NAMESPACE, KeyScope::Url, &Method::GET, &url);
        let post = CacheKey::new(DEFAULT_NAMESPACE, KeyScope::Url, &Method::POST, &url);
        assert_eq!(get, post);
    }

    #[test]
    fn composite_scope_separates_methods() {
        let url = Url::parse("http://h/r").unwrap();
        let get = CacheKey::new(DEFAULT_NAMESPACE, KeyScope::MethodAndUrl, &Method::GET, &url);
        let post = CacheKey::new(DEFAULT_NAMESPACE, KeyScope::MethodAndUrl, &Method::POST, &url);
        assert_ne!(get, post);
    }

    #[test]
    fn namespaces_separate_keys() {
        let url = Url::parse("http://h/r").unwrap();
        assert_ne!(CacheKey::from_url("a", &url), CacheKey::from_url("b", &url));
    }
}
