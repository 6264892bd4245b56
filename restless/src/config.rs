//! Client configuration.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```yaml
//! namespace: RESTLESS_CACHE
//! base_url: http://localhost:3000
//! key: Url
//! stale: Revalidate
//! ```

use restless_core::{DEFAULT_NAMESPACE, KeyScope};
use serde::{Deserialize, Serialize};
use url::Url;

/// What to do with a cached response that a lookup found already expired.
///
/// The store prunes such an entry but still hands it back once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
pub enum StalePolicy {
    /// Treat it as a miss and go to the network.
    #[default]
    Revalidate,
    /// Serve it one last time.
    Return,
}

/// Configuration of [`RestlessClient`](crate::RestlessClient).
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct ClientConfig {
    /// Namespace of cache keys.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Base for relative request URLs.
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Parts of the request that make up the cache key.
    #[serde(default)]
    pub key: KeyScope,
    /// Handling of entries found expired on lookup.
    #[serde(default)]
    pub stale: StalePolicy,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_owned()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            base_url: None,
            key: KeyScope::default(),
            stale: StalePolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespace = namespace.into();
        self
    }

    pub fn base_url(mut self, base_url: Url) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    pub fn key(mut self, key: KeyScope) -> Self {
        self.config.key = key;
        self
    }

    pub fn stale(mut self, stale: StalePolicy) -> Self {
        self.config.stale = stale;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
