use restless_core::DecodeOptions;
use serde::{Deserialize, Serialize};

/// Configuration of the [`Translate`](crate::Translate) layer.
///
/// ```yaml
/// lowercase_headers: true
/// max_form_bytes: 1048576
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Lowercase tunneled header names.
    #[serde(default)]
    pub lowercase_headers: bool,
    /// Upper bound on the size of a tunneled form. Unbounded when absent.
    #[serde(default)]
    pub max_form_bytes: Option<u64>,
}

impl From<TranslateConfig> for DecodeOptions {
    fn from(config: TranslateConfig) -> Self {
        DecodeOptions {
            lowercase_headers: config.lowercase_headers,
        }
    }
}
