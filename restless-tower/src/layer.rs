use restless_core::DecodeOptions;
use tower::Layer;

use crate::config::TranslateConfig;
use crate::form::MulterParser;
use crate::service::TranslateService;

/// Layer that unpacks tunneled requests before they reach the inner service.
///
/// ```
/// use restless_tower::{Translate, TranslateConfig};
///
/// let layer = Translate::new(TranslateConfig {
///     lowercase_headers: true,
///     ..Default::default()
/// });
/// # let _ = layer;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Translate<P = MulterParser> {
    parser: P,
    options: DecodeOptions,
}

impl Translate<MulterParser> {
    pub fn new(config: TranslateConfig) -> Self {
        let parser = match config.max_form_bytes {
            Some(limit) => MulterParser::new().max_bytes(limit),
            None => MulterParser::new(),
        };
        Translate {
            parser,
            options: config.into(),
        }
    }
}

impl<P> Translate<P> {
    /// Replaces the form parser.
    pub fn with_parser<NP>(self, parser: NP) -> Translate<NP> {
        Translate {
            parser,
            options: self.options,
        }
    }
}

impl<S, P> Layer<S> for Translate<P>
where
    P: Clone,
{
    type Service = TranslateService<S, P>;

    fn layer(&self, inner: S) -> Self::Service {
        TranslateService::new(inner, self.parser.clone(), self.options)
    }
}
