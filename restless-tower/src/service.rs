use std::task::{Context, Poll};

use futures::future::BoxFuture;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, Request};
use restless_core::{DecodeOptions, Envelope, decoder};
use tower::{BoxError, Service};
use tracing::{debug, trace};

use crate::body::TranslatedBody;
use crate::error::TranslateError;
use crate::form::{FormParser, MulterParser};

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Service produced by [`Translate`](crate::Translate).
///
/// Requests that are not tunneled reach the inner service with their body
/// wrapped in [`TranslatedBody::Passthrough`]. Failures to unpack a
/// tunneled request are [`TranslateError`]s, boxed.
#[derive(Debug, Clone)]
pub struct TranslateService<S, P = MulterParser> {
    inner: S,
    parser: P,
    options: DecodeOptions,
}

impl<S, P> TranslateService<S, P> {
    pub fn new(inner: S, parser: P, options: DecodeOptions) -> Self {
        TranslateService {
            inner,
            parser,
            options,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }
}

/// POST with a `multipart/form-data` content type.
fn is_tunneled(method: &Method, headers: &HeaderMap) -> bool {
    *method == Method::POST
        && headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.to_ascii_lowercase().contains(MULTIPART_FORM_DATA))
}

impl<S, P, B> Service<Request<B>> for TranslateService<S, P>
where
    S: Service<Request<TranslatedBody<B>>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Into<BoxError>,
    P: FormParser<B>,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<S::Response, BoxError>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // The clone is not ready, the original is.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if !is_tunneled(req.method(), req.headers()) {
            trace!(method = %req.method(), uri = %req.uri(), "not a tunneled request");
            let future = inner.call(req.map(TranslatedBody::Passthrough));
            return Box::pin(async move { future.await.map_err(Into::into) });
        }

        let (mut parts, body) = req.into_parts();
        let boundary = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| multer::parse_boundary(value).ok());
        let parser = self.parser.clone();
        let options = self.options;

        Box::pin(async move {
            let boundary = boundary.ok_or(TranslateError::MissingBoundary)?;
            let fields = parser.parse(boundary, body).await?;
            let envelope = Envelope::from_fields(fields);
            let body = decoder::apply(&mut parts, envelope, options).map_err(TranslateError::from)?;
            debug!(method = %parts.method, uri = %parts.uri, "unpacked tunneled request");

            let request = Request::from_parts(parts, TranslatedBody::Decoded(body));
            inner.call(request).await.map_err(Into::into)
        })
    }
}
