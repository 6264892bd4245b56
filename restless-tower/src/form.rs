//! Parsing the multipart form of a tunneled request.

use bytes::{Buf, Bytes};
use futures::TryStreamExt;
use futures::future::BoxFuture;
use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use multer::{Constraints, Multipart, SizeLimit};
use tower::BoxError;
use tracing::trace;

use crate::error::TranslateError;

/// Reads a `multipart/form-data` body into `(name, value)` pairs, in order.
///
/// Parts without a name are dropped. Implement it to plug another multipart
/// engine into [`Translate`](crate::Translate).
pub trait FormParser<B>: Clone + Send + Sync + 'static {
    fn parse(
        &self,
        boundary: String,
        body: B,
    ) -> BoxFuture<'static, Result<Vec<(String, String)>, TranslateError>>;
}

/// Streaming parser backed by [`multer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MulterParser {
    max_bytes: Option<u64>,
}

impl MulterParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects forms larger than `max_bytes`.
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    fn constraints(&self) -> Constraints {
        match self.max_bytes {
            Some(limit) => Constraints::new().size_limit(SizeLimit::new().whole_stream(limit)),
            None => Constraints::new(),
        }
    }
}

impl<B> FormParser<B> for MulterParser
where
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    fn parse(
        &self,
        boundary: String,
        body: B,
    ) -> BoxFuture<'static, Result<Vec<(String, String)>, TranslateError>> {
        let stream = body
            .into_data_stream()
            .map_ok(|mut data| -> Bytes { data.copy_to_bytes(data.remaining()) });
        let mut multipart = Multipart::with_constraints(stream, boundary, self.constraints());

        Box::pin(async move {
            let mut fields = Vec::new();
            while let Some(field) = multipart.next_field().await? {
                let name = field.name().map(str::to_owned);
                let value = field.text().await?;
                match name {
                    Some(name) => fields.push((name, value)),
                    None => trace!("dropping unnamed multipart part"),
                }
            }
            Ok(fields)
        })
    }
}
