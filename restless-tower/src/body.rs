//! Request body handed to the inner service.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes};
use http_body::{Body as HttpBody, Frame, SizeHint};
use pin_project::pin_project;

/// Body of a request after it went through [`TranslateService`](crate::TranslateService).
///
/// Requests that were not tunneled keep their original body; tunneled ones
/// carry the body field of the envelope, if any.
#[pin_project(project = TranslatedBodyProj)]
#[derive(Debug)]
pub enum TranslatedBody<B> {
    /// Not a tunneled request, body untouched.
    Passthrough(#[pin] B),
    /// Body unpacked from the envelope. Yielded once, then `None`.
    Decoded(Option<Bytes>),
}

impl<B> TranslatedBody<B> {
    pub fn empty() -> Self {
        TranslatedBody::Decoded(None)
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, TranslatedBody::Decoded(_))
    }
}

impl<B> HttpBody for TranslatedBody<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            TranslatedBodyProj::Decoded(data) => match data.take() {
                Some(bytes) if !bytes.is_empty() => Poll::Ready(Some(Ok(Frame::data(bytes)))),
                _ => Poll::Ready(None),
            },
            TranslatedBodyProj::Passthrough(body) => match body.poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            TranslatedBody::Decoded(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            TranslatedBody::Decoded(None) => SizeHint::with_exact(0),
            TranslatedBody::Passthrough(body) => body.size_hint(),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            TranslatedBody::Decoded(Some(bytes)) => bytes.is_empty(),
            TranslatedBody::Decoded(None) => true,
            TranslatedBody::Passthrough(body) => body.is_end_stream(),
        }
    }
}
