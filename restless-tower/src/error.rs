use http::StatusCode;
use restless_core::DecodeError;
use thiserror::Error;

/// A tunneled request could not be unpacked.
///
/// Returned by [`TranslateService`](crate::TranslateService) boxed into a
/// [`tower::BoxError`]; downcast it to map it onto a response.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// `Content-Type` says multipart but carries no boundary.
    #[error("multipart request has no boundary")]
    MissingBoundary,

    /// The body is not valid `multipart/form-data`, or could not be read.
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] multer::Error),

    /// The fields do not describe a request.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl TranslateError {
    /// Status of the response a host should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TranslateError::Multipart(
                multer::Error::StreamSizeExceeded { .. } | multer::Error::FieldSizeExceeded { .. },
            ) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
