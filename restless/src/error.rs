use thiserror::Error;

/// Errors returned by [`RestlessClient::request`](crate::RestlessClient::request).
#[derive(Debug, Error)]
pub enum ClientError<E> {
    /// The request URL could not be resolved.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request body could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Body(#[from] serde_json::Error),

    /// The transport failed. Passed through untouched.
    #[error(transparent)]
    Transport(E),
}

impl<E> ClientError<E> {
    /// Returns the transport error, if that is what this is.
    pub fn into_transport(self) -> Option<E> {
        match self {
            ClientError::Transport(error) => Some(error),
            _ => None,
        }
    }
}
