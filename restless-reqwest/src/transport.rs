//! Multipart POST transport over reqwest-middleware.

use async_trait::async_trait;
use bytes::Bytes;
use http::Response;
use reqwest::multipart::Form;
use reqwest_middleware::ClientWithMiddleware;
use restless_core::{Envelope, Transport};
use tracing::trace;
use url::Url;

/// Sends envelopes with a [`ClientWithMiddleware`].
///
/// The response body is read to the end before it is handed back.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: ClientWithMiddleware,
}

impl ReqwestTransport {
    pub fn new(client: ClientWithMiddleware) -> Self {
        ReqwestTransport { client }
    }

    pub fn client(&self) -> &ClientWithMiddleware {
        &self.client
    }
}

impl From<reqwest::Client> for ReqwestTransport {
    fn from(client: reqwest::Client) -> Self {
        Self::new(ClientWithMiddleware::from(client))
    }
}

impl From<ClientWithMiddleware> for ReqwestTransport {
    fn from(client: ClientWithMiddleware) -> Self {
        Self::new(client)
    }
}

/// One text part per envelope field, in wire order.
fn form(envelope: &Envelope) -> Form {
    envelope
        .fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| {
            form.text(name, value.to_owned())
        })
}

#[async_trait]
impl Transport for ReqwestTransport {
    type Error = reqwest_middleware::Error;

    async fn send(&self, url: &Url, envelope: Envelope) -> Result<Response<Bytes>, Self::Error> {
        let form = form(&envelope);
        trace!(%url, fields = envelope.fields().len(), "posting envelope");

        let response = self.client.post(url.clone()).multipart(form).send().await?;

        let mut builder = Response::builder()
            .status(response.status())
            .version(response.version());
        if let Some(headers) = builder.headers_mut() {
            *headers = response.headers().clone();
        }
        let body = response.bytes().await?;
        builder
            .body(body)
            .map_err(|error| reqwest_middleware::Error::Middleware(error.into()))
    }
}
