//! A service implementation that talks to the slang backend over HTTP.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use genbridge_service::{
    CaptionReply, CaptionRequest, ChatReply, ChatRequest, ErrorKind, Service,
    ServiceError,
};
use reqwest::{Client, Response, header};
use serde::de::DeserializeOwned;
use tracing::Instrument;

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_CAPTION_PATH, DEFAULT_CHAT_PATH, ServiceConfig,
    ServiceConfigBuilder,
};

/// Error type for [`HttpService`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    #[inline]
    fn transport(err: reqwest::Error) -> Self {
        Self::new(format!("{err}"), ErrorKind::Transport)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// The slang service reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpService {
    client: Client,
    config: Arc<ServiceConfig>,
}

impl HttpService {
    /// Creates a new `HttpService` with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::transport)?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Returns the configuration of this service.
    #[inline]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl Service for HttpService {
    type Error = Error;

    fn chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let resp_fut = self
            .client
            .post(self.config.chat_url())
            .header(header::ACCEPT, "application/json")
            .json(req)
            .send();

        async move {
            let resp = resp_fut.await.map_err(Error::transport)?;
            read_json(resp).await
        }
        .instrument(debug_span!("chat", url = self.config.chat_url()))
    }

    fn caption(
        &self,
        req: &CaptionRequest,
    ) -> impl Future<Output = Result<CaptionReply, Self::Error>> + Send + 'static
    {
        let image = req.image.clone();
        let req_builder = self
            .client
            .post(self.config.caption_url())
            .header(header::ACCEPT, "application/json");

        async move {
            trace!(
                "uploading {} ({}, {} bytes)",
                image.file_name(),
                image.mime(),
                image.len()
            );
            let form = proto::create_caption_form(&image).map_err(|err| {
                Error::new(format!("{err}"), ErrorKind::InvalidResponse)
            })?;
            let resp = req_builder
                .multipart(form)
                .send()
                .await
                .map_err(Error::transport)?;
            read_json(resp).await
        }
        .instrument(debug_span!("caption", url = self.config.caption_url()))
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let detail = proto::error_detail(&body);
        warn!("service replied {status}: {detail}");
        return Err(Error::new(
            format!("service replied {status}: {detail}"),
            ErrorKind::Status(status.as_u16()),
        ));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if !proto::is_json_content_type(content_type) {
        return Err(Error::new(
            format!("Unexpected content type: {content_type:?}"),
            ErrorKind::InvalidResponse,
        ));
    }

    // Here we got a successful response.
    let body = resp.bytes().await.map_err(Error::transport)?;
    trace!("got a reply of {} bytes", body.len());
    serde_json::from_slice(&body).map_err(|err| {
        Error::new(format!("Malformed reply: {err}"), ErrorKind::InvalidResponse)
    })
}
