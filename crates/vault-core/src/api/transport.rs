//! HTTP transport seam.
//!
//! The Gateway Client and Session Manager describe requests as plain
//! `HttpRequest` values and hand them to a `Transport`. Production code
//! uses `ReqwestTransport`; tests substitute a recording mock.

use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use reqwest::{multipart, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// One field of a multipart body
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        content_type: Option<String>,
        data: Vec<u8>,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

impl RequestBody {
    /// Serialize a value as a JSON body
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self, TransportError> {
        serde_json::to_value(body)
            .map(RequestBody::Json)
            .map_err(|e| TransportError::InvalidRequest(format!("body not serializable: {}", e)))
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Something that can carry an `HttpRequest` to the server.
///
/// Implementations perform exactly one round trip per call: no retries,
/// no caching. Non-2xx statuses are returned as responses, not errors;
/// only failures to obtain a response at all are `TransportError`s.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, TransportError>>;
}

/// Transport backed by `reqwest`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with reqwest's defaults (no request timeout)
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a preconfigured client, e.g. one built with a timeout
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn build_form(parts: Vec<FormPart>) -> Result<multipart::Form, TransportError> {
        let mut form = multipart::Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    let mut file_part = multipart::Part::bytes(data).file_name(filename);
                    if let Some(ref content_type) = content_type {
                        file_part = file_part.mime_str(content_type).map_err(|e| {
                            TransportError::InvalidRequest(format!(
                                "invalid content type {}: {}",
                                content_type, e
                            ))
                        })?;
                    }
                    form.part(name, file_part)
                }
            };
        }
        Ok(form)
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let HttpRequest {
                method,
                url,
                headers,
                body,
            } = request;

            let builder = self.client.request(method, &url).headers(headers);
            let builder = match body {
                RequestBody::Empty => builder,
                RequestBody::Json(value) => builder.json(&value),
                RequestBody::Multipart(parts) => builder.multipart(Self::build_form(parts)?),
            };

            let response = builder.send().await?;
            let status = response.status();
            let body = response.bytes().await?.to_vec();
            debug!(url = %url, status = status.as_u16(), bytes = body.len(), "Response received");

            Ok(HttpResponse { status, body })
        })
    }
}
