//! Raw request capability the admin client and the journal helper are built on.

use crate::error::{AdminError, ValidationErrorResponse};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Body of an outgoing admin request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    /// Raw file content for the file store endpoints.
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminRequest {
    pub method: Method,
    /// Absolute path below the server root, e.g. `/__admin/mappings`.
    pub path: String,
    pub body: Option<RequestBody>,
}

impl AdminRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, AdminError> {
        let value = serde_json::to_value(body).map_err(|e| AdminError::Parse(e.to_string()))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    pub fn with_text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }
}

/// Body of a successful reply: JSON when it parses, the raw text otherwise.
///
/// Empty replies (common for deletes and resets) come back as `Text("")`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(json) => Payload::Json(json),
            Err(_) => Payload::Text(text),
        }
    }

    /// Collapse into a JSON value; text becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Json(json) => json,
            Payload::Text(text) => Value::String(text),
        }
    }

    /// Decode a JSON payload into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, AdminError> {
        match self {
            Payload::Json(json) => {
                serde_json::from_value(json).map_err(|e| AdminError::Parse(e.to_string()))
            }
            Payload::Text(text) => Err(AdminError::Parse(format!(
                "expected a JSON document, got: {text:?}"
            ))),
        }
    }
}

/// Issues one admin request and reports its outcome.
#[async_trait]
pub trait AdminTransport: Send + Sync {
    async fn send(&self, request: AdminRequest) -> Result<Payload, AdminError>;
}

/// [`AdminTransport`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AdminError> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| AdminError::InvalidUrl(format!("{base_url}: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AdminError::InvalidUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AdminTransport for HttpTransport {
    async fn send(&self, request: AdminRequest) -> Result<Payload, AdminError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, path = %request.path, "Sending admin request");

        let mut builder = self.client.request(request.method, &url);
        match request.body {
            Some(RequestBody::Json(json)) => builder = builder.json(&json),
            Some(RequestBody::Text(text)) => {
                builder = builder.header(CONTENT_TYPE, "text/plain").body(text)
            }
            None => {}
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!(status = status.as_u16(), url = %url, "Admin request completed");

        if !status.is_success() {
            return Err(error_for_status(status, &text));
        }

        Ok(Payload::from_text(text))
    }
}

fn error_for_status(status: StatusCode, body: &str) -> AdminError {
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Ok(parsed) = serde_json::from_str::<ValidationErrorResponse>(body) {
            if !parsed.errors.is_empty() {
                return AdminError::Validation {
                    errors: parsed.errors,
                };
            }
        }
    }
    AdminError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}
