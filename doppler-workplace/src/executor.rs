//! Request execution.
//!
//! [`WorkplaceRoleClient`](crate::roles::WorkplaceRoleClient) only builds
//! requests and decodes responses. Sending them, authenticating and mapping
//! HTTP failures is the job of a [`RequestExecutor`]. [`HttpExecutor`] is the
//! `reqwest`-backed implementation used against the live API.

use crate::config::ApiConfig;
use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// A request as built by the client, before transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,

    /// Absolute API path, e.g. `/v3/workplace/roles`.
    pub path: String,

    /// Serialized JSON body, if any.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Attach a serialized JSON body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// Sends an [`ApiRequest`] and returns the raw response body.
///
/// Implementations own transport, authentication and status handling. Any
/// failure is reported as a [`TransportError`]; on success the returned bytes
/// are exactly the response body.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute a single request.
    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl<E> RequestExecutor for Arc<E>
where
    E: RequestExecutor + ?Sized,
{
    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError> {
        (**self).execute(request).await
    }
}

/// Error envelope returned by the API on failure.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    messages: Vec<String>,
}

/// [`RequestExecutor`] over HTTP.
#[derive(Clone)]
pub struct HttpExecutor {
    /// HTTP client instance.
    client: Client,

    /// API configuration.
    config: ApiConfig,
}

impl HttpExecutor {
    /// Create a new executor from configuration.
    ///
    /// A zero timeout is rejected, since every request would time out.
    pub fn new(config: ApiConfig) -> Result<Self, TransportError> {
        if config.timeout_secs == 0 {
            return Err(TransportError::Client(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Configuration this executor was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Map the HTTP response to body bytes or a transport error.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<Vec<u8>, TransportError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            error!("Doppler authentication failed ({})", status.as_u16());
            return Err(TransportError::AuthenticationFailed);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text);
            warn!("Doppler API error ({}): {}", status.as_u16(), message);
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError> {
        let url = self.config.url(&request.path);
        debug!("Sending {} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method, &url)
            .header(ACCEPT, "application/json");

        if let Some(ref token) = self.config.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        self.handle_response(response).await
    }
}

/// Extract a readable message from an error body.
///
/// Joins the `messages` of the API's error envelope, falling back to the raw
/// text when the body is not an envelope.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.messages.is_empty() => envelope.messages.join("; "),
        _ if body.trim().is_empty() => "Unknown error".to_string(),
        _ => body.trim().to_string(),
    }
}
