//! HTTP transport for DOI service requests.
//!
//! [`Transport`] is the seam between request building and the network. The
//! default implementation, [`HttpTransport`], sends requests with reqwest.
//! A transport returns whatever status the service answered with; deciding
//! whether that status is a failure is the client's job.

use std::fmt::Debug;

use async_trait::async_trait;
use base64::Engine as _;
use doi_core::{Credentials, ServiceConfig};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;

use crate::error::TransportError;

/// A fully built DOI service request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: String,
    /// `Content-Type` header value.
    pub content_type: &'static str,
    /// Request body, if any.
    pub body: Option<String>,
    /// Basic-auth credentials.
    pub credentials: Credentials,
}

impl DoiRequest {
    /// Returns the `Authorization` header value for this request.
    #[must_use]
    pub fn authorization(&self) -> String {
        basic_auth_header(&self.credentials)
    }
}

/// Raw response from the DOI service. Consumed once by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ServiceResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends DOI service requests.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Sends one request and returns the service's answer.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response was received, including
    /// when the request timed out.
    async fn send(&self, request: DoiRequest) -> Result<ServiceResponse, TransportError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport using the timeout and user agent from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client cannot be
    /// created.
    pub fn new(config: &ServiceConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| TransportError::ClientBuild {
                source: Box::new(e),
            })?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: DoiRequest) -> Result<ServiceResponse, TransportError> {
        let auth = HeaderValue::from_str(&request.authorization()).map_err(|e| {
            TransportError::Request {
                url: request.url.clone(),
                source: Box::new(e),
            }
        })?;

        let mut builder = self
            .http
            .request(request.method, &request.url)
            .header(CONTENT_TYPE, request.content_type)
            .header(AUTHORIZATION, auth);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&request.url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(&request.url, e))?;

        Ok(ServiceResponse { status, body })
    }
}

/// Builds an HTTP basic `Authorization` header value.
///
/// # Examples
///
/// ```
/// use doi_client::transport::basic_auth_header;
/// use doi_core::Credentials;
///
/// let header = basic_auth_header(&Credentials::new("user", "pass"));
/// assert_eq!(header, "Basic dXNlcjpwYXNz");
/// ```
#[must_use]
pub fn basic_auth_header(credentials: &Credentials) -> String {
    let encoded = base64::engine::general_purpose::STANDARD
        .encode(format!("{}:{}", credentials.username, credentials.password));
    format!("Basic {encoded}")
}
