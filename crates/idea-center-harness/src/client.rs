// crates/idea-center-harness/src/client.rs
// ============================================================================
// Module: API Client
// Description: Bearer-authenticated HTTP client for the Idea Center API.
// Purpose: Issue single-attempt requests and return raw status and body.
// Dependencies: reqwest, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`ApiClient`] binds one base URL to one [`Credential`]. Every request gets
//! the bearer header inside [`ApiClient::send`]; callers have no way to set or
//! forget it. Requests are attempted exactly once with the HTTP client's
//! default policies. Bodies come back raw because response shapes differ per
//! endpoint.
//!
//! Each attempt is appended to a transcript (without the Authorization header)
//! that is handed back when the client is closed at teardown.
//!
//! Security posture: server responses are untrusted; bodies are size-limited.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Instant;

use reqwest::Client;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;
use url::Url;

use crate::auth::Credential;
use crate::expect::ContractViolation;
use crate::expect::preview;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size accepted from the server.
pub const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures that prevent a request from producing a response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Request URL could not be built.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    /// Request body could not be serialized.
    #[error("request body encoding failed: {0}")]
    Encode(String),
    /// The request did not complete (connect, I/O, protocol).
    #[error("http request failed: {0}")]
    Request(String),
    /// The response body exceeded the size limit.
    #[error("response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Bytes received before giving up.
        actual: usize,
        /// Maximum size in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Request / Response
// ============================================================================

/// Optional query parameters and JSON body for a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query parameters, URL-encoded in order.
    query: Vec<(String, String)>,
    /// JSON body.
    body: Option<Value>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Encode`] when `body` cannot be serialized.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, TransportError> {
        let value =
            serde_json::to_value(body).map_err(|err| TransportError::Encode(err.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Status code and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body decoded lossily as UTF-8.
    pub body: String,
}

impl RawResponse {
    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::MalformedBody`] when the body does not
    /// decode into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ContractViolation> {
        serde_json::from_str(&self.body).map_err(|err| ContractViolation::MalformedBody {
            error: err.to_string(),
            body: preview(&self.body),
        })
    }
}

/// One recorded request attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    /// 1-based attempt number.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Request path relative to the base URL.
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// JSON request body.
    pub request_body: Option<Value>,
    /// Response status, when a response arrived.
    pub status: Option<u16>,
    /// Response body, when a response arrived.
    pub response_body: Option<String>,
    /// Transport failure, when no response arrived.
    pub error: Option<String>,
    /// Wall-clock duration in milliseconds.
    pub elapsed_ms: u64,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Authenticated API client for one run.
#[derive(Debug)]
pub struct ApiClient {
    /// Base endpoint URL.
    base_url: Url,
    /// Bearer credential attached to every request.
    credential: Credential,
    /// Underlying HTTP client.
    http: Client,
    /// Recorded attempts.
    transcript: Mutex<Vec<TranscriptEntry>>,
}

impl ApiClient {
    /// Builds a client bound to `base_url` and `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] when the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: Url, credential: Credential) -> Result<Self, TransportError> {
        let http =
            Client::builder().build().map_err(|err| TransportError::Request(err.to_string()))?;
        Ok(Self {
            base_url,
            credential,
            http,
            transcript: Mutex::new(Vec::new()),
        })
    }

    /// Sends one request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the URL is invalid, the request fails,
    /// or the body exceeds [`MAX_RESPONSE_BYTES`]. Non-2xx statuses are not
    /// errors here.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<RawResponse, TransportError> {
        let url = endpoint_url(&self.base_url, path)
            .map_err(|err| TransportError::InvalidUrl(err.to_string()))?;
        let started = Instant::now();
        let mut request =
            self.http.request(method.clone(), url).bearer_auth(self.credential.as_str());
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }
        let result = match request.send().await {
            Ok(response) => read_response(response).await,
            Err(err) => Err(TransportError::Request(err.to_string())),
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(response) => {
                debug!(%method, path, status = response.status, elapsed_ms, "request completed");
            }
            Err(err) => warn!(%method, path, elapsed_ms, error = %err, "request failed"),
        }
        self.record(&method, path, options, &result, elapsed_ms);
        result
    }

    /// Returns a snapshot of the transcript.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Releases the client and returns the transcript.
    #[must_use]
    pub fn close(self) -> Vec<TranscriptEntry> {
        let entries = self.transcript.into_inner().unwrap_or_else(PoisonError::into_inner);
        info!(requests = entries.len(), "released http client");
        entries
    }

    /// Appends an attempt to the transcript.
    fn record(
        &self,
        method: &Method,
        path: &str,
        options: RequestOptions,
        result: &Result<RawResponse, TransportError>,
        elapsed_ms: u64,
    ) {
        let Ok(mut guard) = self.transcript.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        let (status, response_body, error) = match result {
            Ok(response) => (Some(response.status), Some(response.body.clone()), None),
            Err(err) => (None, None, Some(err.to_string())),
        };
        guard.push(TranscriptEntry {
            sequence,
            method: method.to_string(),
            path: path.to_string(),
            query: options.query,
            request_body: options.body,
            status,
            response_body,
            error,
            elapsed_ms,
        });
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Joins a base URL and an absolute API path, keeping any base path prefix.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}{path}"))
}

/// Reads status and body from a response.
async fn read_response(response: reqwest::Response) -> Result<RawResponse, TransportError> {
    let status = response.status().as_u16();
    let bytes = read_response_body_with_limit(response, MAX_RESPONSE_BYTES).await?;
    Ok(RawResponse {
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Reads a response body while enforcing a maximum byte size.
pub(crate) async fn read_response_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    while let Some(chunk) =
        response.chunk().await.map_err(|err| TransportError::Request(err.to_string()))?
    {
        let next_total = body.len().checked_add(chunk.len()).ok_or(
            TransportError::ResponseTooLarge {
                actual: usize::MAX,
                limit,
            },
        )?;
        if next_total > limit {
            return Err(TransportError::ResponseTooLarge {
                actual: next_total,
                limit,
            });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
