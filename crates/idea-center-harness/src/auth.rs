// crates/idea-center-harness/src/auth.rs
// ============================================================================
// Module: Credential Resolution
// Description: Static-token passthrough and email/password token exchange.
// Purpose: Produce the single bearer credential used for a whole run.
// Dependencies: reqwest, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! A run needs exactly one bearer [`Credential`]. A non-blank static token is
//! trusted as-is (no expiry or signature checks). Otherwise the provider posts
//! `{email, password}` to the authentication endpoint with a temporary,
//! unauthenticated client and extracts `accessToken` from a 200 response.
//!
//! Security posture: tokens and passwords never appear in `Debug` output or
//! logs.

use std::fmt;

use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::client::MAX_RESPONSE_BYTES;
use crate::client::endpoint_url;
use crate::client::read_response_body_with_limit;
use crate::expect::preview;
use crate::model::endpoints;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Credential resolution failures. All of them abort the run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    /// Neither a static token nor a complete email/password pair was supplied.
    #[error("no usable credential: supply a static token or an email/password pair")]
    MissingCredentials,
    /// The exchange endpoint answered with a non-200 status.
    #[error("failed to authenticate: status {status}, body: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for display.
        body: String,
    },
    /// The exchange succeeded but carried no usable token.
    #[error("token missing")]
    TokenMissing,
    /// The exchange response body was not the expected JSON object.
    #[error("authentication response is not valid json: {0}")]
    InvalidResponse(String),
    /// The exchange endpoint URL could not be built.
    #[error("invalid authentication endpoint: {0}")]
    InvalidEndpoint(String),
    /// The exchange request did not complete.
    #[error("authentication request failed: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Credential
// ============================================================================

/// Opaque bearer token.
///
/// # Invariants
/// - Never blank.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::TokenMissing`] when the token is blank.
    pub fn new(token: impl Into<String>) -> Result<Self, AuthenticationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AuthenticationError::TokenMissing);
        }
        Ok(Self(token))
    }

    /// Returns the raw token for the Authorization header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Inputs the provider chooses a credential from.
///
/// # Invariants
/// - Blank values are stored as `None`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSource {
    /// Pre-issued bearer token.
    static_token: Option<String>,
    /// Login email.
    email: Option<String>,
    /// Login password.
    password: Option<String>,
}

impl CredentialSource {
    /// Builds a source, discarding blank values.
    #[must_use]
    pub fn new(
        static_token: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            static_token: non_blank(static_token),
            email: non_blank(email),
            password: non_blank(password),
        }
    }

    /// Source that only carries a static token.
    #[must_use]
    pub fn static_token(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()), None, None)
    }

    /// Source that only carries login credentials.
    #[must_use]
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(None, Some(email.into()), Some(password.into()))
    }

    /// Returns true when a static token will be used.
    #[must_use]
    pub const fn has_static_token(&self) -> bool {
        self.static_token.is_some()
    }

    /// Returns true when a credential exchange is possible.
    #[must_use]
    pub const fn has_login(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSource")
            .field("static_token", &self.static_token.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Drops blank strings.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

// ============================================================================
// SECTION: Exchange Payloads
// ============================================================================

/// Login request body.
#[derive(Serialize)]
struct LoginRequest<'a> {
    /// Login email.
    email: &'a str,
    /// Login password.
    password: &'a str,
}

/// Login response body.
#[derive(Deserialize)]
struct LoginResponse {
    /// Issued bearer token.
    #[serde(rename = "accessToken", default)]
    access_token: Option<String>,
}

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Resolves the run credential.
#[derive(Debug, Clone)]
pub struct AuthProvider {
    /// Absolute URL of the exchange endpoint.
    endpoint: Url,
}

impl AuthProvider {
    /// Builds a provider bound to the service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::InvalidEndpoint`] when the exchange URL
    /// cannot be derived from `base_url`.
    pub fn new(base_url: &Url) -> Result<Self, AuthenticationError> {
        let endpoint = endpoint_url(base_url, endpoints::AUTHENTICATE)
            .map_err(|err| AuthenticationError::InvalidEndpoint(err.to_string()))?;
        Ok(Self {
            endpoint,
        })
    }

    /// Returns the exchange endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolves a credential from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError`] when no usable input exists or the
    /// exchange fails.
    pub async fn resolve(
        &self,
        source: &CredentialSource,
    ) -> Result<Credential, AuthenticationError> {
        if let Some(token) = &source.static_token {
            info!(source = "static", "using pre-issued bearer token");
            return Credential::new(token.clone());
        }
        let (Some(email), Some(password)) = (&source.email, &source.password) else {
            return Err(AuthenticationError::MissingCredentials);
        };
        info!(source = "exchange", endpoint = %self.endpoint, "requesting bearer token");
        self.exchange(email, password).await
    }

    /// Performs the email/password exchange with a throwaway client.
    async fn exchange(&self, email: &str, password: &str) -> Result<Credential, AuthenticationError> {
        let client =
            Client::builder().build().map_err(|err| AuthenticationError::Transport(err.to_string()))?;
        let response = client
            .post(self.endpoint.clone())
            .json(&LoginRequest {
                email,
                password,
            })
            .send()
            .await
            .map_err(|err| AuthenticationError::Transport(err.to_string()))?;
        let status = response.status();
        let bytes = read_response_body_with_limit(response, MAX_RESPONSE_BYTES)
            .await
            .map_err(|err| AuthenticationError::Transport(err.to_string()))?;
        let body = String::from_utf8_lossy(&bytes);
        if status != StatusCode::OK {
            return Err(AuthenticationError::Rejected {
                status: status.as_u16(),
                body: preview(&body),
            });
        }
        let parsed: LoginResponse = serde_json::from_str(&body)
            .map_err(|err| AuthenticationError::InvalidResponse(err.to_string()))?;
        let token = parsed.access_token.ok_or(AuthenticationError::TokenMissing)?;
        let credential = Credential::new(token)?;
        info!(source = "exchange", "bearer token issued");
        Ok(credential)
    }
}
