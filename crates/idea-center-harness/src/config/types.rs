// crates/idea-center-harness/src/config/types.rs
// ============================================================================
// Module: Harness Config Types
// Description: Config layers, the validated config, and config errors.
// Purpose: Merge partial sources and validate them into one typed value.
// Dependencies: thiserror, url
// ============================================================================

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::auth::CredentialSource;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file {path}: {error}")]
    Read {
        /// File path as displayed to the user.
        path: String,
        /// Underlying I/O error text.
        error: String,
    },
    /// Config file exceeds the size limit.
    #[error("config file {path} exceeds size limit ({size} > {limit} bytes)")]
    TooLarge {
        /// File path as displayed to the user.
        path: String,
        /// Observed size in bytes.
        size: u64,
        /// Maximum accepted size in bytes.
        limit: usize,
    },
    /// Config file is not valid UTF-8 TOML in the expected shape.
    #[error("failed to parse config file {path}: {error}")]
    Parse {
        /// File path as displayed to the user.
        path: String,
        /// Parser error text.
        error: String,
    },
    /// Environment variable is malformed.
    #[error("{0}")]
    InvalidEnv(String),
    /// No base URL was supplied by any layer.
    #[error("base url is required (set --base-url, IDEA_CENTER_BASE_URL, or [target] base_url)")]
    MissingBaseUrl,
    /// Base URL is not an absolute http(s) URL.
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl {
        /// Offending value.
        url: String,
        /// Validation failure.
        reason: String,
    },
}

// ============================================================================
// SECTION: Layers
// ============================================================================

/// One partial configuration source.
///
/// # Invariants
/// - Every field is optional; absence means "defer to a lower layer".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Base endpoint URL of the API under test.
    pub base_url: Option<String>,
    /// Pre-issued bearer token.
    pub static_token: Option<String>,
    /// Login email for the credential exchange.
    pub email: Option<String>,
    /// Login password for the credential exchange.
    pub password: Option<String>,
    /// Directory that receives run artifacts.
    pub report_dir: Option<PathBuf>,
}

impl ConfigLayer {
    /// Merges this layer over `lower`; values set here win.
    #[must_use]
    pub fn over(self, lower: Self) -> Self {
        Self {
            base_url: self.base_url.or(lower.base_url),
            static_token: self.static_token.or(lower.static_token),
            email: self.email.or(lower.email),
            password: self.password.or(lower.password),
            report_dir: self.report_dir.or(lower.report_dir),
        }
    }
}

impl fmt::Debug for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLayer")
            .field("base_url", &self.base_url)
            .field("static_token", &self.static_token.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("report_dir", &self.report_dir)
            .finish()
    }
}

// ============================================================================
// SECTION: Validated Config
// ============================================================================

/// Validated harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base endpoint URL.
    pub base_url: Url,
    /// Credential inputs handed to the auth provider.
    pub credentials: CredentialSource,
    /// Optional artifact directory.
    pub report_dir: Option<PathBuf>,
}

impl HarnessConfig {
    /// Builds a config from an already-parsed URL and credential source.
    #[must_use]
    pub const fn new(base_url: Url, credentials: CredentialSource) -> Self {
        Self {
            base_url,
            credentials,
            report_dir: None,
        }
    }

    /// Validates a merged layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL is missing or not an absolute
    /// http(s) URL.
    pub fn from_layer(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let raw_url = layer
            .base_url
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        let base_url = parse_base_url(raw_url.trim())?;
        Ok(Self {
            base_url,
            credentials: CredentialSource::new(layer.static_token, layer.email, layer.password),
            report_dir: layer.report_dir,
        })
    }
}

/// Parses and validates the base endpoint URL.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|err| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::InvalidBaseUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme {other}"),
            });
        }
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "query and fragment are not allowed".to_string(),
        });
    }
    Ok(url)
}
