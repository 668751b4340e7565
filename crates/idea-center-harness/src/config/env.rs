// crates/idea-center-harness/src/config/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed configuration layer.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 and set-but-blank values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::path::PathBuf;

use super::types::ConfigError;
use super::types::ConfigLayer;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Base endpoint URL.
    BaseUrl,
    /// Pre-issued bearer token.
    Token,
    /// Login email for the credential exchange.
    Email,
    /// Login password for the credential exchange.
    Password,
    /// Artifact directory.
    ReportDir,
    /// Config file path override.
    ConfigPath,
}

impl HarnessEnv {
    /// Every key, in documentation order.
    pub const ALL: [Self; 6] =
        [Self::BaseUrl, Self::Token, Self::Email, Self::Password, Self::ReportDir, Self::ConfigPath];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "IDEA_CENTER_BASE_URL",
            Self::Token => "IDEA_CENTER_TOKEN",
            Self::Email => "IDEA_CENTER_EMAIL",
            Self::Password => "IDEA_CENTER_PASSWORD",
            Self::ReportDir => "IDEA_CENTER_REPORT_DIR",
            Self::ConfigPath => "IDEA_CENTER_CONFIG",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Configuration derived from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Values that participate in layer merging.
    pub layer: ConfigLayer,
    /// Optional config file path override.
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when a value is not valid UTF-8 or
    /// is set but blank.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when a value is not valid UTF-8 or
    /// is set but blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let read = |key: HarnessEnv| read_nonempty(key.as_str(), lookup(key.as_str()));
        let layer = ConfigLayer {
            base_url: read(HarnessEnv::BaseUrl)?,
            static_token: read(HarnessEnv::Token)?,
            email: read(HarnessEnv::Email)?,
            password: read(HarnessEnv::Password)?,
            report_dir: read(HarnessEnv::ReportDir)?.map(PathBuf::from),
        };
        let config_path = read(HarnessEnv::ConfigPath)?.map(PathBuf::from);
        Ok(Self {
            layer,
            config_path,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a raw value as UTF-8.
fn decode(name: &str, raw: Option<OsString>) -> Result<Option<String>, ConfigError> {
    raw.map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv(format!("{name} must be valid UTF-8")))
    })
}

/// Decodes a raw value and rejects set-but-blank values.
fn read_nonempty(name: &str, raw: Option<OsString>) -> Result<Option<String>, ConfigError> {
    match decode(name, raw)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::InvalidEnv(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}
