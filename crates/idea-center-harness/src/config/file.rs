// crates/idea-center-harness/src/config/file.rs
// ============================================================================
// Module: Harness Config File
// Description: TOML config file loading with bounded reads.
// Purpose: Supply the lowest-precedence configuration layer.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! The config file is optional. An explicitly named file must exist; the
//! default `idea-center.toml` is used only when present. Reads are bounded and
//! unknown keys are rejected.
//!
//! ```toml
//! [target]
//! base_url = "http://localhost:84"
//!
//! [auth]
//! email = "qa@example.com"
//! password = "secret"
//!
//! [report]
//! dir = "target/idea-center"
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use super::types::ConfigError;
use super::types::ConfigLayer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum size of a config file.
pub const MAX_CONFIG_BYTES: usize = 1024 * 1024;
/// Config file consulted when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "idea-center.toml";

// ============================================================================
// SECTION: File Shape
// ============================================================================

/// Parsed config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Target section.
    #[serde(default)]
    target: TargetSection,
    /// Auth section.
    #[serde(default)]
    auth: AuthSection,
    /// Report section.
    #[serde(default)]
    report: ReportSection,
}

/// `[target]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetSection {
    /// Base endpoint URL.
    base_url: Option<String>,
}

/// `[auth]` section.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AuthSection {
    /// Pre-issued bearer token.
    static_token: Option<String>,
    /// Login email.
    email: Option<String>,
    /// Login password.
    password: Option<String>,
}

impl std::fmt::Debug for AuthSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSection")
            .field("static_token", &self.static_token.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// `[report]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReportSection {
    /// Artifact directory.
    dir: Option<PathBuf>,
}

impl FileConfig {
    /// Parses config text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML in the
    /// expected shape.
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            error: err.to_string(),
        })
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is too large, is
    /// not UTF-8, or fails to parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = read_bytes_with_limit(path, MAX_CONFIG_BYTES)?;
        let content = std::str::from_utf8(&bytes).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            error: err.to_string(),
        })?;
        Self::parse(path, content)
    }

    /// Converts the file into a config layer; blank values count as absent.
    #[must_use]
    pub fn into_layer(self) -> ConfigLayer {
        ConfigLayer {
            base_url: non_blank(self.target.base_url),
            static_token: non_blank(self.auth.static_token),
            email: non_blank(self.auth.email),
            password: non_blank(self.auth.password),
            report_dir: self.report.dir,
        }
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads the file layer from an explicit path or the default location.
///
/// # Errors
///
/// Returns [`ConfigError`] when an explicit path cannot be loaded, or when the
/// default file exists but is invalid.
pub fn load_file_layer(explicit: Option<&Path>) -> Result<ConfigLayer, ConfigError> {
    if let Some(path) = explicit {
        return FileConfig::load(path).map(FileConfig::into_layer);
    }
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        return FileConfig::load(default_path).map(FileConfig::into_layer);
    }
    Ok(ConfigLayer::default())
}

/// Drops blank strings.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Reads a file while enforcing a maximum byte size.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ConfigError> {
    let display = path.display().to_string();
    let read_error = |err: std::io::Error| ConfigError::Read {
        path: display.clone(),
        error: err.to_string(),
    };
    let file = File::open(path).map_err(read_error)?;
    let size = file.metadata().map_err(read_error)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ConfigError::TooLarge {
            path: display.clone(),
            size,
            limit: max_bytes,
        });
    }
    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(read_error)?;
    if bytes.len() > max_bytes {
        return Err(ConfigError::TooLarge {
            path: display.clone(),
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}
