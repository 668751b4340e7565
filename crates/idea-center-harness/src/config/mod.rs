// crates/idea-center-harness/src/config/mod.rs
// ============================================================================
// Module: Harness Configuration
// Description: Layered configuration for the Idea Center harness.
// Purpose: Provide typed access to the target endpoint and credential inputs.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is assembled from three layers: CLI overrides, environment
//! variables, and an optional TOML file, in that order of precedence. Layers
//! merge field by field before validation produces a [`HarnessConfig`].
//! Security posture: config inputs are untrusted; invalid values fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod file;
mod types;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::EnvConfig;
pub use env::HarnessEnv;
pub use file::DEFAULT_CONFIG_FILE;
pub use file::FileConfig;
pub use file::MAX_CONFIG_BYTES;
pub use file::load_file_layer;
pub use types::ConfigError;
pub use types::ConfigLayer;
pub use types::HarnessConfig;
