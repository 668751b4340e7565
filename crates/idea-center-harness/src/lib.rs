// crates/idea-center-harness/src/lib.rs
// ============================================================================
// Module: Idea Center Harness Library
// Description: Ordered contract harness for the Idea Center HTTP API.
// Purpose: Resolve a credential, drive the step plan, and report results.
// Dependencies: reqwest, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! The harness validates the lifecycle contract of the Idea Center API:
//! create, discover by listing, edit, delete, and the matching negative paths.
//!
//! A run resolves one bearer [`auth::Credential`], builds one
//! [`client::ApiClient`], then executes the fixed [`steps::plan`] in order.
//! Cross-step state lives in a [`context::TestContext`] that each step receives
//! by reference. Step failures are recorded and never stop the run; only
//! authentication failures abort before the first request.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod expect;
pub mod model;
pub mod orchestrator;
pub mod report;
pub mod steps;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use auth::AuthProvider;
pub use auth::AuthenticationError;
pub use auth::Credential;
pub use auth::CredentialSource;
pub use client::ApiClient;
pub use client::RawResponse;
pub use client::RequestOptions;
pub use client::TransportError;
pub use config::ConfigError;
pub use config::HarnessConfig;
pub use context::TestContext;
pub use orchestrator::HarnessError;
pub use orchestrator::SuiteRun;
pub use orchestrator::SuiteRunner;
pub use report::SuiteReport;
