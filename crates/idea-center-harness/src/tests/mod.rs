// crates/idea-center-harness/src/tests/mod.rs
// ============================================================================
// Module: Harness Unit Tests
// Description: Unit tests for config, auth, model, steps, and reports.
// Purpose: Exercise harness behavior that needs no running server.
// Dependencies: idea-center-harness, tempfile, tokio
// ============================================================================

//! ## Overview
//! Unit tests grouped by harness module. Tests that need a live endpoint
//! live in `system-tests`.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Modules
// ============================================================================
