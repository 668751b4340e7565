// system-tests/src/lib.rs
// ============================================================================
// Module: Idea Center System Tests Library
// Description: Shared configuration for system test scenarios.
// Purpose: Provide common settings for the Idea Center system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the Idea Center system-tests
//! binaries in `system-tests/tests`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
