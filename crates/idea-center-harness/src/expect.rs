// crates/idea-center-harness/src/expect.rs
// ============================================================================
// Module: Response Expectations
// Description: Contract checks over raw responses and decoded envelopes.
// Purpose: Turn observed-vs-expected mismatches into typed violations.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Each check returns `Ok(())` or a [`ContractViolation`] describing what was
//! expected and what was observed. Bodies quoted in violations are truncated
//! to keep reports readable.

use thiserror::Error;

use crate::client::RawResponse;
use crate::model::ApiResponse;

/// Longest body excerpt quoted in a violation, in characters.
const BODY_PREVIEW_CHARS: usize = 512;

/// Observed response diverges from the step's declared contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractViolation {
    /// Status code mismatch.
    #[error("expected status {expected}, observed {observed}; body: {body}")]
    UnexpectedStatus {
        /// Contracted status.
        expected: u16,
        /// Observed status.
        observed: u16,
        /// Body excerpt.
        body: String,
    },
    /// Envelope message mismatch.
    #[error("expected message \"{expected}\", observed \"{observed}\"")]
    UnexpectedMessage {
        /// Contracted message.
        expected: String,
        /// Observed message, or `<absent>`.
        observed: String,
    },
    /// Body lacks a contracted substring.
    #[error("expected body to contain \"{expected}\"; body: {body}")]
    MissingSubstring {
        /// Contracted substring.
        expected: String,
        /// Body excerpt.
        body: String,
    },
    /// Body does not decode into the contracted shape.
    #[error("malformed response body: {error}; body: {body}")]
    MalformedBody {
        /// Decoder error.
        error: String,
        /// Body excerpt.
        body: String,
    },
    /// Listing was empty.
    #[error("listing returned no ideas")]
    EmptyListing,
    /// Last listed element has no id.
    #[error("last listed idea carries no id")]
    MissingId,
}

/// Checks the status code.
///
/// # Errors
///
/// Returns [`ContractViolation::UnexpectedStatus`] on mismatch.
pub fn expect_status(response: &RawResponse, expected: u16) -> Result<(), ContractViolation> {
    if response.status == expected {
        return Ok(());
    }
    Err(ContractViolation::UnexpectedStatus {
        expected,
        observed: response.status,
        body: preview(&response.body),
    })
}

/// Checks the envelope message for exact equality.
///
/// # Errors
///
/// Returns [`ContractViolation::UnexpectedMessage`] on mismatch or absence.
pub fn expect_message(envelope: &ApiResponse, expected: &str) -> Result<(), ContractViolation> {
    if envelope.message.as_deref() == Some(expected) {
        return Ok(());
    }
    Err(ContractViolation::UnexpectedMessage {
        expected: expected.to_string(),
        observed: envelope.message.clone().unwrap_or_else(|| "<absent>".to_string()),
    })
}

/// Checks that the raw body contains `expected`.
///
/// # Errors
///
/// Returns [`ContractViolation::MissingSubstring`] when it does not.
pub fn expect_body_contains(response: &RawResponse, expected: &str) -> Result<(), ContractViolation> {
    if response.body.contains(expected) {
        return Ok(());
    }
    Err(ContractViolation::MissingSubstring {
        expected: expected.to_string(),
        body: preview(&response.body),
    })
}

/// Truncates a body for inclusion in a violation.
pub(crate) fn preview(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(BODY_PREVIEW_CHARS).collect();
    if chars.next().is_some() { format!("{head}…") } else { head }
}
