// crates/idea-center-harness/src/model.rs
// ============================================================================
// Module: Idea Center Wire Model
// Description: Request payloads, response envelopes, and endpoint literals.
// Purpose: Keep the API surface the harness exercises in one place.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Wire types for the Idea Center API. Payload fields are optional so the
//! harness can send deliberately incomplete bodies; absent fields are omitted
//! from the JSON rather than serialized as `null`.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Relative API paths consumed by the harness.
pub mod endpoints {
    /// Credential exchange endpoint.
    pub const AUTHENTICATE: &str = "/api/User/Authentication";
    /// Idea creation endpoint.
    pub const CREATE: &str = "/api/Idea/Create";
    /// Idea listing endpoint.
    pub const ALL: &str = "/api/Idea/All";
    /// Idea edit endpoint (takes `ideaId`).
    pub const EDIT: &str = "/api/Idea/Edit";
    /// Idea delete endpoint (takes `ideaId`).
    pub const DELETE: &str = "/api/Idea/Delete";
    /// Query parameter naming the target idea.
    pub const IDEA_ID_PARAM: &str = "ideaId";
}

/// Literal outcome messages the server is contracted to return.
pub mod messages {
    /// Create success message.
    pub const CREATED: &str = "Successfully created!";
    /// Edit success message.
    pub const EDITED: &str = "Edited successfully";
    /// Delete success confirmation.
    pub const DELETED: &str = "The idea is deleted!";
    /// Not-found error for edit and delete.
    pub const NO_SUCH_IDEA: &str = "There is no such idea!";
}

// ============================================================================
// SECTION: Payloads
// ============================================================================

/// Create/edit request payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaInput {
    /// Idea title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Idea description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Idea URL; an empty string is a valid, present value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl IdeaInput {
    /// Builds a payload with every field populated.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            url: Some(url.into()),
        }
    }

    /// Builds a payload carrying only a URL.
    #[must_use]
    pub fn url_only(url: impl Into<String>) -> Self {
        Self {
            title: None,
            description: None,
            url: Some(url.into()),
        }
    }
}

/// Server response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Human-readable outcome.
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
    /// Resource identifier, present on listing and mutation responses.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
}

/// Accepts identifiers encoded as JSON strings or numbers.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        /// String identifier.
        Text(String),
        /// Numeric identifier.
        Number(serde_json::Number),
    }

    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}
