// crates/idea-center-harness/src/steps.rs
// ============================================================================
// Module: Step Plan
// Description: The ordered Idea Center lifecycle steps and their contracts.
// Purpose: Build, send, and check each step's request against its contract.
// Dependencies: reqwest, thiserror, tracing
// ============================================================================

//! ## Overview
//! The plan is a fixed, ordered list of seven steps. Each step sends exactly
//! one request through the shared [`ApiClient`] and checks the response.
//!
//! | Order | Step | Contract |
//! |---|---|---|
//! | 1 | create | 200, message "Successfully created!" |
//! | 2 | list_all | 200, non-empty list; records the last id |
//! | 3 | edit | 200, message "Edited successfully" |
//! | 4 | delete | 200, body contains "The idea is deleted!" |
//! | 5 | create_invalid | 400 |
//! | 6 | edit_non_existing | 400, body contains "There is no such idea!" |
//! | 7 | delete_non_existing | 400, body contains "There is no such idea!" |
//!
//! Steps 3, 4 and 7 target the id recorded by step 2. When that id is absent
//! they fail with [`StepError::MissingContext`] without sending anything.

use reqwest::Method;
use thiserror::Error;
use tracing::debug;

use crate::client::ApiClient;
use crate::client::RequestOptions;
use crate::client::TransportError;
use crate::context::TestContext;
use crate::expect::ContractViolation;
use crate::expect::expect_body_contains;
use crate::expect::expect_message;
use crate::expect::expect_status;
use crate::model::ApiResponse;
use crate::model::IdeaInput;
use crate::model::endpoints;
use crate::model::messages;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Idea id the server never issues.
pub const SENTINEL_IDEA_ID: &str = "2436";

/// HTTP 200.
const STATUS_OK: u16 = 200;
/// HTTP 400.
const STATUS_BAD_REQUEST: u16 = 400;

/// Payload for the create step.
#[must_use]
pub fn create_payload() -> IdeaInput {
    IdeaInput::new("new Idea", "This is an example of creating a idea's description", "")
}

/// Payload for the edit steps.
#[must_use]
pub fn edit_payload() -> IdeaInput {
    IdeaInput::new("Edited Idea", "This is an updated test idea description.", "")
}

/// Payload the server must reject: only `url` is present.
#[must_use]
pub fn invalid_payload() -> IdeaInput {
    IdeaInput::url_only("")
}

// ============================================================================
// SECTION: Plan
// ============================================================================

/// Identifies one step of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    /// Create an idea with every field populated.
    Create,
    /// List ideas and record the last id.
    ListAll,
    /// Edit the recorded idea.
    Edit,
    /// Delete the recorded idea.
    Delete,
    /// Create with an incomplete body.
    CreateInvalid,
    /// Edit the sentinel id.
    EditNonExisting,
    /// Delete the already-deleted recorded idea.
    DeleteNonExisting,
}

impl StepId {
    /// Steps in execution order.
    pub const ORDERED: [Self; 7] = [
        Self::Create,
        Self::ListAll,
        Self::Edit,
        Self::Delete,
        Self::CreateInvalid,
        Self::EditNonExisting,
        Self::DeleteNonExisting,
    ];

    /// Returns the stable step name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::ListAll => "list_all",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::CreateInvalid => "create_invalid",
            Self::EditNonExisting => "edit_non_existing",
            Self::DeleteNonExisting => "delete_non_existing",
        }
    }

    /// Returns true when the step targets the recorded idea id.
    #[must_use]
    pub const fn requires_idea_id(self) -> bool {
        matches!(self, Self::Edit | Self::Delete | Self::DeleteNonExisting)
    }
}

/// One entry of the ordered plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDescriptor {
    /// 1-based position.
    pub order: u8,
    /// Step identity.
    pub id: StepId,
    /// Stable name.
    pub name: &'static str,
    /// Whether the step reads the context id.
    pub requires_idea_id: bool,
}

/// Returns the plan in execution order.
#[must_use]
pub fn plan() -> Vec<StepDescriptor> {
    StepId::ORDERED
        .iter()
        .zip(1_u8..)
        .map(|(id, order)| StepDescriptor {
            order,
            id: *id,
            name: id.name(),
            requires_idea_id: id.requires_idea_id(),
        })
        .collect()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Why a step failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    /// No response was obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A response was obtained but broke the contract.
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    /// The step needs the listed idea id and none was recorded.
    #[error("no idea id recorded by the listing step")]
    MissingContext,
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Runs one step.
///
/// # Errors
///
/// Returns [`StepError`] when the request fails, the response breaks the
/// step's contract, or a required context id is absent.
pub async fn run_step(
    id: StepId,
    client: &ApiClient,
    context: &mut TestContext,
) -> Result<(), StepError> {
    match id {
        StepId::Create => create(client).await,
        StepId::ListAll => list_all(client, context).await,
        StepId::Edit => edit(client, required_id(context)?).await,
        StepId::Delete => delete(client, required_id(context)?).await,
        StepId::CreateInvalid => create_invalid(client).await,
        StepId::EditNonExisting => edit_non_existing(client).await,
        StepId::DeleteNonExisting => delete_non_existing(client, required_id(context)?).await,
    }
}

/// Reads the context id or fails the step.
fn required_id(context: &TestContext) -> Result<String, StepError> {
    context.last_created_idea_id().map(str::to_string).ok_or(StepError::MissingContext)
}

/// Step 1.
async fn create(client: &ApiClient) -> Result<(), StepError> {
    let options = RequestOptions::new().json(&create_payload())?;
    let response = client.send(Method::POST, endpoints::CREATE, options).await?;
    expect_status(&response, STATUS_OK)?;
    let envelope: ApiResponse = response.json()?;
    expect_message(&envelope, messages::CREATED)?;
    Ok(())
}

/// Step 2. Records the id of the last listed idea.
async fn list_all(client: &ApiClient, context: &mut TestContext) -> Result<(), StepError> {
    let response = client.send(Method::GET, endpoints::ALL, RequestOptions::new()).await?;
    expect_status(&response, STATUS_OK)?;
    let ideas: Vec<ApiResponse> = response.json()?;
    debug!(count = ideas.len(), "listed ideas");
    let last = ideas.last().ok_or(ContractViolation::EmptyListing)?;
    let id = last
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or(ContractViolation::MissingId)?;
    context.record_idea_id(id);
    Ok(())
}

/// Step 3.
async fn edit(client: &ApiClient, idea_id: String) -> Result<(), StepError> {
    let options = RequestOptions::new()
        .query(endpoints::IDEA_ID_PARAM, idea_id)
        .json(&edit_payload())?;
    let response = client.send(Method::PUT, endpoints::EDIT, options).await?;
    expect_status(&response, STATUS_OK)?;
    let envelope: ApiResponse = response.json()?;
    expect_message(&envelope, messages::EDITED)?;
    Ok(())
}

/// Step 4.
async fn delete(client: &ApiClient, idea_id: String) -> Result<(), StepError> {
    let options = RequestOptions::new().query(endpoints::IDEA_ID_PARAM, idea_id);
    let response = client.send(Method::DELETE, endpoints::DELETE, options).await?;
    expect_status(&response, STATUS_OK)?;
    expect_body_contains(&response, messages::DELETED)?;
    Ok(())
}

/// Step 5.
async fn create_invalid(client: &ApiClient) -> Result<(), StepError> {
    let options = RequestOptions::new().json(&invalid_payload())?;
    let response = client.send(Method::POST, endpoints::CREATE, options).await?;
    expect_status(&response, STATUS_BAD_REQUEST)?;
    Ok(())
}

/// Step 6.
async fn edit_non_existing(client: &ApiClient) -> Result<(), StepError> {
    let options = RequestOptions::new()
        .query(endpoints::IDEA_ID_PARAM, SENTINEL_IDEA_ID)
        .json(&edit_payload())?;
    let response = client.send(Method::PUT, endpoints::EDIT, options).await?;
    expect_status(&response, STATUS_BAD_REQUEST)?;
    expect_body_contains(&response, messages::NO_SUCH_IDEA)?;
    Ok(())
}

/// Step 7.
async fn delete_non_existing(client: &ApiClient, idea_id: String) -> Result<(), StepError> {
    let options = RequestOptions::new().query(endpoints::IDEA_ID_PARAM, idea_id);
    let response = client.send(Method::DELETE, endpoints::DELETE, options).await?;
    expect_status(&response, STATUS_BAD_REQUEST)?;
    expect_body_contains(&response, messages::NO_SUCH_IDEA)?;
    Ok(())
}
