// crates/idea-center-harness/src/context.rs
// ============================================================================
// Module: Test Context
// Description: Cross-step state for one harness run.
// Purpose: Carry the idea id discovered by the listing step to later steps.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! A [`TestContext`] is created fresh for every run and handed to each step by
//! `&mut` reference. It holds a single slot: the id of the last listed idea.
//! Only the listing step writes it; nothing clears it within a run.

use tracing::debug;

/// Mutable cross-step state.
///
/// # Invariants
/// - Starts empty.
/// - Once set, the slot is only ever replaced, never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestContext {
    /// Id of the most recently listed idea.
    last_created_idea_id: Option<String>,
}

impl TestContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_created_idea_id: None,
        }
    }

    /// Returns the recorded idea id, if any.
    #[must_use]
    pub fn last_created_idea_id(&self) -> Option<&str> {
        self.last_created_idea_id.as_deref()
    }

    /// Records the idea id for downstream steps.
    pub fn record_idea_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!(idea_id = %id, "recorded idea id");
        self.last_created_idea_id = Some(id);
    }
}
