// crates/idea-center-harness/src/orchestrator.rs
// ============================================================================
// Module: Suite Orchestrator
// Description: Sequential, fail-open driver for the step plan.
// Purpose: Own run setup, step execution, and teardown.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! [`SuiteRunner::run`] resolves the credential once, builds one
//! [`ApiClient`], creates a fresh [`TestContext`], and executes every step of
//! [`plan`] in order. A failed step is recorded and the next step still runs.
//! The client is released at teardown whatever the step outcomes were.
//!
//! Only setup failures (authentication, client construction) surface as
//! [`HarnessError`]; no step runs in that case.

use std::time::Instant;

use thiserror::Error;
use tracing::Instrument;
use tracing::info;
use tracing::info_span;
use tracing::warn;

use crate::auth::AuthProvider;
use crate::auth::AuthenticationError;
use crate::client::ApiClient;
use crate::client::TranscriptEntry;
use crate::client::TransportError;
use crate::config::HarnessConfig;
use crate::context::TestContext;
use crate::report::StepOutcome;
use crate::report::SuiteReport;
use crate::report::now_millis;
use crate::steps::plan;
use crate::steps::run_step;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Setup failures that abort a run before any step executes.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Credential could not be resolved.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
    /// API client could not be built.
    #[error("failed to build api client: {0}")]
    Client(#[from] TransportError),
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct SuiteRun {
    /// Aggregate step results.
    pub report: SuiteReport,
    /// Every request attempt, in order.
    pub transcript: Vec<TranscriptEntry>,
    /// Final cross-step state.
    pub context: TestContext,
}

/// Drives one run against one configured target.
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    /// Validated configuration.
    config: HarnessConfig,
}

impl SuiteRunner {
    /// Creates a runner.
    #[must_use]
    pub const fn new(config: HarnessConfig) -> Self {
        Self {
            config,
        }
    }

    /// Executes the full plan.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when setup fails. Step failures are reported
    /// in the returned [`SuiteRun`].
    pub async fn run(&self) -> Result<SuiteRun, HarnessError> {
        let started_at_ms = now_millis();
        let provider = AuthProvider::new(&self.config.base_url)?;
        let credential = provider.resolve(&self.config.credentials).await?;
        let client = ApiClient::new(self.config.base_url.clone(), credential)?;
        let mut context = TestContext::new();

        let steps = execute_plan(&client, &mut context).await;

        let transcript = client.close();
        let report =
            SuiteReport::new(self.config.base_url.as_str(), started_at_ms, now_millis(), steps);
        info!(passed = report.passed, failed = report.failed, "suite finished");
        Ok(SuiteRun {
            report,
            transcript,
            context,
        })
    }
}

/// Runs every planned step in order against `client`.
///
/// Steps never short-circuit: each outcome is recorded and the next step runs.
pub async fn execute_plan(client: &ApiClient, context: &mut TestContext) -> Vec<StepOutcome> {
    let mut outcomes = Vec::new();
    for descriptor in plan() {
        let span = info_span!("step", order = descriptor.order, name = descriptor.name);
        span.in_scope(|| info!(requires_idea_id = descriptor.requires_idea_id, "step started"));
        let started = Instant::now();
        let result = run_step(descriptor.id, client, context).instrument(span.clone()).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        span.in_scope(|| match &result {
            Ok(()) => info!(duration_ms, "step passed"),
            Err(err) => warn!(duration_ms, error = %err, "step failed"),
        });
        outcomes.push(StepOutcome::from_result(
            descriptor.order,
            descriptor.name,
            &result,
            duration_ms,
        ));
    }
    outcomes
}
