// crates/idea-center-harness/src/report.rs
// ============================================================================
// Module: Suite Report
// Description: Per-step outcomes, aggregate results, and run artifacts.
// Purpose: Render results for humans and persist deterministic summaries.
// Dependencies: serde, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! A [`SuiteReport`] aggregates one [`StepOutcome`] per executed step. It
//! renders as plain text or Markdown, and [`RunArtifacts`] writes
//! `summary.json` (canonical JSON), `summary.md`, and `transcript.json`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use thiserror::Error;

use crate::client::TranscriptEntry;
use crate::steps::StepError;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Pass/fail state of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Contract held.
    Passed,
    /// Contract broken or request failed.
    Failed,
}

impl StepStatus {
    /// Returns the tag used in text output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
        }
    }
}

/// Failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No response was obtained.
    Transport,
    /// Response broke the contract.
    Contract,
    /// Required context id was absent.
    MissingContext,
}

/// Why a step failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    /// Classification.
    pub kind: FailureKind,
    /// Human-readable detail.
    pub message: String,
}

impl From<&StepError> for StepFailure {
    fn from(err: &StepError) -> Self {
        let kind = match err {
            StepError::Transport(_) => FailureKind::Transport,
            StepError::Contract(_) => FailureKind::Contract,
            StepError::MissingContext => FailureKind::MissingContext,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Result of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// 1-based plan position.
    pub order: u8,
    /// Step name.
    pub name: String,
    /// Pass/fail.
    pub status: StepStatus,
    /// Failure detail when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl StepOutcome {
    /// Builds an outcome from a step result.
    #[must_use]
    pub fn from_result(
        order: u8,
        name: &str,
        result: &Result<(), StepError>,
        duration_ms: u64,
    ) -> Self {
        let (status, failure) = match result {
            Ok(()) => (StepStatus::Passed, None),
            Err(err) => (StepStatus::Failed, Some(StepFailure::from(err))),
        };
        Self {
            order,
            name: name.to_string(),
            status,
            failure,
            duration_ms,
        }
    }

    /// Returns true when the step passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == StepStatus::Passed
    }
}

// ============================================================================
// SECTION: Suite Report
// ============================================================================

/// Aggregate result of one run.
///
/// # Invariants
/// - `passed + failed == steps.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Target base URL.
    pub base_url: String,
    /// Run start, Unix epoch milliseconds.
    pub started_at_ms: u64,
    /// Run end, Unix epoch milliseconds.
    pub ended_at_ms: u64,
    /// Outcomes in execution order.
    pub steps: Vec<StepOutcome>,
    /// Passed step count.
    pub passed: usize,
    /// Failed step count.
    pub failed: usize,
}

impl SuiteReport {
    /// Aggregates outcomes into a report.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        started_at_ms: u64,
        ended_at_ms: u64,
        steps: Vec<StepOutcome>,
    ) -> Self {
        let passed = steps.iter().filter(|step| step.passed()).count();
        let failed = steps.len().saturating_sub(passed);
        Self {
            base_url: base_url.into(),
            started_at_ms,
            ended_at_ms,
            steps,
            passed,
            failed,
        }
    }

    /// Returns true when every step passed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total run duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.ended_at_ms.saturating_sub(self.started_at_ms)
    }

    /// Renders one line per step plus a summary line.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let _ = write!(
                out,
                "[{}] {}. {} ({} ms)",
                step.status.label(),
                step.order,
                step.name,
                step.duration_ms
            );
            if let Some(failure) = &step.failure {
                let _ = write!(out, ": {}", failure.message);
            }
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{} passed, {} failed ({} ms) against {}",
            self.passed,
            self.failed,
            self.duration_ms(),
            self.base_url
        );
        out
    }

    /// Renders a Markdown summary.
    #[must_use]
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Idea Center Contract Summary\n\n");
        out.push_str("## Status\n\n");
        let _ = writeln!(out, "- Target: {}", self.base_url);
        let _ = writeln!(out, "- Result: {}", if self.is_success() { "passed" } else { "failed" });
        let _ = writeln!(out, "- Passed: {}", self.passed);
        let _ = writeln!(out, "- Failed: {}", self.failed);
        let _ = writeln!(out, "- Duration (ms): {}", self.duration_ms());
        out.push_str("\n## Steps\n\n");
        out.push_str("| Order | Step | Status | Duration (ms) | Detail |\n");
        out.push_str("|---|---|---|---|---|\n");
        for step in &self.steps {
            let detail = step
                .failure
                .as_ref()
                .map_or_else(String::new, |failure| escape_cell(&failure.message));
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                step.order,
                step.name,
                step.status.label(),
                step.duration_ms,
                detail
            );
        }
        out
    }
}

/// Keeps a table cell on one line and free of column separators.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Current time in Unix epoch milliseconds.
#[must_use]
pub fn now_millis() -> u64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

// ============================================================================
// SECTION: Artifacts
// ============================================================================

/// Artifact write failures.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem write failed.
    #[error("failed to write {path}: {error}")]
    Io {
        /// Target path.
        path: String,
        /// Underlying error text.
        error: String,
    },
    /// JSON encoding failed.
    #[error("failed to encode {name}: {error}")]
    Encode {
        /// Artifact name.
        name: String,
        /// Encoder error text.
        error: String,
    },
}

/// Writes run artifacts under one directory.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    /// Artifact directory.
    root: PathBuf,
}

impl RunArtifacts {
    /// Creates the artifact directory.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] when the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| ReportError::Io {
            path: root.display().to_string(),
            error: err.to_string(),
        })?;
        Ok(Self {
            root,
        })
    }

    /// Returns the artifact directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a JSON artifact using canonical JCS serialization.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when encoding or writing fails.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, ReportError> {
        let bytes = serde_jcs::to_vec(value).map_err(|err| ReportError::Encode {
            name: name.to_string(),
            error: err.to_string(),
        })?;
        self.write_bytes(name, &bytes)
    }

    /// Writes a UTF-8 text artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] when writing fails.
    pub fn write_text(&self, name: &str, value: &str) -> Result<PathBuf, ReportError> {
        self.write_bytes(name, value.as_bytes())
    }

    /// Writes the summary pair and the request transcript.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when any artifact cannot be written.
    pub fn write_run(
        &self,
        report: &SuiteReport,
        transcript: &[TranscriptEntry],
    ) -> Result<Vec<PathBuf>, ReportError> {
        Ok(vec![
            self.write_json("summary.json", report)?,
            self.write_text("summary.md", &report.render_markdown())?,
            self.write_json("transcript.json", &transcript)?,
        ])
    }

    /// Writes raw bytes to `root/name`.
    fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, ReportError> {
        let path = self.root.join(name);
        fs::write(&path, bytes).map_err(|err| ReportError::Io {
            path: path.display().to_string(),
            error: err.to_string(),
        })?;
        Ok(path)
    }
}
