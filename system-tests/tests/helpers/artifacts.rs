// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Test Artifacts
// Description: Artifact helpers for system-tests.
// Purpose: Create per-test run roots and write deterministic summaries.
// Dependencies: system-tests, idea-center-harness, serde, serde_jcs
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use idea_center_harness::SuiteRun;
use idea_center_harness::report::RunArtifacts;
use idea_center_harness::report::now_millis;
use serde::Serialize;
use system_tests::config::SystemTestConfig;

#[derive(Debug, Serialize)]
struct TestSummary {
    test_name: String,
    status: String,
    started_at_ms: u64,
    ended_at_ms: u64,
    duration_ms: u64,
    notes: Vec<String>,
}

fn default_run_root(test_name: &str) -> PathBuf {
    let stamp = now_millis();
    PathBuf::from("target/system-tests").join(format!("run_{stamp}")).join(test_name)
}

/// Helper that writes a summary even when a test panics.
pub struct TestReporter {
    root: PathBuf,
    test_name: String,
    started_at_ms: u64,
    finalized: bool,
}

impl TestReporter {
    /// Creates a reporter and its artifact root for the named test.
    pub fn new(test_name: &str) -> io::Result<Self> {
        let config = SystemTestConfig::load().map_err(io::Error::other)?;
        let root = config
            .run_root
            .map_or_else(|| default_run_root(test_name), |root| root.join(test_name));
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            test_name: test_name.to_string(),
            started_at_ms: now_millis(),
            finalized: false,
        })
    }

    /// Returns the artifact root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the harness run artifacts next to the summary.
    pub fn write_run(&self, run: &SuiteRun) -> io::Result<()> {
        let artifacts =
            RunArtifacts::new(self.root.join("run")).map_err(|err| io::Error::other(err.to_string()))?;
        artifacts
            .write_run(&run.report, &run.transcript)
            .map_err(|err| io::Error::other(err.to_string()))?;
        Ok(())
    }

    /// Writes the final summary for the test.
    pub fn finish(&mut self, status: &str, notes: Vec<String>) -> io::Result<()> {
        let ended_at_ms = now_millis();
        let summary = TestSummary {
            test_name: self.test_name.clone(),
            status: status.to_string(),
            started_at_ms: self.started_at_ms,
            ended_at_ms,
            duration_ms: ended_at_ms.saturating_sub(self.started_at_ms),
            notes,
        };
        let json = serde_jcs::to_vec(&summary).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(self.root.join("summary.json"), json)?;
        fs::write(self.root.join("summary.md"), summary_markdown(&summary))?;
        self.finalized = true;
        Ok(())
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let status = if std::thread::panicking() { "panic" } else { "unknown" };
        let _ = self.finish(status, vec!["test terminated without explicit summary".to_string()]);
    }
}

fn summary_markdown(summary: &TestSummary) -> String {
    let mut out = String::new();
    out.push_str("# System-Test Summary\n\n");
    out.push_str(&format!("- Test: {}\n", summary.test_name));
    out.push_str(&format!("- Status: {}\n", summary.status));
    out.push_str(&format!("- Duration (ms): {}\n", summary.duration_ms));
    out.push_str("\n## Notes\n\n");
    if summary.notes.is_empty() {
        out.push_str("- None\n");
    } else {
        for note in &summary.notes {
            out.push_str(&format!("- {note}\n"));
        }
    }
    out
}
