//! Console reporting and the JSON run report.
//!
//! The console format is line oriented and padded with blank lines:
//!
//! ```text
//!
//! [*] Running tests.
//!
//! <test output, verbatim>
//! 2 tests failed in sbox
//!
//! ```
//!
//! `[*] All tests passed.` is printed only when every test exited 0.

use crate::aggregate::{Failure, Verdict};
use crate::error::HarnessResult;
use crate::harness::{HarnessRun, TestOutcome};
use crate::registry::Registry;
use crate::runner::ExecutionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const BANNER: &str = "[*] Running tests.";
pub const ALL_PASSED: &str = "[*] All tests passed.";

/// Writes the human-readable run report.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the banner, once, before any test runs.
    pub fn banner(&mut self) -> HarnessResult<()> {
        write!(self.out, "\n{}\n\n", BANNER)?;
        self.out.flush()?;
        Ok(())
    }

    /// Forward a test's captured output verbatim.
    pub fn report_output(&mut self, result: &ExecutionResult) -> HarnessResult<()> {
        self.out.write_all(&result.output)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn report_failure(&mut self, failure: &Failure) -> HarnessResult<()> {
        write!(
            self.out,
            "{} tests failed in {}\n\n",
            failure.failed_checks, failure.name
        )?;
        Ok(())
    }

    pub fn report_skipped(&mut self, name: &str, reason: &str) -> HarnessResult<()> {
        write!(self.out, "[!] Could not start {}: {}\n\n", name, reason)?;
        Ok(())
    }

    /// Print the all-passed line if the verdict allows it; otherwise nothing.
    pub fn report_summary(&mut self, verdict: &Verdict) -> HarnessResult<()> {
        if verdict.all_passed {
            write!(self.out, "{}\n\n", ALL_PASSED)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Per-test status in the JSON report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Signaled,
    Skipped,
}

/// One test in the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestReport {
    pub name: String,
    pub path: Option<PathBuf>,
    pub status: TestStatus,
    pub exit_code: Option<i32>,
    pub duration_ms: Option<u64>,
    pub output: String,
    pub error: Option<String>,
}

/// Machine-readable record of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub run_id: Uuid,
    pub run_at: DateTime<Utc>,
    pub registry_digest: String,
    pub duration_ms: u64,
    pub tests: Vec<TestReport>,
    pub verdict: Verdict,
}

impl RunReport {
    /// Build the report for a finished run.
    pub fn new(run: &HarnessRun, registry: &Registry) -> Self {
        let tests = run
            .outcomes
            .iter()
            .map(|outcome| {
                let path = registry.get(outcome.name()).map(|e| e.path.clone());
                match outcome {
                    TestOutcome::Finished(result) => TestReport {
                        name: result.name.clone(),
                        path,
                        status: if result.passed() {
                            TestStatus::Passed
                        } else if result.failed() {
                            TestStatus::Failed
                        } else {
                            TestStatus::Signaled
                        },
                        exit_code: Some(result.exit_code),
                        duration_ms: Some(result.duration_ms),
                        output: result.output_lossy(),
                        error: None,
                    },
                    TestOutcome::Skipped { name, reason } => TestReport {
                        name: name.clone(),
                        path,
                        status: TestStatus::Skipped,
                        exit_code: None,
                        duration_ms: None,
                        output: String::new(),
                        error: Some(reason.clone()),
                    },
                }
            })
            .collect();

        Self {
            run_id: run.run_id,
            run_at: run.started_at,
            registry_digest: run.registry_digest.clone(),
            duration_ms: run.duration_ms,
            tests,
            verdict: run.verdict.clone(),
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, out: W) -> HarnessResult<()> {
        serde_json::to_writer_pretty(out, self)?;
        Ok(())
    }

    /// Write the report to a file, replacing any existing one.
    pub fn write_to_path(&self, path: &Path) -> HarnessResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
