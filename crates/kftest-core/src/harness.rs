//! Orchestration loop: run every registered test and report.

use crate::aggregate::{Aggregator, Verdict};
use crate::config::SpawnPolicy;
use crate::error::HarnessResult;
use crate::registry::Registry;
use crate::report::Reporter;
use crate::runner::{ExecutionResult, TestExecutor};
use crate::telemetry::run_span;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

/// What happened to one registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// The executable ran to completion.
    Finished(ExecutionResult),

    /// The executable could not be started and the skip policy was in effect.
    Skipped { name: String, reason: String },
}

impl TestOutcome {
    pub fn name(&self) -> &str {
        match self {
            TestOutcome::Finished(result) => &result.name,
            TestOutcome::Skipped { name, .. } => name,
        }
    }
}

/// Result of a complete harness run.
#[derive(Debug, Clone)]
pub struct HarnessRun {
    /// Identifier for this run (logs and JSON report).
    pub run_id: Uuid,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// Digest of the registry that was run.
    pub registry_digest: String,

    /// Outcomes in registry order.
    pub outcomes: Vec<TestOutcome>,

    /// Aggregate verdict over `outcomes`.
    pub verdict: Verdict,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Sequential test harness.
pub struct Harness;

impl Harness {
    /// Run every entry of the registry, one at a time, and report.
    ///
    /// Each test's output is written to the reporter as soon as the test
    /// terminates. After the last test, failure lines and the summary are
    /// written.
    ///
    /// A spawn failure under `SpawnPolicy::Abort` returns the error
    /// immediately: no failure lines or summary are written.
    pub async fn run<E, W>(
        executor: &E,
        registry: &Registry,
        reporter: &mut Reporter<W>,
        spawn_policy: SpawnPolicy,
    ) -> HarnessResult<HarnessRun>
    where
        E: TestExecutor + ?Sized,
        W: Write,
    {
        let run_id = Uuid::new_v4();
        Self::run_all(run_id, executor, registry, reporter, spawn_policy)
            .instrument(run_span(&run_id))
            .await
    }

    async fn run_all<E, W>(
        run_id: Uuid,
        executor: &E,
        registry: &Registry,
        reporter: &mut Reporter<W>,
        spawn_policy: SpawnPolicy,
    ) -> HarnessResult<HarnessRun>
    where
        E: TestExecutor + ?Sized,
        W: Write,
    {
        let start = Instant::now();
        let started_at = Utc::now();

        info!(tests = registry.len(), "Starting test run");

        reporter.banner()?;

        let mut outcomes = Vec::with_capacity(registry.len());

        for entry in registry {
            debug!(test = %entry.name, "Executing test");

            let result = match executor.execute(entry).await {
                Ok(result) => result,
                Err(e) if e.is_fatal_spawn() && spawn_policy == SpawnPolicy::Skip => {
                    warn!(test = %entry.name, error = %e, "Skipping test that could not start");
                    outcomes.push(TestOutcome::Skipped {
                        name: entry.name.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            reporter.report_output(&result)?;

            if result.exit_code < 0 {
                warn!(
                    test = %result.name,
                    exit_code = result.exit_code,
                    "Test terminated by signal"
                );
            } else {
                info!(
                    test = %result.name,
                    exit_code = result.exit_code,
                    duration_ms = result.duration_ms,
                    "Test finished"
                );
            }

            outcomes.push(TestOutcome::Finished(result));
        }

        let verdict = Aggregator::aggregate(&outcomes);

        for failure in &verdict.failures {
            reporter.report_failure(failure)?;
        }
        for outcome in &outcomes {
            if let TestOutcome::Skipped { name, reason } = outcome {
                reporter.report_skipped(name, reason)?;
            }
        }
        reporter.report_summary(&verdict)?;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            passed = verdict.passed_count(),
            failed = verdict.failed_count(),
            skipped = verdict.skipped.len(),
            all_passed = verdict.all_passed,
            duration_ms = duration_ms,
            "Test run finished"
        );

        Ok(HarnessRun {
            run_id,
            started_at,
            registry_digest: registry.digest(),
            outcomes,
            verdict,
            duration_ms,
        })
    }
}
