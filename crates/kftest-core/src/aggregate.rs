//! Exit-code aggregation into an overall verdict.

use crate::harness::TestOutcome;
use serde::{Deserialize, Serialize};

/// A test that reported failing checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Failure {
    /// Test name.
    pub name: String,

    /// Exit code, read as the number of failed checks.
    pub failed_checks: i32,
}

/// Aggregate verdict over a full run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    /// True iff every test finished with exit code 0.
    pub all_passed: bool,

    /// Tests with exit code > 0, in registry order.
    pub failures: Vec<Failure>,

    /// Tests that could not be started (skip policy only).
    pub skipped: Vec<String>,

    /// Tests that finished with exit code 0.
    pub passed: usize,

    /// Total number of outcomes aggregated.
    pub total: usize,
}

impl Verdict {
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn passed_count(&self) -> usize {
        self.passed
    }

    /// Sum of failed checks across all failing tests.
    pub fn total_failed_checks(&self) -> i64 {
        self.failures.iter().map(|f| i64::from(f.failed_checks)).sum()
    }
}

/// Exit-code aggregation rules.
pub struct Aggregator;

impl Aggregator {
    /// Derive the verdict from all outcomes of a run.
    ///
    /// Rules:
    /// - Exit code 0 passes
    /// - Exit code N > 0 is a failure with N failed checks
    /// - Exit code < 0 (signal) is not listed as a failure but still clears
    ///   `all_passed`
    /// - A skipped test clears `all_passed`
    ///
    /// The old Python driver (`test_functions.py`) only cleared its
    /// all-passed flag on codes > 0, so a signal-killed test still got
    /// `[*] All tests passed.` there. Here it does not.
    pub fn aggregate(outcomes: &[TestOutcome]) -> Verdict {
        let mut failures = Vec::new();
        let mut skipped = Vec::new();
        let mut passed = 0;
        let mut all_passed = true;

        for outcome in outcomes {
            match outcome {
                TestOutcome::Finished(result) => {
                    if result.passed() {
                        passed += 1;
                        continue;
                    }
                    all_passed = false;
                    if result.failed() {
                        failures.push(Failure {
                            name: result.name.clone(),
                            failed_checks: result.exit_code,
                        });
                    }
                }
                TestOutcome::Skipped { name, .. } => {
                    all_passed = false;
                    skipped.push(name.clone());
                }
            }
        }

        Verdict {
            all_passed,
            failures,
            skipped,
            passed,
            total: outcomes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ExecutionResult;

    fn finished(name: &str, exit_code: i32) -> TestOutcome {
        TestOutcome::Finished(ExecutionResult {
            name: name.to_string(),
            exit_code,
            output: Vec::new(),
            duration_ms: 1,
        })
    }

    #[test]
    fn test_empty_outcomes_pass() {
        let verdict = Aggregator::aggregate(&[]);
        assert!(verdict.all_passed);
        assert_eq!(verdict.total, 0);
    }

    #[test]
    fn test_all_zero_passes() {
        let verdict = Aggregator::aggregate(&[finished("a", 0), finished("b", 0)]);
        assert!(verdict.all_passed);
        assert!(verdict.failures.is_empty());
        assert_eq!(verdict.passed_count(), 2);
    }

    #[test]
    fn test_positive_exit_is_failure() {
        let verdict = Aggregator::aggregate(&[finished("a", 0), finished("b", 2)]);
        assert!(!verdict.all_passed);
        assert_eq!(
            verdict.failures,
            vec![Failure {
                name: "b".to_string(),
                failed_checks: 2
            }]
        );
        assert_eq!(verdict.total_failed_checks(), 2);
    }

    #[test]
    fn test_failures_keep_registry_order() {
        let verdict = Aggregator::aggregate(&[
            finished("sbox", 3),
            finished("pbox", 0),
            finished("block", 1),
        ]);
        let names: Vec<&str> = verdict.failures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["sbox", "block"]);
        assert_eq!(verdict.failed_count(), 2);
        assert_eq!(verdict.total_failed_checks(), 4);
    }

    #[test]
    fn test_negative_exit_clears_verdict_without_failure_line() {
        let verdict = Aggregator::aggregate(&[finished("a", 0), finished("b", -11)]);
        assert!(!verdict.all_passed);
        assert!(verdict.failures.is_empty());
        assert_eq!(verdict.passed_count(), 1);
    }

    #[test]
    fn test_skipped_clears_verdict() {
        let verdict = Aggregator::aggregate(&[
            finished("a", 0),
            TestOutcome::Skipped {
                name: "b".to_string(),
                reason: "No such file or directory".to_string(),
            },
        ]);
        assert!(!verdict.all_passed);
        assert_eq!(verdict.skipped, vec!["b".to_string()]);
        assert!(verdict.failures.is_empty());
        assert_eq!(verdict.total, 2);
    }
}
