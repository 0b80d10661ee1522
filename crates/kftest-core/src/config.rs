//! Harness configuration.

use crate::aggregate::Verdict;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do when a test executable cannot be started.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Stop the whole run and return the spawn error.
    #[default]
    Abort,

    /// Log a warning, record the test as skipped and keep going.
    Skip,
}

/// Configuration for one harness run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory the registry paths are relative to.
    pub test_dir: PathBuf,

    /// Behaviour on spawn failure.
    pub spawn_policy: SpawnPolicy,

    /// Exit non-zero when the verdict is not all-passed.
    pub strict_exit: bool,

    /// Optional path for the JSON run report.
    pub report_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            test_dir: PathBuf::from("test"),
            spawn_policy: SpawnPolicy::Abort,
            strict_exit: false,
            report_path: None,
        }
    }
}

impl HarnessConfig {
    pub fn with_test_dir(mut self, test_dir: impl Into<PathBuf>) -> Self {
        self.test_dir = test_dir.into();
        self
    }

    pub fn with_spawn_policy(mut self, spawn_policy: SpawnPolicy) -> Self {
        self.spawn_policy = spawn_policy;
        self
    }

    pub fn with_strict_exit(mut self, strict_exit: bool) -> Self {
        self.strict_exit = strict_exit;
        self
    }

    pub fn with_report_path(mut self, report_path: Option<PathBuf>) -> Self {
        self.report_path = report_path;
        self
    }

    /// Whether the harness itself should exit successfully.
    ///
    /// Without `strict_exit` a completed run always succeeds, whatever the
    /// individual tests reported.
    pub fn exit_success(&self, verdict: &Verdict) -> bool {
        !self.strict_exit || verdict.all_passed
    }
}
