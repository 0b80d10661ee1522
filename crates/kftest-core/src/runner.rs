//! Test executable spawning and output capture.

use crate::error::{HarnessError, HarnessResult};
use crate::registry::TestEntry;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Result of one test executable run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Test name.
    pub name: String,

    /// Exit code (0 = success, N > 0 = N failing checks, < 0 = signal).
    pub exit_code: i32,

    /// Captured stdout, byte for byte.
    pub output: Vec<u8>,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Whether this test passed (exit code 0).
    pub fn passed(&self) -> bool {
        self.exit_code == 0
    }

    /// Whether this test reported failing checks (exit code > 0).
    pub fn failed(&self) -> bool {
        self.exit_code > 0
    }

    /// Captured output as text, replacing invalid UTF-8.
    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Something that can run a single test entry to completion.
#[async_trait]
pub trait TestExecutor: Send + Sync {
    /// Run the test and wait for it to terminate.
    ///
    /// Returns `HarnessError::Spawn` if the executable cannot be started.
    async fn execute(&self, entry: &TestEntry) -> HarnessResult<ExecutionResult>;
}

/// Runs test executables as child processes under a fixed directory.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    test_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(test_dir: impl Into<PathBuf>) -> Self {
        Self {
            test_dir: test_dir.into(),
        }
    }

    /// Full path of the executable for an entry.
    pub fn resolve(&self, entry: &TestEntry) -> PathBuf {
        self.test_dir.join(&entry.path)
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new("test")
    }
}

#[async_trait]
impl TestExecutor for ProcessRunner {
    async fn execute(&self, entry: &TestEntry) -> HarnessResult<ExecutionResult> {
        let start = Instant::now();
        let path = self.resolve(entry);

        debug!(test = %entry.name, path = %path.display(), "Spawning test");

        // stderr and stdin stay attached to the harness
        let child = Command::new(&path)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .stdin(Stdio::inherit())
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                name: entry.name.clone(),
                path: path.clone(),
                source,
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| HarnessError::Wait {
                name: entry.name.clone(),
                source,
            })?;

        Ok(ExecutionResult {
            name: entry.name.clone(),
            exit_code: exit_code_of(output.status),
            output: output.stdout,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Map an exit status to an integer code; signals become `-signal`.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
