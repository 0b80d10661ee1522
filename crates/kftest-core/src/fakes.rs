//! In-memory fake executor (testing only)
//!
//! `FakeExecutor` answers each test name with a scripted exit code and
//! output, or a spawn failure, without starting any process.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{HarnessError, HarnessResult};
use crate::registry::TestEntry;
use crate::runner::{ExecutionResult, TestExecutor};

#[derive(Debug, Clone)]
enum Script {
    Exit { code: i32, output: Vec<u8> },
    SpawnError,
}

/// Scripted executor keyed by test name.
///
/// Names without a script behave like a missing executable.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a test to exit with `code` after printing `output`.
    pub fn with_exit(mut self, name: &str, code: i32, output: &str) -> Self {
        self.scripts.insert(
            name.to_string(),
            Script::Exit {
                code,
                output: output.as_bytes().to_vec(),
            },
        );
        self
    }

    /// Script a test whose executable cannot be started.
    pub fn with_spawn_error(mut self, name: &str) -> Self {
        self.scripts.insert(name.to_string(), Script::SpawnError);
        self
    }

    /// Names of the tests executed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TestExecutor for FakeExecutor {
    async fn execute(&self, entry: &TestEntry) -> HarnessResult<ExecutionResult> {
        self.calls.lock().unwrap().push(entry.name.clone());

        match self.scripts.get(&entry.name) {
            Some(Script::Exit { code, output }) => Ok(ExecutionResult {
                name: entry.name.clone(),
                exit_code: *code,
                output: output.clone(),
                duration_ms: 0,
            }),
            Some(Script::SpawnError) | None => Err(HarnessError::Spawn {
                name: entry.name.clone(),
                path: PathBuf::from("test").join(&entry.path),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_exit() {
        let fake = FakeExecutor::new().with_exit("pht", 2, "two failed\n");
        let result = fake
            .execute(&TestEntry::new("pht", "pht/test_pht"))
            .await
            .unwrap();
        assert_eq!(result.exit_code, 2);
        assert_eq!(result.output, b"two failed\n".to_vec());
        assert_eq!(fake.calls(), vec!["pht"]);
    }

    #[tokio::test]
    async fn test_unscripted_is_spawn_error() {
        let fake = FakeExecutor::new();
        let err = fake
            .execute(&TestEntry::new("sbox", "sbox/test_sbox"))
            .await
            .unwrap_err();
        assert!(err.is_fatal_spawn());
    }
}
