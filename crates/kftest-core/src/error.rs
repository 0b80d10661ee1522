//! Error taxonomy for the harness.

use std::path::PathBuf;

/// Errors produced while running the registry.
///
/// A test that exits non-zero is not an error; it is recorded in the
/// verdict. Only conditions that stop a test from producing a result at all
/// end up here.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("cannot start test {name} ({}): {source}", path.display())]
    Spawn {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting on test {name}: {source}")]
    Wait {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate test name in registry: {0}")]
    DuplicateTest(String),

    #[error("report i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl HarnessError {
    /// Whether this error means a test executable could not be started.
    pub fn is_fatal_spawn(&self) -> bool {
        matches!(self, HarnessError::Spawn { .. })
    }
}

/// Result type for harness operations.
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;
