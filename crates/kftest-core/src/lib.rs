//! kftest core - sequential harness for standalone test executables
//!
//! Provides a test orchestrator that:
//! - Runs a fixed registry of external test programs, one at a time
//! - Forwards each program's stdout verbatim as it completes
//! - Aggregates exit codes into a pass/fail verdict and summary

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fakes;
pub mod harness;
pub mod registry;
pub mod report;
pub mod runner;
pub mod telemetry;

// Re-export key types
pub use aggregate::{Aggregator, Failure, Verdict};
pub use config::{HarnessConfig, SpawnPolicy};
pub use error::{HarnessError, HarnessResult};
pub use harness::{Harness, HarnessRun, TestOutcome};
pub use registry::{BuiltinTest, Registry, TestEntry};
pub use report::{Reporter, RunReport};
pub use runner::{ExecutionResult, ProcessRunner, TestExecutor};
pub use telemetry::init_tracing;
