//! Centralised tracing initialisation for the kftest binary.
//!
//! Call [`init_tracing`] once at program start to configure the global
//! subscriber with an `EnvFilter` and optional JSON formatting.
//!
//! Log lines always go to stderr: stdout carries the test report.

use tracing::{Level, Span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};
use uuid::Uuid;

/// Initialise the global tracing subscriber.
///
/// * `json` - when `true`, emit newline-delimited JSON log lines.
/// * `level` - default verbosity when `RUST_LOG` is not set.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case this call changes nothing.
pub fn init_tracing(json: bool, level: Level) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let stderr_layer = if json {
        stderr_layer.json().boxed()
    } else {
        stderr_layer.boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .is_ok()
}

/// Span tagging every log line of one harness run with its `run_id`.
pub fn run_span(run_id: &Uuid) -> Span {
    tracing::info_span!("kftest.run", run_id = %run_id)
}
