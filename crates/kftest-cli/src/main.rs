//! kftest - run the knifefish unit test executables
//!
//! Runs every registered test under `test/` in order, forwards each test's
//! stdout, then prints a failure line per failing test and a final summary.
//!
//! The exit status is 0 whenever the run completes, even if tests failed,
//! unless `--strict-exit` is given.

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::Parser;
use kftest_core::{
    Harness, HarnessConfig, ProcessRunner, Registry, Reporter, RunReport, SpawnPolicy,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "kftest")]
#[command(author = "Michael Harper")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run the knifefish test executables and summarise the results", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Directory the test executables live under
    #[arg(long, env = "KFTEST_TEST_DIR", default_value = "test")]
    test_dir: PathBuf,

    /// Skip tests whose executable cannot be started instead of aborting
    #[arg(long, env = "KFTEST_SKIP_MISSING", value_parser = FalseyValueParser::new())]
    skip_missing: bool,

    /// Exit with status 1 when any test did not pass
    #[arg(long, env = "KFTEST_STRICT_EXIT", value_parser = FalseyValueParser::new())]
    strict_exit: bool,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// List the registered tests and exit
    #[arg(long)]
    list: bool,
}

impl Cli {
    fn config(&self) -> HarnessConfig {
        let spawn_policy = if self.skip_missing {
            SpawnPolicy::Skip
        } else {
            SpawnPolicy::Abort
        };
        HarnessConfig::default()
            .with_test_dir(&self.test_dir)
            .with_spawn_policy(spawn_policy)
            .with_strict_exit(self.strict_exit)
            .with_report_path(self.report.clone())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    kftest_core::init_tracing(cli.json, level);

    let registry = Registry::builtin();

    if cli.list {
        cmd_list(&registry)?;
        return Ok(ExitCode::SUCCESS);
    }

    cmd_run(&registry, &cli.config()).await
}

/// Print `name<TAB>path` for every registered test
fn cmd_list(registry: &Registry) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for entry in registry {
        writeln!(out, "{}\t{}", entry.name, entry.path.display())?;
    }
    Ok(())
}

/// Run the registry and map the verdict to an exit code
async fn cmd_run(registry: &Registry, config: &HarnessConfig) -> Result<ExitCode> {
    info!(test_dir = %config.test_dir.display(), "Running test registry");

    let runner = ProcessRunner::new(&config.test_dir);
    let mut reporter = Reporter::new(std::io::stdout());

    let run = Harness::run(&runner, registry, &mut reporter, config.spawn_policy)
        .await
        .context("Test run aborted")?;

    if let Some(path) = &config.report_path {
        RunReport::new(&run, registry)
            .write_to_path(path)
            .with_context(|| format!("Failed to write run report to {}", path.display()))?;
        info!(path = %path.display(), "Wrote run report");
    }

    if config.exit_success(&run.verdict) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
