//! bench-aggregate: print batch-size statistics for the benchmark results in
//! `results_quick/`.
//!
//! Run the benchmarks first (`./run_quick_benchmark.sh`). Diagnostics go to
//! stderr and are controlled with `RUST_LOG` (default `warn`).

use anyhow::Context;
use bench_aggregate::{Error, ReportConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn generate(config: &ReportConfig) -> anyhow::Result<String> {
    let report = bench_aggregate::run(config)?;
    report.render().context("failed to render report")
}

fn main() -> ExitCode {
    init_tracing();
    let config = ReportConfig::default();

    match generate(&config) {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(Error::ResultsDirMissing { .. }) = err.downcast_ref::<Error>() {
                println!("Error: {err}");
                println!("Please run the benchmark first: ./run_quick_benchmark.sh");
            } else {
                eprintln!("Error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
