use anyhow::Result;
use tracing_subscriber::EnvFilter;

use slcsp::{run, Diagnostics, RunPaths, TracingDiagnostics};

fn main() -> Result<()> {
    // Diagnostics go to stderr; RUST_LOG=trace itemises every anomaly
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let diagnostics = TracingDiagnostics;
    let summary = run(&RunPaths::default(), &diagnostics)?;
    diagnostics.info(&summary.summary());

    Ok(())
}
