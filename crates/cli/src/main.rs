//! CLI entry point for chordctl.

use clap::Parser;
use cli::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    setup_tracing(&config.log_level);
    config.run().await
}

/// Respects `RUST_LOG` if set, otherwise uses `--log-level`. Logs go to
/// stderr so `--json` output stays parseable.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
