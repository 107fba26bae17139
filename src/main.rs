use std::{process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use sse_probe::{
    Console, Probe, ProbeConfig, DEFAULT_BASE_URL, DEFAULT_GRACE, DEFAULT_MIN_LIFETIME,
    DEFAULT_TIMEOUT, DEFAULT_USERNAME,
};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "sse-probe", version, about = "Check that an SSE endpoint streams and stays open")]
struct Cli {
    /// Server base URL
    #[arg(default_value = DEFAULT_BASE_URL)]
    server: String,

    /// Username sent as the `username` query parameter
    #[arg(default_value = DEFAULT_USERNAME)]
    username: String,

    /// Give up waiting for data after this many milliseconds (counts as success)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Fail if only blank lines arrive for longer than this many milliseconds
    #[arg(long, default_value_t = DEFAULT_GRACE.as_millis() as u64)]
    grace_ms: u64,

    /// Fail if the server closes the stream sooner than this many milliseconds
    #[arg(long, default_value_t = DEFAULT_MIN_LIFETIME.as_millis() as u64)]
    min_lifetime_ms: u64,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> ProbeConfig {
        ProbeConfig {
            base_url: self.server.clone(),
            username: self.username.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            grace: Duration::from_millis(self.grace_ms),
            min_lifetime: Duration::from_millis(self.min_lifetime_ms),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut console = Console;
    console.banner(&cli.server, &cli.username);

    let probe = Probe::new(cli.config()).context("building http client")?;
    let outcome = probe.run(&mut console, interrupted()).await;

    console.verdict(&outcome);
    Ok(ExitCode::from(outcome.exit_code()))
}

/// Resolves on Ctrl+C. Never resolves if the handler can't be installed.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
