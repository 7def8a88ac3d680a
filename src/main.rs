// Entrypoint for the CLI application.
// - Parses the arguments first: usage errors never read the config file.
// - Logs go to stderr (filter via `RUST_LOG`), command output to stdout.

use anyhow::Context;
use github_hooks::{api::ApiClient, config::Config, ui};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let outcome = ui::run(
        &args,
        || {
            let config = Config::from_env().context("Failed to load configuration")?;
            ApiClient::from_env(config).context("Failed to build HTTP client")
        },
        &mut out,
    )?;
    out.flush()?;
    Ok(outcome.exit_code())
}
