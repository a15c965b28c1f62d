//! wspace: run a whitespace program.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Read, decode or trace error
//! - 2: Usage error
//! - 3: Runtime error

use std::io;
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wspace_cli::{Cli, Config};

fn main() {
    // Logs go to stderr so program output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = Config::from(Cli::parse());

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = wspace_cli::run(&config, stdin.lock(), stdout.lock()) {
        debug!(error = ?e, path = %config.source.display(), "run failed");
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }
}
