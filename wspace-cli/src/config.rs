//! Command-line arguments and the run configuration derived from them.

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "wspace")]
#[command(version, about = "Run a whitespace program")]
pub struct Cli {
    /// Path to the whitespace source file
    pub path: PathBuf,

    /// Record every executed instruction to a JSON trace file
    #[arg(
        long,
        env = "WSPACE_TRACE",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub trace: bool,

    /// Where the trace file is written when tracing is enabled
    #[arg(long, env = "WSPACE_TRACE_PATH", default_value = "wspace-trace.json")]
    pub trace_path: PathBuf,
}

/// Everything a run needs, resolved from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source program to decode and execute.
    pub source: PathBuf,
    /// Trace destination, or `None` when tracing is off.
    pub trace: Option<PathBuf>,
}

impl Config {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            trace: None,
        }
    }

    pub fn with_trace(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace = Some(path.into());
        self
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            source: cli.path,
            trace: cli.trace.then_some(cli.trace_path),
        }
    }
}
