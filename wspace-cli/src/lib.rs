//! wspace command-line runner.
//!
//! Reads a whitespace source file, decodes it and executes it against the
//! given input and output, optionally recording an execution trace.
//!
//! Exit codes used by the `wspace` binary:
//! - 0: Success
//! - 1: Read, decode or trace error
//! - 2: Usage error
//! - 3: Runtime error

pub mod config;
pub mod trace;

pub use config::{Cli, Config};
pub use trace::{Trace, TraceError, TraceRecorder};

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;
use wspace_decoder::DecodeError;
use wspace_vm::{RuntimeError, VM};

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("trace error: {0}")]
    Trace(#[from] TraceError),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Read { .. } | Error::Decode(_) | Error::Trace(_) => 1,
            Error::Runtime(_) => 3,
        }
    }
}

/// Decode and execute the program named by `config`.
pub fn run<'a>(
    config: &Config,
    input: impl BufRead + 'a,
    output: impl Write + 'a,
) -> Result<(), Error> {
    let source = fs::read(&config.source).map_err(|source| Error::Read {
        path: config.source.clone(),
        source,
    })?;
    let program = wspace_decoder::decode(&source)?;
    debug!(
        path = %config.source.display(),
        instructions = program.len(),
        "running program"
    );

    let mut vm = VM::new(&program).with_input(input).with_output(output);
    let Some(trace_path) = &config.trace else {
        return vm.run().map_err(Error::from);
    };

    let mut recorder = TraceRecorder::spawn(&program, trace_path)?;
    let result = vm.with_observer(&mut recorder).run();
    match (result, recorder.take_error()) {
        (Err(RuntimeError::Observer { .. }), Some(err)) => Err(err.into()),
        (Err(err), _) => Err(err.into()),
        (Ok(()), Some(err)) => Err(err.into()),
        (Ok(()), None) => Ok(()),
    }
}
