//! Execution trace recording.
//!
//! A [`TraceRecorder`] is a VM [`Observer`] that forwards every dispatched
//! instruction over a bounded channel to a background thread. When the run
//! ends the thread is joined and the collected [`Trace`] is written as JSON:
//!
//! ```json
//! {"program": [{"kind": "push", "operand": 72}, ...],
//!  "executions": [{"kind": "push", "operand": 72}, ...]}
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, SyncSender};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use wspace_common::{Instruction, Program};
use wspace_vm::Observer;

/// Entries the engine may run ahead of the recorder before it blocks.
const CHANNEL_CAPACITY: usize = 10;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("cannot start trace recorder: {0}")]
    Spawn(#[source] io::Error),

    #[error("trace recorder thread panicked")]
    RecorderPanicked,

    #[error("cannot write trace to '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot serialize trace: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The recorded artifact: the decoded program and every executed
/// instruction in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub program: Program,
    pub executions: Vec<Instruction>,
}

pub struct TraceRecorder {
    path: PathBuf,
    program: Program,
    sender: Option<SyncSender<Instruction>>,
    worker: Option<JoinHandle<Vec<Instruction>>>,
    trace: Option<Trace>,
    failure: Option<TraceError>,
}

impl TraceRecorder {
    /// Start the recorder thread for `program`; the trace is written to
    /// `path` when the run finishes.
    pub fn spawn(program: &Program, path: impl Into<PathBuf>) -> Result<Self, TraceError> {
        let (sender, receiver) = mpsc::sync_channel::<Instruction>(CHANNEL_CAPACITY);
        let worker = thread::Builder::new()
            .name("wspace-trace".to_string())
            .spawn(move || receiver.into_iter().collect::<Vec<_>>())
            .map_err(TraceError::Spawn)?;

        Ok(Self {
            path: path.into(),
            program: program.clone(),
            sender: Some(sender),
            worker: Some(worker),
            trace: None,
            failure: None,
        })
    }

    /// The trace, once the recorder has been closed and the file written.
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// The error from closing, if writing the trace failed.
    pub fn take_error(&mut self) -> Option<TraceError> {
        self.failure.take()
    }

    /// Stop accepting entries, join the recorder thread and write the file.
    ///
    /// Only the first call does any work.
    pub fn close(&mut self) -> Result<(), TraceError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        // Closing the channel ends the recorder's receive loop.
        self.sender = None;
        let executions = worker.join().map_err(|_| TraceError::RecorderPanicked)?;

        let trace = Trace {
            program: self.program.clone(),
            executions,
        };
        write_trace(&self.path, &trace)?;
        info!(
            path = %self.path.display(),
            executions = trace.executions.len(),
            "trace written"
        );
        self.trace = Some(trace);
        Ok(())
    }
}

impl Observer for TraceRecorder {
    fn on_dispatch(&mut self, _pc: usize, instr: &Instruction) {
        if let Some(sender) = &self.sender {
            if sender.send(*instr).is_err() {
                warn!("trace recorder stopped early; dropping further entries");
                self.sender = None;
            }
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        self.close().map_err(|err| {
            let wrapped = io::Error::other(err.to_string());
            self.failure = Some(err);
            wrapped
        })
    }
}

impl Drop for TraceRecorder {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "trace not written");
        }
    }
}

fn write_trace(path: &Path, trace: &Trace) -> Result<(), TraceError> {
    let write_error = |source| TraceError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, trace)?;
    writer.write_all(b"\n").map_err(write_error)?;
    writer.flush().map_err(write_error)
}
