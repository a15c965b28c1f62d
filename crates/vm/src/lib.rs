//! wspace virtual machine: executes decoded whitespace programs.
//!
//! The VM is a stack machine with:
//! - An operand stack of signed 64-bit integers
//! - A sparse heap addressed by integers
//! - A call stack of return addresses
//! - A label table resolved once, before execution starts
//!
//! Runtime input and output are plain [`BufRead`](std::io::BufRead) and
//! [`Write`](std::io::Write) values, and an optional [`Observer`] sees every
//! instruction as it is dispatched.
//!
//! # Usage
//!
//! ```
//! use wspace_common::{Instruction, Kind, Program};
//! use wspace_vm::run;
//!
//! let program = Program::new(vec![
//!     Instruction::with_operand(Kind::Push, 72),
//!     Instruction::new(Kind::OutputChar),
//!     Instruction::with_operand(Kind::Push, 10),
//!     Instruction::new(Kind::OutputChar),
//!     Instruction::new(Kind::Exit),
//! ]);
//!
//! let mut output = Vec::new();
//! run(&program, std::io::empty(), &mut output).unwrap();
//! assert_eq!(output, b"H\n");
//! ```

pub mod error;
pub mod execute;
pub mod machine;
pub mod observer;

pub use error::RuntimeError;
pub use machine::{Heap, LabelTable, VM};
pub use observer::Observer;

use std::io::{BufRead, Write};

use wspace_common::Program;

/// Execute a program against the given input and output.
///
/// This is the primary entry point for the VM. It resolves labels, then
/// dispatches instructions from index 0 until `exit`.
///
/// # Errors
///
/// Returns [`RuntimeError`] if execution fails (stack underflow, undefined
/// heap address, unknown label, exhausted input, etc.).
pub fn run<'a>(
    program: &'a Program,
    input: impl BufRead + 'a,
    output: impl Write + 'a,
) -> Result<(), RuntimeError> {
    VM::new(program).with_input(input).with_output(output).run()
}
