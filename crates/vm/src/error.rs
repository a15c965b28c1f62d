//! Runtime errors for the wspace VM.
//!
//! Every error is fatal: execution stops, and output already written
//! stays written. Variants carry the index (`at`) of the instruction that
//! failed.

use std::io;

use thiserror::Error;
use wspace_common::Kind;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Fewer values on the operand stack than the instruction consumes.
    #[error("stack underflow at instruction {at}: {kind} needs {required} value(s), found {depth}")]
    StackUnderflow {
        at: usize,
        kind: Kind,
        required: usize,
        depth: usize,
    },

    /// Retrieve from a heap address that was never stored to.
    #[error("undefined heap address {address} at instruction {at}")]
    UndefinedHeapAddress { at: usize, address: i64 },

    /// Integer division or modulo by zero.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// Call or jump to a label that no instruction defines.
    #[error("unknown label {label} at instruction {at}")]
    UnknownLabel { at: usize, label: i64 },

    /// Return executed with an empty call stack.
    #[error("return without call at instruction {at}")]
    ReturnWithoutCall { at: usize },

    /// Program counter ran past the last instruction (no exit).
    #[error("unexpected end of program at instruction {at}")]
    UnexpectedEndOfProgram { at: usize },

    /// Input ended before a read instruction could complete.
    #[error("input exhausted at instruction {at}")]
    InputExhausted { at: usize },

    /// Number input that is not a signed decimal integer.
    #[error("invalid number input '{text}' at instruction {at}")]
    InvalidNumberInput { at: usize, text: String },

    /// Character output of a value that is not a Unicode scalar value.
    #[error("value {value} is not a character at instruction {at}")]
    InvalidCharacter { at: usize, value: i64 },

    /// Reading input or writing output failed.
    #[error("i/o error at instruction {at}: {kind}")]
    Io { at: usize, kind: io::ErrorKind },

    /// The observer could not complete its work after the run.
    #[error("observer failed: {message}")]
    Observer { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            RuntimeError::DivisionByZero { at: 5 }.to_string(),
            "division by zero at instruction 5"
        );
        assert_eq!(
            RuntimeError::StackUnderflow {
                at: 0,
                kind: Kind::Add,
                required: 2,
                depth: 1
            }
            .to_string(),
            "stack underflow at instruction 0: add needs 2 value(s), found 1"
        );
        assert_eq!(
            RuntimeError::UndefinedHeapAddress { at: 3, address: -1 }.to_string(),
            "undefined heap address -1 at instruction 3"
        );
        assert_eq!(
            RuntimeError::InvalidNumberInput {
                at: 2,
                text: "12a".to_string()
            }
            .to_string(),
            "invalid number input '12a' at instruction 2"
        );
    }
}
