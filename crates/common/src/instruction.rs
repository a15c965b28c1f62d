//! A single decoded instruction: a kind plus an optional signed operand.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::Kind;

/// One whitespace instruction.
///
/// `operand` carries the number for [`Kind::Push`] and the label for the
/// label-referencing flow kinds. It is `0` for every other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation to perform.
    pub kind: Kind,
    /// Literal value or label. Meaningless (and zero) for operand-less kinds.
    pub operand: i64,
}

impl Instruction {
    /// Create an instruction that takes no operand.
    pub fn new(kind: Kind) -> Self {
        Self { kind, operand: 0 }
    }

    /// Create an instruction carrying a number or label literal.
    pub fn with_operand(kind: Kind, operand: i64) -> Self {
        Self { kind, operand }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.has_operand() {
            write!(f, "{} {}", self.kind, self.operand)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
