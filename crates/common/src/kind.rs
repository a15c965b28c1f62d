//! Instruction kinds of the whitespace language.
//!
//! Every kind belongs to one of five families, identified in source text by
//! its instruction modification parameter (the leading whitespace prefix).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownMnemonic;

/// The family an instruction kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Prefix `[Space]`.
    Stack,
    /// Prefix `[Tab][Space]`.
    Arithmetic,
    /// Prefix `[Tab][Tab]`.
    Heap,
    /// Prefix `[LF]`.
    Flow,
    /// Prefix `[Tab][LF]`.
    Io,
}

/// Identifies the operation an instruction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Kind {
    // Stack
    /// Push the literal operand.
    Push,
    /// Push a copy of the top value.
    Duplicate,
    /// Exchange the top two values.
    Swap,
    /// Remove the top value.
    Discard,

    // Arithmetic
    /// Replace `a b` with `a + b`.
    Add,
    /// Replace `a b` with `a - b`.
    Subtract,
    /// Replace `a b` with `a * b`.
    Multiply,
    /// Replace `a b` with `floor(a / b)`.
    Divide,
    /// Replace `a b` with `a - b * floor(a / b)`.
    Modulo,

    // Heap
    /// Pop `address value`, store value at address.
    Store,
    /// Replace `address` with the value stored there.
    Retrieve,

    // Flow
    /// Mark a jump target. The operand is the label.
    Label,
    /// Call the subroutine at the operand label.
    Call,
    /// Jump unconditionally to the operand label.
    Jump,
    /// Pop, jump to the operand label if the value is zero.
    JumpIfZero,
    /// Pop, jump to the operand label if the value is negative.
    JumpIfNegative,
    /// Return to the instruction after the most recent call.
    Return,
    /// End the program.
    Exit,

    // I/O
    /// Pop and write as a character.
    OutputChar,
    /// Pop and write as a decimal number.
    OutputNumber,
    /// Read a byte into the heap address on top of the stack.
    InputChar,
    /// Read a decimal line into the heap address on top of the stack.
    InputNumber,
}

impl Kind {
    /// All instruction kinds, in family order.
    pub const ALL: [Kind; 22] = [
        Kind::Push,
        Kind::Duplicate,
        Kind::Swap,
        Kind::Discard,
        Kind::Add,
        Kind::Subtract,
        Kind::Multiply,
        Kind::Divide,
        Kind::Modulo,
        Kind::Store,
        Kind::Retrieve,
        Kind::Label,
        Kind::Call,
        Kind::Jump,
        Kind::JumpIfZero,
        Kind::JumpIfNegative,
        Kind::Return,
        Kind::Exit,
        Kind::OutputChar,
        Kind::OutputNumber,
        Kind::InputChar,
        Kind::InputNumber,
    ];

    /// Returns the lowercase mnemonic for this kind.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Kind::Push => "push",
            Kind::Duplicate => "dup",
            Kind::Swap => "swap",
            Kind::Discard => "discard",
            Kind::Add => "add",
            Kind::Subtract => "sub",
            Kind::Multiply => "mul",
            Kind::Divide => "div",
            Kind::Modulo => "mod",
            Kind::Store => "store",
            Kind::Retrieve => "retrieve",
            Kind::Label => "label",
            Kind::Call => "call",
            Kind::Jump => "jump",
            Kind::JumpIfZero => "jz",
            Kind::JumpIfNegative => "jn",
            Kind::Return => "ret",
            Kind::Exit => "exit",
            Kind::OutputChar => "outchar",
            Kind::OutputNumber => "outnum",
            Kind::InputChar => "inchar",
            Kind::InputNumber => "innum",
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Kind::Push | Kind::Duplicate | Kind::Swap | Kind::Discard => Family::Stack,
            Kind::Add | Kind::Subtract | Kind::Multiply | Kind::Divide | Kind::Modulo => {
                Family::Arithmetic
            }
            Kind::Store | Kind::Retrieve => Family::Heap,
            Kind::Label
            | Kind::Call
            | Kind::Jump
            | Kind::JumpIfZero
            | Kind::JumpIfNegative
            | Kind::Return
            | Kind::Exit => Family::Flow,
            Kind::OutputChar | Kind::OutputNumber | Kind::InputChar | Kind::InputNumber => {
                Family::Io
            }
        }
    }

    /// Whether the kind is followed by a number or label literal in source.
    pub fn has_operand(&self) -> bool {
        matches!(
            self,
            Kind::Push
                | Kind::Label
                | Kind::Call
                | Kind::Jump
                | Kind::JumpIfZero
                | Kind::JumpIfNegative
        )
    }

    /// Minimum operand stack depth required before the instruction executes.
    pub fn min_depth(&self) -> usize {
        match self {
            Kind::Push | Kind::Label | Kind::Call | Kind::Jump | Kind::Return | Kind::Exit => 0,
            Kind::Duplicate
            | Kind::Discard
            | Kind::Retrieve
            | Kind::JumpIfZero
            | Kind::JumpIfNegative
            | Kind::OutputChar
            | Kind::OutputNumber
            | Kind::InputChar
            | Kind::InputNumber => 1,
            Kind::Swap
            | Kind::Add
            | Kind::Subtract
            | Kind::Multiply
            | Kind::Divide
            | Kind::Modulo
            | Kind::Store => 2,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Kind {
    type Err = UnknownMnemonic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .iter()
            .find(|kind| kind.mnemonic() == s)
            .copied()
            .ok_or_else(|| UnknownMnemonic(s.to_string()))
    }
}

impl From<Kind> for &'static str {
    fn from(kind: Kind) -> Self {
        kind.mnemonic()
    }
}

impl TryFrom<String> for Kind {
    type Error = UnknownMnemonic;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_kinds_count() {
        assert_eq!(Kind::ALL.len(), 22);
    }

    #[test]
    fn mnemonics_are_unique_and_lowercase() {
        for (i, a) in Kind::ALL.iter().enumerate() {
            let m = a.mnemonic();
            assert_eq!(m, m.to_lowercase(), "mnemonic should be lowercase: {m}");
            for b in &Kind::ALL[i + 1..] {
                assert_ne!(m, b.mnemonic(), "{a:?} and {b:?} share a mnemonic");
            }
        }
    }

    #[test]
    fn mnemonic_parse_roundtrip() {
        for &kind in &Kind::ALL {
            assert_eq!(kind.mnemonic().parse::<Kind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_mnemonic_rejected() {
        assert_eq!(
            "halt".parse::<Kind>(),
            Err(UnknownMnemonic("halt".to_string()))
        );
    }

    #[test]
    fn family_sizes() {
        let count = |family| Kind::ALL.iter().filter(|k| k.family() == family).count();
        assert_eq!(count(Family::Stack), 4);
        assert_eq!(count(Family::Arithmetic), 5);
        assert_eq!(count(Family::Heap), 2);
        assert_eq!(count(Family::Flow), 7);
        assert_eq!(count(Family::Io), 4);
    }

    #[test]
    fn operand_kinds() {
        let with_operand: Vec<Kind> = Kind::ALL
            .iter()
            .copied()
            .filter(Kind::has_operand)
            .collect();
        assert_eq!(
            with_operand,
            vec![
                Kind::Push,
                Kind::Label,
                Kind::Call,
                Kind::Jump,
                Kind::JumpIfZero,
                Kind::JumpIfNegative,
            ]
        );
    }

    #[test]
    fn binary_operations_need_two_values() {
        for kind in [
            Kind::Swap,
            Kind::Add,
            Kind::Subtract,
            Kind::Multiply,
            Kind::Divide,
            Kind::Modulo,
            Kind::Store,
        ] {
            assert_eq!(kind.min_depth(), 2, "{kind}");
        }
    }

    #[test]
    fn serde_uses_mnemonic() {
        let json = serde_json::to_string(&Kind::JumpIfNegative).unwrap();
        assert_eq!(json, "\"jn\"");
        let kind: Kind = serde_json::from_str("\"outchar\"").unwrap();
        assert_eq!(kind, Kind::OutputChar);
        assert!(serde_json::from_str::<Kind>("\"nop\"").is_err());
    }
}
