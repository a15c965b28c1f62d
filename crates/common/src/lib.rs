//! Shared instruction model for the wspace interpreter.
//!
//! This crate provides the data structures passed between the decoder and
//! the virtual machine:
//!
//! - [`Kind`]: the 22 instruction kinds, grouped into [`Family`]s
//! - [`Instruction`]: a kind plus its signed operand
//! - [`Program`]: the decoded instruction sequence
//!
//! Instructions and programs are `serde` serializable; kinds serialize as
//! their lowercase mnemonic.

pub mod error;
pub mod instruction;
pub mod kind;
pub mod program;

// Re-export commonly used types at the crate root.
pub use error::UnknownMnemonic;
pub use instruction::Instruction;
pub use kind::{Family, Kind};
pub use program::Program;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_kind() -> impl Strategy<Value = Kind> {
        prop::sample::select(&Kind::ALL[..])
    }

    fn arb_instruction() -> impl Strategy<Value = Instruction> {
        (arb_kind(), any::<i64>()).prop_map(|(kind, n)| {
            if kind.has_operand() {
                Instruction::with_operand(kind, n)
            } else {
                Instruction::new(kind)
            }
        })
    }

    proptest! {
        /// Every program survives a trip through its JSON form.
        #[test]
        fn program_json_roundtrip(
            instrs in prop::collection::vec(arb_instruction(), 0..50)
        ) {
            let program = Program::new(instrs);
            let json = serde_json::to_string(&program).unwrap();
            let back: Program = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(program, back);
        }

        /// Display always starts with the mnemonic.
        #[test]
        fn display_starts_with_mnemonic(instr in arb_instruction()) {
            prop_assert!(instr.to_string().starts_with(instr.kind.mnemonic()));
        }
    }
}
