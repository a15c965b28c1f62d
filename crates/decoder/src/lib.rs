//! wspace decoder: whitespace source text ↔ instruction sequences.
//!
//! Decoding is a single pass over the source bytes. Space, tab and line
//! feed select instructions through fixed prefix codes; every other byte
//! is a comment.
//!
//! # Usage
//!
//! ```
//! use wspace_common::{Instruction, Kind};
//! use wspace_decoder::{decode, encode};
//!
//! // push 1, output it as a number, exit
//! let source = "   \t\n\t\n \t\n\n\n";
//! let program = decode(source).unwrap();
//! assert_eq!(program[0], Instruction::with_operand(Kind::Push, 1));
//! assert_eq!(encode(&program), source);
//! ```
//!
//! # Literals
//!
//! Numbers and labels share one encoding: a sign character (tab is
//! negative), then binary digits most significant first (space is 0, tab
//! is 1), closed by a line feed.

pub mod error;

mod encoder;
mod lexer;
mod parser;

pub use encoder::{encode, encode_instruction};
pub use error::DecodeError;
pub use lexer::{Position, Ws};

use parser::Parser;
use tracing::debug;
use wspace_common::Program;

/// Decode source text into a program.
///
/// Returns the first error encountered; nothing is decoded partially.
pub fn decode(source: impl AsRef<[u8]>) -> Result<Program, DecodeError> {
    let source = source.as_ref();
    let program = Parser::new(source).parse()?;
    debug!(
        bytes = source.len(),
        instructions = program.len(),
        "decoded program"
    );
    Ok(program)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use wspace_common::{Instruction, Kind};

    fn arb_instruction() -> impl Strategy<Value = Instruction> {
        (prop::sample::select(&Kind::ALL[..]), any::<i64>()).prop_map(|(kind, n)| {
            if kind.has_operand() {
                Instruction::with_operand(kind, n)
            } else {
                Instruction::new(kind)
            }
        })
    }

    proptest! {
        /// Any literal value survives encoding and decoding.
        #[test]
        fn push_literal_roundtrip(n in any::<i64>()) {
            let program = Program::new(vec![Instruction::with_operand(Kind::Push, n)]);
            let decoded = decode(encode(&program)).unwrap();
            prop_assert_eq!(decoded[0].operand, n);
        }

        /// Interleaving comment bytes anywhere does not change the program.
        #[test]
        fn comments_are_transparent(
            instrs in prop::collection::vec(arb_instruction(), 0..20),
            noise in "[a-z#;]{0,3}",
        ) {
            let program = Program::new(instrs);
            let clean = encode(&program);
            let mut noisy = String::new();
            for c in clean.chars() {
                noisy.push_str(&noise);
                noisy.push(c);
            }
            prop_assert_eq!(decode(noisy).unwrap(), program);
        }

        /// Arbitrary bytes never panic the decoder.
        #[test]
        fn arbitrary_bytes_decode_or_error(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let _ = decode(bytes);
        }
    }
}
