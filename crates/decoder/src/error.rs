//! Error types for the whitespace decoder.

use thiserror::Error;

use crate::lexer::{Position, Ws};

/// Errors produced while decoding source text into instructions.
///
/// Decoding stops at the first error; no partial program is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A character that does not continue any instruction code.
    #[error("{at}: unexpected {found} in {context}")]
    Unexpected {
        found: Ws,
        context: &'static str,
        at: Position,
    },

    /// Input ended part way through an instruction code.
    #[error("{at}: unexpected end of input in {context}")]
    UnexpectedEof { context: &'static str, at: Position },

    /// Input ended before the newline that closes a literal.
    #[error("{at}: literal is not terminated by a newline")]
    UnterminatedLiteral { at: Position },

    /// A literal whose value does not fit in a signed 64-bit integer.
    #[error("{at}: literal does not fit in a signed 64-bit integer")]
    LiteralOverflow { at: Position },
}

#[cfg(test)]
mod tests {
    use super::*;

    const AT: Position = Position {
        offset: 9,
        line: 2,
        column: 4,
    };

    #[test]
    fn error_display_unexpected() {
        let e = DecodeError::Unexpected {
            found: Ws::Newline,
            context: "heap instruction",
            at: AT,
        };
        assert_eq!(
            e.to_string(),
            "line 2, column 4: unexpected newline in heap instruction"
        );
    }

    #[test]
    fn error_display_unexpected_eof() {
        let e = DecodeError::UnexpectedEof {
            context: "flow instruction",
            at: AT,
        };
        assert_eq!(
            e.to_string(),
            "line 2, column 4: unexpected end of input in flow instruction"
        );
    }

    #[test]
    fn error_display_literals() {
        assert_eq!(
            DecodeError::UnterminatedLiteral { at: AT }.to_string(),
            "line 2, column 4: literal is not terminated by a newline"
        );
        assert_eq!(
            DecodeError::LiteralOverflow { at: AT }.to_string(),
            "line 2, column 4: literal does not fit in a signed 64-bit integer"
        );
    }
}
