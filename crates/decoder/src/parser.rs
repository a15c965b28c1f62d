//! Parser for whitespace tokens → instructions.
//!
//! Dispatches on the instruction modification parameter (the family
//! prefix), then on the command characters, then reads the literal for
//! kinds that carry one.

use crate::error::DecodeError;
use crate::lexer::{Lexer, Position, Ws};
use wspace_common::{Instruction, Kind, Program};

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a [u8]) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Parse instructions until the input is exhausted.
    ///
    /// End of input is only accepted on an instruction boundary.
    pub(crate) fn parse(mut self) -> Result<Program, DecodeError> {
        let mut instructions = Vec::new();

        while let Some((first, _)) = self.lexer.next() {
            let kind = match first {
                Ws::Space => self.stack()?,
                Ws::Newline => self.flow()?,
                Ws::Tab => match self.expect("instruction")? {
                    (Ws::Space, _) => self.arithmetic()?,
                    (Ws::Tab, _) => self.heap()?,
                    (Ws::Newline, _) => self.io()?,
                },
            };

            let instr = if kind.has_operand() {
                Instruction::with_operand(kind, self.literal()?)
            } else {
                Instruction::new(kind)
            };
            instructions.push(instr);
        }

        Ok(Program::new(instructions))
    }

    fn expect(&mut self, context: &'static str) -> Result<(Ws, Position), DecodeError> {
        self.lexer.next().ok_or(DecodeError::UnexpectedEof {
            context,
            at: self.lexer.position(),
        })
    }

    // ---- Families ----

    fn stack(&mut self) -> Result<Kind, DecodeError> {
        const CONTEXT: &str = "stack instruction";
        match self.expect(CONTEXT)? {
            (Ws::Space, _) => Ok(Kind::Push),
            (Ws::Newline, _) => match self.expect(CONTEXT)? {
                (Ws::Space, _) => Ok(Kind::Duplicate),
                (Ws::Tab, _) => Ok(Kind::Swap),
                (Ws::Newline, _) => Ok(Kind::Discard),
            },
            (found, at) => Err(unexpected(found, CONTEXT, at)),
        }
    }

    fn arithmetic(&mut self) -> Result<Kind, DecodeError> {
        const CONTEXT: &str = "arithmetic instruction";
        match self.expect(CONTEXT)? {
            (Ws::Space, _) => match self.expect(CONTEXT)? {
                (Ws::Space, _) => Ok(Kind::Add),
                (Ws::Tab, _) => Ok(Kind::Subtract),
                (Ws::Newline, _) => Ok(Kind::Multiply),
            },
            (Ws::Tab, _) => match self.expect(CONTEXT)? {
                (Ws::Space, _) => Ok(Kind::Divide),
                (Ws::Tab, _) => Ok(Kind::Modulo),
                (found, at) => Err(unexpected(found, CONTEXT, at)),
            },
            (found, at) => Err(unexpected(found, CONTEXT, at)),
        }
    }

    fn heap(&mut self) -> Result<Kind, DecodeError> {
        const CONTEXT: &str = "heap instruction";
        match self.expect(CONTEXT)? {
            (Ws::Space, _) => Ok(Kind::Store),
            (Ws::Tab, _) => Ok(Kind::Retrieve),
            (found, at) => Err(unexpected(found, CONTEXT, at)),
        }
    }

    fn flow(&mut self) -> Result<Kind, DecodeError> {
        const CONTEXT: &str = "flow instruction";
        match self.expect(CONTEXT)? {
            (Ws::Space, _) => match self.expect(CONTEXT)? {
                (Ws::Space, _) => Ok(Kind::Label),
                (Ws::Tab, _) => Ok(Kind::Call),
                (Ws::Newline, _) => Ok(Kind::Jump),
            },
            (Ws::Tab, _) => match self.expect(CONTEXT)? {
                (Ws::Space, _) => Ok(Kind::JumpIfZero),
                (Ws::Tab, _) => Ok(Kind::JumpIfNegative),
                (Ws::Newline, _) => Ok(Kind::Return),
            },
            (Ws::Newline, _) => match self.expect(CONTEXT)? {
                (Ws::Newline, _) => Ok(Kind::Exit),
                (found, at) => Err(unexpected(found, CONTEXT, at)),
            },
        }
    }

    fn io(&mut self) -> Result<Kind, DecodeError> {
        const CONTEXT: &str = "i/o instruction";
        match self.expect(CONTEXT)? {
            (Ws::Space, _) => match self.expect(CONTEXT)? {
                (Ws::Space, _) => Ok(Kind::OutputChar),
                (Ws::Tab, _) => Ok(Kind::OutputNumber),
                (found, at) => Err(unexpected(found, CONTEXT, at)),
            },
            (Ws::Tab, _) => match self.expect(CONTEXT)? {
                (Ws::Space, _) => Ok(Kind::InputChar),
                (Ws::Tab, _) => Ok(Kind::InputNumber),
                (found, at) => Err(unexpected(found, CONTEXT, at)),
            },
            (found, at) => Err(unexpected(found, CONTEXT, at)),
        }
    }

    // ---- Literals ----

    /// Read a sign character, then bits MSB first, up to a newline.
    fn literal(&mut self) -> Result<i64, DecodeError> {
        let (sign, start) = self
            .lexer
            .next()
            .ok_or(DecodeError::UnterminatedLiteral {
                at: self.lexer.position(),
            })?;

        let negative = match sign {
            Ws::Space => false,
            Ws::Tab => true,
            Ws::Newline => return Err(unexpected(sign, "literal sign", start)),
        };

        let mut magnitude: u64 = 0;
        loop {
            let (ws, _) = self
                .lexer
                .next()
                .ok_or(DecodeError::UnterminatedLiteral { at: start })?;
            let bit = match ws {
                Ws::Space => 0,
                Ws::Tab => 1,
                Ws::Newline => break,
            };
            magnitude = magnitude
                .checked_mul(2)
                .and_then(|m| m.checked_add(bit))
                .ok_or(DecodeError::LiteralOverflow { at: start })?;
        }

        to_signed(negative, magnitude).ok_or(DecodeError::LiteralOverflow { at: start })
    }
}

/// Apply a sign to a magnitude. `-2^63` is the only magnitude above
/// `i64::MAX` that is representable.
fn to_signed(negative: bool, magnitude: u64) -> Option<i64> {
    if negative {
        if magnitude <= i64::MIN.unsigned_abs() {
            Some((magnitude as i64).wrapping_neg())
        } else {
            None
        }
    } else {
        i64::try_from(magnitude).ok()
    }
}

fn unexpected(found: Ws, context: &'static str, at: Position) -> DecodeError {
    DecodeError::Unexpected { found, context, at }
}
