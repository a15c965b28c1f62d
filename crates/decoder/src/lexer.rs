//! Tokenizer for whitespace source text.
//!
//! Only space, tab and line feed are significant. Every other byte is
//! comment text and is skipped, but still advances the source position.

use std::fmt;

/// One significant source character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ws {
    Space,
    Tab,
    Newline,
}

impl Ws {
    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b' ' => Some(Ws::Space),
            b'\t' => Some(Ws::Tab),
            b'\n' => Some(Ws::Newline),
            _ => None,
        }
    }
}

impl fmt::Display for Ws {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Ws::Space => "space",
            Ws::Tab => "tab",
            Ws::Newline => "newline",
        })
    }
}

/// A location in the source: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub(crate) const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Iterator over the significant characters of a source buffer.
pub(crate) struct Lexer<'a> {
    source: &'a [u8],
    pos: Position,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            pos: Position::START,
        }
    }

    /// Position of the next unread byte (end of input once exhausted).
    pub(crate) fn position(&self) -> Position {
        self.pos
    }

    fn advance(&mut self, byte: u8) {
        self.pos.offset += 1;
        if byte == b'\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = (Ws, Position);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&byte) = self.source.get(self.pos.offset) {
            let at = self.pos;
            self.advance(byte);
            if let Some(ws) = Ws::from_byte(byte) {
                return Some((ws, at));
            }
        }
        None
    }
}
