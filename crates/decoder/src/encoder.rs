//! Renders instructions back to whitespace source.
//!
//! The output is canonical: no comment bytes, and literals carry no
//! leading zero bits.

use wspace_common::{Instruction, Kind, Program};

/// The command code for each kind, written in `S`/`T`/`L` notation.
fn code(kind: Kind) -> &'static str {
    match kind {
        Kind::Push => "SS",
        Kind::Duplicate => "SLS",
        Kind::Swap => "SLT",
        Kind::Discard => "SLL",
        Kind::Add => "TSSS",
        Kind::Subtract => "TSST",
        Kind::Multiply => "TSSL",
        Kind::Divide => "TSTS",
        Kind::Modulo => "TSTT",
        Kind::Store => "TTS",
        Kind::Retrieve => "TTT",
        Kind::Label => "LSS",
        Kind::Call => "LST",
        Kind::Jump => "LSL",
        Kind::JumpIfZero => "LTS",
        Kind::JumpIfNegative => "LTT",
        Kind::Return => "LTL",
        Kind::Exit => "LLL",
        Kind::OutputChar => "TLSS",
        Kind::OutputNumber => "TLST",
        Kind::InputChar => "TLTS",
        Kind::InputNumber => "TLTT",
    }
}

fn push_notation(out: &mut String, notation: &str) {
    out.extend(notation.chars().map(|c| match c {
        'S' => ' ',
        'T' => '\t',
        _ => '\n',
    }));
}

/// Append a sign, the magnitude bits MSB first, and the terminating newline.
fn push_literal(out: &mut String, value: i64) {
    out.push(if value < 0 { '\t' } else { ' ' });
    let magnitude = value.unsigned_abs();
    if magnitude != 0 {
        let width = u64::BITS - magnitude.leading_zeros();
        for bit in (0..width).rev() {
            out.push(if (magnitude >> bit) & 1 == 1 { '\t' } else { ' ' });
        }
    }
    out.push('\n');
}

/// Encode a single instruction.
pub fn encode_instruction(out: &mut String, instr: &Instruction) {
    push_notation(out, code(instr.kind));
    if instr.kind.has_operand() {
        push_literal(out, instr.operand);
    }
}

/// Encode a program as whitespace source text.
pub fn encode(program: &Program) -> String {
    let mut out = String::new();
    for instr in program {
        encode_instruction(&mut out, instr);
    }
    out
}
