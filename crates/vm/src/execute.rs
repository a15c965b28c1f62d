//! Main execution loop and instruction dispatch for the wspace VM.

use std::io::Write;

use tracing::{debug, error, trace};
use wspace_common::{Instruction, Kind};

use crate::error::RuntimeError;
use crate::machine::VM;

impl<'a> VM<'a> {
    /// Execute the program until `exit` or an error.
    ///
    /// Output is flushed and the observer finished on every path out of
    /// the loop. When the run itself failed, that error takes precedence.
    ///
    /// A program runs at most once: later calls return the first outcome
    /// without dispatching anything or finishing the observer again.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let result = self.dispatch_loop();
        let flushed = self.output.flush().map_err(|e| self.io_error(e));
        let finished = self.finish_observer();

        let outcome = match result {
            Ok(()) => {
                debug!(steps = self.steps, "program exited");
                flushed.and(finished)
            }
            Err(e) => {
                debug!(steps = self.steps, error = %e, "program failed");
                if let Err(finish_err) = finished {
                    error!(error = %finish_err, "observer failed after runtime error");
                }
                Err(e)
            }
        };
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn finish_observer(&mut self) -> Result<(), RuntimeError> {
        match self.observer.as_mut() {
            Some(observer) => observer.finish().map_err(|e| RuntimeError::Observer {
                message: e.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn dispatch_loop(&mut self) -> Result<(), RuntimeError> {
        loop {
            let instr = self.fetch()?;
            if let Some(observer) = self.observer.as_mut() {
                observer.on_dispatch(self.pc, &instr);
            }
            self.steps += 1;
            trace!(pc = self.pc, %instr, depth = self.stack.len(), "dispatch");

            self.require(instr.kind)?;
            self.pc += 1;

            match instr.kind {
                // Stack
                Kind::Push => self.push(instr.operand),
                Kind::Duplicate => self.exec_duplicate()?,
                Kind::Swap => self.exec_swap()?,
                Kind::Discard => {
                    self.pop(instr.kind)?;
                }

                // Arithmetic
                Kind::Add => self.exec_binary_arith(instr.kind, i64::wrapping_add)?,
                Kind::Subtract => self.exec_binary_arith(instr.kind, i64::wrapping_sub)?,
                Kind::Multiply => self.exec_binary_arith(instr.kind, i64::wrapping_mul)?,
                Kind::Divide => self.exec_division(instr.kind, floor_div)?,
                Kind::Modulo => self.exec_division(instr.kind, floor_mod)?,

                // Heap
                Kind::Store => self.exec_store()?,
                Kind::Retrieve => self.exec_retrieve()?,

                // Flow
                Kind::Label => {}
                Kind::Call => self.exec_call(&instr)?,
                Kind::Jump => self.jump_to(instr.operand)?,
                Kind::JumpIfZero => {
                    if self.pop(instr.kind)? == 0 {
                        self.jump_to(instr.operand)?;
                    }
                }
                Kind::JumpIfNegative => {
                    if self.pop(instr.kind)? < 0 {
                        self.jump_to(instr.operand)?;
                    }
                }
                Kind::Return => self.exec_return()?,
                Kind::Exit => return Ok(()),

                // I/O
                Kind::OutputChar => self.exec_output_char()?,
                Kind::OutputNumber => self.exec_output_number()?,
                Kind::InputChar => self.exec_input_char()?,
                Kind::InputNumber => self.exec_input_number()?,
            }
        }
    }

    // ---- Stack ----

    fn exec_duplicate(&mut self) -> Result<(), RuntimeError> {
        let top = self.pop(Kind::Duplicate)?;
        self.push(top);
        self.push(top);
        Ok(())
    }

    fn exec_swap(&mut self) -> Result<(), RuntimeError> {
        let b = self.pop(Kind::Swap)?;
        let a = self.pop(Kind::Swap)?;
        self.push(b);
        self.push(a);
        Ok(())
    }

    // ---- Arithmetic ----

    /// Replace `a b` (b on top) with `op(a, b)`.
    fn exec_binary_arith(
        &mut self,
        kind: Kind,
        op: fn(i64, i64) -> i64,
    ) -> Result<(), RuntimeError> {
        let b = self.pop(kind)?;
        let a = self.pop(kind)?;
        self.push(op(a, b));
        Ok(())
    }

    fn exec_division(
        &mut self,
        kind: Kind,
        op: fn(i64, i64) -> i64,
    ) -> Result<(), RuntimeError> {
        let b = self.pop(kind)?;
        let a = self.pop(kind)?;
        if b == 0 {
            return Err(RuntimeError::DivisionByZero { at: self.at() });
        }
        self.push(op(a, b));
        Ok(())
    }

    // ---- Heap ----

    fn exec_store(&mut self) -> Result<(), RuntimeError> {
        let value = self.pop(Kind::Store)?;
        let address = self.pop(Kind::Store)?;
        self.heap.store(address, value);
        Ok(())
    }

    fn exec_retrieve(&mut self) -> Result<(), RuntimeError> {
        let address = self.pop(Kind::Retrieve)?;
        let value = self.load(address)?;
        self.push(value);
        Ok(())
    }

    // ---- Flow ----

    /// Continue after the definition of `label`.
    fn jump_to(&mut self, label: i64) -> Result<(), RuntimeError> {
        self.pc = self.resolve(label)? + 1;
        Ok(())
    }

    fn exec_call(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let target = self.resolve(instr.operand)?;
        // pc already points past the call.
        self.call_stack.push(self.pc);
        self.pc = target + 1;
        Ok(())
    }

    fn exec_return(&mut self) -> Result<(), RuntimeError> {
        self.pc = self
            .call_stack
            .pop()
            .ok_or(RuntimeError::ReturnWithoutCall { at: self.at() })?;
        Ok(())
    }

    // ---- I/O ----

    fn exec_output_char(&mut self) -> Result<(), RuntimeError> {
        let value = self.pop(Kind::OutputChar)?;
        let ch = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or(RuntimeError::InvalidCharacter {
                at: self.at(),
                value,
            })?;
        write!(self.output, "{ch}").map_err(|e| self.io_error(e))
    }

    fn exec_output_number(&mut self) -> Result<(), RuntimeError> {
        let value = self.pop(Kind::OutputNumber)?;
        write!(self.output, "{value}").map_err(|e| self.io_error(e))
    }

    /// The destination address stays on the stack until the read succeeds.
    fn exec_input_char(&mut self) -> Result<(), RuntimeError> {
        let address = self.peek(Kind::InputChar)?;
        let byte = self.read_byte()?;
        self.heap.store(address, i64::from(byte));
        self.pop(Kind::InputChar)?;
        Ok(())
    }

    fn exec_input_number(&mut self) -> Result<(), RuntimeError> {
        let address = self.peek(Kind::InputNumber)?;
        let text = self.read_line()?;
        let value = text
            .parse::<i64>()
            .map_err(|_| RuntimeError::InvalidNumberInput {
                at: self.at(),
                text: text.clone(),
            })?;
        self.heap.store(address, value);
        self.pop(Kind::InputNumber)?;
        Ok(())
    }

    fn peek(&self, kind: Kind) -> Result<i64, RuntimeError> {
        self.stack
            .last()
            .copied()
            .ok_or(RuntimeError::StackUnderflow {
                at: self.at(),
                kind,
                required: kind.min_depth(),
                depth: self.stack.len(),
            })
    }

    /// Block until one byte of input is available.
    fn read_byte(&mut self) -> Result<u8, RuntimeError> {
        self.output.flush().map_err(|e| self.io_error(e))?;
        let at = self.at();
        let buf = self
            .input
            .fill_buf()
            .map_err(|e| RuntimeError::Io { at, kind: e.kind() })?;
        let byte = *buf.first().ok_or(RuntimeError::InputExhausted { at })?;
        self.input.consume(1);
        Ok(byte)
    }

    /// Block until a full line of input is available; returns it without
    /// the line ending. A final line without a newline is accepted.
    fn read_line(&mut self) -> Result<String, RuntimeError> {
        self.output.flush().map_err(|e| self.io_error(e))?;
        let at = self.at();
        let mut line = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut line)
            .map_err(|e| RuntimeError::Io { at, kind: e.kind() })?;
        if read == 0 {
            return Err(RuntimeError::InputExhausted { at });
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }
}

/// Division rounding toward negative infinity.
pub(crate) fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

/// Remainder with the sign of the divisor: `a - b * floor(a / b)`.
pub(crate) fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) {
        r + b
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_div_rounds_down() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_div(-7, -2), 3);
        assert_eq!(floor_div(-8, 2), -4);
        assert_eq!(floor_div(0, -3), 0);
    }

    #[test]
    fn floor_mod_follows_divisor() {
        assert_eq!(floor_mod(7, 2), 1);
        assert_eq!(floor_mod(-7, 2), 1);
        assert_eq!(floor_mod(7, -2), -1);
        assert_eq!(floor_mod(-7, -2), -1);
        assert_eq!(floor_mod(-8, 2), 0);
    }

    #[test]
    fn extremes_wrap_instead_of_panicking() {
        assert_eq!(floor_div(i64::MIN, -1), i64::MIN);
        assert_eq!(floor_mod(i64::MIN, -1), 0);
        assert_eq!(floor_div(i64::MIN, 2), i64::MIN / 2);
    }
}
