//! Observation of executed instructions.
//!
//! An [`Observer`] is handed every instruction after it is fetched and
//! before it runs, in execution order, including every repetition inside
//! loops. It never influences execution.

use std::io;

use wspace_common::Instruction;

pub trait Observer {
    /// Called once per dispatch with the program counter and instruction.
    fn on_dispatch(&mut self, pc: usize, instr: &Instruction);

    /// Called exactly once when the run ends, whether it succeeded or not.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn on_dispatch(&mut self, pc: usize, instr: &Instruction) {
        (**self).on_dispatch(pc, instr);
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn on_dispatch(&mut self, pc: usize, instr: &Instruction) {
        (**self).on_dispatch(pc, instr);
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

/// Collects executed instructions in memory.
impl Observer for Vec<Instruction> {
    fn on_dispatch(&mut self, _pc: usize, instr: &Instruction) {
        self.push(*instr);
    }
}
