//! VM state management: operand stack, heap, call stack, label table.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use tracing::debug;
use wspace_common::{Instruction, Kind, Program};

use crate::error::RuntimeError;
use crate::observer::Observer;

/// Label → index of the instruction that defines it.
///
/// Built by a single forward scan. When a label is defined more than once,
/// the last definition wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    targets: HashMap<i64, usize>,
}

impl LabelTable {
    pub fn build(program: &Program) -> Self {
        let mut targets = HashMap::new();
        for (index, instr) in program.iter().enumerate() {
            if instr.kind == Kind::Label {
                targets.insert(instr.operand, index);
            }
        }
        Self { targets }
    }

    /// Index of the definition of `label`.
    pub fn get(&self, label: i64) -> Option<usize> {
        self.targets.get(&label).copied()
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Sparse integer-addressed storage. Cells exist only once stored to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Heap {
    cells: HashMap<i64, i64>,
}

impl Heap {
    pub fn store(&mut self, address: i64, value: i64) {
        self.cells.insert(address, value);
    }

    /// The value at `address`, or `None` if it was never stored to.
    pub fn load(&self, address: i64) -> Option<i64> {
        self.cells.get(&address).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The wspace virtual machine.
///
/// Input, output and the observer are configured once, before [`VM::run`].
/// Without configuration the VM reads from an empty input and discards its
/// output.
pub struct VM<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Label targets, resolved before execution.
    pub(crate) labels: LabelTable,
    /// Operand stack.
    pub(crate) stack: Vec<i64>,
    pub(crate) heap: Heap,
    /// Return addresses pushed by call.
    pub(crate) call_stack: Vec<usize>,
    /// Program counter (instruction index).
    pub(crate) pc: usize,
    /// Number of instructions dispatched so far.
    pub(crate) steps: u64,
    pub(crate) input: Box<dyn BufRead + 'a>,
    pub(crate) output: Box<dyn Write + 'a>,
    pub(crate) observer: Option<Box<dyn Observer + 'a>>,
    /// Result of the completed run, replayed by later calls to `run`.
    pub(crate) outcome: Option<Result<(), RuntimeError>>,
}

impl<'a> VM<'a> {
    /// Create a new VM for the given program and resolve its labels.
    pub fn new(program: &'a Program) -> Self {
        let labels = LabelTable::build(program);
        debug!(
            instructions = program.len(),
            labels = labels.len(),
            "label table built"
        );

        Self {
            program,
            labels,
            stack: Vec::new(),
            heap: Heap::default(),
            call_stack: Vec::new(),
            pc: 0,
            steps: 0,
            input: Box::new(io::empty()),
            output: Box::new(io::sink()),
            observer: None,
            outcome: None,
        }
    }

    /// Read runtime input from `input`.
    pub fn with_input(mut self, input: impl BufRead + 'a) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Write program output to `output`.
    pub fn with_output(mut self, output: impl Write + 'a) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Report every dispatched instruction to `observer`.
    pub fn with_observer(mut self, observer: impl Observer + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Current operand stack, bottom first.
    pub fn stack(&self) -> &[i64] {
        &self.stack
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Number of instructions dispatched so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Index of the instruction being executed (the one just fetched).
    pub(crate) fn at(&self) -> usize {
        self.pc.saturating_sub(1)
    }

    pub(crate) fn push(&mut self, value: i64) {
        self.stack.push(value);
    }

    /// Pop a value from the stack.
    pub(crate) fn pop(&mut self, kind: Kind) -> Result<i64, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow {
            at: self.at(),
            kind,
            required: kind.min_depth(),
            depth: self.stack.len(),
        })
    }

    /// Check the stack holds at least as many values as `kind` consumes.
    pub(crate) fn require(&self, kind: Kind) -> Result<(), RuntimeError> {
        let required = kind.min_depth();
        if self.stack.len() < required {
            return Err(RuntimeError::StackUnderflow {
                at: self.pc,
                kind,
                required,
                depth: self.stack.len(),
            });
        }
        Ok(())
    }

    /// Target index for a call or jump to `label`.
    pub(crate) fn resolve(&self, label: i64) -> Result<usize, RuntimeError> {
        self.labels
            .get(label)
            .ok_or(RuntimeError::UnknownLabel {
                at: self.at(),
                label,
            })
    }

    /// Read a heap cell, failing on addresses never stored to.
    pub(crate) fn load(&self, address: i64) -> Result<i64, RuntimeError> {
        self.heap
            .load(address)
            .ok_or(RuntimeError::UndefinedHeapAddress {
                at: self.at(),
                address,
            })
    }

    /// Fetch the instruction at the current pc.
    pub(crate) fn fetch(&self) -> Result<Instruction, RuntimeError> {
        self.program
            .get(self.pc)
            .copied()
            .ok_or(RuntimeError::UnexpectedEndOfProgram { at: self.pc })
    }

    pub(crate) fn io_error(&self, err: io::Error) -> RuntimeError {
        RuntimeError::Io {
            at: self.at(),
            kind: err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(n: i64) -> Instruction {
        Instruction::with_operand(Kind::Label, n)
    }

    #[test]
    fn label_table_records_definitions() {
        let program = Program::new(vec![
            Instruction::new(Kind::Exit),
            label(7),
            Instruction::with_operand(Kind::Jump, 7),
            label(-2),
        ]);
        let labels = LabelTable::build(&program);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get(7), Some(1));
        assert_eq!(labels.get(-2), Some(3));
        assert_eq!(labels.get(0), None);
    }

    #[test]
    fn duplicate_label_last_definition_wins() {
        let program = Program::new(vec![label(1), label(1), label(1)]);
        assert_eq!(LabelTable::build(&program).get(1), Some(2));
    }

    #[test]
    fn heap_is_sparse() {
        let mut heap = Heap::default();
        assert!(heap.is_empty());
        heap.store(1_000_000, 5);
        heap.store(-3, 6);
        heap.store(-3, 7);
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.load(-3), Some(7));
        assert_eq!(heap.load(0), None);
    }

    #[test]
    fn require_reports_depth() {
        let program = Program::default();
        let mut vm = VM::new(&program);
        vm.push(1);
        assert!(vm.require(Kind::Duplicate).is_ok());
        assert_eq!(
            vm.require(Kind::Add),
            Err(RuntimeError::StackUnderflow {
                at: 0,
                kind: Kind::Add,
                required: 2,
                depth: 1
            })
        );
    }

    #[test]
    fn pop_on_empty_stack_reports_actual_depth() {
        let program = Program::new(vec![Instruction::new(Kind::Discard)]);
        let mut vm = VM::new(&program);
        vm.pc = 1;
        assert_eq!(
            vm.pop(Kind::Swap),
            Err(RuntimeError::StackUnderflow {
                at: 0,
                kind: Kind::Swap,
                required: 2,
                depth: 0
            })
        );
        vm.push(4);
        assert_eq!(vm.pop(Kind::Swap), Ok(4));
    }

    #[test]
    fn fetch_past_end() {
        let program = Program::default();
        let vm = VM::new(&program);
        assert_eq!(
            vm.fetch(),
            Err(RuntimeError::UnexpectedEndOfProgram { at: 0 })
        );
    }
}
