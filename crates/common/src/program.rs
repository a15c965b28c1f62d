//! Program representation: the decoded, ordered instruction sequence.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;

/// A decoded whitespace program, indexed from 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new program from a vector of instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The instruction at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl Index<usize> for Program {
    type Output = Instruction;

    fn index(&self, index: usize) -> &Instruction {
        &self.instructions[index]
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;

    #[test]
    fn empty_program() {
        let program = Program::default();
        assert!(program.is_empty());
        assert_eq!(program.len(), 0);
        assert_eq!(program.get(0), None);
    }

    #[test]
    fn len_and_index() {
        let program = Program::new(vec![
            Instruction::with_operand(Kind::Push, 1),
            Instruction::new(Kind::OutputNumber),
            Instruction::new(Kind::Exit),
        ]);
        assert_eq!(program.len(), 3);
        assert!(!program.is_empty());
        assert_eq!(program[1].kind, Kind::OutputNumber);
        assert_eq!(program.get(2), Some(&Instruction::new(Kind::Exit)));
    }

    #[test]
    fn collect_from_iterator() {
        let program: Program = [Kind::Duplicate, Kind::Exit]
            .into_iter()
            .map(Instruction::new)
            .collect();
        assert_eq!(program.len(), 2);
        assert_eq!(program.iter().last().map(|i| i.kind), Some(Kind::Exit));
    }

    #[test]
    fn serializes_as_plain_list() {
        let program = Program::new(vec![Instruction::new(Kind::Exit)]);
        assert_eq!(
            serde_json::to_string(&program).unwrap(),
            r#"[{"kind":"exit","operand":0}]"#
        );
    }
}
