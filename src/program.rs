/*!

  A `Program` is a validated, immutable instruction sequence together with a label
  table computed once up front. Validation rejects every structurally illegal
  program before the first execution step:

    * a destination operand that is not a memory reference (`IllegalLvalue`);
    * a declaration whose value operand is a memory reference; declaration
      values are restricted to literals and address-of expressions
      (`MalformedProgram`).

  Jumps resolve against the label table rather than rescanning the instruction
  sequence; the table records the *first* occurrence of each label, so a
  duplicated label's later occurrences are dead, exactly as a left-to-right scan
  of the full program would behave.

*/

use std::fmt::{Display, Formatter};

use bimap::BiMap;

use crate::error::MachineError;
use crate::ident::Ident;
use crate::instruction::Instruction;

/// A two-way mapping between label identifiers and the index of the `Label`
/// instruction that introduces them. The forward direction resolves jumps; the
/// reverse direction answers which label, if any, an instruction index carries.
#[derive(Debug)]
pub struct LabelTable {
  table: BiMap<Ident, usize>,
}

impl LabelTable {

  pub fn new() -> LabelTable {
    LabelTable {
      table: BiMap::new(),
    }
  }

  /// Records `label` at `index` unless the label was already seen. First
  /// occurrence wins; a duplicate is left dead rather than reported.
  pub fn insert(&mut self, label: Ident, index: usize) {
    // `insert_no_overwrite` refuses exactly when either side is present, which
    // is the behavior wanted here.
    let _ = self.table.insert_no_overwrite(label, index);
  }

  /// The instruction index of the `Label` matching `label`, or `LabelNotFound`.
  /// Execution resumes at the index *after* the one returned.
  pub fn resolve(&self, label: &Ident) -> Result<usize, MachineError> {
    self
      .table
      .get_by_left(label)
      .copied()
      .ok_or_else(|| MachineError::LabelNotFound(label.clone()))
  }

  /// The label introduced at instruction `index`, if any.
  pub fn label_at(&self, index: usize) -> Option<&Ident> {
    self.table.get_by_right(&index)
  }

}

#[derive(Debug)]
pub struct Program {
  instructions: Vec<Instruction>,
  labels:       LabelTable,
}

impl Program {

  /// Validates the instruction sequence and computes the label table.
  pub fn new(instructions: Vec<Instruction>) -> Result<Program, MachineError> {
    let mut labels = LabelTable::new();

    for (index, instruction) in instructions.iter().enumerate() {
      if let Some(dst) = instruction.destination() {
        if !dst.is_lvalue() {
          return Err(MachineError::IllegalLvalue(dst.clone()));
        }
      }

      match instruction {

        Instruction::Label(id) => {
          labels.insert(id.clone(), index);
        }

        Instruction::D { id, value } if value.is_lvalue() => {
          return Err(MachineError::MalformedProgram(format!(
            "declaration of `{}` initialized from {}; declaration values must be Num or Lea",
            id, value
          )));
        }

        _ => {}

      }
    }

    Ok(Program {
      instructions,
      labels,
    })
  }

  /// The empty program. Booting it yields an all-zero memory image.
  pub fn empty() -> Program {
    Program {
      instructions: vec![],
      labels:       LabelTable::new(),
    }
  }

  pub fn instructions(&self) -> &[Instruction] {
    &self.instructions
  }

  pub fn labels(&self) -> &LabelTable {
    &self.labels
  }

  pub fn len(&self) -> usize {
    self.instructions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instructions.is_empty()
  }

}

impl Display for Program {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    for instruction in &self.instructions {
      writeln!(f, "{}", instruction)?;
    }
    Ok(())
  }
}
