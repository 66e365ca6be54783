/*!

  The instruction set of the machine. The set is closed and fixed: a program is an
  ordered sequence of the variants below, fully known before execution, and there
  is no way to express an instruction outside the set.

  An enum is used for the opcode itself separately from the data-carrying
  `Instruction` variants so that the textual front end can resolve a mnemonic and
  check its arity before it has parsed any arguments. As in the bytecode scheme
  this was adapted from, opcodes are grouped by shape and the grouping is encoded
  in the discriminant order, so a given opcode's arity and argument kinds are
  determined by trivial comparisons. Consequently, the order the opcodes are
  listed below is significant. Order-dependencies:
      ```
      Opcode::arity()
      Opcode::operand_arity()
      Opcode::takes_ident()
      ```

*/

use std::fmt::{Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};

use crate::ident::Ident;
use crate::operand::Operand;

/**
  Opcodes of the virtual machine, one per instruction mnemonic.

  Grouping, in discriminant order:
    * two operand arguments, result stored in the first (`Mov` .. `Or`);
    * two operand arguments, result discarded (`Cmp`);
    * one operand argument (`Inc` .. `Not`);
    * one identifier argument (`Label` .. `Js`);
    * identifier plus value operand (`D`).
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,         PartialEq,        Debug,         Hash
)]
#[repr(u8)]
pub enum Opcode {
  // Two operands, destination first //
  Mov,
  Add,
  Sub,
  And,
  Or,
  // Two operands, nothing stored //
  Cmp,          // Opcode 5

  // One operand //
  Inc,
  Dec,
  Not,          // Opcode 8

  // One identifier //
  Label,
  Jmp,
  Jz,
  Js,           // Opcode 12

  // Identifier and value operand //
  D,
}

pub const MAX_BINARY_OPCODE  : u8 = 6;
pub const MAX_UNARY_OPCODE   : u8 = 9;
pub const MAX_IDENT_OPCODE   : u8 = 13;

impl Opcode {

  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// Total argument count as written in source.
  pub fn arity(&self) -> usize {
    match self.code() {
      value if value < MAX_BINARY_OPCODE => 2,
      value if value < MAX_UNARY_OPCODE  => 1,
      value if value < MAX_IDENT_OPCODE  => 1,
      _value                             => 2, // D(id, value)
    }
  }

  /// How many of the arguments are operands (as opposed to bare identifiers).
  pub fn operand_arity(&self) -> usize {
    match self.code() {
      value if value < MAX_BINARY_OPCODE => 2,
      value if value < MAX_UNARY_OPCODE  => 1,
      value if value < MAX_IDENT_OPCODE  => 0,
      _value                             => 1,
    }
  }

  /// Whether the first source argument is a bare identifier.
  pub fn takes_ident(&self) -> bool {
    self.code() >= MAX_UNARY_OPCODE
  }

}

/// A complete instruction: an opcode together with its arguments.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// Declares the variable `id` with initial value `value`, which must be a
  /// `Num` or `Lea` operand. Declarations are materialized into memory in
  /// program order before anything executes.
  D { id: Ident, value: Operand },
  /// A jump target. Falls through when reached in normal sequence.
  Label(Ident),
  /// `dst = src`. Flags untouched.
  Mov { dst: Operand, src: Operand },
  /// `dst = dst + src`, setting ZF and SF from the result.
  Add { dst: Operand, src: Operand },
  /// `dst = dst - src`, setting ZF and SF from the result.
  Sub { dst: Operand, src: Operand },
  /// `dst = dst + 1`. Flags reflect the value before the increment.
  Inc(Operand),
  /// `dst = dst - 1`. Flags reflect the value before the decrement.
  Dec(Operand),
  /// `dst = dst & src`, setting ZF from the result; SF untouched.
  And { dst: Operand, src: Operand },
  /// `dst = dst | src`, setting ZF from the result; SF untouched.
  Or { dst: Operand, src: Operand },
  /// `dst = ~dst`, setting ZF from the result; SF untouched.
  Not(Operand),
  /// Computes `lhs - rhs`, sets ZF and SF, stores nothing.
  Cmp { lhs: Operand, rhs: Operand },
  /// Unconditional jump to the first `Label(id)` in the program.
  Jmp(Ident),
  /// Jump if ZF is set, else fall through.
  Jz(Ident),
  /// Jump if SF is set, else fall through.
  Js(Ident),
}

impl Instruction {

  pub fn opcode(&self) -> Opcode {
    match self {
      Instruction::D { .. }     => Opcode::D,
      Instruction::Label(_)     => Opcode::Label,
      Instruction::Mov { .. }   => Opcode::Mov,
      Instruction::Add { .. }   => Opcode::Add,
      Instruction::Sub { .. }   => Opcode::Sub,
      Instruction::Inc(_)       => Opcode::Inc,
      Instruction::Dec(_)       => Opcode::Dec,
      Instruction::And { .. }   => Opcode::And,
      Instruction::Or { .. }    => Opcode::Or,
      Instruction::Not(_)       => Opcode::Not,
      Instruction::Cmp { .. }   => Opcode::Cmp,
      Instruction::Jmp(_)       => Opcode::Jmp,
      Instruction::Jz(_)        => Opcode::Jz,
      Instruction::Js(_)        => Opcode::Js,
    }
  }

  /// The destination operand, for the instructions that write one.
  pub fn destination(&self) -> Option<&Operand> {
    match self {
      | Instruction::Mov { dst, .. }
      | Instruction::Add { dst, .. }
      | Instruction::Sub { dst, .. }
      | Instruction::And { dst, .. }
      | Instruction::Or  { dst, .. } => Some(dst),
      | Instruction::Inc(dst)
      | Instruction::Dec(dst)
      | Instruction::Not(dst)        => Some(dst),
      _                              => None,
    }
  }

}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      Instruction::D { id, value } => {
        write!(f, "D({}, {})", id, value)
      }

      | Instruction::Label(id)
      | Instruction::Jmp(id)
      | Instruction::Jz(id)
      | Instruction::Js(id) => {
        write!(f, "{}({})", self.opcode(), id)
      }

      | Instruction::Mov { dst, src }
      | Instruction::Add { dst, src }
      | Instruction::Sub { dst, src }
      | Instruction::And { dst, src }
      | Instruction::Or  { dst, src } => {
        write!(f, "{}({}, {})", self.opcode(), dst, src)
      }

      | Instruction::Inc(dst)
      | Instruction::Dec(dst)
      | Instruction::Not(dst) => {
        write!(f, "{}({})", self.opcode(), dst)
      }

      Instruction::Cmp { lhs, rhs } => {
        write!(f, "Cmp({}, {})", lhs, rhs)
      }

    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn mnemonics_round_trip() {
    for opcode in &[
      Opcode::Mov, Opcode::Add, Opcode::Sub, Opcode::And, Opcode::Or, Opcode::Cmp,
      Opcode::Inc, Opcode::Dec, Opcode::Not,
      Opcode::Label, Opcode::Jmp, Opcode::Jz, Opcode::Js, Opcode::D,
    ] {
      let text = format!("{}", opcode);
      assert_eq!(Opcode::from_str(&text).unwrap(), *opcode);
    }
  }

  #[test]
  fn unknown_mnemonic_is_rejected() {
    assert!(Opcode::from_str("Robert").is_err());
    assert!(Opcode::from_str("mov").is_err()); // mnemonics are case-sensitive
  }

  #[test]
  fn arity_follows_opcode_grouping() {
    assert_eq!(Opcode::Mov.arity(), 2);
    assert_eq!(Opcode::Cmp.arity(), 2);
    assert_eq!(Opcode::Inc.arity(), 1);
    assert_eq!(Opcode::Jmp.arity(), 1);
    assert_eq!(Opcode::D.arity(), 2);

    assert_eq!(Opcode::Jmp.operand_arity(), 0);
    assert_eq!(Opcode::D.operand_arity(), 1);
    assert!(Opcode::Label.takes_ident());
    assert!(!Opcode::Not.takes_ident());
  }

  #[test]
  fn destination_covers_exactly_the_writing_instructions() {
    let cell = Operand::mem(Operand::Num(0));
    for instruction in &[
      Instruction::Mov { dst: cell.clone(), src: Operand::Num(1) },
      Instruction::Add { dst: cell.clone(), src: Operand::Num(1) },
      Instruction::Sub { dst: cell.clone(), src: Operand::Num(1) },
      Instruction::And { dst: cell.clone(), src: Operand::Num(1) },
      Instruction::Or  { dst: cell.clone(), src: Operand::Num(1) },
      Instruction::Inc(cell.clone()),
      Instruction::Dec(cell.clone()),
      Instruction::Not(cell.clone()),
    ] {
      assert_eq!(instruction.destination(), Some(&cell), "{}", instruction);
    }
    for instruction in &[
      Instruction::Cmp { lhs: cell.clone(), rhs: Operand::Num(1) },
      Instruction::Label(Ident::new("L").unwrap()),
      Instruction::Jmp(Ident::new("L").unwrap()),
      Instruction::D { id: Ident::new("a").unwrap(), value: Operand::Num(1) },
    ] {
      assert_eq!(instruction.destination(), None, "{}", instruction);
    }
  }

  #[test]
  fn display_matches_source_syntax() {
    let inst = Instruction::Mov {
      dst: Operand::var("abc").unwrap(),
      src: Operand::Num(13),
    };
    assert_eq!(format!("{}", inst), "Mov(Mem(Lea(abc)), Num(13))");

    let inst = Instruction::Jz(Ident::new("end").unwrap());
    assert_eq!(format!("{}", inst), "Jz(end)");
  }
}
