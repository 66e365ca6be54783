//! Operands of the assembly language. An operand always evaluates to a readable
//! word (an rvalue); only a memory reference additionally names a writable cell
//! (an lvalue), and instruction destinations are restricted to memory references.

use std::fmt::{Display, Formatter};

use crate::error::MachineError;
use crate::ident::Ident;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Operand {
  /// `Num(v)`: a literal word value. Never a destination.
  Num(i64),
  /// `Lea(id)`: the slot index of the declared variable `id`. Never a destination.
  Lea(Ident),
  /// `Mem(addr)`: the cell addressed by evaluating `addr`. The only legal
  /// destination, and itself usable wherever an rvalue is expected.
  Mem(Box<Operand>),
}

impl Operand {

  /// Shorthand for `Lea` over a source name.
  pub fn lea(name: &str) -> Result<Operand, MachineError> {
    Ok(Operand::Lea(Ident::new(name)?))
  }

  /// Shorthand for a memory reference to the variable `name`, i.e. `Mem(Lea(name))`.
  pub fn var(name: &str) -> Result<Operand, MachineError> {
    Ok(Operand::Mem(Box::new(Operand::lea(name)?)))
  }

  pub fn mem(address: Operand) -> Operand {
    Operand::Mem(Box::new(address))
  }

  pub fn is_lvalue(&self) -> bool {
    match self {
      Operand::Mem(_) => true,
      _               => false,
    }
  }

}

impl Display for Operand {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Operand::Num(value)   => write!(f, "Num({})", value),
      Operand::Lea(id)      => write!(f, "Lea({})", id),
      Operand::Mem(address) => write!(f, "Mem({})", address),
    }
  }
}
