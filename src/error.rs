//! Every failure mode of the machine. All of them are fatal to the current `boot`
//! call: there is no recovery and no partial memory image.

use thiserror::Error;

use crate::ident::Ident;
use crate::operand::Operand;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {

  /// A name failed length or character-set validation.
  #[error("`{0}` is not a valid identifier: 1 to 6 ASCII letters or digits required")]
  InvalidIdentifier(String),

  /// An instruction structurally outside the instruction set, caught before
  /// execution starts.
  #[error("malformed program: {0}")]
  MalformedProgram(String),

  /// A destination operand that is not a memory reference.
  #[error("operand {0} is not a legal destination; only Mem(..) can be written")]
  IllegalLvalue(Operand),

  /// A resolved address at or past the end of memory.
  #[error("address {address} is out of bounds for a memory of {size} words")]
  OutOfBoundsAccess { address: usize, size: usize },

  /// More variable declarations than memory slots.
  #[error("out of memory: cannot declare `{0}`, all slots are occupied")]
  OutOfMemory(Ident),

  /// Address-of an identifier with no matching declared variable.
  #[error("no variable named `{0}` has been declared")]
  UnknownIdentifier(Ident),

  /// A jump to a label that appears nowhere in the program.
  #[error("label `{0}` not found")]
  LabelNotFound(Ident),

}
