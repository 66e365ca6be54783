//! Identifiers name variables and labels. An identifier is created from a string of
//! one to six ASCII letters and digits and is case-insensitive: `Ident::new("loop")`
//! and `Ident::new("LOOP")` compare equal. The spelling is interned so that
//! diagnostics and the trace display can print the name as written.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use string_cache::DefaultAtom;

use crate::error::MachineError;

/// The numeric key an identifier encodes to. Only equality of keys ever matters;
/// keys are never decoded back into names.
pub type IdentKey = u64;

/// The encoding treats a name as digits of a base-38 number: 37 symbols for the
/// alphanumerics plus a padding symbol (zero) that shorter names are conceptually
/// left-padded with. Since every real symbol codes to a nonzero value, names of
/// different lengths can never collide.
pub const IDENT_RADIX: IdentKey = 38;

pub const IDENT_MIN_LENGTH: usize = 1;
pub const IDENT_MAX_LENGTH: usize = 6;

/**
  The interned name of a variable or label together with its numeric key.
  Clones are cheap. Two `Ident`s are equal iff their keys are equal, which
  holds iff their names are equal ignoring case.
*/
#[derive(Debug, Clone, Eq)]
pub struct Ident {
  /// The spelling as written in the source, interned.
  pub name : DefaultAtom,
  /// Case-normalized base-38 encoding of the name.
  pub key  : IdentKey,
}

impl Ident {

  /// Validates `name` and encodes it. Fails with `InvalidIdentifier` on a name of
  /// the wrong length or containing a character outside `[0-9A-Za-z]`.
  pub fn new(name: &str) -> Result<Ident, MachineError> {
    if name.len() < IDENT_MIN_LENGTH || name.len() > IDENT_MAX_LENGTH {
      return Err(MachineError::InvalidIdentifier(name.to_string()));
    }

    let mut key: IdentKey = 0;
    for c in name.chars() {
      key = key * IDENT_RADIX + symbol_code(c)
        .ok_or_else(|| MachineError::InvalidIdentifier(name.to_string()))?;
    }

    Ok(Ident {
      name: DefaultAtom::from(name),
      key,
    })
  }

}

/// Maps a single symbol to its nonzero code: digits to 1..=10, letters
/// (case-folded) to 11..=36. Code 0 is reserved for padding.
fn symbol_code(c: char) -> Option<IdentKey> {
  match c {
    '0'..='9' => Some(c as IdentKey - '0' as IdentKey + 1),
    'A'..='Z' => Some(c as IdentKey - 'A' as IdentKey + 11),
    'a'..='z' => Some(c as IdentKey - 'a' as IdentKey + 11),
    _         => None,
  }
}

impl PartialEq for Ident {
  fn eq(&self, other: &Ident) -> bool {
    self.key == other.key
  }
}

impl Hash for Ident {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.key.hash(state);
  }
}

impl Display for Ident {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name)
  }
}
