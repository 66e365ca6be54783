//! The machine word: the fixed-width integer unit every memory cell holds and all
//! arithmetic is performed in. The machine is generic over any primitive integer
//! width and signedness; arithmetic always wraps, never saturates or traps.
//!
//! Addressing follows the *unsigned* reinterpretation of the word, so on a 32-bit
//! signed machine `Mem(Num(-1))` addresses cell 0xFFFFFFFF, which the bounds check
//! then rejects for any realistic memory size.

use std::fmt::{Debug, Display};

pub trait Word: Copy + PartialEq + Debug + Display + Default + 'static {

  const BITS   : u32;
  const SIGNED : bool;

  fn zero() -> Self;

  /// Truncating conversion from a source literal, wrapping modulo the word width.
  fn from_literal(value: i64) -> Self;

  /// The word reinterpreted as an unsigned cell index.
  fn as_address(self) -> usize;

  fn wrapping_add(self, rhs: Self) -> Self;
  fn wrapping_sub(self, rhs: Self) -> Self;

  fn bit_and(self, rhs: Self) -> Self;
  fn bit_or(self, rhs: Self) -> Self;
  fn bit_not(self) -> Self;

  fn is_zero(self) -> bool;

  /// Always false for unsigned words, mirroring `result < 0` on an unsigned type.
  fn is_negative(self) -> bool;

}

macro_rules! impl_word {
  ($($ty:ty => ($unsigned:ty, $signed:expr)),* $(,)?) => {$(

    impl Word for $ty {

      const BITS   : u32  = <$ty>::BITS;
      const SIGNED : bool = $signed;

      fn zero() -> Self { 0 }

      fn from_literal(value: i64) -> Self {
        value as $ty
      }

      fn as_address(self) -> usize {
        self as $unsigned as usize
      }

      fn wrapping_add(self, rhs: Self) -> Self { <$ty>::wrapping_add(self, rhs) }
      fn wrapping_sub(self, rhs: Self) -> Self { <$ty>::wrapping_sub(self, rhs) }

      fn bit_and(self, rhs: Self) -> Self { self & rhs }
      fn bit_or(self, rhs: Self)  -> Self { self | rhs }
      fn bit_not(self)            -> Self { !self }

      fn is_zero(self) -> bool { self == 0 }

      #[allow(unused_comparisons)]
      fn is_negative(self) -> bool { self < 0 }

    }

  )*};
}

impl_word!(
  i8  => (u8,  true),
  i16 => (u16, true),
  i32 => (u32, true),
  i64 => (u64, true),
  u8  => (u8,  false),
  u16 => (u16, false),
  u32 => (u32, false),
  u64 => (u64, false),
);
