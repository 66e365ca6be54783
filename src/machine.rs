/*!

  The machine proper: a bounded, zero-initialized word memory, a parallel record
  of which variable occupies which slot, and the two status flags. `boot` is the
  single entry point: it resets the state, materializes declarations in program
  order, interprets the remaining instructions, and returns the final memory
  image. Every failure aborts the call; there is no partial image.

  Execution is a cursor over the validated instruction sequence. A jump replaces
  the cursor with the position just past the target label, resolved through the
  program's label table. There is no call stack and no loop detection: a program
  that jumps in a cycle runs forever, as the language defines it to.

*/

use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};

use crate::error::MachineError;
use crate::ident::Ident;
use crate::instruction::Instruction;
use crate::operand::Operand;
use crate::program::Program;
use crate::word::Word;

pub struct Machine<W: Word> {

  /// Number of memory cells, fixed at construction.
  size : usize,

  // Memory stores //
  /// The word memory, `size` cells, zeroed at boot.
  mem  : Vec<W>,
  /// Slot tags, one per declared variable, in declaration order. The length of
  /// this vector is the next free slot.
  tags : Vec<Ident>,

  // Flags //
  /// Zero flag: the last arithmetic or logical result was zero.
  zf   : bool,
  /// Sign flag: the last arithmetic result was negative.
  sf   : bool,

}

impl<W: Word> Machine<W> {

  // region Low-level utility methods

  /// A machine with `size` cells of `W` memory. The memory is not allocated
  /// until `boot`, which starts every run from the same zeroed state.
  pub fn new(size: usize) -> Machine<W> {
    Machine {
      size,
      mem  : vec![],
      tags : vec![],
      zf   : false,
      sf   : false,
    }
  }

  pub fn size(&self) -> usize {
    self.size
  }

  pub fn zero_flag(&self) -> bool {
    self.zf
  }

  pub fn sign_flag(&self) -> bool {
    self.sf
  }

  fn reset(&mut self) {
    self.mem  = vec![W::zero(); self.size];
    self.tags = vec![];
    self.zf   = false;
    self.sf   = false;
  }

  fn set_arithmetic_flags(&mut self, result: W) {
    self.zf = result.is_zero();
    self.sf = result.is_negative();
  }

  /// Logical instructions leave SF alone.
  fn set_logical_flags(&mut self, result: W) {
    self.zf = result.is_zero();
  }

  // endregion

  // region Operand evaluation

  /// The slot index of the declared variable `id`. Only slots declared so far
  /// are searched, so a declaration never sees itself or later declarations.
  fn slot_of(&self, id: &Ident) -> Result<usize, MachineError> {
    self
      .tags
      .iter()
      .position(|tag| tag == id)
      .ok_or_else(|| MachineError::UnknownIdentifier(id.clone()))
  }

  /// Evaluates `address` and reinterprets it through the unsigned version of the
  /// word type, bounds-checking against the memory size.
  fn resolve_address(&self, address: &Operand) -> Result<usize, MachineError> {
    let address = self.rvalue(address)?.as_address();
    if address >= self.size {
      return Err(MachineError::OutOfBoundsAccess {
        address,
        size: self.size,
      });
    }
    Ok(address)
  }

  /// The readable value of any operand.
  fn rvalue(&self, operand: &Operand) -> Result<W, MachineError> {
    match operand {

      Operand::Num(value) => Ok(W::from_literal(*value)),

      Operand::Lea(id) => {
        let slot = self.slot_of(id)?;
        Ok(W::from_literal(slot as i64))
      }

      Operand::Mem(address) => {
        let address = self.resolve_address(address)?;
        Ok(self.mem[address])
      }

    }
  }

  /// The writable cell an operand names. Only memory references are legal here;
  /// validation rejects other destinations up front, and this re-checks at the
  /// point of use.
  fn lvalue(&mut self, operand: &Operand) -> Result<&mut W, MachineError> {
    match operand {

      Operand::Mem(address) => {
        let address = self.resolve_address(address)?;
        Ok(&mut self.mem[address])
      }

      _ => Err(MachineError::IllegalLvalue(operand.clone())),

    }
  }

  // endregion

  // region Declaration pass

  /// Walks the full program once, in order, materializing every declaration into
  /// the next free slot. This pass never jumps; control transfer only affects the
  /// execution pass.
  fn declare_variables(&mut self, program: &Program) -> Result<(), MachineError> {
    for instruction in program.instructions() {
      if let Instruction::D { id, value } = instruction {

        if self.tags.len() >= self.size {
          return Err(MachineError::OutOfMemory(id.clone()));
        }

        // Evaluate before tagging the slot: the value may name earlier
        // variables via Lea, but not the one being declared.
        let value = self.rvalue(value)?;
        let slot  = self.tags.len();
        self.mem[slot] = value;
        self.tags.push(id.clone());

      }
    }
    Ok(())
  }

  // endregion

  // region Execution pass

  fn run(&mut self, program: &Program) -> Result<(), MachineError> {
    let code   = program.instructions();
    let mut pc = 0;

    while pc < code.len() {
      let instruction = &code[pc];

      #[cfg(feature = "trace_computation")]
      println!("[{}] {}", pc, instruction);

      pc += 1;

      match instruction {

        // Declarations were applied before execution; labels are jump targets
        // with no effect of their own.
        | Instruction::D { .. }
        | Instruction::Label(_) => {}

        Instruction::Mov { dst, src } => {
          let value = self.rvalue(src)?;
          *self.lvalue(dst)? = value;
        }

        Instruction::Add { dst, src } => {
          let result = self.rvalue(dst)?.wrapping_add(self.rvalue(src)?);
          *self.lvalue(dst)? = result;
          self.set_arithmetic_flags(result);
        }

        Instruction::Sub { dst, src } => {
          let result = self.rvalue(dst)?.wrapping_sub(self.rvalue(src)?);
          *self.lvalue(dst)? = result;
          self.set_arithmetic_flags(result);
        }

        Instruction::Inc(dst) => {
          let before = self.rvalue(dst)?;
          *self.lvalue(dst)? = before.wrapping_add(W::from_literal(1));
          // Flags capture the value before the increment.
          self.set_arithmetic_flags(before);
        }

        Instruction::Dec(dst) => {
          let before = self.rvalue(dst)?;
          *self.lvalue(dst)? = before.wrapping_sub(W::from_literal(1));
          self.set_arithmetic_flags(before);
        }

        Instruction::And { dst, src } => {
          let result = self.rvalue(dst)?.bit_and(self.rvalue(src)?);
          *self.lvalue(dst)? = result;
          self.set_logical_flags(result);
        }

        Instruction::Or { dst, src } => {
          let result = self.rvalue(dst)?.bit_or(self.rvalue(src)?);
          *self.lvalue(dst)? = result;
          self.set_logical_flags(result);
        }

        Instruction::Not(dst) => {
          let result = self.rvalue(dst)?.bit_not();
          *self.lvalue(dst)? = result;
          self.set_logical_flags(result);
        }

        Instruction::Cmp { lhs, rhs } => {
          let result = self.rvalue(lhs)?.wrapping_sub(self.rvalue(rhs)?);
          self.set_arithmetic_flags(result);
        }

        Instruction::Jmp(label) => {
          pc = program.labels().resolve(label)? + 1;
        }

        Instruction::Jz(label) => {
          if self.zf {
            pc = program.labels().resolve(label)? + 1;
          }
        }

        Instruction::Js(label) => {
          if self.sf {
            pc = program.labels().resolve(label)? + 1;
          }
        }

      } // end match on instruction

      #[cfg(feature = "trace_computation")]
      println!("{}", self);

    } // end while instructions remain

    Ok(())
  }

  // endregion

  /// Boots the machine with `program`: zeroes memory, materializes declarations
  /// in declaration order, executes the remaining instructions, and returns the
  /// final memory image. The machine state is rebuilt from scratch on every
  /// call, so a machine can boot any number of programs in sequence.
  pub fn boot(&mut self, program: &Program) -> Result<Vec<W>, MachineError> {
    self.reset();

    #[cfg(feature = "trace_computation")]
    {
      println!("# Booting with {} instructions:\n{}", program.len(), program);
    }

    self.declare_variables(program)?;
    self.run(program)?;
    Ok(self.mem.clone())
  }

  // region Display methods

  fn make_memory_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents", ubl->"Variable"]);

    for (i, cell) in self.mem.iter().enumerate() {
      let tag = match self.tags.get(i) {
        Some(id) => format!("{}", id),
        None     => String::new(),
      };
      table.add_row(row![r->format!("M[{}] =", i), format!("{}", cell), tag]);
    }
    table
  }

  // endregion

}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl<W: Word> Display for Machine<W> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "ZF: {}  SF: {}\n{}",
      self.zf as u8,
      self.sf as u8,
      self.make_memory_table()
    )
  }
}
