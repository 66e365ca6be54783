/*!

  A deterministic virtual machine for a tiny fixed assembly language. A program
  is an ordered sequence of instructions known in full before execution: variable
  declarations, data movement, arithmetic, bitwise logic, comparison, labels, and
  conditional/unconditional jumps. Booting a machine zeroes its word memory,
  materializes the declarations in declaration order, interprets the remaining
  instructions, and yields the final memory image, the machine's only output.

  ```
  use tavm::{parse_assembly, Machine};

  let program = parse_assembly(
    "D(a, Num(5))
     Inc(Mem(Lea(a)))"
  ).unwrap();

  let mut machine: Machine<i32> = Machine::new(4);
  assert_eq!(machine.boot(&program).unwrap(), vec![6, 0, 0, 0]);
  ```

  Programs can equally be built directly from `Instruction` values and validated
  with `Program::new`; the assembly text form is just the human-readable spelling
  of the same instructions.

*/

#[macro_use]
extern crate prettytable;
#[macro_use]
extern crate lazy_static;

pub mod assembly;
pub mod error;
pub mod ident;
pub mod instruction;
pub mod machine;
pub mod operand;
pub mod program;
pub mod word;

pub use assembly::parse_assembly;
pub use error::MachineError;
pub use ident::Ident;
pub use instruction::{Instruction, Opcode};
pub use machine::Machine;
pub use operand::Operand;
pub use program::Program;
pub use word::Word;
