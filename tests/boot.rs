//! End-to-end tests of the `boot` contract through the public crate surface,
//! mostly written in assembly text the way a user would write programs.

use tavm::{parse_assembly, Ident, Instruction, Machine, MachineError, Operand, Program};

fn boot_i32(size: usize, text: &str) -> Result<Vec<i32>, MachineError> {
  let program = parse_assembly(text)?;
  Machine::<i32>::new(size).boot(&program)
}

#[test]
fn empty_program_boots_to_zeros() {
  assert_eq!(boot_i32(4, "").unwrap(), vec![0, 0, 0, 0]);
  assert_eq!(boot_i32(4, "# only comments\n\n").unwrap(), vec![0, 0, 0, 0]);
  assert_eq!(
    Machine::<u16>::new(3).boot(&Program::empty()).unwrap(),
    vec![0, 0, 0]
  );
}

#[test]
fn declarations_only_program_fills_leading_slots() {
  let image = boot_i32(
    6,
    "D(a, Num(10))
     D(b, Num(-20))
     D(c, Num(30))",
  )
  .unwrap();
  assert_eq!(image, vec![10, -20, 30, 0, 0, 0]);
}

#[test]
fn reference_scenario_copy_then_increment() {
  // The worked example from the language description: memory ends [6, 5, 0, 0].
  let image = boot_i32(
    4,
    "D(A, Num(0))
     D(B, Num(5))
     Mov(Mem(Lea(A)), Mem(Lea(B)))
     Inc(Mem(Lea(A)))",
  )
  .unwrap();
  assert_eq!(image, vec![6, 5, 0, 0]);
}

#[test]
fn case_insensitive_labels_and_variables() {
  let image = boot_i32(
    2,
    "D(Acc, Num(1))
     Cmp(Mem(Lea(ACC)), Num(1))
     Jz(SKIP)
     Mov(Mem(Lea(acc)), Num(-1))
     Label(skip)
     Add(Mem(Lea(aCc)), Num(2))",
  )
  .unwrap();
  assert_eq!(image, vec![3, 0]);
}

#[test]
fn countdown_loop_reaches_zero_without_escaping_memory() {
  let image = boot_i32(
    4,
    "D(A, Num(1))
     Label(L)
     Dec(Mem(Lea(A)))
     Jz(L)",
  )
  .unwrap();
  assert_eq!(image, vec![0, 0, 0, 0]);
}

#[test]
fn summation_loop() {
  let image = boot_i32(
    4,
    "D(sum, Num(0))
     D(n, Num(5))
     Label(loop)
     Cmp(Mem(Lea(n)), Num(0))
     Jz(end)
     Add(Mem(Lea(sum)), Mem(Lea(n)))
     Sub(Mem(Lea(n)), Num(1))
     Jmp(loop)
     Label(end)",
  )
  .unwrap();
  assert_eq!(image, vec![15, 0, 0, 0]);
}

#[test]
fn more_declarations_than_memory_is_out_of_memory() {
  let error = boot_i32(
    2,
    "D(a, Num(1))
     D(b, Num(2))
     D(c, Num(3))",
  )
  .unwrap_err();
  assert_eq!(error, MachineError::OutOfMemory(Ident::new("c").unwrap()));
}

#[test]
fn jump_to_nonexistent_label_is_label_not_found() {
  let error = boot_i32(2, "Jmp(nope)").unwrap_err();
  assert_eq!(error, MachineError::LabelNotFound(Ident::new("nope").unwrap()));
}

#[test]
fn flag_laws_hold_after_arithmetic() {
  let program = parse_assembly(
    "D(a, Num(4))
     Sub(Mem(Lea(a)), Num(4))",
  )
  .unwrap();
  let mut machine: Machine<i32> = Machine::new(1);
  assert_eq!(machine.boot(&program).unwrap(), vec![0]);
  assert!(machine.zero_flag());
  assert!(!machine.sign_flag());

  let program = parse_assembly("Cmp(Num(3), Num(7))").unwrap();
  machine.boot(&program).unwrap();
  assert!(!machine.zero_flag());
  assert!(machine.sign_flag());
}

#[test]
fn logical_instructions_leave_the_sign_flag_alone() {
  let program = parse_assembly(
    "D(a, Num(-8))
     Cmp(Mem(Lea(a)), Num(0))
     Or(Mem(Lea(a)), Num(7))
     Not(Mem(Lea(a)))
     And(Mem(Lea(a)), Num(0))",
  )
  .unwrap();
  let mut machine: Machine<i32> = Machine::new(1);
  assert_eq!(machine.boot(&program).unwrap(), vec![0]);
  assert!(machine.zero_flag()); // from the final And
  assert!(machine.sign_flag()); // still from the Cmp
}

#[test]
fn address_of_is_stable_for_the_whole_run() {
  // Lea resolves to the declaration slot no matter how late it is evaluated.
  let image = boot_i32(
    4,
    "D(x, Num(0))
     D(y, Num(0))
     Mov(Mem(Lea(x)), Lea(y))
     Label(again)
     Cmp(Mem(Num(3)), Num(1))
     Jz(done)
     Mov(Mem(Num(2)), Lea(y))
     Mov(Mem(Num(3)), Num(1))
     Jmp(again)
     Label(done)",
  )
  .unwrap();
  assert_eq!(image, vec![1, 0, 1, 1]);
}

#[test]
fn word_type_controls_wraparound_and_sign() {
  let program = parse_assembly(
    "D(a, Num(255))
     Inc(Mem(Lea(a)))",
  )
  .unwrap();

  let mut machine: Machine<u8> = Machine::new(1);
  assert_eq!(machine.boot(&program).unwrap(), vec![0]);

  let mut machine: Machine<i16> = Machine::new(1);
  assert_eq!(machine.boot(&program).unwrap(), vec![256]);
}

#[test]
fn out_of_bounds_and_illegal_destination_are_reported() {
  assert_eq!(
    boot_i32(4, "Mov(Mem(Num(9)), Num(1))").unwrap_err(),
    MachineError::OutOfBoundsAccess { address: 9, size: 4 }
  );

  assert!(matches!(
    boot_i32(4, "Mov(Num(0), Num(1))").unwrap_err(),
    MachineError::IllegalLvalue(_)
  ));

  // The typed API rejects the same shapes without going through text.
  assert!(matches!(
    Program::new(vec![Instruction::Not(Operand::Num(1))]),
    Err(MachineError::IllegalLvalue(_))
  ));
}

#[test]
fn undeclared_variable_reference_fails() {
  assert_eq!(
    boot_i32(4, "Inc(Mem(Lea(ghost)))").unwrap_err(),
    MachineError::UnknownIdentifier(Ident::new("ghost").unwrap())
  );
}

#[test]
fn malformed_source_fails_before_execution() {
  // None of these may produce a program, let alone a memory image.
  assert!(matches!(
    boot_i32(4, "Frobni(Num(1))"),
    Err(MachineError::MalformedProgram(_))
  ));
  assert!(matches!(
    boot_i32(4, "Label(%)"),
    Err(MachineError::MalformedProgram(_)) | Err(MachineError::InvalidIdentifier(_))
  ));
  assert!(matches!(
    boot_i32(4, "D(a, Mem(Num(0)))"),
    Err(MachineError::MalformedProgram(_))
  ));
}
