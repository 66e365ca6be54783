use tavm::{parse_assembly, Machine};

fn main() {
  #[cfg(feature = "trace_computation")]
  println!("Computation Tracing ENABLED");

  let text = "# Sum the numbers 1..=5 into `sum`, counting `n` down to zero.
D(sum, Num(0))
D(n, Num(5))

Label(loop)
  Cmp(Mem(Lea(n)), Num(0))
  Jz(end)
  Add(Mem(Lea(sum)), Mem(Lea(n)))
  Sub(Mem(Lea(n)), Num(1))
  Jmp(loop)
Label(end)
";

  let program = match parse_assembly(text) {
    Ok(program) => program,
    Err(e) => {
      eprintln!("{}", e);
      return;
    }
  };

  println!("# Program");
  for (index, instruction) in program.instructions().iter().enumerate() {
    match program.labels().label_at(index) {
      Some(label) => println!("{:>3}  {:<28} ; jump target `{}`", index, instruction.to_string(), label),
      None        => println!("{:>3}  {}", index, instruction),
    }
  }
  println!();

  let mut machine: Machine<i32> = Machine::new(8);
  match machine.boot(&program) {

    Ok(memory) => {
      println!("# Final memory image\n{:?}\n", memory);
      println!("# Final machine state\n{}", machine);
    }

    Err(e) => {
      eprintln!("Execution failed: {}", e);
    }

  }
}
