/*!

  The human-readable textual form of a program is called assembly. One instruction
  per line, written the way instructions display: mnemonic, parenthesized
  arguments, nested operand expressions. `#` starts a comment; blank lines are
  ignored.

  ```text
  # count a down to zero
  D(a, Num(3))
  Label(loop)
  Dec(Mem(Lea(a)))
  Cmp(Mem(Lea(a)), Num(0))
  Jz(end)
  Jmp(loop)
  Label(end)
  ```

  Mnemonics are resolved through the `strum` derives on `Opcode`, and arity and
  argument-shape mismatches are reported per line, so "not an instruction" and
  "wrong number of arguments" surface as `MalformedProgram` before anything runs.

*/

use std::str::FromStr;

use nom::{
  branch::alt,
  bytes::complete::tag,
  character::complete::{
    alpha1,
    alphanumeric1,
    char as one_char,
    digit1,
    space0
  },
  combinator::{all_consuming, map, map_res, opt, recognize},
  multi::separated_list,
  sequence::{delimited, pair, preceded},
  IResult,
};

use crate::error::MachineError;
use crate::ident::Ident;
use crate::instruction::{Instruction, Opcode};
use crate::operand::Operand;
use crate::program::Program;

/// Operand syntax with identifier spellings still unvalidated. Validation happens
/// after parsing so that a bad name reports `InvalidIdentifier` rather than a
/// generic syntax error.
#[derive(Debug)]
enum RawOperand<'a> {
  Num(i64),
  Lea(&'a str),
  Mem(Box<RawOperand<'a>>),
}

/// A single parsed argument: either an operand expression or a bare name (the
/// identifier argument of `D`, `Label`, and the jumps).
#[derive(Debug)]
enum RawArgument<'a> {
  Operand(RawOperand<'a>),
  Name(&'a str),
}

// region nom parsers

/// The inner parser wrapped in parentheses, spaces allowed on both sides.
fn parenthesized<'a, O>(
  inner: impl Fn(&'a str) -> IResult<&'a str, O>,
) -> impl Fn(&'a str) -> IResult<&'a str, O> {
  delimited(
    preceded(space0, one_char('(')),
    delimited(space0, inner, space0),
    one_char(')'),
  )
}

fn integer(input: &str) -> IResult<&str, i64> {
  map_res(
    recognize(pair(opt(one_char('-')), digit1)),
    |text: &str| text.parse::<i64>(),
  )(input)
}

fn num_operand(input: &str) -> IResult<&str, RawOperand> {
  map(preceded(tag("Num"), parenthesized(integer)), RawOperand::Num)(input)
}

fn lea_operand(input: &str) -> IResult<&str, RawOperand> {
  map(preceded(tag("Lea"), parenthesized(alphanumeric1)), RawOperand::Lea)(input)
}

fn mem_operand(input: &str) -> IResult<&str, RawOperand> {
  map(preceded(tag("Mem"), parenthesized(raw_operand)), |address| {
    RawOperand::Mem(Box::new(address))
  })(input)
}

fn raw_operand(input: &str) -> IResult<&str, RawOperand> {
  alt((num_operand, lea_operand, mem_operand))(input)
}

fn raw_argument(input: &str) -> IResult<&str, RawArgument> {
  // Operand expressions first: a bare `Num` not followed by `(` backtracks
  // here and parses as a name, since `Num` is itself a valid identifier.
  alt((
    map(raw_operand, RawArgument::Operand),
    map(alphanumeric1, RawArgument::Name),
  ))(input)
}

/// `Mnemonic(arg, arg, ...)` with optional spaces throughout the line.
fn instruction_line(input: &str) -> IResult<&str, (&str, Vec<RawArgument>)> {
  delimited(
    space0,
    pair(
      alpha1,
      parenthesized(separated_list(
        delimited(space0, one_char(','), space0),
        raw_argument,
      )),
    ),
    space0,
  )(input)
}

// endregion

// region Assembling parsed lines

fn build_operand(raw: RawOperand) -> Result<Operand, MachineError> {
  match raw {
    RawOperand::Num(value)   => Ok(Operand::Num(value)),
    RawOperand::Lea(name)    => Ok(Operand::Lea(Ident::new(name)?)),
    RawOperand::Mem(address) => Ok(Operand::mem(build_operand(*address)?)),
  }
}

fn expect_operand(argument: RawArgument, line: usize) -> Result<Operand, MachineError> {
  match argument {
    RawArgument::Operand(raw) => build_operand(raw),
    RawArgument::Name(name)   => Err(MachineError::MalformedProgram(format!(
      "line {}: expected an operand (Num/Lea/Mem) but got the bare name `{}`",
      line, name
    ))),
  }
}

fn expect_name(argument: RawArgument, line: usize) -> Result<Ident, MachineError> {
  match argument {
    RawArgument::Name(name)  => Ident::new(name),
    RawArgument::Operand(op) => Err(MachineError::MalformedProgram(format!(
      "line {}: expected an identifier but got the operand expression `{:?}`",
      line, op
    ))),
  }
}

fn build_instruction(
  mnemonic: &str,
  arguments: Vec<RawArgument>,
  line: usize,
) -> Result<Instruction, MachineError> {
  let opcode = Opcode::from_str(mnemonic).map_err(|_| {
    MachineError::MalformedProgram(format!(
      "line {}: `{}` is not an instruction",
      line, mnemonic
    ))
  })?;

  if arguments.len() != opcode.arity() {
    return Err(MachineError::MalformedProgram(format!(
      "line {}: {} requires {} argument(s) but was given {}",
      line,
      opcode,
      opcode.arity(),
      arguments.len()
    )));
  }

  let mut arguments = arguments.into_iter();
  // `arity` was just checked, so the `next().unwrap()` calls below cannot fail.
  let mut next = || arguments.next().unwrap();

  let instruction = match opcode {

    Opcode::D => {
      let id    = expect_name(next(), line)?;
      let value = expect_operand(next(), line)?;
      Instruction::D { id, value }
    }

    Opcode::Label => Instruction::Label(expect_name(next(), line)?),
    Opcode::Jmp   => Instruction::Jmp(expect_name(next(), line)?),
    Opcode::Jz    => Instruction::Jz(expect_name(next(), line)?),
    Opcode::Js    => Instruction::Js(expect_name(next(), line)?),

    Opcode::Mov => {
      let dst = expect_operand(next(), line)?;
      let src = expect_operand(next(), line)?;
      Instruction::Mov { dst, src }
    }

    Opcode::Add => {
      let dst = expect_operand(next(), line)?;
      let src = expect_operand(next(), line)?;
      Instruction::Add { dst, src }
    }

    Opcode::Sub => {
      let dst = expect_operand(next(), line)?;
      let src = expect_operand(next(), line)?;
      Instruction::Sub { dst, src }
    }

    Opcode::And => {
      let dst = expect_operand(next(), line)?;
      let src = expect_operand(next(), line)?;
      Instruction::And { dst, src }
    }

    Opcode::Or => {
      let dst = expect_operand(next(), line)?;
      let src = expect_operand(next(), line)?;
      Instruction::Or { dst, src }
    }

    Opcode::Cmp => {
      let lhs = expect_operand(next(), line)?;
      let rhs = expect_operand(next(), line)?;
      Instruction::Cmp { lhs, rhs }
    }

    Opcode::Inc => Instruction::Inc(expect_operand(next(), line)?),
    Opcode::Dec => Instruction::Dec(expect_operand(next(), line)?),
    Opcode::Not => Instruction::Not(expect_operand(next(), line)?),

  };

  Ok(instruction)
}

// endregion

/**
  Parses assembly text into a validated `Program`. Fails with `MalformedProgram`
  on unparseable lines, unknown mnemonics, or arity/argument-shape mismatches
  (each reported with its line number), with `InvalidIdentifier` on a bad name,
  and with whatever `Program::new` rejects (e.g. an `IllegalLvalue` destination).
*/
pub fn parse_assembly(text: &str) -> Result<Program, MachineError> {
  let mut instructions = vec![];

  for (index, raw_line) in text.lines().enumerate() {
    let line_number = index + 1;

    // Strip a trailing comment, then skip blank lines.
    let line = match raw_line.find('#') {
      Some(position) => &raw_line[..position],
      None           => raw_line,
    };
    if line.trim().is_empty() {
      continue;
    }

    let (mnemonic, arguments) = match all_consuming(instruction_line)(line) {
      Ok((_rest, parsed)) => parsed,
      Err(_e) => {
        return Err(MachineError::MalformedProgram(format!(
          "line {}: unrecognized syntax: `{}`",
          line_number,
          line.trim()
        )));
      }
    };

    instructions.push(build_instruction(mnemonic, arguments, line_number)?);
  }

  Program::new(instructions)
}
