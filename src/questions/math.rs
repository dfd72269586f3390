//! Arithmetic questions: a random chain of `+`, `-` and `*` over small integers.
//!
//! The solution follows standard precedence (products first, then sums left to
//! right), which is how a player reads the printed expression. Division is never
//! generated, so the solution is always an exact integer.

use std::fmt;

use crate::config::MathConfig;
use crate::domain::Verdict;
use crate::random::Dice;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
  Add,
  Sub,
  Mul,
}

impl Op {
  const ALL: [Op; 3] = [Op::Add, Op::Sub, Op::Mul];

  fn symbol(self) -> char {
    match self {
      Op::Add => '+',
      Op::Sub => '-',
      Op::Mul => '*',
    }
  }
}

#[derive(Clone, Debug)]
pub struct MathQuestion {
  operands: Vec<i64>,
  ops: Vec<Op>,
  solution: i64,
}

impl MathQuestion {
  pub fn generate(cfg: &MathConfig, dice: &mut dyn Dice) -> Self {
    let count = dice.uniform_int(i64::from(cfg.min_operands), i64::from(cfg.max_operands)) as usize;
    let mut operands = Vec::with_capacity(count);
    let mut ops = Vec::with_capacity(count.saturating_sub(1));
    for i in 0..count {
      operands.push(dice.uniform_int(cfg.min_operand, cfg.max_operand));
      if i + 1 < count {
        ops.push(Op::ALL[dice.index(Op::ALL.len())]);
      }
    }
    Self::from_parts(operands, ops)
  }

  /// Build from explicit parts. `ops` must be one shorter than `operands`.
  pub fn from_parts(operands: Vec<i64>, ops: Vec<Op>) -> Self {
    debug_assert_eq!(ops.len() + 1, operands.len());
    let solution = evaluate(&operands, &ops);
    Self { operands, ops, solution }
  }

  pub fn solution(&self) -> i64 {
    self.solution
  }

  pub fn expression(&self) -> String {
    self.to_string()
  }

  pub fn prompt_text(&self, reveal: bool) -> String {
    let txt = format!("Solve the following operation:\n{}", self.expression());
    if reveal { format!("{txt} ==> ({})", self.solution) } else { txt }
  }

  pub fn evaluate(&self, answer: i64) -> Verdict {
    if answer == self.solution {
      Verdict::hit("Correct!!!!!")
    } else {
      Verdict::miss(format!("Wrong. The result is: {}", self.solution))
    }
  }
}

impl fmt::Display for MathQuestion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, n) in self.operands.iter().enumerate() {
      if i > 0 {
        write!(f, " {} ", self.ops[i - 1].symbol())?;
      }
      write!(f, "{n}")?;
    }
    Ok(())
  }
}

/// Sum of products: every `*` binds its neighbours into one term, and the terms
/// are then added or subtracted left to right.
fn evaluate(operands: &[i64], ops: &[Op]) -> i64 {
  let Some((&first, rest)) = operands.split_first() else {
    return 0;
  };
  let mut total = 0;
  let mut sign = 1;
  let mut term = first;
  for (op, &n) in ops.iter().zip(rest) {
    match op {
      Op::Mul => term *= n,
      Op::Add | Op::Sub => {
        total += sign * term;
        sign = if *op == Op::Add { 1 } else { -1 };
        term = n;
      }
    }
  }
  total + sign * term
}
