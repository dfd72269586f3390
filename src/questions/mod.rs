//! The four question kinds and their common contract.
//!
//! `Question` is a closed set: every variant produces prompt text, exposes its
//! solution, and turns an answer into a `Verdict` without ever failing.

use std::fmt;
use std::time::Instant;

use serde::Serialize;

use crate::domain::Verdict;
use crate::random::Dice;

pub mod geography;
pub mod mastermind;
pub mod math;
pub mod timer;

pub use geography::GeographyQuestion;
pub use mastermind::MastermindQuestion;
pub use math::MathQuestion;
pub use timer::TimerQuestion;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  Math,
  Mastermind,
  Geography,
  Timer,
}

impl QuestionKind {
  pub const ALL: [QuestionKind; 4] =
    [QuestionKind::Math, QuestionKind::Mastermind, QuestionKind::Geography, QuestionKind::Timer];

  /// Uniform draw from {1, 2, 3, 4}.
  pub fn roll(dice: &mut dyn Dice) -> Self {
    Self::ALL[(dice.uniform_int(1, 4) - 1) as usize]
  }
}

impl fmt::Display for QuestionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      QuestionKind::Math => "Math",
      QuestionKind::Mastermind => "Mastermind",
      QuestionKind::Geography => "Geography",
      QuestionKind::Timer => "Timer",
    })
  }
}

/// What a player hands back.
#[derive(Clone, Debug)]
pub enum Answer {
  Number(i64),
  Code(String),
  Letter(char),
  /// Stop event of a Timer question.
  Stop(Instant),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution {
  Number(i64),
  Code(String),
  Letter(char),
  /// Timer questions keep no solution.
  Nothing,
}

impl fmt::Display for Solution {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Solution::Number(n) => write!(f, "{n}"),
      Solution::Code(c) => f.write_str(c),
      Solution::Letter(l) => write!(f, "{l}"),
      Solution::Nothing => Ok(()),
    }
  }
}

#[derive(Clone, Debug)]
pub enum Question {
  Math(MathQuestion),
  Mastermind(MastermindQuestion),
  Geography(GeographyQuestion),
  Timer(TimerQuestion),
}

impl Question {
  pub fn kind(&self) -> QuestionKind {
    match self {
      Question::Math(_) => QuestionKind::Math,
      Question::Mastermind(_) => QuestionKind::Mastermind,
      Question::Geography(_) => QuestionKind::Geography,
      Question::Timer(_) => QuestionKind::Timer,
    }
  }

  pub fn prompt_text(&self, reveal: bool) -> String {
    match self {
      Question::Math(q) => q.prompt_text(reveal),
      Question::Mastermind(q) => q.prompt_text(reveal),
      Question::Geography(q) => q.prompt_text(reveal),
      Question::Timer(q) => q.prompt_text(reveal),
    }
  }

  pub fn solution(&self) -> Solution {
    match self {
      Question::Math(q) => Solution::Number(q.solution()),
      Question::Mastermind(q) => Solution::Code(q.solution()),
      Question::Geography(q) => Solution::Letter(q.solution()),
      Question::Timer(_) => Solution::Nothing,
    }
  }

  /// An answer of the wrong shape is simply wrong.
  pub fn evaluate(&self, answer: &Answer) -> Verdict {
    match (self, answer) {
      (Question::Math(q), Answer::Number(n)) => q.evaluate(*n),
      (Question::Mastermind(q), Answer::Code(c)) => q.evaluate(c),
      (Question::Geography(q), Answer::Letter(l)) => q.evaluate(*l),
      (Question::Timer(q), Answer::Stop(at)) => q.evaluate_at(*at),
      (q, a) => Verdict::miss(format!("Wrong. {a:?} does not answer a {} question.", q.kind())),
    }
  }
}
