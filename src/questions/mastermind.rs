//! Mastermind code-breaking: guess a secret of distinct digits.
//!
//! Each guess is scored per position:
//!   1 = right digit, right place
//!   2 = digit is in the secret, but elsewhere
//!   3 = digit is not (or no longer) available in the secret

use std::fmt;

use crate::config::MastermindConfig;
use crate::domain::Verdict;
use crate::random::Dice;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Peg {
  Exact,
  Misplaced,
  Absent,
}

impl Peg {
  pub fn code(self) -> u8 {
    match self {
      Peg::Exact => 1,
      Peg::Misplaced => 2,
      Peg::Absent => 3,
    }
  }
}

/// Feedback string for a guess, e.g. `"132"`.
pub fn pegs_to_string(pegs: &[Peg]) -> String {
  pegs.iter().map(|p| char::from(b'0' + p.code())).collect()
}

/// Score `guess` against `secret`.
///
/// Pass one marks exact hits and consumes those secret slots. Pass two walks the
/// remaining guess positions and consumes the first unused secret slot holding the
/// same digit. Non-digit characters and missing positions never match.
pub fn score_guess(secret: &[u8], guess: &str) -> Vec<Peg> {
  let digits: Vec<Option<u8>> = {
    let mut chars = guess.chars();
    (0..secret.len())
      .map(|_| chars.next().and_then(|c| c.to_digit(10)).map(|d| d as u8))
      .collect()
  };

  let mut consumed = vec![false; secret.len()];
  let mut pegs = vec![Peg::Absent; secret.len()];

  for (i, d) in digits.iter().enumerate() {
    if *d == Some(secret[i]) {
      pegs[i] = Peg::Exact;
      consumed[i] = true;
    }
  }

  for (i, d) in digits.iter().enumerate() {
    if pegs[i] == Peg::Exact {
      continue;
    }
    let Some(d) = d else { continue };
    if let Some(j) = (0..secret.len()).find(|&j| !consumed[j] && secret[j] == *d) {
      pegs[i] = Peg::Misplaced;
      consumed[j] = true;
    }
  }

  pegs
}

#[derive(Clone, Debug)]
pub struct MastermindQuestion {
  secret: Vec<u8>,
  max_digit: u8,
}

impl MastermindQuestion {
  /// Draw each position until it differs from the ones before it.
  pub fn generate(cfg: &MastermindConfig, dice: &mut dyn Dice) -> Self {
    let mut secret: Vec<u8> = Vec::with_capacity(cfg.digits);
    while secret.len() < cfg.digits {
      let d = dice.uniform_int(0, i64::from(cfg.max_digit)) as u8;
      if !secret.contains(&d) {
        secret.push(d);
      }
    }
    Self::with_secret(secret, cfg.max_digit)
  }

  pub fn with_secret(secret: Vec<u8>, max_digit: u8) -> Self {
    Self { secret, max_digit }
  }

  pub fn digits(&self) -> usize {
    self.secret.len()
  }

  pub fn solution(&self) -> String {
    self.to_string()
  }

  pub fn prompt_text(&self, reveal: bool) -> String {
    let txt = format!("Mastermind. Type a number of {} digits: ", self.digits());
    if reveal { format!("{txt} ==> ({self})") } else { txt }
  }

  /// CPU guess: independent digits, repeats allowed.
  pub fn cpu_guess(&self, dice: &mut dyn Dice) -> String {
    (0..self.digits())
      .map(|_| char::from(b'0' + dice.uniform_int(0, i64::from(self.max_digit)) as u8))
      .collect()
  }

  pub fn evaluate(&self, guess: &str) -> Verdict {
    let pegs = score_guess(&self.secret, guess);
    if pegs.iter().all(|p| *p == Peg::Exact) {
      Verdict::hit("Correct!!!!!")
    } else {
      Verdict::miss(format!("Wrong. Your positions are: {}", pegs_to_string(&pegs)))
    }
  }
}

impl fmt::Display for MastermindQuestion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.secret.iter().try_for_each(|d| write!(f, "{d}"))
  }
}
