//! Randomness source for the engine.
//!
//! Every draw is an inclusive integer range, which is all the question generators,
//! the seat assignment and the CPU players need.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait Dice {
  /// Uniform integer in `min..=max`. Callers guarantee `min <= max`.
  fn uniform_int(&mut self, min: i64, max: i64) -> i64;

  /// Uniform index in `0..len`. Callers guarantee `len > 0`.
  fn index(&mut self, len: usize) -> usize {
    self.uniform_int(0, len as i64 - 1) as usize
  }
}

/// `Dice` over any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngDice<R> {
  rng: R,
}

impl<R: Rng> RngDice<R> {
  pub fn new(rng: R) -> Self {
    Self { rng }
  }
}

impl RngDice<StdRng> {
  pub fn from_entropy() -> Self {
    Self::new(StdRng::from_entropy())
  }

  /// Same seed, same sequence.
  pub fn seeded(seed: u64) -> Self {
    Self::new(StdRng::seed_from_u64(seed))
  }
}

impl<R: Rng> Dice for RngDice<R> {
  fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
    self.rng.gen_range(min..=max)
  }
}

/// Replays a fixed list of draws, then falls back to a seeded generator.
/// Scripted values must lie inside the requested range.
#[cfg(test)]
pub struct ScriptedDice {
  script: std::collections::VecDeque<i64>,
  fallback: RngDice<StdRng>,
}

#[cfg(test)]
impl ScriptedDice {
  pub fn new(script: impl IntoIterator<Item = i64>) -> Self {
    Self { script: script.into_iter().collect(), fallback: RngDice::seeded(7) }
  }
}

#[cfg(test)]
impl Dice for ScriptedDice {
  fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
    match self.script.pop_front() {
      Some(v) => {
        assert!((min..=max).contains(&v), "scripted draw {v} outside {min}..={max}");
        v
      }
      None => self.fallback.uniform_int(min, max),
    }
  }
}
