//! Domain models shared by the engine: players, their kind, and evaluation verdicts.

use std::fmt;

use crate::util::pad_name;

/// Prefix reserved for CPU player names.
pub const CPU_PREFIX: &str = "CPU";

/// Who is behind a seat? Humans answer through the input channel, CPUs are simulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerKind {
  Human,
  Cpu,
}

impl PlayerKind {
  /// Kind implied by a stored name: the CPU prefix (any case) means a CPU player.
  pub fn from_name(name: &str) -> Self {
    if has_cpu_prefix(name) { PlayerKind::Cpu } else { PlayerKind::Human }
  }
}

pub fn has_cpu_prefix(name: &str) -> bool {
  name
    .get(..CPU_PREFIX.len())
    .is_some_and(|p| p.eq_ignore_ascii_case(CPU_PREFIX))
}

#[derive(Clone, Debug)]
pub struct Player {
  name: String,
  kind: PlayerKind,
  cumulative_score: u32,
  round_score: u32,
  match_score: u32,
}

impl Player {
  pub fn new(name: impl Into<String>, cumulative_score: u32, kind: PlayerKind) -> Self {
    Self { name: name.into(), kind, cumulative_score, round_score: 0, match_score: 0 }
  }

  pub fn name(&self) -> &str { &self.name }
  pub fn kind(&self) -> PlayerKind { self.kind }
  pub fn is_human(&self) -> bool { self.kind == PlayerKind::Human }
  pub fn cumulative_score(&self) -> u32 { self.cumulative_score }
  pub fn round_score(&self) -> u32 { self.round_score }
  pub fn match_score(&self) -> u32 { self.match_score }

  /// Points for a correct answer count towards the round, the match and the career.
  pub fn award(&mut self, points: u32) {
    self.cumulative_score += points;
    self.round_score += points;
    self.match_score += points;
  }

  pub fn reset_round(&mut self) { self.round_score = 0; }
  pub fn reset_match(&mut self) { self.match_score = 0; }

  pub fn same_name(&self, other: &str) -> bool {
    self.name.eq_ignore_ascii_case(other)
  }
}

/// Listing line used by the roster, the saved player list and the ranking input.
impl fmt::Display for Player {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}\t{}", pad_name(self.name()), self.cumulative_score())
  }
}

/// Outcome of evaluating one answer. Built once, never changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
  message: String,
  correct: bool,
}

impl Verdict {
  pub fn new(message: impl Into<String>, correct: bool) -> Self {
    Self { message: message.into(), correct }
  }

  pub fn hit(message: impl Into<String>) -> Self { Self::new(message, true) }
  pub fn miss(message: impl Into<String>) -> Self { Self::new(message, false) }

  pub fn message(&self) -> &str { &self.message }
  pub fn is_correct(&self) -> bool { self.correct }
}
