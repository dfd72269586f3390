//! Game configuration loaded from TOML.
//!
//! The file path comes from `GAME_CONFIG_PATH`. Every field has a default, so a
//! partial file (or none at all) is fine. See `config/game.toml` for the schema.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::GameError;

/// Longest player name kept for display, ranking and the saved player list.
pub const NAME_MAX_LEN: usize = 9;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
  /// Appends the solution to every prompt.
  pub debug: bool,
  /// Fixed RNG seed for reproducible games; entropy when absent.
  pub seed: Option<u64>,
  pub ranking_size: usize,
  pub points_per_answer: u32,
  pub min_players: usize,
  pub max_players: usize,
  pub min_rounds: u32,
  pub max_rounds: u32,
  pub math: MathConfig,
  pub mastermind: MastermindConfig,
  pub timer: TimerConfig,
  pub paths: PathsConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MathConfig {
  pub min_operands: u32,
  pub max_operands: u32,
  pub min_operand: i64,
  pub max_operand: i64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MastermindConfig {
  pub digits: usize,
  pub max_digit: u8,
  pub attempts: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
  pub min_seconds: u32,
  pub max_seconds: u32,
  pub tolerance_seconds: f64,
  pub cpu_think_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
  pub cities: PathBuf,
  pub ranking: PathBuf,
  pub history: PathBuf,
  pub players: PathBuf,
  /// Directory of the daily game log (`game.YYYY-MM-DD.log`).
  pub logs: PathBuf,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      debug: false,
      seed: None,
      ranking_size: 10,
      points_per_answer: 1,
      min_players: 2,
      max_players: 4,
      min_rounds: 1,
      max_rounds: 10,
      math: MathConfig::default(),
      mastermind: MastermindConfig::default(),
      timer: TimerConfig::default(),
      paths: PathsConfig::default(),
    }
  }
}

impl Default for MathConfig {
  fn default() -> Self {
    Self { min_operands: 4, max_operands: 8, min_operand: 2, max_operand: 12 }
  }
}

impl Default for MastermindConfig {
  fn default() -> Self {
    Self { digits: 3, max_digit: 9, attempts: 3 }
  }
}

impl Default for TimerConfig {
  fn default() -> Self {
    Self { min_seconds: 1, max_seconds: 5, tolerance_seconds: 0.5, cpu_think_ms: 3000 }
  }
}

impl Default for PathsConfig {
  fn default() -> Self {
    Self {
      cities: "data/cities.csv".into(),
      ranking: "data/ranking.txt".into(),
      history: "data/history.txt".into(),
      players: "data/players.txt".into(),
      logs: "data/logs".into(),
    }
  }
}

impl GameConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, GameError> {
    toml::from_str::<GameConfig>(s)
      .map(GameConfig::sanitized)
      .map_err(|e| GameError::Config(e.to_string()))
  }

  /// Load from GAME_CONFIG_PATH. On any read/parse error the defaults are used.
  pub fn load_from_env() -> Self {
    let Ok(path) = std::env::var("GAME_CONFIG_PATH") else {
      info!(target: "party_quiz", "GAME_CONFIG_PATH not set; using default configuration");
      return GameConfig::default();
    };
    match std::fs::read_to_string(&path) {
      Ok(s) => match GameConfig::from_toml_str(&s) {
        Ok(cfg) => {
          info!(target: "party_quiz", %path, debug = cfg.debug, ranking_size = cfg.ranking_size, "Loaded game config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "party_quiz", %path, error = %e, "Failed to parse TOML config; using defaults");
          GameConfig::default()
        }
      },
      Err(e) => {
        error!(target: "party_quiz", %path, error = %e, "Failed to read TOML config file; using defaults");
        GameConfig::default()
      }
    }
  }

  /// Repair values that would make question generation loop forever or overflow.
  /// Each repair falls back to the default for that section and logs a warning.
  pub fn sanitized(mut self) -> Self {
    let defaults = GameConfig::default();

    if self.ranking_size == 0 {
      warn!(target: "party_quiz", "ranking_size must be positive; using {}", defaults.ranking_size);
      self.ranking_size = defaults.ranking_size;
    }
    if self.min_players < 2 || self.min_players > self.max_players {
      warn!(target: "party_quiz", min = self.min_players, max = self.max_players, "Invalid player bounds; using defaults");
      self.min_players = defaults.min_players;
      self.max_players = defaults.max_players;
    }
    if self.min_rounds == 0 || self.min_rounds > self.max_rounds {
      warn!(target: "party_quiz", min = self.min_rounds, max = self.max_rounds, "Invalid round bounds; using defaults");
      self.min_rounds = defaults.min_rounds;
      self.max_rounds = defaults.max_rounds;
    }

    let m = &self.math;
    let magnitude = m.min_operand.unsigned_abs().max(m.max_operand.unsigned_abs());
    let fits = u32::try_from(m.max_operands)
      .ok()
      .and_then(|n| magnitude.checked_pow(n))
      .and_then(|v| v.checked_mul(u64::from(m.max_operands)))
      .is_some_and(|v| v <= i64::MAX as u64);
    if m.min_operands < 2 || m.min_operands > m.max_operands || m.min_operand > m.max_operand || !fits {
      warn!(target: "party_quiz", ?m, "Invalid math question bounds; using defaults");
      self.math = defaults.math.clone();
    }

    let mm = &self.mastermind;
    if mm.digits == 0 || mm.digits > usize::from(mm.max_digit) + 1 || mm.max_digit > 9 || mm.attempts == 0 {
      warn!(target: "party_quiz", ?mm, "Invalid mastermind settings; using defaults");
      self.mastermind = defaults.mastermind.clone();
    }

    let t = &self.timer;
    if t.min_seconds > t.max_seconds || !(t.tolerance_seconds >= 0.0) {
      warn!(target: "party_quiz", ?t, "Invalid timer settings; using defaults");
      self.timer = defaults.timer.clone();
    }

    self
  }
}
