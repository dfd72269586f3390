//! Error taxonomy for roster management, match setup and the file-backed stores.
//!
//! Question evaluation never fails (a bad answer is just a failing `Verdict`), so
//! nothing in here describes an answer being wrong.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
  /// Another seated player already uses this name (case-insensitive).
  #[error("The name {0} is already registered")]
  DuplicateName(String),

  /// Human players may not take the prefix reserved for CPU players.
  #[error("The name {0} cannot start with 'CPU'")]
  ReservedNamePrefix(String),

  /// CPU players are recognised by their prefix when the player list is restored.
  #[error("The name {0} of a CPU player must start with 'CPU'")]
  MissingCpuPrefix(String),

  #[error("No free seat left in a roster of {0}")]
  RosterFull(usize),

  #[error("A match needs at least {needed} seated players, found {found}")]
  NotEnoughPlayers { needed: usize, found: usize },

  /// City source missing, unreadable or too small to build a question.
  #[error("City dataset unavailable at {path}: {reason}")]
  DatasetUnavailable { path: String, reason: String },

  /// The input channel reached end of stream while a value was required.
  #[error("Input closed while waiting for an answer")]
  InputClosed,

  #[error("Storage error on {}: {source}", path.display())]
  Storage {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Configuration error: {0}")]
  Config(String),
}

impl GameError {
  pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    GameError::Storage { path: path.into(), source }
  }

  /// Recoverable errors are reported to the user, who is asked again.
  pub fn is_recoverable(&self) -> bool {
    matches!(
      self,
      GameError::DuplicateName(_)
        | GameError::ReservedNamePrefix(_)
        | GameError::MissingCpuPrefix(_)
        | GameError::RosterFull(_)
    )
  }
}
