//! Flat-file persistence for the ranking, the match history and the saved roster.
//!
//! A missing file reads as empty; it is created on the first write.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::GameError;
use crate::ranking::{merge_and_rank, parse_listing, Ranking};

pub trait RankingStore {
  /// Fold a roster listing into the stored ranking; returns the new ranking text.
  fn merge(&mut self, listing: &str) -> Result<String, GameError>;
  fn remove(&mut self, name: &str) -> Result<(), GameError>;
  fn read(&self) -> Result<String, GameError>;
}

pub trait HistoryStore {
  fn append(&mut self, match_id: Uuid, listing: &str) -> Result<(), GameError>;
  fn read(&self) -> Result<String, GameError>;
}

pub trait PlayerStore {
  fn load(&self) -> Result<Vec<(String, u32)>, GameError>;
  fn save(&mut self, listing: &str) -> Result<(), GameError>;
}

fn read_or_empty(path: &Path) -> Result<String, GameError> {
  match fs::read_to_string(path) {
    Ok(s) => Ok(s),
    Err(e) if e.kind() == ErrorKind::NotFound => {
      debug!(target: "party_quiz", path = %path.display(), "File not found; reading as empty");
      Ok(String::new())
    }
    Err(e) => Err(GameError::storage(path, e)),
  }
}

fn write_all(path: &Path, text: &str) -> Result<(), GameError> {
  if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
    fs::create_dir_all(dir).map_err(|e| GameError::storage(dir, e))?;
  }
  fs::write(path, text).map_err(|e| GameError::storage(path, e))
}

pub struct FileRankingStore {
  path: PathBuf,
  size: usize,
}

impl FileRankingStore {
  pub fn new(path: impl Into<PathBuf>, size: usize) -> Self {
    Self { path: path.into(), size }
  }
}

impl RankingStore for FileRankingStore {
  #[instrument(level = "debug", skip(self, listing), fields(path = %self.path.display()))]
  fn merge(&mut self, listing: &str) -> Result<String, GameError> {
    let prior = read_or_empty(&self.path)?;
    let ranked = merge_and_rank(listing, &prior, self.size);
    write_all(&self.path, &ranked)?;
    info!(target: "party_quiz", entries = ranked.lines().count(), "Ranking updated");
    Ok(ranked)
  }

  #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
  fn remove(&mut self, name: &str) -> Result<(), GameError> {
    let mut ranking = Ranking::parse(&read_or_empty(&self.path)?);
    ranking.remove(name);
    write_all(&self.path, &ranking.render(self.size))
  }

  fn read(&self) -> Result<String, GameError> {
    read_or_empty(&self.path)
  }
}

pub struct FileHistoryStore {
  path: PathBuf,
}

impl FileHistoryStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }
}

impl HistoryStore for FileHistoryStore {
  #[instrument(level = "debug", skip(self, listing), fields(path = %self.path.display(), %match_id))]
  fn append(&mut self, match_id: Uuid, listing: &str) -> Result<(), GameError> {
    if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
      fs::create_dir_all(dir).map_err(|e| GameError::storage(dir, e))?;
    }
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)
      .map_err(|e| GameError::storage(&self.path, e))?;
    let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "Match record {stamp} [{match_id}]:\n{listing}").map_err(|e| GameError::storage(&self.path, e))
  }

  fn read(&self) -> Result<String, GameError> {
    read_or_empty(&self.path)
  }
}

pub struct FilePlayerStore {
  path: PathBuf,
}

impl FilePlayerStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }
}

impl PlayerStore for FilePlayerStore {
  fn load(&self) -> Result<Vec<(String, u32)>, GameError> {
    Ok(parse_listing(&read_or_empty(&self.path)?))
  }

  fn save(&mut self, listing: &str) -> Result<(), GameError> {
    write_all(&self.path, listing)
  }
}
