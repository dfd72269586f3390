//! City dataset used by Geography questions.
//!
//! The CSV file has one header line, then `name,latitude,longitude` per line
//! (degrees, decimal). Blank lines are skipped.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::GameError;

#[derive(Clone, Debug, PartialEq)]
pub struct City {
  pub name: String,
  pub latitude: f64,
  pub longitude: f64,
}

impl City {
  pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
    Self { name: name.into(), latitude, longitude }
  }
}

pub trait CitySource {
  fn load(&self) -> Result<Vec<City>, GameError>;
}

pub struct CsvCities {
  path: PathBuf,
}

impl CsvCities {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self { path: path.as_ref().to_path_buf() }
  }

  fn unavailable(&self, reason: impl Into<String>) -> GameError {
    GameError::DatasetUnavailable { path: self.path.display().to_string(), reason: reason.into() }
  }
}

impl CitySource for CsvCities {
  #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
  fn load(&self) -> Result<Vec<City>, GameError> {
    let text = std::fs::read_to_string(&self.path).map_err(|e| self.unavailable(e.to_string()))?;
    let cities = parse_cities(&text).map_err(|reason| self.unavailable(reason))?;
    debug!(target: "party_quiz", count = cities.len(), "Loaded city dataset");
    Ok(cities)
  }
}

/// Parse the CSV body (header included). Errors name the offending line.
pub fn parse_cities(text: &str) -> Result<Vec<City>, String> {
  let mut out = Vec::new();
  for (n, line) in text.lines().enumerate().skip(1) {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let [name, lat, lon] = parts.as_slice() else {
      return Err(format!("line {}: expected 3 fields, found {}", n + 1, parts.len()));
    };
    let latitude: f64 = lat.parse().map_err(|_| format!("line {}: bad latitude '{lat}'", n + 1))?;
    let longitude: f64 = lon.parse().map_err(|_| format!("line {}: bad longitude '{lon}'", n + 1))?;
    out.push(City::new(*name, latitude, longitude));
  }
  Ok(out)
}

/// Fixed in-memory dataset.
#[cfg(test)]
pub struct StaticCities(pub Vec<City>);

#[cfg(test)]
impl CitySource for StaticCities {
  fn load(&self) -> Result<Vec<City>, GameError> {
    Ok(self.0.clone())
  }
}
