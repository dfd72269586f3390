//! Geography: which of four cities is closest to a reference city?

use std::fmt::Write as _;

use crate::cities::City;
use crate::domain::Verdict;
use crate::random::Dice;
use crate::util::{option_index, option_letter};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const OPTION_COUNT: usize = 4;

/// Great-circle distance in km between two (lat, lon) points given in degrees.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
  let d_lat = (lat2 - lat1).to_radians();
  let d_lon = (lon2 - lon1).to_radians();
  let a = (d_lat / 2.0).sin().powi(2) + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
  2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub fn distance_km(a: &City, b: &City) -> f64 {
  haversine(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Index of the first minimum; later equal distances do not replace it.
pub fn nearest_index(distances: &[f64]) -> Option<usize> {
  distances
    .iter()
    .enumerate()
    .fold(None, |best: Option<(usize, f64)>, (i, &d)| match best {
      Some((_, b)) if d >= b => best,
      _ => Some((i, d)),
    })
    .map(|(i, _)| i)
}

#[derive(Clone, Debug)]
pub struct GeographyQuestion {
  reference: City,
  options: Vec<City>,
  distances: Vec<f64>,
  solution: usize,
}

impl GeographyQuestion {
  /// Sample a reference city and four distinct options (distinct by name).
  /// Returns `None` when the dataset has fewer than five distinct names.
  pub fn generate(cities: &[City], dice: &mut dyn Dice) -> Option<Self> {
    let mut names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    if names.len() < OPTION_COUNT + 1 {
      return None;
    }

    let reference = cities[dice.index(cities.len())].clone();
    let mut options: Vec<City> = Vec::with_capacity(OPTION_COUNT);
    while options.len() < OPTION_COUNT {
      let pick = &cities[dice.index(cities.len())];
      if pick.name != reference.name && !options.iter().any(|o| o.name == pick.name) {
        options.push(pick.clone());
      }
    }
    Some(Self::from_cities(reference, options))
  }

  pub fn from_cities(reference: City, options: Vec<City>) -> Self {
    let distances: Vec<f64> = options.iter().map(|o| distance_km(&reference, o)).collect();
    let solution = nearest_index(&distances).unwrap_or(0);
    Self { reference, options, distances, solution }
  }

  pub fn solution(&self) -> char {
    option_letter(self.solution)
  }

  pub fn prompt_text(&self, reveal: bool) -> String {
    let mut txt = format!("Pick the city closest to {}", self.reference.name);
    if reveal {
      let _ = write!(txt, " ==> ({})", self.solution());
    }
    for (i, o) in self.options.iter().enumerate() {
      let _ = write!(txt, "\n{}. {}", option_letter(i), o.name);
    }
    txt
  }

  /// CPU answer: a uniformly random option letter.
  pub fn cpu_answer(dice: &mut dyn Dice) -> char {
    option_letter(dice.index(OPTION_COUNT))
  }

  fn breakdown(&self) -> String {
    let mut txt = format!("\nDistances from {}:", self.reference.name);
    for (o, d) in self.options.iter().zip(&self.distances) {
      let _ = write!(txt, "\n - {}: {} km", o.name, d.trunc() as i64);
    }
    txt
  }

  pub fn evaluate(&self, letter: char) -> Verdict {
    if option_index(letter) == Some(self.solution) {
      Verdict::hit(format!("Correct!!!!!{}", self.breakdown()))
    } else {
      Verdict::miss(format!("Wrong. The answer is: {}{}", self.solution(), self.breakdown()))
    }
  }
}
