//! Leaderboard aggregation over plain `name score` listings.
//!
//! Both the stored ranking and a roster listing are whitespace-separated
//! `name score` pairs, so one parser serves both.

use tracing::warn;

use crate::util::pad_name;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ranking {
  entries: Vec<(String, u32)>,
}

/// Read `name score` pairs. A pair whose score does not parse is skipped.
pub fn parse_listing(text: &str) -> Vec<(String, u32)> {
  let tokens: Vec<&str> = text.split_whitespace().collect();
  let mut out = Vec::with_capacity(tokens.len() / 2);
  for pair in tokens.chunks(2) {
    match pair {
      [name, score] => match score.parse::<u32>() {
        Ok(s) => out.push((name.to_string(), s)),
        Err(_) => warn!(target: "party_quiz", %name, %score, "Skipping ranking entry with a bad score"),
      },
      [name] => warn!(target: "party_quiz", %name, "Skipping ranking entry without a score"),
      _ => {}
    }
  }
  out
}

impl Ranking {
  pub fn parse(text: &str) -> Self {
    let mut r = Ranking::default();
    r.absorb(parse_listing(text));
    r.sort();
    r
  }

  /// Prior ranking first, then the current match listing: a name present in both
  /// takes the match value.
  pub fn merge(current_listing: &str, prior: &str) -> Self {
    let mut r = Ranking::default();
    r.absorb(parse_listing(prior));
    r.absorb(parse_listing(current_listing));
    r.sort();
    r
  }

  fn absorb(&mut self, pairs: Vec<(String, u32)>) {
    for (name, score) in pairs {
      match self.entries.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = score,
        None => self.entries.push((name, score)),
      }
    }
  }

  fn sort(&mut self) {
    self.entries.sort_by(|a, b| b.1.cmp(&a.1));
  }

  /// Drop every entry whose name matches, ignoring case.
  pub fn remove(&mut self, name: &str) {
    self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
  }

  /// First `size` entries, one `name\tscore` line each.
  pub fn render(&self, size: usize) -> String {
    self
      .entries
      .iter()
      .take(size)
      .map(|(n, s)| format!("{}\t{}\n", pad_name(n), s))
      .collect()
  }
}

/// Merge, sort descending by score, keep the top `size`, format.
pub fn merge_and_rank(current_listing: &str, prior: &str, size: usize) -> String {
  Ranking::merge(current_listing, prior).render(size)
}
