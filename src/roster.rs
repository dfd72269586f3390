//! The roster: seats holding players, in the order they take their turns.
//!
//! New players land on a uniformly random empty seat, which shuffles the turn
//! order without a separate shuffle step. Names are unique ignoring case.

use tracing::{info, instrument, warn};

use crate::domain::{has_cpu_prefix, Player, PlayerKind, CPU_PREFIX};
use crate::error::GameError;
use crate::random::Dice;
use crate::store::RankingStore;
use crate::util::truncate_name;

/// Separator between tied winners.
pub const TIE_SEPARATOR: &str = " - ";

const HUMAN_PREFIX: &str = "Player";

#[derive(Clone, Debug, Default)]
pub struct Roster {
  seats: Vec<Option<Player>>,
  humans: usize,
  cpus: usize,
}

impl Roster {
  pub fn new(seats: usize) -> Self {
    Self { seats: vec![None; seats], humans: 0, cpus: 0 }
  }

  pub fn capacity(&self) -> usize {
    self.seats.len()
  }

  pub fn humans(&self) -> usize {
    self.humans
  }

  pub fn cpus(&self) -> usize {
    self.cpus
  }

  pub fn occupied(&self) -> usize {
    self.humans + self.cpus
  }

  /// Every seat taken.
  pub fn is_full(&self) -> bool {
    self.seats.iter().all(Option::is_some)
  }

  pub fn players(&self) -> impl Iterator<Item = &Player> {
    self.seats.iter().flatten()
  }

  pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
    self.seats.iter_mut().flatten()
  }

  pub fn seat(&self, index: usize) -> Option<&Player> {
    self.seats.get(index).and_then(Option::as_ref)
  }

  pub fn seat_mut(&mut self, index: usize) -> Option<&mut Player> {
    self.seats.get_mut(index).and_then(Option::as_mut)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.players().any(|p| p.same_name(name))
  }

  /// Seat a new player.
  ///
  /// An empty CPU name becomes `CPU{n}`, an empty human name `Player{n}`, with `n`
  /// counted upwards from the seat index until the name is free. A named CPU must
  /// carry the CPU prefix.
  #[instrument(level = "debug", skip(self, dice))]
  pub fn create_player(
    &mut self,
    name: &str,
    initial_score: u32,
    kind: PlayerKind,
    dice: &mut dyn Dice,
  ) -> Result<&Player, GameError> {
    let name = truncate_name(name.trim());
    if !name.is_empty() && self.contains(name) {
      return Err(GameError::DuplicateName(name.to_string()));
    }
    if kind == PlayerKind::Human && has_cpu_prefix(name) {
      return Err(GameError::ReservedNamePrefix(name.to_string()));
    }
    if kind == PlayerKind::Cpu && !name.is_empty() && !has_cpu_prefix(name) {
      return Err(GameError::MissingCpuPrefix(name.to_string()));
    }

    let free: Vec<usize> = (0..self.seats.len()).filter(|&i| self.seats[i].is_none()).collect();
    if free.is_empty() {
      return Err(GameError::RosterFull(self.seats.len()));
    }
    let pos = free[dice.index(free.len())];

    let name = match (name.is_empty(), kind) {
      (false, _) => name.to_string(),
      (true, PlayerKind::Cpu) => self.free_name(CPU_PREFIX, pos),
      (true, PlayerKind::Human) => self.free_name(HUMAN_PREFIX, pos + 1),
    };

    match kind {
      PlayerKind::Human => self.humans += 1,
      PlayerKind::Cpu => self.cpus += 1,
    }
    let player = self.seats[pos].insert(Player::new(name, initial_score, kind));
    info!(target: "party_quiz", seat = pos, player = %player, ?kind, "Player created");
    Ok(player)
  }

  /// Seat a player read back from the saved list; the name decides the kind.
  pub fn create_restored(&mut self, name: &str, score: u32, dice: &mut dyn Dice) -> Result<&Player, GameError> {
    self.create_player(name, score, PlayerKind::from_name(name), dice)
  }

  fn free_name(&self, prefix: &str, start: usize) -> String {
    (start..)
      .map(|n| format!("{prefix}{n}"))
      .find(|candidate| !self.contains(candidate))
      .unwrap_or_else(|| prefix.to_string())
  }

  /// Append one empty seat after the existing ones.
  pub fn expand_capacity(&mut self) {
    self.seats.push(None);
  }

  /// Remove a player (ignoring case) and its ranking entry.
  ///
  /// Returns `Ok(false)` when nobody matches. The ranking entry goes first; if that
  /// fails the roster is left exactly as it was.
  #[instrument(level = "debug", skip(self, ranking))]
  pub fn remove_player(&mut self, name: &str, ranking: &mut dyn RankingStore) -> Result<bool, GameError> {
    let Some(idx) = self.seats.iter().position(|s| s.as_ref().is_some_and(|p| p.same_name(name))) else {
      warn!(target: "party_quiz", %name, "Player NOT removed (not found)");
      return Ok(false);
    };

    ranking.remove(name)?;

    if let Some(player) = self.seats.remove(idx) {
      match player.kind() {
        PlayerKind::Human => self.humans -= 1,
        PlayerKind::Cpu => self.cpus -= 1,
      }
      info!(target: "party_quiz", player = %player.name(), "Player removed");
    }
    Ok(true)
  }

  /// Highest match score; ties list every leader in seat order.
  pub fn winner(&self) -> String {
    let Some(best) = self.players().map(Player::match_score).max() else {
      return String::new();
    };
    self
      .players()
      .filter(|p| p.match_score() == best)
      .map(Player::name)
      .collect::<Vec<_>>()
      .join(TIE_SEPARATOR)
  }

  /// One listing line per seated player.
  pub fn listing(&self) -> String {
    let lines: String = self.players().map(|p| format!("{p}\n")).collect();
    if lines.is_empty() { "  --> Empty list!!".to_string() } else { lines }
  }
}

pub fn is_tie(winner: &str) -> bool {
  winner.contains(TIE_SEPARATOR)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::random::{RngDice, ScriptedDice};
  use crate::store::memory::MemoryRanking;

  fn roster_of(names: &[&str]) -> Roster {
    let mut r = Roster::new(names.len());
    let mut dice = ScriptedDice::new(std::iter::repeat(0).take(names.len()));
    for n in names {
      r.create_player(n, 0, PlayerKind::from_name(n), &mut dice).unwrap();
    }
    r
  }

  #[test]
  fn duplicate_names_are_rejected_ignoring_case() {
    let mut dice = RngDice::seeded(1);
    let mut r = Roster::new(3);
    r.create_player("Ana", 0, PlayerKind::Human, &mut dice).unwrap();
    let err = r.create_player("aNA", 0, PlayerKind::Human, &mut dice).unwrap_err();
    assert!(matches!(err, GameError::DuplicateName(_)));
    assert_eq!(r.occupied(), 1);
  }

  #[test]
  fn humans_cannot_take_the_cpu_prefix() {
    let mut dice = RngDice::seeded(1);
    let mut r = Roster::new(2);
    let err = r.create_player("cpuKing", 0, PlayerKind::Human, &mut dice).unwrap_err();
    assert!(matches!(err, GameError::ReservedNamePrefix(_)));
    r.create_player("CPUKing", 0, PlayerKind::Cpu, &mut dice).unwrap();
  }

  #[test]
  fn named_cpus_must_carry_the_prefix() {
    let mut dice = RngDice::seeded(1);
    let mut r = Roster::new(2);
    let err = r.create_player("Bob", 0, PlayerKind::Cpu, &mut dice).unwrap_err();
    assert!(matches!(err, GameError::MissingCpuPrefix(_)));
    assert!(err.is_recoverable());
    assert_eq!(r.occupied(), 0);
    let p = r.create_player("cpuBob", 0, PlayerKind::Cpu, &mut dice).unwrap();
    assert_eq!(PlayerKind::from_name(p.name()), PlayerKind::Cpu);
  }

  #[test]
  fn full_roster_refuses_and_expansion_adds_one_seat() {
    let mut dice = RngDice::seeded(2);
    let mut r = roster_of(&["Ana", "Bea"]);
    let err = r.create_player("Cid", 0, PlayerKind::Human, &mut dice).unwrap_err();
    assert!(matches!(err, GameError::RosterFull(2)));
    let before: Vec<String> = r.players().map(|p| p.name().to_string()).collect();
    r.expand_capacity();
    assert_eq!(r.capacity(), 3);
    assert!(!r.is_full());
    r.create_player("Cid", 0, PlayerKind::Human, &mut dice).unwrap();
    let after: Vec<String> = r.players().map(|p| p.name().to_string()).collect();
    assert_eq!(&after[..2], &before[..]);
    assert_eq!(after[2], "Cid");
  }

  #[test]
  fn seats_are_drawn_among_empty_ones() {
    // Free seats [0,1,2] -> pick index 2; free [0,1] -> pick 0; free [1] -> pick 0.
    let mut dice = ScriptedDice::new([2, 0, 0]);
    let mut r = Roster::new(3);
    r.create_player("Ana", 0, PlayerKind::Human, &mut dice).unwrap();
    r.create_player("Bea", 0, PlayerKind::Human, &mut dice).unwrap();
    r.create_player("Cid", 0, PlayerKind::Human, &mut dice).unwrap();
    let order: Vec<&str> = r.players().map(Player::name).collect();
    assert_eq!(order, ["Bea", "Cid", "Ana"]);
  }

  #[test]
  fn cpu_names_count_up_from_the_seat_index() {
    // CPU lands on seat 1 -> "CPU1"; second CPU on seat 0 -> "CPU0".
    let mut dice = ScriptedDice::new([1, 0, 0]);
    let mut r = Roster::new(3);
    assert_eq!(r.create_player("", 0, PlayerKind::Cpu, &mut dice).unwrap().name(), "CPU1");
    assert_eq!(r.create_player("", 0, PlayerKind::Cpu, &mut dice).unwrap().name(), "CPU0");
    // Last free seat is 2; "CPU2" is free.
    assert_eq!(r.create_player("", 0, PlayerKind::Cpu, &mut dice).unwrap().name(), "CPU2");
    assert_eq!(r.cpus(), 3);

    // A restored CPU1 pushes the next automatic name past it.
    let mut dice = ScriptedDice::new([0, 0]);
    let mut r = Roster::new(2);
    r.create_restored("cpu1", 5, &mut dice).unwrap();
    assert_eq!(r.create_player("", 0, PlayerKind::Cpu, &mut dice).unwrap().name(), "CPU2");
  }

  #[test]
  fn empty_human_names_get_a_default() {
    let mut dice = ScriptedDice::new([1]);
    let mut r = Roster::new(2);
    assert_eq!(r.create_player("  ", 0, PlayerKind::Human, &mut dice).unwrap().name(), "Player2");
    assert_eq!(r.humans(), 1);
  }

  #[test]
  fn remove_then_recreate_succeeds() {
    let mut ranking = MemoryRanking::new(10);
    let mut dice = RngDice::seeded(3);
    let mut r = roster_of(&["Ana", "Bea", "CPU9"]);
    assert!(r.remove_player("BEA", &mut ranking).unwrap());
    assert_eq!(ranking.removed, ["BEA"]);
    assert_eq!((r.capacity(), r.humans(), r.cpus()), (2, 1, 1));
    assert!(r.remove_player("cpu9", &mut ranking).unwrap());
    assert_eq!(r.cpus(), 0);
    r.expand_capacity();
    r.create_player("bea", 0, PlayerKind::Human, &mut dice).unwrap();
    assert!(r.contains("Bea"));
  }

  #[test]
  fn failed_removal_leaves_the_roster_untouched() {
    let mut ranking = MemoryRanking::new(10);
    let mut r = roster_of(&["Ana", "Bea"]);
    let before = r.listing();
    assert!(!r.remove_player("Zed", &mut ranking).unwrap());
    assert_eq!(r.listing(), before);
    assert!(ranking.removed.is_empty());

    ranking.fail_removal = true;
    assert!(r.remove_player("Ana", &mut ranking).is_err());
    assert_eq!(r.listing(), before);
    assert_eq!((r.capacity(), r.humans()), (2, 2));
  }

  #[test]
  fn winner_and_ties_follow_seat_order() {
    let mut r = roster_of(&["A", "B", "C"]);
    for (i, pts) in [5, 5, 3].into_iter().enumerate() {
      r.seat_mut(i).unwrap().award(pts);
    }
    let w = r.winner();
    assert_eq!(w, "A - B");
    assert!(is_tie(&w));

    let mut r = roster_of(&["A", "B"]);
    r.seat_mut(0).unwrap().award(5);
    r.seat_mut(1).unwrap().award(3);
    assert_eq!(r.winner(), "A");
    assert!(!is_tie(&r.winner()));
  }

  #[test]
  fn listing_lines_or_placeholder() {
    assert_eq!(Roster::new(2).listing(), "  --> Empty list!!");
    let r = roster_of(&["Ana"]);
    assert_eq!(r.listing(), "Ana      \t0\n");
  }
}
