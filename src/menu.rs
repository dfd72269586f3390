//! Interactive console session: the main menu and the players menu.
//!
//! The session owns the roster between matches. It is restored from the player
//! store on startup and written back on exit.

use tracing::{error, info, instrument, warn};

use crate::cities::CitySource;
use crate::config::{GameConfig, NAME_MAX_LEN};
use crate::domain::PlayerKind;
use crate::error::GameError;
use crate::orchestrator::{Channels, MatchOrchestrator, Stores};
use crate::random::Dice;
use crate::roster::Roster;
use crate::store::PlayerStore;
use crate::util::truncate_name;

const MAIN_MENU: &str = "\n========= GAME MENU ==============
1. Play                          |
2. Ranking                       |
3. History                       |
4. Players                       |
5. Exit                          |
==================================";

const PLAYERS_MENU: &str = "\n========= PLAYERS MENU ==============
1.- List registered players         |
2.- Create player list              |
3.- Add player                      |
4.- Remove player                   |
5.- Back                            |
=====================================";

pub struct Session<'a> {
  config: &'a GameConfig,
  cities: &'a dyn CitySource,
  dice: &'a mut dyn Dice,
  io: Channels<'a>,
  stores: Stores<'a>,
  players: &'a mut dyn PlayerStore,
  roster: Option<Roster>,
}

impl<'a> Session<'a> {
  pub fn new(
    config: &'a GameConfig,
    cities: &'a dyn CitySource,
    dice: &'a mut dyn Dice,
    io: Channels<'a>,
    stores: Stores<'a>,
    players: &'a mut dyn PlayerStore,
  ) -> Self {
    Self { config, cities, dice, io, stores, players, roster: None }
  }

  pub fn roster(&self) -> Option<&Roster> {
    self.roster.as_ref()
  }

  /// Seat the saved players, one seat each. Repeated names (ignoring case) keep
  /// their first entry.
  #[instrument(level = "debug", skip(self))]
  pub fn restore(&mut self) -> Result<(), GameError> {
    let mut saved: Vec<(String, u32)> = Vec::new();
    for (name, score) in self.players.load()? {
      let name = truncate_name(&name).to_string();
      if saved.iter().any(|(n, _)| n.eq_ignore_ascii_case(&name)) {
        warn!(target: "party_quiz", %name, "Skipping repeated saved player");
        continue;
      }
      saved.push((name, score));
    }
    if saved.is_empty() {
      info!(target: "party_quiz", "No saved players");
      return Ok(());
    }

    let mut roster = Roster::new(saved.len());
    for (name, score) in &saved {
      roster.create_restored(name, *score, &mut *self.dice)?;
    }
    info!(target: "party_quiz", humans = roster.humans(), cpus = roster.cpus(), "Saved players restored");
    self.roster = Some(roster);
    Ok(())
  }

  /// Main menu loop. Closing the input saves the players and ends the session.
  pub fn run(&mut self) -> Result<(), GameError> {
    info!(target: "party_quiz", "Session started");
    match self.main_menu() {
      Err(GameError::InputClosed) => {
        warn!(target: "party_quiz", "Input closed; saving players and leaving");
        self.exit()
      }
      other => other,
    }
  }

  fn main_menu(&mut self) -> Result<(), GameError> {
    loop {
      self.io.output.emit(MAIN_MENU);
      match self.io.input.ask_int("", 1, 5)? {
        1 => self.play()?,
        2 => {
          let shown = self.show_ranking();
          self.report_storage(shown)?
        }
        3 => {
          let shown = self.show_history();
          self.report_storage(shown)?
        }
        4 => self.players_menu()?,
        _ => return self.exit(),
      }
    }
  }

  /// A failing store is reported on the console and the menu carries on.
  fn report_storage(&mut self, result: Result<(), GameError>) -> Result<(), GameError> {
    match result {
      Err(e @ GameError::Storage { .. }) => {
        error!(target: "party_quiz", error = %e, "Storage operation failed");
        self.io.output.emit(&e.to_string());
        Ok(())
      }
      other => other,
    }
  }

  fn play(&mut self) -> Result<(), GameError> {
    info!(target: "party_quiz", "Play selected");
    let min = self.config.min_players;
    let Some(roster) = self.roster.as_mut() else {
      self.io.output.emit("You must register the players first (option 4)!");
      return Ok(());
    };
    if roster.occupied() < min {
      self.io.output.emit(&format!("You need at least {min} players!"));
      return Ok(());
    }

    let seated = roster.occupied();
    self.io.output.emit(&format!("We are {seated} players."));
    let rounds = self.io.input.ask_int(
      "How many rounds do you want to play?",
      i64::from(self.config.min_rounds),
      i64::from(self.config.max_rounds),
    )? as u32;
    info!(target: "party_quiz", rounds, "Rounds chosen");
    self.io.output.emit("\n========> The match begins");

    let mut orchestrator = MatchOrchestrator::new(
      self.config,
      self.cities,
      &mut *self.dice,
      Channels { input: &mut *self.io.input, output: &mut *self.io.output },
      Stores { ranking: &mut *self.stores.ranking, history: &mut *self.stores.history },
    );
    match orchestrator.run_match(roster, rounds) {
      Ok(report) => {
        let outcome = if report.is_tie() {
          format!("It was a tie: {}. Check the history for details.", report.winner)
        } else {
          format!("The winner is {}", report.winner)
        };
        self.io.output.emit(&format!("========> End of the match with {seated} players. {outcome}"));
      }
      Err(GameError::InputClosed) => return Err(GameError::InputClosed),
      Err(e) => {
        error!(target: "party_quiz", error = %e, "Match aborted");
        self.io.output.emit(&format!("The match was aborted: {e}"));
      }
    }

    self.io.output.emit("\n** Accumulated game scores **");
    self.io.output.emit(&roster.listing());
    Ok(())
  }

  fn show_ranking(&mut self) -> Result<(), GameError> {
    let text = self.stores.ranking.read()?;
    self.io.output.emit(&format!("Top {} players by points:", self.config.ranking_size));
    self.io.output.emit(&text);
    Ok(())
  }

  fn show_history(&mut self) -> Result<(), GameError> {
    let text = self.stores.history.read()?;
    if text.is_empty() {
      self.io.output.emit("No matches recorded yet.");
    } else {
      self.io.output.emit(&text);
    }
    Ok(())
  }

  fn players_menu(&mut self) -> Result<(), GameError> {
    loop {
      self.io.output.emit(PLAYERS_MENU);
      match self.io.input.ask_int("", 1, 5)? {
        1 => self.list_players(),
        2 => self.create_roster()?,
        3 => self.add_player()?,
        4 => {
          let removed = self.remove_player();
          self.report_storage(removed)?
        }
        _ => {
          self.io.output.emit("Back to the main menu :)");
          return Ok(());
        }
      }
    }
  }

  fn list_players(&mut self) {
    self.io.output.emit("Registered players:");
    match &self.roster {
      Some(r) => self.io.output.emit(&r.listing()),
      None => self.io.output.emit("  --> Empty list!!"),
    }
  }

  /// Replace the roster with a fresh one of the requested size.
  fn create_roster(&mut self) -> Result<(), GameError> {
    let count = self.io.input.ask_int(
      "How many players are you?",
      self.config.min_players as i64,
      self.config.max_players as i64,
    )? as usize;
    info!(target: "party_quiz", count, "Creating a new player list");
    self.roster = Some(Roster::new(count));
    for seat in 0..count {
      while !self.create_one(seat)? {}
    }
    Ok(())
  }

  fn add_player(&mut self) -> Result<(), GameError> {
    let max = self.config.max_players;
    match self.roster.as_mut() {
      None => self.roster = Some(Roster::new(1)),
      Some(r) if r.occupied() >= max => {
        self.io.output.emit(&format!("You cannot go beyond {max} players."));
        return Ok(());
      }
      Some(r) => r.expand_capacity(),
    }
    let seat = self.roster.as_ref().map_or(0, |r| r.capacity() - 1);
    while !self.create_one(seat)? {}
    Ok(())
  }

  /// Ask for one player and seat it. `Ok(false)` when the name was refused.
  fn create_one(&mut self, seat: usize) -> Result<bool, GameError> {
    let number = seat + 1;
    let kind = match self.io.input.ask_int(&format!("What kind is player {number}? (1: Human or 2: CPU)"), 1, 2)? {
      1 => PlayerKind::Human,
      _ => PlayerKind::Cpu,
    };
    let name = match kind {
      PlayerKind::Human => self.io.input.ask_token(&format!("Name of player {number}?"), 0, NAME_MAX_LEN)?,
      PlayerKind::Cpu => String::new(),
    };

    let Some(roster) = self.roster.as_mut() else {
      return Ok(true);
    };
    match roster.create_player(&name, 0, kind, &mut *self.dice) {
      Ok(player) => {
        self.io.output.emit(&player.to_string());
        Ok(true)
      }
      Err(e) if e.is_recoverable() => {
        warn!(target: "party_quiz", error = %e, "Player refused");
        self.io.output.emit(&e.to_string());
        Ok(false)
      }
      Err(e) => Err(e),
    }
  }

  fn remove_player(&mut self) -> Result<(), GameError> {
    if self.roster.as_ref().map_or(true, |r| r.occupied() == 0) {
      self.io.output.emit("The player list is empty!!");
      return Ok(());
    }
    let name = self.io.input.ask_token("Type the name of the player to remove", 1, NAME_MAX_LEN)?;
    let removed = match self.roster.as_mut() {
      Some(r) => r.remove_player(&name, &mut *self.stores.ranking)?,
      None => false,
    };
    self.io.output.emit(if removed { "Player removed ;)" } else { "Player NOT found" });
    Ok(())
  }

  /// Save the current listing (empty without players) and say goodbye.
  fn exit(&mut self) -> Result<(), GameError> {
    let listing = match &self.roster {
      Some(r) if r.occupied() > 0 => r.listing(),
      _ => String::new(),
    };
    self.players.save(&listing)?;
    info!(target: "party_quiz", "Player list saved");
    self.io.output.emit("You have left the game (>‿◠)✌");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use rand::rngs::StdRng;

  use super::*;
  use crate::channels::testing::{CapturedOutput, Reply, ScriptedInput};
  use crate::cities::{parse_cities, StaticCities};
  use crate::random::RngDice;
  use crate::store::memory::{MemoryHistory, MemoryPlayers, MemoryRanking};

  struct Desk {
    config: GameConfig,
    cities: StaticCities,
    dice: RngDice<StdRng>,
    input: ScriptedInput,
    output: CapturedOutput,
    ranking: MemoryRanking,
    history: MemoryHistory,
    players: MemoryPlayers,
  }

  impl Desk {
    fn new(saved: &str, replies: Vec<Reply>) -> Self {
      let mut config = GameConfig::default();
      config.timer.cpu_think_ms = 0;
      Self {
        config,
        cities: StaticCities(parse_cities(include_str!("../data/cities.csv")).unwrap()),
        dice: RngDice::seeded(5),
        input: ScriptedInput::new(replies),
        output: CapturedOutput::default(),
        ranking: MemoryRanking::new(10),
        history: MemoryHistory::default(),
        players: MemoryPlayers { text: saved.to_string() },
      }
    }

    /// Restore, run the menu until it ends, hand back the final roster.
    fn play(&mut self) -> Option<Roster> {
      let mut session = Session::new(
        &self.config,
        &self.cities,
        &mut self.dice,
        Channels { input: &mut self.input, output: &mut self.output },
        Stores { ranking: &mut self.ranking, history: &mut self.history },
        &mut self.players,
      );
      session.restore().unwrap();
      session.run().unwrap();
      session.roster().cloned()
    }
  }

  #[test]
  fn saved_players_come_back_and_are_saved_on_exit() {
    let mut desk = Desk::new("Ana      \t4\ncpu1     \t2\n", vec![Reply::Int(5)]);
    let roster = desk.play().unwrap();
    assert_eq!((roster.capacity(), roster.humans(), roster.cpus()), (2, 1, 1));
    assert!(desk.players.text.contains("Ana      \t4"));
    assert!(desk.players.text.contains("cpu1     \t2"));
    assert!(desk.output.contains("You have left the game"));
  }

  #[test]
  fn repeated_saved_names_keep_the_first() {
    let mut desk = Desk::new("Ana 4\nANA 9\nBea 1\n", vec![Reply::Int(5)]);
    let roster = desk.play().unwrap();
    assert_eq!(roster.capacity(), 2);
    assert!(!desk.players.text.contains('9'));
  }

  #[test]
  fn play_without_players_points_to_the_players_menu() {
    let mut desk = Desk::new("", vec![Reply::Int(1), Reply::Int(5)]);
    assert!(desk.play().is_none());
    assert!(desk.output.contains("You must register the players first (option 4)!"));
    assert!(desk.history.records.is_empty());
    assert_eq!(desk.players.text, "");
  }

  #[test]
  fn a_cpu_match_updates_ranking_and_history() {
    let mut desk = Desk::new(
      "CPU0 0\nCPU1 0\n",
      vec![Reply::Int(1), Reply::Int(2), Reply::Int(2), Reply::Int(3), Reply::Int(5)],
    );
    desk.play().unwrap();
    assert!(desk.output.contains("We are 2 players."));
    assert!(desk.output.contains("========> End of the match with 2 players."));
    assert!(desk.output.contains("** Accumulated game scores **"));
    assert!(desk.output.contains("Top 10 players by points:"));
    assert!(desk.output.contains("CPU0"));
    assert_eq!(desk.history.records.len(), 1);
    assert_eq!(desk.ranking.text.lines().count(), 2);
    assert!(desk.input.prompts.iter().any(|p| p == "How many rounds do you want to play?"));
  }

  #[test]
  fn creating_a_roster_reprompts_on_refused_names() {
    let mut desk = Desk::new(
      "",
      vec![
        Reply::Int(4),
        Reply::Int(2),
        Reply::Int(2),
        Reply::Int(1),
        Reply::Token("Ana".into()),
        Reply::Int(1),
        Reply::Token("ana".into()),
        Reply::Int(1),
        Reply::Token("CPUx".into()),
        Reply::Int(2),
        Reply::Int(1),
        Reply::Int(5),
        Reply::Int(5),
      ],
    );
    let roster = desk.play().unwrap();
    assert_eq!((roster.humans(), roster.cpus()), (1, 1));
    assert!(desk.output.contains("The name ana is already registered"));
    assert!(desk.output.contains("cannot start with 'CPU'"));
    assert!(desk.output.contains("Back to the main menu :)"));
    assert!(desk.players.text.contains("Ana"));
    assert!(desk.players.text.contains("CPU"));
  }

  #[test]
  fn empty_human_names_get_a_default_name() {
    let mut desk = Desk::new(
      "",
      vec![
        Reply::Int(4),
        Reply::Int(2),
        Reply::Int(2),
        Reply::Int(1),
        Reply::Token(String::new()),
        Reply::Int(2),
        Reply::Int(5),
        Reply::Int(5),
      ],
    );
    let roster = desk.play().unwrap();
    assert!(roster.players().any(|p| p.name().starts_with("Player") && p.is_human()));
  }

  #[test]
  fn adding_grows_the_roster_up_to_the_limit() {
    let mut desk = Desk::new(
      "Ana 1\nBea 1\n",
      vec![Reply::Int(4), Reply::Int(3), Reply::Int(2), Reply::Int(5), Reply::Int(5)],
    );
    let roster = desk.play().unwrap();
    assert_eq!((roster.capacity(), roster.cpus()), (3, 1));
    assert_eq!(desk.players.text.lines().count(), 3);

    let mut full = Desk::new(
      "A 1\nB 1\nC 1\nD 1\n",
      vec![Reply::Int(4), Reply::Int(3), Reply::Int(5), Reply::Int(5)],
    );
    let roster = full.play().unwrap();
    assert_eq!(roster.capacity(), 4);
    assert!(full.output.contains("You cannot go beyond 4 players."));
  }

  #[test]
  fn adding_to_no_roster_starts_one() {
    let mut desk = Desk::new("", vec![Reply::Int(4), Reply::Int(3), Reply::Int(2), Reply::Int(5), Reply::Int(5)]);
    let roster = desk.play().unwrap();
    assert_eq!((roster.capacity(), roster.cpus()), (1, 1));
  }

  #[test]
  fn removal_reports_found_and_missing_players() {
    let mut desk = Desk::new(
      "Ana 3\nBea 2\n",
      vec![
        Reply::Int(4),
        Reply::Int(4),
        Reply::Token("BEA".into()),
        Reply::Int(4),
        Reply::Token("Zed".into()),
        Reply::Int(5),
        Reply::Int(5),
      ],
    );
    let roster = desk.play().unwrap();
    assert_eq!(roster.capacity(), 1);
    assert!(desk.output.contains("Player removed ;)"));
    assert!(desk.output.contains("Player NOT found"));
    assert_eq!(desk.ranking.removed, ["BEA"]);
    assert!(!desk.players.text.contains("Bea"));
  }

  #[test]
  fn failed_ranking_removal_is_reported_and_players_still_saved() {
    let mut desk = Desk::new(
      "Ana 3\nBea 2\n",
      vec![Reply::Int(4), Reply::Int(4), Reply::Token("Bea".into()), Reply::Int(5), Reply::Int(5)],
    );
    desk.ranking.fail_removal = true;
    let roster = desk.play().unwrap();
    assert!(desk.output.contains("removal refused"));
    assert!(!desk.output.contains("Player removed ;)"));
    assert_eq!(roster.occupied(), 2);
    assert!(desk.players.text.contains("Bea      \t2"));
    assert_eq!(desk.input.remaining(), 0);
  }

  #[test]
  fn unreadable_ranking_and_history_keep_the_menu_alive() {
    let mut desk = Desk::new("Ana 3\n", vec![Reply::Int(2), Reply::Int(3), Reply::Int(5)]);
    desk.ranking.fail_read = true;
    desk.history.fail_read = true;
    desk.play().unwrap();
    assert_eq!(desk.output.lines.iter().filter(|l| l.contains("read refused")).count(), 2);
    assert!(desk.output.contains("You have left the game"));
    assert!(desk.players.text.contains("Ana      \t3"));
  }

  #[test]
  fn too_few_players_cannot_start_a_match() {
    let mut desk = Desk::new("Ana 3\n", vec![Reply::Int(1), Reply::Int(5)]);
    desk.play().unwrap();
    assert!(desk.output.contains("You need at least 2 players!"));
    assert!(desk.history.records.is_empty());
  }

  #[test]
  fn closed_input_still_saves_the_players() {
    let mut desk = Desk::new("Ana 3\nBea 2\n", vec![Reply::Int(4)]);
    desk.play().unwrap();
    assert!(desk.players.text.contains("Ana      \t3"));
    assert!(desk.players.text.contains("Bea      \t2"));
  }
}
