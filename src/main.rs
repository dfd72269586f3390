//! Party Quiz · console party game
//!
//! - 2 to 4 players, humans or CPUs, sharing one console
//! - Rounds of Math, Mastermind, Geography and Timer questions
//! - Flat-file ranking, match history and saved player list
//!
//! Important env variables:
//!   GAME_CONFIG_PATH  : path to the TOML config (see config/game.toml)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"
//!
//! Game events are also written to a daily file under `paths.logs`.

mod telemetry;
mod util;
mod domain;
mod config;
mod error;
mod random;
mod channels;
mod cities;
mod questions;
mod roster;
mod ranking;
mod store;
mod orchestrator;
mod menu;

use std::io::{self, BufReader};

use tracing::{info, instrument};

use crate::channels::{ConsoleInput, ConsoleOutput};
use crate::cities::CsvCities;
use crate::config::GameConfig;
use crate::menu::Session;
use crate::orchestrator::{Channels, Stores};
use crate::random::RngDice;
use crate::store::{FileHistoryStore, FilePlayerStore, FileRankingStore};

#[instrument(level = "info", skip_all)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
  let config = telemetry::with_startup_logging(GameConfig::load_from_env);
  let paths = &config.paths;
  telemetry::init_tracing(&paths.logs);
  info!(target: "party_quiz", cities = %paths.cities.display(), ranking = %paths.ranking.display(), logs = %paths.logs.display(), "Starting");

  let cities = CsvCities::new(&paths.cities);
  let mut dice = match config.seed {
    Some(seed) => RngDice::seeded(seed),
    None => RngDice::from_entropy(),
  };
  let mut input = ConsoleInput::new(BufReader::new(io::stdin()), io::stdout());
  let mut output = ConsoleOutput::new(io::stdout());
  let mut ranking = FileRankingStore::new(&paths.ranking, config.ranking_size);
  let mut history = FileHistoryStore::new(&paths.history);
  let mut players = FilePlayerStore::new(&paths.players);

  let mut session = Session::new(
    &config,
    &cities,
    &mut dice,
    Channels { input: &mut input, output: &mut output },
    Stores { ranking: &mut ranking, history: &mut history },
    &mut players,
  );
  session.restore()?;
  session.run()?;

  info!(target: "party_quiz", "Bye");
  Ok(())
}
