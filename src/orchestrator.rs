//! Match orchestration: rounds, turns, scoring and the hand-off to the stores.
//!
//! Flow:
//! - MatchStart: the roster must be full with at least `min_players` seats.
//! - RoundLoop: reset round scores, one turn per seat in seat order, round report.
//! - MatchEnd: final scores and winner, ranking merge, history record.
//!
//! Humans answer through the input channel; CPU answers are simulated here and
//! echoed to the output channel so the table can follow along.

use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::channels::{InputChannel, OutputChannel};
use crate::cities::CitySource;
use crate::config::GameConfig;
use crate::domain::{Player, Verdict};
use crate::error::GameError;
use crate::questions::{
  Answer, GeographyQuestion, MastermindQuestion, MathQuestion, Question, QuestionKind, TimerQuestion,
};
use crate::random::Dice;
use crate::roster::{is_tie, Roster};
use crate::store::{HistoryStore, RankingStore};

pub struct Channels<'a> {
  pub input: &'a mut dyn InputChannel,
  pub output: &'a mut dyn OutputChannel,
}

pub struct Stores<'a> {
  pub ranking: &'a mut dyn RankingStore,
  pub history: &'a mut dyn HistoryStore,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
  pub name: String,
  pub points: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoundReport {
  pub round: u32,
  /// Question kind asked to each seat, in seat order.
  pub kinds: Vec<QuestionKind>,
  pub scores: Vec<Standing>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchReport {
  pub match_id: Uuid,
  pub rounds: Vec<RoundReport>,
  pub standings: Vec<Standing>,
  pub winner: String,
}

impl MatchReport {
  pub fn is_tie(&self) -> bool {
    is_tie(&self.winner)
  }
}

fn standings(roster: &Roster, score: fn(&Player) -> u32) -> Vec<Standing> {
  roster
    .players()
    .map(|p| Standing { name: p.name().to_string(), points: score(p) })
    .collect()
}

pub struct MatchOrchestrator<'a> {
  config: &'a GameConfig,
  cities: &'a dyn CitySource,
  dice: &'a mut dyn Dice,
  io: Channels<'a>,
  stores: Stores<'a>,
}

impl<'a> MatchOrchestrator<'a> {
  pub fn new(
    config: &'a GameConfig,
    cities: &'a dyn CitySource,
    dice: &'a mut dyn Dice,
    io: Channels<'a>,
    stores: Stores<'a>,
  ) -> Self {
    Self { config, cities, dice, io, stores }
  }

  /// Play `rounds` rounds with a uniformly random question kind per turn.
  pub fn run_match(&mut self, roster: &mut Roster, rounds: u32) -> Result<MatchReport, GameError> {
    self.run_match_with(roster, rounds, QuestionKind::roll)
  }

  /// Same as `run_match`, with the question kind of every turn chosen by `picker`.
  #[instrument(level = "info", target = "match", skip(self, roster, picker))]
  pub fn run_match_with(
    &mut self,
    roster: &mut Roster,
    rounds: u32,
    mut picker: impl FnMut(&mut dyn Dice) -> QuestionKind,
  ) -> Result<MatchReport, GameError> {
    if !roster.is_full() || roster.occupied() < self.config.min_players {
      warn!(target: "match", seated = roster.occupied(), seats = roster.capacity(), "Match refused");
      return Err(GameError::NotEnoughPlayers { needed: self.config.min_players, found: roster.occupied() });
    }

    let match_id = Uuid::new_v4();
    info!(target: "match", %match_id, humans = roster.humans(), cpus = roster.cpus(), rounds, "Match started");
    roster.players_mut().for_each(Player::reset_match);

    let mut round_reports = Vec::with_capacity(rounds as usize);
    for round in 1..=rounds {
      round_reports.push(self.play_round(roster, round, &mut picker)?);
    }

    self.io.output.emit("\n** Match results **");
    let final_scores = standings(roster, Player::match_score);
    for s in &final_scores {
      self.io.output.emit(&format!("{}: {} points!!", s.name, s.points));
    }

    let winner = roster.winner();
    if is_tie(&winner) {
      self.io.output.emit(&format!("It's a tie between: {winner}"));
      info!(target: "match", %match_id, players = roster.occupied(), %winner, "Match ended in a tie");
    } else {
      self.io.output.emit(&format!("The winner is {winner}"));
      info!(target: "match", %match_id, players = roster.occupied(), %winner, "Match ended");
    }

    let listing = roster.listing();
    self.stores.ranking.merge(&listing)?;
    self.stores.history.append(match_id, &listing)?;

    let report = MatchReport { match_id, rounds: round_reports, standings: final_scores, winner };
    match serde_json::to_string(&report) {
      Ok(json) => debug!(target: "match", report = %json, "Match report"),
      Err(e) => warn!(target: "match", error = %e, "Match report not serializable"),
    }
    Ok(report)
  }

  fn play_round(
    &mut self,
    roster: &mut Roster,
    round: u32,
    picker: &mut impl FnMut(&mut dyn Dice) -> QuestionKind,
  ) -> Result<RoundReport, GameError> {
    self.io.output.emit(&format!("\n** Round {round} **"));
    roster.players_mut().for_each(Player::reset_round);

    let mut kinds = Vec::with_capacity(roster.capacity());
    for seat in 0..roster.capacity() {
      let Some(player) = roster.seat(seat) else { continue };
      let (name, human) = (player.name().to_string(), player.is_human());

      let kind = picker(&mut *self.dice);
      self.io.output.emit(&format!("\n***** > {name}'s turn"));
      info!(target: "match", round, %name, %kind, "Turn");

      let question = self.draw(kind)?;
      let verdict = self.take_turn(question, human)?;
      if verdict.is_correct() {
        if let Some(p) = roster.seat_mut(seat) {
          p.award(self.config.points_per_answer);
        }
      }
      kinds.push(kind);
    }

    self.io.output.emit(&format!("\n** Round {round} results **"));
    let scores = standings(roster, Player::round_score);
    for s in &scores {
      self.io.output.emit(&format!("{}: {} points!!", s.name, s.points));
    }
    Ok(RoundReport { round, kinds, scores })
  }

  fn draw(&mut self, kind: QuestionKind) -> Result<Question, GameError> {
    let question = match kind {
      QuestionKind::Math => Question::Math(MathQuestion::generate(&self.config.math, &mut *self.dice)),
      QuestionKind::Mastermind => {
        Question::Mastermind(MastermindQuestion::generate(&self.config.mastermind, &mut *self.dice))
      }
      QuestionKind::Geography => {
        let cities = self.cities.load()?;
        let q = GeographyQuestion::generate(&cities, &mut *self.dice).ok_or_else(|| GameError::DatasetUnavailable {
          path: "city dataset".to_string(),
          reason: format!("{} rows, fewer than 5 distinct city names", cities.len()),
        })?;
        Question::Geography(q)
      }
      QuestionKind::Timer => {
        let t = &self.config.timer;
        let target = self.dice.uniform_int(i64::from(t.min_seconds), i64::from(t.max_seconds)) as u32;
        Question::Timer(TimerQuestion::new(target, t.tolerance_seconds))
      }
    };
    debug!(target: "match", %kind, prompt = %question.prompt_text(true), solution = %question.solution(), "Question drawn");
    Ok(question)
  }

  /// One turn: a single answer, or up to `attempts` guesses for Mastermind.
  fn take_turn(&mut self, mut question: Question, human: bool) -> Result<Verdict, GameError> {
    if let (Question::Timer(t), false) = (&question, human) {
      self.io.output.emit(&t.instructions());
      thread::sleep(Duration::from_millis(self.config.timer.cpu_think_ms));
      let verdict = TimerQuestion::cpu_verdict();
      self.io.output.emit(verdict.message());
      return Ok(verdict);
    }

    let attempts = match question {
      Question::Mastermind(_) => self.config.mastermind.attempts,
      _ => 1,
    };
    let mut verdict = Verdict::miss("No attempts allowed.");
    for attempt in 1..=attempts {
      let answer = self.answer(&mut question, human)?;
      verdict = question.evaluate(&answer);
      self.io.output.emit(verdict.message());
      debug!(target: "match", attempt, correct = verdict.is_correct(), "Answer evaluated");
      if verdict.is_correct() {
        return Ok(verdict);
      }
    }
    if let Question::Mastermind(q) = &question {
      self.io.output.emit(&format!("Solution: {}", q.solution()));
    }
    Ok(verdict)
  }

  fn answer(&mut self, question: &mut Question, human: bool) -> Result<Answer, GameError> {
    let prompt = question.prompt_text(human && self.config.debug);
    let answer = match (question, human) {
      (Question::Math(_), true) => Answer::Number(self.io.input.ask_int(&prompt, i64::MIN, i64::MAX)?),
      (Question::Math(q), false) => {
        self.io.output.emit(&format!("{prompt}\n{}", q.solution()));
        Answer::Number(q.solution())
      }
      (Question::Mastermind(q), true) => Answer::Code(self.io.input.ask_token(&prompt, q.digits(), q.digits())?),
      (Question::Mastermind(q), false) => {
        let guess = q.cpu_guess(&mut *self.dice);
        self.io.output.emit(&format!("{prompt}\n{guess}"));
        Answer::Code(guess)
      }
      (Question::Geography(_), true) => Answer::Letter(self.io.input.ask_letter(&prompt)?),
      (Question::Geography(_), false) => {
        let letter = GeographyQuestion::cpu_answer(&mut *self.dice);
        self.io.output.emit(&format!("{prompt}\n{letter}"));
        Answer::Letter(letter)
      }
      (Question::Timer(q), _) => {
        self.io.output.emit(&q.instructions());
        self.io.input.wait_enter("")?;
        q.start_at(Instant::now());
        self.io.input.wait_enter(&prompt)?;
        Answer::Stop(Instant::now())
      }
    };
    Ok(answer)
  }
}
