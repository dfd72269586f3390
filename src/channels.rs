//! Input and output channels between the game and whoever sits at the keyboard.
//!
//! The engine only ever receives well-formed values: validation and re-prompting
//! live in the channel implementation, not in the orchestrator.

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::error::GameError;

pub trait InputChannel {
  /// Integer in `min..=max`.
  fn ask_int(&mut self, prompt: &str, min: i64, max: i64) -> Result<i64, GameError>;
  /// One of the option letters A–D, upper-cased.
  fn ask_letter(&mut self, prompt: &str) -> Result<char, GameError>;
  /// Whitespace-free token of at least `min_len` characters, cut to `max_len`.
  fn ask_token(&mut self, prompt: &str, min_len: usize, max_len: usize) -> Result<String, GameError>;
  /// Block until the player presses Enter.
  fn wait_enter(&mut self, prompt: &str) -> Result<(), GameError>;
}

pub trait OutputChannel {
  fn emit(&mut self, text: &str);
}

/// Line-oriented console input. Prompts go to `writer`, answers come from `reader`.
pub struct ConsoleInput<R, W> {
  reader: R,
  writer: W,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
  pub fn new(reader: R, writer: W) -> Self {
    Self { reader, writer }
  }

  fn say(&mut self, text: &str) {
    if text.is_empty() {
      return;
    }
    if let Err(e) = writeln!(self.writer, "{text}").and_then(|_| self.writer.flush()) {
      warn!(target: "party_quiz", error = %e, "Console write failed");
    }
  }

  fn read_line(&mut self) -> Result<String, GameError> {
    let mut line = String::new();
    match self.reader.read_line(&mut line) {
      Ok(0) => Err(GameError::InputClosed),
      Ok(_) => Ok(line.trim_end_matches(['\r', '\n']).to_string()),
      Err(e) => {
        warn!(target: "party_quiz", error = %e, "Console read failed");
        Err(GameError::InputClosed)
      }
    }
  }
}

impl<R: BufRead, W: Write> InputChannel for ConsoleInput<R, W> {
  fn ask_int(&mut self, prompt: &str, min: i64, max: i64) -> Result<i64, GameError> {
    loop {
      self.say(prompt);
      let line = self.read_line()?;
      match line.trim().parse::<i64>() {
        Ok(n) if (min..=max).contains(&n) => return Ok(n),
        Ok(n) => {
          debug!(target: "party_quiz", n, min, max, "Integer out of range");
          self.say("Number out of range.");
        }
        Err(_) => self.say("ERROR: you must type a valid number."),
      }
    }
  }

  fn ask_letter(&mut self, prompt: &str) -> Result<char, GameError> {
    loop {
      self.say(prompt);
      let line = self.read_line()?.trim().to_uppercase();
      let mut chars = line.chars();
      match (chars.next(), chars.next()) {
        (Some(c @ 'A'..='D'), None) => return Ok(c),
        _ => self.say("ERROR: you must type one letter: A, B, C or D."),
      }
    }
  }

  fn ask_token(&mut self, prompt: &str, min_len: usize, max_len: usize) -> Result<String, GameError> {
    loop {
      self.say(prompt);
      let line = self.read_line()?;
      if line.chars().any(char::is_whitespace) {
        self.say("Blank spaces are not allowed.");
        continue;
      }
      let len = line.chars().count();
      if len > max_len {
        return Ok(line.chars().take(max_len).collect());
      }
      if len >= min_len {
        return Ok(line);
      }
      self.say(&format!("The minimum length is {min_len} characters."));
    }
  }

  fn wait_enter(&mut self, prompt: &str) -> Result<(), GameError> {
    self.say(prompt);
    self.read_line().map(|_| ())
  }
}

/// Console output: one line per message.
pub struct ConsoleOutput<W> {
  writer: W,
}

impl<W: Write> ConsoleOutput<W> {
  pub fn new(writer: W) -> Self {
    Self { writer }
  }
}

impl<W: Write> OutputChannel for ConsoleOutput<W> {
  fn emit(&mut self, text: &str) {
    if let Err(e) = writeln!(self.writer, "{text}") {
      warn!(target: "party_quiz", error = %e, "Console write failed");
    }
  }
}

#[cfg(test)]
pub mod testing {
  //! Scripted input and captured output for driving the engine in tests.

  use std::collections::VecDeque;

  use super::*;

  /// One scripted answer. `Reveal` reads the solution the debug flag appends to
  /// the prompt (` ==> (...)`), so tests can answer correctly without peeking.
  #[derive(Clone, Debug)]
  pub enum Reply {
    Int(i64),
    Letter(char),
    Token(String),
    Enter,
    Reveal,
  }

  #[derive(Default)]
  pub struct ScriptedInput {
    replies: VecDeque<Reply>,
    pub prompts: Vec<String>,
  }

  impl ScriptedInput {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
      Self { replies: replies.into_iter().collect(), prompts: Vec::new() }
    }

    pub fn remaining(&self) -> usize {
      self.replies.len()
    }

    fn next(&mut self, prompt: &str) -> Result<Reply, GameError> {
      self.prompts.push(prompt.to_string());
      self.replies.pop_front().ok_or(GameError::InputClosed)
    }

    fn revealed(prompt: &str) -> String {
      let start = prompt.find("==> (").map(|i| i + 5).unwrap_or_else(|| panic!("no solution in prompt: {prompt}"));
      let end = prompt[start..].find(')').map(|i| start + i).unwrap_or_else(|| panic!("unterminated solution: {prompt}"));
      prompt[start..end].to_string()
    }
  }

  impl InputChannel for ScriptedInput {
    fn ask_int(&mut self, prompt: &str, min: i64, max: i64) -> Result<i64, GameError> {
      let n = match self.next(prompt)? {
        Reply::Int(n) => n,
        Reply::Reveal => Self::revealed(prompt).parse().unwrap_or_else(|e| panic!("bad revealed int: {e}")),
        other => panic!("expected an int reply, got {other:?}"),
      };
      assert!((min..=max).contains(&n));
      Ok(n)
    }

    fn ask_letter(&mut self, prompt: &str) -> Result<char, GameError> {
      match self.next(prompt)? {
        Reply::Letter(c) => Ok(c),
        Reply::Reveal => Self::revealed(prompt).chars().next().ok_or(GameError::InputClosed),
        other => panic!("expected a letter reply, got {other:?}"),
      }
    }

    fn ask_token(&mut self, prompt: &str, _min_len: usize, _max_len: usize) -> Result<String, GameError> {
      match self.next(prompt)? {
        Reply::Token(t) => Ok(t),
        Reply::Reveal => Ok(Self::revealed(prompt)),
        other => panic!("expected a token reply, got {other:?}"),
      }
    }

    fn wait_enter(&mut self, prompt: &str) -> Result<(), GameError> {
      match self.next(prompt)? {
        Reply::Enter => Ok(()),
        other => panic!("expected Enter, got {other:?}"),
      }
    }
  }

  #[derive(Default)]
  pub struct CapturedOutput {
    pub lines: Vec<String>,
  }

  impl CapturedOutput {
    pub fn contains(&self, needle: &str) -> bool {
      self.lines.iter().any(|l| l.contains(needle))
    }
  }

  impl OutputChannel for CapturedOutput {
    fn emit(&mut self, text: &str) {
      self.lines.push(text.to_string());
    }
  }
}
