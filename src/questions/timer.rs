//! Timer: let a target number of seconds pass between two Enter presses.

use std::time::{Duration, Instant};

use crate::domain::Verdict;

pub const CPU_FAILURE: &str = "You failed, CPU!! That was far too quick...";

#[derive(Clone, Debug)]
pub struct TimerQuestion {
  target_seconds: u32,
  tolerance_seconds: f64,
  started: Option<Instant>,
}

impl TimerQuestion {
  pub fn new(target_seconds: u32, tolerance_seconds: f64) -> Self {
    Self { target_seconds, tolerance_seconds, started: None }
  }

  pub fn instructions(&self) -> String {
    format!(
      "Timer question. Once you press Enter, wait {} seconds and press Enter again. I'll keep the time...",
      self.target_seconds
    )
  }

  /// The solution is never stored; `reveal` has nothing to add.
  pub fn prompt_text(&self, _reveal: bool) -> String {
    "Tic... Tac...".to_string()
  }

  /// Record the start event.
  pub fn start_at(&mut self, at: Instant) {
    self.started = Some(at);
  }

  /// Judge the stop event against the recorded start.
  pub fn evaluate_at(&self, stopped: Instant) -> Verdict {
    let Some(started) = self.started else {
      return Verdict::miss("Wrong. The clock was never started.");
    };
    self.judge(stopped.saturating_duration_since(started))
  }

  pub fn judge(&self, elapsed: Duration) -> Verdict {
    let off = elapsed.as_secs_f64() - f64::from(self.target_seconds);
    if off.abs() <= self.tolerance_seconds {
      Verdict::hit("Correct!!!!!")
    } else {
      Verdict::miss(format!("Wrong. You were off from the target time by {off:+.2} seconds."))
    }
  }

  pub fn cpu_verdict() -> Verdict {
    Verdict::miss(CPU_FAILURE)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn within_half_a_second_is_correct() {
    let q = TimerQuestion::new(3, 0.5);
    assert!(q.judge(Duration::from_millis(3000)).is_correct());
    assert!(q.judge(Duration::from_millis(2500)).is_correct());
    assert!(q.judge(Duration::from_millis(3500)).is_correct());
    assert!(!q.judge(Duration::from_millis(3501)).is_correct());
    assert!(!q.judge(Duration::from_millis(2400)).is_correct());
  }

  #[test]
  fn miss_reports_signed_offset() {
    let q = TimerQuestion::new(2, 0.5);
    assert!(q.judge(Duration::from_millis(3250)).message().contains("+1.25"));
    assert!(q.judge(Duration::from_millis(500)).message().contains("-1.50"));
  }

  #[test]
  fn start_and_stop_instants() {
    let mut q = TimerQuestion::new(1, 0.5);
    let t0 = Instant::now();
    assert!(!q.evaluate_at(t0).is_correct());
    q.start_at(t0);
    assert!(q.evaluate_at(t0 + Duration::from_millis(1200)).is_correct());
    assert!(!q.evaluate_at(t0 + Duration::from_millis(100)).is_correct());
  }

  #[test]
  fn cpu_always_fails() {
    assert!(!TimerQuestion::cpu_verdict().is_correct());
  }
}
