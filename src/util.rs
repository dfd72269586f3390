//! Small utility helpers used across modules.

use crate::config::NAME_MAX_LEN;

/// Cut a name to the fixed name column, never splitting a character.
pub fn truncate_name(name: &str) -> &str {
  match name.char_indices().nth(NAME_MAX_LEN) {
    Some((idx, _)) => &name[..idx],
    None => name,
  }
}

/// Truncate and left-align a name in the fixed-width name column.
pub fn pad_name(name: &str) -> String {
  format!("{:<width$}", truncate_name(name), width = NAME_MAX_LEN)
}

/// Option letter for a zero-based option index ('A' for 0).
pub fn option_letter(index: usize) -> char {
  (b'A' + index as u8) as char
}

/// Zero-based option index for a letter, case-insensitive.
pub fn option_index(letter: char) -> Option<usize> {
  let up = letter.to_ascii_uppercase();
  up.is_ascii_uppercase().then(|| (up as u8 - b'A') as usize)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_are_cut_and_padded_to_the_column() {
    assert_eq!(pad_name("Al"), "Al       ");
    assert_eq!(pad_name("Maximiliano"), "Maximilia");
    assert_eq!(truncate_name("ÑandúÑandú"), "ÑandúÑand");
  }

  #[test]
  fn letters_and_indices_line_up() {
    assert_eq!(option_letter(0), 'A');
    assert_eq!(option_letter(3), 'D');
    assert_eq!(option_index('c'), Some(2));
    assert_eq!(option_index('?'), None);
  }
}
