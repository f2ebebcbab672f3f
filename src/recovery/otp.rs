//! The 6-cell OTP input grid.
//!
//! Each cell holds `""` or one ASCII digit. Accepted input moves focus to the
//! next cell; backspace in an empty cell moves it back. The grid does not talk to
//! the network, the verification step owns it and reports every change upward.

use super::focus::{FocusHandle, FocusRegistry};
use regex::Regex;
use std::{fmt, sync::Arc};

pub const OTP_LENGTH: usize = 6;

/// Exactly six slots, each empty or a single decimal digit.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OtpDigits([String; OTP_LENGTH]);

impl OtpDigits {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a full code, e.g. from a paste. Anything other than six digits is rejected.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.chars().count() != OTP_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let mut digits = Self::new();
        for (slot, digit) in digits.0.iter_mut().zip(code.chars()) {
            *slot = digit.to_string();
        }
        Some(digits)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Concatenated cell values.
    #[must_use]
    pub fn code(&self) -> String {
        self.0.concat()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.code().len() == OTP_LENGTH
    }

    #[must_use]
    pub fn filled(&self) -> usize {
        self.0.iter().filter(|slot| !slot.is_empty()).count()
    }

    /// First empty cell, or the last cell when all are filled.
    #[must_use]
    pub fn next_empty(&self) -> usize {
        self.0
            .iter()
            .position(String::is_empty)
            .unwrap_or(OTP_LENGTH - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn set(&mut self, index: usize, value: &str) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = value.to_string();
        }
    }
}

impl PartialEq<[&str; OTP_LENGTH]> for OtpDigits {
    fn eq(&self, other: &[&str; OTP_LENGTH]) -> bool {
        self.0.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

// Codes are credentials, only the fill level is printed.
impl fmt::Debug for OtpDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OtpDigits({}/{OTP_LENGTH})", self.filled())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtpInputError {
    OutOfRange,
    Disabled,
    NotADigit,
}

impl fmt::Display for OtpInputError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpInputError::OutOfRange => write!(formatter, "cell index out of range"),
            OtpInputError::Disabled => write!(formatter, "input is disabled"),
            OtpInputError::NotADigit => write!(formatter, "only a single digit is allowed"),
        }
    }
}

impl std::error::Error for OtpInputError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Other,
}

/// Cell values are limited to `^\d*$` with at most one character.
fn is_cell_value(value: &str) -> bool {
    value.len() <= 1 && Regex::new(r"^[0-9]*$").is_ok_and(|re| re.is_match(value))
}

#[derive(Debug, Default)]
pub struct OtpGrid {
    digits: OtpDigits,
    focus: FocusRegistry,
    disabled: bool,
}

impl OtpGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial focus goes to the first cell.
    pub fn mount(&mut self) {
        self.focus.focus(0);
    }

    pub fn register_cell(&mut self, index: usize, handle: Arc<dyn FocusHandle>) {
        if index < OTP_LENGTH {
            self.focus.register(index, handle);
        }
    }

    pub fn unregister_cell(&mut self, index: usize) {
        self.focus.unregister(index);
    }

    /// Stores `value` in cell `index` and returns the updated sequence.
    ///
    /// # Errors
    /// Rejected input leaves every cell and the focus unchanged.
    pub fn input(&mut self, index: usize, value: &str) -> Result<OtpDigits, OtpInputError> {
        if index >= OTP_LENGTH {
            return Err(OtpInputError::OutOfRange);
        }
        if self.disabled {
            return Err(OtpInputError::Disabled);
        }
        if !is_cell_value(value) {
            return Err(OtpInputError::NotADigit);
        }

        self.digits.set(index, value);

        if !value.is_empty() && index < OTP_LENGTH - 1 {
            self.focus.focus(index + 1);
        }

        Ok(self.digits.clone())
    }

    /// Backspace in an empty cell retreats to the previous one.
    pub fn key_down(&mut self, index: usize, key: Key) {
        if self.disabled || key != Key::Backspace || index == 0 || index >= OTP_LENGTH {
            return;
        }
        if self.digits.get(index).is_some_and(str::is_empty) {
            self.focus.focus(index - 1);
        }
    }

    /// Empties every cell and refocuses the first one.
    pub fn clear(&mut self) -> OtpDigits {
        self.digits = OtpDigits::new();
        self.focus.focus(0);
        self.digits.clone()
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn digits(&self) -> &OtpDigits {
        &self.digits
    }

    #[must_use]
    pub fn focused(&self) -> Option<usize> {
        self.focus.focused()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::focus::tests::CountingHandle;

    fn mounted_grid() -> OtpGrid {
        let mut grid = OtpGrid::new();
        grid.mount();
        grid
    }

    #[test]
    fn mount_focuses_first_cell() {
        let grid = mounted_grid();
        assert_eq!(grid.focused(), Some(0));
    }

    #[test]
    fn rejects_non_digits_and_long_values() {
        let mut grid = mounted_grid();
        let accepted = grid.input(0, "7");
        assert_eq!(accepted.map(|digits| digits == ["7", "", "", "", "", ""]), Ok(true));

        for value in ["a", "12", " ", "-", "٣", "1a", "+"] {
            assert_eq!(grid.input(0, value), Err(OtpInputError::NotADigit), "{value}");
            assert_eq!(grid.digits().get(0), Some("7"));
        }
        assert_eq!(grid.focused(), Some(1));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let mut grid = mounted_grid();
        assert_eq!(grid.input(6, "1"), Err(OtpInputError::OutOfRange));
    }

    #[test]
    fn accepted_digits_advance_focus_one_cell_at_a_time() {
        let mut grid = mounted_grid();
        for index in 0..5 {
            assert!(grid.input(index, &index.to_string()).is_ok());
            assert_eq!(grid.focused(), Some(index + 1));
        }

        assert!(grid.input(5, "9").is_ok());
        assert_eq!(grid.focused(), Some(5));
        assert!(grid.digits().is_complete());
        assert_eq!(grid.digits().code(), "012349");
    }

    #[test]
    fn clearing_a_cell_keeps_focus() {
        let mut grid = mounted_grid();
        assert!(grid.input(0, "1").is_ok());
        assert_eq!(grid.focused(), Some(1));

        assert!(grid.input(0, "").is_ok());
        assert_eq!(grid.digits().get(0), Some(""));
        assert_eq!(grid.focused(), Some(1));
    }

    #[test]
    fn backspace_retreats_only_from_empty_cells() {
        let mut grid = mounted_grid();
        assert!(grid.input(0, "1").is_ok());
        assert!(grid.input(1, "2").is_ok());
        assert_eq!(grid.focused(), Some(2));

        grid.key_down(2, Key::Backspace);
        assert_eq!(grid.focused(), Some(1));

        // cell 1 still holds a digit
        grid.key_down(1, Key::Backspace);
        assert_eq!(grid.focused(), Some(1));

        grid.key_down(1, Key::Other);
        assert_eq!(grid.focused(), Some(1));
    }

    #[test]
    fn backspace_in_first_cell_stays() {
        let mut grid = mounted_grid();
        grid.key_down(0, Key::Backspace);
        assert_eq!(grid.focused(), Some(0));
    }

    #[test]
    fn disabled_grid_ignores_input() {
        let mut grid = mounted_grid();
        grid.set_disabled(true);
        assert_eq!(grid.input(0, "1"), Err(OtpInputError::Disabled));
        assert_eq!(grid.digits().filled(), 0);

        grid.set_disabled(false);
        assert!(grid.input(0, "1").is_ok());
    }

    #[test]
    fn clear_resets_cells_and_focus() {
        let mut grid = mounted_grid();
        for (index, digit) in ["4", "2", "4"].iter().enumerate() {
            assert!(grid.input(index, digit).is_ok());
        }
        let cleared = grid.clear();
        assert_eq!(cleared, ["", "", "", "", "", ""]);
        assert_eq!(grid.focused(), Some(0));
    }

    #[test]
    fn focus_handles_follow_entries() {
        let handles: Vec<Arc<CountingHandle>> =
            (0..OTP_LENGTH).map(|_| Arc::new(CountingHandle::default())).collect();
        let mut grid = OtpGrid::new();
        for (index, handle) in handles.iter().enumerate() {
            grid.register_cell(index, handle.clone());
        }
        grid.mount();
        assert!(grid.input(0, "1").is_ok());

        assert_eq!(handles[0].calls(), 1);
        assert_eq!(handles[1].calls(), 1);
        assert_eq!(handles[2].calls(), 0);
    }

    fn counted_grid() -> (OtpGrid, Vec<Arc<CountingHandle>>) {
        let handles: Vec<Arc<CountingHandle>> =
            (0..OTP_LENGTH).map(|_| Arc::new(CountingHandle::default())).collect();
        let mut grid = OtpGrid::new();
        for (index, handle) in handles.iter().enumerate() {
            grid.register_cell(index, handle.clone());
        }
        grid.mount();
        (grid, handles)
    }

    #[test]
    fn typing_into_the_same_cell_twice_advances_each_time() {
        let (mut grid, handles) = counted_grid();

        assert!(grid.input(0, "1").is_ok());
        // user clicks back into cell 0 and overwrites it
        assert!(grid.input(0, "2").is_ok());

        assert_eq!(handles[1].calls(), 2);
        assert_eq!(grid.focused(), Some(1));
        assert_eq!(grid.digits().get(0), Some("2"));
    }

    #[test]
    fn clear_refocuses_first_cell_even_if_never_left() {
        let (mut grid, handles) = counted_grid();
        assert_eq!(handles[0].calls(), 1);

        // real focus moved away by the user, logical focus still on cell 0
        let cleared = grid.clear();
        assert_eq!(cleared.filled(), 0);
        assert_eq!(handles[0].calls(), 2);
        assert_eq!(grid.focused(), Some(0));
    }

    #[test]
    fn digits_parse_and_next_empty() {
        assert!(OtpDigits::parse("12345").is_none());
        assert!(OtpDigits::parse("12345a").is_none());
        let digits = OtpDigits::parse(" 123456 ");
        assert_eq!(
            digits.as_ref().map(OtpDigits::code),
            Some("123456".to_string())
        );
        assert_eq!(digits.map(|d| d.next_empty()), Some(5));
        assert_eq!(OtpDigits::new().next_empty(), 0);
    }

    #[test]
    fn debug_hides_digits() {
        let digits = OtpDigits::parse("987654");
        assert_eq!(
            digits.map(|d| format!("{d:?}")),
            Some("OtpDigits(6/6)".to_string())
        );
    }
}
