#![forbid(unsafe_code)]

//! Positional digit masks for numeric inputs.
//!
//! A mask pattern is a string where `9` marks a digit slot and every other
//! character is a literal separator, e.g. `9999 9999 9999 9999`. Conforming a
//! value keeps only ASCII digits, places them into the slots in order,
//! emits a literal only when a digit follows it, and drops digits beyond the
//! mask's capacity.
//!
//! Editing happens in "digit space": a cursor over the formatted value is
//! mapped to the number of digits before it, the digit string is edited, and
//! the result is conformed again. Separators are never edited directly.
//!
//! # Example
//!
//! ```rust
//! use cardform_core::mask::InputMask;
//!
//! let mask = InputMask::parse("9999 9999 9999 9999");
//! assert_eq!(mask.conform("12345"), "1234 5");
//! assert_eq!(mask.conform("1234-5678-9123-0000-99"), "1234 5678 9123 0000");
//! ```

/// Pattern character for a digit slot.
pub const DIGIT_SLOT: char = '9';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Digit,
    Literal(char),
}

/// A parsed positional input mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMask {
    pattern: String,
    slots: Vec<Slot>,
    capacity: usize,
}

impl InputMask {
    /// Parse a mask pattern.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let slots: Vec<Slot> = pattern
            .chars()
            .map(|c| {
                if c == DIGIT_SLOT {
                    Slot::Digit
                } else {
                    Slot::Literal(c)
                }
            })
            .collect();
        let capacity = slots.iter().filter(|s| **s == Slot::Digit).count();
        Self {
            pattern: pattern.to_string(),
            slots,
            capacity,
        }
    }

    /// The source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of digit slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length in chars of a completely filled value.
    #[must_use]
    pub fn full_len(&self) -> usize {
        self.slots.len()
    }

    /// Whether `c` may occupy a slot.
    #[must_use]
    pub fn accepts(&self, c: char) -> bool {
        c.is_ascii_digit()
    }

    /// Shape `raw` to the mask.
    #[must_use]
    pub fn conform(&self, raw: &str) -> String {
        let mut digits = raw.chars().filter(char::is_ascii_digit);
        let mut out = String::with_capacity(self.slots.len());
        let mut pending = String::new();
        for slot in &self.slots {
            match *slot {
                Slot::Literal(c) => pending.push(c),
                Slot::Digit => {
                    let Some(d) = digits.next() else {
                        break;
                    };
                    out.push_str(&pending);
                    pending.clear();
                    out.push(d);
                }
            }
        }
        out
    }

    /// Whether `value` is already conformed and fills every slot.
    #[must_use]
    pub fn is_complete(&self, value: &str) -> bool {
        self.conform(value) == value && value.chars().count() == self.slots.len()
    }

    /// Number of digits among the first `cursor` chars of `value`.
    #[must_use]
    pub fn digit_index_at(&self, value: &str, cursor: usize) -> usize {
        value
            .chars()
            .take(cursor)
            .filter(char::is_ascii_digit)
            .count()
    }

    /// Char position just after the `n`th digit of a conformed value.
    #[must_use]
    pub fn cursor_after(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let mut seen = 0;
        for (pos, slot) in self.slots.iter().enumerate() {
            if *slot == Slot::Digit {
                seen += 1;
                if seen == n {
                    return pos + 1;
                }
            }
        }
        self.slots.len()
    }

    /// Insert `ch` at `cursor`.
    ///
    /// Returns the new value and cursor, or `None` when `ch` is not a digit
    /// or the mask is full.
    #[must_use]
    pub fn insert(&self, value: &str, cursor: usize, ch: char) -> Option<(String, usize)> {
        if !self.accepts(ch) {
            return None;
        }
        let mut digits = digits_of(value);
        if digits.len() >= self.capacity {
            return None;
        }
        let at = self.digit_index_at(value, cursor).min(digits.len());
        digits.insert(at, ch);
        Some((self.conform(&digits), self.cursor_after(at + 1)))
    }

    /// Remove the digit before `cursor` (backspace).
    #[must_use]
    pub fn remove_before(&self, value: &str, cursor: usize) -> Option<(String, usize)> {
        let mut digits = digits_of(value);
        let at = self.digit_index_at(value, cursor).min(digits.len());
        if at == 0 {
            return None;
        }
        digits.remove(at - 1);
        Some((self.conform(&digits), self.cursor_after(at - 1)))
    }

    /// Remove the digit at or after `cursor` (delete).
    #[must_use]
    pub fn remove_at(&self, value: &str, cursor: usize) -> Option<(String, usize)> {
        let mut digits = digits_of(value);
        let at = self.digit_index_at(value, cursor);
        if at >= digits.len() {
            return None;
        }
        digits.remove(at);
        Some((self.conform(&digits), self.cursor_after(at)))
    }
}

// ASCII digits only, so byte and char indices coincide.
fn digits_of(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> InputMask {
        InputMask::parse("9999 9999 9999 9999")
    }

    #[test]
    fn parse_counts_slots() {
        let mask = card();
        assert_eq!(mask.capacity(), 16);
        assert_eq!(mask.full_len(), 19);
        assert_eq!(mask.pattern(), "9999 9999 9999 9999");
        assert_eq!(InputMask::parse("99").capacity(), 2);
    }

    #[test]
    fn conform_inserts_separators_between_digits_only() {
        let mask = card();
        assert_eq!(mask.conform(""), "");
        assert_eq!(mask.conform("1234"), "1234");
        assert_eq!(mask.conform("12345"), "1234 5");
        assert_eq!(mask.conform("1234567891230000"), "1234 5678 9123 0000");
    }

    #[test]
    fn conform_drops_non_digits_and_overflow() {
        let mask = card();
        assert_eq!(mask.conform("ab12 cd34"), "1234");
        assert_eq!(mask.conform("12345678912300001111"), "1234 5678 9123 0000");
        assert_eq!(InputMask::parse("99").conform("1x3y5"), "13");
    }

    #[test]
    fn conform_is_idempotent() {
        let mask = card();
        let once = mask.conform("9876 54 3210");
        assert_eq!(mask.conform(&once), once);
    }

    #[test]
    fn leading_literal_waits_for_a_digit() {
        let mask = InputMask::parse("(999)");
        assert_eq!(mask.conform(""), "");
        assert_eq!(mask.conform("1"), "(1");
        assert_eq!(mask.conform("123"), "(123");
    }

    #[test]
    fn completeness() {
        let mask = card();
        assert!(mask.is_complete("1234 5678 9123 0000"));
        assert!(!mask.is_complete("1234 5678 9123 000"));
        assert!(!mask.is_complete("1234567891230000"));
    }

    #[test]
    fn cursor_mapping() {
        let mask = card();
        assert_eq!(mask.cursor_after(0), 0);
        assert_eq!(mask.cursor_after(4), 4);
        assert_eq!(mask.cursor_after(5), 6);
        assert_eq!(mask.cursor_after(16), 19);
        assert_eq!(mask.digit_index_at("1234 5678", 5), 4);
        assert_eq!(mask.digit_index_at("1234 5678", 6), 5);
    }

    #[test]
    fn insert_at_end_crosses_separator() {
        let mask = card();
        let (value, cursor) = mask.insert("1234", 4, '5').unwrap();
        assert_eq!(value, "1234 5");
        assert_eq!(cursor, 6);
    }

    #[test]
    fn insert_in_middle_shifts_digits() {
        let mask = card();
        let (value, cursor) = mask.insert("1234 5", 2, '9').unwrap();
        assert_eq!(value, "1293 45");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn insert_rejects_non_digits_and_overflow() {
        let mask = InputMask::parse("99");
        assert!(mask.insert("1", 1, 'a').is_none());
        assert!(mask.insert("12", 2, '3').is_none());
    }

    #[test]
    fn backspace_removes_digit_and_trailing_separator() {
        let mask = card();
        let (value, cursor) = mask.remove_before("1234 5", 6).unwrap();
        assert_eq!(value, "1234");
        assert_eq!(cursor, 4);
        assert!(mask.remove_before("1234", 0).is_none());
    }

    #[test]
    fn backspace_after_separator_removes_previous_digit() {
        let mask = card();
        let (value, cursor) = mask.remove_before("1234 5678", 5).unwrap();
        assert_eq!(value, "1235 678");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn delete_removes_digit_under_cursor() {
        let mask = card();
        let (value, cursor) = mask.remove_at("1234 5", 0).unwrap();
        assert_eq!(value, "2345");
        assert_eq!(cursor, 0);
        assert!(mask.remove_at("1234", 4).is_none());
    }
}
