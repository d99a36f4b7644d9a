#![forbid(unsafe_code)]

//! Single-line text field.
//!
//! Plain fields edit by grapheme cluster. Masked fields edit in digit space
//! through an [`InputMask`]: typed non-digits are dropped, separators are
//! inserted and removed by the mask, and the cursor skips over them.

use cardform_core::mask::InputMask;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::event::{Event, KeyCode, KeyEvent, Modifiers};
use crate::frame::Frame;
use crate::style::Style;

/// Styles used when drawing a [`TextField`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStyles {
    /// Value text and the field background.
    pub text: Style,
    /// Placeholder text.
    pub placeholder: Style,
}

/// Editable single-line value with a cursor.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    /// Text value.
    value: String,
    /// Cursor position (grapheme index; equals char index for masked values).
    cursor: usize,
    /// Shown dimmed while the value is empty.
    placeholder: String,
    mask: Option<InputMask>,
}

impl TextField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder (builder).
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Constrain input through `mask` (builder).
    #[must_use]
    pub fn with_mask(mut self, mask: Option<InputMask>) -> Self {
        self.mask = mask;
        let value = std::mem::take(&mut self.value);
        self.set_value(value);
        self
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    #[must_use]
    pub fn mask(&self) -> Option<&InputMask> {
        self.mask.as_ref()
    }

    /// Cursor position in graphemes.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the value (conformed when masked) and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.value = match &self.mask {
            Some(mask) => mask.conform(&value),
            None => value,
        };
        self.cursor = self.grapheme_count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Handle an input event. Returns `true` if the value or cursor changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.is_actionable() => self.handle_key(key),
            Event::Paste(text) => self.insert_str(text),
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        match key.code {
            KeyCode::Char(c) if !ctrl && !key.alt() => self.insert_char(c),
            KeyCode::Backspace => self.delete_back(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_to(self.cursor + 1),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(self.grapheme_count()),
            _ => false,
        }
    }

    // --- Editing operations ---

    /// Insert `c` at the cursor.
    pub fn insert_char(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        match &self.mask {
            Some(mask) => match mask.insert(&self.value, self.cursor, c) {
                Some((value, cursor)) => {
                    self.value = value;
                    self.cursor = cursor;
                    true
                }
                None => false,
            },
            None => {
                let offset = self.grapheme_byte_offset(self.cursor);
                self.value.insert(offset, c);
                // A combining mark joins the previous cluster.
                self.cursor = self.value[..offset + c.len_utf8()].graphemes(true).count();
                true
            }
        }
    }

    /// Insert each char of `text` at the cursor, dropping line breaks.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let mut changed = false;
        for c in text.chars().filter(|c| !c.is_control()) {
            changed |= self.insert_char(c);
        }
        changed
    }

    fn delete_back(&mut self) -> bool {
        if let Some(mask) = &self.mask {
            return match mask.remove_before(&self.value, self.cursor) {
                Some((value, cursor)) => {
                    self.value = value;
                    self.cursor = cursor;
                    true
                }
                None => false,
            };
        }
        if self.cursor == 0 {
            return false;
        }
        let start = self.grapheme_byte_offset(self.cursor - 1);
        let end = self.grapheme_byte_offset(self.cursor);
        self.value.drain(start..end);
        self.cursor -= 1;
        true
    }

    fn delete_forward(&mut self) -> bool {
        if let Some(mask) = &self.mask {
            return match mask.remove_at(&self.value, self.cursor) {
                Some((value, cursor)) => {
                    self.value = value;
                    self.cursor = cursor;
                    true
                }
                None => false,
            };
        }
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        let start = self.grapheme_byte_offset(self.cursor);
        let end = self.grapheme_byte_offset(self.cursor + 1);
        self.value.drain(start..end);
        true
    }

    fn move_to(&mut self, cursor: usize) -> bool {
        let cursor = cursor.min(self.grapheme_count());
        let moved = cursor != self.cursor;
        self.cursor = cursor;
        moved
    }

    // --- Rendering ---

    /// Draw the field into a `width`-cell slot at `(x, y)`.
    ///
    /// Scrolls horizontally to keep the cursor visible. Returns the cursor
    /// cell when `focused`.
    pub fn render(
        &self,
        frame: &mut Frame,
        x: u16,
        y: u16,
        width: u16,
        styles: FieldStyles,
        focused: bool,
    ) -> Option<(u16, u16)> {
        if width == 0 {
            return None;
        }
        let style = styles.text;
        frame.fill(x, y, width, 1, style);
        if self.value.is_empty() {
            frame.draw_str_clipped(x, y, &self.placeholder, style.patch(styles.placeholder), width);
            return focused.then_some((x, y));
        }

        let viewport = usize::from(width);
        let cursor_col = self.cursor_visual_pos();
        let scroll = (cursor_col + 1).saturating_sub(viewport);

        let mut col = 0usize;
        let mut out = x;
        for g in self.value.graphemes(true) {
            let w = g.width();
            if col >= scroll {
                if col + w > scroll + viewport {
                    break;
                }
                out = frame.draw_str_clipped(out, y, g, style, width - (out - x));
            }
            col += w;
        }

        let visible = u16::try_from(cursor_col - scroll).unwrap_or(u16::MAX);
        focused.then_some((x.saturating_add(visible), y))
    }

    // --- Internal helpers ---

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn cursor_visual_pos(&self) -> usize {
        self.value
            .graphemes(true)
            .take(self.cursor)
            .map(UnicodeWidthStr::width)
            .sum()
    }
}
