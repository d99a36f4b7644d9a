#![forbid(unsafe_code)]

//! A grid of styled cells that views draw into.
//!
//! Every cell holds one grapheme cluster. A wide grapheme (display width 2)
//! occupies its own cell plus a continuation cell to its right, so column
//! arithmetic matches what the terminal shows. Drawing is clipped to the
//! frame; nothing panics on out-of-bounds coordinates.
//!
//! [`Frame::to_text`] renders the grid as plain text for assertions, and
//! [`Frame::present`] writes it to a terminal through crossterm commands.

use std::io::{self, Write};

use crossterm::style::{Attribute, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, style::Print, terminal};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::style::{Color, Style, StyleFlags};

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    content: String,
    style: Style,
    continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: String::from(" "),
            style: Style::DEFAULT,
            continuation: false,
        }
    }
}

impl Cell {
    /// The grapheme shown in this cell.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn style(&self) -> Style {
        self.style
    }

    /// Whether this cell is the right half of a wide grapheme.
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.continuation
    }
}

/// Drawing surface for one render pass.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    cursor: Option<(u16, u16)>,
}

impl Frame {
    /// Create a blank frame.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            cursor: None,
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Cell at `(x, y)`, if inside the frame.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Reset every cell and hide the cursor.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.cursor = None;
    }

    /// Resize, clearing content.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    /// Place the terminal cursor after presenting, or hide it with `None`.
    pub fn set_cursor(&mut self, position: Option<(u16, u16)>) {
        self.cursor = position.filter(|&(x, y)| x < self.width && y < self.height);
    }

    #[must_use]
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Draw `text` starting at `(x, y)`, clipped at `x + max_width` and the
    /// frame edge. Returns the column after the last drawn cell.
    pub fn draw_str_clipped(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        style: Style,
        max_width: u16,
    ) -> u16 {
        if y >= self.height {
            return x;
        }
        let limit = x.saturating_add(max_width).min(self.width);
        let mut col = x;
        for grapheme in text.graphemes(true) {
            let w = grapheme_width(grapheme);
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > limit {
                break;
            }
            self.put(col, y, grapheme, style);
            if w == 2 {
                self.put(col + 1, y, " ", style);
                if let Some(i) = self.index(col + 1, y) {
                    self.cells[i].content.clear();
                    self.cells[i].continuation = true;
                }
            }
            col += w;
        }
        col
    }

    /// Draw `text` at `(x, y)`, clipped to the frame edge.
    pub fn draw_str(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        self.draw_str_clipped(x, y, text, style, u16::MAX)
    }

    /// Draw `text` centred on row `y` between `x` and `x + width`.
    pub fn draw_centered(&mut self, x: u16, y: u16, width: u16, text: &str, style: Style) {
        let text_width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        let start = x + width.saturating_sub(text_width) / 2;
        self.draw_str_clipped(start, y, text, style, width.saturating_sub(start - x));
    }

    /// Fill a rectangle with spaces in `style`.
    pub fn fill(&mut self, x: u16, y: u16, width: u16, height: u16, style: Style) {
        for row in y..y.saturating_add(height).min(self.height) {
            for col in x..x.saturating_add(width).min(self.width) {
                self.put(col, row, " ", style);
            }
        }
    }

    /// Draw a single-line box border.
    pub fn draw_box(&mut self, x: u16, y: u16, width: u16, height: u16, style: Style) {
        if width < 2 || height < 2 {
            return;
        }
        let right = x + width - 1;
        let bottom = y + height - 1;
        for col in x + 1..right {
            self.put(col, y, "─", style);
            self.put(col, bottom, "─", style);
        }
        for row in y + 1..bottom {
            self.put(x, row, "│", style);
            self.put(right, row, "│", style);
        }
        self.put(x, y, "┌", style);
        self.put(right, y, "┐", style);
        self.put(x, bottom, "└", style);
        self.put(right, bottom, "┘", style);
    }

    /// Plain-text snapshot: one line per row, continuation cells skipped.
    #[must_use]
    pub fn to_text(&self) -> String {
        let capacity = (usize::from(self.width) + 1) * usize::from(self.height);
        let mut out = String::with_capacity(capacity);
        for y in 0..self.height {
            if y > 0 {
                out.push('\n');
            }
            for cell in self.row(y) {
                if !cell.continuation {
                    out.push_str(&cell.content);
                }
            }
        }
        out
    }

    /// Row `y` as text with trailing spaces removed.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let line: String = self
            .row(y)
            .filter(|c| !c.continuation)
            .map(|c| c.content.as_str())
            .collect();
        line.trim_end().to_string()
    }

    /// Write the frame to `out`: full repaint, then cursor placement.
    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(
            out,
            cursor::Hide,
            SetAttribute(Attribute::Reset),
            terminal::Clear(terminal::ClearType::All)
        )?;
        let mut current = Style::DEFAULT;
        for y in 0..self.height {
            queue!(out, cursor::MoveTo(0, y))?;
            for cell in self.row(y) {
                if cell.continuation {
                    continue;
                }
                if cell.style != current {
                    apply_style(out, cell.style)?;
                    current = cell.style;
                }
                queue!(out, Print(&cell.content))?;
            }
        }
        queue!(out, SetAttribute(Attribute::Reset))?;
        if let Some((x, y)) = self.cursor {
            queue!(out, cursor::MoveTo(x, y), cursor::Show)?;
        }
        out.flush()
    }

    fn row(&self, y: u16) -> impl Iterator<Item = &Cell> {
        let start = usize::from(y) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)].iter()
    }

    fn put(&mut self, x: u16, y: u16, grapheme: &str, style: Style) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        // Overwriting either half of a wide grapheme blanks the other half.
        if self.cells[i].continuation && x > 0 {
            self.cells[i - 1] = Cell::default();
        } else if grapheme_width(&self.cells[i].content) == 2
            && let Some(next) = self.index(x + 1, y)
        {
            self.cells[next] = Cell::default();
        }
        self.cells[i] = Cell {
            content: grapheme.to_string(),
            style,
            continuation: false,
        };
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }
}

/// Display width of a grapheme, clamped to 0..=2.
fn grapheme_width(grapheme: &str) -> u16 {
    match grapheme.width() {
        0 => 0,
        1 => 1,
        _ => 2,
    }
}

/// Display width of `text` in cells.
#[must_use]
pub fn text_width(text: &str) -> usize {
    text.graphemes(true).map(|g| usize::from(grapheme_width(g))).sum()
}

fn apply_style(out: &mut impl Write, style: Style) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(style.fg.unwrap_or(Color::Reset)),
        SetBackgroundColor(style.bg.unwrap_or(Color::Reset))
    )?;
    for (flag, attr) in [
        (StyleFlags::BOLD, Attribute::Bold),
        (StyleFlags::DIM, Attribute::Dim),
        (StyleFlags::UNDERLINE, Attribute::Underlined),
        (StyleFlags::REVERSE, Attribute::Reverse),
    ] {
        if style.has(flag) {
            queue!(out, SetAttribute(attr))?;
        }
    }
    Ok(())
}
