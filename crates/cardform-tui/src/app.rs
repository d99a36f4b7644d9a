#![forbid(unsafe_code)]

//! The card form screen.
//!
//! [`CardFormApp`] wires a [`FormController`] to five [`TextField`]s and a
//! confirm button. Every edit is pushed into the controller, and the card
//! preview is re-rendered from the controller's values on every frame.
//!
//! # Keybindings
//!
//! | Key | Editing | Submitted |
//! |-----|---------|-----------|
//! | Tab / Down | next input | – |
//! | Shift+Tab / Up | previous input | – |
//! | Enter | submit | go back |
//! | Space | submit (on Confirm) | go back |
//! | Esc / Ctrl+C | quit | quit |

use cardform_core::fields::FieldId;
use cardform_core::form::{FormConfig, FormController, SubmitOutcome, ViewState};
use cardform_core::sink::SubmitSink;

use crate::event::{Event, KeyCode, KeyEvent};
use crate::frame::Frame;
use crate::input::{FieldStyles, TextField};
use crate::runtime::{Cmd, Model};
use crate::style::{Color, Style};

/// Smallest terminal the form lays out in.
pub const MIN_WIDTH: u16 = 60;
/// Smallest terminal height the form lays out in.
pub const MIN_HEIGHT: u16 = 22;

const MARGIN: u16 = 2;
const LABEL_WIDTH: u16 = 17;
const CARD_WIDTH: u16 = 42;
const CARD_HEIGHT: u16 = 6;
const FORM_TOP: u16 = 8;

const CONFIRM_LABEL: &str = "[ Confirm ]";
const GO_BACK_LABEL: &str = "[ Go back ]";
const THANK_YOU: &str = "THANK YOU!";
const CONFIRMATION: &str = "We've added your card details";
const EDIT_HINTS: &str = "Tab/↓ next  Shift+Tab/↑ prev  Enter confirm  Esc quit";
const DONE_HINTS: &str = "Enter go back  Esc quit";

/// Focus target in the editing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// One of the five inputs.
    Field(FieldId),
    /// The Confirm button.
    Confirm,
}

impl Focus {
    const RING: [Focus; 6] = [
        Focus::Field(FieldId::Name),
        Focus::Field(FieldId::CardNumber),
        Focus::Field(FieldId::ExpiryMonth),
        Focus::Field(FieldId::ExpiryYear),
        Focus::Field(FieldId::Cvc),
        Focus::Confirm,
    ];

    fn position(self) -> usize {
        match self {
            Focus::Field(field) => field.index(),
            Focus::Confirm => Self::RING.len() - 1,
        }
    }

    fn next(self) -> Self {
        Self::RING[(self.position() + 1) % Self::RING.len()]
    }

    fn prev(self) -> Self {
        Self::RING[(self.position() + Self::RING.len() - 1) % Self::RING.len()]
    }

    fn field(self) -> Option<FieldId> {
        match self {
            Focus::Field(field) => Some(field),
            Focus::Confirm => None,
        }
    }
}

/// Colours used by the form.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub card: Style,
    pub card_number: Style,
    pub label: Style,
    pub input: FieldStyles,
    pub focused_input: FieldStyles,
    pub error: Style,
    pub button: Style,
    pub focused_button: Style,
    pub heading: Style,
    pub hint: Style,
}

impl Default for Theme {
    fn default() -> Self {
        let violet = Color::Rgb {
            r: 0x60,
            g: 0x05,
            b: 0x94,
        };
        let dark_violet = Color::Rgb {
            r: 0x21,
            g: 0x09,
            b: 0x2f,
        };
        Self {
            card: Style::new().fg(Color::White).bg(violet),
            card_number: Style::new().fg(Color::White).bg(violet).bold(),
            label: Style::new().fg(dark_violet).bold(),
            input: FieldStyles {
                text: Style::new().underline(),
                placeholder: Style::new().dim(),
            },
            focused_input: FieldStyles {
                text: Style::new().underline().bold(),
                placeholder: Style::new().dim(),
            },
            error: Style::new().fg(Color::Red),
            button: Style::new().fg(Color::White).bg(dark_violet),
            focused_button: Style::new().fg(Color::White).bg(violet).bold(),
            heading: Style::new().fg(dark_violet).bold(),
            hint: Style::new().dim(),
        }
    }
}

/// Card details form model.
#[derive(Debug)]
pub struct CardFormApp<S> {
    form: FormController<S>,
    inputs: [TextField; 5],
    focus: Focus,
    theme: Theme,
}

impl<S: SubmitSink> CardFormApp<S> {
    /// Create the form with default settings.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, FormConfig::default())
    }

    /// Create the form with explicit controller settings.
    pub fn with_config(sink: S, config: FormConfig) -> Self {
        let inputs = FieldId::ALL.map(|field| {
            TextField::new()
                .with_placeholder(field.input_placeholder())
                .with_mask(field.mask())
        });
        Self {
            form: FormController::with_config(sink, config),
            inputs,
            focus: Focus::Field(FieldId::Name),
            theme: Theme::default(),
        }
    }

    /// Replace the colour theme (builder).
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn form(&self) -> &FormController<S> {
        &self.form
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub fn input(&self, field: FieldId) -> &TextField {
        &self.inputs[field.index()]
    }

    // --- Update ---

    fn handle_key(&mut self, key: KeyEvent) -> Cmd<Event> {
        if key.code == KeyCode::Escape || (key.ctrl() && key.is_char('c')) {
            tracing::info!("quit requested");
            return Cmd::quit();
        }
        match self.form.view_state() {
            ViewState::Editing => self.handle_editing_key(key),
            ViewState::Submitted => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.go_back();
                }
                Cmd::none()
            }
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Cmd<Event> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.move_focus(self.focus.next()),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(self.focus.prev()),
            KeyCode::Enter => self.submit(),
            KeyCode::Char(' ') if self.focus == Focus::Confirm => self.submit(),
            _ => self.edit_focused(&Event::Key(key)),
        }
        Cmd::none()
    }

    fn edit_focused(&mut self, event: &Event) {
        let Some(field) = self.focus.field() else {
            return;
        };
        let input = &mut self.inputs[field.index()];
        let before = input.value().to_string();
        if !input.handle_event(event) || input.value() == before {
            return;
        }
        if let Err(err) = self.form.set_field(field, input.value()) {
            tracing::warn!(error = %err, "edit dropped");
        }
    }

    fn move_focus(&mut self, to: Focus) {
        if let Some(field) = self.focus.field() {
            self.form.mark_touched(field);
        }
        tracing::debug!(from = ?self.focus, to = ?to, "focus moved");
        self.focus = to;
    }

    fn submit(&mut self) {
        match self.form.submit() {
            Ok(SubmitOutcome::Submitted(_)) => {}
            Ok(SubmitOutcome::Rejected(report)) => {
                // Jump to the first field that failed.
                if let Some(field) = report.failing().fields().next() {
                    self.move_focus(Focus::Field(field));
                }
            }
            Err(err) => tracing::warn!(error = %err, "submit dropped"),
        }
    }

    fn go_back(&mut self) {
        match self.form.reset() {
            Ok(()) => {
                for input in &mut self.inputs {
                    input.clear();
                }
                self.focus = Focus::Field(FieldId::Name);
            }
            Err(err) => tracing::warn!(error = %err, "reset dropped"),
        }
    }

    // --- View ---

    fn view_too_small(&self, frame: &mut Frame) {
        let msg = format!("Terminal too small (need {MIN_WIDTH}x{MIN_HEIGHT})");
        frame.draw_centered(0, frame.height() / 2, frame.width(), &msg, self.theme.error);
    }

    fn view_card(&self, frame: &mut Frame) {
        let preview = self.form.preview();
        let (x, y) = (MARGIN, 1);
        let inner = CARD_WIDTH - 4;
        frame.fill(x, y, CARD_WIDTH, CARD_HEIGHT, self.theme.card);
        frame.draw_box(x, y, CARD_WIDTH, CARD_HEIGHT, self.theme.card);

        frame.draw_str(x + 2, y + 1, "●  ○", self.theme.card);
        frame.draw_str_clipped(x + 2, y + 2, &preview.card_number, self.theme.card_number, inner);

        let expiry = preview.expiry();
        let expiry_width = u16::try_from(crate::frame::text_width(&expiry)).unwrap_or(inner);
        let name_width = inner.saturating_sub(expiry_width + 1);
        frame.draw_str_clipped(x + 2, y + 3, &preview.name, self.theme.card, name_width);
        frame.draw_str(x + 2 + inner - expiry_width, y + 3, &expiry, self.theme.card);

        let cvc = format!("CVC {}", preview.cvc);
        let cvc_width = u16::try_from(crate::frame::text_width(&cvc)).unwrap_or(inner);
        frame.draw_str(x + 2 + inner - cvc_width.min(inner), y + 4, &cvc, self.theme.card);
    }

    fn view_editing(&self, frame: &mut Frame) {
        self.view_card(frame);

        let input_x = MARGIN + LABEL_WIDTH;
        let input_width = frame.width().saturating_sub(input_x + MARGIN).min(32);
        let mut cursor = None;

        for field in FieldId::ALL {
            let row = FORM_TOP + 2 * u16::try_from(field.index()).unwrap_or(0);
            let focused = self.focus == Focus::Field(field);
            if focused {
                frame.draw_str(0, row, ">", self.theme.label);
            }
            frame.draw_str(MARGIN, row, field.label(), self.theme.label);

            let styles = if focused {
                self.theme.focused_input
            } else {
                self.theme.input
            };
            let input = &self.inputs[field.index()];
            if let Some(pos) = input.render(frame, input_x, row, input_width, styles, focused) {
                cursor = Some(pos);
            }

            if let Some(message) = self.form.error(field) {
                frame.draw_str(input_x, row + 1, &message, self.theme.error);
            }
        }

        let button_row = FORM_TOP + 2 * 5 + 1;
        let confirm_focused = self.focus == Focus::Confirm;
        if confirm_focused {
            frame.draw_str(0, button_row, ">", self.theme.label);
        }
        let button_style = if confirm_focused {
            self.theme.focused_button
        } else {
            self.theme.button
        };
        frame.draw_str(input_x, button_row, CONFIRM_LABEL, button_style);

        frame.draw_str(MARGIN, frame.height() - 1, EDIT_HINTS, self.theme.hint);
        frame.set_cursor(cursor);
    }

    fn view_submitted(&self, frame: &mut Frame) {
        self.view_card(frame);

        let width = frame.width();
        let top = FORM_TOP + 2;
        frame.draw_centered(0, top, width, "✓", self.theme.heading);
        frame.draw_centered(0, top + 2, width, THANK_YOU, self.theme.heading);
        frame.draw_centered(0, top + 3, width, CONFIRMATION, self.theme.label);
        frame.draw_centered(0, top + 5, width, GO_BACK_LABEL, self.theme.focused_button);

        frame.draw_str(MARGIN, frame.height() - 1, DONE_HINTS, self.theme.hint);
        frame.set_cursor(None);
    }
}

impl<S: SubmitSink> Model for CardFormApp<S> {
    type Message = Event;

    fn update(&mut self, msg: Event) -> Cmd<Event> {
        match msg {
            Event::Key(key) if key.is_actionable() => self.handle_key(key),
            Event::Paste(_) if self.form.view_state() == ViewState::Editing => {
                self.edit_focused(&msg);
                Cmd::none()
            }
            _ => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        if frame.width() < MIN_WIDTH || frame.height() < MIN_HEIGHT {
            self.view_too_small(frame);
            return;
        }
        match self.form.view_state() {
            ViewState::Editing => self.view_editing(frame),
            ViewState::Submitted => self.view_submitted(frame),
        }
    }
}
