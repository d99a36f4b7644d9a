#![forbid(unsafe_code)]

//! End-to-end tests for the card form screen.
//!
//! Each test drives a [`Program`] with synthetic key events and asserts on
//! the rendered frame text and on what reached the submit sink.
//!
//! Run: `cargo test -p cardform-tui --test card_form_e2e`

use cardform_core::fields::{FieldId, FormFields};
use cardform_core::form::{FormConfig, RevalidateMode, ViewState};
use cardform_core::sink::RecordingSink;
use cardform_tui::app::{CardFormApp, Focus};
use cardform_tui::event::{Event, KeyCode, KeyEvent, Modifiers};
use cardform_tui::runtime::Program;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const WIDTH: u16 = 80;
const HEIGHT: u16 = 24;

type FormProgram = Program<CardFormApp<RecordingSink>>;

fn start_with(config: FormConfig) -> (FormProgram, RecordingSink) {
    let recorder = RecordingSink::new();
    let app = CardFormApp::with_config(recorder.clone(), config);
    (Program::new(app, WIDTH, HEIGHT), recorder)
}

fn start() -> (FormProgram, RecordingSink) {
    start_with(FormConfig::default())
}

fn type_text(program: &mut FormProgram, text: &str) {
    for c in text.chars() {
        program.send(Event::char(c));
    }
}

fn press(program: &mut FormProgram, code: KeyCode) {
    program.send(Event::key(code));
}

fn screen(program: &mut FormProgram) -> String {
    program.render().to_text()
}

/// Fill every input in order, leaving focus on the Confirm button.
fn fill(program: &mut FormProgram, values: [&str; 5]) {
    for value in values {
        type_text(program, value);
        press(program, KeyCode::Tab);
    }
}

const VALID: [&str; 5] = ["Jane Appleseed", "1234567891230000", "09", "28", "123"];

fn expected_valid() -> FormFields {
    FormFields::new()
        .with(FieldId::Name, "Jane Appleseed")
        .with(FieldId::CardNumber, "1234 5678 9123 0000")
        .with(FieldId::ExpiryMonth, "09")
        .with(FieldId::ExpiryYear, "28")
        .with(FieldId::Cvc, "123")
}

// ---------------------------------------------------------------------------
// Initial render
// ---------------------------------------------------------------------------

#[test]
fn initial_screen_shows_placeholders_and_labels() {
    let (mut program, _) = start();
    let text = screen(&mut program);

    for needle in [
        "JANE APPLESEED",
        "0000 0000 0000 0000",
        "00 / 00",
        "CVC 000",
        "Cardholder Name",
        "Card Number",
        "Exp. Date (MM)",
        "Exp. Date (YY)",
        "e.g. Jane Appleseed",
        "e.g. 1234 5678 9123 0000",
        "[ Confirm ]",
    ] {
        assert!(text.contains(needle), "missing {needle:?} in:\n{text}");
    }
    assert!(!text.contains("required"));
}

#[test]
fn focus_marker_follows_tab_and_cursor_is_placed() {
    let (mut program, _) = start();
    let name_row = text_row(&mut program, "Cardholder Name");
    assert!(name_row.starts_with('>'), "{name_row:?}");
    assert!(program.render().cursor().is_some());

    press(&mut program, KeyCode::Tab);
    let card_row = text_row(&mut program, "Card Number");
    assert!(card_row.starts_with('>'), "{card_row:?}");
    assert!(!text_row(&mut program, "Cardholder Name").starts_with('>'));

    press(&mut program, KeyCode::Up);
    press(&mut program, KeyCode::BackTab);
    assert_eq!(program.model().focus(), Focus::Confirm);
    assert!(program.render().cursor().is_none());
}

fn text_row(program: &mut FormProgram, needle: &str) -> String {
    screen(program)
        .lines()
        .find(|line| line.contains(needle))
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Live preview
// ---------------------------------------------------------------------------

#[test]
fn preview_tracks_typing() {
    let (mut program, _) = start();
    type_text(&mut program, "Jane");
    let text = screen(&mut program);
    assert!(!text.contains("JANE APPLESEED"));
    assert_eq!(text.matches("Jane").count(), 2, "preview and input:\n{text}");

    press(&mut program, KeyCode::Tab);
    type_text(&mut program, "12345");
    let text = screen(&mut program);
    assert_eq!(text.matches("1234 5").count(), 2);
    assert!(!text.contains("0000 0000 0000 0000"));

    press(&mut program, KeyCode::Backspace);
    assert_eq!(program.model().form().value(FieldId::CardNumber), "1234");
}

#[test]
fn masked_inputs_ignore_letters() {
    let (mut program, _) = start();
    press(&mut program, KeyCode::Tab);
    type_text(&mut program, "12ab34cd");
    press(&mut program, KeyCode::Tab);
    type_text(&mut program, "1x23");
    let form = program.model().form();
    assert_eq!(form.value(FieldId::CardNumber), "1234");
    assert_eq!(form.value(FieldId::ExpiryMonth), "12");
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[test]
fn valid_submit_shows_thank_you_and_emits_fields() {
    let (mut program, recorder) = start();
    fill(&mut program, VALID);
    assert_eq!(program.model().focus(), Focus::Confirm);
    press(&mut program, KeyCode::Enter);

    let text = screen(&mut program);
    assert!(text.contains("THANK YOU!"), "{text}");
    assert!(text.contains("We've added your card details"));
    assert!(text.contains("[ Go back ]"));
    assert!(!text.contains("[ Confirm ]"));
    assert_eq!(program.model().form().view_state(), ViewState::Submitted);

    assert_eq!(recorder.records(), vec![expected_valid()]);
    let json = recorder.records()[0].to_json().unwrap();
    assert!(json.contains("\"cardNumber\":\"1234 5678 9123 0000\""), "{json}");
    assert!(json.contains("\"mm\":\"09\""));
}

#[test]
fn enter_submits_from_any_input() {
    let (mut program, recorder) = start();
    fill(&mut program, VALID);
    press(&mut program, KeyCode::Up);
    assert_eq!(program.model().focus(), Focus::Field(FieldId::Cvc));
    press(&mut program, KeyCode::Enter);
    assert_eq!(recorder.len(), 1);
}

#[test]
fn empty_submit_shows_required_everywhere() {
    let (mut program, recorder) = start();
    press(&mut program, KeyCode::Enter);
    let text = screen(&mut program);
    for needle in [
        "name is required",
        "card number is required",
        "mm is required",
        "yy is required",
        "cvc is required",
    ] {
        assert!(text.contains(needle), "missing {needle:?}:\n{text}");
    }
    assert!(recorder.is_empty());
}

#[test]
fn short_name_shows_length_message_and_stays_editing() {
    let (mut program, recorder) = start();
    fill(&mut program, ["Jane", VALID[1], VALID[2], VALID[3], VALID[4]]);
    press(&mut program, KeyCode::Enter);

    let text = screen(&mut program);
    assert!(text.contains("name must be at least 8 characters long"), "{text}");
    assert!(!text.contains("name is required"));
    assert!(!text.contains("THANK YOU!"));
    assert!(recorder.is_empty());

    let report = program.model().form().report();
    assert!(report.has(FieldId::Name, cardform_core::validation::ErrorKind::Length));
    assert!(report.has(FieldId::Name, cardform_core::validation::ErrorKind::Format));
    assert_eq!(program.model().focus(), Focus::Field(FieldId::Name));
}

#[test]
fn bad_month_flags_month_only() {
    let (mut program, recorder) = start();
    fill(&mut program, [VALID[0], VALID[1], "13", VALID[3], VALID[4]]);
    press(&mut program, KeyCode::Enter);

    let text = screen(&mut program);
    assert!(text.contains("month must be valid"), "{text}");
    assert!(!text.contains("year must"));
    assert!(!text.contains("required"));
    assert!(!text.contains("characters long"));
    assert!(recorder.is_empty());
    assert_eq!(program.model().focus(), Focus::Field(FieldId::ExpiryMonth));
}

#[test]
fn space_on_confirm_submits() {
    let (mut program, recorder) = start();
    fill(&mut program, VALID);
    program.send(Event::char(' '));
    assert_eq!(recorder.len(), 1);
}

// ---------------------------------------------------------------------------
// Revalidation
// ---------------------------------------------------------------------------

#[test]
fn errors_persist_until_next_submit_by_default() {
    let (mut program, _) = start();
    press(&mut program, KeyCode::Enter);
    type_text(&mut program, "Jane Appleseed");
    assert!(screen(&mut program).contains("name is required"));
}

#[test]
fn on_change_revalidates_edited_field() {
    let (mut program, _) = start_with(FormConfig {
        revalidate: RevalidateMode::OnChange,
    });
    press(&mut program, KeyCode::Enter);
    type_text(&mut program, "Jane");
    let text = screen(&mut program);
    assert!(text.contains("name must be at least 8 characters long"), "{text}");

    type_text(&mut program, " Appleseed");
    let text = screen(&mut program);
    assert!(!text.contains("name must"), "{text}");
    assert!(text.contains("card number is required"));
}

// ---------------------------------------------------------------------------
// Go back
// ---------------------------------------------------------------------------

#[test]
fn go_back_clears_everything() {
    let (mut program, recorder) = start();
    fill(&mut program, VALID);
    press(&mut program, KeyCode::Enter);
    assert!(screen(&mut program).contains("THANK YOU!"));

    press(&mut program, KeyCode::Enter);
    let text = screen(&mut program);
    assert!(!text.contains("THANK YOU!"));
    for needle in ["JANE APPLESEED", "0000 0000 0000 0000", "00 / 00", "CVC 000"] {
        assert!(text.contains(needle), "missing {needle:?}:\n{text}");
    }
    assert!(!text.contains("required"));

    let model = program.model();
    assert_eq!(model.form().view_state(), ViewState::Editing);
    assert!(model.form().fields().is_empty());
    assert!(model.input(FieldId::Name).value().is_empty());
    assert_eq!(model.focus(), Focus::Field(FieldId::Name));
    assert_eq!(recorder.len(), 1);
}

#[test]
fn submitted_view_ignores_typing() {
    let (mut program, recorder) = start();
    fill(&mut program, VALID);
    press(&mut program, KeyCode::Enter);
    type_text(&mut program, "x");
    press(&mut program, KeyCode::Tab);
    program.send(Event::Paste("999".into()));
    assert_eq!(program.model().form().view_state(), ViewState::Submitted);
    assert_eq!(program.model().form().fields(), &expected_valid());

    program.send(Event::char(' '));
    assert_eq!(program.model().form().view_state(), ViewState::Editing);
    assert_eq!(recorder.len(), 1);
}

#[test]
fn second_round_submits_again() {
    let (mut program, recorder) = start();
    fill(&mut program, VALID);
    press(&mut program, KeyCode::Enter);
    press(&mut program, KeyCode::Enter);
    fill(&mut program, ["John Smithson", "4111111111111111", "12", "40", "999"]);
    press(&mut program, KeyCode::Enter);

    let records = recorder.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].card_number, "4111 1111 1111 1111");
    assert_eq!(records[1].expiry_year, "40");
}

// ---------------------------------------------------------------------------
// Quit and resize
// ---------------------------------------------------------------------------

#[test]
fn escape_and_ctrl_c_quit() {
    let (mut program, _) = start();
    press(&mut program, KeyCode::Escape);
    assert!(!program.is_running());

    let (mut program, _) = start();
    program.send(Event::Key(
        KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL),
    ));
    assert!(!program.is_running());
}

#[test]
fn resize_below_minimum_shows_notice_then_recovers() {
    let (mut program, _) = start();
    program.send(Event::Resize {
        width: 40,
        height: 10,
    });
    assert!(screen(&mut program).contains("Terminal too small"));
    program.send(Event::Resize {
        width: WIDTH,
        height: HEIGHT,
    });
    assert!(screen(&mut program).contains("Cardholder Name"));
}
