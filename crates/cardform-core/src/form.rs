#![forbid(unsafe_code)]

//! Form state controller.
//!
//! [`FormController`] owns the current field-set, the two-state view mode,
//! the last validation report and per-field tracking sets. It is the only
//! mutable state of the card form.
//!
//! # View states
//!
//! ```text
//!            submit() with a valid field-set
//!   Editing ────────────────────────────────▶ Submitted
//!      ▲                                          │
//!      └──────────────── reset() ◀────────────────┘
//! ```
//!
//! `set_field` and `submit` are only available while editing; `reset` only
//! once submitted. Calling them in the wrong state returns
//! [`FormError::InvalidState`] and changes nothing.

use std::fmt;
use std::str::FromStr;

use crate::error::FormError;
use crate::fields::{FieldId, FieldSet, FormFields};
use crate::preview::CardPreview;
use crate::schema::{CardSchema, ValidationReport};
use crate::sink::SubmitSink;

/// The form's display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewState {
    /// Inputs are shown and editable.
    #[default]
    Editing,
    /// The confirmation view is shown.
    Submitted,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Editing => f.write_str("editing"),
            Self::Submitted => f.write_str("submitted"),
        }
    }
}

/// When field edits re-run validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RevalidateMode {
    /// Only `submit` validates.
    #[default]
    OnSubmit,
    /// After the first submit attempt, every edit re-validates its field.
    OnChange,
}

impl RevalidateMode {
    /// Short name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnSubmit => "submit",
            Self::OnChange => "change",
        }
    }
}

impl FromStr for RevalidateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submit" | "on-submit" => Ok(Self::OnSubmit),
            "change" | "on-change" => Ok(Self::OnChange),
            other => Err(format!("unknown revalidate mode: {other}")),
        }
    }
}

/// Controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormConfig {
    /// When edits re-run validation.
    pub revalidate: RevalidateMode,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every rule passed; carries the emitted field-set.
    Submitted(FormFields),
    /// At least one rule failed; the view stays in editing.
    Rejected(ValidationReport),
}

impl SubmitOutcome {
    /// Whether the submit went through.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// Holds the live field-set and drives the editing/submitted transitions.
pub struct FormController<S> {
    schema: CardSchema,
    config: FormConfig,
    fields: FormFields,
    view: ViewState,
    report: ValidationReport,
    touched: FieldSet,
    dirty: FieldSet,
    validated: FieldSet,
    submit_count: u32,
    sink: S,
}

impl<S: SubmitSink> FormController<S> {
    /// Create a controller with the default configuration.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, FormConfig::default())
    }

    /// Create a controller with an explicit configuration.
    pub fn with_config(sink: S, config: FormConfig) -> Self {
        Self {
            schema: CardSchema::new(),
            config,
            fields: FormFields::default(),
            view: ViewState::Editing,
            report: ValidationReport::default(),
            touched: FieldSet::empty(),
            dirty: FieldSet::empty(),
            validated: FieldSet::empty(),
            submit_count: 0,
            sink,
        }
    }

    // --- Accessors ---

    /// Current view state.
    pub fn view_state(&self) -> ViewState {
        self.view
    }

    /// Current field values.
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Current value of one field.
    pub fn value(&self, field: FieldId) -> &str {
        self.fields.get(field)
    }

    /// Preview text for the current values.
    pub fn preview(&self) -> CardPreview {
        CardPreview::from_fields(&self.fields)
    }

    /// The last stored validation report.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Message displayed beneath `field`, if it failed.
    pub fn error(&self, field: FieldId) -> Option<String> {
        self.report.message(field)
    }

    /// Fields whose input has lost focus at least once.
    pub fn touched(&self) -> FieldSet {
        self.touched
    }

    /// Fields whose value differs from the initial empty value.
    pub fn dirty(&self) -> FieldSet {
        self.dirty
    }

    /// Fields that have been through validation.
    pub fn validated(&self) -> FieldSet {
        self.validated
    }

    /// Number of submit attempts since the last reset.
    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Active configuration.
    pub fn config(&self) -> FormConfig {
        self.config
    }

    /// The submit sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the submit sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // --- Operations ---

    /// Update a field's live value.
    ///
    /// Masked fields are conformed through their mask first. No validation
    /// runs unless [`RevalidateMode::OnChange`] is active and the form has
    /// already been submitted once.
    pub fn set_field(&mut self, field: FieldId, value: impl Into<String>) -> Result<(), FormError> {
        self.ensure(ViewState::Editing, "set_field")?;
        let raw = value.into();
        let value = match field.mask() {
            Some(mask) => mask.conform(&raw),
            None => raw,
        };
        let is_dirty = !value.is_empty();
        self.dirty.set(field.flag(), is_dirty);
        *self.fields.get_mut(field) = value;
        tracing::debug!(
            field = field.key(),
            len = self.fields.get(field).chars().count(),
            "field updated"
        );

        if self.config.revalidate == RevalidateMode::OnChange && self.submit_count > 0 {
            let errors = self.schema.validate_field(field, self.fields.get(field));
            self.report.set(field, errors);
            self.validated |= field.flag();
        }
        Ok(())
    }

    /// Update a field addressed by its wire key.
    pub fn set_field_by_key(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let field =
            FieldId::from_key(key).ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        self.set_field(field, value)
    }

    /// Record that `field`'s input lost focus.
    pub fn mark_touched(&mut self, field: FieldId) {
        self.touched |= field.flag();
    }

    /// Validate the full field-set and, if it passes, emit it and switch to
    /// the submitted view.
    pub fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        self.ensure(ViewState::Editing, "submit")?;
        self.submit_count = self.submit_count.saturating_add(1);
        self.validated = FieldSet::all();
        self.report = self.schema.validate(&self.fields);

        if self.report.is_valid() {
            self.sink.accept(&self.fields);
            self.view = ViewState::Submitted;
            tracing::info!(attempt = self.submit_count, "form submitted");
            Ok(SubmitOutcome::Submitted(self.fields.clone()))
        } else {
            tracing::info!(
                attempt = self.submit_count,
                failing = self.report.len(),
                "submit rejected"
            );
            Ok(SubmitOutcome::Rejected(self.report.clone()))
        }
    }

    /// Clear every field and return to the editing view.
    pub fn reset(&mut self) -> Result<(), FormError> {
        self.ensure(ViewState::Submitted, "reset")?;
        self.fields = FormFields::default();
        self.report = ValidationReport::default();
        self.touched = FieldSet::empty();
        self.dirty = FieldSet::empty();
        self.validated = FieldSet::empty();
        self.submit_count = 0;
        self.view = ViewState::Editing;
        tracing::info!("form reset");
        Ok(())
    }

    fn ensure(&self, expected: ViewState, operation: &'static str) -> Result<(), FormError> {
        if self.view == expected {
            Ok(())
        } else {
            tracing::warn!(operation, state = %self.view, "operation rejected");
            Err(FormError::InvalidState {
                operation,
                state: self.view,
            })
        }
    }
}

impl<S> fmt::Debug for FormController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("view", &self.view)
            .field("config", &self.config)
            .field("failing", &self.report.len())
            .field("touched", &self.touched)
            .field("dirty", &self.dirty)
            .field("submit_count", &self.submit_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use crate::validation::ErrorKind;

    fn fill_valid(form: &mut FormController<RecordingSink>) {
        form.set_field(FieldId::Name, "Jane Appleseed").unwrap();
        form.set_field(FieldId::CardNumber, "1234 5678 9123 0000").unwrap();
        form.set_field(FieldId::ExpiryMonth, "09").unwrap();
        form.set_field(FieldId::ExpiryYear, "28").unwrap();
        form.set_field(FieldId::Cvc, "123").unwrap();
    }

    #[test]
    fn starts_editing_and_empty() {
        let form = FormController::new(RecordingSink::new());
        assert_eq!(form.view_state(), ViewState::Editing);
        assert!(form.fields().is_empty());
        assert!(form.preview().is_placeholder());
        assert!(form.report().is_valid());
    }

    #[test]
    fn valid_submit_transitions_and_emits_unchanged_fields() {
        let recorder = RecordingSink::new();
        let mut form = FormController::new(recorder.clone());
        fill_valid(&mut form);
        let expected = form.fields().clone();

        let outcome = form.submit().unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted(expected.clone()));
        assert_eq!(form.view_state(), ViewState::Submitted);
        assert_eq!(recorder.records(), vec![expected]);
    }

    #[test]
    fn invalid_submit_stays_editing_and_stores_report() {
        let recorder = RecordingSink::new();
        let mut form = FormController::new(recorder.clone());
        fill_valid(&mut form);
        form.set_field(FieldId::Name, "Jane").unwrap();

        let outcome = form.submit().unwrap();
        assert!(!outcome.is_submitted());
        assert_eq!(form.view_state(), ViewState::Editing);
        assert!(recorder.is_empty());
        assert!(form.report().has(FieldId::Name, ErrorKind::Length));
        assert!(form.report().has(FieldId::Name, ErrorKind::Format));
        assert!(!form.report().has(FieldId::Name, ErrorKind::Required));
        assert_eq!(form.error(FieldId::Cvc), None);
        assert_eq!(form.validated(), FieldSet::all());
    }

    #[test]
    fn set_field_masks_numeric_input() {
        let mut form = FormController::new(RecordingSink::new());
        form.set_field(FieldId::CardNumber, "1234567891230000").unwrap();
        assert_eq!(form.value(FieldId::CardNumber), "1234 5678 9123 0000");
        form.set_field(FieldId::ExpiryMonth, "1a23").unwrap();
        assert_eq!(form.value(FieldId::ExpiryMonth), "12");
        form.set_field(FieldId::Name, "  free text 42 ").unwrap();
        assert_eq!(form.value(FieldId::Name), "  free text 42 ");
    }

    #[test]
    fn set_field_does_not_validate_by_default() {
        let mut form = FormController::new(RecordingSink::new());
        form.submit().unwrap();
        assert!(form.error(FieldId::Name).is_some());
        form.set_field(FieldId::Name, "Jane Appleseed").unwrap();
        assert_eq!(
            form.error(FieldId::Name).as_deref(),
            Some("name is required")
        );
    }

    #[test]
    fn on_change_mode_revalidates_after_first_submit() {
        let config = FormConfig {
            revalidate: RevalidateMode::OnChange,
        };
        let mut form = FormController::with_config(RecordingSink::new(), config);
        form.set_field(FieldId::Name, "Jane").unwrap();
        assert!(form.report().is_valid());

        form.submit().unwrap();
        assert!(form.error(FieldId::Name).is_some());
        form.set_field(FieldId::Name, "Jane Appleseed").unwrap();
        assert_eq!(form.error(FieldId::Name), None);
        form.set_field(FieldId::Cvc, "1").unwrap();
        assert_eq!(
            form.error(FieldId::Cvc).as_deref(),
            Some("cvc must be 3 characters long")
        );
    }

    #[test]
    fn dirty_and_touched_tracking() {
        let mut form = FormController::new(RecordingSink::new());
        form.set_field(FieldId::Cvc, "12").unwrap();
        assert!(form.dirty().has(FieldId::Cvc));
        form.set_field(FieldId::Cvc, "").unwrap();
        assert!(!form.dirty().has(FieldId::Cvc));
        form.mark_touched(FieldId::Name);
        assert_eq!(form.touched(), FieldSet::NAME);
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = FormController::new(RecordingSink::new());
        fill_valid(&mut form);
        form.mark_touched(FieldId::Name);
        form.submit().unwrap();
        form.reset().unwrap();

        assert_eq!(form.view_state(), ViewState::Editing);
        assert!(form.fields().is_empty());
        assert!(form.preview().is_placeholder());
        assert!(form.report().is_valid());
        assert!(form.touched().is_empty());
        assert!(form.dirty().is_empty());
        assert_eq!(form.submit_count(), 0);
    }

    #[test]
    fn reset_requires_submitted_state() {
        let mut form = FormController::new(RecordingSink::new());
        form.set_field(FieldId::Cvc, "123").unwrap();
        let err = form.reset().unwrap_err();
        assert_eq!(
            err,
            FormError::InvalidState {
                operation: "reset",
                state: ViewState::Editing
            }
        );
        assert_eq!(form.value(FieldId::Cvc), "123");
    }

    #[test]
    fn editing_operations_rejected_while_submitted() {
        let recorder = RecordingSink::new();
        let mut form = FormController::new(recorder.clone());
        fill_valid(&mut form);
        form.submit().unwrap();

        assert!(matches!(
            form.set_field(FieldId::Name, "x"),
            Err(FormError::InvalidState { .. })
        ));
        assert!(matches!(form.submit(), Err(FormError::InvalidState { .. })));
        assert_eq!(form.value(FieldId::Name), "Jane Appleseed");
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn set_field_by_key() {
        let mut form = FormController::new(RecordingSink::new());
        form.set_field_by_key("mm", "07").unwrap();
        assert_eq!(form.value(FieldId::ExpiryMonth), "07");
        assert_eq!(
            form.set_field_by_key("zip", "1"),
            Err(FormError::UnknownField("zip".into()))
        );
    }

    #[test]
    fn revalidate_mode_parsing() {
        assert_eq!("submit".parse::<RevalidateMode>(), Ok(RevalidateMode::OnSubmit));
        assert_eq!("on-change".parse::<RevalidateMode>(), Ok(RevalidateMode::OnChange));
        assert!("never".parse::<RevalidateMode>().is_err());
        assert_eq!(RevalidateMode::OnChange.as_str(), "change");
    }
}
