#![forbid(unsafe_code)]

//! The card form's validation schema.
//!
//! Each field owns a rule chain: a [`Required`] gate followed by an [`All`]
//! chain of shape rules. An empty value reports only the required error;
//! otherwise every failing shape rule is recorded in chain order. The
//! message displayed for a field is its first recorded error.
//!
//! [`CardSchema::validate`] is pure: the same field-set always yields the
//! same [`ValidationReport`].

use std::collections::BTreeMap;

use crate::fields::{FieldId, FieldSet, FormFields};
use crate::validation::{
    All, ErrorKind, IntegerRange, MaxLength, MinLength, Required, TokenCount, ValidationError,
    Validator, ValidatorBuilder,
};

/// Minimum cardholder name length.
pub const NAME_MIN_LEN: usize = 8;
/// Maximum cardholder name length.
pub const NAME_MAX_LEN: usize = 30;
/// Formatted card number length: sixteen digits and three separators.
pub const CARD_NUMBER_LEN: usize = 19;
/// Expiry month/year length.
pub const EXPIRY_LEN: usize = 2;
/// CVC length.
pub const CVC_LEN: usize = 3;
/// Accepted expiry months.
pub const MONTH_RANGE: (i64, i64) = (1, 12);
/// Accepted two-digit expiry years (2024–2040).
pub const YEAR_RANGE: (i64, i64) = (24, 40);

/// Rule chain for a single field.
#[derive(Debug)]
pub struct FieldRules {
    required: Required,
    rules: All<str>,
}

impl FieldRules {
    /// Create a rule chain with the given required message and shape rules.
    #[must_use]
    pub fn new(required_message: impl Into<String>, rules: All<str>) -> Self {
        Self {
            required: Required::new().with_message(required_message),
            rules,
        }
    }

    /// Evaluate the chain, returning every failure in order.
    #[must_use]
    pub fn check(&self, value: &str) -> Vec<ValidationError> {
        if let Some(err) = self.required.validate(value).into_error() {
            return vec![err];
        }
        self.rules.collect(value)
    }
}

/// Validation schema covering all five fields.
#[derive(Debug)]
pub struct CardSchema {
    rules: [FieldRules; 5],
}

impl Default for CardSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSchema {
    /// Build the standard card schema.
    #[must_use]
    pub fn new() -> Self {
        let name = FieldRules::new(
            "name is required",
            ValidatorBuilder::<str>::new()
                .custom(
                    MinLength::new(NAME_MIN_LEN)
                        .with_message("name must be at least {min} characters long"),
                )
                .custom(
                    MaxLength::new(NAME_MAX_LEN)
                        .with_message("name must be maximum {max} characters long"),
                )
                .custom(
                    TokenCount::new(' ', 2)
                        .with_message("You should include both firstname and lastname"),
                )
                .build(),
        );
        let card_number = FieldRules::new(
            "card number is required",
            ValidatorBuilder::<str>::new()
                .custom(
                    MinLength::new(CARD_NUMBER_LEN)
                        .with_message("card number must be 16 characters long"),
                )
                .build(),
        );
        let month = FieldRules::new(
            "mm is required",
            ValidatorBuilder::<str>::new()
                .custom(
                    MinLength::new(EXPIRY_LEN)
                        .with_message("month must be {min} characters long"),
                )
                .custom(
                    IntegerRange::new(MONTH_RANGE.0, MONTH_RANGE.1)
                        .with_message("month must be valid"),
                )
                .build(),
        );
        let year = FieldRules::new(
            "yy is required",
            ValidatorBuilder::<str>::new()
                .custom(
                    MinLength::new(EXPIRY_LEN).with_message("year must be {min} characters long"),
                )
                .custom(
                    IntegerRange::new(YEAR_RANGE.0, YEAR_RANGE.1)
                        .with_message("year must be valid"),
                )
                .build(),
        );
        let cvc = FieldRules::new(
            "cvc is required",
            ValidatorBuilder::<str>::new()
                .custom(MinLength::new(CVC_LEN).with_message("cvc must be {min} characters long"))
                .build(),
        );
        Self {
            rules: [name, card_number, month, year, cvc],
        }
    }

    /// Rule chain for one field.
    #[must_use]
    pub fn rules(&self, field: FieldId) -> &FieldRules {
        &self.rules[field.index()]
    }

    /// Validate a single field value.
    #[must_use]
    pub fn validate_field(&self, field: FieldId, value: &str) -> Vec<ValidationError> {
        self.rules(field).check(value)
    }

    /// Validate a whole field-set. Every field is always checked.
    #[must_use]
    pub fn validate(&self, fields: &FormFields) -> ValidationReport {
        let mut report = ValidationReport::default();
        for (field, value) in fields.iter() {
            report.set(field, self.validate_field(field, value));
        }
        report
    }
}

/// Per-field validation outcome for a field-set.
///
/// A field with no entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<FieldId, Vec<ValidationError>>,
}

impl ValidationReport {
    /// Whether no field failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Replace the errors recorded for `field`. An empty list clears it.
    pub fn set(&mut self, field: FieldId, errors: Vec<ValidationError>) {
        if errors.is_empty() {
            self.errors.remove(&field);
        } else {
            self.errors.insert(field, errors);
        }
    }

    /// All errors recorded for `field`, in rule order.
    #[must_use]
    pub fn errors(&self, field: FieldId) -> &[ValidationError] {
        self.errors.get(&field).map_or(&[], Vec::as_slice)
    }

    /// The error displayed for `field`: the first failing rule.
    #[must_use]
    pub fn first(&self, field: FieldId) -> Option<&ValidationError> {
        self.errors(field).first()
    }

    /// Formatted display message for `field`.
    #[must_use]
    pub fn message(&self, field: FieldId) -> Option<String> {
        self.first(field).map(ValidationError::format_message)
    }

    /// Whether `field` failed a rule of the given kind.
    #[must_use]
    pub fn has(&self, field: FieldId, kind: ErrorKind) -> bool {
        self.errors(field).iter().any(|e| e.kind == kind)
    }

    /// Fields with at least one error.
    #[must_use]
    pub fn failing(&self) -> FieldSet {
        self.errors
            .keys()
            .fold(FieldSet::empty(), |set, f| set | f.flag())
    }

    /// `(field, displayed message)` pairs in display order.
    pub fn messages(&self) -> impl Iterator<Item = (FieldId, String)> + '_ {
        self.errors
            .iter()
            .filter_map(|(f, errs)| errs.first().map(|e| (*f, e.format_message())))
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
