#![forbid(unsafe_code)]

//! Core validation types and built-in validators.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// The class of rule a value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// The value is empty.
    Required,
    /// The value is too short or too long.
    Length,
    /// The value does not have the expected shape.
    Format,
    /// The value parses but is outside the accepted interval.
    Range,
}

impl ErrorKind {
    /// Stable code for programmatic handling and log output.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Length => "length",
            Self::Format => "format",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A validation error with kind, message template, and interpolation parameters.
///
/// # Example
///
/// ```rust
/// use cardform_core::validation::{ErrorKind, ValidationError};
///
/// let error = ValidationError::new(ErrorKind::Length, "must be at least {min} characters long")
///     .with_param("min", 8);
///
/// assert_eq!(error.format_message(), "must be at least 8 characters long");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Which class of rule failed.
    pub kind: ErrorKind,
    /// Human-readable message template.
    pub message: String,
    /// Parameters for message interpolation.
    pub params: BTreeMap<String, String>,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter for message interpolation.
    ///
    /// Parameters are substituted in the message using `{key}` syntax.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Format the message with parameter substitution.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            result = result.replace(&format!("{{{key}}}"), value);
        }
        result
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// The result of running one validator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    /// The value is valid.
    #[default]
    Valid,
    /// The value is invalid with an error.
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Returns `true` if the result is `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns `true` if the result is `Invalid`.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Returns the error if the result is `Invalid`.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// Consume the result, returning the error if any.
    #[must_use]
    pub fn into_error(self) -> Option<ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Validator Trait
// ---------------------------------------------------------------------------

/// A trait for validating values of type `T`.
pub trait Validator<T: ?Sized>: Send + Sync {
    /// Validate the given value.
    fn validate(&self, value: &T) -> ValidationResult;
}

// ---------------------------------------------------------------------------
// Built-in Validators
// ---------------------------------------------------------------------------

/// Validates that a string is not empty.
///
/// Whitespace counts as content: `"   "` passes and is left to the other
/// rules in the chain.
#[derive(Debug, Clone)]
pub struct Required {
    message: String,
}

impl Default for Required {
    fn default() -> Self {
        Self {
            message: "This field is required".to_string(),
        }
    }
}

impl Required {
    /// Create a new `Required` validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom error message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() {
            ValidationResult::Invalid(ValidationError::new(ErrorKind::Required, &self.message))
        } else {
            ValidationResult::Valid
        }
    }
}

/// Validates that a string has at least `min` characters.
#[derive(Debug, Clone)]
pub struct MinLength {
    /// Minimum number of characters required.
    pub min: usize,
    message: String,
}

impl MinLength {
    /// Create a new `MinLength` validator.
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self {
            min,
            message: "Must be at least {min} characters".to_string(),
        }
    }

    /// Set a custom message template (`{min}` and `{actual}` are available).
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for MinLength {
    fn validate(&self, value: &str) -> ValidationResult {
        let len = value.chars().count();
        if len < self.min {
            ValidationResult::Invalid(
                ValidationError::new(ErrorKind::Length, &self.message)
                    .with_param("min", self.min)
                    .with_param("actual", len),
            )
        } else {
            ValidationResult::Valid
        }
    }
}

/// Validates that a string has at most `max` characters.
#[derive(Debug, Clone)]
pub struct MaxLength {
    /// Maximum number of characters allowed.
    pub max: usize,
    message: String,
}

impl MaxLength {
    /// Create a new `MaxLength` validator.
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self {
            max,
            message: "Must be at most {max} characters".to_string(),
        }
    }

    /// Set a custom message template (`{max}` and `{actual}` are available).
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for MaxLength {
    fn validate(&self, value: &str) -> ValidationResult {
        let len = value.chars().count();
        if len > self.max {
            ValidationResult::Invalid(
                ValidationError::new(ErrorKind::Length, &self.message)
                    .with_param("max", self.max)
                    .with_param("actual", len),
            )
        } else {
            ValidationResult::Valid
        }
    }
}

/// Validates that a string splits into at least `min` non-empty tokens on
/// `separator`.
///
/// `"Jane Appleseed"` has two space-separated tokens; `"Jane "` has one.
#[derive(Debug, Clone)]
pub struct TokenCount {
    /// Separator between tokens.
    pub separator: char,
    /// Minimum number of non-empty tokens.
    pub min: usize,
    message: String,
}

impl TokenCount {
    /// Create a new `TokenCount` validator.
    #[must_use]
    pub fn new(separator: char, min: usize) -> Self {
        Self {
            separator,
            min,
            message: "Invalid format".to_string(),
        }
    }

    /// Set a custom error message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for TokenCount {
    fn validate(&self, value: &str) -> ValidationResult {
        let tokens = value
            .split(self.separator)
            .filter(|t| !t.is_empty())
            .count();
        if tokens >= self.min {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(
                ValidationError::new(ErrorKind::Format, &self.message)
                    .with_param("min", self.min)
                    .with_param("actual", tokens),
            )
        }
    }
}

/// Validates that a value is within an inclusive range.
#[derive(Debug, Clone, Copy)]
pub struct Range<T> {
    /// Minimum value (inclusive).
    pub min: T,
    /// Maximum value (inclusive).
    pub max: T,
}

impl<T: Copy> Range<T> {
    /// Create a new `Range` validator.
    #[must_use]
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T> Validator<T> for Range<T>
where
    T: PartialOrd + fmt::Display + Copy + Send + Sync,
{
    fn validate(&self, value: &T) -> ValidationResult {
        if *value >= self.min && *value <= self.max {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(
                ValidationError::new(ErrorKind::Range, "Must be between {min} and {max}")
                    .with_param("min", self.min)
                    .with_param("max", self.max)
                    .with_param("actual", *value),
            )
        }
    }
}

/// Parses a string as a base-10 integer and checks it against a [`Range`].
///
/// Text that does not parse fails with [`ErrorKind::Range`] as well.
#[derive(Debug, Clone)]
pub struct IntegerRange {
    range: Range<i64>,
    message: String,
}

impl IntegerRange {
    /// Create a new `IntegerRange` validator over `min..=max`.
    #[must_use]
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            range: Range::new(min, max),
            message: "Must be between {min} and {max}".to_string(),
        }
    }

    /// Set a custom message template.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for IntegerRange {
    fn validate(&self, value: &str) -> ValidationResult {
        let outcome = match value.trim().parse::<i64>() {
            Ok(n) => self.range.validate(&n),
            Err(_) => ValidationResult::Invalid(ValidationError::new(ErrorKind::Range, "")),
        };
        match outcome {
            ValidationResult::Valid => ValidationResult::Valid,
            ValidationResult::Invalid(err) => {
                let mut err = ValidationError {
                    message: self.message.clone(),
                    ..err
                };
                err.params.insert("min".into(), self.range.min.to_string());
                err.params.insert("max".into(), self.range.max.to_string());
                ValidationResult::Invalid(err)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Composition Validators
// ---------------------------------------------------------------------------

/// Combines multiple validators with AND logic.
///
/// [`Validator::validate`] stops at the first failure; [`All::collect`]
/// runs every validator and returns each failure in order.
pub struct All<T: ?Sized> {
    validators: Vec<Box<dyn Validator<T>>>,
}

impl<T: ?Sized> All<T> {
    /// Create a new `All` validator with the given validators.
    #[must_use]
    pub fn new(validators: Vec<Box<dyn Validator<T>>>) -> Self {
        Self { validators }
    }

    /// Number of chained validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every validator and return all errors in chain order.
    #[must_use]
    pub fn collect(&self, value: &T) -> Vec<ValidationError> {
        self.validators
            .iter()
            .filter_map(|v| v.validate(value).into_error())
            .collect()
    }
}

impl<T: ?Sized> Validator<T> for All<T> {
    fn validate(&self, value: &T) -> ValidationResult {
        for validator in &self.validators {
            let result = validator.validate(value);
            if result.is_invalid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

impl<T: ?Sized> fmt::Debug for All<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("All")
            .field(
                "validators",
                &format!("[{} validators]", self.validators.len()),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ValidatorBuilder
// ---------------------------------------------------------------------------

/// A builder for constructing validator chains fluently.
///
/// # Example
///
/// ```rust
/// use cardform_core::validation::{ValidatorBuilder, Validator};
///
/// let validator = ValidatorBuilder::<str>::new()
///     .min_length(3)
///     .max_length(20)
///     .build();
///
/// assert!(validator.validate("alice").is_valid());
/// assert!(!validator.validate("ab").is_valid());
/// ```
pub struct ValidatorBuilder<T: ?Sized> {
    validators: Vec<Box<dyn Validator<T>>>,
    _phantom: PhantomData<T>,
}

impl<T: ?Sized> Default for ValidatorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> ValidatorBuilder<T> {
    /// Create a new empty validator builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Add a custom validator.
    #[must_use]
    pub fn custom(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Build the combined validator.
    #[must_use]
    pub fn build(self) -> All<T> {
        All::new(self.validators)
    }
}

impl ValidatorBuilder<str> {
    /// Add a `MinLength` validator.
    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.custom(MinLength::new(min))
    }

    /// Add a `MaxLength` validator.
    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.custom(MaxLength::new(max))
    }

    /// Add an `IntegerRange` validator.
    #[must_use]
    pub fn integer_range(self, min: i64, max: i64) -> Self {
        self.custom(IntegerRange::new(min, max))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- ValidationError tests --

    #[test]
    fn validation_error_format_message() {
        let err = ValidationError::new(ErrorKind::Length, "at least {min} characters")
            .with_param("min", 8);
        assert_eq!(err.format_message(), "at least 8 characters");
        assert_eq!(format!("{err}"), "at least 8 characters");
    }

    #[test]
    fn validation_error_unknown_placeholder_is_kept() {
        let err = ValidationError::new(ErrorKind::Format, "bad {thing}");
        assert_eq!(err.format_message(), "bad {thing}");
    }

    #[test]
    fn error_kind_codes() {
        assert_eq!(ErrorKind::Required.code(), "required");
        assert_eq!(ErrorKind::Length.code(), "length");
        assert_eq!(ErrorKind::Format.code(), "format");
        assert_eq!(ErrorKind::Range.to_string(), "range");
    }

    // -- ValidationResult tests --

    #[test]
    fn validation_result_accessors() {
        let invalid = ValidationResult::Invalid(ValidationError::new(ErrorKind::Format, "bad"));
        assert!(ValidationResult::default().is_valid());
        assert!(invalid.is_invalid());
        assert_eq!(invalid.error().map(|e| e.kind), Some(ErrorKind::Format));
        assert!(invalid.into_error().is_some());
    }

    // -- Required tests --

    #[test]
    fn required_fails_only_on_empty() {
        let v = Required::new().with_message("name is required");
        assert!(v.validate("").is_invalid());
        assert!(v.validate("   ").is_valid());
        assert_eq!(
            v.validate("").error().map(ValidationError::format_message),
            Some("name is required".to_string())
        );
        assert!(v.validate(" x ").is_valid());
    }

    // -- Length tests --

    #[test]
    fn min_length_boundary() {
        let v = MinLength::new(3);
        assert!(v.validate("ab").is_invalid());
        assert!(v.validate("abc").is_valid());
    }

    #[test]
    fn min_length_counts_chars_not_bytes() {
        let v = MinLength::new(4);
        assert!(v.validate("café").is_valid());
        assert!(v.validate("caf").is_invalid());
    }

    #[test]
    fn max_length_boundary() {
        let v = MaxLength::new(3);
        assert!(v.validate("abc").is_valid());
        let err = v.validate("abcd").into_error().unwrap();
        assert_eq!(err.kind, ErrorKind::Length);
        assert_eq!(err.params.get("actual"), Some(&"4".to_string()));
    }

    // -- TokenCount tests --

    #[test]
    fn token_count_requires_two_words() {
        let v = TokenCount::new(' ', 2);
        assert!(v.validate("Jane Appleseed").is_valid());
        assert!(v.validate("Jane  Appleseed").is_valid());
        assert!(v.validate("Jane").is_invalid());
        assert!(v.validate("Jane ").is_invalid());
        assert!(v.validate(" Jane").is_invalid());
        assert_eq!(
            v.validate("Jane").into_error().map(|e| e.kind),
            Some(ErrorKind::Format)
        );
    }

    // -- Range tests --

    #[test]
    fn range_i64() {
        let v = Range::new(1_i64, 12);
        assert!(v.validate(&0).is_invalid());
        assert!(v.validate(&1).is_valid());
        assert!(v.validate(&12).is_valid());
        assert!(v.validate(&13).is_invalid());
    }

    #[test]
    fn integer_range_parses_leading_zeros() {
        let v = IntegerRange::new(1, 12).with_message("month must be valid");
        assert!(v.validate("09").is_valid());
        assert!(v.validate("12").is_valid());
        assert!(v.validate("00").is_invalid());
        assert!(v.validate("13").is_invalid());
    }

    #[test]
    fn integer_range_rejects_non_numeric() {
        let v = IntegerRange::new(24, 40).with_message("year must be valid");
        let err = v.validate("2x").into_error().unwrap();
        assert_eq!(err.kind, ErrorKind::Range);
        assert_eq!(err.format_message(), "year must be valid");
        assert_eq!(err.params.get("min"), Some(&"24".to_string()));
    }

    // -- Composition tests --

    #[test]
    fn all_validate_stops_but_collect_does_not() {
        let v = ValidatorBuilder::<str>::new()
            .min_length(8)
            .custom(TokenCount::new(' ', 2))
            .build();
        assert_eq!(v.len(), 2);
        assert_eq!(
            v.validate("Jane").into_error().map(|e| e.kind),
            Some(ErrorKind::Length)
        );
        let kinds: Vec<_> = v.collect("Jane").into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ErrorKind::Length, ErrorKind::Format]);
        assert!(v.collect("Jane Appleseed").is_empty());
    }

    #[test]
    fn builder_empty_accepts_anything() {
        let v = ValidatorBuilder::<str>::new().build();
        assert!(v.is_empty());
        assert!(v.validate("anything").is_valid());
    }

    #[test]
    fn builder_integer_range() {
        let v = ValidatorBuilder::<str>::new()
            .min_length(2)
            .integer_range(24, 40)
            .build();
        assert!(v.validate("24").is_valid());
        assert!(v.validate("41").is_invalid());
        assert!(v.validate("4").is_invalid());
    }
}
