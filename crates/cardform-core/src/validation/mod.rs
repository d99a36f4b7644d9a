#![forbid(unsafe_code)]

//! Composable field validators.
//!
//! - A core [`Validator`] trait for validating values
//! - Built-in validators for the card form's rules (required, min/max
//!   length, token count, integer range)
//! - Composition via [`All`] and [`ValidatorBuilder`]
//! - Error messages with `{param}` interpolation
//!
//! # Example
//!
//! ```rust
//! use cardform_core::validation::{ErrorKind, Required, TokenCount, Validator, ValidatorBuilder};
//!
//! let required = Required::new();
//! assert!(required.validate("hello").is_valid());
//! assert!(!required.validate("").is_valid());
//!
//! let name = ValidatorBuilder::<str>::new()
//!     .min_length(8)
//!     .custom(TokenCount::new(' ', 2))
//!     .build();
//! let kinds: Vec<_> = name.collect("Jane").into_iter().map(|e| e.kind).collect();
//! assert_eq!(kinds, [ErrorKind::Length, ErrorKind::Format]);
//! ```

mod validators;

pub use validators::{
    // Composition
    All,
    // Core types
    ErrorKind,
    // Built-in validators
    IntegerRange,
    MaxLength,
    MinLength,
    Range,
    Required,
    TokenCount,
    ValidationError,
    ValidationResult,
    Validator,
    // Builder
    ValidatorBuilder,
};
