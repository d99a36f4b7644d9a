#![forbid(unsafe_code)]

//! Errors raised by misuse of the form controller.
//!
//! Validation failures are not errors in this sense: they are reported
//! through [`ValidationReport`](crate::schema::ValidationReport) and only
//! block the submit transition.

use std::fmt;

use crate::form::ViewState;

/// A form operation that cannot run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The operation is not available in the current view state.
    InvalidState {
        /// Name of the rejected operation.
        operation: &'static str,
        /// View state the form was in.
        state: ViewState,
    },
    /// A field key did not name one of the form's fields.
    UnknownField(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { operation, state } => {
                write!(f, "{operation} is not available while {state}")
            }
            Self::UnknownField(key) => write!(f, "unknown field: {key}"),
        }
    }
}

impl std::error::Error for FormError {}
