#![forbid(unsafe_code)]

//! Core of the cardform credit-card entry form.
//!
//! - [`fields`]: the five-field model and field sets
//! - [`validation`]: composable validators
//! - [`schema`]: the card form's rule chains and validation reports
//! - [`mask`]: positional digit masks for numeric inputs
//! - [`preview`]: live card preview text
//! - [`form`]: the form state controller
//! - [`sink`]: receivers for validated field-sets
//!
//! # Example
//!
//! ```rust
//! use cardform_core::fields::FieldId;
//! use cardform_core::form::{FormController, SubmitOutcome, ViewState};
//! use cardform_core::sink::RecordingSink;
//!
//! let recorder = RecordingSink::new();
//! let mut form = FormController::new(recorder.clone());
//! form.set_field(FieldId::Name, "Jane Appleseed")?;
//! form.set_field(FieldId::CardNumber, "1234567891230000")?;
//! form.set_field(FieldId::ExpiryMonth, "09")?;
//! form.set_field(FieldId::ExpiryYear, "28")?;
//! form.set_field(FieldId::Cvc, "123")?;
//!
//! assert!(matches!(form.submit()?, SubmitOutcome::Submitted(_)));
//! assert_eq!(form.view_state(), ViewState::Submitted);
//! assert_eq!(recorder.records()[0].card_number, "1234 5678 9123 0000");
//! # Ok::<(), cardform_core::error::FormError>(())
//! ```

pub mod error;
pub mod fields;
pub mod form;
pub mod mask;
pub mod preview;
pub mod schema;
pub mod sink;
pub mod validation;

pub use error::FormError;
pub use fields::{FieldId, FieldSet, FormFields};
pub use form::{FormConfig, FormController, RevalidateMode, SubmitOutcome, ViewState};
pub use mask::InputMask;
pub use preview::CardPreview;
pub use schema::{CardSchema, ValidationReport};
pub use sink::{FanoutSink, FnSink, RecordingSink, SubmitSink, TracingSink};
