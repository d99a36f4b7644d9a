#![forbid(unsafe_code)]

//! Live card preview text.
//!
//! The preview mirrors the current field values verbatim, valid or not, and
//! falls back to a fixed placeholder for each empty field.

use crate::fields::{FieldId, FormFields};

/// Text shown on the card preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPreview {
    pub name: String,
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvc: String,
}

impl CardPreview {
    /// Build a preview from the current field values.
    #[must_use]
    pub fn from_fields(fields: &FormFields) -> Self {
        let show = |field: FieldId| {
            let value = fields.get(field);
            if value.is_empty() {
                field.preview_placeholder().to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            name: show(FieldId::Name),
            card_number: show(FieldId::CardNumber),
            expiry_month: show(FieldId::ExpiryMonth),
            expiry_year: show(FieldId::ExpiryYear),
            cvc: show(FieldId::Cvc),
        }
    }

    /// Expiry as `MM / YY`.
    #[must_use]
    pub fn expiry(&self) -> String {
        format!("{} / {}", self.expiry_month, self.expiry_year)
    }

    /// Whether every line shows its placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for CardPreview {
    fn default() -> Self {
        Self::from_fields(&FormFields::default())
    }
}
