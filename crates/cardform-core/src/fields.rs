#![forbid(unsafe_code)]

//! The card form's field model.
//!
//! [`FieldId`] names the five inputs in display order and carries their
//! static presentation data (labels, placeholders, masks). [`FormFields`] is
//! the field-set itself: five raw strings, serialised with the wire keys
//! `name`, `cardNumber`, `mm`, `yy` and `cvc`.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::mask::InputMask;

/// Card number mask: sixteen digits in groups of four.
pub const CARD_NUMBER_MASK: &str = "9999 9999 9999 9999";
/// Two-digit month/year mask.
pub const TWO_DIGIT_MASK: &str = "99";
/// Three-digit CVC mask.
pub const CVC_MASK: &str = "999";

/// Identifies one of the five form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    /// Cardholder name.
    Name,
    /// Card number, grouped in fours.
    CardNumber,
    /// Two-digit expiry month.
    ExpiryMonth,
    /// Two-digit expiry year.
    ExpiryYear,
    /// Card verification code.
    Cvc,
}

impl FieldId {
    /// All fields in display order.
    pub const ALL: [FieldId; 5] = [
        FieldId::Name,
        FieldId::CardNumber,
        FieldId::ExpiryMonth,
        FieldId::ExpiryYear,
        FieldId::Cvc,
    ];

    /// Position in display order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::CardNumber => 1,
            Self::ExpiryMonth => 2,
            Self::ExpiryYear => 3,
            Self::Cvc => 4,
        }
    }

    /// Wire key used in serialised field-sets and log output.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CardNumber => "cardNumber",
            Self::ExpiryMonth => "mm",
            Self::ExpiryYear => "yy",
            Self::Cvc => "cvc",
        }
    }

    /// Look a field up by its wire key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Label shown above the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Cardholder Name",
            Self::CardNumber => "Card Number",
            Self::ExpiryMonth => "Exp. Date (MM)",
            Self::ExpiryYear => "Exp. Date (YY)",
            Self::Cvc => "CVC",
        }
    }

    /// Hint shown inside an empty input.
    #[must_use]
    pub const fn input_placeholder(self) -> &'static str {
        match self {
            Self::Name => "e.g. Jane Appleseed",
            Self::CardNumber => "e.g. 1234 5678 9123 0000",
            Self::ExpiryMonth => "MM",
            Self::ExpiryYear => "YY",
            Self::Cvc => "CVC",
        }
    }

    /// Text shown on the card preview while the field is empty.
    #[must_use]
    pub const fn preview_placeholder(self) -> &'static str {
        match self {
            Self::Name => "JANE APPLESEED",
            Self::CardNumber => "0000 0000 0000 0000",
            Self::ExpiryMonth | Self::ExpiryYear => "00",
            Self::Cvc => "000",
        }
    }

    /// Mask pattern for numeric fields; `None` for free text.
    #[must_use]
    pub const fn mask_pattern(self) -> Option<&'static str> {
        match self {
            Self::Name => None,
            Self::CardNumber => Some(CARD_NUMBER_MASK),
            Self::ExpiryMonth | Self::ExpiryYear => Some(TWO_DIGIT_MASK),
            Self::Cvc => Some(CVC_MASK),
        }
    }

    /// Parsed input mask for numeric fields.
    #[must_use]
    pub fn mask(self) -> Option<InputMask> {
        self.mask_pattern().map(InputMask::parse)
    }

    /// The single-field flag for this field.
    #[must_use]
    pub const fn flag(self) -> FieldSet {
        match self {
            Self::Name => FieldSet::NAME,
            Self::CardNumber => FieldSet::CARD_NUMBER,
            Self::ExpiryMonth => FieldSet::EXPIRY_MONTH,
            Self::ExpiryYear => FieldSet::EXPIRY_YEAR,
            Self::Cvc => FieldSet::CVC,
        }
    }

    /// Next field in display order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

bitflags! {
    /// A set of fields, used for touched/dirty/validated tracking.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldSet: u8 {
        const NAME         = 0b0_0001;
        const CARD_NUMBER  = 0b0_0010;
        const EXPIRY_MONTH = 0b0_0100;
        const EXPIRY_YEAR  = 0b0_1000;
        const CVC          = 0b1_0000;
    }
}

impl FieldSet {
    /// Whether `field` is a member.
    #[must_use]
    pub const fn has(self, field: FieldId) -> bool {
        self.contains(field.flag())
    }

    /// Members in display order.
    pub fn fields(self) -> impl Iterator<Item = FieldId> {
        FieldId::ALL.into_iter().filter(move |f| self.has(*f))
    }
}

/// The five raw form values at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    pub name: String,
    pub card_number: String,
    #[serde(rename = "mm")]
    pub expiry_month: String,
    #[serde(rename = "yy")]
    pub expiry_year: String,
    pub cvc: String,
}

impl FormFields {
    /// An empty field-set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, stores `value` verbatim.
    #[must_use]
    pub fn with(mut self, field: FieldId, value: impl Into<String>) -> Self {
        *self.get_mut(field) = value.into();
        self
    }

    /// Raw value of a field.
    #[must_use]
    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::Name => &self.name,
            FieldId::CardNumber => &self.card_number,
            FieldId::ExpiryMonth => &self.expiry_month,
            FieldId::ExpiryYear => &self.expiry_year,
            FieldId::Cvc => &self.cvc,
        }
    }

    /// Mutable access to a field's value.
    pub fn get_mut(&mut self, field: FieldId) -> &mut String {
        match field {
            FieldId::Name => &mut self.name,
            FieldId::CardNumber => &mut self.card_number,
            FieldId::ExpiryMonth => &mut self.expiry_month,
            FieldId::ExpiryYear => &mut self.expiry_year,
            FieldId::Cvc => &mut self.cvc,
        }
    }

    /// `(field, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        FieldId::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Whether every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, v)| v.is_empty())
    }

    /// Serialise to a compact JSON object keyed by wire keys.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
