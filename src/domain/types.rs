//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (positive identifiers, positive
//! quantities, normalized email, non-blank text) so that once a value reaches a
//! request payload it can be sent to the API without further checks.
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided quantity is zero or negative.
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

macro_rules! display_inner {
    ($name:ident) => {
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

/// Positive identifier newtypes.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        display_inner!($name);

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ItemId, "Unique identifier for an inventory item.");
id_newtype!(ShedId, "Unique identifier for a shed (storage location).");
id_newtype!(UserId, "Unique identifier for a user account.");
id_newtype!(HistoryId, "Unique identifier for a historical movement record.");
id_newtype!(MovementId, "Unique identifier for a shed-to-shed movement.");
id_newtype!(ObservationId, "Unique identifier for an item observation.");
id_newtype!(DeletedItemId, "Unique identifier for a deletion record.");

/// Number of units in a stock operation, always greater than zero.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveQuantity)
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

display_inner!(Quantity);

/// Lower-cased and validated email address of a user account.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserEmail(String);

impl UserEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

display_inner!(UserEmail);

/// Trimmed string guaranteed to contain at least one visible character.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(TypeConstraintError::EmptyString)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

display_inner!(NonEmptyString);

/// Optional free text: blank input collapses to `None`.
pub fn optional_text<S: AsRef<str>>(value: Option<S>) -> Option<String> {
    value
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert_eq!(ItemId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ShedId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ItemId::new(7).map(ItemId::get), Ok(7));
    }

    #[test]
    fn quantity_rejects_zero() {
        assert_eq!(
            Quantity::new(0),
            Err(TypeConstraintError::NonPositiveQuantity)
        );
        assert_eq!(Quantity::new(5).map(Quantity::get), Ok(5));
    }

    #[test]
    fn email_is_normalized() {
        let email = UserEmail::new("  Ana@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ana@example.com");
        assert_eq!(
            UserEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn non_empty_string_trims() {
        assert_eq!(NonEmptyString::new("  galpon ").unwrap().as_str(), "galpon");
        assert_eq!(
            NonEmptyString::new("   "),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(Some(" obra ")), Some("obra".to_string()));
        assert_eq!(optional_text::<&str>(None), None);
    }
}
