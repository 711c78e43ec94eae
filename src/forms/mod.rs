//! Form definitions backing the modal actions.
//!
//! Each form deserializes from user input, validates itself with `validator`
//! and converts into the domain payload sent to the API.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod history;
pub mod items;
pub mod movements;
pub mod observations;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid item id")]
    InvalidItemId,

    #[error("invalid shed id")]
    InvalidShedId,

    #[error("invalid history record id")]
    InvalidHistoryId,

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("{0} is required")]
    Required(&'static str),

    #[error("invalid stock action: {0}")]
    InvalidAction(String),

    #[error("destination shed must differ from the current one")]
    SameShed,

    #[error("insufficient stock (available: {available})")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("no records selected")]
    EmptySelection,
}
