//! Use cases: validate user input, call the repository and report failures in
//! a form the front end can show.

use thiserror::Error;

use crate::api::errors::{ApiError, ErrorKind};
use crate::forms::FormError;

pub mod auth;
pub mod history;
pub mod items;
pub mod movements;
pub mod observations;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// User input rejected before reaching the API.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    /// Missing or rejected credentials, with the server's message. A session
    /// holding a token has already been cleared.
    #[error("{0}")]
    Unauthorized(String),

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Api(ApiError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Form(_) | ServiceError::TypeConstraint(_) => ErrorKind::Validation,
            ServiceError::Unauthorized(_) => ErrorKind::Unauthorized,
            ServiceError::NotFound => ErrorKind::Status,
            ServiceError::Api(err) => err.kind(),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { message } => ServiceError::Unauthorized(message),
            err if err.is_not_found() => ServiceError::NotFound,
            err => ServiceError::Api(err),
        }
    }
}
