//! Error conversion glue.
//!
//! The domain layer must not depend on gateway or service error types, so the
//! conversions out of [`TypeConstraintError`] live here.

use crate::api::errors::ApiError;
use crate::domain::types::TypeConstraintError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for ApiError {
    fn from(val: TypeConstraintError) -> Self {
        ApiError::Validation(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::errors::ErrorKind;

    #[test]
    fn constraint_errors_become_validation_failures() {
        let api: ApiError = TypeConstraintError::NonPositiveId.into();
        assert_eq!(api.kind(), ErrorKind::Validation);

        let service: ServiceError = TypeConstraintError::EmptyString.into();
        assert_eq!(
            service.to_string(),
            "type constraint violation: value cannot be empty"
        );
    }
}
