//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! `From` impls connecting them live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod service {
    use super::*;
    use crate::domain::validation::FieldErrors;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::Validation(FieldErrors::from(val))
        }
    }

    impl From<FieldErrors> for ServiceError {
        fn from(val: FieldErrors) -> Self {
            ServiceError::Validation(val)
        }
    }

    impl From<RepositoryError> for ServiceError {
        fn from(val: RepositoryError) -> Self {
            match val {
                RepositoryError::NotFound => ServiceError::NotFound,
                RepositoryError::Conflict(field) => {
                    ServiceError::Validation(FieldErrors::single(field.clone(), taken(&field)))
                }
                _ => ServiceError::Internal,
            }
        }
    }

    fn taken(field: &str) -> String {
        let label = match field {
            "email" => "Email",
            "username" => "Username",
            "name" => "Name",
            other => other,
        };
        format!("{label} has already been taken")
    }
}
