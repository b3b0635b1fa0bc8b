use thiserror::Error;

use crate::domain::validation::FieldErrors;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The action needs a logged-in user and there is none.
    #[error("you must be logged in to perform that action")]
    Unauthenticated,
    /// The current user may not perform the mutation.
    #[error("{0}")]
    Forbidden(String),
    /// Email/password pair did not match. Intentionally unspecific.
    #[error("login was not successful")]
    AuthenticationFailed,
    /// One or more submitted fields broke a rule.
    #[error("{0}")]
    Validation(FieldErrors),
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
