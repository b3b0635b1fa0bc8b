//! Business logic behind every route.
//!
//! Services are free functions generic over the repository traits so they can
//! run against [`crate::repository::DieselRepository`] in production and the
//! in-memory test repository in unit tests. Each mutating service follows the
//! same pipeline: authorize the [`SessionContext`](crate::domain::session::SessionContext),
//! validate the submitted form, then persist.

use crate::repository::RepositoryError;

pub mod articles;
pub mod categories;
pub mod comments;
pub mod errors;
pub mod pages;
pub mod passwords;
pub mod policy;
pub mod sessions;
pub mod users;

pub use errors::{ServiceError, ServiceResult};

/// Logs unexpected repository failures under `context` and converts them.
/// Conflicts and missing rows are expected outcomes and are not logged.
pub(crate) fn repo_error(context: &str) -> impl FnOnce(RepositoryError) -> ServiceError + '_ {
    move |err| {
        if !matches!(err, RepositoryError::Conflict(_) | RepositoryError::NotFound) {
            log::error!("{context}: {err}");
        }
        err.into()
    }
}

/// Parses a raw path id, treating invalid values as a missing resource.
pub(crate) fn parse_id<T, F>(raw: i32, parse: F) -> ServiceResult<T>
where
    F: FnOnce(i32) -> Result<T, crate::domain::types::TypeConstraintError>,
{
    parse(raw).map_err(|_| ServiceError::NotFound)
}
