use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(DieselError),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// A unique index rejected the write. Carries the offending column.
    #[error("{0} has already been taken")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("validation error: {0}")]
    ValidationError(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::Conflict(unique_violation_column(info.message()))
            }
            other => RepositoryError::Database(other),
        }
    }
}

/// Extracts the column from SQLite's `UNIQUE constraint failed: table.column`.
fn unique_violation_column(message: &str) -> String {
    message
        .rsplit_once(':')
        .map(|(_, columns)| columns)
        .and_then(|columns| columns.split(',').next())
        .map(|column| {
            let column = column.trim();
            column
                .rsplit_once('.')
                .map(|(_, name)| name)
                .unwrap_or(column)
                .to_string()
        })
        .filter(|column| !column.is_empty())
        .unwrap_or_else(|| "record".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_unique_messages() {
        assert_eq!(
            unique_violation_column("UNIQUE constraint failed: users.email"),
            "email"
        );
        assert_eq!(
            unique_violation_column("UNIQUE constraint failed: a.x, a.y"),
            "x"
        );
        assert_eq!(unique_violation_column("something odd"), "record");
    }
}
