//! Error types shared by the store layer and the services
//!
//! `DatabaseError` classifies driver failures so that constraint violations
//! can be told apart from connectivity faults. `ServiceError` is the taxonomy
//! every service operation reports to the boundary layer.

use std::fmt;

use sqlx::Error as SqlxError;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while reaching the database or acquiring a connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {}", constraint.as_deref().unwrap_or("unknown"))]
    UniqueViolation { constraint: Option<String> },

    /// A foreign key constraint rejected the write
    #[error("Foreign key constraint violated: {}", constraint.as_deref().unwrap_or("unknown"))]
    ForeignKeyViolation { constraint: Option<String> },

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Name of the violated constraint, if the error is a constraint violation
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DatabaseError::UniqueViolation { constraint }
            | DatabaseError::ForeignKeyViolation { constraint } => constraint.as_deref(),
            _ => None,
        }
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::Database(db) if db.is_unique_violation() => DatabaseError::UniqueViolation {
                constraint: db.constraint().map(str::to_owned),
            },
            SqlxError::Database(db) if db.is_foreign_key_violation() => {
                DatabaseError::ForeignKeyViolation {
                    constraint: db.constraint().map(str::to_owned),
                }
            }
            SqlxError::Io(_)
            | SqlxError::Tls(_)
            | SqlxError::PoolTimedOut
            | SqlxError::PoolClosed
            | SqlxError::WorkerCrashed => DatabaseError::Connection(err),
            _ => DatabaseError::Query(err),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// The kind of record a not-found or already-exists condition refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Image,
    Comment,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::User => "user",
            Resource::Image => "image",
            Resource::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// Error returned by every service operation
#[derive(Error, Debug)]
pub enum ServiceError {
    /// One or more request fields failed validation; nothing was written
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// A record with the same unique key already exists
    #[error("{0} already exists")]
    AlreadyExists(Resource),

    /// A referenced record does not exist
    #[error("{0} not found")]
    NotFound(Resource),

    /// Authentication failed; carries no detail
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Unexpected storage or infrastructure fault
    #[error("internal error: {0:#}")]
    Internal(#[source] anyhow::Error),
}

impl ServiceError {
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        ServiceError::Internal(err.into())
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        ServiceError::Internal(err.into())
    }
}

/// Type alias for Result with ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeouts_are_connection_errors() {
        let err = DatabaseError::from(SqlxError::PoolTimedOut);
        assert!(matches!(err, DatabaseError::Connection(_)));
        assert_eq!(err.constraint(), None);
    }

    #[test]
    fn row_not_found_is_a_query_error() {
        let err = DatabaseError::from(SqlxError::RowNotFound);
        assert!(matches!(err, DatabaseError::Query(_)));
    }

    #[test]
    fn database_errors_become_internal_service_errors() {
        let err = ServiceError::from(DatabaseError::Configuration("bad url".into()));
        assert!(matches!(err, ServiceError::Internal(_)));
        assert!(err.to_string().contains("bad url"));
    }

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(
            ServiceError::NotFound(Resource::Image).to_string(),
            "image not found"
        );
        assert_eq!(
            ServiceError::AlreadyExists(Resource::User).to_string(),
            "user already exists"
        );
    }
}
