//! Custom error types for the common library
//!
//! This module defines the persistence error taxonomy shared by every
//! store backend, including the classification of constraint violations.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A row references a missing row, or a delete is blocked by a reference
    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    /// A unique column already holds the value
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A row could not be encoded or decoded
    #[error("Row codec error: {0}")]
    Codec(String),
}

impl DatabaseError {
    /// Classify an error returned by a query.
    ///
    /// Constraint violations reported by the server are split out so callers
    /// can tell a conflicting write apart from a broken connection.
    pub fn from_query(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            let constraint = db_err
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db_err.message().to_string());
            if db_err.is_foreign_key_violation() {
                return DatabaseError::ForeignKey(constraint);
            }
            if db_err.is_unique_violation() {
                return DatabaseError::UniqueViolation(constraint);
            }
        }
        DatabaseError::Query(err)
    }

    /// Whether the error is a constraint conflict rather than a store failure
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DatabaseError::ForeignKey(_) | DatabaseError::UniqueViolation(_)
        )
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_classification() {
        assert!(DatabaseError::ForeignKey("bookings_user_id_fkey".into()).is_conflict());
        assert!(DatabaseError::UniqueViolation("inventories_apartment_id_key".into()).is_conflict());
        assert!(!DatabaseError::Codec("bad row".into()).is_conflict());
        assert!(!DatabaseError::Migration("boom".into()).is_conflict());
    }

    #[test]
    fn test_non_database_errors_stay_query_errors() {
        let err = DatabaseError::from_query(SqlxError::RowNotFound);
        assert!(matches!(err, DatabaseError::Query(SqlxError::RowNotFound)));
    }
}
