//! Error types for tinysql

use thiserror::Error;

/// Result type alias for tinysql operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for building and executing statements
#[derive(Debug, Error)]
pub enum OrmError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error reported by the backend
    #[error("Query error: {0}")]
    Query(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error (strict builders, malformed input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The accumulated builder state cannot be rendered to a usable statement.
    #[error("Unrenderable statement: {0}")]
    Unrenderable(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// `commit`/`rollback` without a prior `begin`
    #[error("No active transaction")]
    NoActiveTransaction,

    /// `begin` while a transaction is already bound
    #[error("A transaction is already active")]
    TransactionActive,

    /// Configuration loading error
    #[error("Config error: {0}")]
    Config(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unrenderable-statement error
    pub fn unrenderable(message: impl Into<String>) -> Self {
        Self::Unrenderable(message.into())
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if the statement was rejected before reaching the backend
    pub fn is_unrenderable(&self) -> bool {
        matches!(self, Self::Unrenderable(_))
    }

    /// Map a sqlx error into a more specific OrmError.
    ///
    /// MySQL error numbers: 1062 duplicate key, 1452 foreign key, 3819 check constraint.
    #[cfg(feature = "mysql")]
    pub fn from_db_error(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                if let Some(mysql_err) = db_err.try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
                {
                    match mysql_err.number() {
                        1062 => return Self::UniqueViolation(message),
                        1452 => return Self::ForeignKeyViolation(message),
                        3819 => return Self::CheckViolation(message),
                        _ => {}
                    }
                }
                Self::Query(message)
            }
            sqlx::Error::RowNotFound => Self::NotFound(err.to_string()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Connection(err.to_string()),
            sqlx::Error::ColumnDecode { index, source } => Self::decode(index.clone(), source.to_string()),
            _ => Self::Query(err.to_string()),
        }
    }
}

#[cfg(feature = "mysql")]
impl From<sqlx::Error> for OrmError {
    fn from(err: sqlx::Error) -> Self {
        Self::from_db_error(err)
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrenderable_is_classified() {
        let err = OrmError::unrenderable("delete requires exactly one table");
        assert!(err.is_unrenderable());
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Unrenderable statement: delete requires exactly one table"
        );
    }

    #[test]
    fn transaction_errors_are_distinct() {
        assert_eq!(OrmError::NoActiveTransaction.to_string(), "No active transaction");
        assert!(!matches!(
            OrmError::TransactionActive,
            OrmError::NoActiveTransaction
        ));
    }
}
