use thiserror::Error;

/// SQLSTATE reported by PostgreSQL when `CREATE TABLE` hits an existing table.
pub(crate) const DUPLICATE_TABLE: &str = "42P07";

/// Backend-agnostic failures of a data-access call.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The backend could not be reached, or the connection was lost.
    #[error("Connection error: {0}")]
    Connection(String),
    /// A data operation was attempted on a handle that is not open.
    #[error("Database connection is not open")]
    NotOpen,
    /// A constraint was violated (duplicate key, foreign key, not-null).
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
    /// A value could not be computed or converted (overflow, invalid cast).
    #[error("Data calculation error: {0}")]
    DataCalculation(String),
    /// Any other failure reported by the engine.
    #[error("Database error: {0}")]
    Backend(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Maps `sqlx` errors onto the backend-agnostic kinds using the SQLSTATE class.
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
                let message = db_err.message().to_string();
                match code.get(..2) {
                    Some("23") => DatabaseError::DataIntegrity(message),
                    Some("22") => DatabaseError::DataCalculation(message),
                    Some("08") => DatabaseError::Connection(message),
                    _ => DatabaseError::Backend(format!("{} ({})", message, code)),
                }
            }
            e @ (sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_)) => {
                DatabaseError::DataCalculation(e.to_string())
            }
            e @ (sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed) => DatabaseError::Connection(e.to_string()),
            e => DatabaseError::Backend(e.to_string()),
        }
    }
}

pub(crate) fn is_duplicate_table(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(DUPLICATE_TABLE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_errors_are_connection_errors() {
        let err = DatabaseError::from(sqlx::Error::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert!(matches!(err, DatabaseError::Connection(_)));
    }

    #[test]
    fn test_decode_errors_are_calculation_errors() {
        let err = DatabaseError::from(sqlx::Error::Decode("bad value".into()));
        assert!(matches!(err, DatabaseError::DataCalculation(_)));
    }

    #[test]
    fn test_other_driver_errors_are_backend_errors() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DatabaseError::Backend(_)));
        assert!(!is_duplicate_table(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DatabaseError::DataIntegrity("duplicate key".into()).to_string(),
            "Data integrity error: duplicate key"
        );
        assert_eq!(
            DatabaseError::NotOpen.to_string(),
            "Database connection is not open"
        );
    }
}
