//! Conversions from external infrastructure errors into domain errors.

use frontdesk_domain::FrontdeskError;
use r2d2::Error as PoolError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FrontdeskError);

impl From<InfraError> for FrontdeskError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FrontdeskError> for InfraError {
    fn from(value: FrontdeskError) -> Self {
        InfraError(value)
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;

        let mapped = match &value {
            SqlError::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.clone().unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => {
                        FrontdeskError::Storage("database is busy".into())
                    }
                    ErrorCode::DatabaseLocked => {
                        FrontdeskError::Storage("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => {
                        FrontdeskError::Storage(format!("constraint violation: {message}"))
                    }
                    _ => FrontdeskError::Storage(format!("sqlite failure: {value}")),
                }
            }
            SqlError::QueryReturnedNoRows => FrontdeskError::Storage("no rows".into()),
            other => FrontdeskError::Storage(format!("sqlite error: {other}")),
        };
        InfraError(mapped)
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(FrontdeskError::Storage(format!("connection pool error: {value}")))
    }
}

impl From<tokio::task::JoinError> for InfraError {
    fn from(value: tokio::task::JoinError) -> Self {
        InfraError(FrontdeskError::Internal(format!("blocking task failed: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_become_storage_errors() {
        let err: FrontdeskError = InfraError(FrontdeskError::Storage("x".into())).into();
        assert!(matches!(err, FrontdeskError::Storage(_)));
    }

    #[test]
    fn no_rows_maps_to_storage() {
        let err: InfraError = SqlError::QueryReturnedNoRows.into();
        assert!(matches!(err.0, FrontdeskError::Storage(_)));
    }
}
