//! Diesel and pool error mapping for the selection repository.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;
use crate::domain::ports::BoundarySelectionRepositoryError;

pub(super) fn map_pool_error(error: PoolError) -> BoundarySelectionRepositoryError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    BoundarySelectionRepositoryError::connection(message)
}

/// Collapse Diesel failures into connection or query errors.
///
/// Database messages are logged at debug level and never copied into the
/// returned error, which may reach API clients.
pub(super) fn map_diesel_error(error: DieselError) -> BoundarySelectionRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            BoundarySelectionRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            BoundarySelectionRepositoryError::query("concurrent active selection write")
        }
        DieselError::NotFound => BoundarySelectionRepositoryError::query("record not found"),
        DieselError::DeserializationError(_) => {
            BoundarySelectionRepositoryError::query("stored selection could not be read")
        }
        _ => BoundarySelectionRepositoryError::query("database error"),
    }
}
