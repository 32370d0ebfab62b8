//! Shared Diesel error mapping for the persistence adapters.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into an adapter-specific connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
///
/// The raw error is logged at `debug` only; callers receive a sanitised
/// message that never echoes SQL or row data.
pub(crate) fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("check constraint violated")
        }
        DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, _) => {
            query("required column missing")
        }
        _ => query("database error"),
    }
}
