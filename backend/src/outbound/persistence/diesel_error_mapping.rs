//! Shared mapping from pool and Diesel failures to port error enums.
//!
//! Every repository port error carries `Connection` and `Query` variants;
//! [`StorageError`] lets the adapters share one mapping for both.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{LabelPersistenceError, RecipePersistenceError, UserPersistenceError};

use super::pool::PoolError;

/// Port error enums with connection and query failure variants.
pub(crate) trait StorageError {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;
}

macro_rules! impl_storage_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl StorageError for $error {
                fn connection(message: String) -> Self {
                    <$error>::connection(message)
                }

                fn query(message: String) -> Self {
                    <$error>::query(message)
                }
            }
        )*
    };
}

impl_storage_error!(
    UserPersistenceError,
    LabelPersistenceError,
    RecipePersistenceError
);

/// Map a pool checkout or build failure to a connection error.
pub(crate) fn map_pool_error<E: StorageError>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection(message)
}

/// Map a Diesel failure to a connection or query error.
///
/// Database messages are logged at debug level and replaced with stable
/// descriptions so SQL details never reach the domain.
pub(crate) fn map_diesel_error<E: StorageError>(error: DieselError) -> E {
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
        DieselError::NotFound => E::query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection("database connection error".to_owned())
        }
        _ => E::query("database error".to_owned()),
    }
}

/// Whether `error` is a unique constraint violation.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}
