//! Mapping of sqlx errors into the application taxonomy.

use pos_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error as a persistence failure. The message names the
/// operation; storage details stay in the source.
pub(crate) fn persistence(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::PersistenceFailure, message, e)
}

/// Wrap a migration error as a persistence failure.
pub(crate) fn persistence_migrate(
    message: &'static str,
) -> impl FnOnce(sqlx::migrate::MigrateError) -> AppError {
    move |e| AppError::with_source(ErrorKind::PersistenceFailure, message, e)
}

/// SQLSTATE for a value longer than its column.
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Like [`persistence`], but a unique-constraint violation becomes
/// `DuplicateIdentity` and an oversized value becomes `Validation`.
pub(crate) fn identity_write(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let unique = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        let too_long = e
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == STRING_DATA_RIGHT_TRUNCATION);
        if too_long {
            AppError::with_source(
                ErrorKind::Validation,
                "A field exceeds its maximum length",
                e,
            )
        } else if unique {
            AppError::with_source(
                ErrorKind::DuplicateIdentity,
                "Username or email already registered in tenant",
                e,
            )
        } else {
            AppError::with_source(ErrorKind::PersistenceFailure, message, e)
        }
    }
}
