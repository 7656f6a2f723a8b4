pub mod sqlite_auth_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_cabin_repo;
pub mod sqlite_user_repo;

pub mod postgres_auth_repo;
pub mod postgres_booking_repo;
pub mod postgres_cabin_repo;
pub mod postgres_user_repo;

use crate::error::{AppError, FieldErrors};

/// Unique violations on `users` become field errors on the column that clashed.
pub(crate) fn user_write_error(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            // Postgres names the index; SQLite only reports "UNIQUE constraint failed: users.<column>".
            let detail = db_err.constraint().unwrap_or_else(|| db_err.message()).to_string();
            if detail.contains("email") {
                return AppError::FieldValidation(FieldErrors::single("email", "A user with that email already exists."));
            }
            if detail.contains("username") {
                return AppError::FieldValidation(FieldErrors::single("username", "A user with that username already exists."));
            }
        }
    }
    AppError::Database(e)
}
