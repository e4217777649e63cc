//! Type conversions for GatekeeperError

use super::types::GatekeeperError;
use sea_orm::{DbErr, SqlErr};

// Constraint violations raised by the store are conflicts, not server faults.
impl From<DbErr> for GatekeeperError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                GatekeeperError::Conflict(format!("Unique constraint violated: {}", detail))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                GatekeeperError::Conflict(format!("Referenced entity is still in use: {}", detail))
            }
            _ => GatekeeperError::Database(err),
        }
    }
}

impl From<argon2::password_hash::Error> for GatekeeperError {
    fn from(err: argon2::password_hash::Error) -> Self {
        GatekeeperError::Crypto(err.to_string())
    }
}
