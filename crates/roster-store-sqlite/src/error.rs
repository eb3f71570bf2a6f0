//! Error type for `roster-store-sqlite`.

use roster_core::store::{StoreError, Violation};
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A unique or foreign-key constraint rejected a write.
  #[error("{message} (extended code {code})")]
  Constraint {
    violation: Violation,
    code:      i32,
    message:   String,
  },

  #[error("database error: {0}")]
  Database(#[source] tokio_rusqlite::Error),

  #[error("invalid stored value: {0}")]
  Decode(String),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      failure,
      message,
    )) = &e
    {
      let violation = match failure.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
          Some(Violation::Unique)
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Violation::ForeignKey),
        _ => None,
      };
      if let Some(violation) = violation {
        return Error::Constraint {
          violation,
          code: failure.extended_code,
          message: message.clone().unwrap_or_else(|| failure.to_string()),
        };
      }
    }
    Error::Database(e)
  }
}

impl StoreError for Error {
  fn violation(&self) -> Option<Violation> {
    match self {
      Error::Constraint { violation, .. } => Some(*violation),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
