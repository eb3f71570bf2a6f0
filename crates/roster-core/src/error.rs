//! Error types for `roster-core`.
//!
//! Every anticipated failure of a service operation is one of four kinds.
//! The kind alone decides the HTTP status; any raw storage detail travels in
//! the separate `diagnostic` string.

use serde::Serialize;
use thiserror::Error;

/// The category of a failed service operation.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  strum::Display,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  /// Malformed or missing required input.
  Validation,
  /// The addressed entity does not exist.
  NotFound,
  /// A uniqueness or referential constraint would be violated.
  Conflict,
  /// An unanticipated storage or runtime fault.
  Unexpected,
}

impl ErrorKind {
  /// The HTTP status code this kind is surfaced as.
  pub fn status_code(self) -> u16 {
    match self {
      Self::Validation => 400,
      Self::NotFound => 404,
      Self::Conflict => 409,
      Self::Unexpected => 500,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Error {
  kind:       ErrorKind,
  message:    String,
  diagnostic: Option<String>,
}

impl Error {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self { kind, message: message.into(), diagnostic: None }
  }

  pub fn validation(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Validation, message)
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::NotFound, message)
  }

  pub fn conflict(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Conflict, message)
  }

  /// An unanticipated fault; the cause text is kept as the diagnostic.
  pub fn unexpected(
    message: impl Into<String>,
    cause: &(dyn std::error::Error + 'static),
  ) -> Self {
    Self::new(ErrorKind::Unexpected, message).with_diagnostic(cause.to_string())
  }

  /// Attach raw storage detail. Never part of the response contract.
  pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
    self.diagnostic = Some(diagnostic.into());
    self
  }

  pub fn kind(&self) -> ErrorKind { self.kind }

  pub fn message(&self) -> &str { &self.message }

  pub fn diagnostic(&self) -> Option<&str> { self.diagnostic.as_deref() }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
