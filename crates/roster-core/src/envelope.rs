//! The uniform outcome wrapper returned by every service operation.
//!
//! A success carries the payload, the internal `100000` sentinel code and the
//! message `"OK"`. A failure carries no payload; its code is the HTTP status
//! of its [`ErrorKind`], and storage detail (engine messages, extended error
//! numbers) is confined to `diagnostic`.

use serde::Serialize;

use crate::error::{Error, ErrorKind};

/// Code reported by every successful envelope.
pub const SUCCESS_CODE: u32 = 100_000;

/// Message reported by every successful envelope.
pub const SUCCESS_MESSAGE: &str = "OK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
  pub success:    bool,
  pub data:       Option<T>,
  pub code:       u32,
  pub message:    String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:      Option<ErrorKind>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub diagnostic: Option<String>,
}

impl<T> Envelope<T> {
  pub fn ok(data: T) -> Self {
    Self {
      success:    true,
      data:       Some(data),
      code:       SUCCESS_CODE,
      message:    SUCCESS_MESSAGE.to_owned(),
      error:      None,
      diagnostic: None,
    }
  }

  pub fn fail(error: Error) -> Self {
    let kind = error.kind();
    Self {
      success:    false,
      data:       None,
      code:       u32::from(kind.status_code()),
      message:    error.message().to_owned(),
      error:      Some(kind),
      diagnostic: error.diagnostic().map(str::to_owned),
    }
  }

  pub fn is_success(&self) -> bool { self.success }

  /// The failure kind, or `None` for a success.
  pub fn kind(&self) -> Option<ErrorKind> { self.error }

  /// Drop the diagnostic, returning it.
  pub fn take_diagnostic(&mut self) -> Option<String> { self.diagnostic.take() }
}

impl<T> From<Result<T, Error>> for Envelope<T> {
  fn from(result: Result<T, Error>) -> Self {
    match result {
      Ok(data) => Self::ok(data),
      Err(error) => Self::fail(error),
    }
  }
}
