//! Request rejections and the envelope-to-response mapping.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::{Envelope, Error};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// A request that never reached a service.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("malformed request body: {0}")]
  Body(#[from] JsonRejection),

  #[error("malformed path parameter: {0}")]
  Path(#[from] PathRejection),

  #[error("no such route")]
  NoRoute,

  #[error("method not allowed")]
  MethodNotAllowed,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    debug!(error = %self, "rejected request");
    let (status, error) = match &self {
      ApiError::Body(_) | ApiError::Path(_) => {
        (StatusCode::BAD_REQUEST, Error::validation(self.to_string()))
      }
      ApiError::NoRoute => {
        (StatusCode::NOT_FOUND, Error::not_found(self.to_string()))
      }
      ApiError::MethodNotAllowed => (
        StatusCode::METHOD_NOT_ALLOWED,
        Error::validation(self.to_string()),
      ),
    };
    let mut envelope = Envelope::<()>::fail(error);
    envelope.code = u32::from(status.as_u16());
    (status, Json(envelope)).into_response()
  }
}

/// A service envelope on its way out.
///
/// The HTTP status follows the envelope's error kind; a success is `200`, or
/// `201` when built with [`Reply::created`]. Unless diagnostics are exposed,
/// the raw storage diagnostic is logged and dropped from the body.
pub struct Reply<T> {
  envelope:           Envelope<T>,
  created:            bool,
  expose_diagnostics: bool,
}

impl<T> Reply<T> {
  pub fn new(envelope: Envelope<T>, expose_diagnostics: bool) -> Self {
    Self { envelope, created: false, expose_diagnostics }
  }

  pub fn created(mut self) -> Self {
    self.created = true;
    self
  }

  fn status(&self) -> StatusCode {
    match self.envelope.kind() {
      None if self.created => StatusCode::CREATED,
      None => StatusCode::OK,
      Some(kind) => StatusCode::from_u16(kind.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    }
  }
}

impl<T: Serialize> IntoResponse for Reply<T> {
  fn into_response(mut self) -> Response {
    let status = self.status();
    if !self.expose_diagnostics
      && let Some(diagnostic) = self.envelope.take_diagnostic()
    {
      warn!(status = status.as_u16(), %diagnostic, "diagnostic withheld from response");
    }
    (status, Json(self.envelope)).into_response()
  }
}
