//! Client: account credentials and state for exactly one person.
//!
//! A client references its person by `person_id` only. The person's
//! identification is joined in on read; there is no back-reference from
//! person to client.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, person::check_len};

pub const PASSWORD_MAX_LEN: usize = 255;

/// A persisted client.
///
/// The password is kept for round-tripping through the store but is never
/// serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
  pub client_id:      i64,
  pub person_id:      i64,
  /// Identification of the owning person.
  pub identification: String,
  #[serde(skip_serializing)]
  pub password:       String,
  pub active:         bool,
}

/// Input to client create and update. The owning person is addressed by its
/// identification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewClient {
  pub identification: String,
  pub password:       String,
  pub active:         bool,
}

impl NewClient {
  pub fn validate(&self) -> Result<()> {
    if self.identification.is_empty() || self.password.is_empty() {
      return Err(Error::validation("invalid client data"));
    }
    check_len(
      "identification",
      &self.identification,
      crate::person::IDENTIFICATION_MAX_LEN,
    )?;
    check_len("password", &self.password, PASSWORD_MAX_LEN)
  }

  pub fn changes(&self) -> ClientChanges {
    ClientChanges { password: self.password.clone(), active: self.active }
  }
}

/// The only fields a client update may overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientChanges {
  pub password: String,
  pub active:   bool,
}
