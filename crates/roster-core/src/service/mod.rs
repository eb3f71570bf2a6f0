//! Validated CRUD orchestration for persons and clients.
//!
//! Each public operation validates its input, runs its existence checks
//! against the repositories, performs at most one write and returns an
//! [`Envelope`](crate::Envelope). Constraint violations reported by storage
//! on the write are translated to the same failure the pre-check would have
//! produced.

mod client;
mod person;

pub use client::ClientService;
pub use person::PersonService;

use tracing::warn;

use crate::{Error, store::StoreError};

/// Wrap a storage fault nobody anticipated, logging it.
fn unexpected<E: StoreError>(message: &str, error: &E) -> Error {
  warn!(error = %error, "{message}");
  Error::unexpected(message, error)
}

#[cfg(test)]
mod tests;
