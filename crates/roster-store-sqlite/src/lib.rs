//! SQLite backend for the roster repositories.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Uniqueness of identifications and the
//! one-client-per-person rule are enforced by the schema; violations surface
//! through [`roster_core::store::StoreError::violation`].

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
