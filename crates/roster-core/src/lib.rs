//! Core types, repository traits and services for the roster service.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement [`store::PersonRepository`] and
//! [`store::ClientRepository`]; the HTTP layer calls into [`service`].

pub mod client;
pub mod envelope;
pub mod error;
pub mod person;
pub mod service;
pub mod store;

pub use envelope::Envelope;
pub use error::{Error, ErrorKind, Result};
