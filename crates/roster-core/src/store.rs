//! Repository traits for persons and clients.
//!
//! The traits are implemented by storage backends (e.g.
//! `roster-store-sqlite`). Services depend on these abstractions, never on a
//! concrete backend. Repositories own no business rules: uniqueness and
//! referential checks in the services are a fast path only, and the
//! backend's constraints are the final authority. Backends report a tripped
//! constraint through [`StoreError::violation`].
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  client::{Client, ClientChanges, NewClient},
  person::{NewPerson, Person, PersonChanges},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A storage constraint that rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
  /// A unique index or primary key.
  Unique,
  /// A foreign-key reference.
  ForeignKey,
}

/// Error type of a repository backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The constraint this error reports, if it is a constraint violation.
  fn violation(&self) -> Option<Violation>;
}

// ─── Persons ─────────────────────────────────────────────────────────────────

pub trait PersonRepository: Send + Sync {
  type Error: StoreError;

  /// List every person.
  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Find a person by identification code. Returns `None` if not found.
  fn find_person<'a>(
    &'a self,
    identification: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// Persist a new person; the store assigns `person_id`.
  fn insert_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Overwrite the mutable fields of the person with `identification`.
  /// Returns `None` if no such person exists at write time.
  fn update_person<'a>(
    &'a self,
    identification: &'a str,
    changes: PersonChanges,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// Remove the person with `identification`. Returns `false` if nothing was
  /// removed.
  fn delete_person<'a>(
    &'a self,
    identification: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Clients ─────────────────────────────────────────────────────────────────

pub trait ClientRepository: Send + Sync {
  type Error: StoreError;

  /// List every client joined with its person's identification.
  fn list_clients(
    &self,
  ) -> impl Future<Output = Result<Vec<Client>, Self::Error>> + Send + '_;

  /// Find the client owned by the person with `identification`.
  fn find_client<'a>(
    &'a self,
    identification: &'a str,
  ) -> impl Future<Output = Result<Option<Client>, Self::Error>> + Send + 'a;

  /// Find a client by its surrogate id.
  fn find_client_by_id(
    &self,
    client_id: i64,
  ) -> impl Future<Output = Result<Option<Client>, Self::Error>> + Send + '_;

  /// Persist a new client owned by `person_id`.
  fn insert_client(
    &self,
    person_id: i64,
    input: NewClient,
  ) -> impl Future<Output = Result<Client, Self::Error>> + Send + '_;

  /// Overwrite password and active state of the client owned by the person
  /// with `identification`. Returns `None` if no such client exists.
  fn update_client<'a>(
    &'a self,
    identification: &'a str,
    changes: ClientChanges,
  ) -> impl Future<Output = Result<Option<Client>, Self::Error>> + Send + 'a;

  /// Remove the client owned by the person with `identification`.
  fn delete_client<'a>(
    &'a self,
    identification: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
