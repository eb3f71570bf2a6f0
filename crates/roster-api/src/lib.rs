//! JSON REST API for the roster services.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`PersonRepository`] and [`ClientRepository`]. Every response body except
//! `/health` is a [`roster_core::Envelope`], including rejected requests and
//! unmatched routes. TLS and tracing layers are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(roster_api::api_router(store.clone(), false))
//! ```

pub mod clients;
pub mod error;
pub mod persons;

use std::sync::Arc;

use axum::{Router, routing::get};
use roster_core::{
  Envelope,
  service::{ClientService, PersonService},
  store::{ClientRepository, PersonRepository},
};

pub use error::{ApiError, Reply};

// ─── State ───────────────────────────────────────────────────────────────────

/// Services shared by all handlers.
pub struct ApiState<S> {
  persons:            PersonService<S>,
  clients:            ClientService<S, S>,
  expose_diagnostics: bool,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      persons:            self.persons.clone(),
      clients:            self.clients.clone(),
      expose_diagnostics: self.expose_diagnostics,
    }
  }
}

impl<S: PersonRepository + ClientRepository> ApiState<S> {
  pub fn new(store: Arc<S>, expose_diagnostics: bool) -> Self {
    Self {
      persons: PersonService::new(Arc::clone(&store)),
      clients: ClientService::new(Arc::clone(&store), store),
      expose_diagnostics,
    }
  }
}

impl<S> ApiState<S> {
  fn reply<T>(&self, envelope: Envelope<T>) -> Reply<T> {
    Reply::new(envelope, self.expose_diagnostics)
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `store`.
///
/// With `expose_diagnostics` unset, raw storage diagnostics are logged but
/// never sent to clients.
pub fn api_router<S>(store: Arc<S>, expose_diagnostics: bool) -> Router<()>
where
  S: PersonRepository + ClientRepository + 'static,
{
  Router::new()
    .route("/health", get(health))
    // Persons
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/persons/{identification}",
      get(persons::get_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete::<S>),
    )
    // Clients
    .route("/clients", get(clients::list::<S>).post(clients::create::<S>))
    .route("/clients/id/{client_id}", get(clients::get_by_id::<S>))
    .route(
      "/clients/{identification}",
      get(clients::get_one::<S>)
        .put(clients::update::<S>)
        .delete(clients::delete::<S>),
    )
    .fallback(no_route)
    .method_not_allowed_fallback(method_not_allowed)
    .with_state(ApiState::new(store, expose_diagnostics))
}

async fn health() -> &'static str { "ok" }

async fn no_route() -> ApiError { ApiError::NoRoute }

async fn method_not_allowed() -> ApiError { ApiError::MethodNotAllowed }

// ─── Tests ───────────────────────────────────────────────────────────────────
