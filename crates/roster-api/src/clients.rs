//! Handlers for `/clients` endpoints.
//!
//! Clients are addressed by the identification of the person that owns them,
//! or by their numeric id under `/clients/id/{client_id}`. Passwords are
//! accepted on create and update but never written back.

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use roster_core::{
  client::{Client, NewClient},
  store::{ClientRepository, PersonRepository},
};

use crate::{ApiState, error::ApiError, error::Reply};

/// `GET /clients`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Reply<Vec<Client>>
where
  S: PersonRepository + ClientRepository,
{
  state.reply(state.clients.list().await)
}

/// `POST /clients`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<NewClient>, JsonRejection>,
) -> Result<Reply<Client>, ApiError>
where
  S: PersonRepository + ClientRepository,
{
  let Json(input) = body?;
  Ok(state.reply(state.clients.create(input).await).created())
}

/// `GET /clients/{identification}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<String>, PathRejection>,
) -> Result<Reply<Client>, ApiError>
where
  S: PersonRepository + ClientRepository,
{
  let Path(identification) = path?;
  Ok(state.reply(state.clients.get_by_identification(&identification).await))
}

/// `GET /clients/id/{client_id}`
pub async fn get_by_id<S>(
  State(state): State<ApiState<S>>,
  client_id: Result<Path<i64>, PathRejection>,
) -> Result<Reply<Client>, ApiError>
where
  S: PersonRepository + ClientRepository,
{
  let Path(client_id) = client_id?;
  Ok(state.reply(state.clients.get_by_id(client_id).await))
}

/// `PUT /clients/{identification}`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<String>, PathRejection>,
  body: Result<Json<NewClient>, JsonRejection>,
) -> Result<Reply<Client>, ApiError>
where
  S: PersonRepository + ClientRepository,
{
  let Path(identification) = path?;
  let Json(input) = body?;
  Ok(state.reply(state.clients.update(&identification, input).await))
}

/// `DELETE /clients/{identification}`
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<String>, PathRejection>,
) -> Result<Reply<String>, ApiError>
where
  S: PersonRepository + ClientRepository,
{
  let Path(identification) = path?;
  Ok(state.reply(state.clients.delete(&identification).await))
}
