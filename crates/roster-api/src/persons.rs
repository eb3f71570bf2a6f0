//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path                        | Notes                             |
//! |----------|-----------------------------|-----------------------------------|
//! | `GET`    | `/persons`                  | Empty list is a success           |
//! | `POST`   | `/persons`                  | `201` on success                  |
//! | `GET`    | `/persons/{identification}` | `404` if not found                |
//! | `PUT`    | `/persons/{identification}` | Body identification must match    |
//! | `DELETE` | `/persons/{identification}` | `409` while a client refers to it |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use roster_core::{
  person::{NewPerson, Person},
  store::{ClientRepository, PersonRepository},
};

use crate::{ApiState, error::ApiError, error::Reply};

/// `GET /persons`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Reply<Vec<Person>>
where
  S: PersonRepository + ClientRepository,
{
  state.reply(state.persons.list().await)
}

/// `POST /persons`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<NewPerson>, JsonRejection>,
) -> Result<Reply<Person>, ApiError>
where
  S: PersonRepository + ClientRepository,
{
  let Json(input) = body?;
  Ok(state.reply(state.persons.create(input).await).created())
}

/// `GET /persons/{identification}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<String>, PathRejection>,
) -> Result<Reply<Person>, ApiError>
where
  S: PersonRepository + ClientRepository,
{
  let Path(identification) = path?;
  Ok(state.reply(state.persons.get_by_identification(&identification).await))
}

/// `PUT /persons/{identification}`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<String>, PathRejection>,
  body: Result<Json<NewPerson>, JsonRejection>,
) -> Result<Reply<Person>, ApiError>
where
  S: PersonRepository + ClientRepository,
{
  let Path(identification) = path?;
  let Json(input) = body?;
  Ok(state.reply(state.persons.update(&identification, input).await))
}

/// `DELETE /persons/{identification}`
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<String>, PathRejection>,
) -> Result<Reply<String>, ApiError>
where
  S: PersonRepository + ClientRepository,
{
  let Path(identification) = path?;
  Ok(state.reply(state.persons.delete(&identification).await))
}
