use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::unexpected;
use crate::{
  Envelope, Error, Result,
  person::{NewPerson, Person},
  store::{PersonRepository, StoreError, Violation},
};

pub struct PersonService<R> {
  repo: Arc<R>,
}

impl<R> Clone for PersonService<R> {
  fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: PersonRepository> PersonService<R> {
  pub fn new(repo: Arc<R>) -> Self { Self { repo } }

  /// All persons. An empty store is a success with an empty list.
  pub async fn list(&self) -> Envelope<Vec<Person>> {
    self.try_list().await.into()
  }

  pub async fn get_by_identification(
    &self,
    identification: &str,
  ) -> Envelope<Person> {
    self.try_get(identification).await.into()
  }

  pub async fn create(&self, input: NewPerson) -> Envelope<Person> {
    self.try_create(input).await.into()
  }

  /// Overwrite name, gender, age, address and phone of an existing person.
  /// `identification` must match the payload's.
  pub async fn update(
    &self,
    identification: &str,
    input: NewPerson,
  ) -> Envelope<Person> {
    self.try_update(identification, input).await.into()
  }

  /// Delete by identification. The payload is a confirmation message.
  pub async fn delete(&self, identification: &str) -> Envelope<String> {
    self.try_delete(identification).await.into()
  }

  #[instrument(skip(self))]
  async fn try_list(&self) -> Result<Vec<Person>> {
    let persons = self
      .repo
      .list_persons()
      .await
      .map_err(|e| unexpected("failed to list persons", &e))?;
    debug!(count = persons.len(), "listed persons");
    Ok(persons)
  }

  #[instrument(skip(self))]
  async fn try_get(&self, identification: &str) -> Result<Person> {
    if identification.is_empty() {
      return Err(Error::validation("the identification is required"));
    }
    self
      .find(identification)
      .await?
      .ok_or_else(|| Error::not_found("the person was not found"))
  }

  #[instrument(skip(self, input), fields(identification = %input.identification))]
  async fn try_create(&self, input: NewPerson) -> Result<Person> {
    input.validate()?;

    if self.find(&input.identification).await?.is_some() {
      return Err(Error::conflict("the identification already exists"));
    }

    match self.repo.insert_person(input).await {
      Ok(person) => {
        info!(person_id = person.person_id, "person created");
        Ok(person)
      }
      Err(e) if e.violation() == Some(Violation::Unique) => {
        warn!(error = %e, "duplicate identification rejected by storage");
        Err(
          Error::conflict("the identification already exists")
            .with_diagnostic(e.to_string()),
        )
      }
      Err(e) => Err(unexpected("unexpected error creating the person", &e)),
    }
  }

  #[instrument(skip(self, input))]
  async fn try_update(
    &self,
    identification: &str,
    input: NewPerson,
  ) -> Result<Person> {
    if identification != input.identification {
      return Err(Error::validation(
        "the identification provided does not match the entity",
      ));
    }
    input.validate()?;

    if self.find(identification).await?.is_none() {
      return Err(Error::not_found("the person was not found"));
    }

    match self.repo.update_person(identification, input.changes()).await {
      Ok(Some(person)) => {
        info!(person_id = person.person_id, "person updated");
        Ok(person)
      }
      Ok(None) => {
        warn!("person vanished between check and update");
        Err(Error::conflict(
          "the operation could not complete because the data was modified \
           or removed by another process",
        ))
      }
      Err(e) => Err(unexpected("unexpected error updating the person", &e)),
    }
  }

  #[instrument(skip(self))]
  async fn try_delete(&self, identification: &str) -> Result<String> {
    if identification.is_empty() {
      return Err(Error::validation("the identification must not be empty"));
    }

    let not_found = || {
      Error::not_found(format!(
        "no person found with identification {identification}"
      ))
    };

    if self.find(identification).await?.is_none() {
      return Err(not_found());
    }

    match self.repo.delete_person(identification).await {
      Ok(true) => {
        info!("person deleted");
        Ok(format!(
          "the person with identification {identification} has been deleted"
        ))
      }
      Ok(false) => Err(not_found()),
      Err(e) if e.violation() == Some(Violation::ForeignKey) => {
        warn!(error = %e, "person is still referenced");
        Err(
          Error::conflict(
            "cannot delete the person because it is referenced by other \
             records",
          )
          .with_diagnostic(e.to_string()),
        )
      }
      Err(e) => Err(unexpected("unexpected error deleting the person", &e)),
    }
  }

  async fn find(&self, identification: &str) -> Result<Option<Person>> {
    self
      .repo
      .find_person(identification)
      .await
      .map_err(|e| unexpected("failed to look up the person", &e))
  }
}
