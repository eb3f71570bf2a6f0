use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::unexpected;
use crate::{
  Envelope, Error, Result,
  client::{Client, NewClient},
  person::Person,
  store::{ClientRepository, PersonRepository, StoreError, Violation},
};

/// Client operations. Needs the person repository to resolve the owning
/// person on create.
pub struct ClientService<C, P> {
  clients: Arc<C>,
  persons: Arc<P>,
}

impl<C, P> Clone for ClientService<C, P> {
  fn clone(&self) -> Self {
    Self {
      clients: Arc::clone(&self.clients),
      persons: Arc::clone(&self.persons),
    }
  }
}

impl<C: ClientRepository, P: PersonRepository> ClientService<C, P> {
  pub fn new(clients: Arc<C>, persons: Arc<P>) -> Self {
    Self { clients, persons }
  }

  pub async fn list(&self) -> Envelope<Vec<Client>> {
    self.try_list().await.into()
  }

  /// Look up the client owned by the person with `identification`.
  pub async fn get_by_identification(
    &self,
    identification: &str,
  ) -> Envelope<Client> {
    self.try_get(identification).await.into()
  }

  pub async fn get_by_id(&self, client_id: i64) -> Envelope<Client> {
    self.try_get_by_id(client_id).await.into()
  }

  pub async fn create(&self, input: NewClient) -> Envelope<Client> {
    self.try_create(input).await.into()
  }

  /// Overwrite password and active state only.
  pub async fn update(
    &self,
    identification: &str,
    input: NewClient,
  ) -> Envelope<Client> {
    self.try_update(identification, input).await.into()
  }

  pub async fn delete(&self, identification: &str) -> Envelope<String> {
    self.try_delete(identification).await.into()
  }

  #[instrument(skip(self))]
  async fn try_list(&self) -> Result<Vec<Client>> {
    let clients = self
      .clients
      .list_clients()
      .await
      .map_err(|e| unexpected("failed to list clients", &e))?;
    debug!(count = clients.len(), "listed clients");
    Ok(clients)
  }

  #[instrument(skip(self))]
  async fn try_get(&self, identification: &str) -> Result<Client> {
    if identification.is_empty() {
      return Err(Error::validation("the identification is required"));
    }
    self
      .find(identification)
      .await?
      .ok_or_else(|| Error::not_found("client not found"))
  }

  #[instrument(skip(self))]
  async fn try_get_by_id(&self, client_id: i64) -> Result<Client> {
    if client_id <= 0 {
      return Err(Error::validation("the client id must be a positive number"));
    }
    self
      .clients
      .find_client_by_id(client_id)
      .await
      .map_err(|e| unexpected("failed to look up the client", &e))?
      .ok_or_else(|| Error::not_found("client not found"))
  }

  #[instrument(skip(self, input), fields(identification = %input.identification))]
  async fn try_create(&self, input: NewClient) -> Result<Client> {
    input.validate()?;

    let person = self
      .find_person(&input.identification)
      .await?
      .ok_or_else(|| Error::not_found("associated person not found"))?;

    if self.find(&input.identification).await?.is_some() {
      return Err(Error::conflict(
        "a client already exists for this person",
      ));
    }

    match self.clients.insert_client(person.person_id, input).await {
      Ok(client) => {
        info!(client_id = client.client_id, "client created");
        Ok(client)
      }
      Err(e) => match e.violation() {
        Some(Violation::Unique) => {
          warn!(error = %e, "duplicate client rejected by storage");
          Err(
            Error::conflict("a client already exists for this person")
              .with_diagnostic(e.to_string()),
          )
        }
        Some(Violation::ForeignKey) => {
          warn!(error = %e, "owning person removed before insert");
          Err(
            Error::not_found("associated person not found")
              .with_diagnostic(e.to_string()),
          )
        }
        None => Err(unexpected("unexpected error creating the client", &e)),
      },
    }
  }

  #[instrument(skip(self, input))]
  async fn try_update(
    &self,
    identification: &str,
    input: NewClient,
  ) -> Result<Client> {
    if input.identification.is_empty() {
      return Err(Error::validation("invalid client data"));
    }
    if identification != input.identification {
      return Err(Error::validation(
        "the identification provided does not match the entity",
      ));
    }
    input.validate()?;

    if self.find(identification).await?.is_none() {
      return Err(Error::not_found("client not found"));
    }

    let updated = self
      .clients
      .update_client(identification, input.changes())
      .await
      .map_err(|e| unexpected("unexpected error updating the client", &e))?
      .ok_or_else(|| Error::not_found("client not found"))?;
    info!(client_id = updated.client_id, "client updated");
    Ok(updated)
  }

  #[instrument(skip(self))]
  async fn try_delete(&self, identification: &str) -> Result<String> {
    if identification.is_empty() {
      return Err(Error::validation("the identification is required"));
    }

    if self.find(identification).await?.is_none() {
      return Err(Error::not_found("client not found"));
    }

    match self.clients.delete_client(identification).await {
      Ok(true) => {
        info!("client deleted");
        Ok("client deleted successfully".to_owned())
      }
      Ok(false) => Err(Error::not_found("client not found")),
      Err(e) => Err(unexpected("unexpected error deleting the client", &e)),
    }
  }

  async fn find(&self, identification: &str) -> Result<Option<Client>> {
    self
      .clients
      .find_client(identification)
      .await
      .map_err(|e| unexpected("failed to look up the client", &e))
  }

  async fn find_person(&self, identification: &str) -> Result<Option<Person>> {
    self
      .persons
      .find_person(identification)
      .await
      .map_err(|e| unexpected("failed to look up the person", &e))
  }
}
