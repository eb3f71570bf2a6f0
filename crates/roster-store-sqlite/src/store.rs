//! [`SqliteStore`], the SQLite implementation of the roster repositories.

use std::path::Path;

use roster_core::{
  client::{Client, ClientChanges, NewClient},
  person::{NewPerson, Person, PersonChanges},
  store::{ClientRepository, PersonRepository},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RawClient, RawPerson, SELECT_CLIENT, SELECT_PERSON, encode_active},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Person and client repositories backed by a single SQLite file.
///
/// Cloning shares the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_client(
    &self,
    filter: &'static str,
    key: rusqlite::types::Value,
  ) -> Result<Option<Client>> {
    let raw: Option<RawClient> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{SELECT_CLIENT} WHERE {filter} = ?1"),
              rusqlite::params![key],
              RawClient::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawClient::into_client).transpose()
  }
}

// ─── PersonRepository impl ───────────────────────────────────────────────────

impl PersonRepository for SqliteStore {
  type Error = Error;

  async fn list_persons(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("{SELECT_PERSON} ORDER BY person_id"))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn find_person(&self, identification: &str) -> Result<Option<Person>> {
    let identification = identification.to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{SELECT_PERSON} WHERE identification = ?1"),
              rusqlite::params![identification],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn insert_person(&self, input: NewPerson) -> Result<Person> {
    let NewPerson { name, gender, age, identification, address, phone } =
      input;

    let raw: RawPerson = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (name, gender, age, identification, address, phone)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![name, gender, age, identification, address, phone],
        )?;
        Ok(RawPerson {
          person_id: conn.last_insert_rowid(),
          name,
          gender,
          age: i64::from(age),
          identification,
          address,
          phone,
        })
      })
      .await?;

    raw.into_person()
  }

  async fn update_person(
    &self,
    identification: &str,
    changes: PersonChanges,
  ) -> Result<Option<Person>> {
    let identification = identification.to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE persons
           SET name = ?1, gender = ?2, age = ?3, address = ?4, phone = ?5
           WHERE identification = ?6",
          rusqlite::params![
            changes.name,
            changes.gender,
            changes.age,
            changes.address,
            changes.phone,
            identification,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let row = tx.query_row(
          &format!("{SELECT_PERSON} WHERE identification = ?1"),
          rusqlite::params![identification],
          RawPerson::from_row,
        )?;
        tx.commit()?;
        Ok(Some(row))
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn delete_person(&self, identification: &str) -> Result<bool> {
    let identification = identification.to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM persons WHERE identification = ?1",
          rusqlite::params![identification],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }
}

// ─── ClientRepository impl ───────────────────────────────────────────────────

impl ClientRepository for SqliteStore {
  type Error = Error;

  async fn list_clients(&self) -> Result<Vec<Client>> {
    let raws: Vec<RawClient> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("{SELECT_CLIENT} ORDER BY c.client_id"))?;
        let rows = stmt
          .query_map([], RawClient::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClient::into_client).collect()
  }

  async fn find_client(&self, identification: &str) -> Result<Option<Client>> {
    self
      .query_client("p.identification", identification.to_owned().into())
      .await
  }

  async fn find_client_by_id(&self, client_id: i64) -> Result<Option<Client>> {
    self.query_client("c.client_id", client_id.into()).await
  }

  async fn insert_client(
    &self,
    person_id: i64,
    input: NewClient,
  ) -> Result<Client> {
    let password = input.password;
    let active = encode_active(input.active);

    let raw: RawClient = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO clients (person_id, password, active) VALUES (?1, ?2, ?3)",
          rusqlite::params![person_id, password, active],
        )?;
        let client_id = tx.last_insert_rowid();
        let row = tx.query_row(
          &format!("{SELECT_CLIENT} WHERE c.client_id = ?1"),
          rusqlite::params![client_id],
          RawClient::from_row,
        )?;
        tx.commit()?;
        Ok(row)
      })
      .await?;

    raw.into_client()
  }

  async fn update_client(
    &self,
    identification: &str,
    changes: ClientChanges,
  ) -> Result<Option<Client>> {
    let identification = identification.to_owned();
    let active = encode_active(changes.active);

    let raw: Option<RawClient> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE clients
           SET password = ?1, active = ?2
           WHERE person_id =
             (SELECT person_id FROM persons WHERE identification = ?3)",
          rusqlite::params![changes.password, active, identification],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let row = tx.query_row(
          &format!("{SELECT_CLIENT} WHERE p.identification = ?1"),
          rusqlite::params![identification],
          RawClient::from_row,
        )?;
        tx.commit()?;
        Ok(Some(row))
      })
      .await?;

    raw.map(RawClient::into_client).transpose()
  }

  async fn delete_client(&self, identification: &str) -> Result<bool> {
    let identification = identification.to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM clients
           WHERE person_id =
             (SELECT person_id FROM persons WHERE identification = ?1)",
          rusqlite::params![identification],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }
}
