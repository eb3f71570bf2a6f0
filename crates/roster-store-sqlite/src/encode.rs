//! Mapping between SQLite rows and the domain types.
//!
//! Each table has one raw row type read straight from the columns and a
//! single conversion into its domain shape. Ages are stored as `INTEGER`
//! (i64) and narrowed on read; the active flag is stored as `0`/`1`.

use roster_core::{client::Client, person::Person};
use rusqlite::Row;

use crate::{Error, Result};

// ─── Column lists ────────────────────────────────────────────────────────────

pub const SELECT_PERSON: &str = "SELECT person_id, name, gender, age, \
                                 identification, address, phone
                                 FROM persons";

pub const SELECT_CLIENT: &str = "SELECT c.client_id, c.person_id, \
                                 p.identification, c.password, c.active
                                 FROM clients c
                                 JOIN persons p ON p.person_id = c.person_id";

// ─── Active flag ─────────────────────────────────────────────────────────────

pub fn encode_active(active: bool) -> i64 { i64::from(active) }

pub fn decode_active(value: i64) -> Result<bool> {
  match value {
    0 => Ok(false),
    1 => Ok(true),
    other => Err(Error::Decode(format!("active flag {other}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:      i64,
  pub name:           String,
  pub gender:         String,
  pub age:            i64,
  pub identification: String,
  pub address:        Option<String>,
  pub phone:          Option<String>,
}

impl RawPerson {
  /// Read the columns of [`SELECT_PERSON`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:      row.get(0)?,
      name:           row.get(1)?,
      gender:         row.get(2)?,
      age:            row.get(3)?,
      identification: row.get(4)?,
      address:        row.get(5)?,
      phone:          row.get(6)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    let age = i32::try_from(self.age)
      .map_err(|_| Error::Decode(format!("age {}", self.age)))?;
    Ok(Person {
      person_id: self.person_id,
      name: self.name,
      gender: self.gender,
      age,
      identification: self.identification,
      address: self.address,
      phone: self.phone,
    })
  }
}

/// Raw values read from a `clients` row joined with its person.
pub struct RawClient {
  pub client_id:      i64,
  pub person_id:      i64,
  pub identification: String,
  pub password:       String,
  pub active:         i64,
}

impl RawClient {
  /// Read the columns of [`SELECT_CLIENT`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      client_id:      row.get(0)?,
      person_id:      row.get(1)?,
      identification: row.get(2)?,
      password:       row.get(3)?,
      active:         row.get(4)?,
    })
  }

  pub fn into_client(self) -> Result<Client> {
    Ok(Client {
      client_id:      self.client_id,
      person_id:      self.person_id,
      identification: self.identification,
      password:       self.password,
      active:         decode_active(self.active)?,
    })
  }
}
