//! Person: an individual, unique by identification code.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Limits ──────────────────────────────────────────────────────────────────

pub const IDENTIFICATION_MAX_LEN: usize = 13;
pub const NAME_MAX_LEN: usize = 100;
pub const GENDER_MAX_LEN: usize = 10;
pub const ADDRESS_MAX_LEN: usize = 255;
pub const PHONE_MAX_LEN: usize = 20;

// ─── Person ──────────────────────────────────────────────────────────────────

/// A persisted person. `person_id` is assigned by storage on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:      i64,
  pub name:           String,
  pub gender:         String,
  pub age:            i32,
  pub identification: String,
  pub address:        Option<String>,
  pub phone:          Option<String>,
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to person create and update.
///
/// Every field defaults when absent from the request body, so a missing
/// identification surfaces as a validation failure rather than a
/// deserialisation error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPerson {
  pub name:           String,
  pub gender:         String,
  pub age:            i32,
  pub identification: String,
  pub address:        Option<String>,
  pub phone:          Option<String>,
}

impl NewPerson {
  /// Check required fields, column limits and the age range.
  pub fn validate(&self) -> Result<()> {
    if self.identification.is_empty() || self.name.is_empty() {
      return Err(Error::validation(
        "the 'identification' and 'name' fields are required",
      ));
    }
    check_len("identification", &self.identification, IDENTIFICATION_MAX_LEN)?;
    check_len("name", &self.name, NAME_MAX_LEN)?;
    check_len("gender", &self.gender, GENDER_MAX_LEN)?;
    if let Some(address) = &self.address {
      check_len("address", address, ADDRESS_MAX_LEN)?;
    }
    if let Some(phone) = &self.phone {
      check_len("phone", phone, PHONE_MAX_LEN)?;
    }
    if self.age < 0 {
      return Err(Error::validation("'age' must not be negative"));
    }
    Ok(())
  }

  /// The fields an update is allowed to overwrite.
  pub fn changes(&self) -> PersonChanges {
    PersonChanges {
      name:    self.name.clone(),
      gender:  self.gender.clone(),
      age:     self.age,
      address: self.address.clone(),
      phone:   self.phone.clone(),
    }
  }
}

/// The mutable subset of a person. The identification is immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonChanges {
  pub name:    String,
  pub gender:  String,
  pub age:     i32,
  pub address: Option<String>,
  pub phone:   Option<String>,
}

pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
  if value.chars().count() > max {
    return Err(Error::validation(format!(
      "'{field}' must be at most {max} characters"
    )));
  }
  Ok(())
}
