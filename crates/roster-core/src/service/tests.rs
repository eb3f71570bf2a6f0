//! Service tests against an in-memory repository that behaves like a store
//! with unique and foreign-key constraints, and can be told to misbehave.

use std::sync::{
  Arc, Mutex,
  atomic::{AtomicBool, AtomicI64, Ordering},
};

use crate::{
  ErrorKind,
  client::{Client, ClientChanges, NewClient},
  person::{NewPerson, Person, PersonChanges},
  service::{ClientService, PersonService},
  store::{ClientRepository, PersonRepository, StoreError, Violation},
};

// ─── Fake store ──────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
enum FakeError {
  #[error("constraint failed: {0:?}")]
  Constraint(Violation),
  #[error("disk on fire")]
  Broken,
}

impl StoreError for FakeError {
  fn violation(&self) -> Option<Violation> {
    match self {
      Self::Constraint(v) => Some(*v),
      Self::Broken => None,
    }
  }
}

struct ClientRow {
  client_id: i64,
  person_id: i64,
  password:  String,
  active:    bool,
}

#[derive(Default)]
struct MemoryStore {
  persons:              Mutex<Vec<Person>>,
  clients:              Mutex<Vec<ClientRow>>,
  next_id:              AtomicI64,
  /// Person lookups miss, as if a concurrent writer had not committed yet.
  blind_person_lookups: AtomicBool,
  /// Client lookups miss, likewise.
  blind_client_lookups: AtomicBool,
  /// Writes find no row, as if a concurrent writer had just removed it.
  vanish_on_write:      AtomicBool,
  /// Rows already removed that person lookups still return.
  stale_persons:        Mutex<Vec<Person>>,
  /// Client deletes trip a foreign-key constraint.
  referenced_clients:   AtomicBool,
  broken:               AtomicBool,
}

impl MemoryStore {
  fn check(&self) -> Result<(), FakeError> {
    if self.broken.load(Ordering::SeqCst) {
      return Err(FakeError::Broken);
    }
    Ok(())
  }

  fn next_id(&self) -> i64 { self.next_id.fetch_add(1, Ordering::SeqCst) + 1 }

  fn person_count(&self) -> usize { self.persons.lock().unwrap().len() }

  fn client_count(&self) -> usize { self.clients.lock().unwrap().len() }

  fn to_client(&self, row: &ClientRow) -> Client {
    let identification = self
      .persons
      .lock()
      .unwrap()
      .iter()
      .find(|p| p.person_id == row.person_id)
      .map(|p| p.identification.clone())
      .unwrap_or_default();
    Client {
      client_id: row.client_id,
      person_id: row.person_id,
      identification,
      password: row.password.clone(),
      active: row.active,
    }
  }

  /// Remove a person behind the services' back, leaving lookups stale.
  fn remove_person_concurrently(&self, identification: &str) {
    let mut persons = self.persons.lock().unwrap();
    let mut stale = self.stale_persons.lock().unwrap();
    stale.extend(
      persons
        .iter()
        .filter(|p| p.identification == identification)
        .cloned(),
    );
    persons.retain(|p| p.identification != identification);
  }

  fn person_id_of(&self, identification: &str) -> Option<i64> {
    self
      .persons
      .lock()
      .unwrap()
      .iter()
      .find(|p| p.identification == identification)
      .map(|p| p.person_id)
  }
}

impl PersonRepository for MemoryStore {
  type Error = FakeError;

  async fn list_persons(&self) -> Result<Vec<Person>, FakeError> {
    self.check()?;
    Ok(self.persons.lock().unwrap().clone())
  }

  async fn find_person(
    &self,
    identification: &str,
  ) -> Result<Option<Person>, FakeError> {
    self.check()?;
    if self.blind_person_lookups.load(Ordering::SeqCst) {
      return Ok(None);
    }
    let live = self
      .persons
      .lock()
      .unwrap()
      .iter()
      .find(|p| p.identification == identification)
      .cloned();
    Ok(live.or_else(|| {
      self
        .stale_persons
        .lock()
        .unwrap()
        .iter()
        .find(|p| p.identification == identification)
        .cloned()
    }))
  }

  async fn insert_person(&self, input: NewPerson) -> Result<Person, FakeError> {
    self.check()?;
    let mut persons = self.persons.lock().unwrap();
    if persons.iter().any(|p| p.identification == input.identification) {
      return Err(FakeError::Constraint(Violation::Unique));
    }
    let person = Person {
      person_id:      self.next_id(),
      name:           input.name,
      gender:         input.gender,
      age:            input.age,
      identification: input.identification,
      address:        input.address,
      phone:          input.phone,
    };
    persons.push(person.clone());
    Ok(person)
  }

  async fn update_person(
    &self,
    identification: &str,
    changes: PersonChanges,
  ) -> Result<Option<Person>, FakeError> {
    self.check()?;
    if self.vanish_on_write.load(Ordering::SeqCst) {
      return Ok(None);
    }
    let mut persons = self.persons.lock().unwrap();
    Ok(
      persons
        .iter_mut()
        .find(|p| p.identification == identification)
        .map(|p| {
          p.name = changes.name;
          p.gender = changes.gender;
          p.age = changes.age;
          p.address = changes.address;
          p.phone = changes.phone;
          p.clone()
        }),
    )
  }

  async fn delete_person(&self, identification: &str) -> Result<bool, FakeError> {
    self.check()?;
    if self.vanish_on_write.load(Ordering::SeqCst) {
      return Ok(false);
    }
    let Some(person_id) = self.person_id_of(identification) else {
      return Ok(false);
    };
    if self.clients.lock().unwrap().iter().any(|c| c.person_id == person_id) {
      return Err(FakeError::Constraint(Violation::ForeignKey));
    }
    self.persons.lock().unwrap().retain(|p| p.person_id != person_id);
    Ok(true)
  }
}

impl ClientRepository for MemoryStore {
  type Error = FakeError;

  async fn list_clients(&self) -> Result<Vec<Client>, FakeError> {
    self.check()?;
    let clients = self.clients.lock().unwrap();
    Ok(clients.iter().map(|row| self.to_client(row)).collect())
  }

  async fn find_client(
    &self,
    identification: &str,
  ) -> Result<Option<Client>, FakeError> {
    self.check()?;
    if self.blind_client_lookups.load(Ordering::SeqCst) {
      return Ok(None);
    }
    let Some(person_id) = self.person_id_of(identification) else {
      return Ok(None);
    };
    let clients = self.clients.lock().unwrap();
    Ok(
      clients
        .iter()
        .find(|c| c.person_id == person_id)
        .map(|row| self.to_client(row)),
    )
  }

  async fn find_client_by_id(
    &self,
    client_id: i64,
  ) -> Result<Option<Client>, FakeError> {
    self.check()?;
    let clients = self.clients.lock().unwrap();
    Ok(
      clients
        .iter()
        .find(|c| c.client_id == client_id)
        .map(|row| self.to_client(row)),
    )
  }

  async fn insert_client(
    &self,
    person_id: i64,
    input: NewClient,
  ) -> Result<Client, FakeError> {
    self.check()?;
    if !self.persons.lock().unwrap().iter().any(|p| p.person_id == person_id) {
      return Err(FakeError::Constraint(Violation::ForeignKey));
    }
    let mut clients = self.clients.lock().unwrap();
    if clients.iter().any(|c| c.person_id == person_id) {
      return Err(FakeError::Constraint(Violation::Unique));
    }
    let row = ClientRow {
      client_id: self.next_id(),
      person_id,
      password: input.password,
      active: input.active,
    };
    let client = self.to_client(&row);
    clients.push(row);
    Ok(client)
  }

  async fn update_client(
    &self,
    identification: &str,
    changes: ClientChanges,
  ) -> Result<Option<Client>, FakeError> {
    self.check()?;
    if self.vanish_on_write.load(Ordering::SeqCst) {
      return Ok(None);
    }
    let Some(person_id) = self.person_id_of(identification) else {
      return Ok(None);
    };
    let mut clients = self.clients.lock().unwrap();
    let Some(row) = clients.iter_mut().find(|c| c.person_id == person_id)
    else {
      return Ok(None);
    };
    row.password = changes.password;
    row.active = changes.active;
    Ok(Some(self.to_client(row)))
  }

  async fn delete_client(&self, identification: &str) -> Result<bool, FakeError> {
    self.check()?;
    if self.referenced_clients.load(Ordering::SeqCst) {
      return Err(FakeError::Constraint(Violation::ForeignKey));
    }
    let Some(person_id) = self.person_id_of(identification) else {
      return Ok(false);
    };
    let mut clients = self.clients.lock().unwrap();
    let before = clients.len();
    clients.retain(|c| c.person_id != person_id);
    Ok(clients.len() < before)
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn services() -> (
  Arc<MemoryStore>,
  PersonService<MemoryStore>,
  ClientService<MemoryStore, MemoryStore>,
) {
  let store = Arc::new(MemoryStore::default());
  let persons = PersonService::new(Arc::clone(&store));
  let clients = ClientService::new(Arc::clone(&store), Arc::clone(&store));
  (store, persons, clients)
}

fn person(identification: &str, name: &str) -> NewPerson {
  NewPerson {
    name:           name.into(),
    gender:         "Masculino".into(),
    age:            30,
    identification: identification.into(),
    address:        None,
    phone:          None,
  }
}

fn client(identification: &str, password: &str) -> NewClient {
  NewClient {
    identification: identification.into(),
    password:       password.into(),
    active:         true,
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_returns_the_person() {
  let (_, persons, _) = services();

  let created = persons.create(person("1234567890", "Juan Perez")).await;
  assert!(created.is_success());
  let created = created.data.unwrap();
  assert!(created.person_id > 0);

  let fetched = persons.get_by_identification("1234567890").await;
  assert!(fetched.is_success());
  assert_eq!(fetched.data.unwrap(), created);
}

#[tokio::test]
async fn duplicate_create_conflicts_and_keeps_one_row() {
  let (store, persons, _) = services();
  persons.create(person("1234567890", "Juan Perez")).await;

  let second = persons.create(person("1234567890", "Otro")).await;
  assert_eq!(second.kind(), Some(ErrorKind::Conflict));
  assert_eq!(second.code, 409);
  assert_eq!(store.person_count(), 1);
}

#[tokio::test]
async fn create_requires_identification_and_name() {
  let (store, persons, _) = services();

  let env = persons.create(person("", "Juan Perez")).await;
  assert_eq!(env.kind(), Some(ErrorKind::Validation));

  let env = persons.create(person("1234567890", "")).await;
  assert_eq!(env.kind(), Some(ErrorKind::Validation));
  assert_eq!(store.person_count(), 0);
}

#[tokio::test]
async fn duplicate_that_slips_past_the_check_is_a_conflict() {
  let (store, persons, _) = services();
  persons.create(person("1234567890", "Juan Perez")).await;

  store.blind_person_lookups.store(true, Ordering::SeqCst);
  let env = persons.create(person("1234567890", "Juan Perez")).await;
  assert_eq!(env.kind(), Some(ErrorKind::Conflict));
  assert!(env.diagnostic.is_some());
  assert_eq!(store.person_count(), 1);
}

#[tokio::test]
async fn storage_fault_is_unexpected_with_cause() {
  let (store, persons, _) = services();
  store.broken.store(true, Ordering::SeqCst);

  let env = persons.create(person("1234567890", "Juan Perez")).await;
  assert_eq!(env.kind(), Some(ErrorKind::Unexpected));
  assert_eq!(env.code, 500);
  assert_eq!(env.diagnostic.as_deref(), Some("disk on fire"));
}

#[tokio::test]
async fn empty_list_is_a_success() {
  let (_, persons, clients) = services();

  let env = persons.list().await;
  assert!(env.is_success());
  assert_eq!(env.data, Some(vec![]));

  let env = clients.list().await;
  assert!(env.is_success());
  assert_eq!(env.data, Some(vec![]));
}

#[tokio::test]
async fn update_overwrites_mutable_fields() {
  let (_, persons, _) = services();
  persons.create(person("1122334455", "Carlos Andrade")).await;

  let mut changed = person("1122334455", "Carlos Alberto Andrade");
  changed.age = 41;
  changed.address = Some("Cuenca, Ecuador".into());
  let env = persons.update("1122334455", changed).await;
  assert!(env.is_success());

  let fetched = persons.get_by_identification("1122334455").await.data.unwrap();
  assert_eq!(fetched.name, "Carlos Alberto Andrade");
  assert_eq!(fetched.age, 41);
  assert_eq!(fetched.address.as_deref(), Some("Cuenca, Ecuador"));
}

#[tokio::test]
async fn update_with_mismatched_identification_is_rejected() {
  let (_, persons, _) = services();
  persons.create(person("1122334455", "Carlos Andrade")).await;

  let env = persons
    .update("1122334455", person("9999999999", "Someone Else"))
    .await;
  assert_eq!(env.kind(), Some(ErrorKind::Validation));
  assert_eq!(env.code, 400);

  let fetched = persons.get_by_identification("1122334455").await.data.unwrap();
  assert_eq!(fetched.name, "Carlos Andrade");
}

#[tokio::test]
async fn update_of_missing_person_is_not_found() {
  let (_, persons, _) = services();
  let env = persons.update("5555555555", person("5555555555", "Nadie")).await;
  assert_eq!(env.kind(), Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn update_of_vanished_person_is_a_conflict() {
  let (store, persons, _) = services();
  persons.create(person("1122334455", "Carlos Andrade")).await;

  store.vanish_on_write.store(true, Ordering::SeqCst);
  let env = persons.update("1122334455", person("1122334455", "Carlos")).await;
  assert_eq!(env.kind(), Some(ErrorKind::Conflict));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
  let (_, persons, _) = services();
  persons.create(person("2233445566", "Ana Torres")).await;

  let env = persons.delete("2233445566").await;
  assert!(env.is_success());
  assert!(env.data.unwrap().contains("2233445566"));

  let env = persons.get_by_identification("2233445566").await;
  assert_eq!(env.kind(), Some(ErrorKind::NotFound));
  assert_eq!(env.code, 404);
}

#[tokio::test]
async fn delete_validates_and_checks_existence() {
  let (_, persons, _) = services();

  assert_eq!(persons.delete("").await.kind(), Some(ErrorKind::Validation));
  assert_eq!(
    persons.delete("0000000000").await.kind(),
    Some(ErrorKind::NotFound)
  );
}

#[tokio::test]
async fn delete_of_vanished_person_is_not_found() {
  let (store, persons, _) = services();
  persons.create(person("2233445566", "Ana Torres")).await;

  store.vanish_on_write.store(true, Ordering::SeqCst);
  let env = persons.delete("2233445566").await;
  assert_eq!(env.kind(), Some(ErrorKind::NotFound));
  assert_eq!(env.message, "no person found with identification 2233445566");
}

#[tokio::test]
async fn delete_of_referenced_person_is_a_conflict() {
  let (store, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;
  assert!(clients.create(client("1234567890", "secret")).await.is_success());

  let env = persons.delete("1234567890").await;
  assert_eq!(env.kind(), Some(ErrorKind::Conflict));
  assert_eq!(store.person_count(), 1);
}

#[tokio::test]
async fn get_with_empty_identification_is_rejected() {
  let (_, persons, clients) = services();
  assert_eq!(
    persons.get_by_identification("").await.kind(),
    Some(ErrorKind::Validation)
  );
  assert_eq!(
    clients.get_by_identification("").await.kind(),
    Some(ErrorKind::Validation)
  );
}

// ─── Clients ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn client_for_missing_person_is_not_found() {
  let (store, _, clients) = services();

  let env = clients.create(client("1234567890", "secret")).await;
  assert_eq!(env.kind(), Some(ErrorKind::NotFound));
  assert_eq!(store.client_count(), 0);
}

#[tokio::test]
async fn second_client_for_a_person_conflicts() {
  let (store, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;

  let first = clients.create(client("1234567890", "secret")).await;
  assert!(first.is_success());
  let first = first.data.unwrap();
  assert_eq!(first.identification, "1234567890");

  let second = clients.create(client("1234567890", "other")).await;
  assert_eq!(second.kind(), Some(ErrorKind::Conflict));
  assert_eq!(store.client_count(), 1);
}

#[tokio::test]
async fn duplicate_client_that_slips_past_the_check_is_a_conflict() {
  let (store, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;
  clients.create(client("1234567890", "secret")).await;

  store.blind_client_lookups.store(true, Ordering::SeqCst);
  let env = clients.create(client("1234567890", "secret")).await;
  assert_eq!(env.kind(), Some(ErrorKind::Conflict));
  assert_eq!(store.client_count(), 1);
}

#[tokio::test]
async fn client_for_person_removed_mid_create_is_not_found() {
  let (store, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;
  store.remove_person_concurrently("1234567890");

  let env = clients.create(client("1234567890", "secret")).await;
  assert_eq!(env.kind(), Some(ErrorKind::NotFound));
  assert_eq!(env.message, "associated person not found");
  assert!(env.diagnostic.unwrap().contains("ForeignKey"));
  assert_eq!(store.client_count(), 0);
}

#[tokio::test]
async fn client_create_requires_password() {
  let (_, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;

  let env = clients.create(client("1234567890", "")).await;
  assert_eq!(env.kind(), Some(ErrorKind::Validation));
}

#[tokio::test]
async fn client_update_overwrites_password_and_state_only() {
  let (_, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;
  let created = clients.create(client("1234567890", "secret")).await.data.unwrap();

  let mut changes = client("1234567890", "new-secret");
  changes.active = false;
  let env = clients.update("1234567890", changes).await;
  assert!(env.is_success());

  let updated = env.data.unwrap();
  assert_eq!(updated.client_id, created.client_id);
  assert_eq!(updated.person_id, created.person_id);
  assert_eq!(updated.password, "new-secret");
  assert!(!updated.active);
}

#[tokio::test]
async fn client_update_rejects_mismatch_and_missing() {
  let (_, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;

  let env = clients.update("1234567890", client("0987654321", "x")).await;
  assert_eq!(env.kind(), Some(ErrorKind::Validation));

  let env = clients.update("1234567890", client("1234567890", "x")).await;
  assert_eq!(env.kind(), Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn update_of_vanished_client_is_not_found() {
  let (store, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;
  clients.create(client("1234567890", "secret")).await;

  store.vanish_on_write.store(true, Ordering::SeqCst);
  let env = clients.update("1234567890", client("1234567890", "x")).await;
  assert_eq!(env.kind(), Some(ErrorKind::NotFound));
  assert_eq!(env.message, "client not found");
}

#[tokio::test]
async fn client_delete_constraint_failure_is_unexpected() {
  let (store, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;
  clients.create(client("1234567890", "secret")).await;

  store.referenced_clients.store(true, Ordering::SeqCst);
  let env = clients.delete("1234567890").await;
  assert_eq!(env.kind(), Some(ErrorKind::Unexpected));
  assert_eq!(env.code, 500);
  assert_eq!(store.client_count(), 1);
}

#[tokio::test]
async fn client_get_by_id() {
  let (_, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;
  let created = clients.create(client("1234567890", "secret")).await.data.unwrap();

  let env = clients.get_by_id(created.client_id).await;
  assert_eq!(env.data, Some(created));

  assert_eq!(clients.get_by_id(0).await.kind(), Some(ErrorKind::Validation));
  assert_eq!(
    clients.get_by_id(4242).await.kind(),
    Some(ErrorKind::NotFound)
  );
}

#[tokio::test]
async fn client_delete_then_person_delete() {
  let (_, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;
  clients.create(client("1234567890", "secret")).await;

  let env = clients.delete("1234567890").await;
  assert!(env.is_success());
  assert_eq!(
    clients.get_by_identification("1234567890").await.kind(),
    Some(ErrorKind::NotFound)
  );
  assert_eq!(
    clients.delete("1234567890").await.kind(),
    Some(ErrorKind::NotFound)
  );

  assert!(persons.delete("1234567890").await.is_success());
}

#[tokio::test]
async fn client_list_carries_person_identification() {
  let (_, persons, clients) = services();
  persons.create(person("1234567890", "Juan Perez")).await;
  persons.create(person("0987654321", "Maria Lopez")).await;
  clients.create(client("1234567890", "a")).await;
  clients.create(client("0987654321", "b")).await;

  let listed = clients.list().await.data.unwrap();
  let mut ids: Vec<_> = listed.iter().map(|c| c.identification.as_str()).collect();
  ids.sort_unstable();
  assert_eq!(ids, ["0987654321", "1234567890"]);
}
