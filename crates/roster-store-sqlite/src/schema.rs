//! SQL schema for the roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    person_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT    NOT NULL,
    gender          TEXT    NOT NULL,
    age             INTEGER NOT NULL CHECK (age >= 0),
    identification  TEXT    NOT NULL UNIQUE,
    address         TEXT,
    phone           TEXT
);

-- At most one client per person. No ON DELETE action: removing a person
-- that still has a client fails with a foreign-key violation.
CREATE TABLE IF NOT EXISTS clients (
    client_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id   INTEGER NOT NULL UNIQUE REFERENCES persons(person_id),
    password    TEXT    NOT NULL,
    active      INTEGER NOT NULL DEFAULT 0   -- 0 | 1
);

PRAGMA user_version = 1;
";
