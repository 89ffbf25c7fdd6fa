//! SQL schema for the Rolodex SQLite store.
//!
//! Executed on every connection. The version is recorded in
//! `PRAGMA user_version`; files written by a newer schema are refused.

/// Version written by this build.
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS records (
    name      TEXT PRIMARY KEY,
    birthday  TEXT              -- DD.MM.YYYY exactly as entered, or NULL
);

-- Duplicates are allowed; position keeps insertion order.
CREATE TABLE IF NOT EXISTS phones (
    record_name TEXT    NOT NULL REFERENCES records(name) ON DELETE CASCADE,
    position    INTEGER NOT NULL,
    number      TEXT    NOT NULL,
    PRIMARY KEY (record_name, position)
);

CREATE TABLE IF NOT EXISTS change_history (
    record_name TEXT    NOT NULL REFERENCES records(name) ON DELETE CASCADE,
    position    INTEGER NOT NULL,
    recorded_at TEXT    NOT NULL,   -- RFC 3339 UTC
    description TEXT    NOT NULL,
    PRIMARY KEY (record_name, position)
);

CREATE TABLE IF NOT EXISTS groups (
    name TEXT PRIMARY KEY
);

-- No foreign key on contact_name: a member may name a record that has since
-- been deleted.
CREATE TABLE IF NOT EXISTS group_members (
    group_name   TEXT    NOT NULL REFERENCES groups(name) ON DELETE CASCADE,
    position     INTEGER NOT NULL,
    contact_name TEXT    NOT NULL,
    PRIMARY KEY (group_name, position)
);
";
