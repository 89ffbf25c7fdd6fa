//! [`SqliteStore`] — the SQLite implementation of [`DirectoryStore`].

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use rusqlite::{Connection, Transaction};
use rolodex_core::{directory::Directory, group::Group, store::DirectoryStore};

use crate::{
  Error, Result,
  encode::{RawChange, RawRecord, encode_dt},
  schema::{SCHEMA, SCHEMA_VERSION},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A directory snapshot kept in a single SQLite file.
///
/// Nothing is opened until [`load`](DirectoryStore::load) or
/// [`save`](DirectoryStore::save) is called; each call opens its own
/// connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  fn connect(&self) -> Result<Connection> {
    let conn = Connection::open(&self.path)?;

    let found: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if found > SCHEMA_VERSION {
      return Err(Error::UnsupportedSchema { found, supported: SCHEMA_VERSION });
    }

    conn.execute_batch(SCHEMA)?;
    if found < SCHEMA_VERSION {
      conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(conn)
  }
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = Error;

  fn load(&self) -> Result<Directory> {
    if !self.path.exists() {
      tracing::debug!(path = %self.path.display(), "no snapshot on disk, starting empty");
      return Ok(Directory::new());
    }

    let conn = self.connect()?;
    let directory = read_directory(&conn)?;
    tracing::debug!(
      path = %self.path.display(),
      records = directory.len(),
      "loaded directory snapshot"
    );
    Ok(directory)
  }

  fn save(&self, directory: &Directory) -> Result<()> {
    let mut conn = self.connect()?;
    let tx = conn.transaction()?;
    clear(&tx)?;
    write_directory(&tx, directory)?;
    tx.commit()?;

    tracing::debug!(
      path = %self.path.display(),
      records = directory.len(),
      "saved directory snapshot"
    );
    Ok(())
  }
}

// ─── Reads ───────────────────────────────────────────────────────────────────

fn read_directory(conn: &Connection) -> Result<Directory> {
  let mut phones: HashMap<String, Vec<String>> = HashMap::new();
  {
    let mut stmt =
      conn.prepare("SELECT record_name, number FROM phones ORDER BY record_name, position")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    for row in rows {
      let (name, number) = row?;
      phones.entry(name).or_default().push(number);
    }
  }

  let mut history: HashMap<String, Vec<RawChange>> = HashMap::new();
  {
    let mut stmt = conn.prepare(
      "SELECT record_name, recorded_at, description FROM change_history
       ORDER BY record_name, position",
    )?;
    let rows = stmt.query_map([], |row| {
      Ok((
        row.get::<_, String>(0)?,
        RawChange { recorded_at: row.get(1)?, description: row.get(2)? },
      ))
    })?;
    for row in rows {
      let (name, change) = row?;
      history.entry(name).or_default().push(change);
    }
  }

  let raws: Vec<RawRecord> = {
    let mut stmt = conn.prepare("SELECT name, birthday FROM records")?;
    stmt
      .query_map([], |row| Ok(RawRecord { name: row.get(0)?, birthday: row.get(1)? }))?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  let mut directory = Directory::new();
  for raw in raws {
    let record_phones = phones.remove(&raw.name).unwrap_or_default();
    let record_history = history.remove(&raw.name).unwrap_or_default();
    directory.add_record(raw.into_record(record_phones, record_history)?);
  }

  let mut groups: Vec<Group> = {
    let mut stmt = conn.prepare("SELECT name FROM groups")?;
    stmt
      .query_map([], |row| Ok(Group::new(row.get::<_, String>(0)?)))?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };
  {
    let mut stmt = conn.prepare(
      "SELECT group_name, contact_name FROM group_members ORDER BY group_name, position",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    let mut members: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
      let (group, contact) = row?;
      members.entry(group).or_default().push(contact);
    }
    for group in &mut groups {
      group.contacts = members.remove(&group.name).unwrap_or_default();
    }
  }
  for group in groups {
    directory.insert_group(group);
  }

  Ok(directory)
}

// ─── Writes ──────────────────────────────────────────────────────────────────

fn clear(tx: &Transaction<'_>) -> Result<()> {
  tx.execute_batch(
    "DELETE FROM group_members;
     DELETE FROM groups;
     DELETE FROM change_history;
     DELETE FROM phones;
     DELETE FROM records;",
  )?;
  Ok(())
}

fn write_directory(tx: &Transaction<'_>, directory: &Directory) -> Result<()> {
  let mut insert_record = tx.prepare("INSERT INTO records (name, birthday) VALUES (?1, ?2)")?;
  let mut insert_phone =
    tx.prepare("INSERT INTO phones (record_name, position, number) VALUES (?1, ?2, ?3)")?;
  let mut insert_change = tx.prepare(
    "INSERT INTO change_history (record_name, position, recorded_at, description)
     VALUES (?1, ?2, ?3, ?4)",
  )?;

  for record in directory.records() {
    insert_record.execute(rusqlite::params![
      record.name(),
      record.birthday().map(|b| b.as_str()),
    ])?;
    for (position, phone) in record.phones().iter().enumerate() {
      insert_phone.execute(rusqlite::params![record.name(), position as i64, phone.as_str()])?;
    }
    for (position, change) in record.change_history().iter().enumerate() {
      insert_change.execute(rusqlite::params![
        record.name(),
        position as i64,
        encode_dt(change.recorded_at),
        change.description,
      ])?;
    }
  }

  let mut insert_group = tx.prepare("INSERT INTO groups (name) VALUES (?1)")?;
  let mut insert_member =
    tx.prepare("INSERT INTO group_members (group_name, position, contact_name) VALUES (?1, ?2, ?3)")?;

  for group in directory.groups() {
    insert_group.execute(rusqlite::params![group.name])?;
    for (position, contact) in group.contacts.iter().enumerate() {
      insert_member.execute(rusqlite::params![group.name, position as i64, contact])?;
    }
  }

  Ok(())
}
