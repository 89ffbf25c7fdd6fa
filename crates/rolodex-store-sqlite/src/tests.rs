//! Round-trip tests for `SqliteStore` against scratch database files.

use rolodex_core::{
  directory::{Directory, Member},
  record::Record,
  store::DirectoryStore,
};
use tempfile::TempDir;

use crate::{Error, SqliteStore};

fn scratch() -> (TempDir, SqliteStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = SqliteStore::new(dir.path().join("addressbook.db"));
  (dir, store)
}

fn sample_directory() -> Directory {
  let mut d = Directory::new();

  let mut alice = Record::new("Alice");
  alice.add_phone("0501234567").unwrap();
  alice.set_birthday("29.02.2000").unwrap();
  alice.record_change("created");
  alice.record_change("set birthday");
  d.add_record(alice);

  let mut bob = Record::new("Bob");
  bob.add_phone("0670000000").unwrap();
  bob.add_phone("0670000000").unwrap();
  bob.add_phone("0931112233").unwrap();
  d.add_record(bob);

  let mut carol = Record::new("Carol");
  carol.add_phone("0445556677").unwrap();
  d.add_record(carol);

  d.add_group("friends");
  d.add_group("empty");
  d.add_contact_to_group("Carol", "friends").unwrap();
  d.add_contact_to_group("Alice", "friends").unwrap();
  d
}

// ─── Load ────────────────────────────────────────────────────────────────────

#[test]
fn missing_file_loads_empty_directory() {
  let (_dir, store) = scratch();
  let loaded = store.load().unwrap();
  assert!(loaded.is_empty());
  assert_eq!(loaded.groups().count(), 0);
  assert!(!store.path().exists(), "load must not create the file");
}

// ─── Round trip ──────────────────────────────────────────────────────────────

#[test]
fn save_then_load_reproduces_directory() {
  let (_dir, store) = scratch();
  let original = sample_directory();

  store.save(&original).unwrap();
  let loaded = store.load().unwrap();

  assert_eq!(loaded, original);

  let bob = loaded.find("Bob").unwrap();
  let phones: Vec<&str> = bob.phones().iter().map(|p| p.as_str()).collect();
  assert_eq!(phones, vec!["0670000000", "0670000000", "0931112233"]);

  let alice = loaded.find("Alice").unwrap();
  assert_eq!(alice.birthday().unwrap().as_str(), "29.02.2000");
  assert_eq!(
    alice.change_history(),
    original.find("Alice").unwrap().change_history()
  );

  assert_eq!(
    loaded.group("friends").unwrap().contacts,
    vec!["Carol".to_owned(), "Alice".to_owned()]
  );
  assert!(loaded.group("empty").unwrap().contacts.is_empty());
}

#[test]
fn save_overwrites_previous_snapshot() {
  let (_dir, store) = scratch();
  store.save(&sample_directory()).unwrap();

  let mut smaller = Directory::new();
  smaller.add_record(Record::new("Dave"));
  store.save(&smaller).unwrap();

  let loaded = store.load().unwrap();
  assert_eq!(loaded, smaller);
  assert!(loaded.find("Alice").is_none());
  assert_eq!(loaded.groups().count(), 0);
}

#[test]
fn dangling_group_reference_survives_round_trip() {
  let (_dir, store) = scratch();
  let mut d = sample_directory();
  d.delete("Carol");

  store.save(&d).unwrap();
  let loaded = store.load().unwrap();

  let members = loaded.group_members("friends").unwrap();
  assert_eq!(members[0], Member::Dangling("Carol"));
  assert!(matches!(members[1], Member::Present(r) if r.name() == "Alice"));
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[test]
fn newer_schema_is_refused() {
  let (_dir, store) = scratch();
  store.save(&Directory::new()).unwrap();

  let conn = rusqlite::Connection::open(store.path()).unwrap();
  conn.pragma_update(None, "user_version", 99_i64).unwrap();
  drop(conn);

  assert!(matches!(
    store.load(),
    Err(Error::UnsupportedSchema { found: 99, .. })
  ));
}

#[test]
fn tampered_phone_fails_validation_on_load() {
  let (_dir, store) = scratch();
  store.save(&sample_directory()).unwrap();

  let conn = rusqlite::Connection::open(store.path()).unwrap();
  conn
    .execute("UPDATE phones SET number = 'not-a-phone' WHERE record_name = 'Carol'", [])
    .unwrap();
  drop(conn);

  assert!(matches!(store.load(), Err(Error::Core(_))));
}
