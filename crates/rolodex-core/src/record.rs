//! Record — one contact's phones, birthday, and change log.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  field::{Birthday, Phone},
};

/// Shown in place of a birthday when none is recorded.
pub const NO_BIRTHDAY: &str = "no birthday on record";

// ─── Change log ──────────────────────────────────────────────────────────────

/// One entry in a record's change history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
  pub recorded_at: DateTime<Utc>,
  pub description: String,
}

impl fmt::Display for ChangeEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.recorded_at.to_rfc3339(), self.description)
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A single contact. The name is fixed at construction and is the record's key
/// inside a [`Directory`](crate::directory::Directory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  name:           String,
  phones:         Vec<Phone>,
  birthday:       Option<Birthday>,
  change_history: Vec<ChangeEntry>,
}

impl Record {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name:           name.into(),
      phones:         Vec::new(),
      birthday:       None,
      change_history: Vec::new(),
    }
  }

  /// Reassemble a record from already-validated parts, e.g. when loading a
  /// persisted snapshot.
  pub fn from_parts(
    name: String,
    phones: Vec<Phone>,
    birthday: Option<Birthday>,
    change_history: Vec<ChangeEntry>,
  ) -> Self {
    Self { name, phones, birthday, change_history }
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn phones(&self) -> &[Phone] { &self.phones }

  pub fn birthday(&self) -> Option<&Birthday> { self.birthday.as_ref() }

  pub fn change_history(&self) -> &[ChangeEntry] { &self.change_history }

  // ── Phones ────────────────────────────────────────────────────────────────

  /// Validate and append `phone`. Duplicates are kept.
  pub fn add_phone(&mut self, phone: &str) -> Result<()> {
    self.phones.push(Phone::parse(phone)?);
    Ok(())
  }

  /// Remove every entry equal to `phone`. Absent numbers are ignored.
  pub fn remove_phone(&mut self, phone: &str) {
    self.phones.retain(|p| p.as_str() != phone);
  }

  /// Replace all occurrences of `old` with a single `new` entry at the end of
  /// the list. A failed edit leaves the record untouched.
  pub fn edit_phone(&mut self, old: &str, new: &str) -> Result<()> {
    if self.find_phone(old).is_none() {
      return Err(Error::PhoneNotFound(old.to_owned()));
    }
    let new = Phone::parse(new)?;
    self.remove_phone(old);
    self.phones.push(new);
    Ok(())
  }

  pub fn find_phone(&self, phone: &str) -> Option<&Phone> {
    self.phones.iter().find(|p| p.as_str() == phone)
  }

  // ── Birthday ──────────────────────────────────────────────────────────────

  /// Set the birthday once. A second call fails even if the value is the same.
  pub fn set_birthday(&mut self, birthday: &str) -> Result<()> {
    if self.birthday.is_some() {
      return Err(Error::BirthdayAlreadySet(self.name.clone()));
    }
    self.birthday = Some(Birthday::parse(birthday)?);
    Ok(())
  }

  // ── History ───────────────────────────────────────────────────────────────

  /// Append a history entry stamped with the current time.
  pub fn record_change(&mut self, description: impl Into<String>) {
    self.change_history.push(ChangeEntry {
      recorded_at: Utc::now(),
      description: description.into(),
    });
  }

  /// Drop the newest history entry and return the description of the entry
  /// that is now newest.
  ///
  /// Returns `None` without touching the log when it holds fewer than two
  /// entries. Only the log changes; phones and birthday are left as they are.
  pub fn revert_last_change(&mut self) -> Option<String> {
    if self.change_history.len() <= 1 {
      return None;
    }
    self.change_history.pop();
    self.change_history.last().map(|e| e.description.clone())
  }
}

impl fmt::Display for Record {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let phones = self
      .phones
      .iter()
      .map(Phone::as_str)
      .collect::<Vec<_>>()
      .join(", ");
    let birthday = self.birthday.as_ref().map_or(NO_BIRTHDAY, Birthday::as_str);
    write!(f, "Name: {}, Phones: {phones}, Birthday: {birthday}", self.name)
  }
}
