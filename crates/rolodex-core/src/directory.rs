//! Directory — the address book that owns every record and group.

use std::{collections::BTreeMap, fmt};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  Error, Result,
  birthday::{self, UpcomingBirthday},
  group::Group,
  record::Record,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Fields accepted by [`Directory::sort_contacts`]. Parsing ignores ASCII case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SortField {
  Name,
  Phone,
  Birthday,
}

/// Result of a group-management call that can fall through to a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOutcome {
  Applied,
  AlreadyExists,
  NoSuchGroup,
}

impl fmt::Display for GroupOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Applied => f.write_str("done"),
      Self::AlreadyExists => f.write_str("a group with that name already exists"),
      Self::NoSuchGroup => f.write_str("no group with that name exists"),
    }
  }
}

/// A group member resolved against the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member<'a> {
  Present(&'a Record),
  /// The record was deleted after being added to the group.
  Dangling(&'a str),
}

// ─── Directory ───────────────────────────────────────────────────────────────

/// All records and groups for one user.
///
/// Records are keyed by name; iteration follows key order. Groups refer to
/// records by name only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
  records: BTreeMap<String, Record>,
  groups:  BTreeMap<String, Group>,
}

impl Directory {
  pub fn new() -> Self { Self::default() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn records(&self) -> impl Iterator<Item = &Record> { self.records.values() }

  pub fn groups(&self) -> impl Iterator<Item = &Group> { self.groups.values() }

  pub fn group(&self, name: &str) -> Option<&Group> { self.groups.get(name) }

  // ── Records ───────────────────────────────────────────────────────────────

  /// Insert `record` under its name, returning whatever was stored there
  /// before. An existing record is replaced wholesale, not merged.
  pub fn add_record(&mut self, record: Record) -> Option<Record> {
    self.records.insert(record.name().to_owned(), record)
  }

  /// Exact, case-sensitive lookup.
  pub fn find(&self, name: &str) -> Option<&Record> { self.records.get(name) }

  pub fn find_mut(&mut self, name: &str) -> Option<&mut Record> { self.records.get_mut(name) }

  /// Remove the record if present. Group references to it are left in place;
  /// see [`Directory::prune_dangling_references`].
  pub fn delete(&mut self, name: &str) -> Option<Record> { self.records.remove(name) }

  /// Records whose name contains `needle`, case-sensitively.
  pub fn search_by_partial_name(&self, needle: &str) -> Vec<&Record> {
    self.records().filter(|r| r.name().contains(needle)).collect()
  }

  /// Parse `field` and sort all records by it.
  pub fn sort_contacts(&self, field: &str) -> Result<Vec<&Record>> {
    let field = field
      .parse::<SortField>()
      .map_err(|_| Error::UnsupportedSortField(field.to_owned()))?;
    Ok(self.sorted_by(field))
  }

  /// All records in ascending order of `field`.
  ///
  /// Phones compare by the first number and birthdays by their raw
  /// `DD.MM.YYYY` text, so birthdays sort by day of month first. Records
  /// missing the field compare as the empty string and come first.
  pub fn sorted_by(&self, field: SortField) -> Vec<&Record> {
    let mut records: Vec<&Record> = self.records().collect();
    match field {
      SortField::Name => records.sort_by(|a, b| a.name().cmp(b.name())),
      SortField::Phone => records.sort_by(|a, b| first_phone(a).cmp(first_phone(b))),
      SortField::Birthday => records.sort_by(|a, b| raw_birthday(a).cmp(raw_birthday(b))),
    }
    records
  }

  // ── Birthdays ─────────────────────────────────────────────────────────────

  /// Congratulation dates for birthdays in the next seven days, today
  /// included, measured from the local calendar date.
  pub fn get_upcoming_birthdays(&self) -> Vec<UpcomingBirthday> {
    self.upcoming_birthdays_from(Local::now().date_naive())
  }

  pub fn upcoming_birthdays_from(&self, today: NaiveDate) -> Vec<UpcomingBirthday> {
    self
      .records()
      .filter_map(|r| {
        let date = birthday::congratulation_date(r.birthday()?, today)?;
        Some(UpcomingBirthday { name: r.name().to_owned(), congratulation_date: date })
      })
      .collect()
  }

  /// `(name, raw birthday)` for birthdays one to seven days after the local
  /// calendar date, looking at this year's date only.
  pub fn check_upcoming_birthdays(&self) -> Vec<(String, String)> {
    self.check_upcoming_birthdays_from(Local::now().date_naive())
  }

  pub fn check_upcoming_birthdays_from(&self, today: NaiveDate) -> Vec<(String, String)> {
    self
      .records()
      .filter_map(|r| {
        let bday = r.birthday()?;
        birthday::notification_due(bday, today)
          .then(|| (r.name().to_owned(), bday.as_str().to_owned()))
      })
      .collect()
  }

  // ── Groups ────────────────────────────────────────────────────────────────

  pub fn add_group(&mut self, name: &str) -> GroupOutcome {
    if self.groups.contains_key(name) {
      return GroupOutcome::AlreadyExists;
    }
    self.groups.insert(name.to_owned(), Group::new(name));
    GroupOutcome::Applied
  }

  /// Insert a fully-populated group, replacing any group of the same name.
  pub fn insert_group(&mut self, group: Group) { self.groups.insert(group.name.clone(), group); }

  pub fn remove_group(&mut self, name: &str) -> GroupOutcome {
    match self.groups.remove(name) {
      Some(_) => GroupOutcome::Applied,
      None => GroupOutcome::NoSuchGroup,
    }
  }

  /// Add the record named `contact` to `group`.
  ///
  /// Fails with [`Error::NotFound`] if the record does not exist; a missing
  /// group is reported through the outcome instead.
  pub fn add_contact_to_group(&mut self, contact: &str, group: &str) -> Result<GroupOutcome> {
    if !self.records.contains_key(contact) {
      return Err(Error::NotFound(contact.to_owned()));
    }
    Ok(match self.groups.get_mut(group) {
      Some(g) => {
        g.add_contact(contact);
        GroupOutcome::Applied
      }
      None => GroupOutcome::NoSuchGroup,
    })
  }

  pub fn remove_contact_from_group(&mut self, contact: &str, group: &str) -> Result<GroupOutcome> {
    if !self.records.contains_key(contact) {
      return Err(Error::NotFound(contact.to_owned()));
    }
    Ok(match self.groups.get_mut(group) {
      Some(g) => {
        g.remove_contact(contact);
        GroupOutcome::Applied
      }
      None => GroupOutcome::NoSuchGroup,
    })
  }

  /// Resolve a group's member names through the directory.
  pub fn group_members(&self, group: &str) -> Option<Vec<Member<'_>>> {
    let group = self.groups.get(group)?;
    Some(
      group
        .contacts
        .iter()
        .map(|name| match self.records.get(name) {
          Some(r) => Member::Present(r),
          None => Member::Dangling(name),
        })
        .collect(),
    )
  }

  /// Drop group references to records that no longer exist. Returns how many
  /// references were removed.
  pub fn prune_dangling_references(&mut self) -> usize {
    let records = &self.records;
    self
      .groups
      .values_mut()
      .map(|g| {
        let before = g.contacts.len();
        g.contacts.retain(|c| records.contains_key(c));
        before - g.contacts.len()
      })
      .sum()
  }
}

fn first_phone(record: &Record) -> &str { record.phones().first().map_or("", |p| p.as_str()) }

fn raw_birthday(record: &Record) -> &str { record.birthday().map_or("", |b| b.as_str()) }

impl fmt::Display for Directory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, record) in self.records().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{record}")?;
    }
    Ok(())
  }
}
