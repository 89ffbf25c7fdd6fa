//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Phones and birthdays are stored
//! exactly as entered and revalidated on the way back in.

use chrono::{DateTime, Utc};
use rolodex_core::{
  field::{Birthday, Phone},
  record::{ChangeEntry, Record},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `records` row.
pub struct RawRecord {
  pub name:     String,
  pub birthday: Option<String>,
}

/// Raw strings read directly from a `change_history` row.
pub struct RawChange {
  pub recorded_at: String,
  pub description: String,
}

impl RawChange {
  pub fn into_entry(self) -> Result<ChangeEntry> {
    Ok(ChangeEntry {
      recorded_at: decode_dt(&self.recorded_at)?,
      description: self.description,
    })
  }
}

impl RawRecord {
  /// Validate the stored strings and assemble a [`Record`].
  pub fn into_record(self, phones: Vec<String>, history: Vec<RawChange>) -> Result<Record> {
    let phones = phones
      .into_iter()
      .map(Phone::try_from)
      .collect::<Result<Vec<_>, _>>()?;
    let birthday = self.birthday.map(Birthday::try_from).transpose()?;
    let history = history
      .into_iter()
      .map(RawChange::into_entry)
      .collect::<Result<Vec<_>>>()?;

    Ok(Record::from_parts(self.name, phones, birthday, history))
  }
}
