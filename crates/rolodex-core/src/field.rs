//! Validated field values stored on a [`Record`](crate::record::Record).
//!
//! Both types keep the exact string the user typed; validation happens once,
//! at construction, so every value reachable from a record is known-good.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The on-disk and user-facing birthday format.
pub const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

// ─── Phone ───────────────────────────────────────────────────────────────────

/// A phone number made of exactly ten ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
  pub fn parse(s: &str) -> Result<Self> {
    validate_phone(s)?;
    Ok(Self(s.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

/// Succeeds iff `s` is exactly ten decimal digits.
pub fn validate_phone(s: &str) -> Result<()> {
  if s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit()) {
    Ok(())
  } else {
    Err(Error::InvalidPhone(s.to_owned()))
  }
}

impl TryFrom<String> for Phone {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> {
    validate_phone(&value)?;
    Ok(Self(value))
  }
}

impl From<Phone> for String {
  fn from(phone: Phone) -> Self { phone.0 }
}

impl fmt::Display for Phone {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Birthday ────────────────────────────────────────────────────────────────

/// A birthday in `DD.MM.YYYY` form, paired with its parsed calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday {
  raw:  String,
  date: NaiveDate,
}

impl Birthday {
  pub fn parse(s: &str) -> Result<Self> {
    let date = validate_birthday(s)?;
    Ok(Self { raw: s.to_owned(), date })
  }

  /// The string exactly as entered.
  pub fn as_str(&self) -> &str { &self.raw }

  pub fn date(&self) -> NaiveDate { self.date }

  pub fn month(&self) -> u32 { self.date.month() }

  pub fn day(&self) -> u32 { self.date.day() }
}

/// Parse `s` as `DD.MM.YYYY` and return the calendar date.
///
/// The shape is checked before handing off to chrono, which on its own would
/// also accept single-digit days and months or years of other widths.
pub fn validate_birthday(s: &str) -> Result<NaiveDate> {
  let invalid = || Error::InvalidDate(s.to_owned());

  let bytes = s.as_bytes();
  let shaped = bytes.len() == 10
    && bytes[2] == b'.'
    && bytes[5] == b'.'
    && bytes
      .iter()
      .enumerate()
      .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
  if !shaped {
    return Err(invalid());
  }

  NaiveDate::parse_from_str(s, BIRTHDAY_FORMAT).map_err(|_| invalid())
}

impl TryFrom<String> for Birthday {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> {
    let date = validate_birthday(&value)?;
    Ok(Self { raw: value, date })
  }
}

impl From<Birthday> for String {
  fn from(birthday: Birthday) -> Self { birthday.raw }
}

impl fmt::Display for Birthday {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.raw) }
}
