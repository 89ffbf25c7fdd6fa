//! Error types for `rolodex-core`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("phone number must consist of exactly 10 digits: {0:?}")]
  InvalidPhone(String),

  #[error("invalid date {0:?}, use DD.MM.YYYY")]
  InvalidDate(String),

  #[error("birthday is already set for {0}")]
  BirthdayAlreadySet(String),

  #[error("phone number not found: {0}")]
  PhoneNotFound(String),

  #[error("contact not found: {0}")]
  NotFound(String),

  #[error("unsupported sort field: {0:?}")]
  UnsupportedSortField(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
