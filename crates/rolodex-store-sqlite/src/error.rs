//! Error type for `rolodex-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A stored value no longer passes field validation.
  #[error("invalid stored value: {0}")]
  Core(#[from] rolodex_core::Error),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unsupported schema version {found}, expected at most {supported}")]
  UnsupportedSchema { found: i64, supported: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
