//! Errors surfaced at the command boundary.
//!
//! Every variant is recoverable: the read loop prints it and keeps going.

use thiserror::Error;

use crate::commands::Command;

#[derive(Debug, Error)]
pub enum CommandError {
  #[error("not enough arguments, usage: {}", .0.usage())]
  MissingArgs(Command),

  #[error("too many arguments, usage: {}", .0.usage())]
  TooManyArgs(Command),

  #[error("unknown command: {0:?}")]
  UnknownCommand(String),

  #[error(transparent)]
  Core(#[from] rolodex_core::Error),
}
