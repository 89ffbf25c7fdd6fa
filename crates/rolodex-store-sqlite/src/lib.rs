//! SQLite backend for the Rolodex directory.
//!
//! The whole directory is stored as one snapshot in a single database file.
//! Every save rewrites the snapshot inside one transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
