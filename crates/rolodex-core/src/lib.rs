//! Core types and operations for the Rolodex contact directory.
//!
//! This crate has no I/O or database dependencies. The persistence backend
//! (`rolodex-store-sqlite`) and the command surface (`rolodex-cli`) both
//! depend on it.

pub mod birthday;
pub mod directory;
pub mod error;
pub mod field;
pub mod group;
pub mod record;
pub mod store;

pub use error::{Error, Result};
