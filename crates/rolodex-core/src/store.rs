//! The `DirectoryStore` trait.
//!
//! Implemented by persistence backends (e.g. `rolodex-store-sqlite`). The
//! command layer depends on this abstraction, not on a concrete backend.

use crate::directory::Directory;

/// Whole-snapshot persistence for a [`Directory`].
///
/// There is no incremental write path: `save` replaces everything previously
/// stored with the current state, and `load` reads it back in one go.
pub trait DirectoryStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the stored snapshot. A store that has never been written yields an
  /// empty directory rather than an error.
  fn load(&self) -> Result<Directory, Self::Error>;

  /// Overwrite the stored snapshot with `directory`.
  fn save(&self, directory: &Directory) -> Result<(), Self::Error>;
}
