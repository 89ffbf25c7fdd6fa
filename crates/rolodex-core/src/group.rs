//! Group — a named list of contact references.
//!
//! Members are stored by record name and resolved through the owning
//! [`Directory`](crate::directory::Directory) on use. A group never owns a
//! record, so deleting a contact can leave a name here that no longer
//! resolves.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub name:     String,
  /// Record names, in the order they were added.
  pub contacts: Vec<String>,
}

impl Group {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), contacts: Vec::new() }
  }

  /// Append a reference to `contact`.
  pub fn add_contact(&mut self, contact: &str) { self.contacts.push(contact.to_owned()); }

  /// Remove the first reference to `contact`; absent names are a no-op.
  pub fn remove_contact(&mut self, contact: &str) {
    if let Some(pos) = self.contacts.iter().position(|c| c == contact) {
      self.contacts.remove(pos);
    }
  }

  pub fn contains(&self, contact: &str) -> bool { self.contacts.iter().any(|c| c == contact) }
}
