//! The set of all known kinds of checks.

use crate::check::Kind;
use crate::error::{Error, Result};

/// All known kinds of checks, in definition order.
///
/// Built once at startup from a static table and never changed afterwards.
#[derive(Debug)]
pub struct Registry {
  kinds: Vec<&'static Kind>,
}

impl Registry {
  /// Makes a registry from a table of kinds. Later duplicates of a name are ignored.
  #[must_use]
  pub fn new(table: &[&'static Kind]) -> Self {
    let mut kinds = Vec::<&'static Kind>::with_capacity(table.len());
    for &kind in table {
      if kinds.iter().any(|k| k.name == kind.name) {
        log::warn!("check {} registered more than once", kind.name);
        continue;
      }
      kinds.push(kind);
    }
    log::info!("registered {} checks", kinds.len());
    Self { kinds }
  }

  /// Returns every kind, in definition order.
  #[must_use]
  pub fn all(&self) -> &[&'static Kind] {
    &self.kinds
  }

  /// Returns the friendly names of every kind, sorted.
  #[must_use]
  pub fn list(&self) -> Vec<String> {
    let mut ret: Vec<_> = self.kinds.iter().map(|k| k.friendly_name()).collect();
    ret.sort_unstable();
    ret
  }

  /// Returns the kind with this stable or friendly name.
  ///
  /// # Errors
  ///
  /// If there is no such kind.
  pub fn find(&self, name: &str) -> Result<&'static Kind> {
    self
      .kinds
      .iter()
      .copied()
      .find(|k| k.name == name || k.friendly_name() == name)
      .ok_or_else(|| Error::UnknownCheck(name.to_owned()))
  }

  /// Returns the other kinds that provide a fact `kind` requires, in definition order.
  #[must_use]
  pub fn depends(&self, kind: &Kind) -> Vec<&'static Kind> {
    self
      .kinds
      .iter()
      .copied()
      .filter(|k| k.name != kind.name && k.provides.iter().any(|p| kind.requires.contains(p)))
      .collect()
  }
}
