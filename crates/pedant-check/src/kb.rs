//! The knowledge base: facts about the files under check.

use nasl_ast::Tree;
use rustc_hash::FxHashMap;

/// The name of a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
  /// The parsed files, as [`Fact::Trees`].
  Trees,
  /// Whether a check should first run the checks it depends on, as [`Fact::Flag`].
  TestMode,
  /// A fact some check provides for others.
  Named(&'static str),
}

/// A fact.
#[derive(Debug, Clone)]
pub enum Fact {
  /// File names and their trees, in the order the caller added them.
  Trees(Vec<(String, Tree)>),
  /// A yes or no.
  Flag(bool),
  /// Anything else.
  Text(String),
}

/// The facts for one run. Checks only run once the facts they require are here.
#[derive(Debug, Default, Clone)]
pub struct Kb {
  store: FxHashMap<Key, Fact>,
}

impl Kb {
  /// Returns a KB holding `trees` under [`Key::Trees`].
  #[must_use]
  pub fn with_trees(trees: Vec<(String, Tree)>) -> Self {
    let mut ret = Self::default();
    ret.insert(Key::Trees, Fact::Trees(trees));
    ret
  }

  /// Sets `key` to `fact`, returning the old fact if there was one.
  pub fn insert(&mut self, key: Key, fact: Fact) -> Option<Fact> {
    self.store.insert(key, fact)
  }

  /// Returns whether `key` is set.
  #[must_use]
  pub fn has_key(&self, key: Key) -> bool {
    self.store.contains_key(&key)
  }

  /// Returns the fact for `key`.
  #[must_use]
  pub fn get(&self, key: Key) -> Option<&Fact> {
    self.store.get(&key)
  }

  /// Returns the parsed files in the order they were added. Empty if there are none.
  pub fn trees(&self) -> impl Iterator<Item = (&str, &Tree)> {
    let trees = match self.store.get(&Key::Trees) {
      Some(Fact::Trees(trees)) => trees.as_slice(),
      Some(_) => {
        log::warn!("{:?} holds something other than trees", Key::Trees);
        &[]
      }
      None => &[],
    };
    trees.iter().map(|(file, tree)| (file.as_str(), tree))
  }

  /// Returns whether test mode is on.
  #[must_use]
  pub fn test_mode(&self) -> bool {
    matches!(self.store.get(&Key::TestMode), Some(Fact::Flag(true)))
  }

  /// Turns test mode on or off.
  pub fn set_test_mode(&mut self, on: bool) {
    self.insert(Key::TestMode, Fact::Flag(on));
  }
}
