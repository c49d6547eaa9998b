//! Errors.

use std::fmt;

/// A result with [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error from misusing the engine. Check verdicts, even fatal ones, are never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// A report was made at a severity that does not exist.
  UnknownSeverity(String),
  /// A check was asked for by a name no registered check has.
  UnknownCheck(String),
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::UnknownSeverity(s) => write!(f, "reporting level {s} is not known"),
      Error::UnknownCheck(s) => write!(f, "no check named {s}"),
    }
  }
}

impl std::error::Error for Error {}
