//! Checks: what they need, and what one run of one produces.

use crate::error::{Error, Result};
use crate::kb::{Kb, Key};
use std::fmt;

/// A kind of check.
#[derive(Debug)]
pub struct Kind {
  /// The stable name, like `SocketLeak`.
  pub name: &'static str,
  /// Facts that must be in the KB before this may run.
  pub requires: &'static [Key],
  /// Facts this adds to the KB when it runs.
  pub provides: &'static [Key],
  /// The body of the check. Sets the verdict and reports on the instance.
  pub run: fn(&mut Instance, &mut Kb),
}

impl Kind {
  /// Returns whether every fact this requires is in `kb`.
  #[must_use]
  pub fn ready(&self, kb: &Kb) -> bool {
    self.requires.iter().all(|&key| kb.has_key(key))
  }

  /// Returns the name to show to people, e.g. `Socket Leak`.
  #[must_use]
  pub fn friendly_name(&self) -> String {
    friendly_name(self.name)
  }
}

/// `foo::CheckSocketLeak` and `SocketLeak` both become `Socket Leak`.
pub(crate) fn friendly_name(name: &str) -> String {
  let name = name.rsplit("::").next().unwrap_or(name);
  let name = name.strip_prefix("Check").unwrap_or(name);
  let mut ret = String::with_capacity(name.len() + 4);
  for c in name.chars() {
    if c.is_ascii_uppercase() {
      ret.push(' ');
    }
    ret.push(c);
  }
  ret.trim().to_owned()
}

/// The verdict of a check.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  /// No verdict yet.
  #[default]
  Void,
  /// Passed.
  Pass,
  /// Failed.
  Fail,
  /// Passed with warnings.
  Warn,
  /// Did not apply.
  Skip,
  /// Hit a fatal error. No more checks run after this.
  Died,
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Status::Void => "VOID",
      Status::Pass => "PASS",
      Status::Fail => "FAIL",
      Status::Warn => "WARN",
      Status::Skip => "SKIP",
      Status::Died => "DIED",
    };
    f.write_str(s)
  }
}

/// How bad a report line is. Ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
  /// An error.
  Error,
  /// A warning.
  Warn,
  /// Extra information.
  Info,
}

impl std::str::FromStr for Severity {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let ret = match s {
      "error" => Self::Error,
      "warn" => Self::Warn,
      "info" => Self::Info,
      _ => return Err(Error::UnknownSeverity(s.to_owned())),
    };
    Ok(ret)
  }
}

/// One run of one kind of check.
#[derive(Debug)]
pub struct Instance {
  kind: &'static Kind,
  status: Status,
  report: Vec<(Severity, String)>,
}

impl Instance {
  pub(crate) fn new(kind: &'static Kind) -> Self {
    Self { kind, status: Status::Void, report: Vec::new() }
  }

  pub(crate) fn run(&mut self, kb: &mut Kb) {
    (self.kind.run)(self, kb);
  }

  /// Returns the kind of check this is a run of.
  #[must_use]
  pub fn kind(&self) -> &'static Kind {
    self.kind
  }

  /// Returns the verdict.
  #[must_use]
  pub fn status(&self) -> Status {
    self.status
  }

  /// Returns everything reported, in order.
  #[must_use]
  pub fn lines(&self) -> &[(Severity, String)] {
    &self.report
  }

  /// Sets the verdict to pass.
  pub fn pass(&mut self) {
    self.status = Status::Pass;
  }

  /// Sets the verdict to fail.
  pub fn fail(&mut self) {
    self.status = Status::Fail;
  }

  /// Sets the verdict to warn.
  pub fn warn(&mut self) {
    self.status = Status::Warn;
  }

  /// Sets the verdict to skip.
  pub fn skip(&mut self) {
    self.status = Status::Skip;
  }

  /// Reports an error and sets the verdict to died.
  pub fn fatal(&mut self) {
    self.report(Severity::Error, "This is a fatal error.");
    self.status = Status::Died;
  }

  /// Appends a line to the report.
  pub fn report<S>(&mut self, severity: Severity, text: S)
  where
    S: Into<String>,
  {
    self.report.push((severity, text.into()));
  }

  /// Appends a line to the report at the severity named `level`.
  ///
  /// # Errors
  ///
  /// If `level` does not name a severity. Nothing is reported then.
  pub fn report_level<S>(&mut self, level: &str, text: S) -> Result<()>
  where
    S: Into<String>,
  {
    let severity = level.parse::<Severity>()?;
    self.report(severity, text);
    Ok(())
  }

  /// Returns the reported lines at `level` or more severe, joined by newlines.
  #[must_use]
  pub fn filtered(&self, level: Severity) -> String {
    let lines: Vec<_> =
      self.report.iter().filter(|&&(sev, _)| sev <= level).map(|(_, text)| text.as_str()).collect();
    lines.join("\n")
  }

  /// Displays the verdict, the name, and the report lines at `level` or more severe.
  #[must_use]
  pub fn display(&self, level: Severity) -> impl fmt::Display + '_ {
    Display { instance: self, level }
  }
}

struct Display<'a> {
  instance: &'a Instance,
  level: Severity,
}

impl fmt::Display for Display<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = self.instance.kind.friendly_name();
    writeln!(f, "[{}] {name}", self.instance.status)?;
    let body = self.instance.filtered(self.level);
    if !body.is_empty() {
      writeln!(f, "{body}")?;
    }
    Ok(())
  }
}
