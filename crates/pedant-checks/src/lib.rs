//! The checks, and running all of them over some files.

pub mod socket_leak;

use pedant_check::error::Result;
use pedant_check::{Instance, Kb, Kind, Registry, Summary};

/// Every check, in definition order.
pub static ALL: [&Kind; 1] = [&socket_leak::KIND];

/// Returns a registry of every check.
#[must_use]
pub fn registry() -> Registry {
  Registry::new(&ALL)
}

/// Options for a run.
#[derive(Debug, Default)]
pub struct Init {
  /// Only run the checks with these names, stable or friendly. Run them all if empty.
  pub only: Vec<String>,
}

/// The results of a run.
#[derive(Debug)]
pub struct Outcome {
  /// The finished checks, in the order they finished.
  pub done: Vec<Instance>,
  /// Why the run ended early, and what didn't run.
  pub summary: Summary,
}

/// Runs the checks `init` asks for against `kb`.
///
/// # Errors
///
/// If `init` names a check that does not exist. No checks run then.
pub fn run(kb: &mut Kb, init: &Init) -> Result<Outcome> {
  log::info!("run with {init:?}");
  let registry = registry();
  let pending = if init.only.is_empty() {
    registry.all().to_vec()
  } else {
    let mut pending = Vec::<&'static Kind>::with_capacity(init.only.len());
    for name in &init.only {
      let kind = registry.find(name)?;
      if !pending.iter().any(|k| k.name == kind.name) {
        pending.push(kind);
      }
    }
    pending
  };
  let mut done = Vec::with_capacity(pending.len());
  let summary = pedant_check::run_in_dependency_order(&registry, kb, pending, |chk| done.push(chk));
  log::info!("{} checks done, {} not run", done.len(), summary.not_run.len());
  Ok(Outcome { done, summary })
}
