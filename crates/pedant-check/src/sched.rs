//! Running checks once the facts they require are in the KB.

use crate::check::{Instance, Kind, Status};
use crate::kb::Kb;
use crate::registry::Registry;

/// Why a run ended before every pending check ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
  /// A check died.
  Fatal,
  /// None of the remaining checks will ever be ready.
  Deadlock,
}

/// How a run ended.
#[derive(Debug, Default)]
pub struct Summary {
  /// Why the run ended early, if it did.
  pub stop: Option<Stop>,
  /// The checks that never ran, in pending order.
  pub not_run: Vec<&'static Kind>,
}

/// Runs the `pending` checks in batches: each batch is every pending check whose requirements are
/// in `kb` right now, in `pending` order. Each finished check goes to `on_done`.
///
/// Stops once nothing is pending, nothing pending is ready, or a check dies.
pub fn run_in_dependency_order<F>(
  registry: &Registry,
  kb: &mut Kb,
  pending: Vec<&'static Kind>,
  mut on_done: F,
) -> Summary
where
  F: FnMut(Instance),
{
  let mut preparing = Vec::<&'static str>::new();
  run_pending(registry, kb, pending, &mut preparing, &mut on_done)
}

fn run_pending(
  registry: &Registry,
  kb: &mut Kb,
  mut pending: Vec<&'static Kind>,
  preparing: &mut Vec<&'static str>,
  on_done: &mut dyn FnMut(Instance),
) -> Summary {
  while !pending.is_empty() {
    let ready: Vec<_> = pending.iter().copied().filter(|kind| kind.ready(kb)).collect();
    if ready.is_empty() {
      let names: Vec<_> = pending.iter().map(|kind| kind.name).collect();
      log::warn!("deadlock, requirements never met for: {}", names.join(", "));
      return Summary { stop: Some(Stop::Deadlock), not_run: pending };
    }
    for kind in ready {
      let mut chk = instantiate(registry, kb, kind, preparing);
      pending.retain(|k| k.name != kind.name);
      log::debug!("run {}", kind.name);
      chk.run(kb);
      let status = chk.status();
      log::debug!("finish {}: {status}", kind.name);
      on_done(chk);
      if status == Status::Died {
        log::warn!("{} died, not running {} more checks", kind.name, pending.len());
        return Summary { stop: Some(Stop::Fatal), not_run: pending };
      }
    }
  }
  Summary::default()
}

/// In test mode, the checks that `kind` depends on run first. Their results are dropped.
fn instantiate(
  registry: &Registry,
  kb: &mut Kb,
  kind: &'static Kind,
  preparing: &mut Vec<&'static str>,
) -> Instance {
  if kb.test_mode() && !preparing.contains(&kind.name) {
    let deps: Vec<_> =
      registry.depends(kind).into_iter().filter(|dep| !preparing.contains(&dep.name)).collect();
    if !deps.is_empty() {
      preparing.push(kind.name);
      log::debug!("prepare {} by running {} checks first", kind.name, deps.len());
      run_pending(registry, kb, deps, preparing, &mut |dep: Instance| {
        log::debug!("prerequisite {} of {}: {}", dep.kind().name, kind.name, dep.status());
      });
      preparing.pop();
    }
  }
  Instance::new(kind)
}
