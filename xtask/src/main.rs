//! Repo tasks, run with `cargo xtask <task>`.

use pico_args::Arguments;
use std::path::Path;
use std::process::{Command, ExitCode};

#[derive(Debug, Clone, Copy)]
enum Task {
  Ci,
  Checks,
}

impl Task {
  const ALL: [Task; 2] = [Task::Ci, Task::Checks];

  fn name(self) -> &'static str {
    match self {
      Task::Ci => "ci",
      Task::Checks => "checks",
    }
  }

  fn about(self) -> &'static str {
    match self {
      Task::Ci => "build, check formatting and lints, and test",
      Task::Checks => "list the registered checks and the facts they need",
    }
  }
}

/// The cargo invocations for `ci`, in order.
const CI: [&[&str]; 5] = [
  &["build", "--locked"],
  &["fmt", "--", "--check"],
  &["clippy", "--locked"],
  &["clippy", "--locked", "--tests"],
  &["test", "--locked"],
];

fn usage() {
  println!("usage: cargo xtask <task>");
  println!();
  println!("tasks:");
  for task in Task::ALL {
    println!("  {:<8}{}", task.name(), task.about());
  }
}

fn ci(root: &Path) -> Result<(), String> {
  for args in CI {
    let shown = args.join(" ");
    let status = Command::new("cargo")
      .args(args)
      .current_dir(root)
      .status()
      .map_err(|e| format!("cargo {shown}: {e}"))?;
    if !status.success() {
      return Err(format!("cargo {shown}: {status}"));
    }
  }
  Ok(())
}

fn checks() {
  for kind in pedant_checks::registry().all() {
    println!("{} ({})", kind.friendly_name(), kind.name);
    println!("  requires {:?}", kind.requires);
    println!("  provides {:?}", kind.provides);
  }
}

fn run() -> Result<(), String> {
  let mut args = Arguments::from_env();
  if args.contains(["-h", "--help"]) {
    usage();
    return Ok(());
  }
  let Some(name) = args.subcommand().map_err(|e| e.to_string())? else {
    usage();
    return Ok(());
  };
  let Some(task) = Task::ALL.into_iter().find(|task| task.name() == name) else {
    return Err(format!("unknown task: {name}"));
  };
  let rest = args.finish();
  if !rest.is_empty() {
    return Err(format!("unused arguments: {rest:?}"));
  }
  match task {
    Task::Ci => {
      let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .ok_or_else(|| "no workspace root".to_owned())?;
      ci(root)
    }
    Task::Checks => {
      checks();
      Ok(())
    }
  }
}

fn main() -> ExitCode {
  match run() {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("error: {e}");
      ExitCode::FAILURE
    }
  }
}
