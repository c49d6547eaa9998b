//! The check engine: a knowledge base of facts, kinds of checks that require and provide those
//! facts, and a scheduler that runs each check once what it requires is known.

pub mod error;

mod check;
mod kb;
mod registry;
mod sched;


pub use check::{Instance, Kind, Severity, Status};
pub use kb::{Fact, Kb, Key};
pub use registry::Registry;
pub use sched::{Stop, Summary, run_in_dependency_order};
