//! Socket handles that are opened but never closed or returned.
//!
//! Each function body, and the top-level statements, is walked on its own, threading through the
//! set of names that may hold an open handle. This is a heuristic: loop bodies are not walked, and
//! a handle passed anywhere but to a close function or a `return` is still considered open.

use nasl_ast::{Node, NodeData, NodeMust, Op, Tree};
use pedant_check::{Instance, Kb, Key, Kind, Severity};
use std::collections::BTreeSet;

/// The check.
pub static KIND: Kind = Kind { name: "SocketLeak", requires: &[Key::Trees], provides: &[], run };

const OPEN: [&str; 2] = ["open_sock_tcp", "http_open_socket"];
const CLOSE: [&str; 4] = ["close", "ftp_close", "http_close_socket", "smtp_close"];
const EXIT: [&str; 2] = ["exit", "audit"];
/// Shared sockets with their own lifetime conventions.
const IGNORED_VARS: [&str; 2] = ["g_sock", "_ssh_socket"];
/// Manage sockets, but not ones we track.
const IGNORED_CALLS: [&str; 2] = ["session_init", "ssh_close_connection"];

/// A handle opened but never assigned to a name.
const UNASSIGNED: &str = "";

/// The names that may hold an open handle at some point in the walk, on at least one path.
type Found = BTreeSet<String>;

fn run(chk: &mut Instance, kb: &mut Kb) {
  chk.pass();
  for (file, tree) in kb.trees() {
    log::debug!("check {file} for socket leaks");
    check(chk, tree);
  }
}

struct St<'a> {
  chk: &'a mut Instance,
  tree: &'a Tree,
}

fn check(chk: &mut Instance, tree: &Tree) {
  let mut st = St { chk, tree };
  let mut all = Found::new();
  for (name, body) in tree.functions() {
    let found = get(&mut st, body, Found::new());
    if !found.is_empty() {
      log::debug!("{name} may leak {found:?}");
    }
    all.extend(found);
  }
  // the top level is not a block. the function definitions in it are skipped.
  all.extend(get_block(&mut st, &tree.top, Found::new()));
  report(st.chk, &all);
}

/// Warns about everything in `found`, if anything.
fn report(chk: &mut Instance, found: &Found) {
  if found.is_empty() {
    return;
  }
  chk.warn();
  let names: Vec<_> = found
    .iter()
    .map(|name| if name == UNASSIGNED { "<unassigned>" } else { name.as_str() })
    .collect();
  chk.report(Severity::Warn, format!("Possibly leaked socket handle(s): {}", names.join(", ")));
}

fn get_block(st: &mut St<'_>, stmts: &[NodeMust], found: Found) -> Found {
  stmts.iter().fold(found, |found, &stmt| get(st, Some(stmt), found))
}

fn get(st: &mut St<'_>, node: Node, mut found: Found) -> Found {
  let Some(node) = node else { return found };
  let tree = st.tree;
  match &tree[node] {
    NodeData::Assignment { lval, expr } => {
      opened(tree, &mut found, *lval, *expr);
      found
    }
    NodeData::Local(idents) => {
      for &ident in idents {
        if let NodeData::Assignment { lval, expr } = &tree[ident] {
          opened(tree, &mut found, *lval, *expr);
        }
      }
      found
    }
    NodeData::Return(expr) => {
      // the caller owns it now.
      if let Some(name) = tree.lvalue_name(*expr) {
        found.remove(name);
      }
      found
    }
    NodeData::Break | NodeData::Continue => {
      report(st.chk, &found);
      found
    }
    NodeData::If { cond, yes, no } => {
      if let Some(name) = guarded(tree, *cond, &found) {
        // a check that `name` failed to open. neither branch is walked.
        log::trace!("skip if on !{name}");
        return found;
      }
      let mut ret = get(st, *yes, found.clone());
      ret.extend(get(st, *no, found));
      ret
    }
    NodeData::Block(stmts) => get_block(st, stmts, found),
    NodeData::Call { name, args } => {
      let name = name.as_str();
      if EXIT.contains(&name) {
        report(st.chk, &found);
      } else if OPEN.contains(&name) {
        found.insert(UNASSIGNED.to_owned());
      } else if CLOSE.contains(&name) {
        // anything fancier than `close(x)` we don't try to follow.
        if let Some(name) = args.first().and_then(|arg| tree.lvalue_name(arg.expr)) {
          found.remove(name);
        }
      } else if IGNORED_CALLS.contains(&name) {
        log::trace!("ignore {name}");
      }
      found
    }
    // loop bodies are not walked, and function bodies are walked separately.
    NodeData::For { .. }
    | NodeData::Foreach { .. }
    | NodeData::While { .. }
    | NodeData::Repeat { .. }
    | NodeData::Function { .. }
    | NodeData::Integer(_)
    | NodeData::String(_)
    | NodeData::Identifier(_)
    | NodeData::Lvalue { .. }
    | NodeData::Expression { .. }
    | NodeData::Global(_)
    | NodeData::Include(_)
    | NodeData::Empty => found,
  }
}

/// Handles `lval = expr`, where `lval` may also be a declared identifier.
fn opened(tree: &Tree, found: &mut Found, lval: Node, expr: Node) {
  let Some(expr) = expr else { return };
  let NodeData::Call { name, .. } = &tree[expr] else { return };
  if !OPEN.contains(&name.as_str()) {
    return;
  }
  let name = match lval.map(|lval| &tree[lval]) {
    Some(NodeData::Lvalue { ident, .. } | NodeData::Identifier(ident)) => ident.as_str(),
    _ => UNASSIGNED,
  };
  if IGNORED_VARS.contains(&name) {
    return;
  }
  found.insert(name.to_owned());
}

/// Returns `x` if `cond` is `!x` and `x` may hold an open handle.
fn guarded<'a>(tree: &'a Tree, cond: Node, found: &Found) -> Option<&'a str> {
  let NodeData::Expression { op: Op::Not, rhs, .. } = &tree[cond?] else { return None };
  let name = tree.lvalue_name(*rhs)?;
  found.contains(name).then_some(name)
}
