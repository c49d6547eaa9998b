//! Tests for finding socket handles that are never closed.

use crate::check::{close, exit, leak_pass, leak_warn, open, open_anon, socket_leak};
use nasl_ast::{Arg, Builder, Op};
use pedant_check::Status;
use pretty_assertions::assert_eq;

#[test]
fn closed() {
  let mut b = Builder::new();
  let stmts = vec![open(&mut b, "a"), close(&mut b, "a")];
  leak_pass(b.finish(stmts));
}

#[test]
fn never_closed() {
  let mut b = Builder::new();
  let body = vec![open(&mut b, "a")];
  let f = b.function("f", &[], body);
  leak_warn(b.finish(vec![f]), &["a"]);
}

#[test]
fn never_closed_top() {
  let mut b = Builder::new();
  let stmts = vec![open(&mut b, "a")];
  leak_warn(b.finish(stmts), &["a"]);
}

#[test]
fn unassigned() {
  let mut b = Builder::new();
  let stmts = vec![open_anon(&mut b)];
  leak_warn(b.finish(stmts), &["<unassigned>"]);
}

#[test]
fn returned() {
  let mut b = Builder::new();
  let a = b.var("a");
  let body = vec![open(&mut b, "a"), b.return_(Some(a))];
  let f = b.function("f", &[], body);
  leak_pass(b.finish(vec![f]));
}

#[test]
fn returned_other() {
  let mut b = Builder::new();
  let c = b.var("c");
  let body = vec![open(&mut b, "a"), b.return_(Some(c))];
  let f = b.function("f", &[], body);
  leak_warn(b.finish(vec![f]), &["a"]);
}

#[test]
fn if_else_union() {
  let mut b = Builder::new();
  let cond = b.var("cond");
  let yes = vec![open(&mut b, "a")];
  let yes = b.block(yes);
  let no = vec![open(&mut b, "a"), close(&mut b, "a")];
  let no = b.block(no);
  let body = vec![b.if_(cond, yes, Some(no))];
  let f = b.function("f", &[], body);
  leak_warn(b.finish(vec![f]), &["a"]);
}

#[test]
fn if_both_close() {
  let mut b = Builder::new();
  let cond = b.var("cond");
  let yes = close(&mut b, "a");
  let no = vec![close(&mut b, "a")];
  let no = b.block(no);
  let body = vec![open(&mut b, "a"), b.if_(cond, yes, Some(no))];
  let f = b.function("f", &[], body);
  leak_pass(b.finish(vec![f]));
}

#[test]
fn if_one_closes() {
  let mut b = Builder::new();
  let cond = b.var("cond");
  let yes = close(&mut b, "a");
  let body = vec![open(&mut b, "a"), b.if_(cond, yes, None)];
  let f = b.function("f", &[], body);
  leak_warn(b.finish(vec![f]), &["a"]);
}

#[test]
fn ignored_names() {
  let mut b = Builder::new();
  let stmts = vec![open(&mut b, "g_sock"), open(&mut b, "_ssh_socket")];
  leak_pass(b.finish(stmts));
}

#[test]
fn not_guard_skips_exit() {
  let mut b = Builder::new();
  let soc = b.var("soc");
  let cond = b.not(soc);
  let yes = exit(&mut b);
  let body = vec![open(&mut b, "soc"), b.if_(cond, yes, None), close(&mut b, "soc")];
  let f = b.function("f", &[], body);
  leak_pass(b.finish(vec![f]));
}

#[test]
fn not_guard_skips_else_close() {
  let mut b = Builder::new();
  let soc = b.var("soc");
  let cond = b.not(soc);
  let yes = exit(&mut b);
  let no = close(&mut b, "soc");
  let body = vec![open(&mut b, "soc"), b.if_(cond, yes, Some(no))];
  let f = b.function("f", &[], body);
  leak_warn(b.finish(vec![f]), &["soc"]);
}

#[test]
fn not_guard_skips_else_open() {
  let mut b = Builder::new();
  let soc = b.var("soc");
  let cond = b.not(soc);
  let yes = exit(&mut b);
  let no = open(&mut b, "x");
  let body = vec![open(&mut b, "soc"), b.if_(cond, yes, Some(no)), close(&mut b, "soc")];
  let f = b.function("f", &[], body);
  leak_pass(b.finish(vec![f]));
}

#[test]
fn comparison_is_not_a_guard() {
  let mut b = Builder::new();
  let soc = b.var("soc");
  let zero = b.int(0);
  let cond = b.binary(soc, Op::Eq, zero);
  let yes = exit(&mut b);
  let body = vec![open(&mut b, "soc"), b.if_(cond, yes, None), close(&mut b, "soc")];
  let f = b.function("f", &[], body);
  leak_warn(b.finish(vec![f]), &["soc"]);
}

#[test]
fn not_untracked_is_walked() {
  let mut b = Builder::new();
  let other = b.var("other");
  let cond = b.not(other);
  let yes = exit(&mut b);
  let body = vec![open(&mut b, "soc"), b.if_(cond, yes, None), close(&mut b, "soc")];
  let f = b.function("f", &[], body);
  leak_warn(b.finish(vec![f]), &["soc"]);
}

#[test]
fn exit_flushes_and_keeps() {
  let mut b = Builder::new();
  let body = vec![open(&mut b, "a"), exit(&mut b)];
  let f = b.function("f", &[], body);
  leak_warn(b.finish(vec![f]), &["a", "a"]);
}

#[test]
fn audit_flushes() {
  let mut b = Builder::new();
  let what = b.var("AUDIT_SOCK_FAIL");
  let audit = b.call("audit", [what]);
  let stmts = vec![open(&mut b, "a"), audit, close(&mut b, "a")];
  leak_warn(b.finish(stmts), &["a"]);
}

#[test]
fn exit_with_nothing_open() {
  let mut b = Builder::new();
  let stmts = vec![open(&mut b, "a"), close(&mut b, "a"), exit(&mut b)];
  leak_pass(b.finish(stmts));
}

#[test]
fn break_and_continue_flush() {
  let mut b = Builder::new();
  let brk = b.break_();
  let cont = b.continue_();
  let stmts = vec![open(&mut b, "a"), brk, open(&mut b, "b"), cont, close(&mut b, "a")];
  let block = b.block(stmts);
  leak_warn(b.finish(vec![block]), &["a", "a, b", "b"]);
}

#[test]
fn close_not_a_variable() {
  let mut b = Builder::new();
  let inner = b.call("get_sock", []);
  let close_call = b.call("close", [inner]);
  let no_args = b.call("close", []);
  let stmts = vec![open(&mut b, "a"), close_call, no_args];
  leak_warn(b.finish(stmts), &["a"]);
}

#[test]
fn close_named_arg() {
  let mut b = Builder::new();
  let soc = b.var("soc");
  let arg = Arg { name: Some("socket".to_owned()), expr: Some(soc) };
  let close_call = b.call_with("http_close_socket", vec![arg]);
  let stmts = vec![open(&mut b, "soc"), close_call];
  leak_pass(b.finish(stmts));
}

#[test]
fn other_close_functions() {
  let mut b = Builder::new();
  let mut stmts = Vec::new();
  for (var, func) in [("a", "ftp_close"), ("b", "smtp_close"), ("c", "http_close_socket")] {
    stmts.push(open(&mut b, var));
    let arg = b.var(var);
    stmts.push(b.call(func, [arg]));
  }
  leak_pass(b.finish(stmts));
}

#[test]
fn http_open_socket() {
  let mut b = Builder::new();
  let port = b.int(80);
  let call = b.call("http_open_socket", [port]);
  let stmts = vec![b.assign("soc", call)];
  leak_warn(b.finish(stmts), &["soc"]);
}

#[test]
fn global_initializer_not_walked() {
  let mut b = Builder::new();
  let call = open_anon(&mut b);
  let stmts = vec![b.global(vec![("soc", Some(call))])];
  leak_pass(b.finish(stmts));
}

#[test]
fn http_open_socket_by_host() {
  let mut b = Builder::new();
  let host = b.string("www.example.com");
  let call = b.call("http_open_socket", [host]);
  let stmts = vec![b.assign("soc", call), close(&mut b, "soc")];
  leak_pass(b.finish(stmts));
}

#[test]
fn ignored_calls() {
  let mut b = Builder::new();
  let soc = b.var("soc");
  let init = b.call("session_init", [soc]);
  let disconnect = b.call("ssh_close_connection", []);
  let stmts = vec![open(&mut b, "soc"), init, disconnect];
  leak_warn(b.finish(stmts), &["soc"]);
}

#[test]
fn local_decl() {
  let mut b = Builder::new();
  let first = open_anon(&mut b);
  let second = open_anon(&mut b);
  let three = b.int(3);
  let local = b.local(vec![("x", None), ("soc", Some(first)), ("n", Some(three))]);
  let ignored = b.local(vec![("g_sock", Some(second))]);
  let body = vec![local, ignored];
  let f = b.function("f", &[], body);
  leak_warn(b.finish(vec![f]), &["soc"]);
}

#[test]
fn local_decl_closed() {
  let mut b = Builder::new();
  let call = open_anon(&mut b);
  let local = b.local(vec![("soc", Some(call))]);
  let body = vec![local, close(&mut b, "soc")];
  let f = b.function("f", &[], body);
  leak_pass(b.finish(vec![f]));
}

#[test]
fn indexed_lvalue() {
  let mut b = Builder::new();
  let call = open_anon(&mut b);
  let idx = b.int(0);
  let lval = b.index("socks", idx);
  let stmts = vec![b.assign_to(lval, call)];
  leak_warn(b.finish(stmts), &["socks"]);
}

#[test]
fn non_lvalue_target() {
  let mut b = Builder::new();
  let call = open_anon(&mut b);
  let target = b.int(1);
  let stmts = vec![b.assign_to(target, call)];
  leak_warn(b.finish(stmts), &["<unassigned>"]);
}

#[test]
fn nested_blocks() {
  let mut b = Builder::new();
  let inner = vec![open(&mut b, "a")];
  let inner = b.block(inner);
  let outer = b.block(vec![inner]);
  leak_warn(b.finish(vec![outer]), &["a"]);
}

#[test]
fn loops_not_walked() {
  let mut b = Builder::new();
  let cond = b.int(1);
  let body = vec![open(&mut b, "a"), exit(&mut b)];
  let body = b.block(body);
  let loop_ = b.while_(cond, body);
  let list = b.var("list");
  let each_body = open_anon(&mut b);
  let each = b.foreach("x", list, each_body);
  leak_pass(b.finish(vec![loop_, each]));
}

#[test]
fn functions_are_separate() {
  let mut b = Builder::new();
  let f_body = vec![open(&mut b, "a")];
  let f = b.function("f", &[], f_body);
  let g_body = vec![close(&mut b, "a")];
  let g = b.function("g", &["a"], g_body);
  leak_warn(b.finish(vec![f, g]), &["a"]);
}

#[test]
fn top_and_functions_merge() {
  let mut b = Builder::new();
  let f_body = vec![open(&mut b, "b"), open_anon(&mut b)];
  let f = b.function("f", &[], f_body);
  let stmts = vec![f, open(&mut b, "a")];
  leak_warn(b.finish(stmts), &["<unassigned>, a, b"]);
}

#[test]
fn each_file_reported() {
  let mut b = Builder::new();
  let stmts = vec![open(&mut b, "a")];
  let leaky = b.finish(stmts);
  let mut b = Builder::new();
  let stmts = vec![open(&mut b, "b"), close(&mut b, "b")];
  let fine = b.finish(stmts);
  let mut b = Builder::new();
  let stmts = vec![open(&mut b, "c")];
  let leaky_too = b.finish(stmts);
  let chk = socket_leak(vec![leaky, fine, leaky_too]);
  assert_eq!(chk.status(), Status::Warn);
  let got: Vec<_> = chk.lines().iter().map(|(_, text)| text.as_str()).collect();
  assert_eq!(
    got,
    vec!["Possibly leaked socket handle(s): a", "Possibly leaked socket handle(s): c"]
  );
}

#[test]
fn no_files() {
  let chk = socket_leak(Vec::new());
  assert_eq!(chk.status(), Status::Pass);
}
