//! Making trees without a parser.

use crate::{Arg, Node, NodeData, NodeMust, Op, Tree};

/// Allocates nodes into a fresh tree. Finish with [`Builder::finish`].
#[derive(Debug, Default)]
pub struct Builder {
  tree: Tree,
}

impl Builder {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn node(&mut self, data: NodeData) -> NodeMust {
    self.tree.arena.alloc(data)
  }

  /// Returns the tree whose top-level statements are `top`.
  #[must_use]
  pub fn finish(mut self, top: Vec<NodeMust>) -> Tree {
    self.tree.top = top;
    self.tree
  }

  pub fn int(&mut self, n: i64) -> NodeMust {
    self.node(NodeData::Integer(n))
  }

  pub fn string(&mut self, s: &str) -> NodeMust {
    self.node(NodeData::String(s.to_owned()))
  }

  pub fn ident(&mut self, name: &str) -> NodeMust {
    self.node(NodeData::Identifier(name.to_owned()))
  }

  /// `name`
  pub fn var(&mut self, name: &str) -> NodeMust {
    self.node(NodeData::Lvalue { ident: name.to_owned(), indexes: Vec::new() })
  }

  /// `name[idx]`
  pub fn index(&mut self, name: &str, idx: NodeMust) -> NodeMust {
    self.node(NodeData::Lvalue { ident: name.to_owned(), indexes: vec![Some(idx)] })
  }

  pub fn unary(&mut self, op: Op, inner: NodeMust) -> NodeMust {
    debug_assert!(op.is_unary(), "{op:?} is not unary");
    self.node(NodeData::Expression { op, lhs: None, rhs: Some(inner) })
  }

  /// `!inner`
  pub fn not(&mut self, inner: NodeMust) -> NodeMust {
    self.unary(Op::Not, inner)
  }

  pub fn binary(&mut self, lhs: NodeMust, op: Op, rhs: NodeMust) -> NodeMust {
    debug_assert!(!op.is_unary(), "{op:?} is unary");
    self.node(NodeData::Expression { op, lhs: Some(lhs), rhs: Some(rhs) })
  }

  /// `name(args...)` with positional arguments only.
  pub fn call<I>(&mut self, name: &str, args: I) -> NodeMust
  where
    I: IntoIterator<Item = NodeMust>,
  {
    let args = args.into_iter().map(|expr| Arg { name: None, expr: Some(expr) }).collect();
    self.call_with(name, args)
  }

  pub fn call_with(&mut self, name: &str, args: Vec<Arg>) -> NodeMust {
    self.node(NodeData::Call { name: name.to_owned(), args })
  }

  /// `name = expr`
  pub fn assign(&mut self, name: &str, expr: NodeMust) -> NodeMust {
    let lval = self.var(name);
    self.assign_to(lval, expr)
  }

  pub fn assign_to(&mut self, lval: NodeMust, expr: NodeMust) -> NodeMust {
    self.node(NodeData::Assignment { lval: Some(lval), expr: Some(expr) })
  }

  /// `local_var a, b = expr, ...;`
  pub fn local(&mut self, decls: Vec<(&str, Option<NodeMust>)>) -> NodeMust {
    let idents = self.decls(decls);
    self.node(NodeData::Local(idents))
  }

  /// `global_var a, b = expr, ...;`
  pub fn global(&mut self, decls: Vec<(&str, Option<NodeMust>)>) -> NodeMust {
    let idents = self.decls(decls);
    self.node(NodeData::Global(idents))
  }

  fn decls(&mut self, decls: Vec<(&str, Option<NodeMust>)>) -> Vec<NodeMust> {
    decls
      .into_iter()
      .map(|(name, init)| {
        let ident = self.ident(name);
        match init {
          None => ident,
          Some(expr) => self.assign_to(ident, expr),
        }
      })
      .collect()
  }

  pub fn return_(&mut self, expr: Node) -> NodeMust {
    self.node(NodeData::Return(expr))
  }

  pub fn break_(&mut self) -> NodeMust {
    self.node(NodeData::Break)
  }

  pub fn continue_(&mut self) -> NodeMust {
    self.node(NodeData::Continue)
  }

  pub fn if_(&mut self, cond: NodeMust, yes: NodeMust, no: Node) -> NodeMust {
    self.node(NodeData::If { cond: Some(cond), yes: Some(yes), no })
  }

  pub fn block(&mut self, stmts: Vec<NodeMust>) -> NodeMust {
    self.node(NodeData::Block(stmts))
  }

  pub fn while_(&mut self, cond: NodeMust, body: NodeMust) -> NodeMust {
    self.node(NodeData::While { cond: Some(cond), body: Some(body) })
  }

  pub fn foreach(&mut self, ident: &str, expr: NodeMust, body: NodeMust) -> NodeMust {
    self.node(NodeData::Foreach { ident: ident.to_owned(), expr: Some(expr), body: Some(body) })
  }

  /// `function name(params...) { body... }`
  pub fn function(&mut self, name: &str, params: &[&str], body: Vec<NodeMust>) -> NodeMust {
    let body = self.block(body);
    let params = params.iter().map(|&p| p.to_owned()).collect();
    self.node(NodeData::Function { name: name.to_owned(), params, body: Some(body) })
  }
}
