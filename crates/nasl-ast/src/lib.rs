//! NASL syntax trees.
//!
//! The parser lives elsewhere. This crate is only the data model it fills in, plus a [`Builder`]
//! for making trees by hand.

#![allow(missing_docs)]

mod build;

pub use build::Builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeMust(la_arena::Idx<NodeData>);

pub type Node = Option<NodeMust>;

#[derive(Debug, Default, Clone)]
pub struct NodeArena(la_arena::Arena<NodeData>);

impl std::ops::Index<NodeMust> for NodeArena {
  type Output = NodeData;

  fn index(&self, index: NodeMust) -> &Self::Output {
    &self.0[index.0]
  }
}

impl NodeArena {
  pub fn alloc(&mut self, data: NodeData) -> NodeMust {
    NodeMust(self.0.alloc(data))
  }

  /// Iterates in allocation order.
  pub fn iter(&self) -> impl Iterator<Item = (NodeMust, &NodeData)> {
    self.0.iter().map(|(a, b)| (NodeMust(a), b))
  }
}

/// One argument at a call site. `name` is set for `f(key:val)` arguments.
#[derive(Debug, Clone)]
pub struct Arg {
  pub name: Option<String>,
  pub expr: Node,
}

#[derive(Debug, Clone)]
pub enum NodeData {
  Integer(i64),
  String(String),
  /// A bare name that is not an lvalue, e.g. in `local_var x;`.
  Identifier(String),
  /// A variable reference, maybe indexed: `x`, `x[1]`, `x["k"][2]`.
  Lvalue {
    ident: String,
    indexes: Vec<Node>,
  },
  /// Unary operators have no `lhs`.
  Expression {
    op: Op,
    lhs: Node,
    rhs: Node,
  },
  Call {
    name: String,
    args: Vec<Arg>,
  },
  Assignment {
    lval: Node,
    expr: Node,
  },
  /// `local_var a, b = 3;`. Each entry is an `Identifier` or an `Assignment`.
  Local(Vec<NodeMust>),
  /// `global_var a, b = 3;`. Same shape as `Local`.
  Global(Vec<NodeMust>),
  Return(Node),
  Break,
  Continue,
  If {
    cond: Node,
    yes: Node,
    no: Node,
  },
  Block(Vec<NodeMust>),
  For {
    init: Node,
    cond: Node,
    step: Node,
    body: Node,
  },
  Foreach {
    ident: String,
    expr: Node,
    body: Node,
  },
  While {
    cond: Node,
    body: Node,
  },
  Repeat {
    body: Node,
    cond: Node,
  },
  Function {
    name: String,
    params: Vec<String>,
    body: Node,
  },
  Include(String),
  Empty,
}

impl NodeData {
  #[must_use]
  pub fn kind(&self) -> Kind {
    match self {
      NodeData::Integer(_) => Kind::Integer,
      NodeData::String(_) => Kind::String,
      NodeData::Identifier(_) => Kind::Identifier,
      NodeData::Lvalue { .. } => Kind::Lvalue,
      NodeData::Expression { .. } => Kind::Expression,
      NodeData::Call { .. } => Kind::Call,
      NodeData::Assignment { .. } => Kind::Assignment,
      NodeData::Local(_) => Kind::Local,
      NodeData::Global(_) => Kind::Global,
      NodeData::Return(_) => Kind::Return,
      NodeData::Break => Kind::Break,
      NodeData::Continue => Kind::Continue,
      NodeData::If { .. } => Kind::If,
      NodeData::Block(_) => Kind::Block,
      NodeData::For { .. } => Kind::For,
      NodeData::Foreach { .. } => Kind::Foreach,
      NodeData::While { .. } => Kind::While,
      NodeData::Repeat { .. } => Kind::Repeat,
      NodeData::Function { .. } => Kind::Function,
      NodeData::Include(_) => Kind::Include,
      NodeData::Empty => Kind::Empty,
    }
  }
}

/// The kind of a node, without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
  Integer,
  String,
  Identifier,
  Lvalue,
  Expression,
  Call,
  Assignment,
  Local,
  Global,
  Return,
  Break,
  Continue,
  If,
  Block,
  For,
  Foreach,
  While,
  Repeat,
  Function,
  Include,
  Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Not,
  Neg,
  BitNot,
  Add,
  Sub,
  Mul,
  Div,
  Mod,
  Eq,
  Ne,
  Lt,
  LtEq,
  Gt,
  GtEq,
  And,
  Or,
  Match,
  NotMatch,
}

impl Op {
  #[must_use]
  pub fn is_unary(self) -> bool {
    matches!(self, Op::Not | Op::Neg | Op::BitNot)
  }
}

/// One parsed file.
#[derive(Debug, Default, Clone)]
pub struct Tree {
  pub arena: NodeArena,
  /// The top-level statements, in source order. This is not a `Block`.
  pub top: Vec<NodeMust>,
}

impl std::ops::Index<NodeMust> for Tree {
  type Output = NodeData;

  fn index(&self, index: NodeMust) -> &Self::Output {
    &self.arena[index]
  }
}

impl Tree {
  /// Returns every node of `kind` anywhere in the tree.
  pub fn all(&self, kind: Kind) -> impl Iterator<Item = NodeMust> + '_ {
    self.arena.iter().filter(move |(_, data)| data.kind() == kind).map(|(node, _)| node)
  }

  /// Returns the name and body of every function definition anywhere in the tree.
  pub fn functions(&self) -> impl Iterator<Item = (&str, Node)> + '_ {
    self.all(Kind::Function).filter_map(|node| match &self[node] {
      NodeData::Function { name, body, .. } => Some((name.as_str(), *body)),
      _ => None,
    })
  }

  /// Returns the variable name if `node` is a variable reference, indexed or not.
  #[must_use]
  pub fn lvalue_name(&self, node: Node) -> Option<&str> {
    match &self[node?] {
      NodeData::Lvalue { ident, .. } => Some(ident.as_str()),
      _ => None,
    }
  }
}
