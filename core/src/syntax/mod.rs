//! Syntax trees for boolean rule expressions.
//!
//! The front end turns source text into an immutable [`Tree`]. Every node is
//! tagged with the grammar production that produced it ([`NodeKind`]) and owns
//! its children in source order. Trees are `Send + Sync` and are shared
//! read-only between concurrent validations and evaluations.

use alloc::sync::Arc;
use core::fmt;
use core::ops::Range;

use static_assertions::assert_impl_all;

pub mod error;
pub mod parser;
pub mod string_literal;

pub use error::ParseError;
pub use parser::{DEFAULT_MAX_DEPTH, ParseOptions, parse, parse_with_options};


/// Byte range of a node in the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span(start..end)
    }

    pub fn start(&self) -> usize {
        self.0.start
    }

    pub fn end(&self) -> usize {
        self.0.end
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Span(span.start()..span.end())
    }
}

/// Arithmetic operators of the `addSub` and `mulDiv` productions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Operators of the `compare` production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }

    /// Whether the operator holds for the given ordering of its operands.
    ///
    /// `None` stands for unordered operands (a NaN was involved): only `!=`
    /// holds in that case.
    pub fn holds(self, ordering: Option<core::cmp::Ordering>) -> bool {
        use core::cmp::Ordering::{Equal, Greater, Less};
        match self {
            CompareOp::Eq => ordering == Some(Equal),
            CompareOp::Neq => ordering != Some(Equal),
            CompareOp::Gt => ordering == Some(Greater),
            CompareOp::Ge => matches!(ordering, Some(Greater | Equal)),
            CompareOp::Lt => ordering == Some(Less),
            CompareOp::Le => matches!(ordering, Some(Less | Equal)),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Operators of the `boolCompare` production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqualityOp {
    Eq,
    Neq,
}

impl EqualityOp {
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            EqualityOp::Eq => left == right,
            EqualityOp::Neq => left != right,
        }
    }
}

/// A numeric literal, already decoded from its lexical form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Where a function call appears in the grammar.
///
/// A call in a boolean position must return a boolean; a call used as an
/// operand must not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallPosition {
    Bool,
    Value,
}

/// A single function call argument. Arguments are never nested expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Variable(String),
    Boolean(bool),
    String(String),
    Number(Number),
}

/// The grammar production a node was produced by.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Start,
    Not,
    And,
    Or,
    BoolCompare(EqualityOp),
    Compare(CompareOp),
    In { negated: bool },
    AddSub(ArithOp),
    MulDiv(ArithOp),
    /// Unary minus.
    SubExpression,
    Bracket,
    BoolBracket,
    Variable(String),
    BoolVariable(String),
    Identifier(String),
    BoolIdentifier(String),
    Boolean(bool),
    Number(Number),
    String(String),
    StringList,
    NumberList,
    Function { name: String, position: CallPosition },
    Arg(Argument),
}

impl NodeKind {
    /// Leaf productions. The walker hands these to the terminal hook.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NodeKind::Variable(_)
                | NodeKind::BoolVariable(_)
                | NodeKind::Identifier(_)
                | NodeKind::BoolIdentifier(_)
                | NodeKind::Boolean(_)
                | NodeKind::Number(_)
                | NodeKind::String(_)
                | NodeKind::Arg(_)
        )
    }

    /// Production name as used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Not => "not",
            NodeKind::And => "and",
            NodeKind::Or => "or",
            NodeKind::BoolCompare(_) => "boolCompare",
            NodeKind::Compare(_) => "compare",
            NodeKind::In { negated: false } => "in",
            NodeKind::In { negated: true } => "notIn",
            NodeKind::AddSub(_) => "addSub",
            NodeKind::MulDiv(_) => "mulDiv",
            NodeKind::SubExpression => "subExpression",
            NodeKind::Bracket => "bracket",
            NodeKind::BoolBracket => "boolBracket",
            NodeKind::Variable(_) => "variable",
            NodeKind::BoolVariable(_) => "boolVariable",
            NodeKind::Identifier(_) => "identifier",
            NodeKind::BoolIdentifier(_) => "boolIdentifier",
            NodeKind::Boolean(_) => "boolean",
            NodeKind::Number(_) => "number",
            NodeKind::String(_) => "string",
            NodeKind::StringList => "stringList",
            NodeKind::NumberList => "numberList",
            NodeKind::Function { .. } => "function",
            NodeKind::Arg(_) => "arg",
        }
    }
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(kind: NodeKind, span: Span) -> Self {
        Node {
            kind,
            span,
            children: Vec::new(),
        }
    }

    pub fn new(kind: NodeKind, span: Span, children: Vec<Node>) -> Self {
        Node {
            kind,
            span,
            children,
        }
    }
}

// Long operator chains build trees as deep as they are long. Dropping them
// must not recurse once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = core::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// A parsed expression: the source text together with its syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    source: Arc<str>,
    root: Node,
}

impl Tree {
    pub(crate) fn new(source: Arc<str>, root: Node) -> Self {
        Tree { source, root }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Source text covered by `span`, or the empty string if it is out of range.
    pub fn text(&self, span: &Span) -> &str {
        self.source.get(span.0.clone()).unwrap_or_default()
    }
}

assert_impl_all!(Tree: Send, Sync);
