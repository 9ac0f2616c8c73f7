//! Evaluation of validated trees against concrete variable bindings.

use thiserror::Error;

use crate::functions::{FunctionScope, InvokeError, lookup};
use crate::syntax::{Argument, CallPosition, Node, NodeKind, Number, Span, Tree};
use crate::values::{Kind, Value, ValueError};
use crate::walker::{Halted, Listener, Outputs, Walker, into_binary, into_unary};

pub mod bindings;

pub use bindings::{BindingError, Bindings, IntoBinding, Rejection};


/// A failure caused by the input: the expression is fine but cannot be
/// evaluated with these bindings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Operand(#[from] ValueError),
    #[error("variable `${0}` is not bound")]
    UnboundVariable(String),
    #[error("variable `${name}` must be {expected}, found {found}")]
    VariableKind {
        name: String,
        expected: &'static str,
        found: Kind,
    },
    #[error("argument {position} of `{name}` must be a {expected}, found {found}")]
    ArgumentKind {
        name: String,
        position: usize,
        expected: Kind,
        found: Kind,
    },
    #[error("function `{name}` failed: {message}")]
    FunctionFailed { name: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionErrorKind {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    /// A broken invariant or a misbehaving function, not the caller's fault.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ExecutionError {
    pub kind: ExecutionErrorKind,
    pub span: Span,
}

impl ExecutionError {
    fn evaluation(error: impl Into<EvaluationError>, span: &Span) -> Self {
        ExecutionError {
            kind: ExecutionErrorKind::Evaluation(error.into()),
            span: span.clone(),
        }
    }

    fn internal(message: impl Into<String>, span: &Span) -> Self {
        ExecutionError {
            kind: ExecutionErrorKind::Internal(message.into()),
            span: span.clone(),
        }
    }
}

impl From<Halted> for ExecutionError {
    fn from(halted: Halted) -> Self {
        ExecutionError::internal(halted.to_string(), &Span::default())
    }
}

/// Evaluates a tree that already passed validation.
///
/// Both operands of `and`/`or` are always evaluated, so an error on the
/// right-hand side is reported even when the left-hand side decides the
/// result.
pub fn execute(
    tree: &Tree,
    bindings: &Bindings,
    scope: &FunctionScope,
) -> Result<bool, ExecutionError> {
    let mut evaluator = Evaluator { bindings, scope };
    let result = Walker::new().walk(&mut evaluator, tree.root())?;
    match result {
        Value::Bool(b) => Ok(b),
        other => Err(ExecutionError::internal(
            format!("expression produced a {} instead of a boolean", other.kind()),
            &tree.root().span,
        )),
    }
}

struct Evaluator<'a> {
    bindings: &'a Bindings,
    scope: &'a FunctionScope,
}

fn number(n: &Number) -> Value {
    Value::from(*n)
}

fn as_bool(value: &Value, span: &Span) -> Result<bool, ExecutionError> {
    value
        .as_bool()
        .map_err(|e| ExecutionError::internal(e.to_string(), span))
}

impl Evaluator<'_> {
    fn variable(&self, name: &str, span: &Span) -> Result<&Value, ExecutionError> {
        self.bindings.get(name).ok_or_else(|| {
            ExecutionError::evaluation(EvaluationError::UnboundVariable(name.to_string()), span)
        })
    }

    fn unary(&self, node: &Node, children: Outputs<Value>) -> Result<Value, ExecutionError> {
        into_unary(children).ok_or_else(|| ExecutionError::internal("expected one operand", &node.span))
    }

    fn binary(&self, node: &Node, children: Outputs<Value>) -> Result<(Value, Value), ExecutionError> {
        into_binary(children)
            .ok_or_else(|| ExecutionError::internal("expected two operands", &node.span))
    }

    fn call(
        &self,
        node: &Node,
        name: &str,
        position: CallPosition,
        args: Outputs<Value>,
    ) -> Result<Value, ExecutionError> {
        let span = &node.span;
        let function = lookup(name, self.scope)
            .ok_or_else(|| ExecutionError::internal(format!("unknown function `{name}`"), span))?;
        if args.len() != function.params().len() {
            return Err(ExecutionError::internal(
                format!("wrong number of arguments for `{name}`"),
                span,
            ));
        }
        for (index, (arg, expected)) in args.iter().zip(function.params()).enumerate() {
            if arg.kind() != *expected {
                let span = node.children.get(index).map_or(span, |child| &child.span);
                return Err(ExecutionError::evaluation(
                    EvaluationError::ArgumentKind {
                        name: name.to_string(),
                        position: index + 1,
                        expected: *expected,
                        found: arg.kind(),
                    },
                    span,
                ));
            }
        }

        let result = function.invoke(&args).map_err(|e| match e {
            InvokeError::Failed(message) => ExecutionError::evaluation(
                EvaluationError::FunctionFailed {
                    name: name.to_string(),
                    message,
                },
                span,
            ),
            other => ExecutionError::internal(other.to_string(), span),
        })?;

        let fits = match position {
            CallPosition::Bool => result.kind() == Kind::Bool,
            CallPosition::Value => result.kind() != Kind::Bool,
        };
        if !fits {
            return Err(ExecutionError::internal(
                format!("function `{name}` returned a {} in the wrong position", result.kind()),
                span,
            ));
        }
        Ok(result)
    }
}

impl Listener for Evaluator<'_> {
    type Output = Value;
    type Error = ExecutionError;

    fn terminal(&mut self, node: &Node) -> Result<Value, ExecutionError> {
        let span = &node.span;
        match &node.kind {
            // Booleans pass through: `$a = $b` parses as an operand
            // comparison. Operators that cannot take a boolean reject it.
            NodeKind::Variable(name) => self.variable(name, span).cloned(),
            NodeKind::BoolVariable(name) => match self.variable(name, span)? {
                Value::Bool(b) => Ok(Value::Bool(*b)),
                other => Err(ExecutionError::evaluation(
                    EvaluationError::VariableKind {
                        name: name.clone(),
                        expected: "a boolean",
                        found: other.kind(),
                    },
                    span,
                )),
            },
            NodeKind::Boolean(b) => Ok(Value::Bool(*b)),
            NodeKind::Number(n) => Ok(number(n)),
            NodeKind::String(s) => Ok(Value::Str(s.clone())),
            NodeKind::Arg(arg) => match arg {
                Argument::Variable(name) => self.variable(name, span).cloned(),
                Argument::Boolean(b) => Ok(Value::Bool(*b)),
                Argument::String(s) => Ok(Value::Str(s.clone())),
                Argument::Number(n) => Ok(number(n)),
            },
            NodeKind::Identifier(name) | NodeKind::BoolIdentifier(name) => Err(
                ExecutionError::internal(format!("identifier `{name}` reached evaluation"), span),
            ),
            _ => Err(ExecutionError::internal("unexpected leaf", span)),
        }
    }

    fn exit(&mut self, node: &Node, children: Outputs<Value>) -> Result<Value, ExecutionError> {
        let span = &node.span;
        let operand_error = |e: ValueError| ExecutionError::evaluation(e, span);
        match &node.kind {
            NodeKind::Start => {
                let value = self.unary(node, children)?;
                Ok(Value::Bool(as_bool(&value, span)?))
            }
            NodeKind::Not => {
                let value = self.unary(node, children)?;
                Ok(Value::Bool(!as_bool(&value, span)?))
            }
            NodeKind::And => {
                let (left, right) = self.binary(node, children)?;
                Ok(Value::Bool(as_bool(&left, span)? && as_bool(&right, span)?))
            }
            NodeKind::Or => {
                let (left, right) = self.binary(node, children)?;
                Ok(Value::Bool(as_bool(&left, span)? || as_bool(&right, span)?))
            }
            NodeKind::BoolCompare(op) => {
                let (left, right) = self.binary(node, children)?;
                left.bool_equals(*op, &right)
                    .map(Value::Bool)
                    .map_err(operand_error)
            }
            NodeKind::Compare(op) => {
                let (left, right) = self.binary(node, children)?;
                left.compare(*op, &right)
                    .map(Value::Bool)
                    .map_err(operand_error)
            }
            NodeKind::In { negated } => {
                let (needle, list) = self.binary(node, children)?;
                let found = needle.contained_in(&list).map_err(operand_error)?;
                Ok(Value::Bool(found != *negated))
            }
            NodeKind::AddSub(op) | NodeKind::MulDiv(op) => {
                let (left, right) = self.binary(node, children)?;
                left.arithmetic(*op, &right).map_err(operand_error)
            }
            NodeKind::SubExpression => {
                let value = self.unary(node, children)?;
                value.negate().map_err(operand_error)
            }
            NodeKind::Bracket | NodeKind::BoolBracket => self.unary(node, children),
            NodeKind::StringList => children
                .into_iter()
                .map(|item| match item {
                    Value::Str(s) => Ok(s),
                    other => Err(ExecutionError::internal(
                        format!("string list contains a {}", other.kind()),
                        span,
                    )),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::StrList),
            NodeKind::NumberList => children
                .into_iter()
                .map(|item| match item {
                    Value::Int(i) => Ok(Number::Int(i)),
                    Value::Float(f) => Ok(Number::Float(f)),
                    other => Err(ExecutionError::internal(
                        format!("number list contains a {}", other.kind()),
                        span,
                    )),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::number_list),
            NodeKind::Function { name, position } => self.call(node, name, *position, children),
            _ => Err(ExecutionError::internal("unexpected interior node", span)),
        }
    }
}
