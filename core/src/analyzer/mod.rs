//! Static validation.
//!
//! Walks a tree with placeholder values standing in for real data: literals
//! become a fixed value of their kind and variables become
//! [`Value::Unbound`], which is compatible with every operation. Anything
//! that cannot work for any binding of the variables is rejected here.

use thiserror::Error;

use crate::functions::{FunctionScope, lookup};
use crate::syntax::{Argument, CallPosition, Node, NodeKind, Number, Span, Tree};
use crate::values::{Kind, Value, ValueError};
use crate::walker::{Halted, Listener, Outputs, Walker, into_binary, into_unary};

#[cfg(test)]
mod analyzer_test;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    #[error(transparent)]
    Operand(#[from] ValueError),
    #[error("`{0}` is not a known value; variables are written `${0}`")]
    Identifier(String),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("function `{name}` takes {expected} arguments but {found} were given")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("argument {position} of `{name}` must be a {expected}, found {found}")]
    ArgumentKind {
        name: String,
        position: usize,
        expected: Kind,
        found: Kind,
    },
    #[error("function `{name}` returns a {result} where a boolean is required")]
    NotBooleanFunction { name: String, result: Kind },
    #[error("function `{name}` returns a boolean, which cannot be used as an operand")]
    BooleanFunctionOperand { name: String },
    #[error("malformed syntax tree: {0}")]
    Malformed(&'static str),
    #[error(transparent)]
    Halted(#[from] Halted),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub span: Span,
}

impl ValidationError {
    fn new(kind: impl Into<ValidationErrorKind>, span: &Span) -> Self {
        ValidationError {
            kind: kind.into(),
            span: span.clone(),
        }
    }
}

impl From<Halted> for ValidationError {
    fn from(halted: Halted) -> Self {
        ValidationError {
            kind: ValidationErrorKind::Halted(halted),
            span: Span::default(),
        }
    }
}

/// Checks that `tree` is well-typed for some binding of its variables and
/// that every function it calls exists and is called correctly.
pub fn validate(tree: &Tree, scope: &FunctionScope) -> Result<(), ValidationError> {
    let mut validator = Validator { scope };
    let result = Walker::new().walk(&mut validator, tree.root())?;
    expect_bool(&result, &tree.root().span)
}

struct Validator<'a> {
    scope: &'a FunctionScope,
}

fn expect_bool(value: &Value, span: &Span) -> Result<(), ValidationError> {
    match value.kind() {
        Kind::Bool | Kind::Unbound => Ok(()),
        other => Err(ValidationError::new(ValueError::NotBoolean(other), span)),
    }
}

fn literal(number: &Number) -> Value {
    match number {
        Number::Int(_) => Value::placeholder(Kind::Int),
        Number::Float(_) => Value::placeholder(Kind::Float),
    }
}

fn malformed(what: &'static str, node: &Node) -> ValidationError {
    ValidationError::new(ValidationErrorKind::Malformed(what), &node.span)
}

impl Validator<'_> {
    fn unary(&self, node: &Node, children: Outputs<Value>) -> Result<Value, ValidationError> {
        into_unary(children).ok_or_else(|| malformed("expected one operand", node))
    }

    fn binary(&self, node: &Node, children: Outputs<Value>) -> Result<(Value, Value), ValidationError> {
        into_binary(children).ok_or_else(|| malformed("expected two operands", node))
    }

    fn call(
        &self,
        node: &Node,
        name: &str,
        position: CallPosition,
        args: Outputs<Value>,
    ) -> Result<Value, ValidationError> {
        let Some(function) = lookup(name, self.scope) else {
            return Err(ValidationError::new(
                ValidationErrorKind::UnknownFunction(name.to_string()),
                &node.span,
            ));
        };
        if args.len() != function.params().len() {
            return Err(ValidationError::new(
                ValidationErrorKind::Arity {
                    name: name.to_string(),
                    expected: function.params().len(),
                    found: args.len(),
                },
                &node.span,
            ));
        }
        for (index, (arg, expected)) in args.iter().zip(function.params()).enumerate() {
            let found = arg.kind();
            if found != Kind::Unbound && found != *expected {
                let span = node.children.get(index).map_or(&node.span, |child| &child.span);
                return Err(ValidationError::new(
                    ValidationErrorKind::ArgumentKind {
                        name: name.to_string(),
                        position: index + 1,
                        expected: *expected,
                        found,
                    },
                    span,
                ));
            }
        }
        match (position, function.result()) {
            (CallPosition::Bool, Kind::Bool) => {}
            (CallPosition::Bool, result) => {
                return Err(ValidationError::new(
                    ValidationErrorKind::NotBooleanFunction {
                        name: name.to_string(),
                        result,
                    },
                    &node.span,
                ));
            }
            (CallPosition::Value, Kind::Bool) => {
                return Err(ValidationError::new(
                    ValidationErrorKind::BooleanFunctionOperand {
                        name: name.to_string(),
                    },
                    &node.span,
                ));
            }
            (CallPosition::Value, _) => {}
        }
        Ok(Value::placeholder(function.result()))
    }
}

impl Listener for Validator<'_> {
    type Output = Value;
    type Error = ValidationError;

    fn terminal(&mut self, node: &Node) -> Result<Value, ValidationError> {
        match &node.kind {
            NodeKind::Variable(_) | NodeKind::BoolVariable(_) => Ok(Value::Unbound),
            NodeKind::Identifier(name) | NodeKind::BoolIdentifier(name) => Err(ValidationError::new(
                ValidationErrorKind::Identifier(name.clone()),
                &node.span,
            )),
            NodeKind::Boolean(_) => Ok(Value::placeholder(Kind::Bool)),
            NodeKind::Number(n) => Ok(literal(n)),
            NodeKind::String(_) => Ok(Value::placeholder(Kind::Str)),
            NodeKind::Arg(arg) => Ok(match arg {
                Argument::Variable(_) => Value::Unbound,
                Argument::Boolean(_) => Value::placeholder(Kind::Bool),
                Argument::String(_) => Value::placeholder(Kind::Str),
                Argument::Number(n) => literal(n),
            }),
            _ => Err(malformed("unexpected leaf", node)),
        }
    }

    fn exit(&mut self, node: &Node, children: Outputs<Value>) -> Result<Value, ValidationError> {
        let span = &node.span;
        match &node.kind {
            NodeKind::Start | NodeKind::Not => {
                let operand = self.unary(node, children)?;
                expect_bool(&operand, span)?;
                Ok(Value::placeholder(Kind::Bool))
            }
            NodeKind::And | NodeKind::Or | NodeKind::BoolCompare(_) => {
                let (left, right) = self.binary(node, children)?;
                expect_bool(&left, span)?;
                expect_bool(&right, span)?;
                Ok(Value::placeholder(Kind::Bool))
            }
            NodeKind::Compare(op) => {
                let (left, right) = self.binary(node, children)?;
                left.kind()
                    .check_compare(*op, right.kind())
                    .map_err(|e| ValidationError::new(e, span))?;
                Ok(Value::placeholder(Kind::Bool))
            }
            NodeKind::In { .. } => {
                let (needle, list) = self.binary(node, children)?;
                needle
                    .kind()
                    .check_membership(list.kind())
                    .map_err(|e| ValidationError::new(e, span))?;
                Ok(Value::placeholder(Kind::Bool))
            }
            NodeKind::AddSub(_) | NodeKind::MulDiv(_) => {
                let (left, right) = self.binary(node, children)?;
                let kind = left
                    .kind()
                    .arithmetic_result(right.kind())
                    .map_err(|e| ValidationError::new(e, span))?;
                Ok(Value::placeholder(kind))
            }
            NodeKind::SubExpression => {
                let operand = self.unary(node, children)?;
                let kind = operand
                    .kind()
                    .negate_result()
                    .map_err(|e| ValidationError::new(e, span))?;
                Ok(Value::placeholder(kind))
            }
            NodeKind::Bracket | NodeKind::BoolBracket => self.unary(node, children),
            NodeKind::StringList => Ok(Value::placeholder(Kind::StrList)),
            NodeKind::NumberList => {
                if children.iter().any(|item| item.kind() == Kind::Float) {
                    Ok(Value::placeholder(Kind::FloatList))
                } else {
                    Ok(Value::placeholder(Kind::IntList))
                }
            }
            NodeKind::Function { name, position } => self.call(node, name, *position, children),
            _ => Err(malformed("unexpected interior node", node)),
        }
    }
}
