use core::fmt;

use thiserror::Error;

use super::Kind;
use crate::syntax::{ArithOp, CompareOp, EqualityOp, Number};

/// A runtime value.
///
/// Lists only ever come from list literals and are homogeneous: a number
/// list with at least one float literal is a `FloatList`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    StrList(Vec<String>),
    IntList(Vec<i64>),
    FloatList(Vec<f64>),
    /// Stand-in for a variable during static validation.
    Unbound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("expected a number, found {0}")]
    NotNumeric(Kind),
    #[error("expected a boolean, found {0}")]
    NotBoolean(Kind),
    #[error("cannot compare {left} with {right}")]
    Incomparable { left: Kind, right: Kind },
    #[error("booleans can only be compared with `=` and `!=`, not `{0}`")]
    BooleanOrdering(CompareOp),
    #[error("cannot test membership of {needle} in {list}")]
    Membership { needle: Kind, list: Kind },
    #[error("integer overflow in `{0}`")]
    Overflow(&'static str),
    #[error("division by zero")]
    DivisionByZero,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::StrList(_) => Kind::StrList,
            Value::IntList(_) => Kind::IntList,
            Value::FloatList(_) => Kind::FloatList,
            Value::Unbound => Kind::Unbound,
        }
    }

    /// A fixed value of the given kind, used where only the kind matters.
    pub fn placeholder(kind: Kind) -> Value {
        match kind {
            Kind::Bool => Value::Bool(false),
            Kind::Int => Value::Int(0),
            Kind::Float => Value::Float(0.0),
            Kind::Str => Value::Str(String::new()),
            Kind::StrList => Value::StrList(Vec::new()),
            Kind::IntList => Value::IntList(Vec::new()),
            Kind::FloatList => Value::FloatList(Vec::new()),
            Kind::Unbound => Value::Unbound,
        }
    }

    /// Builds a number list, promoting every item to float if any is a float.
    pub fn number_list(items: impl IntoIterator<Item = Number>) -> Value {
        let items: Vec<Number> = items.into_iter().collect();
        if items.iter().any(|n| matches!(n, Number::Float(_))) {
            Value::FloatList(items.into_iter().map(number_as_f64).collect())
        } else {
            Value::IntList(
                items
                    .into_iter()
                    .filter_map(|n| match n {
                        Number::Int(i) => Some(i),
                        Number::Float(_) => None,
                    })
                    .collect(),
            )
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(ValueError::NotBoolean(other.kind())),
        }
    }

    fn as_f64(&self) -> Result<f64, ValueError> {
        match self {
            Value::Int(i) => Ok(*i as f64),
            Value::Float(f) => Ok(*f),
            other => Err(ValueError::NotNumeric(other.kind())),
        }
    }

    /// `self op rhs`. Integer arithmetic is checked; anything involving a
    /// float is computed in floating point.
    pub fn arithmetic(&self, op: ArithOp, rhs: &Value) -> Result<Value, ValueError> {
        if let (Value::Int(a), Value::Int(b)) = (self, rhs) {
            let result = match op {
                ArithOp::Add => a.checked_add(*b),
                ArithOp::Sub => a.checked_sub(*b),
                ArithOp::Mul => a.checked_mul(*b),
                ArithOp::Div if *b == 0 => return Err(ValueError::DivisionByZero),
                ArithOp::Div => a.checked_div(*b),
            };
            return result
                .map(Value::Int)
                .ok_or(ValueError::Overflow(op.symbol()));
        }
        let a = self.as_f64()?;
        let b = rhs.as_f64()?;
        Ok(Value::Float(match op {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
        }))
    }

    pub fn negate(&self) -> Result<Value, ValueError> {
        match self {
            Value::Int(i) => i.checked_neg().map(Value::Int).ok_or(ValueError::Overflow("-")),
            Value::Float(f) => Ok(Value::Float(-f)),
            other => Err(ValueError::NotNumeric(other.kind())),
        }
    }

    /// Evaluates `self op rhs` for the `compare` production.
    ///
    /// Numbers compare numerically (an integer and a float are compared as
    /// floats), strings compare by bytes, booleans support only equality.
    pub fn compare(&self, op: CompareOp, rhs: &Value) -> Result<bool, ValueError> {
        let ordering = match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.as_f64()?.partial_cmp(&rhs.as_f64()?)
            }
            (Value::Str(a), Value::Str(b)) => Some(a.as_str().cmp(b.as_str())),
            (Value::Bool(a), Value::Bool(b)) => {
                return match op {
                    CompareOp::Eq => Ok(a == b),
                    CompareOp::Neq => Ok(a != b),
                    other => Err(ValueError::BooleanOrdering(other)),
                };
            }
            (left, right) => {
                return Err(ValueError::Incomparable {
                    left: left.kind(),
                    right: right.kind(),
                });
            }
        };
        Ok(op.holds(ordering))
    }

    /// Evaluates `self op rhs` for the `boolCompare` production.
    pub fn bool_equals(&self, op: EqualityOp, rhs: &Value) -> Result<bool, ValueError> {
        Ok(op.apply(self.as_bool()?, rhs.as_bool()?))
    }

    /// Whether `self` is a member of `list`.
    pub fn contained_in(&self, list: &Value) -> Result<bool, ValueError> {
        let found = match (self, list) {
            (Value::Str(s), Value::StrList(items)) => items.iter().any(|item| item == s),
            (Value::Int(i), Value::IntList(items)) => items.contains(i),
            (Value::Float(f), Value::IntList(items)) => items.iter().any(|item| *item as f64 == *f),
            (Value::Int(_) | Value::Float(_), Value::FloatList(items)) => {
                let needle = self.as_f64()?;
                items.iter().any(|item| *item == needle)
            }
            (needle, list) => {
                return Err(ValueError::Membership {
                    needle: needle.kind(),
                    list: list.kind(),
                });
            }
        };
        Ok(found)
    }
}

fn number_as_f64(n: Number) -> f64 {
    match n {
        Number::Int(i) => i as f64,
        Number::Float(f) => f,
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

fn write_list<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    item: impl Fn(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    f.write_str("(")?;
    for (i, value) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item(f, value)?;
    }
    f.write_str(")")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "'{}'", escape(s)),
            Value::StrList(items) => write_list(f, items, |f, s| write!(f, "'{}'", escape(s))),
            Value::IntList(items) => write_list(f, items, |f, i| write!(f, "{i}")),
            Value::FloatList(items) => write_list(f, items, |f, x| write!(f, "{x:?}")),
            Value::Unbound => f.write_str("_"),
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
