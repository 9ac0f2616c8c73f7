use core::fmt;

use super::value::ValueError;
use crate::syntax::CompareOp;

/// The kind of a [`Value`](super::Value).
///
/// Besides naming the variants, kinds carry the type rules used by static
/// validation: the `*_result` and `check_*` functions answer whether an
/// operation is legal on operands of the given kinds without computing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Float,
    Str,
    StrList,
    IntList,
    FloatList,
    /// Kind not known before evaluation. Compatible with everything.
    Unbound,
}

impl Kind {
    pub fn is_numeric(self) -> bool {
        matches!(self, Kind::Int | Kind::Float)
    }

    pub fn is_list(self) -> bool {
        matches!(self, Kind::StrList | Kind::IntList | Kind::FloatList)
    }

    /// Kinds a caller may bind to a variable.
    pub fn is_scalar(self) -> bool {
        matches!(self, Kind::Bool | Kind::Int | Kind::Float | Kind::Str)
    }

    /// Result kind of `+ - * /` on `self` and `rhs`.
    pub fn arithmetic_result(self, rhs: Kind) -> Result<Kind, ValueError> {
        match (self, rhs) {
            (Kind::Int, Kind::Int) => Ok(Kind::Int),
            (Kind::Float, Kind::Int | Kind::Float | Kind::Unbound)
            | (Kind::Int | Kind::Unbound, Kind::Float) => Ok(Kind::Float),
            (Kind::Int, Kind::Unbound) | (Kind::Unbound, Kind::Int) => Ok(Kind::Int),
            (Kind::Unbound, Kind::Unbound) => Ok(Kind::Unbound),
            (lhs, _) if !lhs.is_numeric() && lhs != Kind::Unbound => {
                Err(ValueError::NotNumeric(lhs))
            }
            (_, rhs) => Err(ValueError::NotNumeric(rhs)),
        }
    }

    /// Result kind of unary minus.
    pub fn negate_result(self) -> Result<Kind, ValueError> {
        match self {
            Kind::Int | Kind::Float | Kind::Unbound => Ok(self),
            other => Err(ValueError::NotNumeric(other)),
        }
    }

    pub fn check_compare(self, op: CompareOp, rhs: Kind) -> Result<(), ValueError> {
        match (self, rhs) {
            (Kind::Unbound, _) | (_, Kind::Unbound) => Ok(()),
            (lhs, rhs) if lhs.is_numeric() && rhs.is_numeric() => Ok(()),
            (Kind::Str, Kind::Str) => Ok(()),
            (Kind::Bool, Kind::Bool) => match op {
                CompareOp::Eq | CompareOp::Neq => Ok(()),
                other => Err(ValueError::BooleanOrdering(other)),
            },
            (left, right) => Err(ValueError::Incomparable { left, right }),
        }
    }

    pub fn check_membership(self, list: Kind) -> Result<(), ValueError> {
        match (self, list) {
            (Kind::Unbound, Kind::StrList | Kind::IntList | Kind::FloatList) => Ok(()),
            (Kind::Str, Kind::StrList) => Ok(()),
            (Kind::Int | Kind::Float, Kind::IntList | Kind::FloatList) => Ok(()),
            (needle, list) => Err(ValueError::Membership { needle, list }),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Bool => "boolean",
            Kind::Int => "integer",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::StrList => "string list",
            Kind::IntList => "integer list",
            Kind::FloatList => "float list",
            Kind::Unbound => "unbound value",
        })
    }
}
