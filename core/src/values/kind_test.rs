use pretty_assertions::assert_eq;

use super::*;
use crate::syntax::CompareOp;

#[test]
fn test_arithmetic_result() {
    assert_eq!(Kind::Int.arithmetic_result(Kind::Int), Ok(Kind::Int));
    assert_eq!(Kind::Int.arithmetic_result(Kind::Float), Ok(Kind::Float));
    assert_eq!(Kind::Int.arithmetic_result(Kind::Unbound), Ok(Kind::Int));
    assert_eq!(Kind::Unbound.arithmetic_result(Kind::Float), Ok(Kind::Float));
    assert_eq!(Kind::Unbound.arithmetic_result(Kind::Unbound), Ok(Kind::Unbound));
    assert_eq!(
        Kind::Str.arithmetic_result(Kind::Int),
        Err(ValueError::NotNumeric(Kind::Str))
    );
    assert_eq!(
        Kind::Unbound.arithmetic_result(Kind::Bool),
        Err(ValueError::NotNumeric(Kind::Bool))
    );
}

#[test]
fn test_negate_result() {
    assert_eq!(Kind::Unbound.negate_result(), Ok(Kind::Unbound));
    assert_eq!(Kind::Float.negate_result(), Ok(Kind::Float));
    assert_eq!(Kind::Str.negate_result(), Err(ValueError::NotNumeric(Kind::Str)));
}

#[test]
fn test_check_compare() {
    assert_eq!(Kind::Str.check_compare(CompareOp::Lt, Kind::Unbound), Ok(()));
    assert_eq!(Kind::Int.check_compare(CompareOp::Eq, Kind::Float), Ok(()));
    assert_eq!(Kind::Bool.check_compare(CompareOp::Eq, Kind::Bool), Ok(()));
    assert_eq!(
        Kind::Bool.check_compare(CompareOp::Ge, Kind::Bool),
        Err(ValueError::BooleanOrdering(CompareOp::Ge))
    );
    assert_eq!(
        Kind::Float.check_compare(CompareOp::Gt, Kind::Str),
        Err(ValueError::Incomparable {
            left: Kind::Float,
            right: Kind::Str
        })
    );
}

#[test]
fn test_check_membership() {
    assert_eq!(Kind::Unbound.check_membership(Kind::StrList), Ok(()));
    assert_eq!(Kind::Float.check_membership(Kind::IntList), Ok(()));
    assert_eq!(
        Kind::Str.check_membership(Kind::IntList),
        Err(ValueError::Membership {
            needle: Kind::Str,
            list: Kind::IntList
        })
    );
}
