use pretty_assertions::assert_eq;

use super::*;
use crate::functions::Function;
use crate::syntax::parse;

fn scope() -> FunctionScope {
    let mut scope = FunctionScope::new();
    scope.insert("t_bool", Function::from_fn(|| true)).unwrap();
    scope.insert("t_int", Function::from_fn(|| 1i64)).unwrap();
    scope.insert("t_float", Function::from_fn(|| 2.2)).unwrap();
    scope
        .insert("t_string", Function::from_fn(|| "test".to_string()))
        .unwrap();
    scope
        .insert(
            "testArgs",
            Function::from_fn(|_: i64, _: f64, _: bool, _: String| true),
        )
        .unwrap();
    scope
}

fn check(source: &str) -> Result<(), ValidationError> {
    let tree = parse(source).unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"));
    validate(&tree, &scope())
}

fn kind_of(source: &str) -> ValidationErrorKind {
    match check(source) {
        Err(e) => e.kind,
        Ok(()) => panic!("expected {source:?} to be rejected"),
    }
}

fn assert_valid(sources: &[&str]) {
    for source in sources {
        if let Err(e) = check(source) {
            panic!("expected {source:?} to be valid, got {e}");
        }
    }
}

fn assert_invalid(sources: &[&str]) {
    for source in sources {
        assert!(check(source).is_err(), "expected {source:?} to be rejected");
    }
}

#[test]
fn test_boolean_expressions() {
    assert_valid(&[
        "$var",
        "!$_var",
        "t_bool()",
        "t_float() > t_float()",
        "t_float() > t_int()",
        "t_string() = 'a'",
        "true and (false or t_bool())",
        "!t_bool()",
        "true",
        "$a = ($b or false)",
    ]);
    assert_invalid(&[
        "1='a'",
        "t_float()",
        "t_int()",
        "t_string()",
        "t_bool() > 1",
        "t_float() > t_string()",
        "t_string()= 1",
        "!t_string()",
    ]);
}

#[test]
fn test_arithmetic_expressions() {
    assert_valid(&[
        "-t_float() > 1",
        "-t_float() > -t_int()",
        "--1 > 1",
        "1+-1> 2",
        "(3--1)*-3 > 1",
        "1+(-1)> 2",
        "$a * 2 / $b - 1 >= 0",
    ]);
    assert_invalid(&[
        "-'a' > 1",
        "1 - 'a' > 1",
        "1 - -'a' > 1",
        "-t_bool() > 1",
        "-t_string() > 1",
        "'a' + 'b' = 'ab'",
    ]);
}

#[test]
fn test_comparisons() {
    assert_valid(&[
        "$a > 1",
        "$a = 'a'",
        "$a < 1.0",
        "$a >= $b",
        "$a >= -$b",
        "(1+2)*3 > 4",
        "t_string() > t_string()",
        "(1+2)*3 > (4)",
        "1 = 1.0",
    ]);
    assert_invalid(&[
        "1>'a'",
        "'a'=1",
        "t_float() > t_string()",
        "1 = 'a'",
        "(1+5)*3 > 'a'",
        "(1+a)*3 > 'a'",
    ]);
}

#[test]
fn test_membership() {
    assert_valid(&[
        "!$var in (1,2,3)",
        "1 in (1,2,3)",
        "1 in (1.0, -1)",
        "$var in (1.0, -2)",
        "t_int() in (1,2,3)",
        "t_string() in ('a', 'b')",
        "1 in (1)",
        "(1 in (1))",
        "-$var in (1,2,3)",
        "(1+2)* 3.0 in (1,2,3)",
        "1+2 in (1,2,3)",
        "$s not in ('x')",
    ]);
    assert_invalid(&[
        "1 in ('a')",
        "'a' in (1,2,3)",
        "t_string() in (1,2,3)",
        "t_int() in ('a','b')",
        "1+2 in ('a', 'b')",
    ]);
}

#[test]
fn test_function_arguments() {
    assert_valid(&["testArgs(1, 1.0,true,'a')", "testArgs($a,$a,$a,$a)"]);
    assert_invalid(&[
        "testArgs()",
        "testArgs(1, 1)",
        "testArgs(1, 1,1,1)",
        "testArgs(1, 1.0,true,'a', 1)",
        "testArgs(1.0, 1,true,'a')",
    ]);
}

#[test]
fn test_identifiers_are_rejected() {
    assert_eq!(kind_of("a"), ValidationErrorKind::Identifier("a".to_string()));
    assert_eq!(
        kind_of("1+a > 1"),
        ValidationErrorKind::Identifier("a".to_string())
    );
    assert_eq!(
        kind_of("(a+b) in (1,2,3)"),
        ValidationErrorKind::Identifier("a".to_string())
    );
}

#[test]
fn test_error_kinds() {
    assert_eq!(
        kind_of("nope()"),
        ValidationErrorKind::UnknownFunction("nope".to_string())
    );
    assert_eq!(
        kind_of("testArgs(1)"),
        ValidationErrorKind::Arity {
            name: "testArgs".to_string(),
            expected: 4,
            found: 1
        }
    );
    assert_eq!(
        kind_of("testArgs(1, 2, true, 'a')"),
        ValidationErrorKind::ArgumentKind {
            name: "testArgs".to_string(),
            position: 2,
            expected: Kind::Float,
            found: Kind::Int
        }
    );
    assert_eq!(
        kind_of("t_int()"),
        ValidationErrorKind::NotBooleanFunction {
            name: "t_int".to_string(),
            result: Kind::Int
        }
    );
    assert_eq!(
        kind_of("t_bool() = $x"),
        ValidationErrorKind::BooleanFunctionOperand {
            name: "t_bool".to_string()
        }
    );
    assert_eq!(
        kind_of("'a' > 1"),
        ValidationErrorKind::Operand(ValueError::Incomparable {
            left: Kind::Str,
            right: Kind::Int
        })
    );
}

#[test]
fn test_error_spans() {
    let tree = parse("$a and testArgs(1, 2, true, 'a')").unwrap();
    let err = validate(&tree, &scope()).unwrap_err();
    assert_eq!(tree.text(&err.span), "2");

    let tree = parse("$a or 1 > 'x'").unwrap();
    let err = validate(&tree, &scope()).unwrap_err();
    assert_eq!(tree.text(&err.span), "1 > 'x'");
}

#[test]
fn test_builtins_are_visible() {
    let tree = parse("contains($s, 'x') and length($s) > 2").unwrap();
    assert_eq!(validate(&tree, &FunctionScope::new()), Ok(()));
}
