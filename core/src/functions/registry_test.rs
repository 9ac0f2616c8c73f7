use pretty_assertions::assert_eq;

use super::*;
use crate::values::{Kind, Value};

fn raw(signature: Signature) -> Function {
    Function::new(signature, |_| Ok(Value::Bool(true)))
}

fn violation(signature: Signature) -> SignatureViolation {
    let mut scope = FunctionScope::new();
    match scope.insert("f", raw(signature)) {
        Err(RegistrationError::InvalidSignature { violation, .. }) => violation,
        other => panic!("expected an invalid signature, got {other:?}"),
    }
}

#[test]
fn test_signature_rules() {
    assert_eq!(
        violation(Signature {
            params: vec![],
            variadic: true,
            results: vec![Returns::Value(Kind::Bool)],
        }),
        SignatureViolation::Variadic
    );
    assert_eq!(
        violation(Signature::new([Kind::Str, Kind::IntList], Kind::Bool)),
        SignatureViolation::UnsupportedParameter {
            position: 1,
            kind: Kind::IntList
        }
    );
    assert_eq!(
        violation(Signature {
            params: vec![],
            variadic: false,
            results: vec![],
        }),
        SignatureViolation::NoResult
    );
    assert_eq!(
        violation(Signature {
            params: vec![],
            variadic: false,
            results: vec![
                Returns::Value(Kind::Str),
                Returns::Value(Kind::Int),
                Returns::Failure
            ],
        }),
        SignatureViolation::TooManyResults(3)
    );
    assert_eq!(
        violation(Signature {
            params: vec![],
            variadic: false,
            results: vec![Returns::Failure, Returns::Value(Kind::Int)],
        }),
        SignatureViolation::SecondResultNotFailure
    );
    assert_eq!(
        violation(Signature {
            params: vec![],
            variadic: false,
            results: vec![Returns::Failure],
        }),
        SignatureViolation::FirstResultIsFailure
    );
    assert_eq!(
        violation(Signature::new([], Kind::FloatList)),
        SignatureViolation::UnsupportedResult(Kind::FloatList)
    );
}

#[test]
fn test_typed_signatures() {
    let f = Function::from_fn(|a: i64, b: f64, c: bool, d: String| -> Result<String, String> {
        Ok(format!("{a}{b}{c}{d}"))
    });
    assert_eq!(
        f.signature(),
        &Signature::fallible([Kind::Int, Kind::Float, Kind::Bool, Kind::Str], Kind::Str)
    );

    let g = Function::from_fn(|| 1.5);
    assert_eq!(g.signature(), &Signature::new([], Kind::Float));
}

#[test]
fn test_duplicate_registration() {
    let mut scope = FunctionScope::new();
    scope
        .insert("twice", Function::from_fn(|| true))
        .unwrap();
    assert_eq!(
        scope.insert("twice", Function::from_fn(|| false)),
        Err(RegistrationError::AlreadyExists("twice".to_string()))
    );

    // Duplicates are reported even when the signature is also broken.
    assert_eq!(
        scope.insert("twice", raw(Signature::new([], Kind::IntList))),
        Err(RegistrationError::AlreadyExists("twice".to_string()))
    );
}

#[test]
fn test_global_registration_and_lookup() {
    let name = "registry_test_global_answer";
    register_function(Scope::Global, name, Function::from_fn(|| 42i64)).unwrap();
    assert_eq!(
        register_function(Scope::Global, name, Function::from_fn(|| 0i64)),
        Err(RegistrationError::AlreadyExists(name.to_string()))
    );

    let local = FunctionScope::new();
    let entry = lookup(name, &local).unwrap();
    assert_eq!(entry.invoke(&[]), Ok(Value::Int(42)));
}

#[test]
fn test_global_shadows_local() {
    let mut local = FunctionScope::new();
    register_function(
        Scope::Local(&mut local),
        "contains",
        Function::from_fn(|| true),
    )
    .unwrap();
    register_function(
        Scope::Local(&mut local),
        "registry_test_local_only",
        Function::from_fn(|| true),
    )
    .unwrap();

    assert_eq!(lookup("contains", &local).unwrap().params().len(), 2);
    assert!(lookup("registry_test_local_only", &local).is_some());
    assert!(lookup("registry_test_local_only", &FunctionScope::new()).is_none());
    assert!(lookup("registry_test_missing", &local).is_none());
}

#[test]
fn test_invoke_failure_modes() {
    let mut scope = FunctionScope::new();
    scope
        .insert(
            "fails",
            Function::from_fn(|s: String| -> Result<bool, String> { Err(format!("bad {s}")) }),
        )
        .unwrap();
    scope
        .insert("panics", Function::from_fn(|| -> bool { panic!("boom") }))
        .unwrap();
    scope
        .insert(
            "lies",
            Function::new(Signature::new([], Kind::Bool), |_| Ok(Value::Int(1))),
        )
        .unwrap();
    scope
        .insert(
            "undeclared",
            Function::new(Signature::new([], Kind::Bool), |_| {
                Err(FunctionError::new("nope"))
            }),
        )
        .unwrap();

    let call = |name: &str, args: &[Value]| scope.get(name).unwrap().invoke(args);

    assert_eq!(
        call("fails", &[Value::Str("x".into())]),
        Err(InvokeError::Failed("bad x".to_string()))
    );
    assert_eq!(
        call("panics", &[]),
        Err(InvokeError::Panicked("boom".to_string()))
    );
    assert!(matches!(
        call("lies", &[]),
        Err(InvokeError::ContractViolation(_))
    ));
    assert!(matches!(
        call("undeclared", &[]),
        Err(InvokeError::ContractViolation(_))
    ));
}

#[test]
fn test_names_are_sorted() {
    let mut scope = FunctionScope::new();
    for name in ["b", "c", "a"] {
        scope.insert(name, Function::from_fn(|| true)).unwrap();
    }
    assert_eq!(scope.names(), vec!["a", "b", "c"]);
}
