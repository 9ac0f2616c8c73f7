//! Callables that expressions can invoke.
//!
//! The raw calling convention is a closure over `&[Value]`, paired with a
//! [`Signature`] describing it. Plain Rust functions over `bool`, `i64`,
//! `f64` and `String` are adapted through [`IntoFunction`], which derives
//! the signature from the parameter and return types.

use alloc::sync::Arc;
use core::fmt;

use thiserror::Error;

use super::signature::{Returns, Signature};
use crate::values::{Kind, Value};

/// A failure reported by a function. Becomes an evaluation error when the
/// function declares that it may fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FunctionError {
    message: String,
}

impl FunctionError {
    pub fn new(message: impl fmt::Display) -> Self {
        FunctionError {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Callable = dyn Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync;

/// A callable together with its declared signature.
#[derive(Clone)]
pub struct Function {
    signature: Signature,
    callable: Arc<Callable>,
}

impl Function {
    /// Wraps a raw callable. The registry checks `signature` on registration
    /// and the evaluator checks every result against it.
    pub fn new<F>(signature: Signature, callable: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        Function {
            signature,
            callable: Arc::new(callable),
        }
    }

    /// Adapts a typed Rust function.
    ///
    /// ```
    /// use verdict_core::functions::Function;
    ///
    /// let starts = Function::from_fn(|s: String, prefix: String| s.starts_with(&prefix));
    /// assert_eq!(starts.signature().params.len(), 2);
    /// ```
    pub fn from_fn<F, Args>(f: F) -> Self
    where
        F: IntoFunction<Args>,
    {
        f.into_function()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn into_parts(self) -> (Signature, Arc<Callable>) {
        (self.signature, self.callable)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Types a typed function can take as parameters.
pub trait FromValue: Sized {
    const KIND: Kind;
    fn from_value(value: &Value) -> Option<Self>;
}

/// Types a typed function can return.
pub trait FnOutput {
    fn results() -> Vec<Returns>;
    fn into_result(self) -> Result<Value, FunctionError>;
}

macro_rules! scalar {
    ($ty:ty, $kind:ident, $value:pat => $out:expr) => {
        impl FromValue for $ty {
            const KIND: Kind = Kind::$kind;

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    $value => Some($out),
                    _ => None,
                }
            }
        }

        impl FnOutput for $ty {
            fn results() -> Vec<Returns> {
                vec![Returns::Value(Kind::$kind)]
            }

            fn into_result(self) -> Result<Value, FunctionError> {
                Ok(Value::from(self))
            }
        }

        impl<E: fmt::Display> FnOutput for Result<$ty, E> {
            fn results() -> Vec<Returns> {
                vec![Returns::Value(Kind::$kind), Returns::Failure]
            }

            fn into_result(self) -> Result<Value, FunctionError> {
                self.map(Value::from).map_err(FunctionError::new)
            }
        }
    };
}

scalar!(bool, Bool, Value::Bool(b) => *b);
scalar!(i64, Int, Value::Int(i) => *i);
scalar!(f64, Float, Value::Float(f) => *f);
scalar!(String, Str, Value::Str(s) => s.clone());

/// Conversion of a typed Rust function into a [`Function`].
///
/// Implemented for `Fn` closures and function items of up to four
/// parameters. `Args` is the parameter tuple and only guides inference.
pub trait IntoFunction<Args> {
    fn into_function(self) -> Function;
}

macro_rules! into_function {
    ($($ty:ident $arg:ident),*) => {
        impl<F, R, $($ty,)*> IntoFunction<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: FnOutput,
            $($ty: FromValue,)*
        {
            fn into_function(self) -> Function {
                let signature = Signature {
                    params: vec![$($ty::KIND),*],
                    variadic: false,
                    results: R::results(),
                };
                Function::new(signature, move |args: &[Value]| {
                    let expected: &[Kind] = &[$($ty::KIND),*];
                    if args.len() != expected.len() {
                        return Err(FunctionError::new(format!(
                            "expected {} arguments, got {}",
                            expected.len(),
                            args.len()
                        )));
                    }
                    #[allow(unused_mut, unused_variables)]
                    let mut args = args.iter();
                    $(
                        let $arg = args
                            .next()
                            .and_then($ty::from_value)
                            .ok_or_else(|| FunctionError::new(format!("expected a {}", $ty::KIND)))?;
                    )*
                    (self)($($arg),*).into_result()
                })
            }
        }
    };
}

into_function!();
into_function!(A a);
into_function!(A a, B b);
into_function!(A a, B b, C c);
into_function!(A a, B b, C c, D d);
