//! Caller-supplied variable values.

use hashbrown::HashMap;
use static_assertions::assert_impl_all;
use thiserror::Error;

use crate::values::{Kind, Value};

/// Why a value cannot be bound to a variable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{0} values cannot be bound to variables")]
    UnsupportedKind(Kind),
    #[error("{0} does not fit in a 64-bit signed integer")]
    OutOfRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("variable names cannot be empty")]
    EmptyName,
    #[error("cannot bind `{name}`: {reason}")]
    Rejected { name: String, reason: Rejection },
}

/// Native values that can be bound to a variable.
pub trait IntoBinding {
    fn into_binding(self) -> Result<Value, Rejection>;
}

macro_rules! lossless_int {
    ($($ty:ty),*) => {$(
        impl IntoBinding for $ty {
            fn into_binding(self) -> Result<Value, Rejection> {
                Ok(Value::Int(i64::from(self)))
            }
        }
    )*};
}

macro_rules! checked_int {
    ($($ty:ty),*) => {$(
        impl IntoBinding for $ty {
            fn into_binding(self) -> Result<Value, Rejection> {
                i64::try_from(self)
                    .map(Value::Int)
                    .map_err(|_| Rejection::OutOfRange(self.to_string()))
            }
        }
    )*};
}

lossless_int!(i8, i16, i32, i64, u8, u16, u32);
checked_int!(isize, usize, u64, i128, u128);

impl IntoBinding for f32 {
    fn into_binding(self) -> Result<Value, Rejection> {
        Ok(Value::Float(f64::from(self)))
    }
}

impl IntoBinding for f64 {
    fn into_binding(self) -> Result<Value, Rejection> {
        Ok(Value::Float(self))
    }
}

impl IntoBinding for bool {
    fn into_binding(self) -> Result<Value, Rejection> {
        Ok(Value::Bool(self))
    }
}

impl IntoBinding for String {
    fn into_binding(self) -> Result<Value, Rejection> {
        Ok(Value::Str(self))
    }
}

impl IntoBinding for &str {
    fn into_binding(self) -> Result<Value, Rejection> {
        Ok(Value::Str(self.to_string()))
    }
}

impl IntoBinding for Value {
    fn into_binding(self) -> Result<Value, Rejection> {
        if self.kind().is_scalar() {
            Ok(self)
        } else {
            Err(Rejection::UnsupportedKind(self.kind()))
        }
    }
}

/// Variable values for one evaluation, keyed by name without the `$`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: HashMap<String, Value>,
}

assert_impl_all!(Bindings: Send, Sync);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing and returning any previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl IntoBinding,
    ) -> Result<Option<Value>, BindingError> {
        let name = name.into();
        if name.is_empty() {
            return Err(BindingError::EmptyName);
        }
        match value.into_binding() {
            Ok(value) => Ok(self.values.insert(name, value)),
            Err(reason) => Err(BindingError::Rejected { name, reason }),
        }
    }

    /// Builder form of [`Bindings::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl IntoBinding) -> Result<Self, BindingError> {
        self.insert(name, value)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
