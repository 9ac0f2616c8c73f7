//! Function lookup tables.
//!
//! There are two scopes. The global scope is process-wide, pre-populated with
//! the built-in functions and shared by every evaluation. A [`FunctionScope`]
//! is owned by one compilation (usually through an `Engine`). Lookups try the
//! global scope first, so a global function shadows a local one of the same
//! name.

use alloc::sync::Arc;
use core::fmt;
use std::panic::{self, AssertUnwindSafe};

use hashbrown::HashMap;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use smallvec::SmallVec;
use static_assertions::assert_impl_all;
use thiserror::Error;

use super::builtins;
use super::function::{Callable, Function};
use super::signature::SignatureViolation;
use crate::values::{Kind, Value};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("function `{0}` is already registered")]
    AlreadyExists(String),
    #[error("function `{name}` has an invalid signature: {violation}")]
    InvalidSignature {
        name: String,
        violation: SignatureViolation,
    },
}

/// Why a call did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    /// The function reported a failure it declared.
    #[error("{0}")]
    Failed(String),
    #[error("function panicked: {0}")]
    Panicked(String),
    /// The function broke its own signature.
    #[error("{0}")]
    ContractViolation(String),
}

/// A registered function.
#[derive(Clone)]
pub struct FunctionEntry {
    name: String,
    params: SmallVec<[Kind; 4]>,
    result: Kind,
    fallible: bool,
    callable: Arc<Callable>,
}

assert_impl_all!(FunctionEntry: Send, Sync);

impl FunctionEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Kind] {
        &self.params
    }

    pub fn result(&self) -> Kind {
        self.result
    }

    pub fn is_fallible(&self) -> bool {
        self.fallible
    }

    /// Calls the function, turning panics and results that do not match the
    /// signature into errors.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, InvokeError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.callable)(args)));
        match outcome {
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(function = %self.name, "Function panicked: {message}");
                Err(InvokeError::Panicked(message))
            }
            Ok(Err(e)) if self.fallible => Err(InvokeError::Failed(e.to_string())),
            Ok(Err(e)) => Err(InvokeError::ContractViolation(format!(
                "function `{}` failed but does not declare a failure result: {e}",
                self.name
            ))),
            Ok(Ok(value)) if value.kind() == self.result => Ok(value),
            Ok(Ok(value)) => Err(InvokeError::ContractViolation(format!(
                "function `{}` returned a {} instead of a {}",
                self.name,
                value.kind(),
                self.result
            ))),
        }
    }
}

impl fmt::Debug for FunctionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionEntry")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("result", &self.result)
            .field("fallible", &self.fallible)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn core::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// A table of functions keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FunctionScope {
    functions: HashMap<String, FunctionEntry>,
}

impl FunctionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Adds `function` under `name`. A name is checked for duplicates before
    /// the signature is checked.
    pub fn insert(&mut self, name: &str, function: Function) -> Result<(), RegistrationError> {
        if self.functions.contains_key(name) {
            return Err(RegistrationError::AlreadyExists(name.to_string()));
        }
        let (signature, callable) = function.into_parts();
        let checked = signature
            .check()
            .map_err(|violation| RegistrationError::InvalidSignature {
                name: name.to_string(),
                violation,
            })?;
        self.functions.insert(
            name.to_string(),
            FunctionEntry {
                name: name.to_string(),
                params: checked.params,
                result: checked.result,
                fallible: checked.fallible,
                callable,
            },
        );
        Ok(())
    }
}

lazy_static! {
    static ref GLOBAL_SCOPE: RwLock<FunctionScope> = RwLock::new(builtins::builtin_scope());
}

/// Where to register a function.
pub enum Scope<'a> {
    Global,
    Local(&'a mut FunctionScope),
}

/// Registers `function` under `name`.
///
/// Fails if the name is already taken in the target scope or if the
/// signature is not supported.
pub fn register_function(
    scope: Scope<'_>,
    name: &str,
    function: Function,
) -> Result<(), RegistrationError> {
    let result = match scope {
        Scope::Global => GLOBAL_SCOPE.write().insert(name, function),
        Scope::Local(local) => local.insert(name, function),
    };
    match &result {
        Ok(()) => tracing::debug!(name, "Registered function"),
        Err(e) => tracing::debug!(name, error = %e, "Function registration refused"),
    }
    result
}

/// Resolves `name`, global scope first.
pub fn lookup(name: &str, local: &FunctionScope) -> Option<FunctionEntry> {
    if let Some(entry) = GLOBAL_SCOPE.read().get(name) {
        return Some(entry.clone());
    }
    local.get(name).cloned()
}

/// Names registered in the global scope, sorted.
pub fn global_names() -> Vec<String> {
    GLOBAL_SCOPE
        .read()
        .names()
        .into_iter()
        .map(str::to_string)
        .collect()
}
