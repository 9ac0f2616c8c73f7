//! One-call entry points over the individual stages.
//!
//! These take the same arguments as the stage functions but return the
//! public [`Error`].

use alloc::sync::Arc;

use super::Error;
use crate::evaluator::{Bindings, execute};
use crate::functions::{self, Function, FunctionScope, Scope};
use crate::syntax::{ParseOptions, Tree};
use crate::{analyzer, cache, syntax};

pub fn parse(text: &str) -> Result<Tree, Error> {
    syntax::parse(text).map_err(|e| Error::syntax(e, text))
}

pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Tree, Error> {
    syntax::parse_with_options(text, options).map_err(|e| Error::syntax(e, text))
}

/// Like [`parse`], but memoized in the process-wide cache.
pub fn parse_cached(text: &str) -> Result<Arc<Tree>, Error> {
    cache::parse_cached(text).map_err(|e| Error::syntax(e, text))
}

pub fn validate(tree: &Tree, scope: &FunctionScope) -> Result<(), Error> {
    analyzer::validate(tree, scope).map_err(|e| Error::validation(e, tree.source()))
}

/// Validates `tree`, then evaluates it against `bindings`.
pub fn evaluate(tree: &Tree, bindings: &Bindings, scope: &FunctionScope) -> Result<bool, Error> {
    validate(tree, scope)?;
    run(tree, bindings, scope)
}

/// Parses (through the cache), validates and evaluates `text` with only the
/// global functions in scope.
pub fn eval(text: &str, bindings: &Bindings) -> Result<bool, Error> {
    let tree = parse_cached(text)?;
    evaluate(&tree, bindings, &FunctionScope::new())
}

pub fn register_function(scope: Scope<'_>, name: &str, function: Function) -> Result<(), Error> {
    functions::register_function(scope, name, function).map_err(Error::from)
}

pub(crate) fn run(tree: &Tree, bindings: &Bindings, scope: &FunctionScope) -> Result<bool, Error> {
    let result = execute(tree, bindings, scope).map_err(|e| Error::execution(e, tree.source()));
    match &result {
        Ok(value) => tracing::debug!(source = tree.source(), value, "Evaluated expression"),
        Err(e) => tracing::debug!(source = tree.source(), error = %e, "Evaluation failed"),
    }
    result
}
