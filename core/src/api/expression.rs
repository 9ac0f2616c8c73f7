//! Compiled expressions.

use alloc::sync::Arc;

use super::Error;
use super::pipeline::run;
use crate::evaluator::Bindings;
use crate::functions::FunctionScope;
use crate::syntax::Tree;

/// A validated expression ready to run.
///
/// Borrows the function scope of the [`Engine`](super::Engine) that compiled
/// it and can be run any number of times with different bindings.
#[derive(Debug, Clone)]
pub struct CompiledExpression<'e> {
    tree: Arc<Tree>,
    functions: &'e FunctionScope,
}

impl<'e> CompiledExpression<'e> {
    pub(crate) fn new(tree: Arc<Tree>, functions: &'e FunctionScope) -> Self {
        Self { tree, functions }
    }

    pub fn source(&self) -> &str {
        self.tree.source()
    }

    pub fn tree(&self) -> &Arc<Tree> {
        &self.tree
    }

    /// Evaluates the expression.
    ///
    /// Validation already happened in `compile`; argument kinds of function
    /// calls are still checked against the bindings.
    pub fn run(&self, bindings: &Bindings) -> Result<bool, Error> {
        run(&self.tree, bindings, self.functions)
    }
}
