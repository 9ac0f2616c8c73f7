//! The compilation engine.

use alloc::sync::Arc;

use super::pipeline::{parse_with_options, register_function, validate};
use super::{CompiledExpression, EngineOptions, Error};
use crate::cache;
use crate::functions::{Function, FunctionScope, Scope};

/// Compiles expressions against a set of locally registered functions.
///
/// Global functions (the built-ins and anything registered with
/// [`Scope::Global`](crate::functions::Scope::Global)) are always visible and
/// win over a local function with the same name.
///
/// # Example
///
/// ```
/// use verdict_core::api::{Engine, EngineOptions};
/// use verdict_core::evaluator::Bindings;
/// use verdict_core::functions::Function;
///
/// let mut engine = Engine::new(EngineOptions::default());
/// engine
///     .register_function("isEven", Function::from_fn(|n: i64| n % 2 == 0))
///     .unwrap();
///
/// let expr = engine.compile("isEven($n) and $n > 2").unwrap();
/// let bindings = Bindings::new().with("n", 4).unwrap();
/// assert_eq!(expr.run(&bindings), Ok(true));
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    options: EngineOptions,
    functions: FunctionScope,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            functions: FunctionScope::new(),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Functions registered on this engine, not including globals.
    pub fn functions(&self) -> &FunctionScope {
        &self.functions
    }

    pub fn register_function(&mut self, name: &str, function: Function) -> Result<(), Error> {
        register_function(Scope::Local(&mut self.functions), name, function)
    }

    /// Parses and validates `source`.
    pub fn compile(&self, source: &str) -> Result<CompiledExpression<'_>, Error> {
        let cache = cache::global();
        let shared = self.options.use_parse_cache && cache.options().max_depth == self.options.max_depth;
        let tree = if shared {
            cache
                .get_or_parse(source)
                .map_err(|e| Error::syntax(e, source))?
        } else {
            Arc::new(parse_with_options(source, &self.options.parse_options())?)
        };
        validate(&tree, &self.functions)?;
        Ok(CompiledExpression::new(tree, &self.functions))
    }
}
