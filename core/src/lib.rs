//! Core of the verdict rule language: parsing, validation and evaluation of
//! boolean expressions over caller-supplied variables.

extern crate alloc;

pub mod analyzer;
pub mod api;
pub mod cache;
pub mod evaluator;
pub mod functions;
pub mod syntax;
pub mod values;
pub mod walker;

pub use api::{
    CompiledExpression, Diagnostic, Engine, EngineOptions, Error, eval, evaluate, parse,
    parse_cached, parse_with_options, register_function, validate,
};
pub use evaluator::{Bindings, IntoBinding};
pub use functions::{Function, FunctionError, FunctionScope, Scope};
pub use syntax::{ParseOptions, Span, Tree};
pub use values::{Kind, Value};
