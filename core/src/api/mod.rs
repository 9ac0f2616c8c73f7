//! Public API.
//!
//! [`Engine`] compiles expressions against its own function scope; the free
//! functions in [`pipeline`] run the individual stages with caller-supplied
//! scopes. Both report failures as [`Error`].
//!
//! # Example
//!
//! ```
//! use verdict_core::api::eval;
//! use verdict_core::evaluator::Bindings;
//!
//! let bindings = Bindings::new().with("car", "byd").unwrap();
//! let result = eval(
//!     "$car in ('bwm', 'byd') and (3 + 2) * 2.0 = 10 and startsWith($car, 'b')",
//!     &bindings,
//! );
//! assert_eq!(result, Ok(true));
//! ```

pub mod engine;
pub mod error;
pub mod expression;
pub mod options;
pub mod pipeline;

pub use engine::Engine;
pub use error::{Diagnostic, Error};
pub use expression::CompiledExpression;
pub use options::EngineOptions;
pub use pipeline::{
    eval, evaluate, parse, parse_cached, parse_with_options, register_function, validate,
};
