//! Verdict: boolean rule expressions for embedding in host applications.
//!
//! # Overview
//!
//! An expression such as `$car in ('bwm', 'byd') and startsWith($car, 'b')`
//! is parsed once, validated against the functions in scope, and then
//! evaluated to `true` or `false` against caller-supplied variables. Typical
//! uses are routing rules, feature flags and access policies.
//!
//! # Quick Start
//!
//! ```
//! use verdict::{Bindings, eval};
//!
//! let bindings = Bindings::new()
//!     .with("car", "byd")
//!     .and_then(|b| b.with("speed", 87))
//!     .unwrap();
//!
//! let result = eval("$car in ('bwm', 'byd') and $speed * 1.1 > 90", &bindings);
//! assert_eq!(result, Ok(true));
//! ```
//!
//! # Custom Functions
//!
//! Closures over `bool`, `i64`, `f64` and `String` can be registered, either
//! on an [`Engine`] or globally:
//!
//! ```
//! use verdict::{Bindings, Engine, EngineOptions, Function};
//!
//! let mut engine = Engine::new(EngineOptions::default());
//! engine
//!     .register_function("domain", Function::from_fn(|email: String| {
//!         email.rsplit('@').next().unwrap_or_default().to_string()
//!     }))
//!     .unwrap();
//!
//! let expr = engine.compile("domain($from) in ('example.com')").unwrap();
//! let bindings = Bindings::new().with("from", "ops@example.com").unwrap();
//! assert_eq!(expr.run(&bindings), Ok(true));
//! ```

pub mod error_renderer;
pub use error_renderer::{CharSet, RenderConfig, render_error, render_error_to};

// Re-export public API from verdict_core
pub use verdict_core::api::{
    CompiledExpression, Diagnostic, Engine, EngineOptions, Error, eval, evaluate, parse,
    parse_cached, parse_with_options, register_function, validate,
};

pub use verdict_core::evaluator::{BindingError, Bindings, IntoBinding};
pub use verdict_core::functions::{Function, FunctionError, FunctionScope, Scope};
pub use verdict_core::syntax::{ParseOptions, Span, Tree};
pub use verdict_core::values::{Kind, Value};
