//! Functions callable from expressions, and the scopes they live in.

pub mod builtins;
pub mod function;
pub mod registry;
pub mod signature;

pub use function::{Callable, FnOutput, FromValue, Function, FunctionError, IntoFunction};
pub use registry::{
    FunctionEntry, FunctionScope, InvokeError, RegistrationError, Scope, global_names, lookup,
    register_function,
};
pub use signature::{CheckedSignature, Returns, Signature, SignatureViolation};

#[cfg(test)]
mod registry_test;
