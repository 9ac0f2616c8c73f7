//! Public error types.
//!
//! Each stage has its own error type; they are converted into [`Error`] at
//! the API boundary, attaching the source text so the failure can be
//! rendered against it.

use thiserror::Error;

use crate::analyzer::{ValidationError, ValidationErrorKind};
use crate::evaluator::{BindingError, ExecutionError, ExecutionErrorKind};
use crate::functions::{RegistrationError, SignatureViolation};
use crate::syntax::{ParseError, Span};

/// Public error type for all operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The text is not a well-formed expression.
    #[error("syntax error: {}", .diagnostic.message)]
    Syntax { diagnostic: Diagnostic, input: String },

    /// The expression is well-formed but cannot be evaluated for any bindings.
    #[error("validation error: {}", .diagnostic.message)]
    Validation { diagnostic: Diagnostic, input: String },

    #[error("function `{0}` is already registered")]
    AlreadyExists(String),

    #[error("function `{name}` has an invalid signature: {violation}")]
    InvalidSignature {
        name: String,
        violation: SignatureViolation,
    },

    /// Evaluation failed because of the supplied bindings or a function
    /// reporting a failure.
    #[error("evaluation error: {}", .diagnostic.message)]
    Evaluation { diagnostic: Diagnostic, input: String },

    /// Something broke that the caller could not have caused, such as a
    /// registered function panicking.
    #[error("internal error: {}", .diagnostic.message)]
    Internal { diagnostic: Diagnostic, input: String },

    #[error(transparent)]
    Binding(#[from] BindingError),
}

impl Error {
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::Syntax { diagnostic, .. }
            | Error::Validation { diagnostic, .. }
            | Error::Evaluation { diagnostic, .. }
            | Error::Internal { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }

    /// The expression text the diagnostic points into.
    pub fn input(&self) -> Option<&str> {
        match self {
            Error::Syntax { input, .. }
            | Error::Validation { input, .. }
            | Error::Evaluation { input, .. }
            | Error::Internal { input, .. } => Some(input),
            _ => None,
        }
    }

    pub(crate) fn syntax(error: ParseError, input: &str) -> Self {
        Error::Syntax {
            diagnostic: Diagnostic::new(error.message, error.span).with_code("E001"),
            input: input.to_string(),
        }
    }

    pub(crate) fn validation(error: ValidationError, input: &str) -> Self {
        let help = match &error.kind {
            ValidationErrorKind::Identifier(name) => {
                Some(format!("did you mean `${name}`?"))
            }
            ValidationErrorKind::UnknownFunction(_) => {
                Some("functions must be registered before the expression is compiled".to_string())
            }
            ValidationErrorKind::BooleanFunctionOperand { .. } => {
                Some("boolean results can be compared with `=` or `!=` only".to_string())
            }
            _ => None,
        };
        let mut diagnostic = Diagnostic::new(error.kind.to_string(), error.span).with_code("E002");
        if let Some(help) = help {
            diagnostic = diagnostic.with_help(help);
        }
        Error::Validation {
            diagnostic,
            input: input.to_string(),
        }
    }

    pub(crate) fn execution(error: ExecutionError, input: &str) -> Self {
        match error.kind {
            ExecutionErrorKind::Evaluation(e) => Error::Evaluation {
                diagnostic: Diagnostic::new(e.to_string(), error.span).with_code("E003"),
                input: input.to_string(),
            },
            ExecutionErrorKind::Internal(message) => Error::Internal {
                diagnostic: Diagnostic::new(message, error.span),
                input: input.to_string(),
            },
        }
    }
}

impl From<RegistrationError> for Error {
    fn from(error: RegistrationError) -> Self {
        match error {
            RegistrationError::AlreadyExists(name) => Error::AlreadyExists(name),
            RegistrationError::InvalidSignature { name, violation } => {
                Error::InvalidSignature { name, violation }
            }
        }
    }
}

/// A message tied to a location in the expression text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    /// Byte range into the source.
    pub span: Span,
    /// Suggestions for fixing the problem.
    pub help: Vec<String>,
    /// Stable code for documentation lookup, e.g. `E001`.
    pub code: Option<&'static str>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            help: Vec::new(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}
