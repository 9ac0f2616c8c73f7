use smallvec::SmallVec;
use thiserror::Error;

use crate::values::Kind;

/// One declared result of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
    Value(Kind),
    /// The function may fail instead of producing its value.
    Failure,
}

/// Declared shape of a callable: parameter kinds and results.
///
/// A signature is only a claim; [`Signature::check`] decides whether the
/// registry accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Kind>,
    pub variadic: bool,
    pub results: Vec<Returns>,
}

/// Why a signature was refused at registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureViolation {
    #[error("variadic functions are not supported")]
    Variadic,
    #[error("parameter at index {position} is a {kind}; parameters must be boolean, integer, float or string")]
    UnsupportedParameter { position: usize, kind: Kind },
    #[error("function returns nothing")]
    NoResult,
    #[error("function returns {0} results; at most two are allowed")]
    TooManyResults(usize),
    #[error("the second result of a function must be a failure")]
    SecondResultNotFailure,
    #[error("the first result of a function cannot be a failure")]
    FirstResultIsFailure,
    #[error("function returns a {0}; results must be boolean, integer, float or string")]
    UnsupportedResult(Kind),
}

/// A signature that passed [`Signature::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedSignature {
    pub params: SmallVec<[Kind; 4]>,
    pub result: Kind,
    pub fallible: bool,
}

impl Signature {
    /// `params -> result`.
    pub fn new(params: impl IntoIterator<Item = Kind>, result: Kind) -> Self {
        Signature {
            params: params.into_iter().collect(),
            variadic: false,
            results: vec![Returns::Value(result)],
        }
    }

    /// `params -> result`, or a failure.
    pub fn fallible(params: impl IntoIterator<Item = Kind>, result: Kind) -> Self {
        Signature {
            params: params.into_iter().collect(),
            variadic: false,
            results: vec![Returns::Value(result), Returns::Failure],
        }
    }

    /// Applies the registration rules, in order: no variadics, scalar
    /// parameters, one or two results with the optional second one being a
    /// failure, and a scalar first result.
    pub fn check(&self) -> Result<CheckedSignature, SignatureViolation> {
        if self.variadic {
            return Err(SignatureViolation::Variadic);
        }
        if let Some((position, kind)) = self
            .params
            .iter()
            .enumerate()
            .find(|(_, kind)| !kind.is_scalar())
        {
            return Err(SignatureViolation::UnsupportedParameter {
                position,
                kind: *kind,
            });
        }

        if self.results.len() > 2 {
            return Err(SignatureViolation::TooManyResults(self.results.len()));
        }
        let (first, fallible) = match self.results.as_slice() {
            [] => return Err(SignatureViolation::NoResult),
            [Returns::Failure] | [Returns::Failure, Returns::Failure] => {
                return Err(SignatureViolation::FirstResultIsFailure);
            }
            [_, Returns::Value(_)] => return Err(SignatureViolation::SecondResultNotFailure),
            [Returns::Value(kind)] => (*kind, false),
            [Returns::Value(kind), Returns::Failure] => (*kind, true),
            _ => return Err(SignatureViolation::TooManyResults(self.results.len())),
        };
        if !first.is_scalar() {
            return Err(SignatureViolation::UnsupportedResult(first));
        }

        Ok(CheckedSignature {
            params: self.params.iter().copied().collect(),
            result: first,
            fallible,
        })
    }
}
