//! Signature validation
//!
//! Applies the compatibility checker across a whole callable signature:
//! result arity and identity, fixed parameters and the variadic tail.
//! Validation is a pure function of its inputs and stops at the first
//! violation.

use crate::compat::check_compatibility;
use crate::error::SignatureError;
use crate::types::{Type, Underlying};
use std::fmt;
use tracing::{debug, trace};

/// The type of one actual argument, as seen by the validator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Actual<'a> {
    /// A value of a known type
    Typed(&'a Type),
    /// A nil with no inherent type
    UntypedNil,
    /// The caller omitted the value and will receive the declared zero value
    Absent,
}

impl<'a> From<&'a Type> for Actual<'a> {
    fn from(ty: &'a Type) -> Self {
        Actual::Typed(ty)
    }
}

impl fmt::Display for Actual<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actual::Typed(ty) => write!(f, "{ty}"),
            Actual::UntypedNil => f.write_str("untyped nil"),
            Actual::Absent => f.write_str("absent"),
        }
    }
}

/// Validate that `callable` is a function whose results are exactly
/// `declared_returns` and whose parameters accept `actual_args`.
pub fn validate_signature(
    callable: &Type,
    declared_returns: &[Type],
    actual_args: &[Actual<'_>],
) -> Result<(), SignatureError> {
    let result = validate(callable, declared_returns, actual_args);
    if let Err(error) = &result {
        debug!(callable = %callable, %error, "signature rejected");
    }
    result
}

fn validate(
    callable: &Type,
    declared_returns: &[Type],
    actual_args: &[Actual<'_>],
) -> Result<(), SignatureError> {
    let Some(signature) = callable.as_function() else {
        return Err(SignatureError::NotAFunction {
            kind: callable.kind(),
        });
    };

    let results = signature.results();
    if results.len() != declared_returns.len() {
        return Err(SignatureError::ReturnCount {
            declared: results.len(),
            expected: declared_returns.len(),
        });
    }
    for (index, (declared, expected)) in results.iter().zip(declared_returns).enumerate() {
        if declared != expected {
            return Err(SignatureError::ReturnType {
                index,
                declared: declared.clone(),
                expected: expected.clone(),
            });
        }
    }

    let Some(tail) = signature.variadic_param() else {
        let params = signature.params();
        if actual_args.len() != params.len() {
            return Err(SignatureError::ParamCount {
                declared: params.len(),
                got: actual_args.len(),
            });
        }
        for (index, (want, actual)) in params.iter().zip(actual_args).enumerate() {
            check_argument(index, want, *actual)?;
        }
        return Ok(());
    };

    let fixed = signature.fixed_params();
    if actual_args.len() < fixed.len() {
        return Err(SignatureError::VariadicParamCount {
            min: fixed.len(),
            got: actual_args.len(),
        });
    }
    for (index, (want, actual)) in fixed.iter().zip(actual_args).enumerate() {
        check_argument(index, want, *actual)?;
    }

    let Underlying::Sequence(elem) = tail.underlying() else {
        return Err(SignatureError::VariadicNotSequence {
            declared: tail.clone(),
        });
    };
    for (index, actual) in actual_args.iter().enumerate().skip(fixed.len()) {
        check_argument(index, elem, *actual)?;
    }
    Ok(())
}

fn check_argument(index: usize, want: &Type, actual: Actual<'_>) -> Result<(), SignatureError> {
    trace!(index, want = %want, got = %actual, "checking argument");
    let got = match actual {
        Actual::Absent => return Ok(()),
        Actual::UntypedNil => None,
        Actual::Typed(ty) => Some(ty),
    };
    check_compatibility(want, got).map_err(|source| SignatureError::Incompatible { index, source })
}
