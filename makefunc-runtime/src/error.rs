//! Runtime error types for bound invocations.
//!
//! Construction failures and the failures a bound invocation reports.

use crate::value::Value;
use makefunc_types::{SignatureError, Type};
use miette::Diagnostic;
use thiserror::Error;

/// Reasons an invocation could not be built
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum InvocationError {
    #[error("invalid function: {0}")]
    #[diagnostic(code(makefunc::runtime::invalid_function))]
    Invalid(#[from] SignatureError),

    #[error("invalid function: declared returns ({returns}) are not the single outcome slot (error)")]
    #[diagnostic(
        code(makefunc::runtime::outcome_contract),
        help("Invocations report through exactly one `error` result")
    )]
    OutcomeContract { returns: String },

    #[error("invalid function: {ty} value has no implementation")]
    #[diagnostic(
        code(makefunc::runtime::not_callable),
        help("A nil function value cannot be invoked")
    )]
    NotCallable { ty: Type },

    #[error("cannot resolve a zero value for absent argument at index {index}")]
    #[diagnostic(code(makefunc::runtime::unresolved_argument))]
    UnresolvedArgument { index: usize },
}

impl InvocationError {
    pub fn outcome_contract(returns: &[Type]) -> Self {
        let returns = returns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        InvocationError::OutcomeContract { returns }
    }
}

/// The callable ran and reported a non-nil outcome
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("{message}")]
#[diagnostic(code(makefunc::runtime::call_failed))]
pub struct CallFailure {
    message: String,
    value: Value,
}

impl CallFailure {
    pub fn new(value: Value) -> Self {
        Self {
            message: value.error_message(),
            value,
        }
    }

    /// The callable returned a different number of results than it declares
    pub fn result_count(function: &str, declared: usize, returned: usize) -> Self {
        let message = format!(
            "{function} declares {declared} results but returned {returned}"
        );
        Self {
            value: Value::error(message.clone()),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The outcome value exactly as the callable returned it
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}
