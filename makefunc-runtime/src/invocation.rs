//! Validated invocations.
//!
//! [`make_invocation`] checks a function value against the caller's declared
//! returns and arguments once, up front. The resulting [`BoundInvocation`]
//! can then be run any number of times without re-validating.

use crate::callable::Callable;
use crate::error::{CallFailure, InvocationError};
use crate::value::{Data, Value};
use makefunc_types::{validate_signature, Actual, FunctionType, SignatureError, Type};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// One actual argument supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Present(Value),
    /// Omitted; the callable receives the zero value of the declared parameter
    Absent,
}

impl Argument {
    pub fn actual(&self) -> Actual<'_> {
        match self {
            Argument::Present(value) => value.actual(),
            Argument::Absent => Actual::Absent,
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Present(value)
    }
}

/// Validate a function value against declared returns and arguments without
/// binding anything.
pub fn validate_function(
    callable: &Value,
    declared_returns: &[Type],
    params: &[Argument],
) -> Result<(), SignatureError> {
    let actuals: Vec<Actual<'_>> = params.iter().map(Argument::actual).collect();
    validate_signature(callable.ty(), declared_returns, &actuals)
}

/// Validate `callable` and bind it to `params`.
///
/// The declared returns must be exactly `[error]`: the single result is the
/// outcome of the call, nil on success.
pub fn make_invocation(
    callable: &Value,
    declared_returns: &[Type],
    params: Vec<Argument>,
) -> Result<BoundInvocation, InvocationError> {
    validate_function(callable, declared_returns, &params)?;

    if declared_returns != [Type::error()] {
        return Err(InvocationError::outcome_contract(declared_returns));
    }

    let not_callable = || InvocationError::NotCallable {
        ty: callable.ty().clone(),
    };
    let function = callable.as_callable().ok_or_else(not_callable)?;
    let signature = callable.ty().as_function().ok_or_else(not_callable)?;

    let arguments = params
        .into_iter()
        .enumerate()
        .map(|(index, argument)| match argument {
            Argument::Present(value) => Ok(value),
            Argument::Absent => signature
                .param_for_argument(index)
                .map(Value::zero)
                .ok_or(InvocationError::UnresolvedArgument { index }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        function = function.name(),
        signature = %signature,
        arguments = arguments.len(),
        "bound invocation"
    );

    Ok(BoundInvocation {
        function: Arc::clone(function),
        signature: signature.clone(),
        arguments,
    })
}

/// A function value bound to validated arguments
#[derive(Clone)]
pub struct BoundInvocation {
    function: Arc<dyn Callable>,
    signature: FunctionType,
    arguments: Vec<Value>,
}

impl BoundInvocation {
    /// Arguments as bound, with absent ones already replaced by zero values
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn signature(&self) -> &FunctionType {
        &self.signature
    }

    /// Run the callable. A nil outcome is success, anything else is returned
    /// as the failure, as is a callable returning the wrong number of results.
    pub fn invoke(&self) -> Result<(), CallFailure> {
        let args = self.call_arguments();
        trace!(function = self.function.name(), arguments = args.len(), "invoking");

        let results = self.function.call(&args);
        let declared = self.signature.results().len();
        if results.len() != declared {
            warn!(
                function = self.function.name(),
                declared,
                returned = results.len(),
                "callable broke its declared result count"
            );
            return Err(CallFailure::result_count(
                self.function.name(),
                declared,
                results.len(),
            ));
        }

        match results.into_iter().next() {
            Some(outcome) if !outcome.is_nil() => {
                debug!(function = self.function.name(), outcome = %outcome, "invocation failed");
                Err(CallFailure::new(outcome))
            }
            _ => Ok(()),
        }
    }

    /// Consume the binding into a zero-argument closure
    pub fn into_fn(self) -> impl Fn() -> Result<(), CallFailure> + Send + Sync {
        move || self.invoke()
    }

    /// Pack trailing arguments into the variadic sequence
    fn call_arguments(&self) -> Vec<Value> {
        let Some(tail) = self.signature.variadic_param() else {
            return self.arguments.clone();
        };
        let fixed = self.signature.fixed_params().len().min(self.arguments.len());
        let mut args = self.arguments[..fixed].to_vec();
        args.push(Value::new(
            tail.clone(),
            Data::Sequence(self.arguments[fixed..].to_vec()),
        ));
        args
    }
}

impl fmt::Debug for BoundInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundInvocation")
            .field("function", &self.function.name())
            .field("signature", &self.signature)
            .field("arguments", &self.arguments)
            .finish()
    }
}
