//! makefunc runtime
//!
//! Typed runtime values and validated invocations. A function value is
//! checked once against the caller's declared returns and arguments by
//! [`make_invocation`]; the resulting [`BoundInvocation`] runs it and turns
//! its single `error` result into `Ok(())` or a [`CallFailure`].

pub mod builtins;
pub mod callable;
pub mod error;
pub mod invocation;
pub mod value;

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

pub use callable::{Callable, NativeFunction};
pub use error::{CallFailure, InvocationError};
pub use invocation::{make_invocation, validate_function, Argument, BoundInvocation};
pub use value::{native_error_type, Data, Shared, Value};
