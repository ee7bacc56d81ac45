//! Callable values.
//!
//! A [`Callable`] is anything that can stand behind a function value. Calls
//! receive one argument per declared parameter; a variadic tail arrives
//! packed as a single sequence value.

use crate::value::Value;
use makefunc_types::{FunctionType, Type};
use std::fmt;

pub trait Callable: Send + Sync {
    /// Name used in logs and display output
    fn name(&self) -> &str {
        "anonymous"
    }

    /// The callable's function type
    fn ty(&self) -> &Type;

    /// Run the callable, producing one value per declared result
    fn call(&self, args: &[Value]) -> Vec<Value>;
}

type Body = Box<dyn Fn(&[Value]) -> Vec<Value> + Send + Sync>;

/// A callable implemented by a Rust closure
pub struct NativeFunction {
    name: String,
    ty: Type,
    body: Body,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, signature: FunctionType, body: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            ty: Type::function(signature),
            body: Box::new(body),
        }
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn ty(&self) -> &Type {
        &self.ty
    }

    fn call(&self, args: &[Value]) -> Vec<Value> {
        (self.body)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}
