//! Behavioural tests for compatibility checking and signature validation

mod test_signature_validation;

use crate::{FunctionType, MethodSet, Primitive, Type};

pub(crate) fn int() -> Type {
    Type::primitive(Primitive::Int)
}

pub(crate) fn string() -> Type {
    Type::primitive(Primitive::String)
}

pub(crate) fn boolean() -> Type {
    Type::primitive(Primitive::Bool)
}

pub(crate) fn float64() -> Type {
    Type::primitive(Primitive::Float64)
}

/// `interface { Read([]uint8) (int, error) }` and friends
pub(crate) fn io_interface(methods: &[&str]) -> Type {
    let signature = FunctionType::new(vec![Type::bytes()], vec![int(), Type::error()]);
    let set = methods
        .iter()
        .fold(MethodSet::new(), |set, name| set.with(*name, signature.clone()));
    Type::interface(set)
}

/// A named record type implementing `error` with a value receiver
pub(crate) fn some_error() -> Type {
    Type::named("makefunc.someError", &Type::record(vec![]))
        .method("Error", FunctionType::new(vec![], vec![string()]))
        .build()
}

/// A plain function type returning `error`
pub(crate) fn func(params: Vec<Type>) -> Type {
    Type::function(FunctionType::new(params, vec![Type::error()]))
}

/// A variadic function type returning `error`; the last param is given as the element type
pub(crate) fn variadic(mut params: Vec<Type>) -> Type {
    if let Some(last) = params.pop() {
        params.push(Type::sequence_of(last));
    }
    Type::function(FunctionType::variadic(params, vec![Type::error()]))
}
