//! Behavioural tests for bound invocations and builtins

mod test_json_unmarshal;

use crate::{NativeFunction, Value};
use makefunc_types::{Field, FunctionType, Primitive, Type};
use parking_lot::Mutex;
use std::sync::Arc;

pub(crate) fn int() -> Type {
    Type::primitive(Primitive::Int)
}

pub(crate) fn string() -> Type {
    Type::primitive(Primitive::String)
}

/// `struct { Key string }`
pub(crate) fn key_record() -> Type {
    Type::record(vec![Field::new("Key", string())])
}

/// Arguments seen by each call of a recording function
pub(crate) type Calls = Arc<Mutex<Vec<Vec<Value>>>>;

/// A function of `signature` that records its arguments and returns `outcome`
pub(crate) fn recording(signature: FunctionType, outcome: Value) -> (Value, Calls) {
    let calls: Calls = Arc::default();
    let seen = Arc::clone(&calls);
    let function = NativeFunction::new("recording", signature, move |args| {
        seen.lock().push(args.to_vec());
        vec![outcome.clone()]
    });
    (Value::function(function), calls)
}
