//! Built-in callables.
//!
//! Native functions shaped like common library entry points.

use crate::callable::NativeFunction;
use crate::value::{Data, Value};
use makefunc_types::{FunctionType, Kind, MethodSet, Primitive, Type, Underlying};
use parking_lot::RwLock;
use serde_json::Value as Json;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by the JSON decoder, worded like `encoding/json`
#[derive(Error, Debug)]
pub enum JsonError {
    #[error("json: Unmarshal expects 2 arguments, got {count}")]
    Arguments { count: usize },

    #[error("json: input is not a byte sequence")]
    Input,

    #[error("json: Unmarshal(non-pointer {ty})")]
    NonPointer { ty: Type },

    #[error("json: Unmarshal(nil {ty})")]
    NilTarget { ty: Type },

    #[error("json: cannot unmarshal {found} into Go value of type {ty}")]
    Mismatch { found: String, ty: Type },

    #[error(transparent)]
    Syntax(#[from] serde_json::Error),
}

/// `func([]byte, any) error`: decode JSON into the value a pointer refers to
pub fn json_unmarshal() -> Value {
    Value::function(NativeFunction::new(
        "encoding/json.Unmarshal",
        FunctionType::new(vec![Type::bytes(), Type::any()], vec![Type::error()]),
        |args| vec![outcome(unmarshal(args))],
    ))
}

/// `func(string) error`: an error carrying the given message
pub fn errors_new() -> Value {
    Value::function(NativeFunction::new(
        "errors.New",
        FunctionType::new(vec![Type::primitive(Primitive::String)], vec![Type::error()]),
        |args| {
            let message = args.first().and_then(Value::as_str).unwrap_or_default();
            vec![Value::error(message.to_string())]
        },
    ))
}

/// Every builtin, keyed by its qualified name
pub fn all() -> Vec<(&'static str, Value)> {
    vec![
        ("encoding/json.Unmarshal", json_unmarshal()),
        ("errors.New", errors_new()),
    ]
}

fn outcome(result: Result<(), JsonError>) -> Value {
    match result {
        Ok(()) => Value::nil(Type::error()),
        Err(error) => Value::error(error),
    }
}

fn unmarshal(args: &[Value]) -> Result<(), JsonError> {
    let [data, target] = args else {
        return Err(JsonError::Arguments { count: args.len() });
    };
    let bytes = data.as_bytes().ok_or(JsonError::Input)?;

    if target.kind() != Kind::Pointer {
        return Err(JsonError::NonPointer {
            ty: target.ty().clone(),
        });
    }
    let Some(shared) = target.as_pointer() else {
        return Err(JsonError::NilTarget {
            ty: target.ty().clone(),
        });
    };

    let json: Json = serde_json::from_slice(&bytes)?;
    let current = shared.read().clone();
    let decoded = decode(&json, &current)?;
    *shared.write() = decoded;
    Ok(())
}

/// Decode `json` into a value shaped like `current`, keeping whatever the
/// document does not mention.
fn decode(json: &Json, current: &Value) -> Result<Value, JsonError> {
    let ty = current.ty().clone();
    if json.is_null() {
        return Ok(if ty.is_nilable() {
            Value::nil(ty)
        } else {
            current.clone()
        });
    }

    match ty.underlying() {
        Underlying::Pointer(target) => match current.as_pointer() {
            Some(shared) => {
                let existing = shared.read().clone();
                let decoded = decode(json, &existing)?;
                *shared.write() = decoded;
                Ok(current.clone())
            }
            None => {
                let decoded = decode(json, &Value::zero(target))?;
                Ok(Value::new(ty, Data::Pointer(Arc::new(RwLock::new(decoded)))))
            }
        },
        Underlying::Interface(methods) if methods.is_empty() => Ok(decode_dynamic(json)),
        Underlying::Primitive(primitive) => decode_primitive(json, *primitive, ty),
        Underlying::Sequence(elem) => {
            let Json::Array(items) = json else {
                return Err(mismatch(json, ty));
            };
            let items = items
                .iter()
                .map(|item| decode(item, &Value::zero(elem)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::new(ty, Data::Sequence(items)))
        }
        Underlying::Mapping { key, value }
            if matches!(key.underlying(), Underlying::Primitive(Primitive::String)) =>
        {
            let Json::Object(object) = json else {
                return Err(mismatch(json, ty));
            };
            let mut entries = match current.data() {
                Data::Mapping(entries) => entries.clone(),
                _ => Vec::new(),
            };
            for (name, item) in object {
                let name = Value::new(key.clone(), Data::Str(name.clone()));
                let item = decode(item, &Value::zero(value))?;
                match entries.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(entry) => entry.1 = item,
                    None => entries.push((name, item)),
                }
            }
            Ok(Value::new(ty, Data::Mapping(entries)))
        }
        Underlying::Record(fields) => {
            let Json::Object(object) = json else {
                return Err(mismatch(json, ty));
            };
            let mut values = match current.data() {
                Data::Record(values) => values.clone(),
                _ => fields.iter().map(|field| Value::zero(&field.ty)).collect(),
            };
            for (name, item) in object {
                // exact match wins over a case-insensitive one
                let index = fields
                    .iter()
                    .position(|field| field.name == *name)
                    .or_else(|| fields.iter().position(|field| field.name.eq_ignore_ascii_case(name)));
                if let Some(index) = index {
                    values[index] = decode(item, &values[index])?;
                }
            }
            Ok(Value::new(ty, Data::Record(values)))
        }
        _ => Err(mismatch(json, ty)),
    }
}

fn decode_primitive(json: &Json, primitive: Primitive, ty: Type) -> Result<Value, JsonError> {
    let data = match json {
        Json::Bool(value) if primitive == Primitive::Bool => Some(Data::Bool(*value)),
        Json::String(value) if primitive == Primitive::String => Some(Data::Str(value.clone())),
        Json::Number(number) if primitive.is_float() => number.as_f64().map(Data::Float),
        Json::Number(number) if primitive.is_unsigned() => number
            .as_u64()
            .filter(|value| bit_size(primitive) == 64 || *value < 1 << bit_size(primitive))
            .map(Data::Uint),
        Json::Number(number) if primitive.is_signed() => number
            .as_i64()
            .filter(|value| {
                let bits = bit_size(primitive);
                bits == 64 || (-(1 << (bits - 1))..(1 << (bits - 1))).contains(value)
            })
            .map(Data::Int),
        _ => None,
    };
    match data {
        Some(data) => Ok(Value::new(ty, data)),
        None => Err(mismatch(json, ty)),
    }
}

fn bit_size(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Int8 | Primitive::Uint8 => 8,
        Primitive::Int16 | Primitive::Uint16 => 16,
        Primitive::Int32 | Primitive::Uint32 | Primitive::Float32 => 32,
        _ => 64,
    }
}

/// Decode into `any`: objects become `map[string]any`, numbers `float64`
fn decode_dynamic(json: &Json) -> Value {
    match json {
        Json::Null => Value::nil(Type::any()),
        Json::Bool(value) => Value::bool(*value),
        Json::Number(number) => Value::float64(number.as_f64().unwrap_or_default()),
        Json::String(value) => Value::string(value.clone()),
        Json::Array(items) => Value::sequence(Type::any(), items.iter().map(decode_dynamic).collect()),
        Json::Object(object) => {
            let entries = object
                .iter()
                .map(|(name, item)| (Value::string(name.clone()), decode_dynamic(item)))
                .collect();
            Value::new(
                Type::mapping(Type::primitive(Primitive::String), Type::interface(MethodSet::new())),
                Data::Mapping(entries),
            )
        }
    }
}

fn mismatch(json: &Json, ty: Type) -> JsonError {
    let found = match json {
        Json::Null => "null".to_string(),
        Json::Bool(_) => "bool".to_string(),
        Json::Number(number) => format!("number {number}"),
        Json::String(_) => "string".to_string(),
        Json::Array(_) => "array".to_string(),
        Json::Object(_) => "object".to_string(),
    };
    JsonError::Mismatch { found, ty }
}
