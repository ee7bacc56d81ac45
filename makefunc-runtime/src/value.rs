//! Runtime value representation.
//!
//! Every [`Value`] carries the [`Type`] it was created with. Pointer values
//! share their target, so a callable that writes through a pointer argument is
//! observed by whoever else holds that pointer.

use crate::callable::Callable;
use lazy_static::lazy_static;
use makefunc_types::{Actual, FunctionType, Kind, Primitive, Type, Underlying};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Shared, mutable target of a pointer value
pub type Shared = Arc<RwLock<Value>>;

/// Payload of a runtime value
#[derive(Clone)]
pub enum Data {
    /// Nil pointer, sequence, mapping, channel, function or interface
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    Sequence(Vec<Value>),
    Mapping(Vec<(Value, Value)>),
    Pointer(Shared),
    Record(Vec<Value>),
    Function(Arc<dyn Callable>),
    /// A native Rust error surfaced as an `error` value
    Failure(Arc<dyn std::error::Error + Send + Sync>),
}

/// A typed runtime value
#[derive(Clone)]
pub struct Value {
    ty: Type,
    data: Data,
}

lazy_static! {
    static ref NATIVE_ERROR: Type = Type::pointer_to(
        Type::named("makefunc.nativeError", &Type::record(vec![]))
            .pointer_method(
                "Error",
                FunctionType::new(vec![], vec![Type::primitive(Primitive::String)]),
            )
            .build(),
    );
}

/// Type of the values created by [`Value::error`]; it implements `error`
pub fn native_error_type() -> Type {
    NATIVE_ERROR.clone()
}

impl Value {
    /// Pair a payload with its type. The caller is responsible for the two agreeing.
    pub fn new(ty: Type, data: Data) -> Self {
        Self { ty, data }
    }

    pub fn nil(ty: Type) -> Self {
        Self::new(ty, Data::Nil)
    }

    /// The zero value of `ty`: false, 0, "", nil, or a record of zero fields
    pub fn zero(ty: &Type) -> Self {
        let data = match ty.underlying() {
            Underlying::Primitive(Primitive::Bool) => Data::Bool(false),
            Underlying::Primitive(Primitive::String) => Data::Str(String::new()),
            Underlying::Primitive(p) if p.is_float() => Data::Float(0.0),
            Underlying::Primitive(p) if p.is_unsigned() => Data::Uint(0),
            Underlying::Primitive(_) => Data::Int(0),
            Underlying::Record(fields) => {
                Data::Record(fields.iter().map(|field| Value::zero(&field.ty)).collect())
            }
            _ => Data::Nil,
        };
        Self::new(ty.clone(), data)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(Type::primitive(Primitive::Bool), Data::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        Self::new(Type::primitive(Primitive::Int), Data::Int(value))
    }

    pub fn float64(value: f64) -> Self {
        Self::new(Type::primitive(Primitive::Float64), Data::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Type::primitive(Primitive::String), Data::Str(value.into()))
    }

    /// A `[]uint8` holding `bytes`
    pub fn bytes(bytes: &[u8]) -> Self {
        let byte = Type::primitive(Primitive::Uint8);
        let items = bytes
            .iter()
            .map(|b| Value::new(byte.clone(), Data::Uint(u64::from(*b))))
            .collect();
        Self::new(Type::bytes(), Data::Sequence(items))
    }

    pub fn sequence(elem: Type, items: Vec<Value>) -> Self {
        Self::new(Type::sequence_of(elem), Data::Sequence(items))
    }

    /// A record of type `ty` with field values in declaration order
    pub fn record(ty: Type, fields: Vec<Value>) -> Self {
        Self::new(ty, Data::Record(fields))
    }

    /// A fresh pointer to `target`
    pub fn pointer_to(target: Value) -> Self {
        Self::new(
            Type::pointer_to(target.ty.clone()),
            Data::Pointer(Arc::new(RwLock::new(target))),
        )
    }

    /// Wrap a callable as a function value of its declared type
    pub fn function(callable: impl Callable + 'static) -> Self {
        Self::from_callable(Arc::new(callable))
    }

    pub fn from_callable(callable: Arc<dyn Callable>) -> Self {
        Self::new(callable.ty().clone(), Data::Function(callable))
    }

    /// A non-nil `error` value carrying a native error
    pub fn error(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::new(native_error_type(), Data::Failure(Arc::from(error.into())))
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn kind(&self) -> Kind {
        self.ty.kind()
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Nil values of nilable types, including typed nil pointers
    pub fn is_nil(&self) -> bool {
        matches!(self.data, Data::Nil) && self.ty.is_nilable()
    }

    /// How the validator sees this value. A nil interface value has no
    /// dynamic type, so it counts as untyped nil.
    pub fn actual(&self) -> Actual<'_> {
        if self.kind() == Kind::Interface && matches!(self.data, Data::Nil) {
            Actual::UntypedNil
        } else {
            Actual::Typed(&self.ty)
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            Data::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.data {
            Data::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            Data::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Contents of a byte sequence
    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        match &self.data {
            Data::Sequence(items) => items
                .iter()
                .map(|item| match item.data {
                    Data::Uint(b) => u8::try_from(b).ok(),
                    _ => None,
                })
                .collect(),
            Data::Nil if self.kind() == Kind::Sequence => Some(Vec::new()),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<&Shared> {
        match &self.data {
            Data::Pointer(target) => Some(target),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Arc<dyn Callable>> {
        match &self.data {
            Data::Function(callable) => Some(callable),
            _ => None,
        }
    }

    /// Field of a record value by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        let index = self.ty.fields()?.iter().position(|field| field.name == name)?;
        match &self.data {
            Data::Record(values) => values.get(index),
            _ => None,
        }
    }

    /// The message an `error` value reports
    pub fn error_message(&self) -> String {
        match &self.data {
            Data::Failure(error) => error.to_string(),
            _ => self.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.data == other.data
    }
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Data::Nil, Data::Nil) => true,
            (Data::Bool(a), Data::Bool(b)) => a == b,
            (Data::Int(a), Data::Int(b)) => a == b,
            (Data::Uint(a), Data::Uint(b)) => a == b,
            (Data::Float(a), Data::Float(b)) => a == b,
            (Data::Str(a), Data::Str(b)) => a == b,
            (Data::Sequence(a), Data::Sequence(b)) => a == b,
            (Data::Mapping(a), Data::Mapping(b)) => a == b,
            (Data::Record(a), Data::Record(b)) => a == b,
            // reference kinds compare by identity
            (Data::Pointer(a), Data::Pointer(b)) => Arc::ptr_eq(a, b),
            (Data::Function(a), Data::Function(b)) => Arc::ptr_eq(a, b),
            (Data::Failure(a), Data::Failure(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Data::Nil => f.write_str("<nil>"),
            Data::Bool(value) => write!(f, "{value}"),
            Data::Int(value) => write!(f, "{value}"),
            Data::Uint(value) => write!(f, "{value}"),
            Data::Float(value) => write!(f, "{value}"),
            Data::Str(value) => f.write_str(value),
            Data::Sequence(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Data::Mapping(entries) => {
                f.write_str("map[")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                f.write_str("]")
            }
            Data::Pointer(target) => write!(f, "&{}", target.read()),
            Data::Record(fields) => {
                f.write_str("{")?;
                write_joined(f, fields)?;
                f.write_str("}")
            }
            Data::Function(callable) => write!(f, "<func {}>", callable.name()),
            Data::Failure(error) => write!(f, "{error}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({}: {self})", self.ty)
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Nil => f.write_str("Nil"),
            Data::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Data::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Data::Uint(value) => f.debug_tuple("Uint").field(value).finish(),
            Data::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Data::Str(value) => f.debug_tuple("Str").field(value).finish(),
            Data::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Data::Mapping(entries) => f.debug_tuple("Mapping").field(entries).finish(),
            Data::Pointer(target) => f.debug_tuple("Pointer").field(&*target.read()).finish(),
            Data::Record(fields) => f.debug_tuple("Record").field(fields).finish(),
            Data::Function(callable) => f.debug_tuple("Function").field(&callable.name()).finish(),
            Data::Failure(error) => f.debug_tuple("Failure").field(&error.to_string()).finish(),
        }
    }
}
