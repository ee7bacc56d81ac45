//! Type descriptors
//!
//! A [`Type`] is an immutable, reference-counted description of a runtime type.
//! Named types (including the predeclared primitives such as `int`) compare by
//! their qualified name; unnamed types compare structurally, so two separately
//! built `[]string` descriptors are equal.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::fmt;
use std::sync::Arc;

/// Coarse category of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Primitive,
    Pointer,
    Sequence,
    Mapping,
    Channel,
    Function,
    Interface,
    Record,
    Other,
}

impl Kind {
    /// Whether values of this kind may legitimately be nil
    pub fn is_nilable(self) -> bool {
        matches!(
            self,
            Kind::Pointer
                | Kind::Sequence
                | Kind::Mapping
                | Kind::Channel
                | Kind::Function
                | Kind::Interface
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Primitive => "primitive",
            Kind::Pointer => "pointer",
            Kind::Sequence => "sequence",
            Kind::Mapping => "mapping",
            Kind::Channel => "channel",
            Kind::Function => "function",
            Kind::Interface => "interface",
            Kind::Record => "record",
            Kind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Predeclared scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    String,
}

impl Primitive {
    pub const ALL: [Primitive; 15] = [
        Primitive::Bool,
        Primitive::Int,
        Primitive::Int8,
        Primitive::Int16,
        Primitive::Int32,
        Primitive::Int64,
        Primitive::Uint,
        Primitive::Uint8,
        Primitive::Uint16,
        Primitive::Uint32,
        Primitive::Uint64,
        Primitive::Uintptr,
        Primitive::Float32,
        Primitive::Float64,
        Primitive::String,
    ];

    /// The predeclared name of this primitive
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Int8 => "int8",
            Primitive::Int16 => "int16",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Uint => "uint",
            Primitive::Uint8 => "uint8",
            Primitive::Uint16 => "uint16",
            Primitive::Uint32 => "uint32",
            Primitive::Uint64 => "uint64",
            Primitive::Uintptr => "uintptr",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::String => "string",
        }
    }

    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Primitive::Int | Primitive::Int8 | Primitive::Int16 | Primitive::Int32 | Primitive::Int64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Primitive::Uint
                | Primitive::Uint8
                | Primitive::Uint16
                | Primitive::Uint32
                | Primitive::Uint64
                | Primitive::Uintptr
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Primitive::Float32 | Primitive::Float64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }
}

/// Direction of a channel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Recv,
    Send,
}

/// A named field of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Declared signature of a callable: parameters, results and variadic flag.
///
/// When `variadic` is set the last parameter is consumed as a variable-length
/// tail. Its declared type is expected to be a sequence; the validator reports
/// descriptors that break that rule instead of rejecting them here.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    params: Vec<Type>,
    results: Vec<Type>,
    variadic: bool,
}

impl FunctionType {
    pub fn new(params: Vec<Type>, results: Vec<Type>) -> Self {
        Self {
            params,
            results,
            variadic: false,
        }
    }

    /// Create a variadic signature. A signature without parameters has no tail
    /// to consume, so it is never marked variadic.
    pub fn variadic(params: Vec<Type>, results: Vec<Type>) -> Self {
        let variadic = !params.is_empty();
        Self {
            params,
            results,
            variadic,
        }
    }

    pub fn params(&self) -> &[Type] {
        &self.params
    }

    pub fn results(&self) -> &[Type] {
        &self.results
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Parameters that take exactly one argument each
    pub fn fixed_params(&self) -> &[Type] {
        match self.variadic_param() {
            Some(_) => &self.params[..self.params.len() - 1],
            None => &self.params,
        }
    }

    /// The trailing parameter consumed as a variable-length tail
    pub fn variadic_param(&self) -> Option<&Type> {
        if self.variadic {
            self.params.last()
        } else {
            None
        }
    }

    /// Declared type of the argument at `index`, resolving tail positions to
    /// the element type of the variadic parameter.
    pub fn param_for_argument(&self, index: usize) -> Option<&Type> {
        let fixed = self.fixed_params();
        if let Some(ty) = fixed.get(index) {
            return Some(ty);
        }
        match self.variadic_param()?.underlying() {
            Underlying::Sequence(elem) => Some(elem),
            _ => None,
        }
    }

    fn write_signature(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        let last = self.params.len().saturating_sub(1);
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            match (self.variadic && index == last, param.underlying()) {
                (true, Underlying::Sequence(elem)) => write!(f, "...{elem}")?,
                _ => write!(f, "{param}")?,
            }
        }
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " {single}"),
            many => {
                f.write_str(" (")?;
                for (index, result) in many.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{result}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("func")?;
        self.write_signature(f)
    }
}

/// An ordered set of method signatures keyed by method name.
///
/// Used both for the capability set of an interface type and for the methods
/// attached to a named type. Equality ignores declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodSet(IndexMap<String, FunctionType>);

impl MethodSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with(mut self, name: impl Into<String>, signature: FunctionType) -> Self {
        self.insert(name, signature);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, signature: FunctionType) -> Option<FunctionType> {
        self.0.insert(name.into(), signature)
    }

    pub fn get(&self, name: &str) -> Option<&FunctionType> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FunctionType)> {
        self.0.iter().map(|(name, sig)| (name.as_str(), sig))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Methods in name order, the order used for display
    pub fn sorted(&self) -> Vec<(&str, &FunctionType)> {
        let mut methods: Vec<_> = self.iter().collect();
        methods.sort_by(|a, b| a.0.cmp(b.0));
        methods
    }
}

/// Structural description of a type, shared by a named type and its underlying
/// unnamed form.
#[derive(Debug, Clone, PartialEq)]
pub enum Underlying {
    Primitive(Primitive),
    Pointer(Type),
    Sequence(Type),
    Mapping { key: Type, value: Type },
    Channel { dir: ChanDir, elem: Type },
    Function(FunctionType),
    /// Capability set: the methods a type must expose to satisfy the interface
    Interface(MethodSet),
    Record(Vec<Field>),
    /// Anything this model does not describe structurally, identified by label
    Other(String),
}

impl Underlying {
    pub fn kind(&self) -> Kind {
        match self {
            Underlying::Primitive(_) => Kind::Primitive,
            Underlying::Pointer(_) => Kind::Pointer,
            Underlying::Sequence(_) => Kind::Sequence,
            Underlying::Mapping { .. } => Kind::Mapping,
            Underlying::Channel { .. } => Kind::Channel,
            Underlying::Function(_) => Kind::Function,
            Underlying::Interface(_) => Kind::Interface,
            Underlying::Record(_) => Kind::Record,
            Underlying::Other(_) => Kind::Other,
        }
    }
}

impl fmt::Display for Underlying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Underlying::Primitive(primitive) => f.write_str(primitive.keyword()),
            Underlying::Pointer(target) => write!(f, "*{target}"),
            Underlying::Sequence(elem) => write!(f, "[]{elem}"),
            Underlying::Mapping { key, value } => write!(f, "map[{key}]{value}"),
            Underlying::Channel { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
            },
            Underlying::Function(signature) => write!(f, "{signature}"),
            Underlying::Interface(methods) => {
                if methods.is_empty() {
                    return f.write_str("interface {}");
                }
                f.write_str("interface { ")?;
                for (index, (name, signature)) in methods.sorted().into_iter().enumerate() {
                    if index > 0 {
                        f.write_str("; ")?;
                    }
                    f.write_str(name)?;
                    signature.write_signature(f)?;
                }
                f.write_str(" }")
            }
            Underlying::Record(fields) => {
                if fields.is_empty() {
                    return f.write_str("struct {}");
                }
                f.write_str("struct { ")?;
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                }
                f.write_str(" }")
            }
            Underlying::Other(label) => f.write_str(label),
        }
    }
}

#[derive(Debug)]
struct TypeDef {
    name: Option<String>,
    underlying: Underlying,
    methods: MethodSet,
    pointer_methods: MethodSet,
}

/// Immutable runtime type descriptor
#[derive(Clone)]
pub struct Type(Arc<TypeDef>);

lazy_static! {
    static ref ERROR_TYPE: Type = Type::named(
        "error",
        &Type::interface(MethodSet::new().with(
            "Error",
            FunctionType::new(vec![], vec![Type::primitive(Primitive::String)]),
        )),
    )
    .build();
    static ref ANY_TYPE: Type = Type::interface(MethodSet::new());
}

impl Type {
    fn unnamed(underlying: Underlying) -> Self {
        Self(Arc::new(TypeDef {
            name: None,
            underlying,
            methods: MethodSet::new(),
            pointer_methods: MethodSet::new(),
        }))
    }

    /// The predeclared (named) primitive type
    pub fn primitive(primitive: Primitive) -> Self {
        Self(Arc::new(TypeDef {
            name: Some(primitive.keyword().to_string()),
            underlying: Underlying::Primitive(primitive),
            methods: MethodSet::new(),
            pointer_methods: MethodSet::new(),
        }))
    }

    pub fn pointer_to(target: Type) -> Self {
        Self::unnamed(Underlying::Pointer(target))
    }

    pub fn sequence_of(elem: Type) -> Self {
        Self::unnamed(Underlying::Sequence(elem))
    }

    pub fn mapping(key: Type, value: Type) -> Self {
        Self::unnamed(Underlying::Mapping { key, value })
    }

    pub fn channel(dir: ChanDir, elem: Type) -> Self {
        Self::unnamed(Underlying::Channel { dir, elem })
    }

    pub fn function(signature: FunctionType) -> Self {
        Self::unnamed(Underlying::Function(signature))
    }

    pub fn interface(methods: MethodSet) -> Self {
        Self::unnamed(Underlying::Interface(methods))
    }

    pub fn record(fields: Vec<Field>) -> Self {
        Self::unnamed(Underlying::Record(fields))
    }

    pub fn other(label: impl Into<String>) -> Self {
        Self::unnamed(Underlying::Other(label.into()))
    }

    /// The predeclared `error` interface: `interface { Error() string }`
    pub fn error() -> Self {
        ERROR_TYPE.clone()
    }

    /// The empty interface, satisfied by every type
    pub fn any() -> Self {
        ANY_TYPE.clone()
    }

    /// `[]uint8`, the usual byte buffer type
    pub fn bytes() -> Self {
        Self::sequence_of(Self::primitive(Primitive::Uint8))
    }

    /// Start declaring a named type over the underlying type of `underlying`
    pub fn named(name: impl Into<String>, underlying: &Type) -> TypeBuilder {
        TypeBuilder {
            name: name.into(),
            underlying: underlying.underlying().clone(),
            methods: MethodSet::new(),
            pointer_methods: MethodSet::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn kind(&self) -> Kind {
        self.0.underlying.kind()
    }

    pub fn underlying(&self) -> &Underlying {
        &self.0.underlying
    }

    pub fn is_nilable(&self) -> bool {
        self.kind().is_nilable()
    }

    /// Element type of pointers, sequences, channels, and the value type of mappings
    pub fn elem(&self) -> Option<&Type> {
        match &self.0.underlying {
            Underlying::Pointer(elem)
            | Underlying::Sequence(elem)
            | Underlying::Channel { elem, .. }
            | Underlying::Mapping { value: elem, .. } => Some(elem),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match &self.0.underlying {
            Underlying::Function(signature) => Some(signature),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&MethodSet> {
        match &self.0.underlying {
            Underlying::Interface(methods) => Some(methods),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match &self.0.underlying {
            Underlying::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Named non-interface, non-pointer types can carry methods
    fn can_carry_methods(&self) -> bool {
        self.name().is_some() && !matches!(self.kind(), Kind::Interface | Kind::Pointer)
    }

    /// Look up a method in this type's method set.
    ///
    /// Interfaces expose their capability set. A pointer to a named type `T`
    /// exposes the methods of `T` plus the pointer methods of `T`.
    pub fn method(&self, name: &str) -> Option<&FunctionType> {
        match &self.0.underlying {
            Underlying::Interface(methods) => methods.get(name),
            Underlying::Pointer(target) if target.can_carry_methods() => target
                .0
                .methods
                .get(name)
                .or_else(|| target.0.pointer_methods.get(name)),
            _ => self.0.methods.get(name),
        }
    }

    /// The full method set, in name order
    pub fn methods(&self) -> Vec<(&str, &FunctionType)> {
        let mut methods: Vec<(&str, &FunctionType)> = match &self.0.underlying {
            Underlying::Interface(set) => set.iter().collect(),
            Underlying::Pointer(target) if target.can_carry_methods() => target
                .0
                .methods
                .iter()
                .chain(target.0.pointer_methods.iter())
                .collect(),
            _ => self.0.methods.iter().collect(),
        };
        methods.sort_by(|a, b| a.0.cmp(b.0));
        methods
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (&self.0.name, &other.0.name) {
            // same name over a different underlying is another definition
            (Some(a), Some(b)) => a == b && self.0.underlying == other.0.underlying,
            (None, None) => self.0.underlying == other.0.underlying,
            _ => false,
        }
    }
}

impl Eq for Type {}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.name {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0.underlying),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Type").field(&format_args!("{self}")).finish()
    }
}

/// Declares a named type together with its methods
#[derive(Debug)]
pub struct TypeBuilder {
    name: String,
    underlying: Underlying,
    methods: MethodSet,
    pointer_methods: MethodSet,
}

impl TypeBuilder {
    /// Add a method with a value receiver (in the method set of `T` and `*T`)
    pub fn method(mut self, name: impl Into<String>, signature: FunctionType) -> Self {
        self.methods.insert(name, signature);
        self
    }

    /// Add a method with a pointer receiver (in the method set of `*T` only)
    pub fn pointer_method(mut self, name: impl Into<String>, signature: FunctionType) -> Self {
        self.pointer_methods.insert(name, signature);
        self
    }

    pub fn build(self) -> Type {
        Type(Arc::new(TypeDef {
            name: Some(self.name),
            underlying: self.underlying,
            methods: self.methods,
            pointer_methods: self.pointer_methods,
        }))
    }
}
