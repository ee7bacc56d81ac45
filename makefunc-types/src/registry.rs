//! Type registry
//!
//! Maps type names to descriptors so that types can be referred to by name,
//! e.g. from type notation. The prelude holds the predeclared universe plus a
//! handful of well-known capability sets.

use crate::error::RegistryError;
use crate::types::{FunctionType, MethodSet, Primitive, Type};
use indexmap::IndexMap;

/// Name to descriptor table
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, Type>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the predeclared types, `byte`/`rune`/`any`
    /// aliases and the `io` and `fmt` interfaces.
    pub fn with_prelude() -> Self {
        let mut types = IndexMap::new();
        for primitive in Primitive::ALL {
            types.insert(primitive.keyword().to_string(), Type::primitive(primitive));
        }
        types.insert("byte".to_string(), Type::primitive(Primitive::Uint8));
        types.insert("rune".to_string(), Type::primitive(Primitive::Int32));
        types.insert("error".to_string(), Type::error());
        types.insert("any".to_string(), Type::any());

        let int = Type::primitive(Primitive::Int);
        let io_method = FunctionType::new(vec![Type::bytes()], vec![int, Type::error()]);
        let reader = Type::named(
            "io.Reader",
            &Type::interface(MethodSet::new().with("Read", io_method.clone())),
        )
        .build();
        let writer = Type::named(
            "io.Writer",
            &Type::interface(MethodSet::new().with("Write", io_method.clone())),
        )
        .build();
        let read_writer = Type::named(
            "io.ReadWriter",
            &Type::interface(
                MethodSet::new()
                    .with("Read", io_method.clone())
                    .with("Write", io_method),
            ),
        )
        .build();
        let closer = Type::named(
            "io.Closer",
            &Type::interface(
                MethodSet::new().with("Close", FunctionType::new(vec![], vec![Type::error()])),
            ),
        )
        .build();
        let stringer = Type::named(
            "fmt.Stringer",
            &Type::interface(MethodSet::new().with(
                "String",
                FunctionType::new(vec![], vec![Type::primitive(Primitive::String)]),
            )),
        )
        .build();

        for ty in [reader, writer, read_writer, closer, stringer] {
            if let Some(name) = ty.name() {
                types.insert(name.to_string(), ty.clone());
            }
        }

        Self { types }
    }

    /// Register a named type under its own name
    pub fn register(&mut self, ty: Type) -> Result<(), RegistryError> {
        if ty.name().is_none() {
            return Err(RegistryError::Unnamed { ty });
        }
        let name = ty.name().unwrap_or_default().to_string();
        self.alias(name, ty)
    }

    /// Register any type under an alternative name
    pub fn alias(&mut self, name: impl Into<String>, ty: Type) -> Result<(), RegistryError> {
        let name = name.into();
        if self.types.contains_key(&name) {
            return Err(RegistryError::Duplicate { name });
        }
        self.types.insert(name, ty);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names with their descriptors, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.types.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
