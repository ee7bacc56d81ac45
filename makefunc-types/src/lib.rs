//! makefunc type layer
//!
//! Runtime type descriptors plus the two checks everything else is built on:
//!
//! - **Compatibility**: may a value of one type occupy a slot declared with
//!   another? Interfaces match structurally on method sets; concrete types
//!   must be assignable; untyped nil fits any nilable kind.
//! - **Signature validation**: does a callable's declared signature accept a
//!   given argument list and produce exactly the declared result types,
//!   including variadic tails?
//!
//! Nothing here performs I/O or holds shared state; all checks are pure.

pub mod compat;
pub mod error;
pub mod registry;
pub mod signature;
pub mod types;

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

// Re-export public API
pub use compat::{assignable_to, check_compatibility, convertible_to, implements, missing_methods};
pub use error::{CompatibilityError, RegistryError, SignatureError};
pub use registry::TypeRegistry;
pub use signature::{validate_signature, Actual};
pub use types::{
    ChanDir, Field, FunctionType, Kind, MethodSet, Primitive, Type, TypeBuilder, Underlying,
};
