// makefunc type notation
// Pest-based parser for Go-style type expressions

pub mod error;
pub mod parser;

pub use error::*;
pub use parser::{NotationParser, Rule};

use makefunc_types::{Type, TypeRegistry};

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

/// Parse a type expression such as `func([]byte, any) error`, resolving
/// names through `registry`.
pub fn parse_type(source: &str, registry: &TypeRegistry) -> NotationResult<Type> {
    NotationParser::parse_type(source, registry)
}
