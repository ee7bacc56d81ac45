//! Error types for compatibility checking and signature validation
//!
//! Messages are developer-facing. Each names the rule that was violated and
//! the declared and actual types involved.

use crate::types::{Kind, Type};
use miette::Diagnostic;
use thiserror::Error;

/// A single (declared, actual) type pair is incompatible
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CompatibilityError {
    #[error("incompatible types: got untyped nil but {want} is not nilable")]
    #[diagnostic(
        code(makefunc::compat::not_nilable),
        help("Only pointer, sequence, mapping, channel, function and interface types accept nil")
    )]
    NotNilable { want: Type },

    #[error("invalid type '{got}', does not implement '{want}' (missing {})", .missing.join(", "))]
    #[diagnostic(
        code(makefunc::compat::not_implementing),
        help("The actual type must expose every method of the interface with an identical signature")
    )]
    NotImplementing {
        want: Type,
        got: Type,
        missing: Vec<String>,
    },

    #[error("invalid type '{got}', it is not convertible to {want}")]
    #[diagnostic(
        code(makefunc::compat::not_convertible),
        help("Pass a value of the declared type")
    )]
    NotConvertible { want: Type, got: Type },

    #[error("invalid type '{got}', it is not assignable to {want}")]
    #[diagnostic(
        code(makefunc::compat::not_assignable),
        help("The value is convertible but calls do not convert; pass a value of the declared type")
    )]
    NotAssignable { want: Type, got: Type },
}

/// A callable signature does not accept the declared returns or arguments
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SignatureError {
    #[error("invalid object, want {}, got {kind}", Kind::Function)]
    #[diagnostic(
        code(makefunc::signature::not_a_function),
        help("Only values of function type can be validated or invoked")
    )]
    NotAFunction { kind: Kind },

    #[error("wrong number of return values: callable declares {declared}, caller expects {expected}")]
    #[diagnostic(
        code(makefunc::signature::return_count),
        help("The declared return list must match the callable's results one to one")
    )]
    ReturnCount { declared: usize, expected: usize },

    #[error("invalid return value at index {index}: callable declares {declared}, caller expects {expected}")]
    #[diagnostic(
        code(makefunc::signature::return_type),
        help("Return types must be identical, compatibility is not enough")
    )]
    ReturnType {
        index: usize,
        declared: Type,
        expected: Type,
    },

    #[error("wrong number of parameters, want {declared}, got {got}")]
    #[diagnostic(code(makefunc::signature::param_count))]
    ParamCount { declared: usize, got: usize },

    #[error("wrong number of parameters for variadic function, want at least {min}, got {got}")]
    #[diagnostic(code(makefunc::signature::variadic_param_count))]
    VariadicParamCount { min: usize, got: usize },

    #[error("invalid kind of variadic parameter: want {}, got {} ({declared})", Kind::Sequence, .declared.kind())]
    #[diagnostic(
        code(makefunc::signature::variadic_not_sequence),
        help("A variadic tail is always declared as a sequence type")
    )]
    VariadicNotSequence { declared: Type },

    #[error("incompatible type at index {index}: {source}")]
    #[diagnostic(code(makefunc::signature::incompatible))]
    Incompatible {
        index: usize,
        source: CompatibilityError,
    },
}

/// Type registry errors
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("type `{name}` is already registered")]
    #[diagnostic(
        code(makefunc::registry::duplicate),
        help("Each qualified name can only be registered once")
    )]
    Duplicate { name: String },

    #[error("cannot register unnamed type {ty}")]
    #[diagnostic(
        code(makefunc::registry::unnamed),
        help("Declare the type with Type::named or register it under an alias")
    )]
    Unnamed { ty: Type },
}
