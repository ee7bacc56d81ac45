//! Tests for signature validation

use super::{func, int, io_interface, some_error, string, variadic};
use crate::{
    validate_signature, Actual, CompatibilityError, FunctionType, Kind, SignatureError, Type,
};
use pretty_assertions::assert_eq;

fn returns_error() -> Vec<Type> {
    vec![Type::error()]
}

fn validate(callable: &Type, args: &[Type]) -> Result<(), SignatureError> {
    let actuals: Vec<Actual<'_>> = args.iter().map(Actual::from).collect();
    validate_signature(callable, &returns_error(), &actuals)
}

#[test]
fn test_valid_functions() {
    assert!(validate(&func(vec![]), &[]).is_ok());
    assert!(validate(&func(vec![string()]), &[string()]).is_ok());
    assert!(validate(&func(vec![string(), int()]), &[string(), int()]).is_ok());
    let strings = Type::sequence_of(string());
    assert!(validate(&func(vec![strings.clone()]), &[strings]).is_ok());
    assert!(validate(&variadic(vec![string(), Type::any()]), &[string(), int()]).is_ok());
    assert!(
        validate(
            &variadic(vec![string(), Type::any()]),
            &[string(), int(), string(), int()]
        )
        .is_ok()
    );
    assert!(validate(&variadic(vec![string(), int()]), &[string(), int(), int(), int()]).is_ok());
}

#[test]
fn test_not_a_function() {
    assert_eq!(
        validate(&int(), &[]),
        Err(SignatureError::NotAFunction {
            kind: Kind::Primitive
        })
    );
    assert_eq!(
        validate(&int(), &[]).unwrap_err().to_string(),
        "invalid object, want function, got primitive"
    );
}

#[test]
fn test_return_arity_and_identity() {
    let no_results = Type::function(FunctionType::new(vec![], vec![]));
    assert_eq!(
        validate(&no_results, &[]),
        Err(SignatureError::ReturnCount {
            declared: 0,
            expected: 1
        })
    );

    let returns_int = Type::function(FunctionType::new(vec![], vec![int()]));
    assert_eq!(
        validate(&returns_int, &[]),
        Err(SignatureError::ReturnType {
            index: 0,
            declared: int(),
            expected: Type::error(),
        })
    );

    // compatible is not enough, results must be identical
    let returns_some_error = Type::function(FunctionType::new(vec![], vec![some_error()]));
    assert!(matches!(
        validate(&returns_some_error, &[]),
        Err(SignatureError::ReturnType { index: 0, .. })
    ));
}

#[test]
fn test_two_results_against_single_outcome() {
    let two = Type::function(FunctionType::new(vec![], vec![int(), Type::error()]));
    let error = validate(&two, &[]).unwrap_err();
    assert_eq!(
        error,
        SignatureError::ReturnCount {
            declared: 2,
            expected: 1
        }
    );
    assert_eq!(
        error.to_string(),
        "wrong number of return values: callable declares 2, caller expects 1"
    );
}

#[test]
fn test_non_variadic_arity() {
    assert_eq!(
        validate(&func(vec![]), &[int()]),
        Err(SignatureError::ParamCount {
            declared: 0,
            got: 1
        })
    );
    assert_eq!(
        validate(&func(vec![int()]), &[]),
        Err(SignatureError::ParamCount {
            declared: 1,
            got: 0
        })
    );
    assert_eq!(
        validate(&func(vec![int()]), &[int(), int(), int()]),
        Err(SignatureError::ParamCount {
            declared: 1,
            got: 3
        })
    );
}

#[test]
fn test_argument_type_mismatch_names_index() {
    let error = validate(&func(vec![int()]), &[string()]).unwrap_err();
    assert_eq!(
        error,
        SignatureError::Incompatible {
            index: 0,
            source: CompatibilityError::NotConvertible {
                want: int(),
                got: string(),
            },
        }
    );
    assert_eq!(
        error.to_string(),
        "incompatible type at index 0: invalid type 'string', it is not convertible to int"
    );
}

#[test]
fn test_variadic_arity() {
    assert_eq!(
        validate(&variadic(vec![string(), string()]), &[]),
        Err(SignatureError::VariadicParamCount { min: 1, got: 0 })
    );
    assert_eq!(
        validate(&variadic(vec![string(), string(), string()]), &[string()]),
        Err(SignatureError::VariadicParamCount { min: 2, got: 1 })
    );
    // zero tail arguments are fine
    assert!(validate(&variadic(vec![string(), string()]), &[string()]).is_ok());
    assert!(validate(&variadic(vec![int()]), &[]).is_ok());
}

#[test]
fn test_variadic_type_mismatch() {
    assert!(matches!(
        validate(&variadic(vec![int()]), &[string()]),
        Err(SignatureError::Incompatible { index: 0, .. })
    ));
    assert!(matches!(
        validate(&variadic(vec![int(), int()]), &[string()]),
        Err(SignatureError::Incompatible { index: 0, .. })
    ));
    // the offending tail argument is reported by its position in the argument list
    assert!(matches!(
        validate(&variadic(vec![string(), int()]), &[string(), int(), string()]),
        Err(SignatureError::Incompatible { index: 2, .. })
    ));
}

#[test]
fn test_variadic_interface_mismatch() {
    assert!(matches!(
        validate(&variadic(vec![Type::error()]), &[int()]),
        Err(SignatureError::Incompatible {
            index: 0,
            source: CompatibilityError::NotImplementing { .. }
        })
    ));
    assert!(matches!(
        validate(&variadic(vec![io_interface(&["Read"])]), &[int()]),
        Err(SignatureError::Incompatible {
            index: 0,
            source: CompatibilityError::NotImplementing { .. }
        })
    ));
}

#[test]
fn test_variadic_tail_must_be_sequence() {
    let broken = Type::function(FunctionType::variadic(vec![int()], returns_error()));
    assert_eq!(
        validate(&broken, &[int()]),
        Err(SignatureError::VariadicNotSequence { declared: int() })
    );
}

#[test]
fn test_untyped_nil_and_absent_arguments() {
    let callable = variadic(vec![Type::error(), Type::error()]);
    assert!(validate_signature(&callable, &returns_error(), &[Actual::UntypedNil]).is_ok());

    let takes_int = func(vec![int()]);
    assert!(matches!(
        validate_signature(&takes_int, &returns_error(), &[Actual::UntypedNil]),
        Err(SignatureError::Incompatible {
            index: 0,
            source: CompatibilityError::NotNilable { .. }
        })
    ));
    // an omitted argument takes the declared zero value, so any slot accepts it
    assert!(validate_signature(&takes_int, &returns_error(), &[Actual::Absent]).is_ok());
}

#[test]
fn test_typed_nil_outcome_in_variadic_signature() {
    let callable = variadic(vec![Type::error(), Type::error()]);
    assert!(validate(&callable, &[Type::pointer_to(some_error())]).is_ok());
}

#[test]
fn test_validation_is_idempotent() {
    let callable = variadic(vec![string(), int()]);
    let args = [string(), int(), string()];
    let first = validate(&callable, &args);
    let second = validate(&callable, &args);
    assert_eq!(first, second);
    assert!(first.is_err());
}
