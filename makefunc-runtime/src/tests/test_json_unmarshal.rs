//! Tests for the JSON decoding builtin

use super::{int, key_record, string};
use crate::builtins::json_unmarshal;
use crate::{make_invocation, CallFailure, Value};
use makefunc_types::{Field, Type};
use pretty_assertions::assert_eq;

fn unmarshal(json: &str, target: &Value) -> Result<(), CallFailure> {
    make_invocation(
        &json_unmarshal(),
        &[Type::error()],
        vec![Value::bytes(json.as_bytes()).into(), target.clone().into()],
    )
    .unwrap()
    .invoke()
}

fn pointee(target: &Value) -> Value {
    target.as_pointer().unwrap().read().clone()
}

#[test]
fn test_exact_field_name_wins() {
    let ty = Type::record(vec![Field::new("key", string()), Field::new("Key", string())]);
    let target = Value::pointer_to(Value::zero(&ty));
    unmarshal(r#"{"Key": "upper"}"#, &target).unwrap();
    let decoded = pointee(&target);
    assert_eq!(decoded.field("Key").and_then(Value::as_str), Some("upper"));
    assert_eq!(decoded.field("key").and_then(Value::as_str), Some(""));
}

#[test]
fn test_unmentioned_fields_are_kept() {
    let ty = Type::record(vec![Field::new("Key", string()), Field::new("Count", int())]);
    let target = Value::pointer_to(Value::record(
        ty,
        vec![Value::string("old"), Value::int(4)],
    ));
    unmarshal(r#"{"count": 9, "unknown": true}"#, &target).unwrap();
    assert_eq!(pointee(&target).to_string(), "{old 9}");
}

#[test]
fn test_nested_pointer_and_sequence() {
    let ty = Type::record(vec![
        Field::new("Inner", Type::pointer_to(key_record())),
        Field::new("Tags", Type::sequence_of(string())),
    ]);
    let target = Value::pointer_to(Value::zero(&ty));
    unmarshal(r#"{"inner": {"key": "deep"}, "tags": ["a", "b"]}"#, &target).unwrap();
    assert_eq!(pointee(&target).to_string(), "{&{deep} [a b]}");
}

#[test]
fn test_decode_into_any() {
    let target = Value::pointer_to(Value::nil(Type::any()));
    unmarshal(r#"{"n": 1.5}"#, &target).unwrap();
    assert_eq!(pointee(&target).to_string(), "map[n:1.5]");
}

#[test]
fn test_type_mismatch_is_a_failure() {
    let target = Value::pointer_to(Value::zero(&key_record()));
    let failure = unmarshal(r#"{"key": 12}"#, &target).unwrap_err();
    assert_eq!(
        failure.message(),
        "json: cannot unmarshal number 12 into Go value of type string"
    );
}

#[test]
fn test_integer_overflow_is_a_failure() {
    let int8 = Type::primitive(makefunc_types::Primitive::Int8);
    let target = Value::pointer_to(Value::zero(&int8));
    assert!(unmarshal("127", &target).is_ok());
    assert!(unmarshal("128", &target).is_err());
}

#[test]
fn test_non_pointer_target_is_a_failure() {
    let failure = unmarshal("{}", &Value::zero(&key_record())).unwrap_err();
    assert_eq!(
        failure.message(),
        "json: Unmarshal(non-pointer struct { Key string })"
    );
}

#[test]
fn test_nil_pointer_target_is_a_failure() {
    let ty = Type::pointer_to(key_record());
    let failure = unmarshal("{}", &Value::nil(ty)).unwrap_err();
    assert_eq!(
        failure.message(),
        "json: Unmarshal(nil *struct { Key string })"
    );
}

#[test]
fn test_malformed_input_is_a_failure() {
    let target = Value::pointer_to(Value::zero(&key_record()));
    assert!(unmarshal("{", &target).is_err());
}
