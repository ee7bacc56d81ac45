//! Parsing well-formed type notation

use crate::parse_type;
use makefunc_types::{
    check_compatibility, ChanDir, Field, FunctionType, Kind, MethodSet, Primitive, Type,
    TypeRegistry,
};
use pretty_assertions::assert_eq;

fn parse(source: &str) -> Type {
    parse_type(source, &TypeRegistry::with_prelude()).unwrap()
}

#[test]
fn test_predeclared_names() {
    assert_eq!(parse("int"), Type::primitive(Primitive::Int));
    assert_eq!(parse("byte"), Type::primitive(Primitive::Uint8));
    assert_eq!(parse("error"), Type::error());
    assert_eq!(parse("any"), Type::any());
    assert_eq!(parse("io.Reader").name(), Some("io.Reader"));
}

#[test]
fn test_composite_types() {
    let int = Type::primitive(Primitive::Int);
    let string = Type::primitive(Primitive::String);

    assert_eq!(parse("*int"), Type::pointer_to(int.clone()));
    assert_eq!(parse("[]byte"), Type::bytes());
    assert_eq!(parse("[][]string"), Type::sequence_of(Type::sequence_of(string.clone())));
    assert_eq!(parse("map[string]int"), Type::mapping(string.clone(), int.clone()));
    assert_eq!(parse("chan int"), Type::channel(ChanDir::Both, int.clone()));
    assert_eq!(parse("<-chan int"), Type::channel(ChanDir::Recv, int.clone()));
    assert_eq!(parse("chan<- int"), Type::channel(ChanDir::Send, int.clone()));
    assert_eq!(
        parse("struct { Key string; Count int }"),
        Type::record(vec![Field::new("Key", string), Field::new("Count", int)])
    );
    assert_eq!(parse("struct {}"), Type::record(vec![]));
    assert_eq!(parse("interface {}"), Type::any());
}

#[test]
fn test_function_types() {
    let unmarshal = parse("func([]byte, any) error");
    assert_eq!(
        unmarshal,
        Type::function(FunctionType::new(
            vec![Type::bytes(), Type::any()],
            vec![Type::error()]
        ))
    );

    let variadic = parse("func(string, ...int) error");
    let signature = variadic.as_function().unwrap();
    assert!(signature.is_variadic());
    assert_eq!(
        signature.variadic_param(),
        Some(&Type::sequence_of(Type::primitive(Primitive::Int)))
    );
    assert_eq!(variadic.to_string(), "func(string, ...int) error");

    let multi = parse("func() (int, error)");
    assert_eq!(multi.as_function().unwrap().results().len(), 2);
    assert_eq!(parse("func()").as_function().unwrap().results().len(), 0);
    assert_eq!(parse("func(func() error, int)").kind(), Kind::Function);
}

#[test]
fn test_interface_types_match_prelude() {
    let read_writer =
        parse("interface { Read([]byte) (int, error); Write([]byte) (int, error) }");
    assert_eq!(read_writer.as_interface().map(MethodSet::len), Some(2));

    let reader = parse("io.Reader");
    assert!(check_compatibility(&reader, Some(&read_writer)).is_ok());
    assert!(check_compatibility(&read_writer, Some(&reader)).is_err());
}

#[test]
fn test_display_round_trips_through_parser() {
    let source = "func(*struct { Key string }, ...map[string][]int) (int, error)";
    let ty = parse(source);
    assert_eq!(ty.to_string(), source);
    assert_eq!(parse(&ty.to_string()), ty);
}

#[test]
fn test_registered_names_resolve() {
    let mut registry = TypeRegistry::with_prelude();
    let meters = Type::named("units.Meters", &Type::primitive(Primitive::Float64)).build();
    registry.register(meters.clone()).unwrap();
    assert_eq!(
        parse_type("[]units.Meters", &registry).unwrap(),
        Type::sequence_of(meters)
    );
}

#[test]
fn test_channels_nested_in_other_forms() {
    let int = Type::primitive(Primitive::Int);
    let string = Type::primitive(Primitive::String);

    assert_eq!(
        parse("func(chan int) error"),
        Type::function(FunctionType::new(
            vec![Type::channel(ChanDir::Both, int.clone())],
            vec![Type::error()]
        ))
    );
    assert_eq!(
        parse("[]<-chan string"),
        Type::sequence_of(Type::channel(ChanDir::Recv, string.clone()))
    );
    assert_eq!(
        parse("map[string]chan   int"),
        Type::mapping(string, Type::channel(ChanDir::Both, int.clone()))
    );
    assert_eq!(
        parse("chan chan<- int"),
        Type::channel(ChanDir::Both, Type::channel(ChanDir::Send, int))
    );
}

#[test]
fn test_names_starting_with_keywords() {
    let mut registry = TypeRegistry::with_prelude();
    let int = Type::primitive(Primitive::Int);
    for name in ["mapper", "channel", "funcs", "structure", "interfaces"] {
        registry.alias(name, int.clone()).unwrap();
    }
    for name in ["mapper", "channel", "funcs", "structure", "interfaces"] {
        assert_eq!(parse_type(name, &registry).unwrap(), int);
    }
    assert_eq!(
        parse_type("chan channel", &registry).unwrap(),
        Type::channel(ChanDir::Both, int)
    );
}
