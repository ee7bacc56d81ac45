use clap::{Parser, Subcommand};
use makefunc_notation::parse_type;
use makefunc_runtime::builtins;
use makefunc_runtime::{Argument, Value, make_invocation};
use makefunc_types::{Actual, Field, Primitive, Type, TypeRegistry, check_compatibility, validate_signature};
use miette::{MietteHandlerOpts, Report, Result};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "makefunc",
    version,
    about = "Check Go-style type compatibility and validate callable signatures",
    long_about = "makefunc validates a callable against declared return types and actual \
                  argument types, then binds it into a zero-argument invocation."
)]
struct Cli {
    /// Log validation and invocation decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a value of type GOT may occupy a slot declared as WANT
    Check {
        /// Declared type, e.g. 'io.Reader'
        want: String,

        /// Actual type, or 'nil' for an untyped nil
        got: String,
    },

    /// Validate a function type against declared returns and argument types
    Validate {
        /// Function type, e.g. 'func(string, ...int) error'
        function: String,

        /// Declared return types
        #[arg(short, long = "returns", value_name = "TYPE", default_values_t = vec!["error".to_string()])]
        returns: Vec<String>,

        /// Argument types; 'nil' is an untyped nil and '_' an absent argument
        #[arg(value_name = "ARG", allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List the registered type names
    Types,

    /// Run the builtin callables through bound invocations
    Demo,
}

fn main() {
    setup_miette_handler();

    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let result = match cli.command {
        Some(Commands::Check { want, got }) => handle_check(&want, &got),
        Some(Commands::Validate {
            function,
            returns,
            args,
        }) => handle_validate(&function, &returns, &args),
        Some(Commands::Types) => {
            handle_types();
            Ok(())
        }
        Some(Commands::Demo) => handle_demo(),
        None => {
            // No subcommand provided, show help
            Cli::parse_from(["makefunc", "--help"]);
            Ok(())
        }
    };

    if let Err(error) = result {
        eprintln!("{error:?}");
        process::exit(1);
    }
}

/// Configure miette for error reporting
fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// An argument as written on the command line
#[derive(Debug, PartialEq)]
enum ArgumentSpec {
    Typed(Type),
    Nil,
    Absent,
}

impl ArgumentSpec {
    fn parse(source: &str, registry: &TypeRegistry) -> Result<Self> {
        match source.trim() {
            "nil" => Ok(ArgumentSpec::Nil),
            "_" => Ok(ArgumentSpec::Absent),
            notation => Ok(ArgumentSpec::Typed(parse_type(notation, registry)?)),
        }
    }

    fn actual(&self) -> Actual<'_> {
        match self {
            ArgumentSpec::Typed(ty) => Actual::Typed(ty),
            ArgumentSpec::Nil => Actual::UntypedNil,
            ArgumentSpec::Absent => Actual::Absent,
        }
    }
}

fn handle_check(want: &str, got: &str) -> Result<()> {
    let registry = TypeRegistry::with_prelude();
    let want = parse_type(want, &registry)?;
    let got = match ArgumentSpec::parse(got, &registry)? {
        ArgumentSpec::Typed(ty) => Some(ty),
        _ => None,
    };

    check_compatibility(&want, got.as_ref())?;
    match got {
        Some(got) => println!("✅ {got} is compatible with {want}"),
        None => println!("✅ untyped nil is compatible with {want}"),
    }
    Ok(())
}

fn handle_validate(function: &str, returns: &[String], args: &[String]) -> Result<()> {
    let registry = TypeRegistry::with_prelude();
    let callable = parse_type(function, &registry)?;
    let returns = returns
        .iter()
        .map(|source| parse_type(source, &registry).map_err(Report::from))
        .collect::<Result<Vec<_>>>()?;
    let args = args
        .iter()
        .map(|source| ArgumentSpec::parse(source, &registry))
        .collect::<Result<Vec<_>>>()?;

    let actuals: Vec<Actual<'_>> = args.iter().map(ArgumentSpec::actual).collect();
    debug!(callable = %callable, arguments = actuals.len(), "validating");
    validate_signature(&callable, &returns, &actuals)?;

    let listed: Vec<String> = actuals.iter().map(ToString::to_string).collect();
    println!("✅ {callable} accepts ({})", listed.join(", "));
    Ok(())
}

fn handle_types() {
    let registry = TypeRegistry::with_prelude();
    let width = registry.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, ty) in registry.iter() {
        let underlying = ty.underlying().to_string();
        if underlying == name {
            println!("{name}");
        } else {
            println!("{name:width$}  {underlying}");
        }
    }
}

fn handle_demo() -> Result<()> {
    for (name, function) in builtins::all() {
        println!("🔧 {name}: {}", function.ty());
    }
    println!();

    let key_value = Type::record(vec![Field::new("Key", Type::primitive(Primitive::String))]);
    let target = Value::pointer_to(Value::zero(&key_value));
    let unmarshal = make_invocation(
        &builtins::json_unmarshal(),
        &[Type::error()],
        vec![
            Argument::Present(Value::bytes(br#"{"key": "value"}"#)),
            Argument::Present(target.clone()),
        ],
    )?;
    unmarshal.invoke()?;
    println!("✅ json.Unmarshal decoded {target}");

    let failing = make_invocation(
        &builtins::errors_new(),
        &[Type::error()],
        vec![Argument::Present(Value::string("something went wrong"))],
    )?;
    match failing.invoke() {
        Ok(()) => println!("❓ errors.New reported success"),
        Err(failure) => println!("✅ errors.New failed with: {failure}"),
    }

    let rejected = make_invocation(
        &builtins::json_unmarshal(),
        &[Type::error(), Type::error()],
        vec![Argument::Absent, Argument::Absent],
    );
    match rejected {
        Ok(_) => println!("❓ two declared returns were accepted"),
        Err(error) => {
            println!("✅ two declared returns were rejected:");
            eprintln!("{:?}", Report::new(error));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_argument_spec_parsing() {
        let registry = TypeRegistry::with_prelude();
        assert_eq!(ArgumentSpec::parse("nil", &registry).unwrap(), ArgumentSpec::Nil);
        assert_eq!(ArgumentSpec::parse(" _ ", &registry).unwrap(), ArgumentSpec::Absent);
        assert_eq!(
            ArgumentSpec::parse("[]byte", &registry).unwrap(),
            ArgumentSpec::Typed(Type::bytes())
        );
        assert!(ArgumentSpec::parse("Widget", &registry).is_err());
    }

    #[test]
    fn test_cli_parses_validate() {
        let cli = Cli::parse_from(["makefunc", "validate", "func(...int) error", "int", "nil"]);
        match cli.command {
            Some(Commands::Validate {
                function,
                returns,
                args,
            }) => {
                assert_eq!(function, "func(...int) error");
                assert_eq!(returns, vec!["error".to_string()]);
                assert_eq!(args, vec!["int".to_string(), "nil".to_string()]);
            }
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn test_commands_succeed() {
        assert!(handle_check("io.Reader", "io.ReadWriter").is_ok());
        assert!(handle_check("int", "nil").is_err());
        assert!(handle_validate("func(string, ...int) error", &["error".to_string()], &[
            "string".to_string(),
            "int".to_string(),
            "_".to_string(),
        ])
        .is_ok());
        assert!(handle_demo().is_ok());
    }
}
