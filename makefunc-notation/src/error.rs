// Type notation error handling
// Diagnostics carry the notation source so miette can point at the problem

use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Errors produced while turning type notation into a descriptor
#[derive(Error, Diagnostic, Debug)]
pub enum NotationError {
    #[error("Syntax error in type notation")]
    #[diagnostic(code(makefunc::notation::syntax), help("{message}"))]
    Syntax {
        #[source_code]
        src: String,
        #[label("error occurred here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Unknown type `{name}`")]
    #[diagnostic(
        code(makefunc::notation::unknown_type),
        help("Register `{name}` in the type registry or use a predeclared type")
    )]
    UnknownType {
        #[source_code]
        src: String,
        #[label("not a registered type")]
        span: SourceSpan,
        name: String,
    },

    #[error("Variadic parameter is not the last parameter")]
    #[diagnostic(
        code(makefunc::notation::misplaced_variadic),
        help("Only the final parameter of a signature may be written as `...T`")
    )]
    MisplacedVariadic {
        #[source_code]
        src: String,
        #[label("`...` used here")]
        span: SourceSpan,
    },

    #[error("Duplicate {what} `{name}`")]
    #[diagnostic(
        code(makefunc::notation::duplicate_member),
        help("Each {what} name may appear only once")
    )]
    DuplicateMember {
        #[source_code]
        src: String,
        #[label("declared again here")]
        span: SourceSpan,
        what: &'static str,
        name: String,
    },

    #[error("Unexpected grammar rule")]
    #[diagnostic(
        code(makefunc::notation::unexpected_rule),
        help("Expected rule: {expected}")
    )]
    UnexpectedRule { expected: String, found: String },
}

impl NotationError {
    /// Create a syntax error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 0),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
                let mut expected: Vec<&str> = Vec::new();
                for description in positives.iter().map(rule_description) {
                    if !expected.contains(&description) {
                        expected.push(description);
                    }
                }
                format!("expected {}", expected.join(", or "))
            }
            variant => variant.message().into_owned(),
        };

        NotationError::Syntax { src, span, message }
    }

    pub(crate) fn unexpected_rule(expected: &str, found: Rule) -> Self {
        NotationError::UnexpectedRule {
            expected: expected.to_string(),
            found: format!("{found:?}"),
        }
    }
}

/// Result type for notation parsing
pub type NotationResult<T> = Result<T, NotationError>;

/// Convert a grammar rule to a user-friendly description
fn rule_description(rule: &Rule) -> &'static str {
    match rule {
        Rule::type_expr => "a type (like int, *T, []T or func(T) error)",
        Rule::type_name => "a type name (like int or io.Reader)",
        Rule::identifier => "a name",
        Rule::pointer_type => "a pointer type (like *int)",
        Rule::sequence_type => "a sequence type (like []string)",
        Rule::map_type => "a map type (like map[string]int)",
        Rule::chan_type => "a channel type (like chan int)",
        Rule::recv_chan_type => "a receive-only channel type (like <-chan int)",
        Rule::send_chan_type => "a send-only channel type (like chan<- int)",
        Rule::map_word => "`map`",
        Rule::chan_word => "`chan`",
        Rule::func_word => "`func`",
        Rule::interface_word => "`interface`",
        Rule::struct_word => "`struct`",
        Rule::func_type => "a function type (like func(int) error)",
        Rule::interface_type => "an interface type (like interface { Close() error })",
        Rule::struct_type => "a struct type (like struct { Key string })",
        Rule::parameters | Rule::parameter => "a parameter list",
        Rule::results | Rule::result_list => "a result list",
        Rule::method_spec => "a method (like Read([]byte) (int, error))",
        Rule::field_decl => "a field (like Key string)",
        Rule::EOI => "end of input",
        _ => "more input",
    }
}
