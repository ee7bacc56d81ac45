// Type notation parser
// Walks the pest parse tree and resolves names through a TypeRegistry

use crate::error::{NotationError, NotationResult};
use makefunc_types::{ChanDir, Field, FunctionType, MethodSet, Type, TypeRegistry};
use miette::SourceSpan;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct NotationParser;

impl NotationParser {
    /// Parse a single type expression, resolving names through `registry`
    pub fn parse_type(source: &str, registry: &TypeRegistry) -> NotationResult<Type> {
        let mut pairs = Self::parse(Rule::notation, source)
            .map_err(|error| NotationError::from_pest_error(error, source.to_string()))?;
        let notation = pairs
            .next()
            .ok_or_else(|| NotationError::unexpected_rule("notation", Rule::EOI))?;
        let type_expr = first_inner(notation, "type_expr")?;

        Resolver { source, registry }.type_expr(type_expr)
    }
}

/// Turns parse tree nodes into descriptors
struct Resolver<'a> {
    source: &'a str,
    registry: &'a TypeRegistry,
}

impl Resolver<'_> {
    fn type_expr(&self, pair: Pair<Rule>) -> NotationResult<Type> {
        if pair.as_rule() != Rule::type_expr {
            return Err(NotationError::unexpected_rule("type_expr", pair.as_rule()));
        }
        let inner = first_inner(pair, "a type form")?;

        match inner.as_rule() {
            Rule::pointer_type => Ok(Type::pointer_to(self.only_type(inner)?)),
            Rule::sequence_type => Ok(Type::sequence_of(self.only_type(inner)?)),
            Rule::map_type => {
                let mut parts = inner.into_inner();
                let key = self.next_type(&mut parts)?;
                let value = self.next_type(&mut parts)?;
                Ok(Type::mapping(key, value))
            }
            Rule::chan_type => Ok(Type::channel(ChanDir::Both, self.only_type(inner)?)),
            Rule::recv_chan_type => Ok(Type::channel(ChanDir::Recv, self.only_type(inner)?)),
            Rule::send_chan_type => Ok(Type::channel(ChanDir::Send, self.only_type(inner)?)),
            Rule::func_type => {
                let signature = first_inner(inner, "signature")?;
                Ok(Type::function(self.signature(signature)?))
            }
            Rule::interface_type => self.interface_type(inner),
            Rule::struct_type => self.struct_type(inner),
            Rule::type_name => {
                let name = inner.as_str();
                self.registry
                    .lookup(name)
                    .cloned()
                    .ok_or_else(|| NotationError::UnknownType {
                        src: self.source.to_string(),
                        span: source_span(&inner),
                        name: name.to_string(),
                    })
            }
            other => Err(NotationError::unexpected_rule("a type form", other)),
        }
    }

    /// The single type expression nested in a pointer, sequence or channel
    fn only_type(&self, pair: Pair<Rule>) -> NotationResult<Type> {
        self.type_expr(first_inner(pair, "type_expr")?)
    }

    fn next_type(&self, pairs: &mut pest::iterators::Pairs<Rule>) -> NotationResult<Type> {
        match pairs.next() {
            Some(pair) => self.type_expr(pair),
            None => Err(NotationError::unexpected_rule("type_expr", Rule::EOI)),
        }
    }

    fn signature(&self, pair: Pair<Rule>) -> NotationResult<FunctionType> {
        let mut params = Vec::new();
        let mut results = Vec::new();
        let mut variadic = false;

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::parameters => {
                    let declared: Vec<Pair<Rule>> = part.into_inner().collect();
                    let last = declared.len().saturating_sub(1);
                    for (index, parameter) in declared.into_iter().enumerate() {
                        let (is_variadic, ty) = self.parameter(parameter, index == last)?;
                        variadic |= is_variadic;
                        params.push(ty);
                    }
                }
                Rule::results => {
                    let inner = first_inner(part, "results")?;
                    match inner.as_rule() {
                        Rule::result_list => {
                            for ty in inner.into_inner() {
                                results.push(self.type_expr(ty)?);
                            }
                        }
                        _ => results.push(self.type_expr(inner)?),
                    }
                }
                other => return Err(NotationError::unexpected_rule("parameters", other)),
            }
        }

        if variadic {
            Ok(FunctionType::variadic(params, results))
        } else {
            Ok(FunctionType::new(params, results))
        }
    }

    /// Parse one parameter; `...T` declares a `[]T` tail and is only allowed last
    fn parameter(&self, pair: Pair<Rule>, is_last: bool) -> NotationResult<(bool, Type)> {
        let mut variadic = false;
        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::ellipsis if !is_last => {
                    return Err(NotationError::MisplacedVariadic {
                        src: self.source.to_string(),
                        span: source_span(&part),
                    });
                }
                Rule::ellipsis => variadic = true,
                Rule::type_expr => {
                    let ty = self.type_expr(part)?;
                    let ty = if variadic { Type::sequence_of(ty) } else { ty };
                    return Ok((variadic, ty));
                }
                other => return Err(NotationError::unexpected_rule("parameter", other)),
            }
        }
        Err(NotationError::unexpected_rule("type_expr", Rule::EOI))
    }

    fn interface_type(&self, pair: Pair<Rule>) -> NotationResult<Type> {
        let mut methods = MethodSet::new();
        for method in pair.into_inner() {
            let span = source_span(&method);
            let mut parts = method.into_inner();
            let name = self.identifier(parts.next())?;
            let signature = match parts.next() {
                Some(signature) => self.signature(signature)?,
                None => return Err(NotationError::unexpected_rule("signature", Rule::EOI)),
            };
            if methods.insert(name.clone(), signature).is_some() {
                return Err(self.duplicate("method", name, span));
            }
        }
        Ok(Type::interface(methods))
    }

    fn struct_type(&self, pair: Pair<Rule>) -> NotationResult<Type> {
        let mut fields: Vec<Field> = Vec::new();
        for field in pair.into_inner() {
            let span = source_span(&field);
            let mut parts = field.into_inner();
            let name = self.identifier(parts.next())?;
            let ty = self.next_type(&mut parts)?;
            if fields.iter().any(|existing| existing.name == name) {
                return Err(self.duplicate("field", name, span));
            }
            fields.push(Field::new(name, ty));
        }
        Ok(Type::record(fields))
    }

    fn identifier(&self, pair: Option<Pair<Rule>>) -> NotationResult<String> {
        match pair {
            Some(pair) if pair.as_rule() == Rule::identifier => Ok(pair.as_str().to_string()),
            Some(pair) => Err(NotationError::unexpected_rule("identifier", pair.as_rule())),
            None => Err(NotationError::unexpected_rule("identifier", Rule::EOI)),
        }
    }

    fn duplicate(&self, what: &'static str, name: String, span: SourceSpan) -> NotationError {
        NotationError::DuplicateMember {
            src: self.source.to_string(),
            span,
            what,
            name,
        }
    }
}

fn first_inner<'i>(pair: Pair<'i, Rule>, expected: &str) -> NotationResult<Pair<'i, Rule>> {
    let rule = pair.as_rule();
    pair.into_inner()
        .next()
        .ok_or_else(|| NotationError::unexpected_rule(expected, rule))
}

fn source_span(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    SourceSpan::new(span.start().into(), span.end() - span.start())
}
