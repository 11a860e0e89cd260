//! Type annotation parsing
//!
//! Handles every annotation form:
//! - named types, including generic interface instantiation: `Box<number>`
//! - table types: `{ x: number, label?: string }`
//! - function types: `(number, string) => boolean`, `() => (number, string)`
//! - varargs: `...string`, bare `...` meaning `...any`
//! - array suffixes: `number[]`, `{ x: number }[][]`

use super::guards::{deepen, with_chain, with_depth};
use super::Parser;
use crate::parser::error::SyntaxError;
use crate::parser::token::{Location, TokenKind};
use crate::parser::types::{Property, Type, TypeId};

/// Parse a type annotation.
pub fn parse_type(parser: &mut Parser) -> Result<TypeId, SyntaxError> {
    match try_parse_type(parser)? {
        Some(ty) => Ok(ty),
        None => Err(SyntaxError::unexpected(parser.current(), "type")),
    }
}

/// Parse a type annotation if the current token can start one.
///
/// Returns `Ok(None)` without consuming anything otherwise, so callers can
/// give a context-specific error or fall back to a default.
pub fn try_parse_type(parser: &mut Parser) -> Result<Option<TypeId>, SyntaxError> {
    if !starts_type(parser.current().kind) {
        return Ok(None);
    }

    with_depth(parser, "type", |parser| {
        let base = parse_base_type(parser)?;
        with_chain(parser, |parser| {
            let mut ty = base;
            while parser.check(TokenKind::LeftBracket)
                && parser.peek_kind(1)? == TokenKind::RightBracket
            {
                deepen(parser, "type")?;
                parser.advance()?;
                parser.advance()?;
                ty = parser.compiler.types.array_type(ty);
            }
            Ok(Some(ty))
        })
    })
}

fn starts_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::Nil
            | TokenKind::LeftBrace
            | TokenKind::LeftParen
            | TokenKind::Ellipsis
    )
}

fn parse_base_type(parser: &mut Parser) -> Result<TypeId, SyntaxError> {
    match parser.current().kind {
        TokenKind::Identifier => parse_named_type(parser),
        TokenKind::Nil => {
            parser.advance()?;
            Ok(parser.compiler.types.nil_type())
        }
        TokenKind::LeftBrace => parse_table_type(parser),
        TokenKind::LeftParen => parse_function_type(parser),
        TokenKind::Ellipsis => {
            parser.advance()?;
            let element = match try_parse_type(parser)? {
                Some(element) => element,
                None => parser.any_type(),
            };
            Ok(parser.compiler.types.vararg_type(element))
        }
        _ => Err(SyntaxError::unexpected(parser.current(), "type")),
    }
}

/// `Name` or `Name<A, B>`
fn parse_named_type(parser: &mut Parser) -> Result<TypeId, SyntaxError> {
    let start = parser.current_location();
    let (name, location) = parser.expect_identifier()?;

    let Some(ty) = parser.scopes.resolve_type(&name) else {
        return Err(SyntaxError::new(
            location,
            format!("the type '{}' does not exist in the current context", name),
        ));
    };

    if !parser.eat(TokenKind::Less)? {
        return Ok(ty);
    }

    let arguments = parse_type_list(parser)?;
    parser.expect(TokenKind::Greater)?;
    let location = parser.span_from(start);

    let expected = match parser.compiler.types.get(ty) {
        Some(Type::Interface(interface)) if !interface.generics.is_empty() => {
            interface.generics.len()
        }
        _ => {
            return Err(SyntaxError::new(
                location,
                format!("the type '{}' does not take type arguments", name),
            ))
        }
    };

    let got = arguments.len();
    parser
        .compiler
        .types
        .instantiate(ty, arguments)
        .ok_or_else(|| {
            SyntaxError::new(
                location,
                format!(
                    "interface '{}' expects {} type arguments, got {}",
                    name, expected, got
                ),
            )
        })
}

/// `{ name: Type, name?: Type }`
fn parse_table_type(parser: &mut Parser) -> Result<TypeId, SyntaxError> {
    parser.expect(TokenKind::LeftBrace)?;

    let mut properties = Vec::new();
    while !parser.check(TokenKind::RightBrace) {
        properties.push(parse_property(parser)?);
        if !parser.eat(TokenKind::Comma)? && !parser.eat(TokenKind::Semicolon)? {
            break;
        }
    }
    parser.expect(TokenKind::RightBrace)?;

    Ok(parser.compiler.types.table_type(properties))
}

/// `name: Type` or `name?: Type`
pub fn parse_property(parser: &mut Parser) -> Result<Property, SyntaxError> {
    let (name, _) = parser.expect_identifier()?;
    let optional = parser.eat(TokenKind::Question)?;
    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser)?;
    Ok(Property::new(name, ty, optional))
}

/// `(A, B) => R`, `(A) => (R1, R2)` or, with typeless functions allowed,
/// just `(A, B)`.
fn parse_function_type(parser: &mut Parser) -> Result<TypeId, SyntaxError> {
    let start = parser.current_location();
    let arguments = parse_parenthesized_list(parser)?;
    parse_function_returns(parser, start, arguments)
}

fn parse_function_returns(
    parser: &mut Parser,
    start: Location,
    arguments: Vec<TypeId>,
) -> Result<TypeId, SyntaxError> {
    let returns = if parser.eat(TokenKind::Arrow)? {
        if parser.check(TokenKind::LeftParen) {
            let group_start = parser.current_location();
            let list = parse_parenthesized_list(parser)?;
            if parser.check(TokenKind::Arrow) {
                // `=> (A) => B`: the group was the argument list of a
                // function-typed return value
                let returned = parse_function_returns(parser, group_start, list)?;
                vec![returned]
            } else {
                strip_void(parser, list)
            }
        } else {
            let ty = parse_type(parser)?;
            strip_void(parser, vec![ty])
        }
    } else {
        let signature = parser.span_from(start);
        typeless_returns(parser, signature)?
    };

    Ok(parser.compiler.types.function_type(arguments, returns))
}

fn parse_parenthesized_list(parser: &mut Parser) -> Result<Vec<TypeId>, SyntaxError> {
    parser.expect(TokenKind::LeftParen)?;
    let list = if parser.check(TokenKind::RightParen) {
        Vec::new()
    } else {
        parse_type_list(parser)?
    };
    parser.expect(TokenKind::RightParen)?;
    Ok(list)
}

/// Comma-separated types. A vararg may only come last.
pub fn parse_type_list(parser: &mut Parser) -> Result<Vec<TypeId>, SyntaxError> {
    let start = parser.current_location();
    let mut list = vec![parse_type(parser)?];
    while parser.eat(TokenKind::Comma)? {
        list.push(parse_type(parser)?);
    }
    parser.compiler.types.validate(&list, parser.span_from(start))?;
    Ok(list)
}

/// Return annotation of a prototype, after its `:`
pub fn parse_return_list(parser: &mut Parser) -> Result<Vec<TypeId>, SyntaxError> {
    let list = parse_type_list(parser)?;
    Ok(strip_void(parser, list))
}

/// Returns of a function whose annotation was left out
pub fn typeless_returns(parser: &Parser, signature: Location) -> Result<Vec<TypeId>, SyntaxError> {
    if parser.compiler.config.allow_typeless_functions {
        Ok(vec![parser.any_type()])
    } else {
        Err(SyntaxError::new(
            signature,
            "missing return type annotation for function",
        ))
    }
}

/// A lone `void` return means no values
fn strip_void(parser: &Parser, list: Vec<TypeId>) -> Vec<TypeId> {
    if list.len() == 1 && list[0] == parser.compiler.types.void_type() {
        Vec::new()
    } else {
        list
    }
}
