//! Expression parsing
//!
//! Lua++ expressions have no operators yet, so there is no precedence
//! climbing: an expression is a literal, a table constructor, or a primary
//! expression with a chain of call and index suffixes.

use super::guards::{deepen, with_chain, with_depth};
use super::Parser;
use crate::parser::ast::*;
use crate::parser::error::SyntaxError;
use crate::parser::symbols::Variable;
use crate::parser::token::{Location, TokenKind};

/// Parse an expression.
pub fn parse_expression(parser: &mut Parser) -> Result<Expression, SyntaxError> {
    with_depth(parser, "expression", parse_expression_inner)
}

fn parse_expression_inner(parser: &mut Parser) -> Result<Expression, SyntaxError> {
    let location = parser.current_location();

    let expression = match parser.current().kind {
        TokenKind::Number => {
            let value = parse_number(&parser.current().text, location)?;
            let ty = parser.compiler.types.number_type();
            parser.advance()?;
            Expression::Number(NumberLiteral { value, location, ty })
        }
        TokenKind::String => {
            let ty = parser.compiler.types.string_type();
            let value = parser.bump()?.text;
            Expression::String(StringLiteral { value, location, ty })
        }
        TokenKind::True | TokenKind::False => {
            let value = parser.check(TokenKind::True);
            let ty = parser.compiler.types.boolean_type();
            parser.advance()?;
            Expression::Boolean(BooleanLiteral { value, location, ty })
        }
        TokenKind::Nil => {
            let ty = parser.compiler.types.nil_type();
            parser.advance()?;
            Expression::Nil(NilLiteral { location, ty })
        }
        TokenKind::LeftBrace => parse_list_constructor(parser)?,
        TokenKind::Identifier | TokenKind::LeftParen => parse_primary_expression(parser)?,
        _ => return Err(SyntaxError::unexpected(parser.current(), "expression")),
    };

    Ok(expression)
}

/// Convert number literal text. `0x` literals are hexadecimal integers,
/// everything else goes through the float parser.
pub fn parse_number(text: &str, location: Location) -> Result<f64, SyntaxError> {
    let hex = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"));

    let value = match hex {
        Some(digits) => u64::from_str_radix(digits, 16).ok().map(|v| v as f64),
        None => text.parse::<f64>().ok().filter(|_| {
            // Rust's float parser also takes "inf" and "NaN"
            text.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        }),
    };

    value.ok_or_else(|| {
        SyntaxError::new(location, format!("unable to convert '{}' to a number", text))
    })
}

// ============================================================================
// Primary Expressions
// ============================================================================

/// Parse a prefix followed by any number of call or index suffixes.
pub fn parse_primary_expression(parser: &mut Parser) -> Result<Expression, SyntaxError> {
    let start = parser.current_location();
    let prefix = parse_prefix_expression(parser)?;
    with_chain(parser, |parser| parse_suffixes(parser, prefix, start))
}

/// Each suffix wraps the expression so far, one nesting level per suffix.
fn parse_suffixes(
    parser: &mut Parser,
    mut expression: Expression,
    start: Location,
) -> Result<Expression, SyntaxError> {
    loop {
        if is_suffix(parser.current().kind) {
            deepen(parser, "expression")?;
        }
        let any = parser.any_type();
        expression = match parser.current().kind {
            TokenKind::LeftParen => {
                parser.advance()?;
                let mut arguments = Vec::new();
                if !parser.check(TokenKind::RightParen) {
                    arguments.push(parse_expression(parser)?);
                    while parser.eat(TokenKind::Comma)? {
                        arguments.push(parse_expression(parser)?);
                    }
                }
                parser.expect(TokenKind::RightParen)?;
                Expression::Call(Call {
                    callee: Box::new(expression),
                    arguments,
                    location: parser.span_from(start),
                    ty: any,
                })
            }
            // print "hello"
            TokenKind::String => {
                let token = parser.bump()?;
                let argument = Expression::String(StringLiteral {
                    value: token.text,
                    location: token.location,
                    ty: parser.compiler.types.string_type(),
                });
                Expression::Call(Call {
                    callee: Box::new(expression),
                    arguments: vec![argument],
                    location: parser.span_from(start),
                    ty: any,
                })
            }
            TokenKind::Dot => {
                parser.advance()?;
                let (name, _) = parser.expect_identifier()?;
                Expression::NameIndex(NameIndex {
                    object: Box::new(expression),
                    name,
                    location: parser.span_from(start),
                    ty: any,
                })
            }
            TokenKind::LeftBracket => {
                parser.advance()?;
                let index = parse_expression(parser)?;
                parser.expect(TokenKind::RightBracket)?;
                Expression::ExpressionIndex(ExpressionIndex {
                    object: Box::new(expression),
                    index: Box::new(index),
                    location: parser.span_from(start),
                    ty: any,
                })
            }
            _ => return Ok(expression),
        };
    }
}

fn is_suffix(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LeftParen | TokenKind::String | TokenKind::Dot | TokenKind::LeftBracket
    )
}

/// A name or a parenthesized expression
fn parse_prefix_expression(parser: &mut Parser) -> Result<Expression, SyntaxError> {
    match parser.current().kind {
        TokenKind::LeftParen => {
            let start = parser.current_location();
            parser.advance()?;
            let inner = parse_expression(parser)?;
            parser.expect(TokenKind::RightParen)?;
            Ok(Expression::Group(ExpressionGroup {
                ty: inner.ty(),
                inner: Box::new(inner),
                location: parser.span_from(start),
            }))
        }
        TokenKind::Identifier => {
            let (name, location) = parser.expect_identifier()?;
            resolve_name(parser, name, location)
        }
        _ => Err(SyntaxError::unexpected(parser.current(), "expression")),
    }
}

/// Variables shadow types of the same name
fn resolve_name(
    parser: &mut Parser,
    name: String,
    location: Location,
) -> Result<Expression, SyntaxError> {
    if let Some(variable) = parser.scopes.resolve_variable(&name) {
        return Ok(Expression::Variable(VariableReference {
            variable,
            location,
            ty: parser.variable_type(variable),
        }));
    }

    if let Some(ty) = parser.scopes.resolve_type(&name) {
        return Ok(Expression::TypeWrapper(TypeWrapper { name, location, ty }));
    }

    Err(SyntaxError::new(
        location,
        format!("unknown identifier '{}'", name),
    ))
}

// ============================================================================
// Table Constructors
// ============================================================================

/// `{ 1, 2, 3 }` or `{ x = 1, y = 2 }`. Whether the two kinds are mixed is
/// checked by the validator.
fn parse_list_constructor(parser: &mut Parser) -> Result<Expression, SyntaxError> {
    let start = parser.current_location();
    parser.expect(TokenKind::LeftBrace)?;

    let mut entries = Vec::new();
    while !parser.check(TokenKind::RightBrace) {
        entries.push(parse_list_entry(parser)?);
        if !parser.eat(TokenKind::Comma)? && !parser.eat(TokenKind::Semicolon)? {
            break;
        }
    }
    parser.expect(TokenKind::RightBrace)?;

    Ok(Expression::List(ListConstructor {
        entries,
        location: parser.span_from(start),
        ty: parser.any_type(),
    }))
}

fn parse_list_entry(parser: &mut Parser) -> Result<Expression, SyntaxError> {
    let named = parser.check(TokenKind::Identifier) && parser.peek_kind(1)? == TokenKind::Equals;
    if !named {
        return parse_expression(parser);
    }

    let start = parser.current_location();
    let (name, location) = parser.expect_identifier()?;
    parser.expect(TokenKind::Equals)?;
    let value = parse_expression(parser)?;

    let ty = value.ty();
    let variable = parser.alloc_variable(Variable::new(name, ty, location));
    Ok(Expression::Assignment(VariableAssignment {
        variable,
        value: Box::new(value),
        location: parser.span_from(start),
        ty,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_forms() {
        let at = Location::default();
        assert_eq!(parse_number("10", at).unwrap(), 10.0);
        assert_eq!(parse_number("3.25", at).unwrap(), 3.25);
        assert_eq!(parse_number(".5", at).unwrap(), 0.5);
        assert_eq!(parse_number("1e3", at).unwrap(), 1000.0);
        assert_eq!(parse_number("2.5E-1", at).unwrap(), 0.25);
        assert_eq!(parse_number("0xff", at).unwrap(), 255.0);
        assert_eq!(parse_number("0XFF", at).unwrap(), 255.0);
    }

    #[test]
    fn test_parse_number_rejects_malformed() {
        let at = Location::default();
        for text in ["12abc", "1.2.3", "0x", "0xZZ", "1e"] {
            let err = parse_number(text, at).unwrap_err();
            assert_eq!(
                err.message,
                format!("unable to convert '{}' to a number", text)
            );
        }
    }
}
