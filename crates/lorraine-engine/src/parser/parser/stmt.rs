//! Statement parsing

use super::guards::with_depth;
use super::module::{parse_block, parse_export, parse_import};
use super::types::{parse_property, parse_return_list, parse_type, typeless_returns};
use super::Parser;
use crate::parser::ast::*;
use crate::parser::error::SyntaxError;
use crate::parser::symbols::{Scope, Variable, VariableId};
use crate::parser::token::TokenKind;
use crate::parser::types::TypeId;

/// Parse a statement.
pub fn parse_statement(parser: &mut Parser) -> Result<Statement, SyntaxError> {
    with_depth(parser, "statement", parse_statement_inner)
}

fn parse_statement_inner(parser: &mut Parser) -> Result<Statement, SyntaxError> {
    match parser.current().kind {
        TokenKind::Type => {
            let start = parser.current_location();
            let alias = parse_type_alias(parser)?;
            Ok(Statement::Expression(ExpressionStatement {
                expression: Expression::TypeAlias(alias),
                location: parser.span_from(start),
            }))
        }
        TokenKind::Interface => {
            let start = parser.current_location();
            let interface = parse_interface_definition(parser)?;
            Ok(Statement::Expression(ExpressionStatement {
                expression: Expression::TypeAlias(interface),
                location: parser.span_from(start),
            }))
        }
        TokenKind::Local => Ok(Statement::Local(parse_local_assignment(parser)?)),
        TokenKind::Import => parse_import(parser),
        TokenKind::Export => parse_export(parser),
        TokenKind::Extern => parse_extern(parser),
        TokenKind::Do => parse_do_block(parser),
        TokenKind::Identifier | TokenKind::LeftParen => parse_call_statement(parser),
        _ => Err(SyntaxError::unexpected(parser.current(), "statement")),
    }
}

/// A bare expression is only a statement when it is a call.
fn parse_call_statement(parser: &mut Parser) -> Result<Statement, SyntaxError> {
    let expression = super::expr::parse_primary_expression(parser)?;
    if !expression.is_call() {
        return Err(SyntaxError::new(
            expression.location(),
            "expected function call",
        ));
    }
    Ok(Statement::Expression(ExpressionStatement {
        location: expression.location(),
        expression,
    }))
}

/// Parse `do ... end` as a nested scope.
fn parse_do_block(parser: &mut Parser) -> Result<Statement, SyntaxError> {
    let start = parser.current_location();
    parser.expect(TokenKind::Do)?;
    let mut block = parse_block(parser, TokenKind::End)?;
    parser.expect(TokenKind::End)?;
    block.location = parser.span_from(start);
    Ok(Statement::Block(block))
}

// ============================================================================
// Type Declarations
// ============================================================================

/// Parse `type Name = Type` and bind `Name` in the current scope.
pub fn parse_type_alias(parser: &mut Parser) -> Result<TypeAliasDefinition, SyntaxError> {
    let start = parser.current_location();
    parser.expect(TokenKind::Type)?;
    let (name, name_location) = parser.expect_identifier()?;
    parser.expect(TokenKind::Equals)?;
    let ty = parse_type(parser)?;

    parser.define_type(&name, ty, name_location)?;

    Ok(TypeAliasDefinition {
        name,
        location: parser.span_from(start),
        ty,
    })
}

/// Parse `interface Name<T, U> { prop: T, other?: number }`.
///
/// Generic parameters are only in scope while the body is parsed.
pub fn parse_interface_definition(
    parser: &mut Parser,
) -> Result<TypeAliasDefinition, SyntaxError> {
    let start = parser.current_location();
    parser.expect(TokenKind::Interface)?;
    let (name, name_location) = parser.expect_identifier()?;

    let mut generic_scope = Scope::new();
    let mut generics = Vec::new();
    if parser.eat(TokenKind::Less)? {
        loop {
            let (parameter, location) = parser.expect_identifier()?;
            if generic_scope.types.contains_key(&parameter) {
                return Err(SyntaxError::new(
                    location,
                    format!("the type '{}' is already defined in this scope", parameter),
                ));
            }
            let generic = parser.compiler.types.generic_type(parameter.clone());
            generic_scope.types.insert(parameter, generic);
            generics.push(generic);
            if !parser.eat(TokenKind::Comma)? {
                break;
            }
        }
        parser.expect(TokenKind::Greater)?;
    }

    parser.expect(TokenKind::LeftBrace)?;
    parser.scopes.push(generic_scope);
    let properties = parse_interface_body(parser);
    parser.scopes.pop();
    let properties = properties?;

    let ty = parser
        .compiler
        .types
        .interface_type(name.clone(), generics, properties);
    parser.define_type(&name, ty, name_location)?;

    Ok(TypeAliasDefinition {
        name,
        location: parser.span_from(start),
        ty,
    })
}

fn parse_interface_body(
    parser: &mut Parser,
) -> Result<Vec<crate::parser::types::Property>, SyntaxError> {
    let mut properties = Vec::new();
    while !parser.check(TokenKind::RightBrace) {
        properties.push(parse_property(parser)?);
        if !parser.eat(TokenKind::Comma)? && !parser.eat(TokenKind::Semicolon)? {
            break;
        }
    }
    parser.expect(TokenKind::RightBrace)?;
    Ok(properties)
}

// ============================================================================
// Local Declarations
// ============================================================================

/// Parse `local a: number, b = 1, "x"`.
///
/// Declared variables come into scope after their values are parsed, so a
/// value may still refer to an outer binding of the same name. Arity is left
/// to the validator.
pub fn parse_local_assignment(parser: &mut Parser) -> Result<LocalAssignment, SyntaxError> {
    let start = parser.current_location();
    parser.expect(TokenKind::Local)?;

    let mut declared = vec![parse_variable(parser)?];
    while parser.eat(TokenKind::Comma)? {
        declared.push(parse_variable(parser)?);
    }

    let mut values = Vec::new();
    if parser.eat(TokenKind::Equals)? {
        values.push(super::expr::parse_expression(parser)?);
        while parser.eat(TokenKind::Comma)? {
            values.push(super::expr::parse_expression(parser)?);
        }
    }

    let mut variables = Vec::with_capacity(declared.len());
    for variable in declared {
        let name = variable.name.clone();
        let id = parser.alloc_variable(variable);
        parser.scopes.define_variable(name, id);
        variables.push(id);
    }

    Ok(LocalAssignment {
        variables,
        values,
        location: parser.span_from(start),
    })
}

/// Parse `name [: Type]`. Unannotated variables are `any`.
fn parse_variable(parser: &mut Parser) -> Result<Variable, SyntaxError> {
    let (name, location) = parser.expect_identifier()?;
    let ty = parse_annotation(parser)?;
    Ok(Variable::new(name, ty, location))
}

fn parse_annotation(parser: &mut Parser) -> Result<TypeId, SyntaxError> {
    if parser.eat(TokenKind::Colon)? {
        parse_type(parser)
    } else {
        Ok(parser.any_type())
    }
}

// ============================================================================
// Externs
// ============================================================================

/// Parse `extern [function] name(params): returns` or `extern name: Type`.
fn parse_extern(parser: &mut Parser) -> Result<Statement, SyntaxError> {
    let start = parser.current_location();
    parser.expect(TokenKind::Extern)?;

    let is_function = parser.eat(TokenKind::Function)?
        || parser.peek_kind(1)? == TokenKind::LeftParen;

    if is_function {
        let prototype = parse_function_prototype(parser)?;
        return Ok(Statement::Extern(ExternItem {
            prototype,
            location: parser.span_from(start),
        }));
    }

    let (name, location) = parser.expect_identifier()?;
    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser)?;

    let variable = parser.alloc_variable(Variable::new(name.clone(), ty, location));
    parser.declare_variable(&name, variable, location)?;

    Ok(Statement::ExternalDeclaration(ExternalDeclaration {
        variable,
        location: parser.span_from(start),
    }))
}

/// Parse `name(a: number, ...: string): boolean`.
///
/// The function is bound in the enclosing scope as soon as its signature is
/// known.
pub fn parse_function_prototype(parser: &mut Parser) -> Result<FunctionPrototype, SyntaxError> {
    let start = parser.current_location();
    let (name, name_location) = parser.expect_identifier()?;

    parser.expect(TokenKind::LeftParen)?;
    let mut parameters: Vec<VariableId> = Vec::new();
    let mut arguments = Vec::new();
    let mut vararg = None;

    while !parser.check(TokenKind::RightParen) {
        if vararg.is_some() {
            return Err(SyntaxError::new(
                parser.current_location(),
                "vararg must be the last type in a type list",
            ));
        }

        if parser.check(TokenKind::Ellipsis) {
            let location = parser.current_location();
            parser.advance()?;
            let element = parse_annotation(parser)?;
            let ty = parser.compiler.types.vararg_type(element);
            let id = parser.alloc_variable(Variable::variadic("...", ty, location));
            arguments.push(ty);
            vararg = Some(id);
        } else {
            let variable = parse_variable(parser)?;
            arguments.push(variable.ty);
            parameters.push(parser.alloc_variable(variable));
        }

        if !parser.eat(TokenKind::Comma)? {
            break;
        }
    }
    parser.expect(TokenKind::RightParen)?;
    parser.compiler.types.validate(&arguments, parser.span_from(start))?;

    let returns = if parser.eat(TokenKind::Colon)? {
        parse_return_list(parser)?
    } else {
        let signature = parser.span_from(start);
        typeless_returns(parser, signature)?
    };

    let ty = parser
        .compiler
        .types
        .function_type(arguments, returns.clone());
    let variable = parser.alloc_variable(Variable::new(name.clone(), ty, name_location));
    parser.declare_variable(&name, variable, name_location)?;

    Ok(FunctionPrototype {
        name,
        variable,
        parameters,
        returns,
        vararg,
        location: parser.span_from(start),
        ty,
    })
}
