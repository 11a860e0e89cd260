//! Module-level parsing: blocks, imports and exports

use super::guards::with_depth;
use super::stmt::{parse_interface_definition, parse_local_assignment, parse_statement, parse_type_alias};
use super::Parser;
use crate::parser::ast::*;
use crate::parser::error::SyntaxError;
use crate::parser::symbols::Scope;
use crate::parser::token::TokenKind;
use log::debug;
use std::path::Path;

/// Parse a whole source file into a [`Module`].
pub fn parse_module(parser: &mut Parser) -> Result<Module, SyntaxError> {
    parser.trace_module("parsing");

    let root = parser.root_scope();
    let body = parse_block_with(parser, root, TokenKind::Eof)?;
    parser.expect(TokenKind::Eof)?;

    parser.trace_module("parsed");
    Ok(Module::new(parser.info.clone(), body))
}

/// Parse statements in a fresh scope until `terminator`, which is left
/// unconsumed.
pub fn parse_block(parser: &mut Parser, terminator: TokenKind) -> Result<Block, SyntaxError> {
    with_depth(parser, "block", |parser| {
        parse_block_with(parser, Scope::new(), terminator)
    })
}

fn parse_block_with(
    parser: &mut Parser,
    scope: Scope,
    terminator: TokenKind,
) -> Result<Block, SyntaxError> {
    let start = parser.current_location();
    parser.scopes.push(scope);

    let result = parse_statements(parser, terminator);

    // The scope is popped on failure too, so the stack stays balanced
    let scope = parser.scopes.pop().unwrap_or_default();
    let body = result?;

    let location = if body.is_empty() {
        start
    } else {
        parser.span_from(start)
    };
    Ok(Block::new(body, scope, location))
}

fn parse_statements(
    parser: &mut Parser,
    terminator: TokenKind,
) -> Result<Vec<Statement>, SyntaxError> {
    let mut body = Vec::new();
    while !parser.check(terminator) {
        if parser.at_eof() {
            return Err(SyntaxError::expected(terminator, parser.current()));
        }
        // Empty statement
        if parser.eat(TokenKind::Semicolon)? {
            continue;
        }
        body.push(parse_statement(parser)?);
    }
    Ok(body)
}

// ============================================================================
// Imports
// ============================================================================

/// Parse `import { a, B } from "./module"`.
///
/// The target module is parsed and validated before this returns. Each name
/// is looked up in its exported variables first, then its exported types,
/// and bound in the current scope under the same name.
pub fn parse_import(parser: &mut Parser) -> Result<Statement, SyntaxError> {
    let start = parser.current_location();
    parser.expect(TokenKind::Import)?;

    parser.expect(TokenKind::LeftBrace)?;
    let mut names = vec![parser.expect_identifier()?];
    while parser.eat(TokenKind::Comma)? {
        names.push(parser.expect_identifier()?);
    }
    parser.expect(TokenKind::RightBrace)?;
    parser.expect(TokenKind::From)?;

    let path_token = parser.expect(TokenKind::String)?;
    let module_path = path_token.text;

    let Some(file) = parser.info.resolve_import(&module_path) else {
        return Err(SyntaxError::new(
            path_token.location,
            "There was an issue parsing the module name. Use './' for local files.",
        ));
    };

    let module = load_import(parser, &module_path, &file, path_token.location)?;

    let mut imported = Vec::with_capacity(names.len());
    for (name, location) in names {
        let exports = &module.body.scope;
        let expression = if let Some(&variable) = exports.export_variables.get(&name) {
            parser.scopes.define_variable(name.clone(), variable);
            Expression::Variable(VariableReference {
                variable,
                location,
                ty: parser.variable_type(variable),
            })
        } else if let Some(&ty) = exports.export_types.get(&name) {
            parser.define_type(&name, ty, location)?;
            Expression::TypeWrapper(TypeWrapper { name, location, ty })
        } else {
            return Err(SyntaxError::new(
                location,
                format!(
                    "unable to find export of '{}' in {}",
                    name, module.info.filename
                ),
            ));
        };
        imported.push(expression);
    }

    Ok(Statement::Import(Import {
        names: imported,
        module: Box::new(module),
        location: parser.span_from(start),
    }))
}

fn load_import(
    parser: &mut Parser,
    module_path: &str,
    file: &Path,
    location: crate::parser::token::Location,
) -> Result<Module, SyntaxError> {
    let absolute = std::path::absolute(file).unwrap_or_else(|_| file.to_path_buf());

    if parser.compiler.is_loading(file) {
        return Err(SyntaxError::new(
            location,
            format!("circular import of '{}'", absolute.display()),
        ));
    }

    let source = std::fs::read_to_string(file).map_err(|_| {
        SyntaxError::new(
            location,
            format!("unable to open file '{}'", absolute.display()),
        )
    })?;

    debug!(
        "importing '{}' from '{}'",
        module_path,
        parser.info.path().display()
    );

    parser
        .compiler
        .load_module(file, &source)
        .ok_or_else(|| {
            SyntaxError::new(location, format!("failed to load module '{}'", module_path))
        })
}

// ============================================================================
// Exports
// ============================================================================

/// Parse `export type ...`, `export interface ...` or `export local ...`.
///
/// Only legal in the module's root block.
pub fn parse_export(parser: &mut Parser) -> Result<Statement, SyntaxError> {
    let start = parser.current_location();
    parser.expect(TokenKind::Export)?;

    if !parser.scopes.at_root() {
        return Err(SyntaxError::new(
            start,
            "exports are only allowed in the lowest scope level of the module",
        ));
    }

    let item = match parser.current().kind {
        TokenKind::Type | TokenKind::Interface => {
            let alias = if parser.check(TokenKind::Type) {
                parse_type_alias(parser)?
            } else {
                parse_interface_definition(parser)?
            };
            if let Some(scope) = parser.scopes.current_mut() {
                scope.export_types.insert(alias.name.clone(), alias.ty);
            }
            ExportedItem::Expression(Box::new(Expression::TypeAlias(alias)))
        }
        TokenKind::Local => {
            let local = parse_local_assignment(parser)?;
            for &variable in &local.variables {
                let name = parser
                    .compiler
                    .variables
                    .get(variable)
                    .map(|v| v.name.clone())
                    .unwrap_or_default();
                if let Some(scope) = parser.scopes.current_mut() {
                    scope.export_variables.insert(name, variable);
                }
            }
            ExportedItem::Statement(Box::new(Statement::Local(local)))
        }
        _ => return Err(SyntaxError::unexpected(parser.current(), "export")),
    };

    Ok(Statement::Export(ExportItem {
        item,
        location: parser.span_from(start),
    }))
}
