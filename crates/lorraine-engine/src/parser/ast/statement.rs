//! Statement AST nodes
//!
//! This module defines all statement types, including:
//! - Expression statements (calls, type aliases)
//! - Local declarations
//! - Import/export declarations
//! - Foreign (`extern`) declarations
//! - Nested blocks

use super::expression::{Expression, FunctionPrototype};
use super::{Block, Module};
use crate::parser::symbols::VariableId;
use crate::parser::token::Location;

/// Top-level or block-level statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Expression statement: a call, or a type alias definition
    Expression(ExpressionStatement),

    /// local a: number, b = 1, "x"
    Local(LocalAssignment),

    /// export type T = ..., export local x = ...
    Export(ExportItem),

    /// extern name: Type
    ExternalDeclaration(ExternalDeclaration),

    /// extern function name(params): returns
    Extern(ExternItem),

    /// import { a, B } from "./module"
    Import(Import),

    /// do ... end
    Block(Block),
}

impl Statement {
    /// Get the location of this statement
    pub fn location(&self) -> Location {
        match self {
            Statement::Expression(s) => s.location,
            Statement::Local(s) => s.location,
            Statement::Export(s) => s.location,
            Statement::ExternalDeclaration(s) => s.location,
            Statement::Extern(s) => s.location,
            Statement::Import(s) => s.location,
            Statement::Block(s) => s.location,
        }
    }

    pub fn visit<V: super::Visitor>(&mut self, visitor: &mut V) {
        super::walk_statement(visitor, self);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalAssignment {
    pub variables: Vec<VariableId>,
    pub values: Vec<Expression>,
    pub location: Location,
}

/// What an `export` wraps
#[derive(Debug, Clone, PartialEq)]
pub enum ExportedItem {
    Statement(Box<Statement>),
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportItem {
    pub item: ExportedItem,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalDeclaration {
    pub variable: VariableId,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternItem {
    pub prototype: FunctionPrototype,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// One `VariableReference` or `TypeWrapper` per imported name
    pub names: Vec<Expression>,
    pub module: Box<Module>,
    pub location: Location,
}
