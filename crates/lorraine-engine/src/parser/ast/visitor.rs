//! AST visitor pattern for traversing the syntax tree
//!
//! Every `visit_*` method returns a [`Traversal`] that tells the matching
//! `walk_*` function whether to descend into the node's children. The default
//! for each node kind falls back to its supertype: expression kinds call
//! [`Visitor::visit_expression`], statement kinds call
//! [`Visitor::visit_statement`], and both end in [`Visitor::visit_node`],
//! which descends. A visitor therefore only overrides the kinds it cares
//! about and gets a full structural walk for everything else.
//!
//! Visitors receive nodes mutably so that passes like the validator can
//! annotate types in place.
//!
//! # Example
//!
//! ```ignore
//! use lorraine_engine::parser::ast::*;
//!
//! struct CountCalls {
//!     count: usize,
//! }
//!
//! impl Visitor for CountCalls {
//!     fn visit_call(&mut self, _call: &mut Call) -> Traversal {
//!         self.count += 1;
//!         Traversal::Descend
//!     }
//! }
//! ```

use super::*;
use crate::parser::token::Location;
use crate::parser::types::TypeId;

/// Whether a walk continues into a node's children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    Descend,
    Skip,
}

impl Traversal {
    pub fn descends(self) -> bool {
        self == Traversal::Descend
    }
}

/// AST visitor trait
pub trait Visitor: Sized {
    // Supertype handlers
    fn visit_node(&mut self, _location: Location) -> Traversal {
        Traversal::Descend
    }

    fn visit_expression(&mut self, location: Location, _ty: TypeId) -> Traversal {
        self.visit_node(location)
    }

    fn visit_statement(&mut self, location: Location) -> Traversal {
        self.visit_node(location)
    }

    // Top-level
    fn visit_module(&mut self, module: &mut Module) -> Traversal {
        self.visit_node(module.location())
    }

    // Statements
    fn visit_block(&mut self, block: &mut Block) -> Traversal {
        self.visit_statement(block.location)
    }

    fn visit_expression_statement(&mut self, stmt: &mut ExpressionStatement) -> Traversal {
        self.visit_statement(stmt.location)
    }

    fn visit_local_assignment(&mut self, stmt: &mut LocalAssignment) -> Traversal {
        self.visit_statement(stmt.location)
    }

    fn visit_export_item(&mut self, stmt: &mut ExportItem) -> Traversal {
        self.visit_statement(stmt.location)
    }

    fn visit_external_declaration(&mut self, stmt: &mut ExternalDeclaration) -> Traversal {
        self.visit_statement(stmt.location)
    }

    fn visit_extern_item(&mut self, stmt: &mut ExternItem) -> Traversal {
        self.visit_statement(stmt.location)
    }

    fn visit_import(&mut self, stmt: &mut Import) -> Traversal {
        self.visit_statement(stmt.location)
    }

    // Expressions
    fn visit_number_literal(&mut self, expr: &mut NumberLiteral) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_string_literal(&mut self, expr: &mut StringLiteral) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_boolean_literal(&mut self, expr: &mut BooleanLiteral) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_nil_literal(&mut self, expr: &mut NilLiteral) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_unresolved_identifier(&mut self, expr: &mut UnresolvedIdentifier) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_variable_reference(&mut self, expr: &mut VariableReference) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_type_wrapper(&mut self, expr: &mut TypeWrapper) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_call(&mut self, expr: &mut Call) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_name_index(&mut self, expr: &mut NameIndex) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_expression_index(&mut self, expr: &mut ExpressionIndex) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_expression_group(&mut self, expr: &mut ExpressionGroup) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_list_constructor(&mut self, expr: &mut ListConstructor) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_variable_assignment(&mut self, expr: &mut VariableAssignment) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_function_prototype(&mut self, expr: &mut FunctionPrototype) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }

    fn visit_type_alias(&mut self, expr: &mut TypeAliasDefinition) -> Traversal {
        self.visit_expression(expr.location, expr.ty)
    }
}

// ============================================================================
// Walk functions
// ============================================================================

pub fn walk_module<V: Visitor>(visitor: &mut V, module: &mut Module) {
    if visitor.visit_module(module).descends() {
        walk_block(visitor, &mut module.body);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &mut Block) {
    if visitor.visit_block(block).descends() {
        for stmt in &mut block.body {
            walk_statement(visitor, stmt);
        }
    }
}

pub fn walk_statement<V: Visitor>(visitor: &mut V, stmt: &mut Statement) {
    match stmt {
        Statement::Expression(stmt) => {
            if visitor.visit_expression_statement(stmt).descends() {
                walk_expression(visitor, &mut stmt.expression);
            }
        }
        Statement::Local(stmt) => {
            if visitor.visit_local_assignment(stmt).descends() {
                for value in &mut stmt.values {
                    walk_expression(visitor, value);
                }
            }
        }
        Statement::Export(stmt) => {
            if visitor.visit_export_item(stmt).descends() {
                match &mut stmt.item {
                    ExportedItem::Statement(inner) => walk_statement(visitor, inner),
                    ExportedItem::Expression(inner) => walk_expression(visitor, inner),
                }
            }
        }
        Statement::ExternalDeclaration(stmt) => {
            visitor.visit_external_declaration(stmt);
        }
        Statement::Extern(stmt) => {
            if visitor.visit_extern_item(stmt).descends() {
                visitor.visit_function_prototype(&mut stmt.prototype);
            }
        }
        Statement::Import(stmt) => {
            if visitor.visit_import(stmt).descends() {
                for name in &mut stmt.names {
                    walk_expression(visitor, name);
                }
                walk_module(visitor, &mut stmt.module);
            }
        }
        Statement::Block(block) => walk_block(visitor, block),
    }
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &mut Expression) {
    match expr {
        Expression::Number(e) => {
            visitor.visit_number_literal(e);
        }
        Expression::String(e) => {
            visitor.visit_string_literal(e);
        }
        Expression::Boolean(e) => {
            visitor.visit_boolean_literal(e);
        }
        Expression::Nil(e) => {
            visitor.visit_nil_literal(e);
        }
        Expression::Unresolved(e) => {
            visitor.visit_unresolved_identifier(e);
        }
        Expression::Variable(e) => {
            visitor.visit_variable_reference(e);
        }
        Expression::TypeWrapper(e) => {
            visitor.visit_type_wrapper(e);
        }
        Expression::Call(e) => {
            if visitor.visit_call(e).descends() {
                walk_expression(visitor, &mut e.callee);
                for argument in &mut e.arguments {
                    walk_expression(visitor, argument);
                }
            }
        }
        Expression::NameIndex(e) => {
            if visitor.visit_name_index(e).descends() {
                walk_expression(visitor, &mut e.object);
            }
        }
        Expression::ExpressionIndex(e) => {
            if visitor.visit_expression_index(e).descends() {
                walk_expression(visitor, &mut e.object);
                walk_expression(visitor, &mut e.index);
            }
        }
        Expression::Group(e) => {
            if visitor.visit_expression_group(e).descends() {
                walk_expression(visitor, &mut e.inner);
            }
        }
        Expression::List(e) => {
            if visitor.visit_list_constructor(e).descends() {
                for entry in &mut e.entries {
                    walk_expression(visitor, entry);
                }
            }
        }
        Expression::Assignment(e) => {
            if visitor.visit_variable_assignment(e).descends() {
                walk_expression(visitor, &mut e.value);
            }
        }
        Expression::Prototype(e) => {
            visitor.visit_function_prototype(e);
        }
        Expression::TypeAlias(e) => {
            visitor.visit_type_alias(e);
        }
    }
}
