//! Expression AST nodes
//!
//! This module defines every expression kind, including:
//! - Literals (numbers, strings, booleans, nil)
//! - Resolved names (variable references, types used as values)
//! - Calls, `.name` and `[expr]` indexing, parenthesized groups
//! - Table/array constructors and their `name = value` entries
//! - Declarations that live in expression position (function prototypes,
//!   type aliases)

use crate::parser::symbols::VariableId;
use crate::parser::token::Location;
use crate::parser::types::TypeId;

/// Expression (produces a value)
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Number literal: 42, 3.5, 0xFF
    Number(NumberLiteral),

    /// String literal: "hello", [[long]]
    String(StringLiteral),

    /// Boolean literal: true, false
    Boolean(BooleanLiteral),

    /// nil
    Nil(NilLiteral),

    /// A name not bound to any declaration
    Unresolved(UnresolvedIdentifier),

    /// A name bound to a variable
    Variable(VariableReference),

    /// A type used in value position: `import { Point } from "./geometry"`
    TypeWrapper(TypeWrapper),

    /// Function call: print("x"), print "x"
    Call(Call),

    /// Field access: point.x
    NameIndex(NameIndex),

    /// Index access: list[1]
    ExpressionIndex(ExpressionIndex),

    /// Parenthesized: (expr)
    Group(ExpressionGroup),

    /// Table or array constructor: { 1, 2 }, { x = 1 }
    List(ListConstructor),

    /// `name = value` entry of a table constructor
    Assignment(VariableAssignment),

    /// Function signature: puts(s: string): number
    Prototype(FunctionPrototype),

    /// type Name = Type, interface Name { ... }
    TypeAlias(TypeAliasDefinition),
}

impl Expression {
    /// Get the location of this expression
    pub fn location(&self) -> Location {
        match self {
            Expression::Number(e) => e.location,
            Expression::String(e) => e.location,
            Expression::Boolean(e) => e.location,
            Expression::Nil(e) => e.location,
            Expression::Unresolved(e) => e.location,
            Expression::Variable(e) => e.location,
            Expression::TypeWrapper(e) => e.location,
            Expression::Call(e) => e.location,
            Expression::NameIndex(e) => e.location,
            Expression::ExpressionIndex(e) => e.location,
            Expression::Group(e) => e.location,
            Expression::List(e) => e.location,
            Expression::Assignment(e) => e.location,
            Expression::Prototype(e) => e.location,
            Expression::TypeAlias(e) => e.location,
        }
    }

    /// The type currently assigned to this expression
    pub fn ty(&self) -> TypeId {
        match self {
            Expression::Number(e) => e.ty,
            Expression::String(e) => e.ty,
            Expression::Boolean(e) => e.ty,
            Expression::Nil(e) => e.ty,
            Expression::Unresolved(e) => e.ty,
            Expression::Variable(e) => e.ty,
            Expression::TypeWrapper(e) => e.ty,
            Expression::Call(e) => e.ty,
            Expression::NameIndex(e) => e.ty,
            Expression::ExpressionIndex(e) => e.ty,
            Expression::Group(e) => e.ty,
            Expression::List(e) => e.ty,
            Expression::Assignment(e) => e.ty,
            Expression::Prototype(e) => e.ty,
            Expression::TypeAlias(e) => e.ty,
        }
    }

    pub fn set_ty(&mut self, ty: TypeId) {
        let slot = match self {
            Expression::Number(e) => &mut e.ty,
            Expression::String(e) => &mut e.ty,
            Expression::Boolean(e) => &mut e.ty,
            Expression::Nil(e) => &mut e.ty,
            Expression::Unresolved(e) => &mut e.ty,
            Expression::Variable(e) => &mut e.ty,
            Expression::TypeWrapper(e) => &mut e.ty,
            Expression::Call(e) => &mut e.ty,
            Expression::NameIndex(e) => &mut e.ty,
            Expression::ExpressionIndex(e) => &mut e.ty,
            Expression::Group(e) => &mut e.ty,
            Expression::List(e) => &mut e.ty,
            Expression::Assignment(e) => &mut e.ty,
            Expression::Prototype(e) => &mut e.ty,
            Expression::TypeAlias(e) => &mut e.ty,
        };
        *slot = ty;
    }

    /// Check if this expression is a literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::Number(_)
                | Expression::String(_)
                | Expression::Boolean(_)
                | Expression::Nil(_)
                | Expression::List(_)
        )
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Expression::Call(_))
    }

    pub fn visit<V: super::Visitor>(&mut self, visitor: &mut V) {
        super::walk_expression(visitor, self);
    }
}

// ============================================================================
// Literal Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: f64,
    pub location: Location,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub location: Location,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub location: Location,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NilLiteral {
    pub location: Location,
    pub ty: TypeId,
}

// ============================================================================
// Names
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedIdentifier {
    pub name: String,
    pub location: Location,
    pub ty: TypeId,
}

/// Use of a declared variable. `ty` starts out as the variable's type.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableReference {
    pub variable: VariableId,
    pub location: Location,
    pub ty: TypeId,
}

/// A named type in value position; `ty` is the type itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeWrapper {
    pub name: String,
    pub location: Location,
    pub ty: TypeId,
}

// ============================================================================
// Calls and Indexing
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: Location,
    pub ty: TypeId,
}

/// `object.name`
#[derive(Debug, Clone, PartialEq)]
pub struct NameIndex {
    pub object: Box<Expression>,
    pub name: String,
    pub location: Location,
    pub ty: TypeId,
}

/// `object[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionIndex {
    pub object: Box<Expression>,
    pub index: Box<Expression>,
    pub location: Location,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionGroup {
    pub inner: Box<Expression>,
    pub location: Location,
    pub ty: TypeId,
}

// ============================================================================
// Constructors
// ============================================================================

/// `{ ... }` in value position.
///
/// A table constructor when every entry is an [`Expression::Assignment`], an
/// array constructor when none is.
#[derive(Debug, Clone, PartialEq)]
pub struct ListConstructor {
    pub entries: Vec<Expression>,
    pub location: Location,
    pub ty: TypeId,
}

/// `name = value` inside a table constructor
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAssignment {
    pub variable: VariableId,
    pub value: Box<Expression>,
    pub location: Location,
    pub ty: TypeId,
}

// ============================================================================
// Declarations
// ============================================================================

/// `name(a: number, ...: string): boolean`
///
/// `ty` is the function type built from the parameters and returns.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionPrototype {
    pub name: String,
    /// The function's own binding in the enclosing scope
    pub variable: VariableId,
    pub parameters: Vec<VariableId>,
    pub returns: Vec<TypeId>,
    /// Trailing `...` parameter
    pub vararg: Option<VariableId>,
    pub location: Location,
    pub ty: TypeId,
}

/// `type Name = T`; interface declarations are recorded the same way.
/// `ty` is the aliased type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDefinition {
    pub name: String,
    pub location: Location,
    pub ty: TypeId,
}
