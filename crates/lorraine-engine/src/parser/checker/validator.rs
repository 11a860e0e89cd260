//! Type validator - checks and annotates a parsed module
//!
//! The validator is a [`Visitor`]: statements are intercepted at the
//! statement level and their expressions are typed by a recursive checker
//! that receives the type expected by the context (the declared type of a
//! `local`, a parameter type, a property type). That expected type is what
//! lets `{ 1, 2 }` be checked against `number[]` and `{ x = 1 }` against an
//! interface.
//!
//! The first error stops the walk; [`TypeValidator::finish`] returns it.

use crate::config::Config;
use crate::parser::ast::*;
use crate::parser::error::SyntaxError;
use crate::parser::symbols::{VariableArena, VariableId};
use crate::parser::token::Location;
use crate::parser::types::{Property, Type, TypeContext, TypeId};

/// Type validator
pub struct TypeValidator<'a> {
    type_ctx: &'a mut TypeContext,
    variables: &'a VariableArena,
    config: &'a Config,

    /// First error found; once set the walk stops descending
    error: Option<SyntaxError>,
}

impl<'a> TypeValidator<'a> {
    pub fn new(
        type_ctx: &'a mut TypeContext,
        variables: &'a VariableArena,
        config: &'a Config,
    ) -> Self {
        Self {
            type_ctx,
            variables,
            config,
            error: None,
        }
    }

    /// Consume the validator, returning the first error found
    pub fn finish(self) -> Result<(), SyntaxError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn record(&mut self, result: Result<(), SyntaxError>) -> Traversal {
        if let Err(error) = result {
            self.error.get_or_insert(error);
        }
        Traversal::Skip
    }

    fn failed(&self) -> bool {
        self.error.is_some()
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Arity, nil padding, then a pairwise `declared.is(value)` check
    fn check_local(&mut self, stmt: &mut LocalAssignment) -> Result<(), SyntaxError> {
        let values_location = match (stmt.values.first(), stmt.values.last()) {
            (Some(first), Some(last)) => first.location().to(&last.location()),
            _ => stmt.location,
        };

        if stmt.values.len() > stmt.variables.len() {
            return Err(SyntaxError::new(
                values_location,
                "too many values in local assignment",
            ));
        }

        if stmt.values.len() < stmt.variables.len() {
            if !self.config.imbalanced_local_assignments {
                return Err(SyntaxError::new(
                    values_location,
                    "too few values in local assignment",
                ));
            }

            let padding = Location::at(stmt.location.end);
            let nil = self.type_ctx.nil_type();
            stmt.values.resize_with(stmt.variables.len(), || {
                Expression::Nil(NilLiteral {
                    location: padding,
                    ty: nil,
                })
            });
        }

        for (&variable, value) in stmt.variables.iter().zip(stmt.values.iter_mut()) {
            let declared = self.variable_type(variable);
            let declared_any = self.type_ctx.is_any(declared);
            let expected = (!declared_any).then_some(declared);

            let ty = self.check_expression(value, expected)?;

            if !declared_any && !self.type_ctx.is(declared, ty) {
                return Err(SyntaxError::new(
                    value.location(),
                    format!(
                        "unable to assign variable of type '{}' a value of type '{}'",
                        self.type_ctx.display(declared),
                        self.type_ctx.display(ty)
                    ),
                ));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Type an expression in place and return its type.
    ///
    /// `expected` is the type the surrounding context wants, if any.
    fn check_expression(
        &mut self,
        expr: &mut Expression,
        expected: Option<TypeId>,
    ) -> Result<TypeId, SyntaxError> {
        let ty = match expr {
            Expression::Number(_)
            | Expression::String(_)
            | Expression::Boolean(_)
            | Expression::Nil(_)
            | Expression::TypeWrapper(_)
            | Expression::Prototype(_)
            | Expression::TypeAlias(_) => expr.ty(),

            Expression::Unresolved(e) => {
                return Err(SyntaxError::new(
                    e.location,
                    format!("unresolved identifier '{}'", e.name),
                ))
            }

            Expression::Variable(e) => self.variable_type(e.variable),

            Expression::Group(e) => self.check_expression(&mut e.inner, expected)?,

            Expression::Call(call) => self.check_call(call)?,

            Expression::NameIndex(e) => self.check_name_index(e)?,

            Expression::ExpressionIndex(e) => self.check_expression_index(e)?,

            Expression::List(list) => self.check_list(list, expected)?,

            Expression::Assignment(e) => self.check_expression(&mut e.value, expected)?,
        };

        expr.set_ty(ty);
        Ok(ty)
    }

    fn check_call(&mut self, call: &mut Call) -> Result<TypeId, SyntaxError> {
        let callee = self.check_expression(&mut call.callee, None)?;

        let function = match self.type_ctx.get(callee) {
            Some(Type::Function(function)) => function.clone(),
            _ if self.type_ctx.is_any(callee) => {
                for argument in &mut call.arguments {
                    self.check_expression(argument, None)?;
                }
                return Ok(self.type_ctx.any_type());
            }
            _ => {
                return Err(SyntaxError::new(
                    call.callee.location(),
                    format!(
                        "cannot call a value of type '{}'",
                        self.type_ctx.display(callee)
                    ),
                ))
            }
        };

        // A trailing vararg takes any number of extra arguments
        let mut fixed = function.arguments.as_slice();
        let mut rest = None;
        if let Some((&last, init)) = fixed.split_last() {
            if let Some(Type::Vararg(vararg)) = self.type_ctx.get(last) {
                rest = Some(vararg.element);
                fixed = init;
            }
        }

        let count = call.arguments.len();
        if count < fixed.len() || (rest.is_none() && count > fixed.len()) {
            return Err(SyntaxError::new(
                call.location,
                format!("expected {} arguments, got {}", fixed.len(), count),
            ));
        }

        for (index, argument) in call.arguments.iter_mut().enumerate() {
            let parameter = fixed.get(index).copied().or(rest);
            let Some(parameter) = parameter.filter(|&p| !self.type_ctx.is_any(p)) else {
                self.check_expression(argument, None)?;
                continue;
            };

            let ty = self.check_expression(argument, Some(parameter))?;
            if !self.type_ctx.is(parameter, ty) {
                return Err(self.not_assignable(argument.location(), ty, parameter));
            }
        }

        Ok(function
            .returns
            .first()
            .copied()
            .unwrap_or_else(|| self.type_ctx.void_type()))
    }

    fn check_name_index(&mut self, index: &mut NameIndex) -> Result<TypeId, SyntaxError> {
        let object = self.check_expression(&mut index.object, None)?;
        if self.type_ctx.is_any(object) {
            return Ok(object);
        }

        match self.type_ctx.get(object).and_then(|ty| ty.property(&index.name)) {
            Some(property) => Ok(property.ty),
            None => Err(SyntaxError::new(
                index.location,
                format!(
                    "property '{}' does not exist on type '{}'",
                    index.name,
                    self.type_ctx.display(object)
                ),
            )),
        }
    }

    fn check_expression_index(
        &mut self,
        index: &mut ExpressionIndex,
    ) -> Result<TypeId, SyntaxError> {
        let object = self.check_expression(&mut index.object, None)?;
        self.check_expression(&mut index.index, None)?;

        match self.type_ctx.get(object) {
            Some(Type::Array(array)) => Ok(array.element),
            Some(Type::Table(_)) | Some(Type::Interface(_)) => Ok(self.type_ctx.any_type()),
            _ if self.type_ctx.is_any(object) => Ok(object),
            _ => Err(SyntaxError::new(
                index.location,
                format!(
                    "cannot index a value of type '{}'",
                    self.type_ctx.display(object)
                ),
            )),
        }
    }

    /// Table or array constructor
    fn check_list(
        &mut self,
        list: &mut ListConstructor,
        expected: Option<TypeId>,
    ) -> Result<TypeId, SyntaxError> {
        // An empty constructor is both an empty array and an empty table
        if list.entries.is_empty() {
            let (array, table) = match expected.and_then(|id| self.type_ctx.get(id)) {
                Some(Type::Array(_)) => (true, false),
                Some(Type::Table(_)) | Some(Type::Interface(_)) => (false, true),
                _ => (false, false),
            };
            return match expected {
                Some(expected) if array => Ok(expected),
                Some(_) if table => self.check_table_constructor(list, expected),
                _ => Ok(self.type_ctx.unknown_type()),
            };
        }

        let named = list
            .entries
            .iter()
            .filter(|entry| matches!(entry, Expression::Assignment(_)))
            .count();

        if named == list.entries.len() {
            self.check_table_constructor(list, expected)
        } else if named == 0 {
            self.check_array_constructor(list, expected)
        } else {
            Err(SyntaxError::new(
                list.location,
                "cannot mix table and array constructors",
            ))
        }
    }

    /// `{ x = 1, y = "a" }` becomes `{ x: number, y: string }`.
    ///
    /// Against an expected interface the constructor takes the interface
    /// type when it provides the interface's properties.
    fn check_table_constructor(
        &mut self,
        list: &mut ListConstructor,
        expected: Option<TypeId>,
    ) -> Result<TypeId, SyntaxError> {
        let expected_ty = expected.and_then(|id| self.type_ctx.get(id).cloned());

        let mut properties = Vec::with_capacity(list.entries.len());
        for entry in &mut list.entries {
            let Expression::Assignment(assignment) = &*entry else {
                continue;
            };
            let name = self
                .variables
                .get(assignment.variable)
                .map(|variable| variable.name.clone())
                .unwrap_or_default();
            let property_expected = expected_ty
                .as_ref()
                .and_then(|ty| ty.property(&name))
                .map(|property| property.ty)
                .filter(|&ty| !self.type_ctx.is_any(ty));

            let ty = self.check_expression(entry, property_expected)?;
            properties.push(Property::new(name, ty, false));
        }

        let table = self.type_ctx.table_type(properties);

        if let (Some(expected), Some(Type::Interface(interface))) = (expected, expected_ty) {
            let shape = self.type_ctx.table_type(interface.properties);
            if self.type_ctx.is(shape, table) {
                return Ok(expected);
            }
        }

        Ok(table)
    }

    /// `{ 1, 2, 3 }` becomes `number[]`
    fn check_array_constructor(
        &mut self,
        list: &mut ListConstructor,
        expected: Option<TypeId>,
    ) -> Result<TypeId, SyntaxError> {
        let expected = expected.filter(|&ty| !self.type_ctx.is_any(ty));

        let Some(expected) = expected else {
            let mut element = None;
            let mut uniform = true;
            for entry in &mut list.entries {
                let ty = self.check_expression(entry, None)?;
                match element {
                    None => element = Some(ty),
                    Some(first) => uniform &= first == ty,
                }
            }
            let element = match element {
                Some(ty) if uniform => ty,
                _ => self.type_ctx.any_type(),
            };
            return Ok(self.type_ctx.array_type(element));
        };

        let element = match self.type_ctx.get(expected) {
            Some(Type::Array(array)) => array.element,
            _ => {
                return Err(SyntaxError::new(
                    list.location,
                    format!(
                        "cannot use array constructor on non-array type '{}'",
                        self.type_ctx.display(expected)
                    ),
                ))
            }
        };
        let element_any = self.type_ctx.is_any(element);

        for entry in &mut list.entries {
            let ty = self.check_expression(entry, (!element_any).then_some(element))?;
            if !element_any && !self.type_ctx.is(element, ty) {
                return Err(self.not_assignable(entry.location(), ty, element));
            }
        }

        Ok(expected)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn variable_type(&self, variable: VariableId) -> TypeId {
        self.variables
            .get(variable)
            .map(|variable| variable.ty)
            .unwrap_or_else(|| self.type_ctx.any_type())
    }


    fn not_assignable(&self, location: Location, ty: TypeId, target: TypeId) -> SyntaxError {
        SyntaxError::new(
            location,
            format!(
                "type '{}' is not assignable to type '{}'",
                self.type_ctx.display(ty),
                self.type_ctx.display(target)
            ),
        )
    }
}

impl Visitor for TypeValidator<'_> {
    fn visit_node(&mut self, _location: Location) -> Traversal {
        if self.failed() {
            Traversal::Skip
        } else {
            Traversal::Descend
        }
    }

    fn visit_local_assignment(&mut self, stmt: &mut LocalAssignment) -> Traversal {
        if self.failed() {
            return Traversal::Skip;
        }
        let result = self.check_local(stmt);
        self.record(result)
    }

    fn visit_expression_statement(&mut self, stmt: &mut ExpressionStatement) -> Traversal {
        if self.failed() {
            return Traversal::Skip;
        }
        let result = self.check_expression(&mut stmt.expression, None).map(|_| ());
        self.record(result)
    }

    fn visit_list_constructor(&mut self, expr: &mut ListConstructor) -> Traversal {
        if self.failed() {
            return Traversal::Skip;
        }
        let result = self.check_list(expr, None).map(|ty| expr.ty = ty);
        self.record(result)
    }

    // Linkage is the backend's concern
    fn visit_external_declaration(&mut self, _stmt: &mut ExternalDeclaration) -> Traversal {
        Traversal::Skip
    }

    fn visit_extern_item(&mut self, _stmt: &mut ExternItem) -> Traversal {
        Traversal::Skip
    }

    // Imported modules were validated when they were loaded
    fn visit_import(&mut self, _stmt: &mut Import) -> Traversal {
        Traversal::Skip
    }
}
