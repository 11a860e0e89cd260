//! Variables and lexical scopes
//!
//! Variables live in a [`VariableArena`] owned by the compiler session and are
//! referred to by [`VariableId`] from scope tables, AST references and function
//! signatures alike. The parser keeps the chain of open blocks as an explicit
//! [`ScopeStack`]: entering a block pushes a [`Scope`], leaving it pops the
//! scope and hands its tables to the finished `Block` node.

use crate::parser::token::Location;
use crate::parser::types::TypeId;
use rustc_hash::FxHashMap;

/// Index of a variable in a [`VariableArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub(crate) u32);

impl VariableId {
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

/// A named, typed binding
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub ty: TypeId,
    pub location: Location,
    /// Parameter that accepts the remaining arguments (`...`)
    pub variadic: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: TypeId, location: Location) -> Self {
        Self {
            name: name.into(),
            ty,
            location,
            variadic: false,
        }
    }

    pub fn variadic(name: impl Into<String>, ty: TypeId, location: Location) -> Self {
        Self {
            variadic: true,
            ..Self::new(name, ty, location)
        }
    }
}

/// Storage for every variable of a compilation session
#[derive(Debug, Clone, Default)]
pub struct VariableArena {
    variables: Vec<Variable>,
}

impl VariableArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, variable: Variable) -> VariableId {
        let id = VariableId(self.variables.len() as u32);
        self.variables.push(variable);
        id
    }

    pub fn get(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Symbol tables of one block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub variables: FxHashMap<String, VariableId>,
    pub types: FxHashMap<String, TypeId>,
    pub export_variables: FxHashMap<String, VariableId>,
    pub export_types: FxHashMap<String, TypeId>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Error indicating a duplicate declaration in one scope
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateSymbolError {
    /// Symbol name
    pub name: String,
    /// Location of the rejected declaration
    pub duplicate: Location,
}

/// Stack of open scopes, innermost last
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    /// Close the innermost scope, returning its tables
    pub fn pop(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// True while only the module's root block is open
    pub fn at_root(&self) -> bool {
        self.scopes.len() == 1
    }

    pub fn current(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Scope> {
        self.scopes.last_mut()
    }

    /// Resolve a variable, innermost scope first
    pub fn resolve_variable(&self, name: &str) -> Option<VariableId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.variables.get(name).copied())
    }

    /// Resolve a type name, innermost scope first
    pub fn resolve_type(&self, name: &str) -> Option<TypeId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.types.get(name).copied())
    }

    /// Bind a variable in the current scope, shadowing any earlier binding
    pub fn define_variable(&mut self, name: impl Into<String>, id: VariableId) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.variables.insert(name.into(), id);
        }
    }

    /// Bind a variable that must be unique within the current scope
    pub fn declare_variable(
        &mut self,
        name: &str,
        id: VariableId,
        location: Location,
    ) -> Result<(), DuplicateSymbolError> {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };
        if scope.variables.contains_key(name) {
            return Err(DuplicateSymbolError {
                name: name.to_string(),
                duplicate: location,
            });
        }
        scope.variables.insert(name.to_string(), id);
        Ok(())
    }

    /// Bind a type name in the current scope; names are unique per scope
    pub fn define_type(
        &mut self,
        name: &str,
        ty: TypeId,
        location: Location,
    ) -> Result<(), DuplicateSymbolError> {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };
        if scope.types.contains_key(name) {
            return Err(DuplicateSymbolError {
                name: name.to_string(),
                duplicate: location,
            });
        }
        scope.types.insert(name.to_string(), ty);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::TypeContext;

    #[test]
    fn test_inner_scope_shadows_and_pops() {
        let ctx = TypeContext::new();
        let mut arena = VariableArena::new();
        let outer = arena.alloc(Variable::new("x", ctx.number_type(), Location::default()));
        let inner = arena.alloc(Variable::new("x", ctx.string_type(), Location::default()));

        let mut scopes = ScopeStack::new();
        scopes.push(Scope::new());
        scopes.define_variable("x", outer);

        scopes.push(Scope::new());
        assert!(!scopes.at_root());
        assert_eq!(scopes.resolve_variable("x"), Some(outer));
        scopes.define_variable("x", inner);
        assert_eq!(scopes.resolve_variable("x"), Some(inner));

        let closed = scopes.pop().unwrap();
        assert!(closed.variables.contains_key("x"));
        assert!(scopes.at_root());
        assert_eq!(scopes.resolve_variable("x"), Some(outer));
    }

    #[test]
    fn test_duplicate_type_in_same_scope() {
        let ctx = TypeContext::new();
        let mut scopes = ScopeStack::new();
        scopes.push(Scope::new());

        assert!(scopes
            .define_type("T", ctx.number_type(), Location::default())
            .is_ok());
        let err = scopes
            .define_type("T", ctx.string_type(), Location::default())
            .unwrap_err();
        assert_eq!(err.name, "T");

        // A nested scope may redefine it
        scopes.push(Scope::new());
        assert!(scopes
            .define_type("T", ctx.string_type(), Location::default())
            .is_ok());
        assert_eq!(scopes.resolve_type("T"), Some(ctx.string_type()));
    }

    #[test]
    fn test_declare_variable_rejects_duplicates() {
        let ctx = TypeContext::new();
        let mut arena = VariableArena::new();
        let id = arena.alloc(Variable::new("puts", ctx.any_type(), Location::default()));

        let mut scopes = ScopeStack::new();
        scopes.push(Scope::new());
        assert!(scopes.declare_variable("puts", id, Location::default()).is_ok());
        assert!(scopes.declare_variable("puts", id, Location::default()).is_err());
    }
}
