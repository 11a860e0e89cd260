//! Type context for managing types and type interning

use super::compatibility::Compatibility;
use super::ty::{
    ArrayType, FunctionType, GenericType, InterfaceType, PrimitiveType, Property, TableType, Type,
    TypeId, VarargType,
};
use crate::parser::error::SyntaxError;
use crate::parser::token::Location;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Type context that owns every type of a compilation session
///
/// Types are interned: structurally identical types share a `TypeId`, and an
/// interned type is never modified afterwards. AST nodes and scope tables hold
/// ids, never the types themselves.
#[derive(Debug, Clone)]
pub struct TypeContext {
    /// Storage for all types, indexed by TypeId
    types: Vec<Arc<Type>>,

    /// Reverse mapping from Type to TypeId for interning
    type_to_id: FxHashMap<Type, TypeId>,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    /// Create a context with every primitive pre-interned
    pub fn new() -> Self {
        let mut ctx = TypeContext {
            types: Vec::new(),
            type_to_id: FxHashMap::default(),
        };

        for primitive in PrimitiveType::ALL {
            ctx.intern(Type::Primitive(primitive));
        }

        ctx
    }

    /// Intern a type, returning its TypeId
    ///
    /// If the type already exists, returns the existing TypeId.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.type_to_id.get(&ty) {
            return id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(Arc::new(ty.clone()));
        self.type_to_id.insert(ty, id);
        id
    }

    /// Get a type by its TypeId
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0 as usize).map(|arc| arc.as_ref())
    }

    /// Shared handle to an interned type
    pub fn get_shared(&self, id: TypeId) -> Option<Arc<Type>> {
        self.types.get(id.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// Primitives are interned first, in declaration order
    pub fn primitive(&self, kind: PrimitiveType) -> TypeId {
        TypeId(kind as u32)
    }

    pub fn string_type(&self) -> TypeId {
        self.primitive(PrimitiveType::String)
    }

    pub fn number_type(&self) -> TypeId {
        self.primitive(PrimitiveType::Number)
    }

    pub fn boolean_type(&self) -> TypeId {
        self.primitive(PrimitiveType::Boolean)
    }

    pub fn any_type(&self) -> TypeId {
        self.primitive(PrimitiveType::Any)
    }

    pub fn nil_type(&self) -> TypeId {
        self.primitive(PrimitiveType::Nil)
    }

    pub fn void_type(&self) -> TypeId {
        self.primitive(PrimitiveType::Void)
    }

    pub fn unknown_type(&self) -> TypeId {
        self.primitive(PrimitiveType::Unknown)
    }

    pub fn generic_type(&mut self, name: impl Into<String>) -> TypeId {
        self.intern(Type::Generic(GenericType { name: name.into() }))
    }

    pub fn array_type(&mut self, element: TypeId) -> TypeId {
        self.intern(Type::Array(ArrayType { element }))
    }

    pub fn vararg_type(&mut self, element: TypeId) -> TypeId {
        self.intern(Type::Vararg(VarargType { element }))
    }

    pub fn function_type(&mut self, arguments: Vec<TypeId>, returns: Vec<TypeId>) -> TypeId {
        self.intern(Type::Function(FunctionType { arguments, returns }))
    }

    pub fn table_type(&mut self, properties: Vec<Property>) -> TypeId {
        self.intern(Type::Table(TableType { properties }))
    }

    pub fn interface_type(
        &mut self,
        name: impl Into<String>,
        generics: Vec<TypeId>,
        properties: Vec<Property>,
    ) -> TypeId {
        self.intern(Type::Interface(InterfaceType {
            name: name.into(),
            generics,
            properties,
        }))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_any(&self, id: TypeId) -> bool {
        id == self.any_type()
    }

    /// Structural compatibility, see [`Compatibility::is`]
    pub fn is(&self, ty: TypeId, other: TypeId) -> bool {
        Compatibility::new(self).is(ty, other)
    }

    /// Fails if a vararg appears anywhere but last in `list`
    pub fn validate(&self, list: &[TypeId], location: Location) -> Result<(), SyntaxError> {
        let last = list.len().saturating_sub(1);
        let misplaced = list
            .iter()
            .enumerate()
            .any(|(i, &id)| i != last && matches!(self.get(id), Some(Type::Vararg(_))));

        if misplaced {
            return Err(SyntaxError::new(
                location,
                "vararg must be the last type in a type list",
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Generics
    // ========================================================================

    /// Instantiate a generic interface declaration with concrete arguments.
    ///
    /// Returns `None` if `declaration` is not an interface or the argument
    /// count differs from its parameter count.
    pub fn instantiate(&mut self, declaration: TypeId, arguments: Vec<TypeId>) -> Option<TypeId> {
        let Some(Type::Interface(interface)) = self.get(declaration).cloned() else {
            return None;
        };
        if interface.generics.len() != arguments.len() {
            return None;
        }

        let mut bindings = FxHashMap::default();
        for (&parameter, &argument) in interface.generics.iter().zip(&arguments) {
            if let Some(Type::Generic(generic)) = self.get(parameter) {
                bindings.insert(generic.name.clone(), argument);
            }
        }

        let properties = self.substitute_properties(&interface.properties, &bindings);
        Some(self.interface_type(interface.name, arguments, properties))
    }

    fn substitute(&mut self, id: TypeId, bindings: &FxHashMap<String, TypeId>) -> TypeId {
        let Some(ty) = self.get(id).cloned() else {
            return id;
        };

        match ty {
            Type::Primitive(_) => id,
            Type::Generic(generic) => bindings.get(&generic.name).copied().unwrap_or(id),
            Type::Array(array) => {
                let element = self.substitute(array.element, bindings);
                self.array_type(element)
            }
            Type::Vararg(vararg) => {
                let element = self.substitute(vararg.element, bindings);
                self.vararg_type(element)
            }
            Type::Function(function) => {
                let arguments = function
                    .arguments
                    .iter()
                    .map(|&arg| self.substitute(arg, bindings))
                    .collect();
                let returns = function
                    .returns
                    .iter()
                    .map(|&ret| self.substitute(ret, bindings))
                    .collect();
                self.function_type(arguments, returns)
            }
            Type::Table(table) => {
                let properties = self.substitute_properties(&table.properties, bindings);
                self.table_type(properties)
            }
            Type::Interface(interface) => {
                let generics = interface
                    .generics
                    .iter()
                    .map(|&g| self.substitute(g, bindings))
                    .collect();
                let properties = self.substitute_properties(&interface.properties, bindings);
                self.interface_type(interface.name, generics, properties)
            }
        }
    }

    fn substitute_properties(
        &mut self,
        properties: &[Property],
        bindings: &FxHashMap<String, TypeId>,
    ) -> Vec<Property> {
        properties
            .iter()
            .map(|property| {
                let ty = self.substitute(property.ty, bindings);
                Property::new(property.name.clone(), ty, property.optional)
            })
            .collect()
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Render a type the way diagnostics show it
    pub fn display(&self, id: TypeId) -> String {
        let Some(ty) = self.get(id) else {
            return format!("InvalidType({})", id.0);
        };

        match ty {
            Type::Primitive(primitive) => primitive.name().to_string(),
            Type::Generic(generic) => generic.name.clone(),
            Type::Array(array) => format!("{}[]", self.display(array.element)),
            Type::Vararg(vararg) => format!("...{}", self.display(vararg.element)),
            Type::Function(function) => {
                let returns = if function.returns.is_empty() {
                    "void".to_string()
                } else {
                    self.display_list(&function.returns)
                };
                format!("({}): {}", self.display_list(&function.arguments), returns)
            }
            Type::Table(table) => self.display_properties(&table.properties),
            Type::Interface(interface) => {
                if interface.generics.is_empty() {
                    interface.name.clone()
                } else {
                    format!("{}<{}>", interface.name, self.display_list(&interface.generics))
                }
            }
        }
    }

    pub fn display_list(&self, ids: &[TypeId]) -> String {
        ids.iter()
            .map(|&id| self.display(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn display_properties(&self, properties: &[Property]) -> String {
        if properties.is_empty() {
            return "{}".to_string();
        }

        let body = properties
            .iter()
            .map(|p| {
                format!(
                    "{}{}: {}",
                    p.name,
                    if p.optional { "?" } else { "" },
                    self.display(p.ty)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{ {} }}", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_interning() {
        let mut ctx = TypeContext::new();
        let number = ctx.number_type();

        let a = ctx.array_type(number);
        let b = ctx.array_type(number);
        assert_eq!(a, b);

        let before = ctx.len();
        ctx.function_type(vec![number], vec![]);
        ctx.function_type(vec![number], vec![]);
        assert_eq!(ctx.len(), before + 1);
    }

    #[test]
    fn test_primitive_ids_are_stable() {
        let ctx = TypeContext::new();
        for primitive in PrimitiveType::ALL {
            let id = ctx.primitive(primitive);
            assert_eq!(ctx.get(id), Some(&Type::Primitive(primitive)));
        }
    }

    #[test]
    fn test_display() {
        let mut ctx = TypeContext::new();
        let number = ctx.number_type();
        let string = ctx.string_type();
        let boolean = ctx.boolean_type();

        assert_eq!(ctx.display(number), "number");
        assert_eq!(ctx.display(ctx.unknown_type()), "unknown");

        let array = ctx.array_type(number);
        assert_eq!(ctx.display(array), "number[]");

        let vararg = ctx.vararg_type(string);
        assert_eq!(ctx.display(vararg), "...string");

        let function = ctx.function_type(vec![number, string], vec![boolean, number]);
        assert_eq!(ctx.display(function), "(number, string): boolean, number");

        let procedure = ctx.function_type(vec![], vec![]);
        assert_eq!(ctx.display(procedure), "(): void");

        let table = ctx.table_type(vec![
            Property::new("name", string, false),
            Property::new("age", number, true),
        ]);
        assert_eq!(ctx.display(table), "{ name: string, age?: number }");

        let empty = ctx.table_type(vec![]);
        assert_eq!(ctx.display(empty), "{}");

        let t = ctx.generic_type("T");
        let u = ctx.generic_type("U");
        let pair = ctx.interface_type("Pair", vec![t, u], vec![]);
        assert_eq!(ctx.display(pair), "Pair<T, U>");
    }

    #[test]
    fn test_validate_vararg_position() {
        let mut ctx = TypeContext::new();
        let number = ctx.number_type();
        let string = ctx.string_type();
        let rest = ctx.vararg_type(string);
        let loc = Location::default();

        assert!(ctx.validate(&[number, rest], loc).is_ok());
        assert!(ctx.validate(&[rest], loc).is_ok());
        assert!(ctx.validate(&[], loc).is_ok());

        let err = ctx.validate(&[rest, number], loc).unwrap_err();
        assert_eq!(err.message, "vararg must be the last type in a type list");
        assert!(ctx.validate(&[number, rest, number], loc).is_err());
        assert!(ctx.validate(&[rest, rest], loc).is_err());
    }

    #[test]
    fn test_instantiate_substitutes_properties() {
        let mut ctx = TypeContext::new();
        let number = ctx.number_type();
        let t = ctx.generic_type("T");
        let list_of_t = ctx.array_type(t);
        let declaration = ctx.interface_type(
            "Stack",
            vec![t],
            vec![Property::new("items", list_of_t, false)],
        );

        let instance = ctx.instantiate(declaration, vec![number]).unwrap();
        assert_eq!(ctx.display(instance), "Stack<number>");

        let items = ctx.get(instance).and_then(|ty| ty.property("items")).unwrap().ty;
        assert_eq!(ctx.display(items), "number[]");

        assert_eq!(ctx.instantiate(declaration, vec![]), None);
        assert_eq!(ctx.instantiate(number, vec![number]), None);
    }
}
