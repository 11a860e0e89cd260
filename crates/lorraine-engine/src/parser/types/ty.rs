//! Core type definitions for the Lua++ type system

use std::fmt;

/// Unique identifier for an interned type in a [`TypeContext`].
///
/// [`TypeContext`]: super::TypeContext
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Get the raw value of this TypeId
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Primitive types.
///
/// The declaration order is also the order they are pre-interned in, so a
/// primitive's `TypeId` is its discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Number,
    Boolean,
    /// Opts a declaration out of compatibility checking
    Any,
    Nil,
    /// Result of a function with no return values
    Void,
    /// Not yet inferred (the empty `{}` constructor, for instance)
    Unknown,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 7] = [
        PrimitiveType::String,
        PrimitiveType::Number,
        PrimitiveType::Boolean,
        PrimitiveType::Any,
        PrimitiveType::Nil,
        PrimitiveType::Void,
        PrimitiveType::Unknown,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Any => "any",
            PrimitiveType::Nil => "nil",
            PrimitiveType::Void => "void",
            PrimitiveType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Placeholder for a generic parameter: `T` in `interface Box<T>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericType {
    pub name: String,
}

/// `T[]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    pub element: TypeId,
}

/// `...T`: zero or more values of `element`, only legal last in a type list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarargType {
    pub element: TypeId,
}

/// `(T1, T2) => R`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub arguments: Vec<TypeId>,
    pub returns: Vec<TypeId>,
}

/// A named, possibly optional, member of a table or interface type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeId, optional: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            optional,
        }
    }
}

/// Structural record type: `{ x: number, label?: string }`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableType {
    /// Properties in declaration order
    pub properties: Vec<Property>,
}

impl TableType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Named structural type with generic parameters.
///
/// `generics` holds the parameter placeholders for a declaration, or the
/// concrete arguments once instantiated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceType {
    pub name: String,
    pub generics: Vec<TypeId>,
    pub properties: Vec<Property>,
}

impl InterfaceType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A type. Immutable once interned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveType),
    Generic(GenericType),
    Array(ArrayType),
    Vararg(VarargType),
    Function(FunctionType),
    Table(TableType),
    Interface(InterfaceType),
}

impl Type {
    pub fn is_primitive(&self, kind: PrimitiveType) -> bool {
        matches!(self, Type::Primitive(p) if *p == kind)
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            Type::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Property lookup for record-like types (tables and interfaces)
    pub fn property(&self, name: &str) -> Option<&Property> {
        match self {
            Type::Table(table) => table.property(name),
            Type::Interface(interface) => interface.property(name),
            _ => None,
        }
    }
}
