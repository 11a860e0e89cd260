//! Structural type system
//!
//! Primitives, generics, arrays, varargs, function signatures, tables and
//! interfaces, interned in a [`TypeContext`] and compared structurally.

pub mod compatibility;
pub mod context;
pub mod ty;

pub use compatibility::Compatibility;
pub use context::TypeContext;
pub use ty::{
    ArrayType, FunctionType, GenericType, InterfaceType, PrimitiveType, Property, TableType, Type,
    TypeId, VarargType,
};
