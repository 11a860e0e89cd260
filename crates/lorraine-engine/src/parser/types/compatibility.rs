//! Structural compatibility ("is-a") between types
//!
//! `a.is(b)` reads "a value of type `b` may be used where `a` is declared".
//! Tables are width-subtyped (`b` may carry extra properties, and `a`'s
//! optional properties may be missing from `b`); functions compare
//! positionally; interfaces compare nominally.

use super::context::TypeContext;
use super::ty::{Type, TableType, TypeId};

/// Context for checking compatibility
#[derive(Debug, Clone, Copy)]
pub struct Compatibility<'a> {
    type_ctx: &'a TypeContext,
}

impl<'a> Compatibility<'a> {
    pub fn new(type_ctx: &'a TypeContext) -> Self {
        Self { type_ctx }
    }

    /// Check whether `ty` is compatible with `other`
    pub fn is(&self, ty: TypeId, other: TypeId) -> bool {
        if ty == other {
            return true;
        }

        let (Some(left), Some(right)) = (self.type_ctx.get(ty), self.type_ctx.get(other)) else {
            return false;
        };

        match (left, right) {
            (Type::Primitive(a), Type::Primitive(b)) => a == b,

            (Type::Generic(a), Type::Generic(b)) => a.name == b.name,

            (Type::Table(a), Type::Table(b)) => self.table_is(a, b),

            (Type::Function(a), Type::Function(b)) => {
                self.pairwise(&a.arguments, &b.arguments) && self.pairwise(&a.returns, &b.returns)
            }

            (Type::Array(a), Type::Array(b)) => self.is(a.element, b.element),

            (Type::Vararg(a), Type::Vararg(b)) => self.is(a.element, b.element),

            // Generic arguments are not compared at this layer
            (Type::Interface(a), Type::Interface(b)) => {
                a.name == b.name && a.generics.len() == b.generics.len()
            }

            _ => false,
        }
    }

    /// Every property of the declared side is either optional or matched by a
    /// compatible property of the same name on the other side.
    fn table_is(&self, declared: &TableType, value: &TableType) -> bool {
        declared.properties.iter().all(|property| match value.property(&property.name) {
            Some(found) => self.is(property.ty, found.ty),
            None => property.optional,
        })
    }

    fn pairwise(&self, left: &[TypeId], right: &[TypeId]) -> bool {
        left.len() == right.len() && left.iter().zip(right).all(|(&a, &b)| self.is(a, b))
    }
}
