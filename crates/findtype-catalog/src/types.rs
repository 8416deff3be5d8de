//! Type model for the catalog.
//!
//! Declarations live in an arena owned by [`TypeCatalog`] and reference
//! each other by [`TypeId`]. Two declarations are "the same type" when
//! they canonicalize to the same defining declaration, not when their ids
//! are equal: debug info routinely emits the same struct once per
//! compilation unit, and derived types (pointers, arrays) are created
//! fresh per lookup.
//!
//! [`TypeCatalog`]: crate::TypeCatalog

use serde::{Deserialize, Serialize};

/// Handle to a declaration in the catalog arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One declaration in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Declared name, if any. Derived types are unnamed.
    pub name: Option<String>,
    pub kind: TypeKind,
}

/// cv-qualifier carried by a [`TypeKind::Qualified`] wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    Const,
    Volatile,
}

/// A field of a struct or union, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// `None` when the debug info could not resolve the field's type.
    pub ty: Option<TypeId>,
    /// Byte offset from the start of the aggregate (0 for union members).
    pub offset: usize,
    /// Static data members occupy no storage and never match.
    pub is_static: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeId, offset: usize) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            offset,
            is_static: false,
        }
    }

    /// A static data member.
    pub fn static_member(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            offset: 0,
            is_static: true,
        }
    }

    /// A field whose type the debug info failed to resolve.
    pub fn unresolved(name: impl Into<String>, offset: usize) -> Self {
        Self {
            name: name.into(),
            ty: None,
            offset,
            is_static: false,
        }
    }
}

/// The shape of a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// void type
    Void,

    /// Integer type (char, short, int, long, ...)
    Int { size: usize, signed: bool },

    /// Floating-point type (float, double, long double)
    Float { size: usize },

    /// Pointer to another type
    Pointer { pointee: TypeId },

    /// C++ reference
    Reference { referent: TypeId },

    /// Array of elements (length `None` for flexible/incomplete arrays)
    Array {
        element: TypeId,
        length: Option<usize>,
    },

    /// Structure type
    Struct {
        fields: Vec<Field>,
        size: usize,
        align: usize,
    },

    /// Union type
    Union {
        fields: Vec<Field>,
        size: usize,
        align: usize,
    },

    /// Enumeration type
    Enum {
        values: Vec<(String, i64)>,
        size: usize,
    },

    /// Function type
    Function {
        return_type: TypeId,
        parameters: Vec<TypeId>,
        variadic: bool,
    },

    /// Member function of a class
    Method { class: TypeId },

    /// C++ pointer-to-member
    MemberPointer { class: TypeId, pointee: TypeId },

    /// Namespace pseudo-declaration from debug info
    Namespace,

    /// Alias to another type
    Typedef { target: TypeId },

    /// cv-qualified wrapper around another type
    Qualified {
        qualifier: Qualifier,
        target: TypeId,
    },
}

impl TypeKind {
    /// Kinds that carry no matchable data member. Fields of these kinds
    /// are always skipped during containment matching.
    pub fn is_non_data(&self) -> bool {
        matches!(
            self,
            TypeKind::Function { .. }
                | TypeKind::Method { .. }
                | TypeKind::MemberPointer { .. }
                | TypeKind::Namespace
        )
    }

    /// Struct or union: the only kinds eligible as query candidates.
    pub fn is_composite(&self) -> bool {
        matches!(self, TypeKind::Struct { .. } | TypeKind::Union { .. })
    }
}

/// Abstract handle produced by the expression resolver.
///
/// `Decl` points at a catalog declaration; the other variants are built
/// fresh per lookup and never interned, so two resolutions of the same
/// spelling compare equal structurally, not by arena id. Identity of
/// handles goes through [`TypeCatalog::identical`], never `==` on ids.
///
/// [`TypeCatalog::identical`]: crate::TypeCatalog::identical
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHandle {
    /// A declaration in the catalog.
    Decl(TypeId),
    /// Pointer wrapper built during resolution.
    Pointer(Box<TypeHandle>),
    /// Reference wrapper built during resolution.
    Reference(Box<TypeHandle>),
    /// Array wrapper built during resolution.
    Array(Box<TypeHandle>, Option<usize>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_data_kinds() {
        assert!(TypeKind::Namespace.is_non_data());
        assert!(TypeKind::Method { class: TypeId(0) }.is_non_data());
        assert!(TypeKind::MemberPointer {
            class: TypeId(0),
            pointee: TypeId(1)
        }
        .is_non_data());
        assert!(!TypeKind::Void.is_non_data());
        assert!(!TypeKind::Pointer { pointee: TypeId(0) }.is_non_data());
    }

    #[test]
    fn composite_kinds() {
        let st = TypeKind::Struct {
            fields: Vec::new(),
            size: 0,
            align: 1,
        };
        assert!(st.is_composite());
        assert!(!TypeKind::Void.is_composite());
        assert!(!TypeKind::Enum {
            values: Vec::new(),
            size: 4
        }
        .is_composite());
    }

    #[test]
    fn field_constructors() {
        let f = Field::new("x", TypeId(3), 8);
        assert_eq!(f.offset, 8);
        assert!(!f.is_static);

        let s = Field::static_member("instance", TypeId(3));
        assert!(s.is_static);

        let u = Field::unresolved("broken", 4);
        assert!(u.ty.is_none());
    }
}
