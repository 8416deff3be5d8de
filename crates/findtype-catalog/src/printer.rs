//! Canonical one-line type rendering.
//!
//! The containment matcher's printed-text fallback and the search
//! driver's output both rely on this rendering being stable: the same
//! type prints the same text no matter which declaration slot it was
//! reached through.

use crate::catalog::TypeCatalog;
use crate::types::{Qualifier, TypeHandle, TypeId, TypeKind};

fn int_name(size: usize, signed: bool) -> &'static str {
    match (signed, size) {
        (true, 1) => "char",
        (false, 1) => "unsigned char",
        (true, 2) => "short",
        (false, 2) => "unsigned short",
        (true, 4) => "int",
        (false, 4) => "unsigned int",
        (true, 8) => "long long",
        (false, 8) => "unsigned long long",
        _ => "int",
    }
}

fn float_name(size: usize) -> &'static str {
    match size {
        4 => "float",
        8 => "double",
        16 => "long double",
        _ => "double",
    }
}

impl TypeCatalog {
    /// Canonical display text for a declaration.
    pub fn display(&self, id: TypeId) -> String {
        let def = self.get(id);
        let tagged = |tag: &str| match &def.name {
            Some(n) => format!("{} {}", tag, n),
            None => format!("{} <anonymous>", tag),
        };

        match &def.kind {
            TypeKind::Struct { .. } => tagged("struct"),
            TypeKind::Union { .. } => tagged("union"),
            TypeKind::Enum { .. } => tagged("enum"),
            TypeKind::Namespace => tagged("namespace"),
            TypeKind::Void => "void".to_string(),
            TypeKind::Int { size, signed } => def
                .name
                .clone()
                .unwrap_or_else(|| int_name(*size, *signed).to_string()),
            TypeKind::Float { size } => def
                .name
                .clone()
                .unwrap_or_else(|| float_name(*size).to_string()),
            // A typedef prints as its own name, not its target.
            TypeKind::Typedef { target } => match &def.name {
                Some(n) => n.clone(),
                None => self.display(*target),
            },
            TypeKind::Pointer { pointee } => format!("{}*", self.display(*pointee)),
            TypeKind::Reference { referent } => format!("{}&", self.display(*referent)),
            TypeKind::Array { element, length } => match length {
                Some(n) => format!("{}[{}]", self.display(*element), n),
                None => format!("{}[]", self.display(*element)),
            },
            TypeKind::Function {
                return_type,
                parameters,
                variadic,
            } => {
                let params = if parameters.is_empty() {
                    "void".to_string()
                } else {
                    let list: Vec<_> = parameters.iter().map(|p| self.display(*p)).collect();
                    if *variadic {
                        format!("{}, ...", list.join(", "))
                    } else {
                        list.join(", ")
                    }
                };
                format!("{} ({})", self.display(*return_type), params)
            }
            TypeKind::Method { class } => format!("method of {}", self.display(*class)),
            TypeKind::MemberPointer { class, pointee } => {
                format!("{} {}::*", self.display(*pointee), self.display(*class))
            }
            TypeKind::Qualified { qualifier, target } => {
                let q = match qualifier {
                    Qualifier::Const => "const",
                    Qualifier::Volatile => "volatile",
                };
                format!("{} {}", q, self.display(*target))
            }
        }
    }

    /// Canonical display text for a resolved handle.
    pub fn display_handle(&self, handle: &TypeHandle) -> String {
        match handle {
            TypeHandle::Decl(id) => self.display(*id),
            TypeHandle::Pointer(inner) => format!("{}*", self.display_handle(inner)),
            TypeHandle::Reference(inner) => format!("{}&", self.display_handle(inner)),
            TypeHandle::Array(inner, length) => match length {
                Some(n) => format!("{}[{}]", self.display_handle(inner), n),
                None => format!("{}[]", self.display_handle(inner)),
            },
        }
    }
}
