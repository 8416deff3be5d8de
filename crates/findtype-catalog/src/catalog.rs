//! The type catalog: an arena of declarations with name lookup,
//! canonical identity, layout queries, and regex name search.

use crate::types::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pointer and reference width in bytes. The catalog assumes LP64.
const POINTER_SIZE: usize = 8;

/// A catalog of the type declarations known for a target program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeCatalog {
    /// Declarations in the order they were recorded. Enumeration order
    /// is this order, so repeated searches are deterministic.
    defs: Vec<TypeDef>,

    /// Name index. Duplicate declarations keep their own arena slot but
    /// the first registration owns the name.
    by_name: HashMap<String, TypeId>,
}

impl TypeCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog pre-seeded with the C base types.
    pub fn with_base_types() -> Self {
        let mut catalog = Self::new();
        catalog.install_base_types();
        catalog
    }

    /// Record void, the integer types, and the floating-point types.
    pub fn install_base_types(&mut self) {
        self.add_named("void", TypeKind::Void);

        let ints: &[(&str, usize, bool)] = &[
            ("char", 1, true),
            ("signed char", 1, true),
            ("unsigned char", 1, false),
            ("short", 2, true),
            ("unsigned short", 2, false),
            ("int", 4, true),
            ("unsigned int", 4, false),
            ("long", 8, true),
            ("unsigned long", 8, false),
            ("long long", 8, true),
            ("unsigned long long", 8, false),
        ];
        for &(name, size, signed) in ints {
            self.add_named(name, TypeKind::Int { size, signed });
        }

        for &(name, size) in &[("float", 4usize), ("double", 8), ("long double", 16)] {
            self.add_named(name, TypeKind::Float { size });
        }
    }

    // ==================== Declaration management ====================

    /// Record a declaration. A name that is already bound stays bound to
    /// its first declaration: later duplicates (the same struct emitted
    /// by another compilation unit) get their own arena slot without
    /// stealing the name.
    pub fn add(&mut self, def: TypeDef) -> TypeId {
        let id = TypeId(self.defs.len() as u32);
        if let Some(name) = &def.name {
            self.by_name.entry(name.clone()).or_insert(id);
        }
        self.defs.push(def);
        id
    }

    pub fn add_named(&mut self, name: impl Into<String>, kind: TypeKind) -> TypeId {
        self.add(TypeDef {
            name: Some(name.into()),
            kind,
        })
    }

    pub fn add_anon(&mut self, kind: TypeKind) -> TypeId {
        self.add(TypeDef { name: None, kind })
    }

    /// Record a pointer to `pointee`. Every call creates a fresh slot;
    /// identity of derived types is structural, not by id.
    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        self.add_anon(TypeKind::Pointer { pointee })
    }

    pub fn reference_to(&mut self, referent: TypeId) -> TypeId {
        self.add_anon(TypeKind::Reference { referent })
    }

    pub fn array_of(&mut self, element: TypeId, length: Option<usize>) -> TypeId {
        self.add_anon(TypeKind::Array { element, length })
    }

    pub fn typedef_of(&mut self, name: impl Into<String>, target: TypeId) -> TypeId {
        self.add_named(name, TypeKind::Typedef { target })
    }

    pub fn qualified(&mut self, qualifier: Qualifier, target: TypeId) -> TypeId {
        self.add_anon(TypeKind::Qualified { qualifier, target })
    }

    /// Get a declaration by id.
    pub fn get(&self, id: TypeId) -> &TypeDef {
        &self.defs[id.index()]
    }

    /// Mutable access to a declaration, for loaders that patch forward
    /// references (a self-referential struct needs its pointer type to
    /// exist before its field list can be completed).
    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeDef {
        &mut self.defs[id.index()]
    }

    /// Look a declaration up by name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    // ==================== Identity ====================

    /// Strip typedef and cv-qualifier wrappers down to the defining
    /// declaration. The wrapper chain is acyclic by construction.
    pub fn canonical(&self, mut id: TypeId) -> TypeId {
        loop {
            match &self.get(id).kind {
                TypeKind::Typedef { target } => id = *target,
                TypeKind::Qualified { target, .. } => id = *target,
                _ => return id,
            }
        }
    }

    /// Rewrite a handle so that every `Decl` is canonical and declared
    /// pointer/reference/array nodes become structural wrappers.
    fn normalize(&self, handle: &TypeHandle) -> TypeHandle {
        match handle {
            TypeHandle::Decl(id) => {
                let id = self.canonical(*id);
                match &self.get(id).kind {
                    TypeKind::Pointer { pointee } => {
                        TypeHandle::Pointer(Box::new(self.normalize(&TypeHandle::Decl(*pointee))))
                    }
                    TypeKind::Reference { referent } => TypeHandle::Reference(Box::new(
                        self.normalize(&TypeHandle::Decl(*referent)),
                    )),
                    TypeKind::Array { element, length } => TypeHandle::Array(
                        Box::new(self.normalize(&TypeHandle::Decl(*element))),
                        *length,
                    ),
                    _ => TypeHandle::Decl(id),
                }
            }
            TypeHandle::Pointer(inner) => TypeHandle::Pointer(Box::new(self.normalize(inner))),
            TypeHandle::Reference(inner) => TypeHandle::Reference(Box::new(self.normalize(inner))),
            TypeHandle::Array(inner, length) => {
                TypeHandle::Array(Box::new(self.normalize(inner)), *length)
            }
        }
    }

    /// Structural type identity: two handles are identical when they
    /// bottom out in the same canonical defining declaration under the
    /// same shape. Looks through typedefs, cv-qualifiers, and per-lookup
    /// pointer/reference/array wrappers.
    pub fn identical(&self, a: &TypeHandle, b: &TypeHandle) -> bool {
        self.normalize(a) == self.normalize(b)
    }

    /// Identity between a declared type and a resolved handle.
    pub fn identical_decl(&self, id: TypeId, handle: &TypeHandle) -> bool {
        self.identical(&TypeHandle::Decl(id), handle)
    }

    // ==================== Layout ====================

    /// Size of a type in bytes. `None` for incomplete and non-data kinds.
    pub fn size_of(&self, id: TypeId) -> Option<usize> {
        match &self.get(id).kind {
            TypeKind::Void
            | TypeKind::Function { .. }
            | TypeKind::Method { .. }
            | TypeKind::Namespace => None,
            TypeKind::Int { size, .. } | TypeKind::Float { size } => Some(*size),
            TypeKind::Pointer { .. }
            | TypeKind::Reference { .. }
            | TypeKind::MemberPointer { .. } => Some(POINTER_SIZE),
            TypeKind::Array { element, length } => {
                Some(self.size_of(*element)? * (*length)?)
            }
            TypeKind::Struct { size, .. }
            | TypeKind::Union { size, .. }
            | TypeKind::Enum { size, .. } => Some(*size),
            TypeKind::Typedef { target } | TypeKind::Qualified { target, .. } => {
                self.size_of(*target)
            }
        }
    }

    /// Alignment of a type in bytes.
    pub fn align_of(&self, id: TypeId) -> Option<usize> {
        match &self.get(id).kind {
            TypeKind::Void
            | TypeKind::Function { .. }
            | TypeKind::Method { .. }
            | TypeKind::Namespace => None,
            TypeKind::Int { size, .. }
            | TypeKind::Float { size }
            | TypeKind::Enum { size, .. } => Some((*size).min(8)),
            TypeKind::Pointer { .. }
            | TypeKind::Reference { .. }
            | TypeKind::MemberPointer { .. } => Some(POINTER_SIZE),
            TypeKind::Array { element, .. } => self.align_of(*element),
            TypeKind::Struct { align, .. } | TypeKind::Union { align, .. } => Some(*align),
            TypeKind::Typedef { target } | TypeKind::Qualified { target, .. } => {
                self.align_of(*target)
            }
        }
    }

    // ==================== Fields ====================

    /// Fields of the canonical struct or union behind `id`, in
    /// declaration order. `None` for every other kind; pointers and
    /// references have no field list, which is what terminates recursive
    /// matching at indirection.
    pub fn fields(&self, id: TypeId) -> Option<&[Field]> {
        match &self.get(self.canonical(id)).kind {
            TypeKind::Struct { fields, .. } | TypeKind::Union { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Whether `id` itself is a struct or union declaration. Deliberately
    /// not canonicalized: a typedef is never a query candidate even when
    /// its target is a composite.
    pub fn is_composite(&self, id: TypeId) -> bool {
        self.get(id).kind.is_composite()
    }

    /// Whether the canonical type behind `id` is a non-data kind.
    pub fn is_non_data(&self, id: TypeId) -> bool {
        self.get(self.canonical(id)).kind.is_non_data()
    }

    // ==================== Aggregate builders ====================

    /// Define a struct, computing field offsets, alignment, and trailing
    /// padding from the field types.
    pub fn define_struct(&mut self, name: impl Into<String>, fields: &[(&str, TypeId)]) -> TypeId {
        let mut out = Vec::with_capacity(fields.len());
        let mut size = 0usize;
        let mut align = 1usize;

        for &(fname, fty) in fields {
            let fsize = self.size_of(fty).unwrap_or(0);
            let falign = self.align_of(fty).unwrap_or(1);
            let offset = (size + falign - 1) & !(falign - 1);

            out.push(Field::new(fname, fty, offset));

            size = offset + fsize;
            align = align.max(falign);
        }

        if align > 1 {
            size = (size + align - 1) & !(align - 1);
        }

        self.add_named(
            name,
            TypeKind::Struct {
                fields: out,
                size,
                align,
            },
        )
    }

    /// Define a union: every member at offset 0, size the padded maximum.
    pub fn define_union(&mut self, name: impl Into<String>, fields: &[(&str, TypeId)]) -> TypeId {
        let mut out = Vec::with_capacity(fields.len());
        let mut size = 0usize;
        let mut align = 1usize;

        for &(fname, fty) in fields {
            out.push(Field::new(fname, fty, 0));
            size = size.max(self.size_of(fty).unwrap_or(0));
            align = align.max(self.align_of(fty).unwrap_or(1));
        }

        if align > 1 {
            size = (size + align - 1) & !(align - 1);
        }

        self.add_named(
            name,
            TypeKind::Union {
                fields: out,
                size,
                align,
            },
        )
    }

    // ==================== Search ====================

    /// Named declarations whose name matches `pattern`, in declaration
    /// order. `None` returns every named declaration. Pattern semantics
    /// are plain regex.
    pub fn search(&self, pattern: Option<&str>) -> Result<Vec<TypeId>, regex::Error> {
        let re = pattern.map(Regex::new).transpose()?;
        Ok(self
            .defs
            .iter()
            .enumerate()
            .filter_map(|(i, def)| {
                let name = def.name.as_deref()?;
                match &re {
                    Some(re) if !re.is_match(name) => None,
                    _ => Some(TypeId(i as u32)),
                }
            })
            .collect())
    }

    // ==================== Serialization ====================

    /// Save the catalog to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
