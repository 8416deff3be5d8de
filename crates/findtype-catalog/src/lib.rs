//! # findtype-catalog
//!
//! Type catalog for the `findtype` query engine.
//!
//! This crate provides:
//! - A type model for the declarations of a target program (structs,
//!   unions, enums, typedefs, functions, derived types)
//! - The catalog itself: an arena of declarations with name lookup,
//!   layout queries, and regex name search
//! - A canonical one-line printer for types
//! - A type-expression resolver ("struct Foo*" -> abstract handle)
//!
//! # Example
//!
//! ```
//! use findtype_catalog::TypeCatalog;
//!
//! let mut catalog = TypeCatalog::with_base_types();
//! let double = catalog.lookup("double").unwrap();
//! let b = catalog.define_struct("B", &[("y", double)]);
//!
//! assert_eq!(catalog.size_of(b), Some(8));
//! assert_eq!(catalog.display(b), "struct B");
//! ```

pub mod catalog;
pub mod printer;
pub mod resolver;
pub mod types;

pub use catalog::TypeCatalog;
pub use resolver::{resolve, ResolveError};
pub use types::{Field, Qualifier, TypeDef, TypeHandle, TypeId, TypeKind};
