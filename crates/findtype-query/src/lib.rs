//! # findtype-query
//!
//! Query engine over a [`findtype_catalog::TypeCatalog`]: parse a query
//! string, resolve its member requirements, and stream the composite
//! declarations that match.
//!
//! ```
//! use findtype_catalog::TypeCatalog;
//! use findtype_query::{CancelToken, QuerySpec, Search};
//!
//! let mut catalog = TypeCatalog::with_base_types();
//! let double = catalog.lookup("double").unwrap();
//! let int = catalog.lookup("int").unwrap();
//! let b = catalog.define_struct("B", &[("y", double)]);
//! catalog.define_struct("A", &[("x", int), ("b", b)]);
//!
//! let spec = QuerySpec::parse(&catalog, "size=16 member='double'").unwrap();
//! let matches: Vec<_> = Search::run(&catalog, &spec, CancelToken::new())
//!     .unwrap()
//!     .collect();
//! assert_eq!(matches, ["struct A"]);
//! ```

pub mod error;
pub mod matcher;
pub mod member;
pub mod search;
pub mod spec;

pub use error::QueryError;
pub use matcher::contains;
pub use member::{build_member_list, MemberRequirement};
pub use search::{CancelToken, Search};
pub use spec::QuerySpec;
