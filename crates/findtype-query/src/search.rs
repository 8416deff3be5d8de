//! Search driver.
//!
//! Enumerates candidate declarations from the catalog, applies the
//! size, name, and containment filters, and streams matches as they
//! are found. A cooperative cancellation token is polled before each
//! candidate so an interactive host can abort a long scan.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use findtype_catalog::{TypeCatalog, TypeId};

use crate::error::QueryError;
use crate::matcher::contains;
use crate::member::MemberRequirement;
use crate::spec::QuerySpec;

/// Cooperative cancellation signal, shared between a signal handler
/// and the running search. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Safe to call from another thread.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Lower the signal before starting a new run.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// A running search. Iterating yields the declaration text of each
/// match as soon as it is found; nothing is collected or sorted.
pub struct Search<'a> {
    catalog: &'a TypeCatalog,
    candidates: std::vec::IntoIter<TypeId>,
    size: Option<usize>,
    recursive: bool,
    members: Vec<MemberRequirement>,
    cancel: CancelToken,
}

impl<'a> Search<'a> {
    /// Start a search for `spec` over `catalog`. Compiles the name
    /// pattern up front; an invalid pattern fails here, before any
    /// candidate is examined.
    pub fn run(
        catalog: &'a TypeCatalog,
        spec: &QuerySpec,
        cancel: CancelToken,
    ) -> Result<Self, QueryError> {
        let candidates = catalog.search(spec.name.as_deref())?;
        Ok(Self {
            catalog,
            candidates: candidates.into_iter(),
            size: spec.size,
            recursive: spec.recursive,
            members: spec.members.clone(),
            cancel,
        })
    }
}

impl Iterator for Search<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if self.cancel.is_cancelled() {
                return None;
            }
            let id = self.candidates.next()?;

            if !self.catalog.is_composite(id) {
                continue;
            }
            if let Some(want) = self.size {
                if self.catalog.size_of(id) != Some(want) {
                    continue;
                }
            }
            if !self.members.is_empty()
                && !contains(self.catalog, id, &mut self.members, self.recursive)
            {
                continue;
            }

            return Some(self.catalog.display(id));
        }
    }
}
