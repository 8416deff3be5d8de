//! Member requirement list construction.

use findtype_catalog::{resolve, TypeCatalog, TypeHandle};

use crate::error::QueryError;

/// One member type a query demands the candidate contain.
#[derive(Debug, Clone)]
pub struct MemberRequirement {
    /// Canonical rendering of the resolved type. The containment
    /// matcher's fallback compares printed field types against this.
    pub canonical_text: String,
    /// Abstract handle from resolution.
    pub resolved: Option<TypeHandle>,
    /// Set during a containment test when some field satisfied this
    /// requirement. Reset at the start of every test.
    pub marked: bool,
}

/// Build the requirement list from a `member=` value.
///
/// The value is split on `;` (one trailing separator is tolerated) and
/// every segment is resolved independently. Any resolution failure
/// aborts the whole build; no partial list is returned.
pub fn build_member_list(
    catalog: &TypeCatalog,
    value: &str,
) -> Result<Vec<MemberRequirement>, QueryError> {
    let list = value.strip_suffix(';').unwrap_or(value);

    let mut members = Vec::new();
    for segment in list.split(';') {
        let segment = segment.trim();
        let handle = resolve(catalog, segment).map_err(|source| QueryError::Resolution {
            expr: segment.to_string(),
            source,
        })?;

        let printed = catalog.display_handle(&handle);
        let canonical_text = if printed.is_empty() {
            segment.to_string()
        } else {
            printed
        };

        members.push(MemberRequirement {
            canonical_text,
            resolved: Some(handle),
            marked: false,
        });
    }

    Ok(members)
}
