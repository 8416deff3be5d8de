//! Containment matching.
//!
//! Decides whether one candidate composite type contains a field for
//! every requirement in the query's member list, optionally walking
//! into nested struct and union fields. Recursion stops at indirection:
//! a pointer field is a matchable field itself but its pointee's fields
//! are never walked.

use findtype_catalog::{resolve, Field, TypeCatalog, TypeHandle, TypeId};

use crate::member::MemberRequirement;

struct Frame<'a> {
    fields: &'a [Field],
    next: usize,
}

/// Whether `candidate` contains a field satisfying every requirement.
///
/// Every `marked` flag is reset on entry, so the same requirement list
/// can be reused across successive candidates. Each field marks at most
/// one requirement; duplicate requirements therefore need distinct
/// fields. With an empty requirement list containment is vacuously
/// satisfied.
pub fn contains(
    catalog: &TypeCatalog,
    candidate: TypeId,
    members: &mut [MemberRequirement],
    recursive: bool,
) -> bool {
    for req in members.iter_mut() {
        req.marked = false;
    }
    if members.is_empty() {
        return true;
    }

    let Some(root) = catalog.fields(candidate) else {
        return false;
    };

    // Explicit work stack; one frame per composite being walked.
    let mut stack = vec![Frame {
        fields: root,
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let fields = frame.fields;
        if frame.next >= fields.len() {
            stack.pop();
            continue;
        }
        let field = &fields[frame.next];
        frame.next += 1;

        if field.is_static {
            continue;
        }
        let Some(field_ty) = field.ty else {
            log::debug!("skipping field '{}' with unresolved type", field.name);
            continue;
        };
        if catalog.is_non_data(field_ty) {
            continue;
        }

        if mark_first(catalog, field_ty, members) && members.iter().all(|r| r.marked) {
            return true;
        }

        // Nested composites are walked whether or not the field itself
        // just marked a requirement.
        if recursive {
            if let Some(children) = catalog.fields(field_ty) {
                stack.push(Frame {
                    fields: children,
                    next: 0,
                });
            }
        }
    }

    members.iter().all(|r| r.marked)
}

/// Mark the first unmarked requirement this field type satisfies.
fn mark_first(catalog: &TypeCatalog, field_ty: TypeId, members: &mut [MemberRequirement]) -> bool {
    for req in members.iter_mut().filter(|r| !r.marked) {
        if satisfies(catalog, field_ty, req) {
            req.marked = true;
            return true;
        }
    }
    false
}

fn satisfies(catalog: &TypeCatalog, field_ty: TypeId, req: &MemberRequirement) -> bool {
    let Some(resolved) = &req.resolved else {
        return false;
    };

    if catalog.identical_decl(field_ty, resolved) {
        return true;
    }

    // Fallback for declarations the primary identity cannot bridge, such
    // as the same struct emitted separately by two compilation units:
    // when the field prints exactly as the requirement's canonical text,
    // re-resolve that text and require identity of the fresh handle.
    let printed = catalog.display(field_ty);
    if printed != req.canonical_text {
        return false;
    }
    match resolve(catalog, &printed) {
        Ok(fresh) => catalog.identical(&fresh, resolved),
        Err(_) => false,
    }
}
