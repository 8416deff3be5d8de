//! End-to-end query tests.
//!
//! These tests exercise the full pipeline from query string through spec
//! parsing, member resolution, containment matching, and the streaming
//! search driver, against a small hand-built catalog.

use findtype_catalog::{Field, TypeCatalog, TypeKind};
use findtype_query::{CancelToken, QueryError, QuerySpec, Search};

/// A catalog shaped like a small debugged program:
///
/// ```c
/// struct B { double y; };             // size 8
/// struct A { int x; struct B b; };    // size 16
/// struct list { int v; struct list *next; };
/// union word { int i; float f; };
/// ```
fn sample_catalog() -> TypeCatalog {
    let mut c = TypeCatalog::with_base_types();
    let int = c.lookup("int").unwrap();
    let flt = c.lookup("float").unwrap();
    let dbl = c.lookup("double").unwrap();

    let b = c.define_struct("B", &[("y", dbl)]);
    c.define_struct("A", &[("x", int), ("b", b)]);

    let list = c.add_named(
        "list",
        TypeKind::Struct {
            fields: Vec::new(),
            size: 16,
            align: 8,
        },
    );
    let plist = c.pointer_to(list);
    if let TypeKind::Struct { fields, .. } = &mut c.get_mut(list).kind {
        fields.push(Field::new("v", int, 0));
        fields.push(Field::new("next", plist, 8));
    }

    c.define_union("word", &[("i", int), ("f", flt)]);
    c
}

fn run(c: &TypeCatalog, query: &str) -> Result<Vec<String>, QueryError> {
    let spec = QuerySpec::parse(c, query)?;
    Ok(Search::run(c, &spec, CancelToken::new())?.collect())
}

#[test]
fn size_and_member_find_the_outer_struct() {
    let c = sample_catalog();
    assert_eq!(c.size_of(c.lookup("A").unwrap()), Some(16));
    assert_eq!(run(&c, "size=16 member='double'").unwrap(), ["struct A"]);
}

#[test]
fn non_recursive_misses_the_nested_member() {
    let c = sample_catalog();
    assert_eq!(
        run(&c, "/n size=16 member='double'").unwrap(),
        Vec::<String>::new()
    );
    // Direct members still match without recursion.
    assert_eq!(run(&c, "/n size=8 member='double'").unwrap(), ["struct B"]);
}

#[test]
fn size_alone_filters_by_byte_count() {
    let c = sample_catalog();
    assert_eq!(run(&c, "size=16").unwrap(), ["struct A", "struct list"]);
    assert_eq!(run(&c, "size=4").unwrap(), ["union word"]);
}

#[test]
fn no_member_clause_is_vacuous() {
    let c = sample_catalog();
    assert_eq!(
        run(&c, "").unwrap(),
        ["struct B", "struct A", "struct list", "union word"]
    );
}

#[test]
fn name_and_member_combine() {
    let c = sample_catalog();
    assert_eq!(run(&c, "name=^l member='int'").unwrap(), ["struct list"]);
    assert_eq!(run(&c, "name=^B$ member='int'").unwrap(), Vec::<String>::new());
}

#[test]
fn pointer_member_requirements() {
    let c = sample_catalog();
    assert_eq!(run(&c, "member='struct list*'").unwrap(), ["struct list"]);
    assert_eq!(run(&c, "member='struct B*'").unwrap(), Vec::<String>::new());
}

#[test]
fn duplicate_requirements_need_two_fields() {
    let mut c = sample_catalog();
    let int = c.lookup("int").unwrap();
    c.define_struct("twice", &[("a", int), ("b", int)]);

    let matches = run(&c, "member='int;int'").unwrap();
    assert!(matches.contains(&"struct twice".to_string()));
    // struct A has one int directly and none nested.
    assert!(!matches.contains(&"struct A".to_string()));
}

#[test]
fn self_referential_type_terminates() {
    let c = sample_catalog();
    // Walking struct list must not chase the next pointer forever.
    assert_eq!(run(&c, "member='double' name=list").unwrap(), Vec::<String>::new());
}

#[test]
fn unknown_keys_warn_without_aborting() {
    let c = sample_catalog();
    let spec = QuerySpec::parse(&c, "depth=3 size=16 member='double'").unwrap();
    assert_eq!(spec.warnings, ["unknown option 'depth'"]);
    let matches: Vec<_> = Search::run(&c, &spec, CancelToken::new()).unwrap().collect();
    assert_eq!(matches, ["struct A"]);
}

#[test]
fn parse_errors_abort_before_any_search() {
    let c = sample_catalog();
    assert!(matches!(run(&c, "/x size=16"), Err(QueryError::BadSlash(_))));
    assert!(matches!(run(&c, "size=abc"), Err(QueryError::BadSize(_))));
    assert!(matches!(run(&c, "size"), Err(QueryError::BadOption)));
    assert!(matches!(
        run(&c, "member='no_such'"),
        Err(QueryError::Resolution { .. })
    ));
    assert!(matches!(run(&c, "name=["), Err(QueryError::BadPattern(_))));
}

#[test]
fn queries_are_idempotent() {
    let c = sample_catalog();
    let spec = QuerySpec::parse(&c, "member='double;int'").unwrap();
    let first: Vec<_> = Search::run(&c, &spec, CancelToken::new()).unwrap().collect();
    let second: Vec<_> = Search::run(&c, &spec, CancelToken::new()).unwrap().collect();
    assert_eq!(first, second);
    assert_eq!(first, ["struct A"]);
}

#[test]
fn cancelled_search_yields_nothing() {
    let c = sample_catalog();
    let spec = QuerySpec::parse(&c, "").unwrap();
    let token = CancelToken::new();
    token.cancel();
    let matches: Vec<_> = Search::run(&c, &spec, token).unwrap().collect();
    assert!(matches.is_empty());
}

#[test]
fn duplicate_declarations_match_through_the_printed_text() {
    let mut c = sample_catalog();
    let dbl = c.lookup("double").unwrap();
    // A second compilation unit emits its own struct B. The name index
    // still points at the first; a field typed with the duplicate must
    // nonetheless satisfy a member='struct B' requirement.
    let b_dup = c.add_named(
        "B",
        TypeKind::Struct {
            fields: vec![Field::new("y", dbl, 0)],
            size: 8,
            align: 8,
        },
    );
    c.define_struct("wrapper", &[("inner", b_dup)]);

    let matches = run(&c, "member='struct B'").unwrap();
    assert!(matches.contains(&"struct wrapper".to_string()));
}

#[test]
fn catalog_roundtrips_through_json() {
    let c = sample_catalog();
    let json = c.to_json().unwrap();
    let reloaded = TypeCatalog::from_json(&json).unwrap();
    assert_eq!(
        run(&reloaded, "size=16 member='double'").unwrap(),
        run(&c, "size=16 member='double'").unwrap()
    );
}
