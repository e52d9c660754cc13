use super::*;
use serde_json::json;

fn p(s: &str) -> DottedPath {
    DottedPath::parse(s).unwrap()
}

#[test]
fn get_walks_objects_and_arrays() {
    let root = json!({ "a": { "b": [ { "c": 7 }, { "c": 8 } ] } });
    assert_eq!(get(&root, &p("a.b.1.c")), Some(&json!(8)));
    assert_eq!(get(&root, &p("a.b.0")), Some(&json!({ "c": 7 })));
}

#[test]
fn get_returns_fallback_on_missing_data() {
    let root = json!({ "a": { "b": 1, "n": null }, "arr": [1, 2] });
    let fb = json!("fallback");
    assert_eq!(get_or(&root, &p("a.x.y"), &fb), &fb);
    assert_eq!(get_or(&root, &p("a.b.c"), &fb), &fb);
    assert_eq!(get_or(&root, &p("a.n.c"), &fb), &fb);
    assert_eq!(get_or(&root, &p("arr.5"), &fb), &fb);
    assert_eq!(get_or(&root, &p("arr.len"), &fb), &fb);
}

#[test]
fn get_keeps_explicit_null_leaf() {
    let root = json!({ "a": null });
    assert_eq!(get(&root, &p("a")), Some(&Value::Null));
}

#[test]
fn numeric_segment_on_object_is_a_key() {
    let root = json!({ "m": { "3": "three" } });
    assert_eq!(get(&root, &p("m.3")), Some(&json!("three")));
}

#[test]
fn set_does_not_mutate_input() {
    let root = json!({ "a": { "b": 1 }, "s": { "keep": true } });
    let before = root.clone();
    let out = set(&root, &p("a.b"), json!(2)).unwrap();
    assert_eq!(root, before);
    assert_eq!(out["a"]["b"], json!(2));
    assert_eq!(out["s"], before["s"]);
}

#[test]
fn set_creates_missing_containers_by_next_segment() {
    let out = set(&json!({}), &p("x.0.y"), json!("v")).unwrap();
    assert_eq!(out, json!({ "x": [ { "y": "v" } ] }));

    let out = set(&json!({ "x": null }), &p("x.k"), json!(1)).unwrap();
    assert_eq!(out, json!({ "x": { "k": 1 } }));
}

#[test]
fn set_appends_at_array_end() {
    let out = set(&json!({ "a": [1] }), &p("a.1"), json!(2)).unwrap();
    assert_eq!(out, json!({ "a": [1, 2] }));
    let out = set(&json!({ "a": [1] }), &p("a.0"), json!(9)).unwrap();
    assert_eq!(out, json!({ "a": [9] }));
}

#[test]
fn set_past_array_end_is_rejected() {
    let err = set(&json!({ "a": [1] }), &p("a.3"), json!(4)).unwrap_err();
    assert_eq!(
        err,
        PathError::IndexOutOfRange {
            path: "a.3".to_owned(),
            at: "a".to_owned(),
            index: 3,
            len: 1,
        }
    );
}

#[test]
fn huge_index_is_an_error_not_an_allocation() {
    let root = json!({ "a": [] });
    assert!(matches!(
        set_at(&root, "a.4000000000", json!(1)),
        Err(PathError::IndexOutOfRange { index: 4_000_000_000, len: 0, .. })
    ));
    assert!(matches!(
        set_at(&json!({}), "a.4000000000.b", json!(1)),
        Err(PathError::IndexOutOfRange { .. })
    ));
}

#[test]
fn set_through_primitive_is_a_conflict() {
    let root = json!({ "a": { "b": 5 } });
    let err = set(&root, &p("a.b.c"), json!(1)).unwrap_err();
    assert_eq!(
        err,
        PathError::Conflict {
            path: "a.b.c".to_owned(),
            at: "a.b".to_owned(),
            found: "number",
        }
    );
}

#[test]
fn set_key_on_array_is_rejected() {
    let root = json!({ "a": [1, 2] });
    assert!(matches!(
        set(&root, &p("a.first"), json!(0)),
        Err(PathError::KeyOnArray { .. })
    ));
}

#[test]
fn set_on_primitive_root_is_a_conflict() {
    assert!(matches!(
        set(&json!(3), &p("a"), json!(0)),
        Err(PathError::Conflict { .. })
    ));
}

#[test]
fn string_helpers_reject_empty_path() {
    let root = json!({ "a": 1 });
    assert_eq!(get_at(&root, ""), Err(PathError::Empty));
    assert_eq!(set_at(&root, "", json!(1)), Err(PathError::Empty));
    assert_eq!(get_at(&root, "a").unwrap(), Some(&json!(1)));
}
