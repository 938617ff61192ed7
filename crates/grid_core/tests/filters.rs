use grid_core::filters::{coerce_count, field_value, filter_by_term, skip, sort_by, take};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn people() -> Vec<Value> {
    vec![
        json!({"name": "Alice", "age": 31, "city": {"name": "Oslo"}}),
        json!({"name": "bob", "age": 9, "city": {"name": "Bergen"}}),
        json!({"name": "Carol", "age": 100, "city": {"name": "oslo"}}),
        json!({"name": "dave", "age": null}),
    ]
}

fn names(rows: &[&Value]) -> Vec<String> {
    rows.iter()
        .map(|row| row["name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn empty_term_returns_all_rows() {
    let rows = people();
    assert_eq!(filter_by_term(&rows, None).len(), 4);
    assert_eq!(filter_by_term(&rows, Some("")).len(), 4);
}

#[test]
fn whitespace_is_part_of_the_term() {
    let rows = people();
    assert!(filter_by_term(&rows, Some(" ")).is_empty());
    assert_eq!(names(&filter_by_term(&rows, Some("ali"))), vec!["Alice"]);
    assert!(filter_by_term(&rows, Some(" ali")).is_empty());
}

#[test]
fn term_matches_nested_fields_case_insensitively() {
    let rows = people();
    let hits = filter_by_term(&rows, Some("OSLO"));
    assert_eq!(names(&hits), vec!["Alice", "Carol"]);

    let hits = filter_by_term(&rows, Some("10"));
    assert_eq!(names(&hits), vec!["Carol"]);
}

#[test]
fn filtering_is_idempotent() {
    let rows = people();
    for term in ["o", "b", "al", "zzz", ""] {
        let once = filter_by_term(&rows, Some(term));
        let twice = filter_by_term(once.iter().copied(), Some(term));
        assert_eq!(once, twice, "term {term:?}");
    }
}

#[test]
fn sort_uses_numeric_order_for_numbers() {
    let rows = people();
    let sorted = sort_by(rows.iter().collect(), "age", false);
    // null sorts first, then 9 < 31 < 100 (not lexicographic "100" < "31").
    assert_eq!(names(&sorted), vec!["dave", "bob", "Alice", "Carol"]);
}

#[test]
fn sort_strings_ignore_case_and_reverse_flips() {
    let rows = people();
    let sorted = sort_by(rows.iter().collect(), "name", false);
    assert_eq!(names(&sorted), vec!["Alice", "bob", "Carol", "dave"]);

    let sorted = sort_by(rows.iter().collect(), "name", true);
    assert_eq!(names(&sorted), vec!["dave", "Carol", "bob", "Alice"]);
}

#[test]
fn sort_is_stable_in_both_directions() {
    let rows = vec![
        json!({"k": 1, "id": "a"}),
        json!({"k": 0, "id": "b"}),
        json!({"k": 1, "id": "c"}),
        json!({"k": 0, "id": "d"}),
    ];
    let ids = |rows: Vec<&Value>| -> Vec<String> {
        rows.iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(
        ids(sort_by(rows.iter().collect(), "k", false)),
        vec!["b", "d", "a", "c"]
    );
    assert_eq!(
        ids(sort_by(rows.iter().collect(), "k", true)),
        vec!["a", "c", "b", "d"]
    );
}

#[test]
fn dotted_fields_resolve_nested_values() {
    let row = json!({"city": {"name": "Oslo"}, "tags": ["x", "y"]});
    assert_eq!(field_value(&row, "city.name"), Some(&json!("Oslo")));
    assert_eq!(field_value(&row, "tags.1"), Some(&json!("y")));
    assert_eq!(field_value(&row, "city.zip"), None);
}

#[test]
fn skip_and_take_bounds() {
    let rows = vec![1, 2, 3, 4, 5];
    assert_eq!(skip(rows.clone(), 0), vec![1, 2, 3, 4, 5]);
    assert_eq!(skip(rows.clone(), 3), vec![4, 5]);
    assert_eq!(skip(rows.clone(), 9), Vec::<i32>::new());
    assert_eq!(take(rows.clone(), 2), vec![1, 2]);
    assert_eq!(take(rows.clone(), 10), vec![1, 2, 3, 4, 5]);
    assert_eq!(take(rows, 0), Vec::<i32>::new());
}

#[test]
fn malformed_counts_degrade_to_zero() {
    assert_eq!(coerce_count("25"), 25);
    assert_eq!(coerce_count(" 7 "), 7);
    assert_eq!(coerce_count("-3"), 0);
    assert_eq!(coerce_count("abc"), 0);
    assert_eq!(coerce_count(""), 0);
    assert_eq!(coerce_count("12.9"), 12);
}
