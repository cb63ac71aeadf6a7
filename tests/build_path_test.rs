mod common;

use common::params;
use querycrate::{CanonicalQuery, Pagination, QueryMeta, build_path, decode_query, normalize};
use serde_json::json;

fn page(page: i64) -> CanonicalQuery {
    CanonicalQuery {
        pagination: Pagination {
            page: Some(page),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_new_value_wins_and_unrelated_params_survive() {
    let path = build_path("/events?page=1&species=dog", &page(3));
    assert_eq!(path, "/events?page=3&species=dog");
}

#[test]
fn test_bare_path_when_nothing_to_encode() {
    assert_eq!(build_path("/events", &CanonicalQuery::default()), "/events");
}

#[test]
fn test_existing_query_kept_when_canonical_is_empty() {
    assert_eq!(
        build_path("/events?species=dog", &CanonicalQuery::default()),
        "/events?species=dog"
    );
}

#[test]
fn test_at_most_one_question_mark() {
    let path = build_path("/events?species=dog", &page(2));
    assert_eq!(path.matches('?').count(), 1);
}

#[test]
fn test_brackets_are_percent_encoded() {
    let query = normalize(
        &params(json!({"starts_at": {"gte": "2024-01-01"}, "sort": "-starts_at"})),
        None,
    )
    .unwrap();

    let path = build_path("/events", &query);
    assert_eq!(path, "/events?sort=-starts_at&starts_at%5Bgte%5D=2024-01-01");
}

#[test]
fn test_list_filters_replace_existing_lists() {
    let query = normalize(&params(json!({"status": {"in": ["published"]}})), None).unwrap();
    let path = build_path("/events?status[in][]=draft&status[in][]=archived", &query);

    let (_, encoded) = path.split_once('?').unwrap();
    assert_eq!(decode_query(encoded), params(json!({"status[in]": ["published"]})));
}

#[test]
fn test_accepts_result_metadata_wrapper() {
    let meta = QueryMeta {
        query: page(5),
        total_count: Some(120),
        ..Default::default()
    };
    assert_eq!(build_path("/events", &meta), "/events?page=5");
}

#[test]
fn test_deterministic_output() {
    let query = normalize(
        &params(json!({"b": "2", "a": "1", "limit": "10", "after": "x"})),
        None,
    )
    .unwrap();
    let first = build_path("/items?z=9", &query);
    let second = build_path("/items?z=9", &query);
    assert_eq!(first, second);
    assert_eq!(first, "/items?a=1&after=x&b=2&limit=10&z=9");
}
