use std::collections::HashSet;

use tracing::{debug, trace};

use super::operators::{self, FilterOp, Operator};
use super::{pagination, sort};
use crate::models::{Filter, ParamValue, Params};

/// Text before an optional bracket suffix: `starts_at[gte]` -> `starts_at`
#[must_use]
pub fn base_field(key: &str) -> &str {
    key.split_once('[').map_or(key, |(base, _)| base)
}

/// Split a flat bracketed key into field and operator token.
///
/// Accepts `field[op]` and `field[op][]`; `field[]` yields no operator. Any other
/// shape is not a bracketed key and returns `None`.
fn split_bracket_key(key: &str) -> Option<(&str, Option<&str>)> {
    let (field, rest) = key.split_once('[')?;
    if field.is_empty() {
        return None;
    }
    if rest == "]" {
        return Some((field, None));
    }
    let (token, tail) = rest.split_once(']')?;
    if token.is_empty() || !(tail.is_empty() || tail == "[]") {
        return None;
    }
    Some((field, Some(token)))
}

fn is_reserved(key: &str) -> bool {
    key == sort::SORT_KEY || pagination::reserved_keys().contains(&key)
}

/// Undo the repeated-bracket list encoding.
///
/// `status[in][]=a&status[in][]=b` can arrive as `{"in": {"": ["a", "b"]}}`; the
/// inner single-empty-key map unwraps to the bare list. Every other value is
/// returned as-is, including maps of any other shape.
#[must_use]
pub fn normalize_value(value: &ParamValue) -> ParamValue {
    match value {
        ParamValue::Map(entries) if entries.len() == 1 => match entries.get("") {
            Some(ParamValue::List(items)) => ParamValue::List(items.clone()),
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}

fn push_filters(filters: &mut Vec<Filter>, key: &str, value: &ParamValue) {
    if let Some((field, token)) = split_bracket_key(key) {
        let op = token.map_or(FilterOp::Known(Operator::Eq), operators::to_canonical);
        filters.push(Filter::new(field, op, normalize_value(value)));
        return;
    }

    match normalize_value(value) {
        ParamValue::Map(entries) => {
            for (token, nested) in &entries {
                filters.push(Filter::new(
                    key,
                    operators::to_canonical(token),
                    normalize_value(nested),
                ));
            }
        }
        plain => filters.push(Filter::new(key, FilterOp::Known(Operator::Eq), plain)),
    }
}

/// Extract canonical filters from every non-reserved parameter.
#[must_use]
pub fn extract(params: &Params) -> Vec<Filter> {
    extract_partitioned(params, None).0
}

/// Extract canonical filters, partitioning by a set of filterable field names.
///
/// Reserved pagination and sort keys are skipped. With a filterable set, a key whose
/// base field is not a member is returned verbatim in the extras mapping instead.
/// Without one, every non-reserved key becomes a filter and extras stay empty.
///
/// Filters come out ordered by key, then by operator token within a key.
#[must_use]
pub fn extract_partitioned(
    params: &Params,
    filterable: Option<&HashSet<String>>,
) -> (Vec<Filter>, Params) {
    let mut filters = Vec::new();
    let mut extras = Params::new();

    for (key, value) in params {
        if is_reserved(key) {
            continue;
        }

        if let Some(allowed) = filterable
            && !allowed.contains(base_field(key))
        {
            debug!(key = %key, "Passing non-filterable parameter through");
            extras.insert(key.clone(), value.clone());
            continue;
        }

        push_filters(&mut filters, key, value);
    }

    trace!(filters = filters.len(), extras = extras.len(), "Extracted filters");
    (filters, extras)
}

/// Render canonical filters as REST parameters.
///
/// Equality filters become `field=value`; everything else `field[token]=value`.
/// Keys are left unescaped for the query-string encoder.
#[must_use]
pub fn to_rest(filters: &[Filter]) -> Params {
    let mut params = Params::new();
    for filter in filters {
        let key = match operators::to_rest(&filter.op) {
            None => filter.field.clone(),
            Some(token) => format!("{}[{token}]", filter.field),
        };
        if params.insert(key, filter.value.clone()).is_some() {
            debug!(field = %filter.field, op = %filter.op, "Duplicate filter replaced an earlier one");
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scalar;
    use serde_json::json;

    fn params(value: serde_json::Value) -> Params {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_base_field() {
        assert_eq!(base_field("starts_at[gte]"), "starts_at");
        assert_eq!(base_field("status"), "status");
        assert_eq!(base_field("tags[]"), "tags");
    }

    #[test]
    fn test_split_bracket_key_shapes() {
        assert_eq!(split_bracket_key("a[gte]"), Some(("a", Some("gte"))));
        assert_eq!(split_bracket_key("a[in][]"), Some(("a", Some("in"))));
        assert_eq!(split_bracket_key("a[]"), Some(("a", None)));
        assert_eq!(split_bracket_key("a"), None);
        assert_eq!(split_bracket_key("a[gte"), None);
        assert_eq!(split_bracket_key("a[x][y]"), None);
        assert_eq!(split_bracket_key("[gte]"), None);
    }

    #[test]
    fn test_scalar_value_is_equality() {
        let filters = extract(&params(json!({"status": "published"})));
        assert_eq!(
            filters,
            vec![Filter::new("status", FilterOp::Known(Operator::Eq), "published")]
        );
    }

    #[test]
    fn test_nested_operator_map() {
        let filters = extract(&params(json!({
            "starts_at": {"gte": "2024-01-01", "lt": "2025-01-01"}
        })));
        assert_eq!(filters.len(), 2);
        // Sorted by token within the key
        assert_eq!(filters[0].op.as_str(), ">=");
        assert_eq!(filters[1].op.as_str(), "<");
        assert!(filters.iter().all(|f| f.field == "starts_at"));
    }

    #[test]
    fn test_bracket_list_unwrap() {
        let filters = extract(&params(json!({"status": {"in": {"": ["draft", "published"]}}})));
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].op, FilterOp::Known(Operator::In));
        assert_eq!(
            filters[0].value,
            ParamValue::List(vec![Scalar::text("draft"), Scalar::text("published")])
        );
    }

    #[test]
    fn test_empty_key_scalar_is_not_a_list() {
        let wrapped = params(json!({"": "x"}));
        assert_eq!(
            normalize_value(&ParamValue::Map(wrapped)),
            ParamValue::Map(params(json!({"": "x"})))
        );

        // At the top level the empty key is read as an unknown operator
        let filters = extract(&params(json!({"status": {"": "x"}})));
        assert_eq!(
            filters,
            vec![Filter::new("status", FilterOp::Unknown(String::new()), "x")]
        );
    }

    #[test]
    fn test_other_nested_maps_pass_through_opaque() {
        let value = params(json!({"a": "1", "b": "2"}));
        let filters = extract(&params(json!({"meta": {"has": {"a": "1", "b": "2"}}})));
        assert_eq!(filters[0].value, ParamValue::Map(value));
        assert_eq!(filters[0].op, FilterOp::Unknown("has".into()));
    }

    #[test]
    fn test_flat_bracket_keys() {
        let filters = extract(&params(json!({
            "starts_at[gte]": "2024-01-01",
            "status[in]": ["draft", "published"],
        })));
        assert_eq!(filters[0], Filter::new("starts_at", Operator::Gte.into(), "2024-01-01"));
        assert_eq!(filters[1].field, "status");
        assert_eq!(filters[1].op.as_str(), "in");
    }

    #[test]
    fn test_reserved_keys_are_skipped() {
        let filters = extract(&params(json!({
            "limit": "10", "after": "c", "before": "d", "page": "1",
            "page_size": "5", "offset": "0", "sort": "-name", "name": "x",
        })));
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].field, "name");
    }

    #[test]
    fn test_partition_by_filterable_set() {
        let filterable: HashSet<String> = ["status".to_string(), "starts_at".to_string()].into();
        let (filters, extras) = extract_partitioned(
            &params(json!({
                "status": "published",
                "starts_at[gte]": "2024",
                "species": "dog",
                "limit": "5",
            })),
            Some(&filterable),
        );
        assert_eq!(filters.len(), 2);
        assert_eq!(extras, params(json!({"species": "dog"})));
    }

    #[test]
    fn test_to_rest_renders_equality_bare() {
        let rest = to_rest(&[
            Filter::new("status", Operator::Eq.into(), "published"),
            Filter::new("starts_at", Operator::Gte.into(), "2024-01-01"),
            Filter::new("x", FilterOp::Unknown("between".into()), "1,2"),
        ]);
        assert_eq!(
            rest,
            params(json!({
                "status": "published",
                "starts_at[gte]": "2024-01-01",
                "x[between]": "1,2",
            }))
        );
    }
}
