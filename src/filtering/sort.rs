use tracing::debug;

pub use crate::config::SORT_KEY;
use crate::models::{ParamValue, Params, Sort, SortDirection};

/// Parse a comma-separated sort string such as `-starts_at,+name,id`.
///
/// A leading `-` sorts descending, a leading `+` or no prefix ascending. Tokens are
/// trimmed and empty ones dropped, so `a,,b` and `" a , b "` are fine; so is a bare
/// `-` or `+` with no field after it. Absent or empty input yields an empty [`Sort`].
#[must_use]
pub fn parse(sort: Option<&str>) -> Sort {
    let Some(sort) = sort else {
        return Sort::default();
    };

    let (order_by, order_directions) = sort
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let (field, direction) = if let Some(field) = token.strip_prefix('-') {
                (field, SortDirection::Desc)
            } else if let Some(field) = token.strip_prefix('+') {
                (field, SortDirection::Asc)
            } else {
                (token, SortDirection::Asc)
            };
            if field.is_empty() {
                debug!(token = %token, "Dropping sort token without a field name");
                return None;
            }
            Some((field.to_string(), direction))
        })
        .unzip();

    Sort {
        order_by,
        order_directions,
    }
}

/// Read the `sort` parameter out of a parameter set.
///
/// A list value (`sort[]=a&sort[]=-b`) is treated as its comma-joined form.
#[must_use]
pub fn from_params(params: &Params) -> Sort {
    match params.get(SORT_KEY) {
        None => Sort::default(),
        Some(ParamValue::Scalar(scalar)) => parse(Some(scalar.to_string().as_str())),
        Some(ParamValue::List(items)) => {
            let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
            parse(Some(joined.join(",").as_str()))
        }
        Some(ParamValue::Map(_)) => {
            debug!("Ignoring sort parameter with nested keys");
            Sort::default()
        }
    }
}

/// Serialize fields and directions into a sort string.
///
/// Any descending variant renders as `-field`, any ascending one as `field`; a
/// missing direction counts as ascending. `None` when there are no fields.
///
/// Field names are written unescaped, so one that itself starts with `-` or `+`,
/// or contains a comma, does not survive a round trip through [`parse`].
#[must_use]
pub fn format_sort(order_by: &[String], order_directions: &[SortDirection]) -> Option<String> {
    if order_by.is_empty() {
        return None;
    }

    let tokens: Vec<String> = order_by
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let direction = order_directions.get(index).copied().unwrap_or_default();
            if direction.is_descending() {
                format!("-{field}")
            } else {
                field.clone()
            }
        })
        .collect();

    Some(tokens.join(","))
}

/// Render a canonical sort as REST parameters: a single `sort` key, or nothing
#[must_use]
pub fn to_rest(sort: &Sort) -> Params {
    format_sort(&sort.order_by, &sort.order_directions)
        .map(|value| (SORT_KEY.to_string(), ParamValue::text(value)))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortDirection::{Asc, AscNullsLast, Desc, DescNullsFirst};

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_prefixes() {
        let sort = parse(Some("-starts_at,+name,id"));
        assert_eq!(sort.order_by, fields(&["starts_at", "name", "id"]));
        assert_eq!(sort.order_directions, vec![Desc, Asc, Asc]);
    }

    #[test]
    fn test_parse_trims_and_drops_empty_tokens() {
        let sort = parse(Some(" a ,, -b ,"));
        assert_eq!(sort.order_by, fields(&["a", "b"]));
        assert_eq!(sort.order_directions, vec![Asc, Desc]);
    }

    #[test]
    fn test_parse_absent_or_empty() {
        assert!(parse(None).is_empty());
        assert!(parse(Some("")).is_empty());
        assert!(parse(Some(",,")).is_empty());
        assert_eq!(serde_json::to_value(parse(Some(""))).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_from_params_accepts_list() {
        let params: Params = serde_json::from_value(serde_json::json!({"sort": ["a", "-b"]})).unwrap();
        let sort = from_params(&params);
        assert_eq!(sort.order_by, fields(&["a", "b"]));
        assert_eq!(sort.order_directions, vec![Asc, Desc]);
    }

    #[test]
    fn test_format_collapses_nulls_variants() {
        let formatted = format_sort(&fields(&["a", "b", "c"]), &[DescNullsFirst, AscNullsLast]);
        assert_eq!(formatted.as_deref(), Some("-a,b,c"));
    }

    #[test]
    fn test_to_rest_empty_sort_has_no_key() {
        assert!(to_rest(&Sort::default()).is_empty());
    }

    #[test]
    fn test_to_rest_renders_sort_key() {
        let rest = to_rest(&Sort {
            order_by: fields(&["starts_at", "name"]),
            order_directions: vec![Desc],
        });
        assert_eq!(rest.get(SORT_KEY), Some(&ParamValue::text("-starts_at,name")));
    }

    #[test]
    fn test_parse_inverts_format() {
        let order_by = fields(&["x", "y", "z"]);
        let order_directions = vec![Desc, Asc, Desc];
        let sort = parse(format_sort(&order_by, &order_directions).as_deref());
        assert_eq!(sort.order_by, order_by);
        assert_eq!(sort.order_directions, order_directions);
    }

    #[test]
    fn test_parse_drops_prefix_only_tokens() {
        let sort = parse(Some("-,+,name,-"));
        assert_eq!(sort.order_by, fields(&["name"]));
        assert_eq!(sort.order_directions, vec![Asc]);
        assert!(parse(Some(" - , + ")).is_empty());
    }
}
