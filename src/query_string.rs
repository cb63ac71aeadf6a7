//! Flat query-string codec used when building paths.
//!
//! Percent-encoding itself is delegated to `url::form_urlencoded`. Keys stay flat
//! (`starts_at[gte]` is one key); only the trailing `[]` list marker is interpreted.

use url::form_urlencoded;

use crate::models::{ParamValue, Params, Scalar};

/// Decode a query string (without the leading `?`).
///
/// Repeated `key[]=v` pairs collect into a list under `key`. Any other pair is a
/// text value under its key, the last occurrence winning.
#[must_use]
pub fn decode_query(query: &str) -> Params {
    let mut params = Params::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let item = Scalar::Text(value.into_owned());
        if let Some(list_key) = key.strip_suffix("[]") {
            match params
                .entry(list_key.to_string())
                .or_insert_with(|| ParamValue::List(Vec::new()))
            {
                ParamValue::List(items) => items.push(item),
                other => *other = ParamValue::List(vec![item]),
            }
        } else {
            params.insert(key.into_owned(), ParamValue::Scalar(item));
        }
    }

    params
}

fn append_pairs(serializer: &mut form_urlencoded::Serializer<'_, String>, key: &str, value: &ParamValue) {
    match value {
        ParamValue::Scalar(scalar) => {
            serializer.append_pair(key, &scalar.to_string());
        }
        ParamValue::List(items) => {
            let list_key = format!("{key}[]");
            for item in items {
                serializer.append_pair(&list_key, &item.to_string());
            }
        }
        ParamValue::Map(entries) => {
            for (sub_key, nested) in entries {
                append_pairs(serializer, &format!("{key}[{sub_key}]"), nested);
            }
        }
    }
}

/// Encode parameters as a query string (without the leading `?`), keys in sorted
/// order. Brackets are escaped to `%5B`/`%5D`.
#[must_use]
pub fn encode_query(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        append_pairs(&mut serializer, key, value);
    }
    serializer.finish()
}
