#![allow(dead_code)]

use std::collections::HashSet;

use axum::{Json, Router, http::Uri, routing::get};
use querycrate::{ParamError, Params, QueryMeta, RestParams};
use serde_json::{Value, json};

/// Route library `tracing` events to the test output; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn params(value: Value) -> Params {
    serde_json::from_value(value).expect("fixture should deserialize into Params")
}

pub fn filterable(fields: &[&str]) -> HashSet<String> {
    fields.iter().map(ToString::to_string).collect()
}

/// Filters as (field, op, value) triples, sorted so comparisons ignore order
pub fn filter_set(value: &Value) -> Vec<(String, String, Value)> {
    let mut filters: Vec<(String, String, Value)> = value["filters"]
        .as_array()
        .map(|filters| {
            filters
                .iter()
                .map(|f| {
                    (
                        f["field"].as_str().unwrap_or_default().to_string(),
                        f["op"].as_str().unwrap_or_default().to_string(),
                        f["value"].clone(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    filters.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
    filters
}

async fn list_events(uri: Uri, RestParams(params): RestParams) -> Result<Json<Value>, ParamError> {
    let normalized = querycrate::normalize(&params, Some(&filterable(&["status", "starts_at", "title"])))?;

    // Pretend the engine found more rows after this page
    let meta = QueryMeta {
        query: normalized.query.clone(),
        has_next_page: true,
        end_cursor: Some("cursor-next".to_string()),
        ..Default::default()
    };

    Ok(Json(json!({
        "query": normalized,
        "next": meta.next_path(&uri.to_string()),
    })))
}

pub fn setup_test_app() -> Router {
    init_tracing();
    Router::new().route("/events", get(list_events))
}
