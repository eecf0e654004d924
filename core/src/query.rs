//! Query-string construction for list-shaped operations.
//!
//! Filters pass through verbatim; sort, page and count follow the epilogue
//! convention: `sort=-field` for descending, a 0-based `page`, and `count`
//! for the page size.

use serde_json::Value;

use crate::types::{ListParams, Record, Sort, SortOrder};

fn sort_value(sort: &Sort) -> String {
    match sort.order {
        SortOrder::Desc => format!("-{}", sort.field),
        SortOrder::Asc => sort.field.clone(),
    }
}

/// Derive the query mapping from filter, sort and pagination.
///
/// Keys keep insertion order; a filter key named `sort`, `page` or `count`
/// is overwritten in place when the corresponding param is present.
pub fn build_query(params: &ListParams) -> Record {
    let mut query = params.filter.clone().unwrap_or_default();
    if let Some(sort) = &params.sort {
        query.insert("sort".to_string(), Value::String(sort_value(sort)));
    }
    if let Some(pagination) = &params.pagination {
        // Caller pages are 1-based, the server's are 0-based.
        if let Some(page) = pagination.page {
            query.insert("page".to_string(), Value::from(i64::from(page) - 1));
        }
        if let Some(per_page) = pagination.per_page {
            query.insert("count".to_string(), Value::from(per_page));
        }
    }
    query
}

/// Render a JSON value the way it appears in a query string.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Percent-encode like `encodeURIComponent`, which leaves `!'()*` as-is.
fn encode_component(raw: &str) -> String {
    urlencoding::encode(raw)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// Encode the query mapping as `key=value` pairs joined with `&`.
pub fn encode_query(query: &Record) -> String {
    query
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_component(key),
                encode_component(&render_value(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
