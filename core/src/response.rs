//! Normalization of HTTP responses into `RestResult` values.

use serde_json::Value;

use crate::error::{AdapterError, AdapterResult, CONTENT_RANGE};
use crate::http::HttpResponse;
use crate::types::{RestRequest, RestResult};

/// Read the total from a range header such as `items 0-9/42`.
///
/// Takes the text after the last `/` and parses its leading decimal digits.
fn parse_total(value: &str) -> Option<u64> {
    let tail = value.rsplit('/').next()?.trim_start();
    let digits_end = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    tail[..digits_end].parse().ok()
}

fn paginated(response: HttpResponse, resource: &str) -> AdapterResult<(Value, u64)> {
    let Some(value) = response.header(CONTENT_RANGE) else {
        tracing::warn!(resource, header = CONTENT_RANGE, "list response without pagination header");
        return Err(AdapterError::MissingPaginationHeader {
            header: CONTENT_RANGE,
            resource: resource.to_string(),
        });
    };
    let Some(total) = parse_total(value) else {
        tracing::warn!(resource, value, "unreadable pagination header");
        return Err(AdapterError::InvalidPaginationHeader {
            header: CONTENT_RANGE,
            resource: resource.to_string(),
            value: value.to_string(),
        });
    };
    Ok((response.json, total))
}

/// Convert `response` into the result shape expected for `request`.
///
/// `CREATE` echoes the submitted record with the server-issued `id`
/// overlaid; other fields the server returns are not carried over.
pub fn map_response(
    response: HttpResponse,
    resource: &str,
    request: &RestRequest,
) -> AdapterResult<RestResult> {
    match request {
        RestRequest::GetList(_) | RestRequest::GetManyReference(_) => {
            let (data, total) = paginated(response, resource)?;
            Ok(RestResult::page(data, total))
        }
        RestRequest::Create { data } => {
            let id = response.json.get("id").cloned().unwrap_or(Value::Null);
            let mut echoed = data.clone();
            echoed.insert("id".to_string(), id);
            Ok(RestResult::single(Value::Object(echoed)))
        }
        RestRequest::GetOne { .. }
        | RestRequest::GetMany { .. }
        | RestRequest::Update { .. }
        | RestRequest::Delete { .. } => Ok(RestResult::single(response.json)),
    }
}
