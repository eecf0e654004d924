//! Mapping from a data-layer request to an HTTP request.
//!
//! # Design
//! `map_request` is a pure function of the api root, the resource name and
//! the request. `GET_MANY` is fanned out by the dispatcher into one
//! `GET_ONE`-shaped request per id and never reaches this mapper; if it
//! does, that is a contract violation reported as `UnsupportedOperation`.

use serde_json::Value;

use crate::error::{AdapterError, AdapterResult};
use crate::http::{accept_json, content_type_json, HttpMethod, HttpRequest};
use crate::query::{build_query, encode_query};
use crate::types::{OperationKind, Record, RecordId, RestRequest};

pub(crate) fn collection_url(api_root: &str, resource: &str) -> String {
    format!("{api_root}/{resource}")
}

pub(crate) fn record_url(api_root: &str, resource: &str, id: &RecordId) -> String {
    format!("{api_root}/{resource}/{id}")
}

fn with_query(url: String, query: &Record) -> String {
    format!("{url}?{}", encode_query(query))
}

fn with_json_body(method: HttpMethod, url: String, data: &Record) -> AdapterResult<HttpRequest> {
    Ok(HttpRequest {
        method,
        url,
        headers: vec![accept_json(), content_type_json()],
        body: Some(serde_json::to_string(data)?),
    })
}

/// Build the HTTP request for `request` against `resource`.
pub fn map_request(api_root: &str, resource: &str, request: &RestRequest) -> AdapterResult<HttpRequest> {
    match request {
        RestRequest::GetList(params) => {
            let query = build_query(params);
            Ok(HttpRequest::get(with_query(collection_url(api_root, resource), &query)))
        }
        RestRequest::GetOne { id } => Ok(HttpRequest::get(record_url(api_root, resource, id))),
        RestRequest::GetManyReference(params) => {
            let mut query = build_query(&params.list);
            query.insert(params.target.clone(), Value::from(params.id.clone()));
            Ok(HttpRequest::get(with_query(collection_url(api_root, resource), &query)))
        }
        RestRequest::Create { data } => {
            with_json_body(HttpMethod::Post, collection_url(api_root, resource), data)
        }
        RestRequest::Update { id, data } => {
            with_json_body(HttpMethod::Put, record_url(api_root, resource, id), data)
        }
        RestRequest::Delete { id } => Ok(HttpRequest {
            method: HttpMethod::Delete,
            ..HttpRequest::get(record_url(api_root, resource, id))
        }),
        RestRequest::GetMany { .. } => Err(AdapterError::UnsupportedOperation {
            kind: OperationKind::GetMany.to_string(),
        }),
    }
}
