//! Data-layer request and result types.
//!
//! # Design
//! `RestRequest` is a closed enum with one variant per `OperationKind`, each
//! carrying exactly the parameters that kind needs. The mappers match on it
//! exhaustively, so adding a kind is a compile error until every mapper
//! handles it. Generic callers that only have a kind string and a JSON
//! params object go through `RestRequest::from_parts`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{AdapterError, AdapterResult};

/// A resource record as an ordered JSON object.
pub type Record = Map<String, Value>;

/// The fixed set of data-access operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    GetList,
    GetOne,
    GetMany,
    GetManyReference,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub const ALL: [OperationKind; 7] = [
        OperationKind::GetList,
        OperationKind::GetOne,
        OperationKind::GetMany,
        OperationKind::GetManyReference,
        OperationKind::Create,
        OperationKind::Update,
        OperationKind::Delete,
    ];

    /// Wire constant used by data-layer callers, e.g. `GET_LIST`.
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::GetList => "GET_LIST",
            OperationKind::GetOne => "GET_ONE",
            OperationKind::GetMany => "GET_MANY",
            OperationKind::GetManyReference => "GET_MANY_REFERENCE",
            OperationKind::Create => "CREATE",
            OperationKind::Update => "UPDATE",
            OperationKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AdapterError::UnsupportedOperation {
                kind: s.to_string(),
            })
    }
}

/// Opaque record identifier: the server issues integers, callers may hold strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Str(s.to_string())
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Int(n) => Value::from(n),
            RecordId::Str(s) => Value::String(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Only the exact string `DESC` sorts descending; anything else is ascending.
impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(s)) if s == "DESC" => SortOrder::Desc,
            _ => SortOrder::Asc,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

impl Sort {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            order: SortOrder::Desc,
        }
    }
}

/// Caller-side pagination: `page` is 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}

impl Pagination {
    pub fn new(page: i32, per_page: u64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

/// A `null` or key-less sort object means no sort.
fn sort_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Sort>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(raw) => serde_json::from_value(raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Filter, sort and pagination shared by the list-shaped operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Record>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "sort_or_empty"
    )]
    pub sort: Option<Sort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Parameters for `GET_MANY_REFERENCE`: list records whose `target` field equals `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceParams {
    pub target: String,
    pub id: RecordId,
    #[serde(flatten)]
    pub list: ListParams,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct IdParams {
    id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct IdsParams {
    ids: Vec<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct DataParams {
    data: Record,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct UpdateParams {
    id: RecordId,
    data: Record,
}

/// One data-access operation together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum RestRequest {
    GetList(ListParams),
    GetOne { id: RecordId },
    GetMany { ids: Vec<RecordId> },
    GetManyReference(ReferenceParams),
    Create { data: Record },
    Update { id: RecordId, data: Record },
    Delete { id: RecordId },
}

impl RestRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            RestRequest::GetList(_) => OperationKind::GetList,
            RestRequest::GetOne { .. } => OperationKind::GetOne,
            RestRequest::GetMany { .. } => OperationKind::GetMany,
            RestRequest::GetManyReference(_) => OperationKind::GetManyReference,
            RestRequest::Create { .. } => OperationKind::Create,
            RestRequest::Update { .. } => OperationKind::Update,
            RestRequest::Delete { .. } => OperationKind::Delete,
        }
    }

    /// Build a request from a kind constant and a JSON params object.
    pub fn from_parts(kind: &str, params: Value) -> AdapterResult<Self> {
        let kind: OperationKind = kind.parse()?;
        let invalid = |e: serde_json::Error| AdapterError::InvalidParams {
            kind,
            reason: e.to_string(),
        };
        Ok(match kind {
            OperationKind::GetList => {
                RestRequest::GetList(serde_json::from_value(params).map_err(invalid)?)
            }
            OperationKind::GetOne => {
                let p: IdParams = serde_json::from_value(params).map_err(invalid)?;
                RestRequest::GetOne { id: p.id }
            }
            OperationKind::GetMany => {
                let p: IdsParams = serde_json::from_value(params).map_err(invalid)?;
                RestRequest::GetMany { ids: p.ids }
            }
            OperationKind::GetManyReference => {
                RestRequest::GetManyReference(serde_json::from_value(params).map_err(invalid)?)
            }
            OperationKind::Create => {
                let p: DataParams = serde_json::from_value(params).map_err(invalid)?;
                RestRequest::Create { data: p.data }
            }
            OperationKind::Update => {
                let p: UpdateParams = serde_json::from_value(params).map_err(invalid)?;
                RestRequest::Update {
                    id: p.id,
                    data: p.data,
                }
            }
            OperationKind::Delete => {
                let p: IdParams = serde_json::from_value(params).map_err(invalid)?;
                RestRequest::Delete { id: p.id }
            }
        })
    }
}

/// Normalized result handed back to the data-layer caller.
///
/// `total` is set only for `GET_LIST` and `GET_MANY_REFERENCE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestResult {
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl RestResult {
    pub fn single(data: Value) -> Self {
        Self { data, total: None }
    }

    pub fn page(data: Value, total: u64) -> Self {
        Self {
            data,
            total: Some(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operation_kind_parses_wire_constants() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.as_str().parse::<OperationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_operation_kind_is_rejected_by_name() {
        let err = "GET_EVERYTHING".parse::<OperationKind>().unwrap_err();
        match err {
            AdapterError::UnsupportedOperation { kind } => assert_eq!(kind, "GET_EVERYTHING"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn sort_order_only_exact_desc_is_descending() {
        let cases = [
            (json!({"field": "title", "order": "DESC"}), SortOrder::Desc),
            (json!({"field": "title", "order": "ASC"}), SortOrder::Asc),
            (json!({"field": "title", "order": "desc"}), SortOrder::Asc),
            (json!({"field": "title", "order": "DSEC"}), SortOrder::Asc),
            (json!({"field": "title", "order": null}), SortOrder::Asc),
            (json!({"field": "title", "order": 1}), SortOrder::Asc),
            (json!({"field": "title"}), SortOrder::Asc),
        ];
        for (raw, expected) in cases {
            let sort: Sort = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(sort.order, expected, "{raw}");
        }
    }

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        let ids: Vec<RecordId> = serde_json::from_value(json!([7, "abc"])).unwrap();
        assert_eq!(ids, vec![RecordId::Int(7), RecordId::Str("abc".to_string())]);
        assert_eq!(ids[0].to_string(), "7");
        assert_eq!(ids[1].to_string(), "abc");
    }

    #[test]
    fn from_parts_builds_reference_request() {
        let req = RestRequest::from_parts(
            "GET_MANY_REFERENCE",
            json!({
                "target": "post_id",
                "id": 12,
                "sort": {"field": "created_at", "order": "DESC"},
                "pagination": {"page": 2, "perPage": 25},
                "filter": {}
            }),
        )
        .unwrap();
        match req {
            RestRequest::GetManyReference(p) => {
                assert_eq!(p.target, "post_id");
                assert_eq!(p.id, RecordId::Int(12));
                assert_eq!(p.list.sort, Some(Sort::desc("created_at")));
                assert_eq!(p.list.pagination, Some(Pagination::new(2, 25)));
                assert_eq!(p.list.filter, Some(Record::new()));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn from_parts_treats_empty_sort_and_pagination_as_absent() {
        let req = RestRequest::from_parts(
            "GET_LIST",
            json!({"sort": {}, "pagination": {}, "filter": {}}),
        )
        .unwrap();
        match req {
            RestRequest::GetList(p) => {
                assert!(p.sort.is_none());
                assert_eq!(p.pagination, Some(Pagination::default()));
                assert_eq!(p.filter, Some(Record::new()));
            }
            other => panic!("unexpected request: {other:?}"),
        }

        let req = RestRequest::from_parts("GET_LIST", json!({"sort": null})).unwrap();
        assert_eq!(req, RestRequest::GetList(ListParams::default()));
    }

    #[test]
    fn from_parts_empty_sort_inside_reference_params() {
        let req = RestRequest::from_parts(
            "GET_MANY_REFERENCE",
            json!({"target": "post_id", "id": 1, "sort": {}}),
        )
        .unwrap();
        match req {
            RestRequest::GetManyReference(p) => assert!(p.list.sort.is_none()),
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn from_parts_rejects_out_of_range_page() {
        let err = RestRequest::from_parts(
            "GET_LIST",
            json!({"pagination": {"page": i64::MIN, "perPage": 10}}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AdapterError::InvalidParams {
                kind: OperationKind::GetList,
                ..
            }
        ));
    }

    #[test]
    fn from_parts_tolerates_missing_list_params() {
        let req = RestRequest::from_parts("GET_LIST", json!({})).unwrap();
        assert_eq!(req, RestRequest::GetList(ListParams::default()));
    }

    #[test]
    fn from_parts_reports_shape_mismatch() {
        let err = RestRequest::from_parts("UPDATE", json!({"id": 1})).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::InvalidParams {
                kind: OperationKind::Update,
                ..
            }
        ));
    }

    #[test]
    fn rest_result_omits_absent_total() {
        let single = serde_json::to_value(RestResult::single(json!({"id": 1}))).unwrap();
        assert_eq!(single, json!({"data": {"id": 1}}));
        let page = serde_json::to_value(RestResult::page(json!([]), 0)).unwrap();
        assert_eq!(page, json!({"data": [], "total": 0}));
    }
}
