use std::{cmp::Ordering, collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub type Record = Map<String, Value>;

pub const DEFAULT_COUNT: usize = 100;

/// Records of one resource, keyed by auto-increment id.
#[derive(Debug, Default)]
pub struct Collection {
    next_id: u64,
    records: BTreeMap<u64, Record>,
}

impl Collection {
    fn insert(&mut self, mut record: Record) -> Record {
        self.next_id += 1;
        record.insert("id".to_string(), Value::from(self.next_id));
        self.records.insert(self.next_id, record.clone());
        record
    }
}

pub type Db = Arc<RwLock<HashMap<String, Collection>>>;

type ApiError = (StatusCode, Json<Value>);

fn not_found(resource: &str, id: u64) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("{resource} {id} not found") })),
    )
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/{resource}", get(list_records).post(create_record))
        .route(
            "/{resource}/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Query-string form of a field value, used for filter matching.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_field(a: &Record, b: &Record, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => render(x).cmp(&render(y)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Reserved list keys; everything else in the query string filters.
#[derive(Debug, Default, PartialEq)]
pub struct ListQuery {
    pub sort: Option<String>,
    pub page: usize,
    pub count: usize,
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, String> {
        let mut query = ListQuery {
            count: DEFAULT_COUNT,
            ..Default::default()
        };
        for (key, value) in pairs {
            match key.as_str() {
                "sort" => query.sort = Some(value),
                "page" => query.page = value.parse().map_err(|_| format!("invalid page '{value}'"))?,
                "count" => {
                    query.count = value.parse().map_err(|_| format!("invalid count '{value}'"))?
                }
                _ => query.filters.push((key, value)),
            }
        }
        Ok(query)
    }
}

async fn list_records(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<(HeaderMap, Json<Vec<Record>>), ApiError> {
    let query = ListQuery::from_pairs(pairs)
        .map_err(|message| (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))))?;

    let db = db.read().await;
    let mut matches: Vec<&Record> = db
        .get(&resource)
        .map(|c| c.records.values().collect())
        .unwrap_or_default();
    matches.retain(|record| {
        query
            .filters
            .iter()
            .all(|(field, expected)| record.get(field).is_some_and(|v| render(v) == *expected))
    });

    if let Some(sort) = &query.sort {
        let (field, descending) = match sort.strip_prefix('-') {
            Some(field) => (field, true),
            None => (sort.as_str(), false),
        };
        matches.sort_by(|a, b| {
            let ord = compare_field(a, b, field);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    let total = matches.len();
    let start = query.page.saturating_mul(query.count);
    let window: Vec<Record> = matches
        .into_iter()
        .skip(start)
        .take(query.count)
        .cloned()
        .collect();
    let end = (start + window.len()).saturating_sub(1).max(start);
    tracing::debug!(%resource, total, returned = window.len(), "list");

    let mut headers = HeaderMap::new();
    let range = format!("items {start}-{end}/{total}");
    if let Ok(value) = HeaderValue::from_str(&range) {
        headers.insert(header::CONTENT_RANGE, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Content-Range"),
    );
    Ok((headers, Json(window)))
}

async fn create_record(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Json(input): Json<Record>,
) -> (StatusCode, Json<Record>) {
    let mut db = db.write().await;
    let record = db.entry(resource).or_default().insert(input);
    (StatusCode::CREATED, Json(record))
}

async fn get_record(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, u64)>,
) -> Result<Json<Record>, ApiError> {
    let db = db.read().await;
    db.get(&resource)
        .and_then(|c| c.records.get(&id))
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(&resource, id))
}

async fn update_record(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, u64)>,
    Json(input): Json<Record>,
) -> Result<Json<Record>, ApiError> {
    let mut db = db.write().await;
    let record = db
        .get_mut(&resource)
        .and_then(|c| c.records.get_mut(&id))
        .ok_or_else(|| not_found(&resource, id))?;
    for (field, value) in input {
        if field != "id" {
            record.insert(field, value);
        }
    }
    Ok(Json(record.clone()))
}

async fn delete_record(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, u64)>,
) -> Result<Json<Record>, ApiError> {
    let mut db = db.write().await;
    db.get_mut(&resource)
        .and_then(|c| c.records.remove(&id))
        .map(Json)
        .ok_or_else(|| not_found(&resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("record must be an object"),
        }
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn collection_assigns_increasing_ids() {
        let mut posts = Collection::default();
        let first = posts.insert(record(json!({"title": "a"})));
        let second = posts.insert(record(json!({"title": "b", "id": 77})));
        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
        assert_eq!(posts.records.len(), 2);
    }

    #[test]
    fn list_query_splits_reserved_keys() {
        let query = ListQuery::from_pairs(pairs(&[
            ("sort", "-title"),
            ("page", "2"),
            ("count", "5"),
            ("author_id", "3"),
        ]))
        .unwrap();
        assert_eq!(query.sort.as_deref(), Some("-title"));
        assert_eq!(query.page, 2);
        assert_eq!(query.count, 5);
        assert_eq!(query.filters, pairs(&[("author_id", "3")]));
    }

    #[test]
    fn list_query_defaults() {
        let query = ListQuery::from_pairs(Vec::new()).unwrap();
        assert_eq!(query.page, 0);
        assert_eq!(query.count, DEFAULT_COUNT);
        assert!(query.sort.is_none());
    }

    #[test]
    fn list_query_rejects_negative_page() {
        assert!(ListQuery::from_pairs(pairs(&[("page", "-1")])).is_err());
    }

    #[test]
    fn compare_field_orders_numbers_numerically() {
        let a = record(json!({"views": 9}));
        let b = record(json!({"views": 10}));
        assert_eq!(compare_field(&a, &b, "views"), Ordering::Less);
        let c = record(json!({"title": "b"}));
        let d = record(json!({"title": "a"}));
        assert_eq!(compare_field(&c, &d, "title"), Ordering::Greater);
    }

    #[test]
    fn render_matches_query_string_form() {
        assert_eq!(render(&json!("draft")), "draft");
        assert_eq!(render(&json!(0)), "0");
        assert_eq!(render(&json!(true)), "true");
    }
}
