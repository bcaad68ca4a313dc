#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::sync::RwLock;

use vet_console::{ApiClient, Resource, RestCollection};

pub type SharedDb = Arc<RwLock<MockDb>>;

/// In-memory stand-in for the clinic backend.
#[derive(Default)]
pub struct MockDb {
    collections: HashMap<String, Vec<Value>>,
    passwords: HashMap<String, String>,
    failures: HashSet<(String, String)>,
    blank_aggregates: HashSet<String>,
    next_id: i64,
    pub request_log: Vec<(String, String)>,
    pub last_authorization: Option<String>,
}

pub fn id_key(collection: &str) -> &'static str {
    match collection {
        "patients" => "animal_id",
        "contacts" => "contact_id",
        _ => "id",
    }
}

impl MockDb {
    /// Inserts `record` with a fresh id and returns the id.
    pub fn seed(&mut self, collection: &str, mut record: Value) -> i64 {
        self.next_id += 1;
        let id = self.next_id;
        record[id_key(collection)] = json!(id);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
        id
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.collections.get(collection).cloned().unwrap_or_default()
    }

    pub fn find(&self, collection: &str, id: i64) -> Option<Value> {
        self.collections
            .get(collection)?
            .iter()
            .find(|r| r[id_key(collection)].as_i64() == Some(id))
            .cloned()
    }

    /// Makes every `method` call on `target` (a collection, or `collection/aggregate`) answer 500.
    pub fn fail(&mut self, method: &str, target: &str) {
        self.failures
            .insert((method.to_string(), target.to_string()));
    }

    /// Makes the aggregate at `target` answer 200 with an empty object.
    pub fn blank(&mut self, target: &str) {
        self.blank_aggregates.insert(target.to_string());
    }

    pub fn recover(&mut self, method: &str, target: &str) {
        self.failures
            .remove(&(method.to_string(), target.to_string()));
    }

    pub fn calls(&self, method: &str, target: &str) -> usize {
        self.request_log
            .iter()
            .filter(|(m, t)| m == method && t == target)
            .count()
    }

    fn record_call(&mut self, method: &str, target: &str, headers: &HeaderMap) -> bool {
        self.request_log
            .push((method.to_string(), target.to_string()));
        if let Some(auth) = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
        {
            self.last_authorization = Some(auth.to_string());
        }
        self.failures
            .contains(&(method.to_string(), target.to_string()))
    }
}

pub struct MockApi {
    pub base_url: String,
    pub db: SharedDb,
}

impl MockApi {
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.base_url.clone())
    }

    pub fn collection<R: Resource>(&self) -> RestCollection<R> {
        RestCollection::new(self.client())
    }
}

pub async fn spawn_mock_api() -> anyhow::Result<MockApi> {
    let db: SharedDb = Arc::new(RwLock::new(MockDb::default()));

    let router = Router::new()
        .route("/api/{collection}/", get(list_records).post(create_record))
        .route(
            "/api/{collection}/{id}/",
            get(get_record_or_aggregate)
                .put(update_record)
                .delete(delete_record),
        )
        .with_state(db.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(MockApi {
        base_url: format!("http://{}/api", addr),
        db,
    })
}

fn injected_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "injected failure" })),
    )
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
}

async fn list_records(
    State(db): State<SharedDb>,
    Path(collection): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut db = db.write().await;
    if db.record_call("GET", &collection, &headers) {
        return injected_failure();
    }
    Json(Value::Array(db.records(&collection))).into_response()
}

async fn create_record(
    State(db): State<SharedDb>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut db = db.write().await;
    if db.record_call("POST", &collection, &headers) {
        return injected_failure();
    }

    match collection.as_str() {
        "register" => {
            let email = body["email"].as_str().unwrap_or_default().to_string();
            let taken = db
                .records("users")
                .iter()
                .any(|u| u["email"].as_str() == Some(email.as_str()));
            if email.is_empty() || taken {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "email": ["user with this email already exists."] })),
                )
                    .into_response();
            }
            let password = body["password"].as_str().unwrap_or_default().to_string();
            db.passwords.insert(email.clone(), password);
            let id = db.seed(
                "users",
                json!({ "full_name": body["full_name"], "email": email }),
            );
            let mut user = db.find("users", id).unwrap_or_default();
            user["token"] = json!(format!("token-{}", id));
            (StatusCode::CREATED, Json(user)).into_response()
        }
        "login" => {
            let email = body["email"].as_str().unwrap_or_default();
            let password = body["password"].as_str().unwrap_or_default();
            let user = db
                .records("users")
                .into_iter()
                .find(|u| u["email"].as_str() == Some(email));
            match (user, db.passwords.get(email)) {
                (Some(user), Some(stored)) if stored == password => {
                    Json(json!({ "token": format!("token-{}", user["id"]) })).into_response()
                }
                _ => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid credentials" })),
                )
                    .into_response(),
            }
        }
        _ => {
            let id = db.seed(&collection, body);
            let created = db.find(&collection, id).unwrap_or_default();
            (StatusCode::CREATED, Json(created)).into_response()
        }
    }
}

async fn get_record_or_aggregate(
    State(db): State<SharedDb>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let mut db = db.write().await;

    if let Ok(id) = id.parse::<i64>() {
        if db.record_call("GET", &collection, &headers) {
            return injected_failure();
        }
        return match db.find(&collection, id) {
            Some(record) => Json(record).into_response(),
            None => not_found(),
        };
    }

    let target = format!("{}/{}", collection, id);
    if db.record_call("GET", &target, &headers) {
        return injected_failure();
    }
    if db.blank_aggregates.contains(&target) {
        return Json(json!({})).into_response();
    }

    let records = db.records(&collection);
    match (collection.as_str(), id.as_str()) {
        (_, "count") => {
            let key = match collection.as_str() {
                "medicine" => "total_medicines".to_string(),
                other => format!("total_{}", other),
            };
            let mut body = serde_json::Map::new();
            body.insert(key, json!(records.len()));
            Json(Value::Object(body)).into_response()
        }
        ("sales", "total-revenue") => {
            let total: f64 = records.iter().map(|s| decimal(&s["total_price"])).sum();
            // Decimal aggregates are rendered as strings, like the real backend.
            Json(json!({ "total_revenue": format!("{:.2}", total) })).into_response()
        }
        ("medicine", "total-stock-value") => {
            let total: f64 = records
                .iter()
                .map(|m| decimal(&m["price"]) * m["quantity"].as_f64().unwrap_or(0.0))
                .sum();
            Json(json!({ "total_stock_value": total })).into_response()
        }
        ("medicine", "low-stock") => {
            let low: Vec<Value> = records
                .into_iter()
                .filter(|m| m["quantity"].as_u64().unwrap_or(0) < 10)
                .collect();
            Json(Value::Array(low)).into_response()
        }
        _ => not_found(),
    }
}

async fn update_record(
    State(db): State<SharedDb>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut db = db.write().await;
    if db.record_call("PUT", &collection, &headers) {
        return injected_failure();
    }

    let key = id_key(&collection);
    let Some(record) = db
        .collections
        .get_mut(&collection)
        .and_then(|records| records.iter_mut().find(|r| r[key].as_i64() == Some(id)))
    else {
        return not_found();
    };

    if let (Some(target), Some(patch)) = (record.as_object_mut(), body.as_object()) {
        for (field, value) in patch {
            if field != key {
                target.insert(field.clone(), value.clone());
            }
        }
    }
    Json(record.clone()).into_response()
}

async fn delete_record(
    State(db): State<SharedDb>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Response {
    let mut db = db.write().await;
    if db.record_call("DELETE", &collection, &headers) {
        return injected_failure();
    }

    let key = id_key(&collection);
    let Some(records) = db.collections.get_mut(&collection) else {
        return not_found();
    };
    let before = records.len();
    records.retain(|r| r[key].as_i64() != Some(id));
    if records.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

fn decimal(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn seed_medicine(api: &MockApi, name: &str, category: &str, quantity: u32) -> i64 {
    api.db.write().await.seed(
        "medicine",
        json!({
            "name": name,
            "category": category,
            "price": "12.50",
            "quantity": quantity,
            "expiry_date": "2027-01-31"
        }),
    )
}

pub async fn seed_patients(api: &MockApi, count: usize) -> Vec<i64> {
    let mut db = api.db.write().await;
    (1..=count)
        .map(|n| {
            db.seed(
                "patients",
                json!({
                    "owner_name": format!("Owner {:02}", n),
                    "owner_contact": format!("07000000{:02}", n),
                    "species": if n % 2 == 0 { "Dog" } else { "Cat" },
                    "status": "admitted"
                }),
            )
        })
        .collect()
}
