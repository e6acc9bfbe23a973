#![allow(dead_code)]

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GOOD_TOKEN: &str = "good-token";

#[derive(Default)]
pub struct MockData {
    pub stats: HashMap<String, Value>,
    pub urls: Vec<Value>,
    pub all_urls: Vec<Value>,
    pub last_auth: Option<String>,
    pub last_shorten: Option<Value>,
    pub last_login: Option<(String, String)>,
}

#[derive(Clone, Default)]
pub struct MockApi {
    pub data: Arc<Mutex<MockData>>,
}

pub struct MockServer {
    pub base_url: String,
    pub api: MockApi,
}

impl MockServer {
    pub fn remove_stats(&self, short_url: &str) {
        self.api.data.lock().unwrap().stats.remove(short_url);
    }

    pub fn last_auth(&self) -> Option<String> {
        self.api.data.lock().unwrap().last_auth.clone()
    }

    pub fn last_shorten(&self) -> Option<Value> {
        self.api.data.lock().unwrap().last_shorten.clone()
    }

    pub fn last_login(&self) -> Option<(String, String)> {
        self.api.data.lock().unwrap().last_login.clone()
    }
}

pub fn stats_payload(short_url: &str, days: &[(&str, u64)]) -> Value {
    let breakdown: Vec<Value> = days
        .iter()
        .map(|(date, clicks)| json!({ "date": date, "clicks": clicks }))
        .collect();
    let total: u64 = days.iter().map(|(_, clicks)| clicks).sum();
    json!({
        "short_url": short_url,
        "full_url": format!("https://example.com/{short_url}"),
        "total_clicks": total,
        "daily_breakdown": breakdown,
        "top_countries": [{ "country": "ID", "clicks": 7 }],
        "top_referers": [{ "referer": "https://www.google.com/", "clicks": 3 }],
    })
}

pub fn url_payload(id: u64, short_url: &str, full_url: &str) -> Value {
    json!({
        "id": id,
        "short_url": short_url,
        "full_url": full_url,
        "click": 0,
        "created_at": "2024-01-01T00:00:00",
        "creator": { "id": 1, "username": "alice" },
    })
}

pub async fn spawn_mock() -> MockServer {
    let api = MockApi::default();
    {
        let mut data = api.data.lock().unwrap();
        data.stats.insert(
            "abc".into(),
            stats_payload(
                "abc",
                &[("2024-01-01", 5), ("2024-01-02", 0), ("2024-01-03", 10)],
            ),
        );
        data.stats
            .insert("slow".into(), stats_payload("slow", &[("2024-01-03", 1)]));
        data.stats
            .insert("fast".into(), stats_payload("fast", &[("2024-01-03", 2)]));
        data.urls = vec![url_payload(1, "abc", "https://example.com/abc")];
    }

    let app = Router::new()
        .route("/api/stats/:short/dashboard", get(stats))
        .route("/api/my-urls", get(my_urls))
        .route("/api/url/all", get(all_urls))
        .route("/api/shorten", post(shorten))
        .route("/api/:id", put(update))
        .route("/api/auth/login", post(login))
        .route("/api/user", post(register))
        .route("/api/user/current", get(current_user))
        .route("/api/user/:id", get(profile))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock api crashed");
    });

    MockServer {
        base_url: format!("http://{addr}/api"),
        api,
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn envelope(status: StatusCode, data: Value) -> Response {
    (
        status,
        Json(json!({ "status": status.as_u16(), "message": "ok", "data": data })),
    )
        .into_response()
}

fn failure(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

async fn stats(
    State(api): State<MockApi>,
    Path(short): Path<String>,
    headers: HeaderMap,
) -> Response {
    let token = bearer(&headers);
    api.data.lock().unwrap().last_auth = token.clone();

    match token.as_deref() {
        Some("expired") => return failure(StatusCode::UNAUTHORIZED, json!({ "detail": "expired" })),
        Some("viewer") => return failure(StatusCode::FORBIDDEN, json!({ "detail": "forbidden" })),
        _ => {}
    }

    match short.as_str() {
        "boom" => return failure(StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": "database down" })),
        "soft-fail" => {
            return (
                StatusCode::OK,
                Json(json!({ "status": 500, "message": "stats unavailable", "data": null })),
            )
                .into_response();
        }
        "bad-request" => return failure(StatusCode::BAD_REQUEST, json!({ "detail": "bad short url" })),
        "slow" | "slow-missing" => tokio::time::sleep(Duration::from_millis(250)).await,
        _ => {}
    }

    let payload = api.data.lock().unwrap().stats.get(&short).cloned();
    match payload {
        Some(payload) => envelope(StatusCode::OK, payload),
        None => failure(StatusCode::NOT_FOUND, json!({ "detail": "Not found" })),
    }
}

async fn my_urls(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    if bearer(&headers).as_deref() != Some(GOOD_TOKEN) {
        return failure(StatusCode::UNAUTHORIZED, json!({ "detail": "Not authenticated" }));
    }
    let urls = api.data.lock().unwrap().urls.clone();
    envelope(StatusCode::OK, Value::Array(urls))
}

async fn all_urls(State(api): State<MockApi>) -> Response {
    let urls = api.data.lock().unwrap().all_urls.clone();
    envelope(StatusCode::OK, Value::Array(urls))
}

async fn shorten(State(api): State<MockApi>, Json(body): Json<Value>) -> Response {
    api.data.lock().unwrap().last_shorten = Some(body.clone());

    let full_url = body["full_url"].as_str().unwrap_or_default();
    let short_url = body["short_url"].as_str().unwrap_or_default();
    if full_url.is_empty() {
        return failure(
            StatusCode::BAD_REQUEST,
            json!({
                "message": "Invalid input",
                "errors": [{ "field": "full_url", "message": "Field required" }],
            }),
        );
    }
    if short_url == "taken" {
        return failure(
            StatusCode::BAD_REQUEST,
            json!({ "error": "Short URL already exists" }),
        );
    }
    if short_url == "silent-crash" {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    }
    if short_url == "detailed-crash" {
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "detail": "trace id 42", "message": "db down" }),
        );
    }
    if short_url == "crash" {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, json!({ "message": "db down" }));
    }

    let code = if short_url.is_empty() { "gen123" } else { short_url };
    envelope(StatusCode::CREATED, url_payload(42, code, full_url))
}

async fn update(Path(id): Path<u64>, Json(body): Json<Value>) -> Response {
    if id == 999 {
        return failure(StatusCode::NOT_FOUND, json!({ "message": "Url not found" }));
    }
    let full_url = body["full_url"].as_str().unwrap_or_default();
    let short_url = body["short_url"].as_str().unwrap_or_default();
    envelope(StatusCode::OK, url_payload(id, short_url, full_url))
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(api): State<MockApi>, Form(form): Form<LoginForm>) -> Response {
    api.data.lock().unwrap().last_login = Some((form.username.clone(), form.password.clone()));
    if form.username == "alice" && form.password == "secret" {
        return (
            StatusCode::OK,
            Json(json!({
                "status": 200,
                "message": "Welcome back",
                "data": { "token": GOOD_TOKEN, "id": 1, "username": "alice" },
            })),
        )
            .into_response();
    }
    failure(StatusCode::UNAUTHORIZED, json!({ "detail": "Incorrect username or password" }))
}

async fn register(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    if username == "alice" {
        return failure(StatusCode::CONFLICT, json!({ "message": "Username taken" }));
    }
    envelope(StatusCode::CREATED, json!({ "id": 2, "username": username }))
}

async fn current_user(headers: HeaderMap) -> Response {
    if bearer(&headers).as_deref() != Some(GOOD_TOKEN) {
        return failure(StatusCode::UNAUTHORIZED, json!({ "detail": "Not authenticated" }));
    }
    envelope(StatusCode::OK, json!({ "id": 1, "username": "alice" }))
}

async fn profile(Path(id): Path<u64>) -> Response {
    if id == 1 {
        return envelope(StatusCode::OK, json!({ "id": 1, "username": "alice" }));
    }
    failure(StatusCode::NOT_FOUND, json!({ "detail": "User not found" }))
}
